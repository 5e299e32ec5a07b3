//! Medalboard - Olympic medal-tally statistics and reports
//!
//! Loads a medal-tally CSV once, prints the aggregated views a dashboard
//! would chart, and exports a narrative analysis report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing data file, bad columns, config, write failure)

mod analysis;
mod cli;
mod config;
mod data;
mod error;
mod models;
mod report;
mod views;

use anyhow::{Context, Result};
use chrono::Local;
use cli::{Args, Command, CountryArgs, RangeArgs};
use config::Config;
use models::MedalTable;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so [general] verbose can apply
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("Medalboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .medalboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  .medalboard.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .medalboard.toml")?;

    println!("✅ Created .medalboard.toml with default settings.");
    println!("   Edit it to set the data file, focus country and analysis parameters.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load config, using defaults: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Load the medal table through the process-wide cache.
fn load_table(config: &Config) -> Result<Arc<MedalTable>> {
    let table = data::load_cached(&config.data.path)?;
    debug!("Medal table ready: {} records", table.len());
    Ok(table)
}

/// Apply an optional --from/--to filter.
fn in_range(table: &MedalTable, range: &RangeArgs) -> MedalTable {
    match range.bounds() {
        Some((from, to)) => {
            debug!("Filtering to years {}..={}", from, to);
            analysis::filter_by_year_range(table, from, to)
        }
        None => table.clone(),
    }
}

/// Countries from --countries, or `default` when the flag is absent.
fn selected_countries(selection: &CountryArgs, default: impl FnOnce() -> Vec<String>) -> Vec<String> {
    selection.names().unwrap_or_else(default)
}

/// Print either the JSON form or the text table of a view.
fn emit<T: serde::Serialize + ?Sized>(args: &Args, view: &T, text: impl FnOnce() -> String) -> Result<()> {
    if args.json {
        println!("{}", views::to_json(view)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Run the selected command.
fn run(args: &Args, config: &Config) -> Result<()> {
    let Some(ref command) = args.command else {
        return Ok(());
    };

    let table = load_table(config)?;

    match command {
        Command::Summary(range) => {
            let table = in_range(&table, range);
            let view = views::SummaryView {
                summary: analysis::dataset_summary(&table),
                distribution: analysis::medal_distribution(&table),
            };
            emit(args, &view, || {
                format!(
                    "{}\n{}",
                    views::summary_text(&view.summary),
                    views::distribution_table(&view.distribution)
                )
            })
        }

        Command::Top { count, range } => {
            let top = analysis::top_n(&in_range(&table, range), *count);
            emit(args, &top, || views::country_totals_table(&top))
        }

        Command::ByYear(range) => {
            let years = analysis::medals_by_year(&in_range(&table, range));
            emit(args, &years, || {
                views::year_medals_table("Global Medal Trends Over Time", &years)
            })
        }

        Command::Compare { selection, range } => {
            let countries: BTreeSet<String> = selected_countries(selection, || {
                config.analysis.comparison_countries.clone()
            })
            .into_iter()
            .collect();
            let view = analysis::medals_by_year_and_country(&in_range(&table, range), &countries);
            emit(args, &view, || views::comparison_table(&view))
        }

        Command::Timeline { country } => {
            let records = analysis::filter_by_country(&table, country.trim());
            let years = analysis::medals_by_year(&records);
            emit(args, &years, || {
                views::year_medals_table(&format!("{}'s Medal Timeline", country.trim()), &years)
            })
        }

        Command::Efficiency {
            selection,
            min_total,
        } => {
            let view = match selection.names() {
                Some(countries) => analysis::efficiency(&table, &countries),
                None => analysis::efficiency_all(
                    &table,
                    min_total.unwrap_or(config.analysis.efficiency_min_total),
                ),
            };
            emit(args, &view, || views::efficiency_table(&view))
        }

        Command::Improvers {
            split_year,
            growth_factor,
        } => {
            let split_year = split_year.unwrap_or(config.analysis.split_year);
            let growth_factor = growth_factor.unwrap_or(config.analysis.growth_factor);
            let view = analysis::improvement_candidates(&table, split_year, growth_factor);
            emit(args, &view, || views::improvement_table(&view, split_year))
        }

        Command::Span { selection } => {
            let countries = selected_countries(selection, || {
                analysis::top_country_names(&table, config.report.top_n)
            });
            let view = analysis::participation_span(&table, &countries);
            emit(args, &view, || views::span_table(&view))
        }

        Command::Report {
            format,
            output_dir,
            preview,
        } => {
            let settings = report::ReportSettings::from(&config.report);
            let document = report::assemble(&table, &settings, Local::now().date_naive());

            if *preview {
                print!("{}", report::render_markdown(&document));
                return Ok(());
            }

            let format = format.unwrap_or(config.report.format);
            let output_dir = output_dir
                .clone()
                .unwrap_or_else(|| config.report.output_dir.clone());

            println!("📝 Generating {:?} report...", format);
            let path = report::export(&document, format, &output_dir)
                .with_context(|| format!("Failed to export report to {}", output_dir.display()))?;
            println!("✅ Report generated successfully! Saved to: {}", path.display());
            Ok(())
        }
    }
}
