//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Medalboard - Olympic medal-tally statistics and reports
///
/// Browse aggregated medal statistics by country and year, and export a
/// narrative analysis report as Markdown, PDF or JSON.
///
/// Examples:
///   medalboard summary
///   medalboard --data medals.csv top -n 15
///   medalboard compare --countries India,China --from 1996 --to 2016
///   medalboard efficiency --min-total 100 --json
///   medalboard report --format pdf --output-dir out/
///   medalboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the medal-tally CSV file
    ///
    /// Overrides the [data] path from the configuration file.
    #[arg(short, long, global = true, value_name = "FILE", env = "MEDALBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .medalboard.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Country covered by the report's deep-dive section
    #[arg(long, global = true, value_name = "COUNTRY")]
    pub focus_country: Option<String>,

    /// Print views as JSON instead of text tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .medalboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Views and exports.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Headline numbers: countries, medals, years and games
    Summary(RangeArgs),

    /// Countries ranked by total medals
    Top {
        /// Number of countries to show
        #[arg(short = 'n', long, default_value = "10", value_name = "COUNT")]
        count: usize,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Gold, silver and bronze totals per edition
    ByYear(RangeArgs),

    /// Per-edition totals for selected countries
    Compare {
        #[command(flatten)]
        selection: CountryArgs,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Medal timeline of one country
    Timeline {
        /// Country name as it appears in the data
        #[arg(value_name = "COUNTRY")]
        country: String,
    },

    /// Medals per game and gold share
    Efficiency {
        #[command(flatten)]
        selection: CountryArgs,

        /// Minimum total medals when no countries are selected
        #[arg(long, value_name = "COUNT")]
        min_total: Option<u64>,
    },

    /// Countries whose recent per-game average jumped
    Improvers {
        /// First year of the recent period
        #[arg(long, value_name = "YEAR")]
        split_year: Option<u32>,

        /// Required growth over the historical average
        #[arg(long, value_name = "FACTOR")]
        growth_factor: Option<f64>,
    },

    /// First and last appearance of selected countries
    Span {
        #[command(flatten)]
        selection: CountryArgs,
    },

    /// Export the narrative analysis report
    Report {
        /// Output format (markdown, pdf, json)
        #[arg(long, value_name = "FORMAT")]
        format: Option<ReportFormat>,

        /// Directory to write the report into
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Print the Markdown report instead of writing a file
        #[arg(long)]
        preview: bool,
    },
}

/// Inclusive year range filter.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct RangeArgs {
    /// First year to include
    #[arg(long = "from", value_name = "YEAR")]
    pub from: Option<u32>,

    /// Last year to include
    #[arg(long = "to", value_name = "YEAR")]
    pub to: Option<u32>,
}

impl RangeArgs {
    /// The requested range, or `None` when no bound was given.
    pub fn bounds(&self) -> Option<(u32, u32)> {
        match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some((from.unwrap_or(0), to.unwrap_or(u32::MAX))),
        }
    }
}

/// Country selection.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct CountryArgs {
    /// Countries to include (comma-separated)
    ///
    /// Example: --countries "India,China,Japan"
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub countries: Option<Vec<String>>,
}

impl CountryArgs {
    /// Selected names with surrounding whitespace and blanks removed.
    pub fn names(&self) -> Option<Vec<String>> {
        self.countries.as_ref().map(|names| {
            names
                .iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect()
        })
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        let Some(ref command) = self.command else {
            return Err("A command is required (try --help)".to_string());
        };

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match command {
            Command::Summary(range)
            | Command::ByYear(range)
            | Command::Top { range, .. }
            | Command::Compare { range, .. } => validate_range(range)?,
            Command::Improvers {
                growth_factor: Some(factor),
                ..
            } if !factor.is_finite() || *factor < 0.0 => {
                return Err("Growth factor must be a non-negative number".to_string());
            }
            Command::Timeline { country } if country.trim().is_empty() => {
                return Err("Country name must not be empty".to_string());
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

fn validate_range(range: &RangeArgs) -> Result<(), String> {
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            return Err(format!("--from {} is after --to {}", from, to));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("medalboard").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_top() {
        let args = parse(&["--data", "medals.csv", "top", "-n", "5", "--from", "2000"]);
        assert_eq!(args.data, Some(PathBuf::from("medals.csv")));
        assert_eq!(
            args.command,
            Some(Command::Top {
                count: 5,
                range: RangeArgs {
                    from: Some(2000),
                    to: None
                }
            })
        );
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_countries() {
        let args = parse(&["compare", "--countries", "India, China,,Japan"]);
        match args.command {
            Some(Command::Compare { selection, .. }) => {
                assert_eq!(
                    selection.names(),
                    Some(vec![
                        "India".to_string(),
                        "China".to_string(),
                        "Japan".to_string()
                    ])
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_format() {
        let args = parse(&["report", "--format", "pdf", "-o", "out"]);
        assert_eq!(
            args.command,
            Some(Command::Report {
                format: Some(ReportFormat::Pdf),
                output_dir: Some(PathBuf::from("out")),
                preview: false,
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["summary", "--json", "-v"]);
        assert!(args.json);
        assert!(args.verbose);
    }

    #[test]
    fn test_validation_requires_command() {
        let args = parse(&[]);
        assert!(args.validate().is_err());

        let args = parse(&["--init-config"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_inverted_range() {
        let args = parse(&["by-year", "--from", "2010", "--to", "2000"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = parse(&["summary", "-v", "-q"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_range_bounds() {
        assert_eq!(RangeArgs::default().bounds(), None);
        let range = RangeArgs {
            from: Some(1996),
            to: None,
        };
        assert_eq!(range.bounds(), Some((1996, u32::MAX)));
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["summary"]);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
