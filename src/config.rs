//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.medalboard.toml` files.

use crate::report::ReportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".medalboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Medal-tally source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the medal-tally CSV file.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("Olympic_Games_Medal_Tally.csv")
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Country covered by the deep-dive section.
    #[serde(default = "default_focus_country")]
    pub focus_country: String,

    /// Number of countries in the ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Directory the report is written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Default export format.
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            focus_country: default_focus_country(),
            top_n: default_top_n(),
            output_dir: default_output_dir(),
            format: ReportFormat::default(),
        }
    }
}

fn default_focus_country() -> String {
    "India".to_string()
}

fn default_top_n() -> usize {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Parameters for the derived views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// First year of the "recent" period for improvement detection.
    #[serde(default = "default_split_year")]
    pub split_year: u32,

    /// Required recent/historical ratio to count as an improvement.
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,

    /// Minimum total medals for a country to appear in the efficiency view.
    #[serde(default = "default_efficiency_min_total")]
    pub efficiency_min_total: u64,

    /// Countries compared when none are given on the command line.
    #[serde(default = "default_comparison_countries")]
    pub comparison_countries: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            split_year: default_split_year(),
            growth_factor: default_growth_factor(),
            efficiency_min_total: default_efficiency_min_total(),
            comparison_countries: default_comparison_countries(),
        }
    }
}

fn default_split_year() -> u32 {
    2000
}

fn default_growth_factor() -> f64 {
    2.0
}

fn default_efficiency_min_total() -> u64 {
    50
}

fn default_comparison_countries() -> Vec<String> {
    vec!["United States", "China", "Germany", "India"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.clone();
        }

        if let Some(ref country) = args.focus_country {
            self.report.focus_country = country.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
