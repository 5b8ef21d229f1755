//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.dailyboard.toml` files.

use crate::charts::Palette;
use crate::cli::OutputFormat;
use crate::labels::Locale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".dailyboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart colors.
    #[serde(default)]
    pub palette: Palette,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output path, without extension.
    #[serde(default = "default_output")]
    pub output: String,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
        }
    }
}

fn default_output() -> String {
    "daily_report".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Label language.
    #[serde(default)]
    pub locale: Locale,

    /// Read a literal 0 result as "no data".
    #[serde(default = "default_true")]
    pub zero_is_missing: bool,

    /// How many of the largest deviations to list.
    #[serde(default = "default_max_deviations")]
    pub max_deviations: usize,

    /// Plotly script URL embedded in HTML reports.
    #[serde(default = "default_plotly_url")]
    pub plotly_url: String,

    /// Include the entered-data table.
    #[serde(default = "default_true")]
    pub include_table: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            zero_is_missing: true,
            max_deviations: default_max_deviations(),
            plotly_url: default_plotly_url(),
            include_table: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_deviations() -> usize {
    5
}

fn default_plotly_url() -> String {
    "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string()
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
    /// CLI arguments take precedence over config file settings.
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(locale) = args.locale {
            self.report.locale = locale;
        }

        if let Some(max) = args.max_deviations {
            self.report.max_deviations = max;
        }

        // Flags always override
        if args.zero_is_data {
            self.report.zero_is_missing = false;
        }
    }

    /// Output path used when `--output` is not given.
    pub fn default_output_path(&self) -> PathBuf {
        PathBuf::from(&self.general.output).with_extension(self.general.format.extension())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
