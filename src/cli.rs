//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::input;
use crate::labels::Locale;
use crate::models::Direction;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dailyboard - daily management board for a monthly KPI
///
/// Tracks one indicator day by day against its monthly target, counts
/// the root causes of misses and renders gauge, control chart, cause
/// bars and a calendar heat-map.
///
/// Examples:
///   dailyboard --init-input 2024-03 --indicator "Scrap rate" --target 2.5
///   dailyboard --input daily_input.toml
///   dailyboard --input march.toml --format markdown --locale es
///   dailyboard --input march.json --dry-run
///   dailyboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Input document with the month's daily results (.toml or .json)
    ///
    /// With --init-input this is where the blank template is written.
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present_any = ["init_config", "init_input"]
    )]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the configured output name with the format's extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (html, markdown, json)
    #[arg(long, value_name = "FORMAT", env = "DAILYBOARD_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .dailyboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Language of chart titles and labels (en, es)
    #[arg(long, value_name = "LANG", env = "DAILYBOARD_LOCALE")]
    pub locale: Option<Locale>,

    /// Treat a result of 0 as a real measurement instead of "no data"
    #[arg(long)]
    pub zero_is_data: bool,

    /// Number of largest deviations to list in the report
    #[arg(long, value_name = "COUNT")]
    pub max_deviations: Option<usize>,

    /// Exit with code 2 when the monthly mean misses the target
    #[arg(long)]
    pub fail_on_miss: bool,

    /// Validate the input and print the summary without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .dailyboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Generate a blank input document for a month (YYYY-MM)
    #[arg(long, value_name = "MONTH")]
    pub init_input: Option<String>,

    /// Indicator name for --init-input
    #[arg(long, value_name = "NAME", requires = "init_input")]
    pub indicator: Option<String>,

    /// Monthly target for --init-input
    #[arg(
        long,
        value_name = "VALUE",
        requires = "init_input",
        allow_negative_numbers = true
    )]
    pub target: Option<f64>,

    /// Directionality for --init-input
    #[arg(long, value_name = "RULE", requires = "init_input")]
    pub direction: Option<DirectionArg>,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Self-contained HTML dashboard (default)
    #[default]
    Html,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for reports in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// Directionality rule for --direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DirectionArg {
    LowerIsBetter,
    HigherIsBetter,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::LowerIsBetter => Direction::LowerIsBetter,
            DirectionArg::HigherIsBetter => Direction::HigherIsBetter,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref month) = self.init_input {
            input::parse_month(month).map_err(|e| e.to_string())?;

            if let Some(target) = self.target {
                if !target.is_finite() {
                    return Err("Target must be a finite number".to_string());
                }
            }
            return Ok(());
        }

        if let Some(max) = self.max_deviations {
            if max == 0 {
                return Err("Max deviations must be at least 1".to_string());
            }
        }

        // Validate the input file if provided
        if let Some(ref path) = self.input {
            if !path.exists() {
                return Err(format!("Input file does not exist: {}", path.display()));
            }
            if !path.is_file() {
                return Err(format!("Input path is not a file: {}", path.display()));
            }
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
