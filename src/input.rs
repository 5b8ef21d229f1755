//! Input document handling.
//!
//! The input document is the filled-in daily form: the indicator, the
//! month and one entry per day. It is read from TOML or JSON, validated
//! strictly, and turned into an immutable [`ReportInput`].

use crate::models::{Cause, Direction, IndicatorConfig};
use crate::series::{days_in_month, first_of_month, DayInput};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Validation failures of an input document.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("invalid month '{0}': expected YYYY-MM or YYYY-MM-DD")]
    InvalidMonth(String),

    #[error("target must be a finite number, got {0}")]
    NonFiniteTarget(f64),

    #[error("day {day} is outside {month} (1..={days})")]
    DayOutOfRange { day: u32, month: String, days: u32 },

    #[error("day {0} appears more than once")]
    DuplicateDay(u32),

    #[error("day {day}: result must be a finite number")]
    NonFiniteResult { day: u32 },

    #[error("day {day}: unknown cause '{value}'")]
    UnknownCause { day: u32, value: String },

    #[error("unsupported input format '{0}': use .toml or .json")]
    UnsupportedFormat(String),
}

/// Everything one report run needs, read once and passed down unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    pub indicator: IndicatorConfig,
    /// First day of the reported month.
    pub month: NaiveDate,
    /// Day entries in document order.
    pub days: Vec<DayInput>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawInput {
    month: String,
    indicator: RawIndicator,
    #[serde(default)]
    days: Vec<RawDay>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawIndicator {
    #[serde(default)]
    name: String,
    #[serde(default)]
    target: f64,
    #[serde(default)]
    direction: Direction,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawDay {
    day: u32,
    #[serde(default)]
    result: Option<f64>,
    #[serde(default)]
    cause: Option<String>,
}

/// Parse `YYYY-MM` or `YYYY-MM-DD` into the first day of that month.
pub fn parse_month(value: &str) -> Result<NaiveDate, InputError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d"))
        .map(first_of_month)
        .map_err(|_| InputError::InvalidMonth(value.to_string()))
}

fn parse_cause(day: u32, value: Option<String>) -> Result<Option<Cause>, InputError> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .parse::<Cause>()
            .map(Some)
            .map_err(|_| InputError::UnknownCause { day, value: s }),
    }
}

fn validate(raw: RawInput) -> Result<ReportInput, InputError> {
    let month = parse_month(&raw.month)?;
    let day_count = days_in_month(month);

    if !raw.indicator.target.is_finite() {
        return Err(InputError::NonFiniteTarget(raw.indicator.target));
    }

    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(raw.days.len());
    for entry in raw.days {
        if entry.day == 0 || entry.day > day_count {
            return Err(InputError::DayOutOfRange {
                day: entry.day,
                month: month.format("%Y-%m").to_string(),
                days: day_count,
            });
        }
        if !seen.insert(entry.day) {
            return Err(InputError::DuplicateDay(entry.day));
        }
        if let Some(result) = entry.result {
            if !result.is_finite() {
                return Err(InputError::NonFiniteResult { day: entry.day });
            }
        }

        days.push(DayInput {
            day: entry.day,
            result: entry.result,
            cause: parse_cause(entry.day, entry.cause)?,
        });
    }

    Ok(ReportInput {
        indicator: IndicatorConfig {
            name: raw.indicator.name,
            target: raw.indicator.target,
            direction: raw.indicator.direction,
        },
        month,
        days,
    })
}

/// Parse and validate a TOML input document.
pub fn from_toml_str(content: &str) -> Result<ReportInput> {
    let raw: RawInput = toml::from_str(content).context("Failed to parse TOML input")?;
    Ok(validate(raw)?)
}

/// Parse and validate a JSON input document.
pub fn from_json_str(content: &str) -> Result<ReportInput> {
    let raw: RawInput = serde_json::from_str(content).context("Failed to parse JSON input")?;
    Ok(validate(raw)?)
}

/// Load an input document, choosing the parser from the file extension.
pub fn load(path: &Path) -> Result<ReportInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let parsed = match extension.as_str() {
        "toml" => from_toml_str(&content),
        "json" => from_json_str(&content),
        other => Err(InputError::UnsupportedFormat(other.to_string()).into()),
    };

    parsed.with_context(|| format!("Invalid input file: {}", path.display()))
}

#[derive(Serialize)]
struct TemplateDay {
    day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<f64>,
    cause: String,
}

#[derive(Serialize)]
struct Template<'a> {
    month: String,
    indicator: &'a RawIndicator,
    days: Vec<TemplateDay>,
}

/// Blank TOML input for a month: one entry per day, none with a result.
pub fn month_template(month: NaiveDate, indicator: &IndicatorConfig) -> Result<String> {
    let first = first_of_month(month);
    let raw_indicator = RawIndicator {
        name: indicator.name.clone(),
        target: indicator.target,
        direction: indicator.direction,
    };
    let template = Template {
        month: first.format("%Y-%m-%d").to_string(),
        indicator: &raw_indicator,
        days: (1..=days_in_month(first))
            .map(|day| TemplateDay {
                day,
                result: None,
                cause: String::new(),
            })
            .collect(),
    };

    let body = toml::to_string_pretty(&template).context("Failed to render input template")?;
    Ok(format!(
        "# Daily results for {}.\n\
         # Add `result = <value>` under each measured day; days without a\n\
         # result have no data. Causes: materials, methods, machinery,\n\
         # labor, environment, measurement (or their Spanish names).\n\n{}",
        first.format("%B %Y"),
        body
    ))
}
