//! Data models for the daily board.
//!
//! This module contains the core data structures shared by the pipeline:
//! the indicator definition, the per-day records of a month, the derived
//! aggregates and the final report handed to the presenters.

use crate::charts::ChartSet;
use crate::labels::Locale;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the target counts as compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Values at or below the target comply (scrap rate, downtime, ...).
    #[default]
    LowerIsBetter,
    /// Values at or above the target comply (OEE, first-pass yield, ...).
    HigherIsBetter,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::LowerIsBetter => write!(f, "lower-is-better"),
            Direction::HigherIsBetter => write!(f, "higher-is-better"),
        }
    }
}

/// Root-cause category of an out-of-target day (the "6M" vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cause {
    Materials,
    Methods,
    Machinery,
    Labor,
    Environment,
    Measurement,
}

impl Cause {
    /// Every cause, in vocabulary order.
    pub const ALL: [Cause; 6] = [
        Cause::Materials,
        Cause::Methods,
        Cause::Machinery,
        Cause::Labor,
        Cause::Environment,
        Cause::Measurement,
    ];

    /// Position of the cause in [`Cause::ALL`].
    pub fn index(self) -> usize {
        match self {
            Cause::Materials => 0,
            Cause::Methods => 1,
            Cause::Machinery => 2,
            Cause::Labor => 3,
            Cause::Environment => 4,
            Cause::Measurement => 5,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Materials => write!(f, "Materials"),
            Cause::Methods => write!(f, "Methods"),
            Cause::Machinery => write!(f, "Machinery"),
            Cause::Labor => write!(f, "Labor"),
            Cause::Environment => write!(f, "Environment"),
            Cause::Measurement => write!(f, "Measurement"),
        }
    }
}

impl FromStr for Cause {
    type Err = String;

    /// Accepts English and Spanish category names, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "materials" | "material" | "materiales" => Ok(Cause::Materials),
            "methods" | "method" | "métodos" | "metodos" => Ok(Cause::Methods),
            "machinery" | "machine" | "maquinaria" => Ok(Cause::Machinery),
            "labor" | "labour" | "manpower" | "mano de obra" => Ok(Cause::Labor),
            "environment" | "medio ambiente" => Ok(Cause::Environment),
            "measurement" | "medición" | "medicion" => Ok(Cause::Measurement),
            other => Err(other.to_string()),
        }
    }
}

/// The indicator tracked by one report. Immutable for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Display name of the indicator.
    pub name: String,
    /// Monthly target value.
    pub target: f64,
    /// Compliance directionality.
    pub direction: Direction,
}

/// One calendar day of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date.
    pub date: NaiveDate,
    /// Measured result, `None` when no data was entered.
    pub result: Option<f64>,
    /// Root cause, only kept on out-of-target days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Cause>,
}

impl DailyRecord {
    /// Whether the day carries a measurement.
    pub fn has_data(&self) -> bool {
        self.result.is_some()
    }

    /// Weekday column, 0 = Monday .. 6 = Sunday.
    pub fn weekday_index(&self) -> usize {
        self.date.weekday().num_days_from_monday() as usize
    }
}

/// Every day of one month, in calendar order, exactly once.
///
/// Only the series builder constructs this type, which keeps the
/// one-record-per-day invariant in a single place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSeries {
    first_day: NaiveDate,
    records: Vec<DailyRecord>,
}

impl MonthSeries {
    pub(crate) fn new(first_day: NaiveDate, records: Vec<DailyRecord>) -> Self {
        Self { first_day, records }
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that carry a measurement, with the value unwrapped.
    pub fn with_data(&self) -> impl Iterator<Item = (&DailyRecord, f64)> + '_ {
        self.records
            .iter()
            .filter_map(|r| r.result.map(|value| (r, value)))
    }

    /// Number of days that carry a measurement.
    pub fn days_with_data(&self) -> usize {
        self.with_data().count()
    }
}

/// Compliance state of one calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellState {
    Compliant,
    NonCompliant,
    NoData,
}

impl CellState {
    /// Heat-map encoding: +1 compliant, -1 non-compliant, null no data.
    pub fn encode(self) -> Option<i8> {
        match self {
            CellState::Compliant => Some(1),
            CellState::NonCompliant => Some(-1),
            CellState::NoData => None,
        }
    }

    /// Inverse of [`CellState::encode`]; any non-positive value reads as a miss.
    pub fn decode(value: Option<i8>) -> Self {
        match value {
            Some(v) if v > 0 => CellState::Compliant,
            Some(_) => CellState::NonCompliant,
            None => CellState::NoData,
        }
    }

    /// Symbol used by the text presenters.
    pub fn symbol(self) -> &'static str {
        match self {
            CellState::Compliant => "🟢",
            CellState::NonCompliant => "🔴",
            CellState::NoData => "⚪",
        }
    }
}

/// One ISO week of the month projected onto Monday..Sunday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRow {
    /// ISO week-numbering year.
    pub iso_year: i32,
    /// ISO week number (1..=53).
    pub week: u32,
    /// Cells indexed by weekday, Monday first. Days outside the month stay `NoData`.
    pub cells: [CellState; 7],
}

/// How many data days were attributed to one cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseCount {
    pub cause: Cause,
    pub count: usize,
}

/// A non-compliant day and how far it landed beyond the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub date: NaiveDate,
    pub result: f64,
    /// Distance beyond target in the bad direction (always positive).
    pub gap: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Cause>,
}

/// Headline numbers of the month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Mean over days with data (0 when there are none).
    pub mean: f64,
    /// Whether the mean satisfies the target.
    pub mean_compliant: bool,
    /// Days with data meeting the target.
    pub compliant_days: usize,
    /// Days with data missing the target.
    pub non_compliant_days: usize,
    /// Days without data.
    pub no_data_days: usize,
    /// Percentage of data days that met the target (0 when there are none).
    pub compliance_rate: f64,
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Indicator the report tracks.
    pub indicator: IndicatorConfig,
    /// First day of the reported month.
    pub month: NaiveDate,
    /// Number of days in the month.
    pub days_in_month: usize,
    /// Number of days with a measurement.
    pub days_with_data: usize,
    /// Label language used in the charts.
    pub locale: Locale,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

/// The complete monthly report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: ComplianceSummary,
    pub charts: ChartSet,
    /// Cause frequencies over data days, most frequent first.
    pub causes: Vec<CauseCount>,
    /// Non-compliant days furthest from target, worst first.
    pub deviations: Vec<Deviation>,
    /// Raw per-day table.
    pub records: Vec<DailyRecord>,
    /// Fallback messages shown instead of omitted charts.
    pub notices: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_from_str_accepts_both_languages() {
        assert_eq!("Machinery".parse::<Cause>(), Ok(Cause::Machinery));
        assert_eq!("maquinaria".parse::<Cause>(), Ok(Cause::Machinery));
        assert_eq!("Mano de obra".parse::<Cause>(), Ok(Cause::Labor));
        assert_eq!("MEDICIÓN".parse::<Cause>(), Ok(Cause::Measurement));
        assert_eq!(" medio ambiente ".parse::<Cause>(), Ok(Cause::Environment));
        assert!("weather".parse::<Cause>().is_err());
    }

    #[test]
    fn test_cause_index_matches_all() {
        for (i, cause) in Cause::ALL.iter().enumerate() {
            assert_eq!(cause.index(), i);
        }
    }

    #[test]
    fn test_direction_serde_names() {
        let json = serde_json::to_string(&Direction::HigherIsBetter).unwrap();
        assert_eq!(json, "\"higher-is-better\"");
        let parsed: Direction = serde_json::from_str("\"lower-is-better\"").unwrap();
        assert_eq!(parsed, Direction::LowerIsBetter);
    }

    #[test]
    fn test_cell_state_encoding() {
        assert_eq!(CellState::Compliant.encode(), Some(1));
        assert_eq!(CellState::NonCompliant.encode(), Some(-1));
        assert_eq!(CellState::NoData.encode(), None);
        for state in [CellState::Compliant, CellState::NonCompliant, CellState::NoData] {
            assert_eq!(CellState::decode(state.encode()), state);
        }
    }

    #[test]
    fn test_weekday_index_starts_monday() {
        let monday = DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            result: None,
            cause: None,
        };
        let sunday = DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            ..monday.clone()
        };
        assert_eq!(monday.weekday_index(), 0);
        assert_eq!(sunday.weekday_index(), 6);
        assert!(!monday.has_data());
    }
}
