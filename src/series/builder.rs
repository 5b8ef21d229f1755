//! Series builder.
//!
//! Assembles exactly one [`DailyRecord`] per calendar day of the selected
//! month, whatever the completeness of the input.

use crate::analysis::is_compliant;
use crate::models::{Cause, DailyRecord, IndicatorConfig, MonthSeries};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

/// One entry of the daily form.
#[derive(Debug, Clone, PartialEq)]
pub struct DayInput {
    /// Day of month (1-indexed).
    pub day: u32,
    /// Entered result, `None` when left blank.
    pub result: Option<f64>,
    /// Root cause selected for the day.
    pub cause: Option<Cause>,
}

impl DayInput {
    #[cfg(test)]
    pub fn new(day: u32, result: f64) -> Self {
        Self {
            day,
            result: Some(result),
            cause: None,
        }
    }

    #[cfg(test)]
    pub fn with_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }
}

/// How raw results are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Read a literal `0` as "no data entered".
    pub zero_is_missing: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            zero_is_missing: true,
        }
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .count() as u32
}

/// Build the month series for the month containing `month`.
///
/// Never fails: days without an entry get no data, entries outside the
/// month are skipped, and a repeated day keeps its last entry.
pub fn build_month_series(
    indicator: &IndicatorConfig,
    month: NaiveDate,
    entries: &[DayInput],
    options: BuildOptions,
) -> MonthSeries {
    let first_day = first_of_month(month);
    let day_count = days_in_month(first_day);

    let mut slots: Vec<Option<&DayInput>> = vec![None; day_count as usize];
    for entry in entries {
        if entry.day == 0 || entry.day > day_count {
            warn!(
                "Ignoring entry for day {}: {} has {} days",
                entry.day,
                first_day.format("%Y-%m"),
                day_count
            );
            continue;
        }

        let slot = &mut slots[(entry.day - 1) as usize];
        if slot.is_some() {
            warn!("Day {} entered twice, keeping the later entry", entry.day);
        }
        *slot = Some(entry);
    }

    let records: Vec<DailyRecord> = first_day
        .iter_days()
        .zip(slots)
        .map(|(date, entry)| build_record(indicator, date, entry, options))
        .collect();

    debug!(
        "Built series for {} with {} days ({} with data)",
        first_day.format("%Y-%m"),
        records.len(),
        records.iter().filter(|r| r.has_data()).count()
    );

    MonthSeries::new(first_day, records)
}

fn build_record(
    indicator: &IndicatorConfig,
    date: NaiveDate,
    entry: Option<&DayInput>,
    options: BuildOptions,
) -> DailyRecord {
    let result = entry
        .and_then(|e| e.result)
        .filter(|value| value.is_finite())
        .filter(|value| !(options.zero_is_missing && *value == 0.0));

    let mut cause = entry.and_then(|e| e.cause);

    // A cause only explains a miss; drop it on days that met the target.
    if let (Some(value), Some(tag)) = (result, cause) {
        if is_compliant(value, indicator.target, indicator.direction) {
            debug!(
                "Dropping cause {} on {}: {} meets target {}",
                tag, date, value, indicator.target
            );
            cause = None;
        }
    }

    DailyRecord {
        date,
        result,
        cause,
    }
}
