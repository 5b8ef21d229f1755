//! Monthly aggregation and statistics.
//!
//! Everything here is a pure function of a [`MonthSeries`] and the
//! indicator it was built for.

use crate::models::{
    Cause, CauseCount, CellState, ComplianceSummary, Deviation, Direction, IndicatorConfig,
    MonthSeries, WeekRow,
};
use chrono::Datelike;
use std::cmp::Ordering;

/// Whether `value` satisfies the target under `direction`.
///
/// Equality with the target always complies.
pub fn is_compliant(value: f64, target: f64, direction: Direction) -> bool {
    match direction {
        Direction::LowerIsBetter => value <= target,
        Direction::HigherIsBetter => value >= target,
    }
}

/// Mean over the days that carry data; 0 when none do.
pub fn mean_non_zero(series: &MonthSeries) -> f64 {
    let (sum, count) = series
        .with_data()
        .fold((0.0, 0usize), |(sum, count), (_, value)| (sum + value, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Largest result of the month, if any day has data.
pub fn max_result(series: &MonthSeries) -> Option<f64> {
    series.with_data().map(|(_, v)| v).reduce(f64::max)
}

/// Smallest result of the month, if any day has data.
pub fn min_result(series: &MonthSeries) -> Option<f64> {
    series.with_data().map(|(_, v)| v).reduce(f64::min)
}

/// Per-day compliance in calendar order; `None` on days without data.
pub fn daily_compliance(series: &MonthSeries, indicator: &IndicatorConfig) -> Vec<Option<bool>> {
    series
        .records()
        .iter()
        .map(|r| {
            r.result
                .map(|v| is_compliant(v, indicator.target, indicator.direction))
        })
        .collect()
}

/// Cell state of every day in calendar order.
pub fn cell_states(series: &MonthSeries, indicator: &IndicatorConfig) -> Vec<CellState> {
    daily_compliance(series, indicator)
        .into_iter()
        .map(|flag| match flag {
            Some(true) => CellState::Compliant,
            Some(false) => CellState::NonCompliant,
            None => CellState::NoData,
        })
        .collect()
}

/// Cause counts over days with data, most frequent first.
///
/// Untagged days are not counted. Ties keep vocabulary order.
pub fn cause_frequency(series: &MonthSeries) -> Vec<CauseCount> {
    let mut counts = [0usize; 6];
    for (record, _) in series.with_data() {
        if let Some(cause) = record.cause {
            counts[cause.index()] += 1;
        }
    }

    let mut frequency: Vec<CauseCount> = Cause::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(cause, count)| CauseCount {
            cause: *cause,
            count,
        })
        .collect();

    frequency.sort_by_key(|c| std::cmp::Reverse(c.count));
    frequency
}

/// Project the month onto ISO-week rows of Monday..Sunday cells.
///
/// Rows are keyed by ISO year and week so early-January days that belong
/// to the previous year's last week still come first. Cells of days
/// outside the month stay [`CellState::NoData`].
pub fn week_grid(series: &MonthSeries, indicator: &IndicatorConfig) -> Vec<WeekRow> {
    let states = cell_states(series, indicator);
    let mut rows: Vec<WeekRow> = Vec::new();

    for (record, state) in series.records().iter().zip(states) {
        let iso = record.date.iso_week();
        let key = (iso.year(), iso.week());

        let needs_row = rows
            .last()
            .map(|row| (row.iso_year, row.week) != key)
            .unwrap_or(true);
        if needs_row {
            rows.push(WeekRow {
                iso_year: key.0,
                week: key.1,
                cells: [CellState::NoData; 7],
            });
        }

        if let Some(row) = rows.last_mut() {
            row.cells[record.weekday_index()] = state;
        }
    }

    rows
}

/// Non-compliant days furthest from target, worst first, at most `limit`.
pub fn largest_deviations(
    series: &MonthSeries,
    indicator: &IndicatorConfig,
    limit: usize,
) -> Vec<Deviation> {
    let mut deviations: Vec<Deviation> = series
        .with_data()
        .filter_map(|(record, value)| {
            let gap = match indicator.direction {
                Direction::LowerIsBetter => value - indicator.target,
                Direction::HigherIsBetter => indicator.target - value,
            };
            (gap > 0.0).then(|| Deviation {
                date: record.date,
                result: value,
                gap,
                cause: record.cause,
            })
        })
        .collect();

    deviations.sort_by(|a, b| {
        b.gap
            .partial_cmp(&a.gap)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.date.cmp(&b.date))
    });
    deviations.truncate(limit);
    deviations
}

/// Headline numbers of the month.
pub fn summarize(series: &MonthSeries, indicator: &IndicatorConfig) -> ComplianceSummary {
    let mean = mean_non_zero(series);
    let mut summary = ComplianceSummary {
        mean,
        mean_compliant: is_compliant(mean, indicator.target, indicator.direction),
        ..ComplianceSummary::default()
    };

    for flag in daily_compliance(series, indicator) {
        match flag {
            Some(true) => summary.compliant_days += 1,
            Some(false) => summary.non_compliant_days += 1,
            None => summary.no_data_days += 1,
        }
    }

    let with_data = summary.compliant_days + summary.non_compliant_days;
    if with_data > 0 {
        summary.compliance_rate = summary.compliant_days as f64 / with_data as f64 * 100.0;
    }

    summary
}

/// Every aggregate the chart producer and presenters need.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub summary: ComplianceSummary,
    pub daily: Vec<Option<bool>>,
    pub causes: Vec<CauseCount>,
    pub weeks: Vec<WeekRow>,
    pub deviations: Vec<Deviation>,
    pub max_result: Option<f64>,
    pub min_result: Option<f64>,
}

impl Aggregates {
    /// Compute every aggregate of the month.
    pub fn compute(
        series: &MonthSeries,
        indicator: &IndicatorConfig,
        max_deviations: usize,
    ) -> Self {
        Self {
            summary: summarize(series, indicator),
            daily: daily_compliance(series, indicator),
            causes: cause_frequency(series),
            weeks: week_grid(series, indicator),
            deviations: largest_deviations(series, indicator, max_deviations),
            max_result: max_result(series),
            min_result: min_result(series),
        }
    }
}

/// Generate a text summary of the month.
pub fn generate_summary_text(summary: &ComplianceSummary, causes: &[CauseCount]) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Mean: {:.2} {}",
        summary.mean,
        if summary.mean_compliant {
            CellState::Compliant.symbol()
        } else {
            CellState::NonCompliant.symbol()
        }
    ));
    lines.push(format!(
        "- {} Met: {}",
        CellState::Compliant.symbol(),
        summary.compliant_days
    ));
    lines.push(format!(
        "- {} Missed: {}",
        CellState::NonCompliant.symbol(),
        summary.non_compliant_days
    ));
    lines.push(format!(
        "- {} No data: {}",
        CellState::NoData.symbol(),
        summary.no_data_days
    ));
    lines.push(format!("Compliance rate: {:.1}%", summary.compliance_rate));

    if !causes.is_empty() {
        lines.push(String::new());
        lines.push("By Cause:".to_string());
        for c in causes {
            lines.push(format!("- {}: {}", c.cause, c.count));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{build_month_series, BuildOptions, DayInput};
    use chrono::{Datelike, NaiveDate};

    fn indicator(target: f64, direction: Direction) -> IndicatorConfig {
        IndicatorConfig {
            name: "Scrap".to_string(),
            target,
            direction,
        }
    }

    fn series_from(ind: &IndicatorConfig, year: i32, month: u32, entries: &[DayInput]) -> MonthSeries {
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        build_month_series(ind, first, entries, BuildOptions::default())
    }

    fn results(values: &[f64]) -> Vec<DayInput> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DayInput::new(i as u32 + 1, *v))
            .collect()
    }

    #[test]
    fn test_mean_non_zero() {
        let ind = indicator(10.0, Direction::LowerIsBetter);

        assert_eq!(mean_non_zero(&series_from(&ind, 2024, 4, &[])), 0.0);
        assert_eq!(
            mean_non_zero(&series_from(&ind, 2024, 4, &results(&[0.0, 0.0, 0.0]))),
            0.0
        );
        assert_eq!(
            mean_non_zero(&series_from(&ind, 2024, 4, &results(&[4.0, 0.0, 6.0]))),
            5.0
        );
    }

    #[test]
    fn test_is_compliant_lower_is_better() {
        assert!(is_compliant(9.9, 10.0, Direction::LowerIsBetter));
        assert!(is_compliant(10.0, 10.0, Direction::LowerIsBetter));
        assert!(!is_compliant(10.1, 10.0, Direction::LowerIsBetter));
    }

    #[test]
    fn test_is_compliant_higher_is_better() {
        assert!(!is_compliant(9.9, 10.0, Direction::HigherIsBetter));
        assert!(is_compliant(10.0, 10.0, Direction::HigherIsBetter));
        assert!(is_compliant(10.1, 10.0, Direction::HigherIsBetter));
    }

    #[test]
    fn test_is_compliant_is_monotonic() {
        let target = 5.0;
        let mut seen_non_compliant = false;
        for step in 0..100 {
            let value = step as f64 * 0.1;
            let ok = is_compliant(value, target, Direction::LowerIsBetter);
            if !ok {
                seen_non_compliant = true;
            }
            // once a value fails, every larger value fails too
            assert!(!(seen_non_compliant && ok));
        }
    }

    #[test]
    fn test_cause_frequency_sorted_and_excludes_no_data() {
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let entries = vec![
            DayInput::new(1, 12.0).with_cause(Cause::Methods),
            DayInput::new(2, 13.0).with_cause(Cause::Machinery),
            DayInput::new(3, 14.0).with_cause(Cause::Machinery),
            DayInput::new(4, 0.0).with_cause(Cause::Materials),
            DayInput::new(5, 15.0),
        ];
        let series = series_from(&ind, 2024, 4, &entries);
        let freq = cause_frequency(&series);

        assert_eq!(
            freq,
            vec![
                CauseCount {
                    cause: Cause::Machinery,
                    count: 2
                },
                CauseCount {
                    cause: Cause::Methods,
                    count: 1
                },
            ]
        );

        let tagged_with_data = series
            .with_data()
            .filter(|(r, _)| r.cause.is_some())
            .count();
        assert_eq!(freq.iter().map(|c| c.count).sum::<usize>(), tagged_with_data);
    }

    #[test]
    fn test_cause_frequency_ties_keep_vocabulary_order() {
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let entries = vec![
            DayInput::new(1, 12.0).with_cause(Cause::Measurement),
            DayInput::new(2, 12.0).with_cause(Cause::Materials),
        ];
        let freq = cause_frequency(&series_from(&ind, 2024, 4, &entries));
        assert_eq!(freq[0].cause, Cause::Materials);
        assert_eq!(freq[1].cause, Cause::Measurement);
    }

    #[test]
    fn test_week_grid_cells_match_data() {
        // April 2024 starts on a Monday
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let entries = results(&[5.0, 12.0, 0.0, 10.0]);
        let series = series_from(&ind, 2024, 4, &entries);
        let grid = week_grid(&series, &ind);

        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0].week, 14);
        assert_eq!(grid[0].cells[0], CellState::Compliant);
        assert_eq!(grid[0].cells[1], CellState::NonCompliant);
        assert_eq!(grid[0].cells[2], CellState::NoData);
        assert_eq!(grid[0].cells[3], CellState::Compliant);

        for record in series.records() {
            let iso = record.date.iso_week();
            let row = grid.iter().find(|r| r.week == iso.week()).unwrap();
            let cell = row.cells[record.weekday_index()];
            assert_eq!(cell == CellState::NoData, !record.has_data());
        }
    }

    #[test]
    fn test_week_grid_partial_weeks_do_not_fill_across_months() {
        // March 2024 starts on a Friday and ends on a Sunday
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let entries: Vec<DayInput> = (1..=31).map(|d| DayInput::new(d, 1.0)).collect();
        let grid = week_grid(&series_from(&ind, 2024, 3, &entries), &ind);

        assert_eq!(grid.first().unwrap().week, 9);
        assert_eq!(&grid[0].cells[..4], &[CellState::NoData; 4]);
        assert_eq!(&grid[0].cells[4..], &[CellState::Compliant; 3]);
        assert_eq!(grid.last().unwrap().cells, [CellState::Compliant; 7]);
    }

    #[test]
    fn test_week_grid_january_orders_previous_iso_year_first() {
        // 2021-01-01 is a Friday in ISO week 53 of 2020
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let grid = week_grid(&series_from(&ind, 2021, 1, &[]), &ind);

        assert_eq!((grid[0].iso_year, grid[0].week), (2020, 53));
        assert_eq!((grid[1].iso_year, grid[1].week), (2021, 1));
        assert!(grid.iter().all(|r| r.cells == [CellState::NoData; 7]));
    }

    #[test]
    fn test_largest_deviations() {
        let ind = indicator(10.0, Direction::HigherIsBetter);
        let entries = results(&[9.0, 4.0, 12.0, 7.0, 4.0]);
        let devs = largest_deviations(&series_from(&ind, 2024, 4, &entries), &ind, 3);

        assert_eq!(devs.len(), 3);
        assert_eq!(devs[0].gap, 6.0);
        assert_eq!(devs[0].date.day(), 2);
        assert_eq!(devs[1].date.day(), 5);
        assert_eq!(devs[2].result, 7.0);
    }

    #[test]
    fn test_summarize_counts() {
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let series = series_from(&ind, 2024, 4, &results(&[5.0, 12.0, 0.0]));
        let summary = summarize(&series, &ind);

        assert_eq!(summary.mean, 8.5);
        assert!(summary.mean_compliant);
        assert_eq!(summary.compliant_days, 1);
        assert_eq!(summary.non_compliant_days, 1);
        assert_eq!(summary.no_data_days, 28);
        assert_eq!(summary.compliance_rate, 50.0);
    }

    #[test]
    fn test_generate_summary_text() {
        let summary = ComplianceSummary {
            mean: 8.5,
            mean_compliant: true,
            compliant_days: 1,
            non_compliant_days: 1,
            no_data_days: 28,
            compliance_rate: 50.0,
        };
        let causes = vec![CauseCount {
            cause: Cause::Labor,
            count: 1,
        }];
        let text = generate_summary_text(&summary, &causes);

        assert!(text.contains("Mean: 8.50"));
        assert!(text.contains("Compliance rate: 50.0%"));
        assert!(text.contains("- Labor: 1"));
    }
}
