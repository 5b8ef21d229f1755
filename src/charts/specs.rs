//! Chart specifications.
//!
//! Each builder is a total function over already-validated data: it picks
//! axis ranges, series values and colors, and nothing else.

use super::{ChartSet, Palette};
use crate::analysis::Aggregates;
use crate::labels::Labels;
use crate::models::{Cause, CauseCount, IndicatorConfig, MonthSeries, WeekRow};
use chrono::NaiveDate;
use serde::Serialize;

/// Gauge of the monthly mean against the target.
///
/// The bar is painted `palette.ok` when the mean complies and
/// `palette.alert` when it does not; `compliant` records which one applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSpec {
    pub title: String,
    pub value: f64,
    pub axis_range: [f64; 2],
    /// Threshold marker position.
    pub target: f64,
    pub threshold_color: String,
    /// Shaded band from 0 to the target.
    pub band: [f64; 2],
    pub band_color: String,
    pub compliant: bool,
    pub bar_color: String,
}

/// One plotted day of the control chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub compliant: bool,
    pub color: String,
}

/// Control chart: daily points, a line through them and the target line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<TrendPoint>,
    pub points_name: String,
    pub line_name: String,
    pub line_color: String,
    pub target: f64,
    pub target_label: String,
    pub target_color: String,
}

/// One horizontal bar of the cause chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseBar {
    pub cause: Cause,
    pub label: String,
    pub count: usize,
}

/// Horizontal bars of cause frequency, most frequent on top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseBarSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bars: Vec<CauseBar>,
}

/// One week row of the calendar heat-map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarRow {
    pub label: String,
    pub iso_year: i32,
    pub week: u32,
    /// +1 compliant, -1 non-compliant, null no data; Monday first.
    pub cells: [Option<i8>; 7],
}

/// Week × weekday heat-map on a three-point color scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub weekdays: Vec<String>,
    pub rows: Vec<CalendarRow>,
    /// (position, color) stops for z in [-1, 1]: alert, neutral, ok.
    pub color_scale: Vec<(f64, String)>,
    pub z_range: [f64; 2],
}

impl CalendarSpec {
    /// Whether no cell carries data.
    pub fn is_blank(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(|cell| cell.is_none()))
    }
}

/// Build the gauge of the monthly mean.
pub fn gauge_spec(
    indicator: &IndicatorConfig,
    aggregates: &Aggregates,
    palette: &Palette,
    labels: &Labels,
) -> GaugeSpec {
    let target = indicator.target;
    let lower = aggregates.min_result.unwrap_or(0.0).min(0.0).min(target);
    let mut upper = aggregates.max_result.unwrap_or(0.0).max(target);
    if upper <= lower {
        upper = lower + 1.0;
    }

    let compliant = aggregates.summary.mean_compliant;

    GaugeSpec {
        title: labels.gauge_title(&indicator.name),
        value: aggregates.summary.mean,
        axis_range: [lower, upper],
        target,
        threshold_color: palette.threshold.clone(),
        band: [target.min(0.0), target.max(0.0)],
        band_color: palette.target_band.clone(),
        compliant,
        bar_color: palette.for_compliance(compliant).to_string(),
    }
}

/// Build the control chart, or `None` when no day has data.
pub fn trend_spec(
    indicator: &IndicatorConfig,
    series: &MonthSeries,
    aggregates: &Aggregates,
    palette: &Palette,
    labels: &Labels,
) -> Option<TrendSpec> {
    let points: Vec<TrendPoint> = series
        .records()
        .iter()
        .zip(&aggregates.daily)
        .filter_map(|(record, flag)| {
            let value = record.result?;
            let compliant = (*flag)?;
            Some(TrendPoint {
                date: record.date,
                value,
                compliant,
                color: palette.for_compliance(compliant).to_string(),
            })
        })
        .collect();

    if points.is_empty() {
        return None;
    }

    Some(TrendSpec {
        title: labels.control_title(&indicator.name),
        x_title: labels.day_axis().to_string(),
        y_title: labels.result_axis().to_string(),
        points,
        points_name: labels.daily_result().to_string(),
        line_name: labels.daily_trend().to_string(),
        line_color: palette.trend_line.clone(),
        target: indicator.target,
        target_label: labels.target().to_string(),
        target_color: palette.target_line.clone(),
    })
}

/// Build the cause chart, or `None` when no data day carries a cause.
pub fn cause_bar_spec(causes: &[CauseCount], labels: &Labels) -> Option<CauseBarSpec> {
    if causes.is_empty() {
        return None;
    }

    Some(CauseBarSpec {
        title: labels.causes_title().to_string(),
        x_title: labels.frequency_axis().to_string(),
        y_title: labels.causes_axis().to_string(),
        bars: causes
            .iter()
            .map(|c| CauseBar {
                cause: c.cause,
                label: labels.cause(c.cause).to_string(),
                count: c.count,
            })
            .collect(),
    })
}

/// Build the calendar heat-map.
pub fn calendar_spec(
    indicator: &IndicatorConfig,
    weeks: &[WeekRow],
    palette: &Palette,
    labels: &Labels,
) -> CalendarSpec {
    let rows = weeks
        .iter()
        .map(|week| CalendarRow {
            label: labels.week_label(week.week),
            iso_year: week.iso_year,
            week: week.week,
            cells: week.cells.map(|cell| cell.encode()),
        })
        .collect();

    CalendarSpec {
        title: labels.calendar_title(&indicator.name),
        x_title: labels.weekday_axis().to_string(),
        y_title: labels.week_axis().to_string(),
        weekdays: labels.weekdays().iter().map(|d| d.to_string()).collect(),
        rows,
        color_scale: vec![
            (0.0, palette.alert.clone()),
            (0.5, palette.neutral.clone()),
            (1.0, palette.ok.clone()),
        ],
        z_range: [-1.0, 1.0],
    }
}

/// Build all four charts of the board.
pub fn build_charts(
    indicator: &IndicatorConfig,
    series: &MonthSeries,
    aggregates: &Aggregates,
    palette: &Palette,
    labels: &Labels,
) -> ChartSet {
    ChartSet {
        gauge: gauge_spec(indicator, aggregates, palette, labels),
        trend: trend_spec(indicator, series, aggregates, palette, labels),
        causes: cause_bar_spec(&aggregates.causes, labels),
        calendar: calendar_spec(indicator, &aggregates.weeks, palette, labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Locale;
    use crate::models::Direction;
    use crate::series::{build_month_series, BuildOptions, DayInput};

    fn indicator(target: f64, direction: Direction) -> IndicatorConfig {
        IndicatorConfig {
            name: "OEE".to_string(),
            target,
            direction,
        }
    }

    fn charts_for(ind: &IndicatorConfig, entries: &[DayInput]) -> ChartSet {
        let first = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let series = build_month_series(ind, first, entries, BuildOptions::default());
        let aggregates = Aggregates::compute(&series, ind, 5);
        build_charts(
            ind,
            &series,
            &aggregates,
            &Palette::default(),
            &Labels::new(Locale::En),
        )
    }

    #[test]
    fn test_gauge_ok_color_when_mean_complies() {
        let ind = indicator(80.0, Direction::HigherIsBetter);
        let charts = charts_for(&ind, &[DayInput::new(1, 85.0), DayInput::new(2, 90.0)]);

        assert!(charts.gauge.compliant);
        assert_eq!(charts.gauge.bar_color, "green");
        assert_eq!(charts.gauge.value, 87.5);
        assert_eq!(charts.gauge.axis_range, [0.0, 90.0]);
        assert_eq!(charts.gauge.target, 80.0);
        assert_eq!(charts.gauge.band, [0.0, 80.0]);
    }

    #[test]
    fn test_gauge_alert_color_when_mean_misses() {
        let ind = indicator(2.0, Direction::LowerIsBetter);
        let charts = charts_for(&ind, &[DayInput::new(1, 3.0)]);

        assert!(!charts.gauge.compliant);
        assert_eq!(charts.gauge.bar_color, "red");
        assert_eq!(charts.gauge.axis_range, [0.0, 3.0]);
    }

    #[test]
    fn test_gauge_range_never_empty() {
        let ind = indicator(0.0, Direction::LowerIsBetter);
        let charts = charts_for(&ind, &[]);
        assert_eq!(charts.gauge.axis_range, [0.0, 1.0]);
        assert_eq!(charts.gauge.value, 0.0);
    }

    #[test]
    fn test_trend_points_skip_no_data_days() {
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let charts = charts_for(
            &ind,
            &[
                DayInput::new(1, 5.0),
                DayInput::new(2, 12.0),
                DayInput::new(3, 0.0),
            ],
        );
        let trend = charts.trend.expect("trend chart");

        assert_eq!(trend.points.len(), 2);
        assert!(trend.points[0].compliant);
        assert_eq!(trend.points[0].color, "green");
        assert!(!trend.points[1].compliant);
        assert_eq!(trend.points[1].color, "red");
        assert_eq!(trend.target, 10.0);
        assert_eq!(trend.title, "Control chart of OEE");
    }

    #[test]
    fn test_empty_month_omits_trend_and_causes() {
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let charts = charts_for(&ind, &[DayInput::new(1, 0.0).with_cause(Cause::Labor)]);

        assert!(charts.trend.is_none());
        assert!(charts.causes.is_none());
        assert!(charts.calendar.is_blank());
        assert_eq!(charts.calendar.rows.len(), 5);
    }

    #[test]
    fn test_cause_bars_in_frequency_order() {
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let charts = charts_for(
            &ind,
            &[
                DayInput::new(1, 11.0).with_cause(Cause::Methods),
                DayInput::new(2, 11.0).with_cause(Cause::Measurement),
                DayInput::new(3, 11.0).with_cause(Cause::Measurement),
            ],
        );
        let bars = charts.causes.expect("cause chart").bars;

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].cause, Cause::Measurement);
        assert_eq!(bars[0].count, 2);
        assert_eq!(bars[1].label, "Methods");
    }

    #[test]
    fn test_calendar_encoding_and_scale() {
        let ind = indicator(10.0, Direction::LowerIsBetter);
        let charts = charts_for(&ind, &[DayInput::new(1, 5.0), DayInput::new(2, 15.0)]);
        let calendar = charts.calendar;

        assert_eq!(calendar.rows[0].label, "Week 14");
        assert_eq!(calendar.rows[0].cells[0], Some(1));
        assert_eq!(calendar.rows[0].cells[1], Some(-1));
        assert_eq!(calendar.rows[0].cells[2], None);
        assert_eq!(calendar.weekdays.len(), 7);
        assert_eq!(calendar.color_scale[0], (0.0, "red".to_string()));
        assert_eq!(calendar.color_scale[2], (1.0, "green".to_string()));
        assert!(!calendar.is_blank());
    }
}
