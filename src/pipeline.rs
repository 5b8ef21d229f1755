//! Report pipeline.
//!
//! Input → series builder → aggregator → chart producer → [`Report`].
//! One call is one full, stateless recomputation.

use crate::analysis::Aggregates;
use crate::charts::{build_charts, Palette};
use crate::config::Config;
use crate::input::ReportInput;
use crate::labels::{Labels, Locale};
use crate::models::{Report, ReportMetadata};
use crate::series::{build_month_series, BuildOptions};
use chrono::Utc;
use tracing::{debug, info};

/// Settings that shape a report but not its data.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub build: BuildOptions,
    pub max_deviations: usize,
    pub locale: Locale,
    pub palette: Palette,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            build: BuildOptions::default(),
            max_deviations: 5,
            locale: Locale::default(),
            palette: Palette::default(),
        }
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            build: BuildOptions {
                zero_is_missing: config.report.zero_is_missing,
            },
            max_deviations: config.report.max_deviations,
            locale: config.report.locale,
            palette: config.palette.clone(),
        }
    }
}

/// Run the whole pipeline over one input document.
pub fn run(input: &ReportInput, options: &PipelineOptions) -> Report {
    let indicator = &input.indicator;
    let labels = Labels::new(options.locale);

    let series = build_month_series(indicator, input.month, &input.days, options.build);
    let aggregates = Aggregates::compute(&series, indicator, options.max_deviations);
    let charts = build_charts(
        indicator,
        &series,
        &aggregates,
        &options.palette,
        &labels,
    );

    let mut notices = Vec::new();
    if charts.trend.is_none() {
        info!("No day has data, control chart omitted");
        notices.push(labels.no_trend_data().to_string());
    }
    if charts.causes.is_none() {
        debug!("No cause recorded on a data day, cause chart omitted");
    }
    if charts.calendar.is_blank() {
        debug!("Calendar has no data cells");
    }

    let metadata = ReportMetadata {
        indicator: indicator.clone(),
        month: series.first_day(),
        days_in_month: series.len(),
        days_with_data: series.days_with_data(),
        locale: options.locale,
        generated_at: Utc::now(),
    };

    Report {
        metadata,
        summary: aggregates.summary,
        charts,
        causes: aggregates.causes,
        deviations: aggregates.deviations,
        records: series.records().to_vec(),
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input;
    use crate::models::{Cause, CellState, Direction, IndicatorConfig};
    use crate::series::DayInput;
    use chrono::NaiveDate;

    fn three_day_input(day_two_cause: Option<Cause>) -> ReportInput {
        ReportInput {
            indicator: IndicatorConfig {
                name: "Defects".to_string(),
                target: 10.0,
                direction: Direction::LowerIsBetter,
            },
            month: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            days: vec![
                DayInput::new(1, 5.0),
                DayInput {
                    day: 2,
                    result: Some(12.0),
                    cause: day_two_cause,
                },
                DayInput::new(3, 0.0),
            ],
        }
    }

    #[test]
    fn test_three_day_scenario() {
        let report = run(&three_day_input(None), &PipelineOptions::default());

        assert_eq!(report.summary.mean, 8.5);
        assert!(report.summary.mean_compliant);
        assert_eq!(report.charts.gauge.bar_color, "green");

        let first_week = &report.charts.calendar.rows[0];
        let flags: Vec<Option<bool>> = first_week.cells[..3]
            .iter()
            .map(|c| c.map(|v| v > 0))
            .collect();
        assert_eq!(flags, vec![Some(true), Some(false), None]);

        assert!(report.charts.causes.is_none());
        assert!(report.notices.is_empty());
        assert_eq!(report.deviations.len(), 1);
        assert_eq!(report.deviations[0].gap, 2.0);
    }

    #[test]
    fn test_three_day_scenario_with_cause() {
        let report = run(
            &three_day_input(Some(Cause::Methods)),
            &PipelineOptions::default(),
        );
        let causes = report.charts.causes.expect("cause chart");
        assert_eq!(causes.bars.len(), 1);
        assert_eq!(causes.bars[0].cause, Cause::Methods);
        assert_eq!(causes.bars[0].count, 1);
    }

    #[test]
    fn test_all_zero_month() {
        let mut input = three_day_input(None);
        input.days = (1..=30).map(|d| DayInput::new(d, 0.0)).collect();

        let report = run(&input, &PipelineOptions::default());

        assert_eq!(report.charts.gauge.value, 0.0);
        assert!(report.charts.trend.is_none());
        assert!(report.charts.causes.is_none());
        assert!(report.charts.calendar.is_blank());
        assert_eq!(
            report.notices,
            vec!["Not enough data to show the control chart.".to_string()]
        );
        assert_eq!(report.metadata.days_with_data, 0);
        assert_eq!(report.summary.no_data_days, 30);
    }

    #[test]
    fn test_zero_counts_as_data_when_configured() {
        let mut options = PipelineOptions::default();
        options.build.zero_is_missing = false;

        let report = run(&three_day_input(None), &options);
        assert!((report.summary.mean - 17.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.metadata.days_with_data, 3);
        assert_eq!(report.charts.trend.map(|t| t.points.len()), Some(3));
    }

    #[test]
    fn test_partly_filled_template_with_zero_as_data() {
        let indicator = IndicatorConfig {
            name: "OEE".to_string(),
            target: 85.0,
            direction: Direction::HigherIsBetter,
        };
        let month = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let template = input::month_template(month, &indicator).unwrap();
        let filled = template.replacen("day = 1\n", "day = 1\nresult = 90.0\n", 1);
        assert_ne!(filled, template);

        let mut options = PipelineOptions::default();
        options.build.zero_is_missing = false;
        let report = run(&input::from_toml_str(&filled).unwrap(), &options);

        assert_eq!(report.metadata.days_with_data, 1);
        assert_eq!(report.summary.mean, 90.0);
        assert!(report.summary.mean_compliant);
        assert_eq!(report.summary.no_data_days, 29);
    }

    #[test]
    fn test_spanish_notice() {
        let options = PipelineOptions {
            locale: Locale::Es,
            ..PipelineOptions::default()
        };
        let mut input = three_day_input(None);
        input.days.clear();

        let report = run(&input, &options);
        assert_eq!(
            report.notices[0],
            "No hay suficientes datos para mostrar el gráfico de control."
        );
        assert_eq!(report.charts.gauge.title, "Media del Indicador (Defects)");
    }

    #[test]
    fn test_sample_fixture_end_to_end() {
        let input = input::from_toml_str(include_str!("../fixtures/sample_month.toml")).unwrap();
        let report = run(&input, &PipelineOptions::default());

        assert_eq!(report.metadata.days_in_month, 31);
        assert_eq!(report.metadata.days_with_data, 10);
        assert!(report.summary.mean > 2.5);
        assert!(!report.summary.mean_compliant);
        assert_eq!(report.charts.gauge.bar_color, "red");
        assert_eq!(report.summary.non_compliant_days, 4);

        let causes = report.charts.causes.expect("cause chart");
        assert_eq!(causes.bars[0].cause, Cause::Machinery);
        assert_eq!(causes.bars[0].count, 2);

        assert_eq!(report.deviations[0].result, 3.4);
        assert_eq!(
            report.records.iter().filter(|r| r.has_data()).count(),
            report.metadata.days_with_data
        );

        let states: Vec<CellState> = report.charts.calendar.rows[0]
            .cells
            .iter()
            .map(|c| CellState::decode(*c))
            .collect();
        // 2024-03-01 is a Friday
        assert_eq!(states[4], CellState::Compliant);
        assert_eq!(states[5], CellState::NoData);
    }
}
