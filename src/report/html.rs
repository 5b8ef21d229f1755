//! HTML dashboard generation.
//!
//! Produces one self-contained page: inline CSS, the four Plotly figures
//! embedded as JSON, and the tables of the Markdown report. Only the
//! Plotly script itself is loaded from `plotly_url`.

use super::record_state;
use crate::charts::plotly::{calendar_figure, causes_figure, gauge_figure, trend_figure};
use crate::labels::{Labels, Locale};
use crate::models::{CellState, Report};
use serde_json::Value;

/// Render a report as an HTML dashboard.
pub fn render_html_report(report: &Report, plotly_url: &str, include_table: bool) -> String {
    let labels = Labels::new(report.metadata.locale);
    let indicator = &report.metadata.indicator;

    let mut figures: Vec<(&str, Value)> = vec![("gauge", gauge_figure(&report.charts.gauge))];
    let trend = match report.charts.trend {
        Some(ref spec) => {
            figures.push(("trend", trend_figure(spec)));
            r#"<div id="trend" class="chart"></div>"#.to_string()
        }
        None => render_notices(&report.notices),
    };
    let causes = match report.charts.causes {
        Some(ref spec) => {
            figures.push(("causes", causes_figure(spec)));
            r#"<div id="causes" class="chart"></div>"#.to_string()
        }
        None => String::new(),
    };
    figures.push(("calendar", calendar_figure(&report.charts.calendar)));

    let table = if include_table {
        render_data_table(report, &labels)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
    <script src="{plotly_url}"></script>
</head>
<body>
    <div class="container">
        <header>
            <h1>{name}</h1>
            <p class="meta">{month_label}: {month} · {target_label}: {target} ({direction}) · {days_label}: {days_with_data} / {days_in_month}</p>
        </header>
        <section>
            <h2>{tracking}</h2>
            <div class="row">
                <div id="gauge" class="chart"></div>
                {trend}
            </div>
        </section>
        <section>
            <h2>{causes_heading}</h2>
            <div class="row">
                {causes}
                {deviations}
            </div>
        </section>
        <section>
            <div id="calendar" class="chart wide"></div>
        </section>
        {table}
        <footer>dailyboard v{version} · {generated}</footer>
    </div>
    <script>
{script}
    </script>
</body>
</html>"#,
        lang = match report.metadata.locale {
            Locale::En => "en",
            Locale::Es => "es",
        },
        title = html_escape(&labels.gauge_title(&indicator.name)),
        css = inline_css(),
        plotly_url = html_escape(plotly_url),
        name = html_escape(&indicator.name),
        month_label = labels.month(),
        month = report.metadata.month.format("%Y-%m"),
        target_label = labels.target(),
        target = indicator.target,
        direction = labels.direction(indicator.direction),
        days_label = labels.days_with_data(),
        days_with_data = report.metadata.days_with_data,
        days_in_month = report.metadata.days_in_month,
        tracking = labels.daily_tracking(),
        trend = trend,
        causes_heading = labels.causes_section(),
        causes = causes,
        deviations = render_deviations(report, &labels),
        table = table,
        version = env!("CARGO_PKG_VERSION"),
        generated = report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        script = render_plot_script(&figures),
    )
}

/// Fallback boxes shown in place of an omitted chart.
fn render_notices(notices: &[String]) -> String {
    notices
        .iter()
        .map(|n| format!(r#"<div class="notice">{}</div>"#, html_escape(n)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the largest-deviation table.
fn render_deviations(report: &Report, labels: &Labels) -> String {
    if report.deviations.is_empty() {
        return String::new();
    }

    let rows: String = report
        .deviations
        .iter()
        .map(|d| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>\n",
                d.date.format("%Y-%m-%d"),
                d.result,
                d.gap,
                d.cause.map(|c| labels.cause(c)).unwrap_or("-")
            )
        })
        .collect();

    format!(
        r#"<table class="deviations">
<thead><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
        labels.day_axis(),
        labels.result_axis(),
        labels.gap(),
        labels.causes_axis(),
        rows
    )
}

/// Render the entered-data table.
fn render_data_table(report: &Report, labels: &Labels) -> String {
    let weekdays = labels.weekdays();
    let rows: String = report
        .records
        .iter()
        .map(|record| {
            let state = record_state(record, &report.metadata.indicator);
            format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} {}</td></tr>\n",
                state_class(state),
                record.date.format("%Y-%m-%d"),
                weekdays[record.weekday_index()],
                record
                    .result
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record.cause.map(|c| labels.cause(c)).unwrap_or(""),
                state.symbol(),
                labels.cell(state)
            )
        })
        .collect();

    format!(
        r#"<section>
            <h2>{}</h2>
            <table class="data">
<thead><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr></thead>
<tbody>
{}</tbody>
            </table>
        </section>"#,
        labels.entered_data(),
        labels.day_axis(),
        labels.weekday_axis(),
        labels.result_axis(),
        labels.causes_axis(),
        labels.status(),
        rows
    )
}

fn state_class(state: CellState) -> &'static str {
    match state {
        CellState::Compliant => "ok",
        CellState::NonCompliant => "miss",
        CellState::NoData => "empty",
    }
}

/// One `Plotly.newPlot` call per rendered chart.
fn render_plot_script(figures: &[(&str, Value)]) -> String {
    figures
        .iter()
        .map(|(id, figure)| {
            format!(
                "        (function () {{ var fig = {}; Plotly.newPlot(\"{}\", fig.data, fig.layout, {{\"responsive\": true}}); }})();",
                script_json(figure),
                id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a figure for a `<script>` body; `</` cannot appear inside it.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline_css() -> &'static str {
    r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f5f6f8; color: #222; }
.container { max-width: 1200px; margin: 0 auto; padding: 24px; }
header h1 { margin-bottom: 4px; }
.meta { color: #666; margin-top: 0; }
section { background: #fff; border-radius: 8px; padding: 16px; margin-bottom: 16px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.row { display: flex; flex-wrap: wrap; gap: 16px; }
.row > * { flex: 1 1 480px; }
.chart { min-height: 420px; }
.chart.wide { width: 100%; }
.notice { padding: 16px; border-left: 4px solid #f0ad4e; background: #fff8e6; align-self: center; }
table { border-collapse: collapse; width: 100%; font-size: 14px; }
th, td { padding: 6px 10px; border-bottom: 1px solid #e5e5e5; text-align: left; }
th { background: #fafafa; }
tr.miss td { background: #fdecea; }
tr.empty td { color: #999; }
footer { color: #999; font-size: 12px; text-align: center; margin-top: 24px; }
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input;
    use crate::pipeline::{self, PipelineOptions};

    const PLOTLY: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

    fn sample_report() -> Report {
        let input = input::from_toml_str(include_str!("../../fixtures/sample_month.toml")).unwrap();
        pipeline::run(&input, &PipelineOptions::default())
    }

    #[test]
    fn test_render_full_dashboard() {
        let html = render_html_report(&sample_report(), PLOTLY, true);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(&format!(r#"<script src="{}"></script>"#, PLOTLY)));
        for id in ["gauge", "trend", "causes", "calendar"] {
            assert!(html.contains(&format!(r#"<div id="{}""#, id)));
            assert!(html.contains(&format!("Plotly.newPlot(\"{}\"", id)));
        }
        assert!(html.contains("<h2>Entered data</h2>"));
        assert!(html.contains("<td>2024-03-11</td><td>3.4</td><td>0.90</td><td>Machinery</td>"));
    }

    #[test]
    fn test_empty_month_shows_notice() {
        let mut input = input::from_toml_str(include_str!("../../fixtures/sample_month.toml")).unwrap();
        input.days.clear();
        let report = pipeline::run(&input, &PipelineOptions::default());
        let html = render_html_report(&report, PLOTLY, false);

        assert!(html.contains(r#"<div class="notice">Not enough data to show the control chart.</div>"#));
        assert!(!html.contains(r#"<div id="trend""#));
        assert!(!html.contains(r#"<div id="causes""#));
        assert!(html.contains("Plotly.newPlot(\"gauge\""));
        assert!(html.contains("Plotly.newPlot(\"calendar\""));
        assert!(!html.contains("<table class=\"data\">"));
    }

    #[test]
    fn test_indicator_name_is_escaped() {
        let mut report = sample_report();
        report.metadata.indicator.name = "<script>alert('x')</script>".to_string();
        report.charts.gauge.title = report.metadata.indicator.name.clone();
        let html = render_html_report(&report, PLOTLY, false);

        assert!(html.contains("<h1>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</h1>"));
        assert!(!html.contains("alert('x')</script>"));
    }

    #[test]
    fn test_script_json_breaks_closing_tags() {
        let value = serde_json::json!({ "text": "</script>" });
        assert_eq!(script_json(&value), r#"{"text":"<\/script>"}"#);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"q\""), "&quot;q&quot;");
    }
}
