//! Markdown and JSON report generation.
//!
//! The Markdown report mirrors the dashboard as text: headline numbers,
//! the calendar grid drawn with symbols, the cause ranking, the largest
//! deviations and the raw daily table.

use super::record_state;
use crate::charts::CalendarSpec;
use crate::labels::Labels;
use crate::models::{CellState, ComplianceSummary, Deviation, Report, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, include_table: bool) -> String {
    let labels = Labels::new(report.metadata.locale);
    let mut output = String::new();

    // Title
    output.push_str(&format!(
        "# {}\n\n",
        escape_pipes(&labels.gauge_title(&report.metadata.indicator.name))
    ));

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata, &labels));

    // Headline numbers
    output.push_str(&generate_summary_section(&report.summary, &labels));

    // Fallback messages for omitted charts
    for notice in &report.notices {
        output.push_str(&format!("> ⚠️ {}\n\n", notice));
    }

    // Calendar
    output.push_str(&generate_calendar_section(&report.charts.calendar, &labels));

    // Causes and deviations
    output.push_str(&generate_causes_section(report, &labels));

    // Raw data
    if include_table {
        output.push_str(&generate_data_table(report, &labels));
    }

    // Footer
    output.push_str(&generate_footer(report));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, labels: &Labels) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "- **{}:** {}\n",
        labels.month(),
        metadata.month.format("%Y-%m")
    ));
    section.push_str(&format!(
        "- **{}:** {} ({})\n",
        labels.target(),
        metadata.indicator.target,
        labels.direction(metadata.indicator.direction)
    ));
    section.push_str(&format!(
        "- **{}:** {} / {}\n",
        labels.days_with_data(),
        metadata.days_with_data,
        metadata.days_in_month
    ));
    section.push('\n');

    section
}

/// Generate the headline numbers table.
fn generate_summary_section(summary: &ComplianceSummary, labels: &Labels) -> String {
    let mut section = String::new();
    let mean_state = if summary.mean_compliant {
        CellState::Compliant
    } else {
        CellState::NonCompliant
    };

    section.push_str(&format!("## {}\n\n", labels.daily_tracking()));
    section.push_str(&format!(
        "| {} | {} {} | {} {} | {} {} | {} |\n",
        labels.mean(),
        CellState::Compliant.symbol(),
        labels.cell(CellState::Compliant),
        CellState::NonCompliant.symbol(),
        labels.cell(CellState::NonCompliant),
        CellState::NoData.symbol(),
        labels.cell(CellState::NoData),
        labels.compliance_rate(),
    ));
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} **{:.2}** | {} | {} | {} | {:.1}% |\n\n",
        mean_state.symbol(),
        summary.mean,
        summary.compliant_days,
        summary.non_compliant_days,
        summary.no_data_days,
        summary.compliance_rate
    ));

    section
}

/// Generate the calendar grid, one row per ISO week.
fn generate_calendar_section(calendar: &CalendarSpec, labels: &Labels) -> String {
    let mut section = String::new();

    section.push_str(&format!("### {}\n\n", escape_pipes(&calendar.title)));
    section.push_str(&format!("| {} |", escape_pipes(&calendar.y_title)));
    for day in &calendar.weekdays {
        section.push_str(&format!(" {} |", escape_pipes(day)));
    }
    section.push('\n');
    section.push_str("|:---|");
    section.push_str(&":---:|".repeat(calendar.weekdays.len()));
    section.push('\n');

    for row in &calendar.rows {
        section.push_str(&format!("| {} |", escape_pipes(&row.label)));
        for cell in &row.cells {
            section.push_str(&format!(" {} |", CellState::decode(*cell).symbol()));
        }
        section.push('\n');
    }

    section.push_str(&format!(
        "\n{} {} · {} {} · {} {}\n\n",
        CellState::Compliant.symbol(),
        labels.cell(CellState::Compliant),
        CellState::NonCompliant.symbol(),
        labels.cell(CellState::NonCompliant),
        CellState::NoData.symbol(),
        labels.cell(CellState::NoData),
    ));

    section
}

/// Generate the cause ranking and the largest-deviation list.
fn generate_causes_section(report: &Report, labels: &Labels) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", labels.causes_section()));

    if let Some(ref causes) = report.charts.causes {
        section.push_str(&format!("### {}\n\n", escape_pipes(&causes.title)));
        section.push_str(&format!(
            "| {} | {} |\n",
            escape_pipes(&causes.y_title),
            escape_pipes(&causes.x_title)
        ));
        section.push_str("|:---|:---:|\n");
        for bar in &causes.bars {
            section.push_str(&format!("| {} | {} |\n", escape_pipes(&bar.label), bar.count));
        }
        section.push('\n');
    }

    if !report.deviations.is_empty() {
        section.push_str(&generate_deviations_table(&report.deviations, labels));
    }

    if report.charts.causes.is_none() && report.deviations.is_empty() {
        // Nothing missed: either every measured day met the target or nothing was measured.
        let state = if report.metadata.days_with_data > 0 {
            CellState::Compliant
        } else {
            CellState::NoData
        };
        section.push_str(&format!("{} {}\n\n", state.symbol(), labels.cell(state)));
    }

    section
}

/// Generate the deviations table.
fn generate_deviations_table(deviations: &[Deviation], labels: &Labels) -> String {
    let mut table = String::new();

    table.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        labels.day_axis(),
        labels.result_axis(),
        labels.gap(),
        labels.causes_axis()
    ));
    table.push_str("|:---|:---:|:---:|:---|\n");
    for d in deviations {
        table.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            d.date.format("%Y-%m-%d"),
            d.result,
            d.gap,
            d.cause.map(|c| labels.cause(c)).unwrap_or("-")
        ));
    }
    table.push('\n');

    table
}

/// Generate the entered-data table.
fn generate_data_table(report: &Report, labels: &Labels) -> String {
    let mut section = String::new();
    let weekdays = labels.weekdays();

    section.push_str(&format!("## {}\n\n", labels.entered_data()));
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n",
        labels.day_axis(),
        labels.weekday_axis(),
        labels.result_axis(),
        labels.causes_axis(),
        labels.status()
    ));
    section.push_str("|:---|:---|:---:|:---|:---:|\n");

    for record in &report.records {
        let state = record_state(record, &report.metadata.indicator);
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} {} |\n",
            record.date.format("%Y-%m-%d"),
            weekdays[record.weekday_index()],
            record
                .result
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            record.cause.map(|c| labels.cause(c)).unwrap_or(""),
            state.symbol(),
            labels.cell(state)
        ));
    }
    section.push('\n');

    section
}

/// Escape `|` so user text cannot split a table row.
fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer(report: &Report) -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by dailyboard v{} on {}*\n",
        env!("CARGO_PKG_VERSION"),
        report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
