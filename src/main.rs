//! Dailyboard - daily management board for a monthly KPI
//!
//! A CLI tool that reads one month of daily results for an indicator,
//! checks every day against the monthly target and renders a dashboard
//! with a gauge, a control chart, a cause chart and a calendar heat-map.
//!
//! Exit codes:
//!   0 - Success (report written, or mean on target when --fail-on-miss is set)
//!   1 - Runtime error (invalid input, config, unwritable output, etc.)
//!   2 - Monthly mean misses the target and --fail-on-miss is set

mod analysis;
mod charts;
mod cli;
mod config;
mod input;
mod labels;
mod models;
mod pipeline;
mod report;
mod series;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::{CellState, IndicatorConfig};
use pipeline::PipelineOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Template file name used by --init-input when --input is not given.
const DEFAULT_INPUT_FILE: &str = "daily_input.toml";

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Handle --init-input early as well
    if let Some(ref month) = args.init_input {
        return handle_init_input(&args, month);
    }

    // Initialize logging
    init_logging(&args);

    info!("Dailyboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Build the report
    match run_report(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .dailyboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize language, colors, output and more.");
    Ok(())
}

/// Handle --init-input: write a blank input document for a month.
fn handle_init_input(args: &Args, month: &str) -> Result<()> {
    let path = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE));

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or choose another --input.",
            path.display()
        );
        std::process::exit(1);
    }

    let month = input::parse_month(month)?;
    let indicator = IndicatorConfig {
        name: args
            .indicator
            .clone()
            .unwrap_or_else(|| "Indicator".to_string()),
        target: args.target.unwrap_or(0.0),
        direction: args.direction.map(Into::into).unwrap_or_default(),
    };

    let content = input::month_template(month, &indicator)?;
    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "✅ Created {} for {}.",
        path.display(),
        month.format("%Y-%m")
    );
    println!("   Fill in the daily results, then run: dailyboard --input {}", path.display());
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete report workflow. Returns exit code (0 or 2).
fn run_report(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Read the month's data
    let input_path = args
        .input
        .clone()
        .context("No input file given (use --input)")?;
    println!("📥 Reading daily results: {}", input_path.display());
    let input = input::load(&input_path)?;
    info!(
        "Indicator '{}' for {} ({} entries)",
        input.indicator.name,
        input.month.format("%Y-%m"),
        input.days.len()
    );

    // Step 2: Compute aggregates and charts
    let options = PipelineOptions::from(&config);
    let report = pipeline::run(&input, &options);
    let summary = &report.summary;

    // Handle --dry-run: print the summary and exit
    if args.dry_run {
        return handle_dry_run(&report, args.fail_on_miss);
    }

    // Step 3: Render and save the report
    println!("📝 Generating {:?} report...", config.general.format);

    let output = match config.general.format {
        OutputFormat::Html => report::render_html_report(
            &report,
            &config.report.plotly_url,
            config.report.include_table,
        ),
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, config.report.include_table)
        }
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| config.default_output_path());
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Month Summary:");
    println!(
        "   Indicator: {} (target {}, {})",
        report.metadata.indicator.name,
        report.metadata.indicator.target,
        report.metadata.indicator.direction
    );
    println!(
        "   Days with data: {} / {}",
        report.metadata.days_with_data, report.metadata.days_in_month
    );
    println!(
        "   Mean: {:.2} {}",
        summary.mean,
        mean_symbol(summary.mean_compliant)
    );
    println!(
        "   - 🟢 Met: {} | 🔴 Missed: {} | ⚪ No data: {}",
        summary.compliant_days, summary.non_compliant_days, summary.no_data_days
    );
    for notice in &report.notices {
        warn!("{}", notice);
    }
    println!(
        "\n✅ Report complete! Saved to: {}",
        output_path.display()
    );

    Ok(exit_code(summary.mean_compliant, args.fail_on_miss))
}

/// Handle --dry-run: print the month summary without writing a report.
fn handle_dry_run(report: &models::Report, fail_on_miss: bool) -> Result<i32> {
    println!("\n🔍 Dry run: no report written.\n");

    println!(
        "{}",
        analysis::generate_summary_text(&report.summary, &report.causes)
    );

    println!("\n✅ Dry run complete.");
    Ok(exit_code(report.summary.mean_compliant, fail_on_miss))
}

fn mean_symbol(compliant: bool) -> &'static str {
    if compliant {
        CellState::Compliant.symbol()
    } else {
        CellState::NonCompliant.symbol()
    }
}

/// Exit code for a finished run.
fn exit_code(mean_compliant: bool, fail_on_miss: bool) -> i32 {
    if fail_on_miss && !mean_compliant {
        eprintln!("\n⛔ Monthly mean misses the target. Failing (exit code 2).");
        2
    } else {
        0
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
