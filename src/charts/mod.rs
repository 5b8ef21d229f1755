//! Chart data production.
//!
//! Turns the aggregates of a month into four independent, renderer-agnostic
//! chart specifications, and converts those into Plotly figures for the
//! HTML presenter.

pub mod plotly;
pub mod specs;

pub use specs::*;

use serde::{Deserialize, Serialize};

/// Colors used across all charts.
///
/// Missing keys in the `[palette]` config table fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Compliant values.
    pub ok: String,
    /// Non-compliant values.
    pub alert: String,
    /// Calendar cells without data.
    pub neutral: String,
    /// Gauge threshold marker.
    pub threshold: String,
    /// Gauge band from 0 to target.
    pub target_band: String,
    /// Trend line connecting the daily points.
    pub trend_line: String,
    /// Horizontal target reference line.
    pub target_line: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            ok: "green".to_string(),
            alert: "red".to_string(),
            neutral: "white".to_string(),
            threshold: "red".to_string(),
            target_band: "lightblue".to_string(),
            trend_line: "blue".to_string(),
            target_line: "black".to_string(),
        }
    }
}

impl Palette {
    /// Color for a compliance flag.
    pub fn for_compliance(&self, compliant: bool) -> &str {
        if compliant {
            &self.ok
        } else {
            &self.alert
        }
    }
}

/// The four charts of the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub gauge: GaugeSpec,
    /// Absent when no day has data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendSpec>,
    /// Absent when no data day carries a cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causes: Option<CauseBarSpec>,
    pub calendar: CalendarSpec,
}
