//! Report presenters: HTML dashboard, Markdown and JSON.

pub mod generator;
pub mod html;

pub use generator::*;
pub use html::*;

use crate::analysis::is_compliant;
use crate::models::{CellState, DailyRecord, IndicatorConfig};

/// Compliance state of one raw record.
pub(crate) fn record_state(record: &DailyRecord, indicator: &IndicatorConfig) -> CellState {
    match record.result {
        Some(value) if is_compliant(value, indicator.target, indicator.direction) => {
            CellState::Compliant
        }
        Some(_) => CellState::NonCompliant,
        None => CellState::NoData,
    }
}
