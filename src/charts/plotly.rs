//! Plotly figure conversion.
//!
//! Each function returns a `{ "data": [...], "layout": {...} }` object that
//! `Plotly.newPlot` accepts as-is.

use super::specs::{CalendarSpec, CauseBarSpec, GaugeSpec, TrendSpec};
use serde_json::{json, Value};

const GAUGE_HEIGHT: u32 = 450;
const CAUSES_HEIGHT: u32 = 450;

/// Gauge figure: number plus gauge with target band and threshold marker.
pub fn gauge_figure(spec: &GaugeSpec) -> Value {
    json!({
        "data": [{
            "type": "indicator",
            "mode": "gauge+number",
            "value": spec.value,
            "domain": { "x": [0, 1], "y": [0, 1] },
            "title": { "text": spec.title },
            "gauge": {
                "axis": { "range": spec.axis_range },
                "bar": { "color": spec.bar_color },
                "steps": [{ "range": spec.band, "color": spec.band_color }],
                "threshold": {
                    "line": { "color": spec.threshold_color, "width": 4 },
                    "thickness": 0.75,
                    "value": spec.target
                }
            }
        }],
        "layout": { "height": GAUGE_HEIGHT }
    })
}

/// Control chart figure: colored markers, trend line and dashed target line.
pub fn trend_figure(spec: &TrendSpec) -> Value {
    let dates: Vec<String> = spec
        .points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();
    let values: Vec<f64> = spec.points.iter().map(|p| p.value).collect();
    let colors: Vec<&str> = spec.points.iter().map(|p| p.color.as_str()).collect();

    json!({
        "data": [
            {
                "type": "scatter",
                "mode": "markers",
                "name": spec.points_name,
                "x": dates,
                "y": values,
                "marker": { "color": colors, "size": 10 }
            },
            {
                "type": "scatter",
                "mode": "lines",
                "name": spec.line_name,
                "x": dates,
                "y": values,
                "line": { "color": spec.line_color }
            }
        ],
        "layout": {
            "title": { "text": spec.title },
            "xaxis": { "title": { "text": spec.x_title } },
            "yaxis": { "title": { "text": spec.y_title } },
            "shapes": [{
                "type": "line",
                "xref": "paper",
                "x0": 0,
                "x1": 1,
                "yref": "y",
                "y0": spec.target,
                "y1": spec.target,
                "line": { "color": spec.target_color, "dash": "dash" }
            }],
            "annotations": [{
                "xref": "paper",
                "x": 1,
                "yref": "y",
                "y": spec.target,
                "text": spec.target_label,
                "showarrow": false,
                "xanchor": "right",
                "yanchor": "bottom"
            }]
        }
    })
}

/// Horizontal bar figure, most frequent cause on top.
pub fn causes_figure(spec: &CauseBarSpec) -> Value {
    let counts: Vec<usize> = spec.bars.iter().map(|b| b.count).collect();
    let labels: Vec<&str> = spec.bars.iter().map(|b| b.label.as_str()).collect();

    json!({
        "data": [{
            "type": "bar",
            "orientation": "h",
            "x": counts,
            "y": labels
        }],
        "layout": {
            "title": { "text": spec.title },
            "xaxis": { "title": { "text": spec.x_title } },
            "yaxis": { "title": { "text": spec.y_title }, "autorange": "reversed" },
            "height": CAUSES_HEIGHT
        }
    })
}

/// Calendar heat-map figure; null cells render blank.
pub fn calendar_figure(spec: &CalendarSpec) -> Value {
    let z: Vec<&[Option<i8>; 7]> = spec.rows.iter().map(|r| &r.cells).collect();
    let y: Vec<&str> = spec.rows.iter().map(|r| r.label.as_str()).collect();

    json!({
        "data": [{
            "type": "heatmap",
            "z": z,
            "x": spec.weekdays,
            "y": y,
            "colorscale": spec.color_scale,
            "zmin": spec.z_range[0],
            "zmax": spec.z_range[1],
            "xgap": 2,
            "ygap": 2,
            "showscale": false
        }],
        "layout": {
            "title": { "text": spec.title },
            "xaxis": { "title": { "text": spec.x_title } },
            "yaxis": {
                "title": { "text": spec.y_title },
                "autorange": "reversed",
                "showticklabels": false
            }
        }
    })
}
