//! Chart builders
//!
//! Pure transforms from CoinGecko series to chart descriptions that the page
//! hands to Plotly. Timestamps are epoch milliseconds, always read as UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{DashboardError, Result};

const CANDLESTICK_HEIGHT: u32 = 420;
const LINE_HEIGHT: u32 = 280;
const FONT_COLOR: &str = "#E5E7EB";

/// `[timestamp_ms, open, high, low, close]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OhlcRow {
    pub timestamp_ms: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// `[timestamp_ms, value]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeriesPoint {
    pub timestamp_ms: f64,
    pub value: f64,
}

/// Four aligned price series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickChart {
    pub name: String,
    pub x: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

/// A single labelled series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub label: String,
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<f64>,
}

pub fn parse_ohlc(value: &Value) -> Result<Vec<OhlcRow>> {
    Vec::<OhlcRow>::deserialize(value).map_err(|e| DashboardError::Shape(format!("OHLC rows: {e}")))
}

pub fn parse_series(value: &Value) -> Result<Vec<SeriesPoint>> {
    Vec::<SeriesPoint>::deserialize(value)
        .map_err(|e| DashboardError::Shape(format!("time series: {e}")))
}

/// Epoch milliseconds to a UTC instant; `None` when out of range
pub fn utc_from_millis(timestamp_ms: f64) -> Option<DateTime<Utc>> {
    if !timestamp_ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(timestamp_ms as i64)
}

/// Candlestick description, or `None` when there is nothing to draw
pub fn candlestick(rows: &[OhlcRow], name: &str) -> Option<CandlestickChart> {
    let mut chart = CandlestickChart {
        name: name.to_string(),
        x: Vec::with_capacity(rows.len()),
        open: Vec::with_capacity(rows.len()),
        high: Vec::with_capacity(rows.len()),
        low: Vec::with_capacity(rows.len()),
        close: Vec::with_capacity(rows.len()),
    };

    for row in rows {
        let Some(at) = utc_from_millis(row.timestamp_ms) else {
            continue;
        };
        chart.x.push(at);
        chart.open.push(row.open);
        chart.high.push(row.high);
        chart.low.push(row.low);
        chart.close.push(row.close);
    }

    (!chart.x.is_empty()).then_some(chart)
}

/// Line description, or `None` when there is nothing to draw
pub fn line(points: &[SeriesPoint], label: &str) -> Option<LineChart> {
    let (x, y): (Vec<_>, Vec<_>) = points
        .iter()
        .filter_map(|p| utc_from_millis(p.timestamp_ms).map(|at| (at, p.value)))
        .unzip();

    if x.is_empty() {
        return None;
    }

    Some(LineChart {
        label: label.to_string(),
        x,
        y,
    })
}

fn layout(height: u32, x_title: &str, y_title: &str) -> Value {
    json!({
        "height": height,
        "margin": {"l": 20, "r": 20, "t": 30, "b": 20},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "font": {"color": FONT_COLOR},
        "xaxis": {"title": {"text": x_title}, "rangeslider": {"visible": false}},
        "yaxis": {"title": {"text": y_title}},
    })
}

impl CandlestickChart {
    /// Plotly `{data, layout}` figure
    pub fn to_plotly(&self) -> Value {
        json!({
            "data": [{
                "type": "candlestick",
                "name": self.name,
                "x": self.x,
                "open": self.open,
                "high": self.high,
                "low": self.low,
                "close": self.close,
            }],
            "layout": layout(CANDLESTICK_HEIGHT, "Date", "Price (USD)"),
        })
    }
}

impl LineChart {
    /// Plotly `{data, layout}` figure
    pub fn to_plotly(&self) -> Value {
        json!({
            "data": [{
                "type": "scatter",
                "mode": "lines",
                "name": self.label,
                "x": self.x,
                "y": self.y,
            }],
            "layout": layout(LINE_HEIGHT, "Date", &self.label),
        })
    }
}
