//! Text price chart
//!
//! A price history is drawn as a one-line sparkline using the eight Unicode
//! block heights, down-sampled to the requested width.

use crate::lookup::{HistoryStats, PriceHistory};
use chrono::NaiveDate;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Minimum chart width accepted by the configuration
pub const MIN_WIDTH: usize = 10;

/// Rendered chart plus the numbers shown next to it
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub sparkline: String,
    pub stats: Option<HistoryStats>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub points: usize,
}

impl PriceChart {
    pub fn from_history(history: &PriceHistory, width: usize) -> Self {
        let points = history.points();
        Self {
            sparkline: sparkline(&history.closes(), width),
            stats: history.stats(),
            start: points.first().map(|p| p.date),
            end: points.last().map(|p| p.date),
            points: points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points == 0
    }
}

/// Draw `values` as at most `width` block characters
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let sampled = downsample(values, width);
    let (min, max) = sampled
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    sampled
        .iter()
        .map(|&v| {
            if range <= f64::EPSILON {
                BARS[BARS.len() / 2]
            } else {
                let level = ((v - min) / range * (BARS.len() - 1) as f64).round() as usize;
                BARS[level.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// Average consecutive buckets so the result has at most `width` values
fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }

    (0..width)
        .map(|i| {
            let start = i * values.len() / width;
            let end = ((i + 1) * values.len() / width).max(start + 1);
            let bucket = &values[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}
