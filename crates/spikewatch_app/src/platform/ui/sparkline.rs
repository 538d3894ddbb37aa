use spikewatch_core::{ChartBackend, ChartConfig, ChartSlot};

use super::constants::{SPARK_LEVELS, SPARK_WIDTH};

/// One drawn chart.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sparkline {
    pub id: u64,
    pub slot: ChartSlot,
    pub label: String,
    pub color: &'static str,
    pub line: String,
    pub y_max: f64,
    /// Last x value in seconds, if the chart has any points.
    pub x_end: Option<f64>,
}

/// Draws charts as one line of block glyphs scaled to the chart's `y_max`.
#[derive(Debug, Default)]
pub(crate) struct SparklineBackend {
    next_id: u64,
    live: usize,
}

impl SparklineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of charts created and not yet destroyed.
    pub fn live_count(&self) -> usize {
        self.live
    }
}

impl ChartBackend for SparklineBackend {
    type Handle = Sparkline;

    fn create(&mut self, config: &ChartConfig) -> Sparkline {
        self.next_id += 1;
        self.live += 1;
        Sparkline {
            id: self.next_id,
            slot: config.slot,
            label: config.label.clone(),
            color: config.color,
            line: draw(&config.values, config.y_max, SPARK_WIDTH),
            y_max: config.y_max,
            x_end: config.time_axis.last().copied(),
        }
    }

    fn destroy(&mut self, _handle: Sparkline) {
        self.live = self.live.saturating_sub(1);
    }
}

/// Buckets `values` into at most `width` columns, keeping each bucket's peak.
fn draw(values: &[f64], y_max: f64, width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let columns = values.len().min(width);
    (0..columns)
        .map(|column| {
            let start = column * values.len() / columns;
            let end = ((column + 1) * values.len() / columns).max(start + 1);
            let peak = values[start..end]
                .iter()
                .copied()
                .filter(|value| value.is_finite())
                .fold(f64::NAN, f64::max);
            glyph(peak, y_max)
        })
        .collect()
}

fn glyph(value: f64, y_max: f64) -> char {
    if !value.is_finite() || y_max <= 0.0 {
        return ' ';
    }
    let top = SPARK_LEVELS.len() - 1;
    let ratio = (value / y_max).clamp(0.0, 1.0);
    SPARK_LEVELS[(ratio * top as f64).round() as usize]
}
