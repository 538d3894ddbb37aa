//! Turns raw analysis payloads into chart configurations and spike listings.

use crate::chart::{ChartConfig, ChartSlot, X_AXIS_TITLE, Y_AXIS_TITLE};
use crate::model::{AnalysisResult, Series, Spike};
use crate::text;

/// Smallest y-axis ceiling, in comments per second.
pub const DEFAULT_AXIS_MAX: f64 = 10.0;
const AXIS_PADDING_RATIO: f64 = 0.2;
const AXIS_STEP: f64 = 5.0;

const TOTAL_COLOR: &str = "#111111";
const KEYWORD_COLOR: &str = "#00c48c";

/// Y-axis maximum for a value sequence.
///
/// The peak is padded by 20% and rounded up to the next multiple of 5, never
/// going below [`DEFAULT_AXIS_MAX`]. Empty or non-positive input yields the
/// default.
pub fn axis_max(values: &[f64]) -> f64 {
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if peak <= 0.0 {
        return DEFAULT_AXIS_MAX;
    }
    let padded = peak * (1.0 + AXIS_PADDING_RATIO);
    let rounded = (padded / AXIS_STEP).ceil() * AXIS_STEP;
    rounded.max(DEFAULT_AXIS_MAX)
}

pub fn total_values(series: &Series) -> &[f64] {
    &series.smoothed_total
}

/// Smoothed keyword rates when the server sent any, raw rates otherwise.
pub fn keyword_values(series: &Series) -> &[f64] {
    if series.smoothed_keyword.is_empty() {
        &series.keyword
    } else {
        &series.smoothed_keyword
    }
}

/// A spike as shown in a listing. The jump link opens in a new context.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeEntry {
    pub start_time: f64,
    pub peak_time: f64,
    pub peak_value: f64,
    pub jump_url: String,
}

impl SpikeEntry {
    pub fn summary(&self) -> String {
        format!(
            "start {:.1}s / peak {:.1}s (CPS {:.2})",
            self.start_time, self.peak_time, self.peak_value
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpikeListItem {
    /// Shown alone when no spike was detected.
    Placeholder,
    Spike(SpikeEntry),
}

impl SpikeListItem {
    pub fn text(&self) -> String {
        match self {
            SpikeListItem::Placeholder => text::NO_SPIKES.to_string(),
            SpikeListItem::Spike(entry) => entry.summary(),
        }
    }
}

/// Order- and count-preserving projection of the server's spike list.
pub fn spike_listing(spikes: &[Spike]) -> Vec<SpikeListItem> {
    if spikes.is_empty() {
        return vec![SpikeListItem::Placeholder];
    }
    spikes
        .iter()
        .map(|spike| {
            SpikeListItem::Spike(SpikeEntry {
                start_time: spike.start_time,
                peak_time: spike.peak_time,
                peak_value: spike.peak_value,
                jump_url: spike.jump_url.clone(),
            })
        })
        .collect()
}

/// Chart and spike listing for one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPresentation {
    pub chart: ChartConfig,
    pub spikes: Vec<SpikeListItem>,
}

pub fn present_total(result: &AnalysisResult) -> SlotPresentation {
    SlotPresentation {
        chart: line_chart(
            ChartSlot::Total,
            text::TOTAL_LABEL.to_string(),
            TOTAL_COLOR,
            &result.series.time_axis,
            total_values(&result.series),
        ),
        spikes: spike_listing(&result.spikes),
    }
}

pub fn present_keyword(result: &AnalysisResult, keyword: &str) -> SlotPresentation {
    SlotPresentation {
        chart: line_chart(
            ChartSlot::Keyword,
            text::keyword_label(keyword),
            KEYWORD_COLOR,
            &result.series.time_axis,
            keyword_values(&result.series),
        ),
        spikes: spike_listing(&result.spikes),
    }
}

fn line_chart(
    slot: ChartSlot,
    label: String,
    color: &'static str,
    time_axis: &[f64],
    values: &[f64],
) -> ChartConfig {
    // Points only exist where both sequences have a value.
    let len = time_axis.len().min(values.len());
    let y_max = axis_max(values);
    ChartConfig {
        slot,
        label,
        color,
        time_axis: time_axis[..len].to_vec(),
        values: values[..len].to_vec(),
        y_min: 0.0,
        y_suggested_max: y_max,
        y_max,
        x_title: X_AXIS_TITLE,
        y_title: Y_AXIS_TITLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_are_truncated_to_the_shorter_sequence() {
        let chart = line_chart(
            ChartSlot::Total,
            "t".to_string(),
            TOTAL_COLOR,
            &[0.0, 5.0, 10.0],
            &[1.0, 2.0],
        );
        assert_eq!(chart.time_axis, vec![0.0, 5.0]);
        assert_eq!(chart.values, vec![1.0, 2.0]);
    }

    #[test]
    fn axis_max_ignores_nan_peaks() {
        assert_eq!(axis_max(&[f64::NAN]), DEFAULT_AXIS_MAX);
    }
}
