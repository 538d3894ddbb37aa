use std::fmt;
use std::io::Write;

use chrono::Local;
use engine_logging::engine_warn;
use spikewatch_core::{
    ChartConfig, ChartRenderer, ChartSlot, Control, PresentationSink, SpikeListItem,
};

use super::sparkline::SparklineBackend;

/// Prints view changes as timestamped lines.
///
/// Status texts are only printed when they change, so re-applying the same
/// view is silent. Charts go through a [`ChartRenderer`], which keeps at most
/// one live sparkline per slot.
pub(crate) struct TerminalSink<W: Write> {
    out: W,
    charts: ChartRenderer<SparklineBackend>,
    status: String,
    keyword_status: String,
    analyze_enabled: bool,
    keyword_enabled: bool,
    progress_active: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            charts: ChartRenderer::new(SparklineBackend::new()),
            status: String::new(),
            keyword_status: String::new(),
            analyze_enabled: true,
            keyword_enabled: true,
            progress_active: false,
        }
    }

    /// Prompt that reflects which commands currently do something.
    pub fn prompt(&mut self) {
        let marker = match (self.analyze_enabled, self.progress_active) {
            (false, _) | (_, true) => "working",
            _ if !self.keyword_enabled => "keyword busy",
            _ => "ready",
        };
        let _ = write!(self.out, "[{marker}] > ");
        let _ = self.out.flush();
    }

    pub fn print_raw(&mut self, text: &str) {
        self.line(format_args!("{text}"));
    }

    #[cfg(test)]
    pub fn live_charts(&self) -> usize {
        self.charts.backend().live_count()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{args}") {
            engine_warn!("Failed to write to terminal: {}", err);
        }
    }

    fn stamped(&mut self, args: fmt::Arguments<'_>) {
        let now = Local::now().format("%H:%M:%S");
        self.line(format_args!("[{now}] {args}"));
    }
}

impl<W: Write> PresentationSink for TerminalSink<W> {
    fn set_status(&mut self, text: &str) {
        if text.is_empty() || self.status == text {
            return;
        }
        self.status = text.to_string();
        self.stamped(format_args!("{text}"));
    }

    fn set_keyword_status(&mut self, text: &str) {
        if self.keyword_status == text {
            return;
        }
        self.keyword_status = text.to_string();
        self.stamped(format_args!("keyword: {text}"));
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        match control {
            Control::Analyze => self.analyze_enabled = enabled,
            Control::KeywordAnalyze => self.keyword_enabled = enabled,
        }
    }

    fn set_progress_active(&mut self, active: bool) {
        self.progress_active = active;
    }

    fn render_chart(&mut self, config: &ChartConfig) {
        let chart = self.charts.render(config).clone();
        self.line(format_args!(
            "{} [0..{}] {}",
            chart.label, chart.y_max, chart.line
        ));
        if let Some(end) = chart.x_end {
            self.line(format_args!(
                "    {} 0..{:.1} / {} 0..{}",
                config.x_title, end, config.y_title, config.y_max
            ));
        }
    }

    fn clear_chart(&mut self, slot: ChartSlot) {
        self.charts.clear(slot);
    }

    fn render_spikes(&mut self, slot: ChartSlot, items: &[SpikeListItem]) {
        let heading = match slot {
            ChartSlot::Total => "Spikes (all comments):",
            ChartSlot::Keyword => "Spikes (keyword):",
        };
        self.line(format_args!("{heading}"));
        for item in items {
            self.line(format_args!("  - {}", item.text()));
            if let SpikeListItem::Spike(entry) = item {
                if !entry.jump_url.is_empty() {
                    self.line(format_args!("    {}", entry.jump_url));
                }
            }
        }
    }

    fn clear_spikes(&mut self, _slot: ChartSlot) {}

    fn alert(&mut self, message: &str) {
        self.line(format_args!("!! {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikewatch_core::{present_total, AnalysisResult, Series, Spike};

    fn output(sink: TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn repeated_status_prints_once() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_status("Starting analysis job...");
        sink.set_status("Starting analysis job...");
        sink.set_keyword_status("No keyword analyzed.");
        let text = output(sink);
        assert_eq!(text.matches("Starting analysis job...").count(), 1);
        assert!(text.contains("keyword: No keyword analyzed."));
    }

    #[test]
    fn rerendering_a_slot_keeps_one_live_chart() {
        let result = AnalysisResult {
            series: Series {
                time_axis: vec![0.0, 1.0, 2.0],
                smoothed_total: vec![0.0, 12.0, 3.0],
                ..Series::default()
            },
            spikes: vec![Spike {
                start_time: 0.5,
                peak_time: 1.0,
                peak_value: 12.0,
                jump_url: "https://youtu.be/x?t=0".to_string(),
            }],
        };
        let presentation = present_total(&result);

        let mut sink = TerminalSink::new(Vec::new());
        sink.render_chart(&presentation.chart);
        sink.render_chart(&presentation.chart);
        assert_eq!(sink.live_charts(), 1);

        sink.render_spikes(ChartSlot::Total, &presentation.spikes);
        sink.clear_chart(ChartSlot::Total);
        sink.clear_chart(ChartSlot::Total);
        assert_eq!(sink.live_charts(), 0);

        let text = output(sink);
        assert!(text.contains("All comments (smoothed) [0..15]"));
        assert!(text.contains("  - start 0.5s / peak 1.0s (CPS 12.00)"));
        assert!(text.contains("    https://youtu.be/x?t=0"));
    }

    #[test]
    fn alert_is_marked() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.alert("Please enter a stream URL.");
        assert_eq!(output(sink), "!! Please enter a stream URL.\n");
    }
}
