use crate::chart::{ChartConfig, ChartSlot};
use crate::presenter::SpikeListItem;

/// A user-triggerable control that can be enabled or disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Analyze,
    KeywordAnalyze,
}

/// What the presentation layer must be able to do for the controller.
pub trait PresentationSink {
    fn set_status(&mut self, text: &str);
    fn set_keyword_status(&mut self, text: &str);
    fn set_control_enabled(&mut self, control: Control, enabled: bool);
    fn set_progress_active(&mut self, active: bool);
    fn render_chart(&mut self, config: &ChartConfig);
    fn clear_chart(&mut self, slot: ChartSlot);
    fn render_spikes(&mut self, slot: ChartSlot, items: &[SpikeListItem]);
    fn clear_spikes(&mut self, slot: ChartSlot);
    /// Blocking notice for input the user must fix.
    fn alert(&mut self, message: &str);
}
