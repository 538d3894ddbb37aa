use crate::chart::ChartSlot;
use crate::presenter::SlotPresentation;
use crate::sink::{Control, PresentationSink};
use crate::{JobId, Phase, SessionId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotView {
    pub presentation: Option<SlotPresentation>,
    /// Bumped every time the slot is rendered or cleared.
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub phase: Phase,
    pub session: SessionId,
    pub active_job: Option<JobId>,
    pub completed_job: Option<JobId>,
    pub url_input: String,
    pub keyword_input: String,
    pub status_text: String,
    pub keyword_status: String,
    pub analyze_enabled: bool,
    pub keyword_enabled: bool,
    pub progress_active: bool,
    pub total: SlotView,
    pub keyword: SlotView,
    pub alert: Option<String>,
    pub alert_seq: u64,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn slot(&self, slot: ChartSlot) -> &SlotView {
        match slot {
            ChartSlot::Total => &self.total,
            ChartSlot::Keyword => &self.keyword,
        }
    }
}

/// Pushes view models into a [`PresentationSink`].
///
/// Texts and control states are re-applied on every call. Charts, spike
/// lists and alerts are only touched when their revision moved since the
/// previous call, so a slot is never rendered twice for the same content.
#[derive(Debug, Default)]
pub struct ViewSync {
    slot_revisions: [u64; 2],
    alert_seq: u64,
}

impl ViewSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<S: PresentationSink + ?Sized>(&mut self, view: &AppViewModel, sink: &mut S) {
        sink.set_status(&view.status_text);
        sink.set_keyword_status(&view.keyword_status);
        sink.set_control_enabled(Control::Analyze, view.analyze_enabled);
        sink.set_control_enabled(Control::KeywordAnalyze, view.keyword_enabled);
        sink.set_progress_active(view.progress_active);

        for slot in ChartSlot::ALL {
            let slot_view = view.slot(slot);
            let applied = &mut self.slot_revisions[slot.index()];
            if slot_view.revision == *applied {
                continue;
            }
            match &slot_view.presentation {
                Some(presentation) => {
                    sink.render_chart(&presentation.chart);
                    sink.render_spikes(slot, &presentation.spikes);
                }
                None => {
                    sink.clear_chart(slot);
                    sink.clear_spikes(slot);
                }
            }
            *applied = slot_view.revision;
        }

        if view.alert_seq != self.alert_seq {
            if let Some(message) = &view.alert {
                sink.alert(message);
            }
            self.alert_seq = view.alert_seq;
        }
    }
}
