use crate::chart::ChartSlot;
use crate::presenter::SlotPresentation;
use crate::view_model::{AppViewModel, SlotView};
use crate::{text, JobId};

/// Generation of a top-level analysis. Every `AnalyzeClicked` that is
/// accepted opens a new session; responses tagged with an older session are
/// stale.
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Starting,
    Polling,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Slot {
    presentation: Option<SlotPresentation>,
    revision: u64,
}

impl Slot {
    fn set(&mut self, presentation: Option<SlotPresentation>) {
        self.presentation = presentation;
        self.revision += 1;
    }

    fn view(&self) -> SlotView {
        SlotView {
            presentation: self.presentation.clone(),
            revision: self.revision,
        }
    }
}

/// Everything one analysis session owns. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    url_input: String,
    keyword_input: String,
    phase: Phase,
    session: SessionId,
    /// Job currently being started or polled.
    active_job: Option<JobId>,
    /// Job whose results are on screen and can be recomputed.
    completed_job: Option<JobId>,
    status_text: String,
    keyword_status: String,
    analyze_enabled: bool,
    keyword_enabled: bool,
    keyword_busy: bool,
    progress_active: bool,
    slots: [Slot; 2],
    alert: Option<String>,
    alert_seq: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            url_input: String::new(),
            keyword_input: String::new(),
            phase: Phase::Idle,
            session: 0,
            active_job: None,
            completed_job: None,
            status_text: String::new(),
            keyword_status: text::NO_KEYWORD.to_string(),
            analyze_enabled: true,
            keyword_enabled: true,
            keyword_busy: false,
            progress_active: false,
            slots: Default::default(),
            alert: None,
            alert_seq: 0,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            session: self.session,
            active_job: self.active_job.clone(),
            completed_job: self.completed_job.clone(),
            url_input: self.url_input.clone(),
            keyword_input: self.keyword_input.clone(),
            status_text: self.status_text.clone(),
            keyword_status: self.keyword_status.clone(),
            analyze_enabled: self.analyze_enabled,
            keyword_enabled: self.keyword_control_enabled(),
            progress_active: self.progress_active,
            total: self.slots[ChartSlot::Total.index()].view(),
            keyword: self.slots[ChartSlot::Keyword.index()].view(),
            alert: self.alert.clone(),
            alert_seq: self.alert_seq,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// True while a request of either flow is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Starting | Phase::Polling) || self.keyword_busy
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    pub(crate) fn keyword_input(&self) -> &str {
        &self.keyword_input
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        self.url_input = text;
    }

    pub(crate) fn set_keyword_input(&mut self, text: String) {
        self.keyword_input = text;
    }

    pub(crate) fn analyze_enabled(&self) -> bool {
        self.analyze_enabled
    }

    pub(crate) fn keyword_control_enabled(&self) -> bool {
        self.keyword_enabled && !self.keyword_busy
    }

    pub(crate) fn active_job(&self) -> Option<&JobId> {
        self.active_job.as_ref()
    }

    pub(crate) fn completed_job(&self) -> Option<&JobId> {
        self.completed_job.as_ref()
    }

    pub(crate) fn is_current(&self, session: SessionId, phase: Phase) -> bool {
        self.session == session && self.phase == phase
    }

    /// Tears down everything the previous session showed and opens a new one.
    pub(crate) fn begin_session(&mut self) -> SessionId {
        self.session += 1;
        self.phase = Phase::Starting;
        self.active_job = None;
        self.completed_job = None;
        for slot in &mut self.slots {
            slot.set(None);
        }
        self.keyword_status = text::NO_KEYWORD.to_string();
        self.keyword_busy = false;
        self.analyze_enabled = false;
        self.keyword_enabled = false;
        self.progress_active = true;
        self.status_text = text::STARTING.to_string();
        self.mark_dirty();
        self.session
    }

    pub(crate) fn begin_polling(&mut self, job_id: JobId) {
        self.active_job = Some(job_id);
        self.phase = Phase::Polling;
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, processed: u64, last_timestamp: Option<f64>) {
        self.status_text = text::progress(processed, last_timestamp);
        self.progress_active = true;
        self.mark_dirty();
    }

    pub(crate) fn complete(&mut self, job_id: Option<JobId>) {
        let finished = job_id.or_else(|| self.active_job.take());
        self.active_job = None;
        self.completed_job = finished;
        self.phase = Phase::Completed;
        self.status_text = text::COMPLETED.to_string();
        self.analyze_enabled = true;
        self.keyword_enabled = true;
        self.progress_active = false;
        self.mark_dirty();
    }

    /// Ends the primary flow with an error. The keyword control is untouched.
    pub(crate) fn fail(&mut self, message: String) {
        self.active_job = None;
        self.phase = Phase::Failed;
        self.status_text = message;
        self.analyze_enabled = true;
        self.progress_active = false;
        self.mark_dirty();
    }

    pub(crate) fn present(&mut self, slot: ChartSlot, presentation: SlotPresentation) {
        self.slots[slot.index()].set(Some(presentation));
        self.mark_dirty();
    }

    pub(crate) fn set_keyword_status(&mut self, text: String) {
        self.keyword_status = text;
        self.mark_dirty();
    }

    pub(crate) fn acquire_keyword_busy(&mut self) {
        self.keyword_busy = true;
        self.keyword_status = text::KEYWORD_RUNNING.to_string();
        self.mark_dirty();
    }

    pub(crate) fn release_keyword_busy(&mut self) {
        self.keyword_busy = false;
        self.mark_dirty();
    }

    pub(crate) fn raise_alert(&mut self, message: String) {
        self.alert = Some(message);
        self.alert_seq += 1;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
