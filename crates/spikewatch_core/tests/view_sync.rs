use spikewatch_core::{
    update, AppState, ChartBackend, ChartConfig, ChartRenderer, ChartSlot, Control, JobId, Msg,
    PresentationSink, SpikeListItem, ViewSync,
};

#[derive(Default)]
struct CountingBackend {
    next_id: u32,
    created: Vec<u32>,
    destroyed: Vec<u32>,
}

impl ChartBackend for CountingBackend {
    type Handle = u32;

    fn create(&mut self, _config: &ChartConfig) -> u32 {
        self.next_id += 1;
        self.created.push(self.next_id);
        self.next_id
    }

    fn destroy(&mut self, handle: u32) {
        self.destroyed.push(handle);
    }
}

struct RecordingSink {
    charts: ChartRenderer<CountingBackend>,
    status: String,
    keyword_status: String,
    analyze_enabled: bool,
    keyword_enabled: bool,
    progress_active: bool,
    spikes: [Vec<String>; 2],
    alerts: Vec<String>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            charts: ChartRenderer::new(CountingBackend::default()),
            status: String::new(),
            keyword_status: String::new(),
            analyze_enabled: false,
            keyword_enabled: false,
            progress_active: false,
            spikes: [Vec::new(), Vec::new()],
            alerts: Vec::new(),
        }
    }

    fn spike_index(slot: ChartSlot) -> usize {
        match slot {
            ChartSlot::Total => 0,
            ChartSlot::Keyword => 1,
        }
    }
}

impl PresentationSink for RecordingSink {
    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_keyword_status(&mut self, text: &str) {
        self.keyword_status = text.to_string();
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
        self.charts.render(config);
    }

    fn clear_chart(&mut self, slot: ChartSlot) {
        self.charts.clear(slot);
    }

    fn render_spikes(&mut self, slot: ChartSlot, items: &[SpikeListItem]) {
        self.spikes[Self::spike_index(slot)] = items.iter().map(SpikeListItem::text).collect();
    }

    fn clear_spikes(&mut self, slot: ChartSlot) {
        self.spikes[Self::spike_index(slot)].clear();
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

fn chart(slot: ChartSlot) -> ChartConfig {
    ChartConfig {
        slot,
        label: "test".to_string(),
        color: "#000000",
        time_axis: vec![0.0],
        values: vec![1.0],
        y_min: 0.0,
        y_suggested_max: 10.0,
        y_max: 10.0,
        x_title: "seconds",
        y_title: "comments/sec",
    }
}

fn completed(url_json: serde_json::Value) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::UrlInputChanged("https://example.com/live/abc".to_string()),
    );
    let (state, _) = update(state, Msg::AnalyzeClicked);
    let (state, _) = update(
        state,
        Msg::JobStarted {
            session: 1,
            job_id: JobId::new("J1"),
        },
    );
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            session: 1,
            snapshot: serde_json::from_value(url_json).unwrap(),
        },
    );
    state
}

#[test]
fn rendering_a_slot_twice_leaves_one_live_chart() {
    let mut renderer = ChartRenderer::new(CountingBackend::default());
    renderer.render(&chart(ChartSlot::Total));
    renderer.render(&chart(ChartSlot::Total));

    assert_eq!(renderer.live(ChartSlot::Total), Some(&2));
    assert_eq!(renderer.live(ChartSlot::Keyword), None);
    assert_eq!(renderer.backend().created, vec![1, 2]);
    assert_eq!(renderer.backend().destroyed, vec![1]);
}

#[test]
fn clearing_an_empty_slot_is_a_noop() {
    let mut renderer = ChartRenderer::new(CountingBackend::default());
    renderer.clear(ChartSlot::Keyword);
    renderer.render(&chart(ChartSlot::Keyword));
    renderer.clear_all();

    assert_eq!(renderer.live(ChartSlot::Keyword), None);
    assert_eq!(renderer.backend().destroyed, vec![1]);
}

#[test]
fn view_sync_renders_completed_results_once() {
    let state = completed(serde_json::json!({
        "status": "completed",
        "result_total": {
            "series": {"time_axis": [0, 1], "smoothed_total": [3, 4]},
            "spikes": [{"start_time": 1.0, "peak_time": 2.0, "peak_value": 4.0, "jump_url": "u"}]
        }
    }));
    let mut sink = RecordingSink::new();
    let mut sync = ViewSync::new();

    sync.apply(&state.view(), &mut sink);
    sync.apply(&state.view(), &mut sink);

    assert_eq!(sink.charts.backend().created, vec![1]);
    assert!(sink.charts.live(ChartSlot::Total).is_some());
    assert!(sink.charts.live(ChartSlot::Keyword).is_none());
    assert_eq!(sink.spikes[0], vec!["start 1.0s / peak 2.0s (CPS 4.00)".to_string()]);
    assert!(sink.analyze_enabled);
    assert!(sink.keyword_enabled);
    assert!(!sink.progress_active);
}

#[test]
fn view_sync_tears_down_charts_when_a_new_session_starts() {
    let state = completed(serde_json::json!({
        "status": "completed",
        "result_total": {"series": {"time_axis": [0], "smoothed_total": [3]}, "spikes": []}
    }));
    let mut sink = RecordingSink::new();
    let mut sync = ViewSync::new();
    sync.apply(&state.view(), &mut sink);
    assert_eq!(sink.spikes[0].len(), 1);

    let (state, _) = update(state, Msg::AnalyzeClicked);
    sync.apply(&state.view(), &mut sink);

    assert!(sink.charts.live(ChartSlot::Total).is_none());
    assert_eq!(sink.charts.backend().destroyed, vec![1]);
    assert!(sink.spikes[0].is_empty());
    assert!(!sink.analyze_enabled);
    assert!(!sink.keyword_enabled);
    assert!(sink.progress_active);
}

#[test]
fn view_sync_raises_each_alert_once() {
    let (state, _) = update(AppState::new(), Msg::AnalyzeClicked);
    let mut sink = RecordingSink::new();
    let mut sync = ViewSync::new();

    sync.apply(&state.view(), &mut sink);
    sync.apply(&state.view(), &mut sink);
    assert_eq!(sink.alerts.len(), 1);

    let (state, _) = update(state, Msg::AnalyzeClicked);
    sync.apply(&state.view(), &mut sink);
    assert_eq!(sink.alerts.len(), 2);
}
