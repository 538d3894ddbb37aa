//! Chart slots and the renderer that owns one live chart per slot.

/// X axis title shared by every chart.
pub const X_AXIS_TITLE: &str = "seconds";
/// Y axis title shared by every chart.
pub const Y_AXIS_TITLE: &str = "comments/sec";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    Total,
    Keyword,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 2] = [ChartSlot::Total, ChartSlot::Keyword];

    pub(crate) fn index(self) -> usize {
        match self {
            ChartSlot::Total => 0,
            ChartSlot::Keyword => 1,
        }
    }
}

/// Everything a backend needs to draw one single-series line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub slot: ChartSlot,
    pub label: String,
    pub color: &'static str,
    /// X values in seconds, same length as `values`.
    pub time_axis: Vec<f64>,
    pub values: Vec<f64>,
    pub y_min: f64,
    pub y_suggested_max: f64,
    pub y_max: f64,
    pub x_title: &'static str,
    pub y_title: &'static str,
}

/// Drawing primitives of a concrete charting library.
pub trait ChartBackend {
    /// A live chart instance.
    type Handle;

    fn create(&mut self, config: &ChartConfig) -> Self::Handle;
    fn destroy(&mut self, handle: Self::Handle);
}

/// Holds at most one live chart per [`ChartSlot`].
///
/// Instances are never updated in place: rendering a slot destroys the prior
/// instance before the new one is created.
pub struct ChartRenderer<B: ChartBackend> {
    backend: B,
    live: [Option<B::Handle>; 2],
}

impl<B: ChartBackend> ChartRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            live: [None, None],
        }
    }

    pub fn render(&mut self, config: &ChartConfig) -> &B::Handle {
        self.clear(config.slot);
        let handle = self.backend.create(config);
        self.live[config.slot.index()].insert(handle)
    }

    pub fn clear(&mut self, slot: ChartSlot) {
        if let Some(previous) = self.live[slot.index()].take() {
            self.backend.destroy(previous);
        }
    }

    pub fn clear_all(&mut self) {
        for slot in ChartSlot::ALL {
            self.clear(slot);
        }
    }

    pub fn live(&self, slot: ChartSlot) -> Option<&B::Handle> {
        self.live[slot.index()].as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ChartBackend> Drop for ChartRenderer<B> {
    fn drop(&mut self) {
        self.clear_all();
    }
}
