//! Spikewatch core: pure job-lifecycle state machine and result presentation.
mod chart;
mod effect;
mod error;
mod model;
mod msg;
mod presenter;
mod sink;
mod state;
pub mod text;
mod update;
mod view_model;

pub use chart::{ChartBackend, ChartConfig, ChartRenderer, ChartSlot, X_AXIS_TITLE, Y_AXIS_TITLE};
pub use effect::Effect;
pub use error::ValidationError;
pub use model::{AnalysisResult, JobId, JobSnapshot, JobStatus, Series, Spike};
pub use msg::Msg;
pub use presenter::{
    axis_max, keyword_values, present_keyword, present_total, spike_listing, total_values,
    SlotPresentation, SpikeEntry, SpikeListItem, DEFAULT_AXIS_MAX,
};
pub use sink::{Control, PresentationSink};
pub use state::{AppState, Phase, SessionId};
pub use update::update;
pub use view_model::{AppViewModel, SlotView, ViewSync};
