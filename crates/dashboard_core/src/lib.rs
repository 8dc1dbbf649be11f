//! Dashboard core: pure analysis-request state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod state;
mod targets;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{AnalysisPayload, AnalysisResult, ItemStatus, PostContext, SentimentSummary};
pub use msg::{Msg, RequestFailure};
pub use state::{AppState, RequestStatus, ViewState};
pub use targets::{join_targets, parse_targets, AnalysisRequest, RequestId, RequestMode};
pub use update::update;
pub use view_model::{AppViewModel, DetailView, ListEntryView};
