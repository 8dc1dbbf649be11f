//! Dashboard engine: backend HTTP client, session and effect execution.
mod client;
mod engine;
mod session;
mod types;

pub use client::{AnalysisApi, ApiSettings, AuthApi, ReqwestApiClient};
pub use engine::{ChannelEventSink, EngineHandle, EngineSettings, EventSink};
pub use session::Session;
pub use types::{
    AccessToken, ApiError, EngineError, EngineEvent, FailureKind, PlatformInfo, RequestId,
    UserProfile, BATCH_FALLBACK_MESSAGE, NETWORK_MESSAGE, SINGLE_FALLBACK_MESSAGE,
    TIMEOUT_MESSAGE,
};
