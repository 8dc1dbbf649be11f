use std::fmt;
use std::io;

use dashboard_core::AnalysisPayload;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use dashboard_core::RequestId;

/// Shown when the server gave no usable `detail` for a single analysis.
pub const SINGLE_FALLBACK_MESSAGE: &str = "Analysis failed";
/// Shown when the server gave no usable `detail` for a batch analysis.
pub const BATCH_FALLBACK_MESSAGE: &str = "Batch analysis failed";
pub const NETWORK_MESSAGE: &str = "Failed to reach the analysis service.";
pub const TIMEOUT_MESSAGE: &str = "The analysis service did not respond in time.";

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    RequestFinished {
        request_id: RequestId,
        result: Result<AnalysisPayload, ApiError>,
    },
}

/// Failure of one backend call. `message` is safe to show to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "cancelled")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    EmptyRequest,
    NotSignedIn,
    HttpStatus(u16),
    Timeout,
    Decode,
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::EmptyRequest => write!(f, "request without targets"),
            FailureKind::NotSignedIn => write!(f, "not signed in"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
}

/// Record returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// One entry of `/platforms`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlatformInfo {
    pub name: String,
    #[serde(rename = "maxComments", default)]
    pub max_comments: Option<u64>,
    #[serde(default)]
    pub example: Option<String>,
}
