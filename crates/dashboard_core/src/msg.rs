use crate::{AnalysisPayload, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User submitted the current input for analysis.
    Submitted,
    /// The navigation trigger changed (e.g. the `?url=` parameter).
    TriggerChanged(Option<String>),
    /// User picked one entry of the batch grid, by its position in the batch.
    ResultSelected { index: usize },
    /// User clicked Back.
    BackClicked,
    /// User clicked New Analysis / Reset.
    ResetClicked,
    /// Engine completion for a request.
    AnalysisFinished {
        request_id: RequestId,
        result: Result<AnalysisPayload, RequestFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Why a request produced no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// Superseded or reset; never shown to the user.
    Cancelled,
    /// User-facing message for a transport or server failure.
    Failed { message: String },
}
