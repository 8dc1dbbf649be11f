use crate::{RequestId, RequestMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the network call for a freshly created request.
    Dispatch {
        request_id: RequestId,
        mode: RequestMode,
        targets: Vec<String>,
    },
    /// Abort the transport call of a request that is no longer current.
    Cancel { request_id: RequestId },
    /// Reflect the active target set in the navigation trigger (`None` clears it).
    UpdateTrigger { value: Option<String> },
}
