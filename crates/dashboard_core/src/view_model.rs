use crate::{AnalysisResult, RequestStatus, ViewState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub view: ViewState,
    pub status: RequestStatus,
    pub input: String,
    /// Number of URLs the current input would submit.
    pub detected_targets: usize,
    pub can_submit: bool,
    pub loading_targets: Vec<String>,
    pub error: Option<String>,
    /// Successful batch entries, in batch order.
    pub entries: Vec<ListEntryView>,
    /// Batch entries left out of `entries` because the backend failed them.
    pub hidden_failures: usize,
    pub detail: Option<DetailView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEntryView {
    /// Position in the batch response; pass it back in `Msg::ResultSelected`.
    pub index: usize,
    pub platform: String,
    pub title: String,
    pub total_comments: u64,
    pub processing_time: f64,
}

impl ListEntryView {
    pub(crate) fn from_result(index: usize, result: &AnalysisResult) -> Self {
        Self {
            index,
            platform: result.platform.clone(),
            title: result.display_title().to_string(),
            total_comments: result.summary.total_comments,
            processing_time: result.processing_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub result: AnalysisResult,
    /// True when Back returns to the batch list rather than the input.
    pub from_list: bool,
}
