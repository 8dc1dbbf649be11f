use crate::view_model::{AppViewModel, DetailView, ListEntryView};
use crate::{parse_targets, AnalysisPayload, AnalysisRequest, AnalysisResult, RequestId, RequestMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Which screen the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Input,
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    input: String,
    next_request_id: RequestId,
    request: Option<AnalysisRequest>,
    status: RequestStatus,
    payload: Option<AnalysisPayload>,
    selected: Option<usize>,
    error: Option<String>,
    trigger: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn view_state(&self) -> ViewState {
        match (self.status, &self.payload) {
            (RequestStatus::Success, Some(AnalysisPayload::Single(_))) => ViewState::Detail,
            (RequestStatus::Success, Some(AnalysisPayload::Batch(_))) => {
                if self.selected.is_some() {
                    ViewState::Detail
                } else {
                    ViewState::List
                }
            }
            _ => ViewState::Input,
        }
    }

    /// The request currently waiting on the network, if any.
    pub fn loading_request(&self) -> Option<&AnalysisRequest> {
        self.request
            .as_ref()
            .filter(|_| self.status == RequestStatus::Loading)
    }

    pub fn request(&self) -> Option<&AnalysisRequest> {
        self.request.as_ref()
    }

    /// Last trigger value the controller produced or observed.
    pub fn trigger(&self) -> Option<&str> {
        self.trigger.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn view(&self) -> AppViewModel {
        let detected_targets = parse_targets(&self.input).len();
        let (entries, hidden_failures) = match &self.payload {
            Some(AnalysisPayload::Batch(results)) => {
                let entries: Vec<ListEntryView> = results
                    .iter()
                    .enumerate()
                    .filter(|(_, result)| result.is_success())
                    .map(|(index, result)| ListEntryView::from_result(index, result))
                    .collect();
                let hidden = results.len() - entries.len();
                (entries, hidden)
            }
            _ => (Vec::new(), 0),
        };

        let detail = match self.view_state() {
            ViewState::Detail => self.detail_result().map(|result| DetailView {
                result: result.clone(),
                from_list: self.selected.is_some(),
            }),
            _ => None,
        };

        AppViewModel {
            view: self.view_state(),
            status: self.status,
            input: self.input.clone(),
            detected_targets,
            can_submit: detected_targets > 0 && self.status != RequestStatus::Loading,
            loading_targets: self
                .loading_request()
                .map(|request| request.targets.clone())
                .unwrap_or_default(),
            error: self.error.clone(),
            entries,
            hidden_failures,
            detail,
            dirty: self.dirty,
        }
    }

    /// Returns and clears the render-needed flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn detail_result(&self) -> Option<&AnalysisResult> {
        match (&self.payload, self.selected) {
            (Some(AnalysisPayload::Single(result)), _) => Some(result),
            (Some(AnalysisPayload::Batch(results)), Some(index)) => results.get(index),
            _ => None,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_trigger(&mut self, trigger: Option<String>) {
        self.trigger = trigger;
    }

    /// Replaces any previous request with a new Loading one.
    ///
    /// Returns the id of the request that was still loading, which the caller
    /// must cancel.
    pub(crate) fn begin_request(
        &mut self,
        targets: Vec<String>,
    ) -> (Option<RequestId>, AnalysisRequest) {
        let superseded = self.loading_request().map(|request| request.id);
        self.next_request_id += 1;
        let request = AnalysisRequest {
            id: self.next_request_id,
            mode: RequestMode::for_target_count(targets.len()),
            targets,
        };
        self.request = Some(request.clone());
        self.status = RequestStatus::Loading;
        self.payload = None;
        self.selected = None;
        self.error = None;
        self.mark_dirty();
        (superseded, request)
    }

    /// Drops the request, its results and the input text.
    ///
    /// Returns the id of a request that was still loading.
    pub(crate) fn clear_all(&mut self) -> Option<RequestId> {
        let in_flight = self.loading_request().map(|request| request.id);
        let had_state = self.request.is_some() || !self.input.is_empty() || self.error.is_some();
        self.input.clear();
        self.request = None;
        self.status = RequestStatus::Idle;
        self.payload = None;
        self.selected = None;
        self.error = None;
        if had_state {
            self.mark_dirty();
        }
        in_flight
    }

    pub(crate) fn apply_success(&mut self, payload: AnalysisPayload) {
        self.status = RequestStatus::Success;
        self.payload = Some(payload);
        self.selected = None;
        self.error = None;
        self.mark_dirty();
    }

    pub(crate) fn apply_failure(&mut self, message: String) {
        self.status = RequestStatus::Error;
        self.payload = None;
        self.selected = None;
        self.error = Some(message);
        self.mark_dirty();
    }

    /// Selects a successful batch entry; returns false when `index` is not one.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        let selectable = match &self.payload {
            Some(AnalysisPayload::Batch(results)) => {
                results.get(index).is_some_and(AnalysisResult::is_success)
            }
            _ => false,
        };
        if selectable {
            self.selected = Some(index);
            self.mark_dirty();
        }
        selectable
    }

    pub(crate) fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub(crate) fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.mark_dirty();
        }
    }
}
