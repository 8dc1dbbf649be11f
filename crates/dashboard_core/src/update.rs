use crate::{
    join_targets, parse_targets, AppState, Effect, Msg, RequestFailure, RequestStatus, ViewState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::Submitted => {
            let targets = parse_targets(state.input());
            if targets.is_empty() || is_loading(&state, &targets) {
                return (state, Vec::new());
            }
            let trigger = join_targets(&targets);
            let mut effects = start_request(&mut state, targets);
            state.set_trigger(Some(trigger.clone()));
            effects.push(Effect::UpdateTrigger {
                value: Some(trigger),
            });
            effects
        }
        Msg::TriggerChanged(raw) => {
            let raw = raw.unwrap_or_default();
            let targets = parse_targets(&raw);
            if targets.is_empty() {
                state.set_trigger(None);
                let effects = cancel_all(&mut state);
                return (state, effects);
            }
            // Navigation echoes of the request already in flight are ignored.
            if is_loading(&state, &targets) {
                return (state, Vec::new());
            }
            state.set_input(raw);
            state.set_trigger(Some(join_targets(&targets)));
            start_request(&mut state, targets)
        }
        Msg::ResultSelected { index } => {
            if state.view_state() == ViewState::List {
                state.select(index);
            }
            Vec::new()
        }
        Msg::BackClicked => match state.view_state() {
            ViewState::Detail if state.has_selection() => {
                state.clear_selection();
                Vec::new()
            }
            ViewState::Detail | ViewState::List => clear_with_trigger(&mut state),
            ViewState::Input => Vec::new(),
        },
        Msg::ResetClicked => clear_with_trigger(&mut state),
        Msg::AnalysisFinished { request_id, result } => {
            let is_current = state
                .loading_request()
                .is_some_and(|request| request.id == request_id);
            if is_current {
                match result {
                    Ok(payload) => state.apply_success(payload),
                    Err(RequestFailure::Failed { message }) => state.apply_failure(message),
                    // Cancellation is never authoritative over the current request.
                    Err(RequestFailure::Cancelled) => {}
                }
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn is_loading(state: &AppState, targets: &[String]) -> bool {
    state
        .loading_request()
        .is_some_and(|request| request.targets == targets)
}

fn start_request(state: &mut AppState, targets: Vec<String>) -> Vec<Effect> {
    let (superseded, request) = state.begin_request(targets);
    let mut effects = Vec::with_capacity(2);
    if let Some(request_id) = superseded {
        effects.push(Effect::Cancel { request_id });
    }
    effects.push(Effect::Dispatch {
        request_id: request.id,
        mode: request.mode,
        targets: request.targets,
    });
    effects
}

fn cancel_all(state: &mut AppState) -> Vec<Effect> {
    state
        .clear_all()
        .map(|request_id| Effect::Cancel { request_id })
        .into_iter()
        .collect()
}

fn clear_with_trigger(state: &mut AppState) -> Vec<Effect> {
    let mut effects = cancel_all(state);
    if state.trigger().is_some() {
        state.set_trigger(None);
        effects.push(Effect::UpdateTrigger { value: None });
    }
    debug_assert_eq!(state.status(), RequestStatus::Idle);
    effects
}
