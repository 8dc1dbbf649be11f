use std::sync::{mpsc, Arc};

use dashboard_core::{Effect, Msg, RequestFailure};
use dashboard_engine::{
    AnalysisApi, ApiError, EngineError, EngineEvent, EngineHandle, EngineSettings, EventSink,
};
use engine_logging::{engine_debug, engine_info};

use super::app::AppEvent;
use super::history::TriggerHistory;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn AnalysisApi>,
        settings: EngineSettings,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { tx: event_tx });
        let engine = EngineHandle::new(api, settings, sink)?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>, history: &mut TriggerHistory) {
        for effect in effects {
            match effect {
                Effect::Dispatch {
                    request_id,
                    mode,
                    targets,
                } => {
                    self.engine.dispatch(request_id, mode, targets);
                }
                Effect::Cancel { request_id } => {
                    self.engine.cancel(request_id);
                }
                Effect::UpdateTrigger { value } => {
                    engine_debug!("Trigger now {:?}", value);
                    history.push(value);
                }
            }
        }
    }
}

/// Feeds engine completions back into the update loop.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Msg(map_event(event)));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RequestFinished { request_id, result } => Msg::AnalysisFinished {
            request_id,
            result: result.map_err(map_failure),
        },
    }
}

fn map_failure(err: ApiError) -> RequestFailure {
    if err.is_cancelled() {
        return RequestFailure::Cancelled;
    }
    engine_info!("Request failed: {}", err);
    RequestFailure::Failed {
        message: err.message,
    }
}
