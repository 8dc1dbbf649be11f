use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use dashboard_core::{AnalysisPayload, RequestMode};
use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::client::AnalysisApi;
use crate::{ApiError, EngineError, EngineEvent, FailureKind, RequestId};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Wait before the network call so rapid re-triggers can cancel it first.
    pub dispatch_delay: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            dispatch_delay: Duration::from_millis(100),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Dispatch {
        request_id: RequestId,
        mode: RequestMode,
        targets: Vec<String>,
    },
    Cancel {
        request_id: RequestId,
    },
}

type InFlight = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// Runs analysis requests on a private tokio runtime.
///
/// Every finished request, cancelled ones included, produces exactly one
/// [`EngineEvent::RequestFinished`] on the sink. Dropping the handle stops
/// the engine thread and aborts whatever is still running.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        api: Arc<dyn AnalysisApi>,
        settings: EngineSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("dashboard-engine".to_string())
            .spawn(move || {
                let in_flight = InFlight::default();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Dispatch {
                            request_id,
                            mode,
                            targets,
                        } => {
                            let token = CancellationToken::new();
                            lock(&in_flight).insert(request_id, token.clone());
                            let api = api.clone();
                            let sink = sink.clone();
                            let in_flight = in_flight.clone();
                            let delay = settings.dispatch_delay;
                            runtime.spawn(async move {
                                let result =
                                    run_request(api.as_ref(), mode, &targets, delay, &token).await;
                                lock(&in_flight).remove(&request_id);
                                log_outcome(request_id, &result);
                                sink.emit(EngineEvent::RequestFinished { request_id, result });
                            });
                        }
                        EngineCommand::Cancel { request_id } => {
                            match lock(&in_flight).remove(&request_id) {
                                Some(token) => {
                                    engine_info!("Cancelling request_id={}", request_id);
                                    token.cancel();
                                }
                                None => {
                                    engine_debug!(
                                        "Cancel for request_id={} ignored, not in flight",
                                        request_id
                                    );
                                }
                            }
                        }
                    }
                }
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn dispatch(&self, request_id: RequestId, mode: RequestMode, targets: Vec<String>) {
        engine_info!(
            "Dispatch request_id={} mode={:?} targets={}",
            request_id,
            mode,
            targets.len()
        );
        let _ = self.cmd_tx.send(EngineCommand::Dispatch {
            request_id,
            mode,
            targets,
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }
}

async fn run_request(
    api: &dyn AnalysisApi,
    mode: RequestMode,
    targets: &[String],
    delay: Duration,
    token: &CancellationToken,
) -> Result<AnalysisPayload, ApiError> {
    let call = async {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        execute(api, mode, targets).await
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::cancelled()),
        result = call => result,
    }
}

async fn execute(
    api: &dyn AnalysisApi,
    mode: RequestMode,
    targets: &[String],
) -> Result<AnalysisPayload, ApiError> {
    match mode {
        RequestMode::Single => {
            let url = targets
                .first()
                .ok_or_else(|| ApiError::new(FailureKind::EmptyRequest, "Nothing to analyze"))?;
            api.analyze(url).await.map(AnalysisPayload::Single)
        }
        RequestMode::Batch => api
            .analyze_batch(targets)
            .await
            .map(AnalysisPayload::Batch),
    }
}

fn log_outcome(request_id: RequestId, result: &Result<AnalysisPayload, ApiError>) {
    match result {
        Ok(AnalysisPayload::Single(_)) => {
            engine_info!("Request {} finished with one result", request_id);
        }
        Ok(AnalysisPayload::Batch(results)) => {
            engine_info!(
                "Request {} finished with {} results",
                request_id,
                results.len()
            );
        }
        Err(err) if err.is_cancelled() => {
            engine_debug!("Request {} cancelled", request_id);
        }
        Err(err) => {
            engine_warn!("Request {} failed: {}", request_id, err);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
