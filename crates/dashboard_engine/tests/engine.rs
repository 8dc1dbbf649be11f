use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use dashboard_core::{AnalysisPayload, AnalysisResult, RequestMode};
use dashboard_engine::{
    AnalysisApi, ApiError, ChannelEventSink, EngineEvent, EngineHandle, EngineSettings,
    FailureKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Single(String),
    Batch(Vec<String>),
}

/// Answers instantly unless a delay is scripted for the target.
#[derive(Default)]
struct ScriptedApi {
    calls: Mutex<Vec<Call>>,
    delays: HashMap<String, Duration>,
}

impl ScriptedApi {
    fn with_delay(target: &str, delay: Duration) -> Self {
        let mut delays = HashMap::new();
        delays.insert(target.to_string(), delay);
        Self {
            calls: Mutex::new(Vec::new()),
            delays,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn pause_for(&self, target: &str) {
        if let Some(delay) = self.delays.get(target) {
            tokio::time::sleep(*delay).await;
        }
    }
}

fn result_for(url: &str) -> AnalysisResult {
    AnalysisResult {
        post_url: url.to_string(),
        ..AnalysisResult::default()
    }
}

#[async_trait::async_trait]
impl AnalysisApi for ScriptedApi {
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, ApiError> {
        self.calls.lock().unwrap().push(Call::Single(url.to_string()));
        self.pause_for(url).await;
        if url == "bad" {
            return Err(ApiError {
                kind: FailureKind::HttpStatus(400),
                message: "Invalid URL".to_string(),
            });
        }
        Ok(result_for(url))
    }

    async fn analyze_batch(&self, urls: &[String]) -> Result<Vec<AnalysisResult>, ApiError> {
        self.calls.lock().unwrap().push(Call::Batch(urls.to_vec()));
        if let Some(first) = urls.first() {
            self.pause_for(first).await;
        }
        Ok(urls.iter().map(|url| result_for(url)).collect())
    }
}

fn start(
    api: Arc<ScriptedApi>,
    dispatch_delay: Duration,
) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(
        api,
        EngineSettings { dispatch_delay },
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine");
    (engine, rx)
}

fn next_event(rx: &mpsc::Receiver<EngineEvent>) -> (u64, Result<AnalysisPayload, ApiError>) {
    match rx.recv_timeout(Duration::from_secs(5)).expect("engine event") {
        EngineEvent::RequestFinished { request_id, result } => (request_id, result),
    }
}

#[test]
fn single_mode_calls_single_endpoint() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::default());
    let (engine, rx) = start(api.clone(), Duration::ZERO);

    engine.dispatch(1, RequestMode::Single, vec!["https://a".to_string()]);

    let (request_id, result) = next_event(&rx);
    assert_eq!(request_id, 1);
    assert_eq!(
        result.unwrap(),
        AnalysisPayload::Single(result_for("https://a"))
    );
    assert_eq!(api.calls(), vec![Call::Single("https://a".to_string())]);
}

#[test]
fn batch_mode_calls_batch_endpoint_with_all_targets() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::default());
    let (engine, rx) = start(api.clone(), Duration::ZERO);
    let targets = vec!["a".to_string(), "b".to_string(), "a".to_string()];

    engine.dispatch(4, RequestMode::Batch, targets.clone());

    let (request_id, result) = next_event(&rx);
    assert_eq!(request_id, 4);
    match result.unwrap() {
        AnalysisPayload::Batch(results) => assert_eq!(results.len(), 3),
        other => panic!("expected batch payload, got {other:?}"),
    }
    assert_eq!(api.calls(), vec![Call::Batch(targets)]);
}

#[test]
fn api_failure_is_reported() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::default());
    let (engine, rx) = start(api, Duration::ZERO);

    engine.dispatch(1, RequestMode::Single, vec!["bad".to_string()]);

    let (_, result) = next_event(&rx);
    let err = result.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "Invalid URL");
}

#[test]
fn cancel_aborts_in_flight_call() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::with_delay("slow", Duration::from_secs(30)));
    let (engine, rx) = start(api.clone(), Duration::ZERO);

    engine.dispatch(1, RequestMode::Single, vec!["slow".to_string()]);
    std::thread::sleep(Duration::from_millis(100));
    engine.cancel(1);

    let (request_id, result) = next_event(&rx);
    assert_eq!(request_id, 1);
    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(api.calls(), vec![Call::Single("slow".to_string())]);
}

#[test]
fn superseding_request_finishes_while_old_one_is_cancelled() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::with_delay("old", Duration::from_secs(30)));
    let (engine, rx) = start(api, Duration::ZERO);

    engine.dispatch(1, RequestMode::Single, vec!["old".to_string()]);
    engine.cancel(1);
    engine.dispatch(2, RequestMode::Single, vec!["new".to_string()]);

    let mut seen = vec![next_event(&rx), next_event(&rx)];
    seen.sort_by_key(|(id, _)| *id);
    assert!(seen[0].1.as_ref().unwrap_err().is_cancelled());
    assert_eq!(
        seen[1].1.as_ref().unwrap(),
        &AnalysisPayload::Single(result_for("new"))
    );
}

#[test]
fn cancel_during_dispatch_delay_makes_no_call() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::default());
    let (engine, rx) = start(api.clone(), Duration::from_millis(500));

    engine.dispatch(1, RequestMode::Single, vec!["https://a".to_string()]);
    engine.cancel(1);

    let (_, result) = next_event(&rx);
    assert!(result.unwrap_err().is_cancelled());
    std::thread::sleep(Duration::from_millis(600));
    assert!(api.calls().is_empty());
}

#[test]
fn cancel_of_finished_request_is_harmless() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::default());
    let (engine, rx) = start(api, Duration::ZERO);

    engine.dispatch(1, RequestMode::Single, vec!["a".to_string()]);
    let (_, result) = next_event(&rx);
    assert!(result.is_ok());

    engine.cancel(1);
    engine.cancel(99);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn empty_single_request_is_rejected_without_call() {
    engine_logging::initialize_for_tests();
    let api = Arc::new(ScriptedApi::default());
    let (engine, rx) = start(api.clone(), Duration::ZERO);

    engine.dispatch(1, RequestMode::Single, Vec::new());

    let (_, result) = next_event(&rx);
    assert_eq!(result.unwrap_err().kind, FailureKind::EmptyRequest);
    assert!(api.calls().is_empty());
}
