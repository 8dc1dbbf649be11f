use std::sync::Arc;
use std::time::Duration;

use dashboard_core::AnalysisResult;
use engine_logging::{engine_debug, engine_warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::session::Session;
use crate::{
    AccessToken, ApiError, FailureKind, PlatformInfo, UserProfile, BATCH_FALLBACK_MESSAGE,
    NETWORK_MESSAGE, SINGLE_FALLBACK_MESSAGE, TIMEOUT_MESSAGE,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Root of the versioned API, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` waits as long as the transport does.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, ApiError>;

    async fn analyze_batch(&self, urls: &[String]) -> Result<Vec<AnalysisResult>, ApiError>;
}

#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ApiError>;

    async fn register(&self, email: &str, password: &str) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    urls: &'a [String],
}

#[derive(Deserialize)]
struct BatchEnvelope {
    #[serde(default)]
    results: Vec<AnalysisResult>,
}

#[derive(Deserialize)]
struct PlatformsEnvelope {
    #[serde(default)]
    platforms: Vec<PlatformInfo>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

/// HTTP client for the analysis backend. Adds the session's bearer token to
/// every analysis call.
#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    client: reqwest::Client,
    base: Url,
    session: Arc<Session>,
}

impl ReqwestApiClient {
    pub fn new(settings: ApiSettings, session: Arc<Session>) -> Result<Self, ApiError> {
        let base = parse_base_url(&settings.base_url)?;
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn platforms(&self) -> Result<Vec<PlatformInfo>, ApiError> {
        let request = self.authorize(self.client.get(self.endpoint("platforms")?));
        let envelope: PlatformsEnvelope = send_json(request, "Could not load platforms").await?;
        Ok(envelope.platforms)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidBaseUrl, err.to_string()))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl AnalysisApi for ReqwestApiClient {
    async fn analyze(&self, url: &str) -> Result<AnalysisResult, ApiError> {
        engine_debug!("POST analyze url_len={}", url.len());
        let request = self
            .authorize(self.client.post(self.endpoint("analyze")?))
            .json(&AnalyzeBody { url });
        send_json(request, SINGLE_FALLBACK_MESSAGE).await
    }

    async fn analyze_batch(&self, urls: &[String]) -> Result<Vec<AnalysisResult>, ApiError> {
        engine_debug!("POST analyze/batch count={}", urls.len());
        let request = self
            .authorize(self.client.post(self.endpoint("analyze/batch")?))
            .json(&BatchBody { urls });
        let envelope: BatchEnvelope = send_json(request, BATCH_FALLBACK_MESSAGE).await?;
        Ok(envelope.results)
    }
}

#[async_trait::async_trait]
impl AuthApi for ReqwestApiClient {
    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let request = self
            .client
            .get(self.endpoint("auth/me")?)
            .bearer_auth(token);
        send_json(request, "Could not load the current user").await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ApiError> {
        let request = self
            .client
            .post(self.endpoint("auth/token")?)
            .form(&LoginForm {
                username: email,
                password,
            });
        send_json(request, "Login failed").await
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.endpoint("auth/register")?)
            .json(&Credentials { email, password });
        let response = request.send().await.map_err(map_reqwest_error)?;
        check_status(response, "Registration failed").await.map(|_| ())
    }
}

/// Makes sure relative joins land under the base path instead of replacing
/// its last segment.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut base = Url::parse(raw.trim())
        .map_err(|err| ApiError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(ApiError::new(
            FailureKind::InvalidBaseUrl,
            format!("{raw} cannot be a base url"),
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    fallback: &str,
) -> Result<T, ApiError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let response = check_status(response, fallback).await?;
    response.json::<T>().await.map_err(|err| {
        engine_warn!("Undecodable response body: {}", err);
        ApiError::new(FailureKind::Decode, fallback)
    })
}

async fn check_status(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = detail_message(&body).unwrap_or_else(|| fallback.to_string());
    engine_warn!("Backend answered {} detail={:?}", status, message);
    Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), message))
}

/// Pulls a human-readable `detail` string out of an error body.
///
/// Validation errors carry a structured `detail` array; those are not
/// presentable and yield `None`.
pub(crate) fn detail_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        detail: Option<Value>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .detail?
        .as_str()
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(ToOwned::to_owned)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    engine_warn!("Transport error: {}", err);
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, TIMEOUT_MESSAGE);
    }
    ApiError::new(FailureKind::Network, NETWORK_MESSAGE)
}
