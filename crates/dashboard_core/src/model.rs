use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Per-item outcome tag carried by every analysis response.
///
/// Single responses usually omit it; batch responses use it to mark the
/// entries the backend could not analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Comment counts per sentiment category.
///
/// Category keys are passed through exactly as the backend sends them
/// (`supportive_empathetic`, `angry_hostile`, ...); turning them into
/// labels is left to whoever renders them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    #[serde(rename = "totalComments", default, deserialize_with = "null_as_default")]
    pub total_comments: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_sentiment: Option<String>,
    #[serde(flatten)]
    pub categories: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostContext {
    /// Best available prose describing the post.
    pub fn summary_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.text.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// One backend analysis response. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ItemStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: SentimentSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_comments: BTreeMap<String, Vec<String>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub all_comments: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_context: Option<PostContext>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batches_processed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Completed
    }

    /// Post title when the backend found one, otherwise the source URL.
    pub fn display_title(&self) -> &str {
        self.post_context
            .as_ref()
            .and_then(|ctx| ctx.title.as_deref())
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&self.post_url)
    }
}

/// Failed batch entries may carry `null` where a completed one has a value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Successful response body of one request, shaped by its mode.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    Single(AnalysisResult),
    Batch(Vec<AnalysisResult>),
}
