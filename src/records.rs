//! Canonical channel and video row shapes.
//!
//! Both data sources (the local catalogue's snake_case rows and the
//! platform API's camelCase resources) are adapted into these records, so
//! fallback chains across heterogeneous shapes stay inside the adapters
//! and never leak into the pipeline. Count fields are always finite
//! non-negative integers: any parse failure coerces to 0.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Canonical channel metadata, immutable once published for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub view_count: u64,
}

/// Which source produced a video row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    Local,
    Remote,
}

/// The highest-relevance non-owner comment attached to a video row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopComment {
    pub text: String,
    pub like_count: u64,
    pub reply_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
}

/// One canonical video row of the result set.
///
/// `id` is unique within a published result set. `published_at` is `None`
/// when the source timestamp was missing or unparsable; such rows sort
/// after everything else among ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub favorite_count: u64,
    pub comment_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_comment: Option<TopComment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub source: VideoSource,
}

/// Parses the platform API's stringly count fields ("12345"), coercing
/// anything unparsable or missing to 0.
pub fn coerce_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Parses a source timestamp, treating anything unparsable as absent.
pub fn parse_timestamp(raw: Option<&str>) -> Option<Timestamp> {
    raw.and_then(|s| s.parse().ok())
}

/// Serde helper for count fields of local-catalogue rows, which have been
/// observed as numbers, stringified numbers, and null depending on the
/// ingest path. Anything that is not a non-negative number becomes 0.
pub(crate) mod lenient_count {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(from_value(value.as_ref()))
    }

    pub(crate) fn from_value(value: Option<&Value>) -> u64 {
        match value {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}
