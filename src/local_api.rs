//! Client for the local catalogue service.
//!
//! The dashboard keeps an ingested copy of channels and videos it has seen
//! before; resolution always consults it before touching the platform API.
//! Responses are `{data, meta?}` envelopes with snake_case rows. Lookup
//! failures here are never surfaced to the user: a 400-class status means
//! "the catalogue has no such channel" and anything else is logged as an
//! infrastructure problem, but both fall through to the remote path.

use crate::query::ChannelQuery;
use crate::transport::{self, Transport};
use eyre::Context;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Rows fetched per page when draining a channel's local videos.
pub const LOCAL_PAGE_SIZE: u64 = 200;

/// Whether a failed local lookup is a plain "not found / not allowed" miss
/// rather than an infrastructure failure. Both fall back to the remote
/// path; only the log level differs.
pub fn is_soft_miss(report: &eyre::Report) -> bool {
    transport::status_of(report).is_some_and(|status| matches!(status, 400 | 401 | 403 | 404))
}

/// JSON envelope wrapping every local API response.
#[derive(Debug, Deserialize)]
struct Envelope<D> {
    data: D,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    total: Option<u64>,
}

/// A channel row as stored by the catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalChannel {
    pub channel_id: String,
    pub title: String,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "crate::records::lenient_count")]
    pub subscriber_count: u64,
    #[serde(default, with = "crate::records::lenient_count")]
    pub video_count: u64,
    #[serde(default, with = "crate::records::lenient_count")]
    pub view_count: u64,
}

/// A video row as stored by the catalogue. Counts have been observed as
/// numbers, strings, and null depending on when the row was ingested.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalVideoRow {
    pub video_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default, with = "crate::records::lenient_count")]
    pub view_count: u64,
    #[serde(default, with = "crate::records::lenient_count")]
    pub like_count: u64,
    #[serde(default, with = "crate::records::lenient_count")]
    pub favorite_count: u64,
    #[serde(default, with = "crate::records::lenient_count")]
    pub comment_count: u64,
    #[serde(default)]
    pub top_comment: Option<LocalTopComment>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalTopComment {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, with = "crate::records::lenient_count")]
    pub like_count: u64,
    #[serde(default, with = "crate::records::lenient_count")]
    pub reply_count: u64,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Client for the local catalogue API.
#[derive(Debug, Clone)]
pub struct LocalCatalogClient<T> {
    transport: Arc<T>,
    base_url: String,
}

impl<T: Transport> LocalCatalogClient<T> {
    pub fn new(transport: Arc<T>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Looks up a channel in the catalogue: by explicit ID when the query
    /// names one, otherwise by the deduplicated custom-URL candidates in
    /// order, first hit winning.
    ///
    /// Lookup failures are classified and absorbed here; only cancellation
    /// propagates as an error.
    pub async fn lookup_channel(
        &self,
        query: &ChannelQuery,
        cancel: &CancellationToken,
    ) -> eyre::Result<Option<LocalChannel>> {
        if let Some(id) = query.channel_id() {
            return self.lookup_step(&format!("by id {id:?}"), self.channel_by_id(id, cancel).await);
        }

        for candidate in query.custom_url_candidates() {
            let found = self.lookup_step(
                &format!("by custom url {candidate:?}"),
                self.channel_by_custom_url(&candidate, cancel).await,
            )?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    /// Applies the soft-miss classification to one lookup attempt.
    fn lookup_step(
        &self,
        what: &str,
        result: eyre::Result<LocalChannel>,
    ) -> eyre::Result<Option<LocalChannel>> {
        match result {
            Ok(channel) => Ok(Some(channel)),
            Err(e) if transport::is_cancelled(&e) => Err(e),
            Err(e) if is_soft_miss(&e) => {
                tracing::debug!(lookup = what, "no local channel");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(lookup = what, error = ?e, "local channel lookup failed");
                Ok(None)
            }
        }
    }

    async fn channel_by_id(
        &self,
        channel_id: &str,
        cancel: &CancellationToken,
    ) -> eyre::Result<LocalChannel> {
        let url = format!("{}/channels/{channel_id}", self.base_url);
        let body = self.transport.get_json(&url, &[], cancel).await?;
        let envelope: Envelope<LocalChannel> =
            serde_json::from_value(body).context("parse local channel response")?;
        Ok(envelope.data)
    }

    async fn channel_by_custom_url(
        &self,
        custom_url: &str,
        cancel: &CancellationToken,
    ) -> eyre::Result<LocalChannel> {
        let url = format!("{}/channels/by-custom-url", self.base_url);
        let body = self
            .transport
            .get_json(&url, &[("custom_url", custom_url)], cancel)
            .await?;
        let envelope: Envelope<LocalChannel> =
            serde_json::from_value(body).context("parse local channel response")?;
        Ok(envelope.data)
    }

    /// Drains all locally known videos of a channel, page by page, until a
    /// short page or the reported total is reached.
    ///
    /// Errors propagate raw; the resolver decides whether a failure here
    /// demotes the whole local path to a miss.
    pub async fn videos(
        &self,
        channel_id: &str,
        include_top_comment: bool,
        cancel: &CancellationToken,
    ) -> eyre::Result<Vec<LocalVideoRow>> {
        let url = format!("{}/channels/{channel_id}/videos", self.base_url);
        let limit = LOCAL_PAGE_SIZE.to_string();
        let include = include_top_comment.to_string();

        let mut rows: Vec<LocalVideoRow> = Vec::new();
        loop {
            let offset = rows.len().to_string();
            let body = self
                .transport
                .get_json(
                    &url,
                    &[
                        ("offset", offset.as_str()),
                        ("limit", limit.as_str()),
                        ("include_top_comment", include.as_str()),
                    ],
                    cancel,
                )
                .await?;
            let envelope: Envelope<Vec<LocalVideoRow>> =
                serde_json::from_value(body).context("parse local videos response")?;

            let page_len = envelope.data.len() as u64;
            rows.extend(envelope.data);

            let reported_total = envelope.meta.as_ref().and_then(|m| m.total);
            let have_all = reported_total.is_some_and(|total| rows.len() as u64 >= total);
            if page_len < LOCAL_PAGE_SIZE || have_all {
                break;
            }
        }

        tracing::debug!(channel_id, rows = rows.len(), "drained local video pages");
        Ok(rows)
    }
}
