//! Core platform API client: request assembly and response decoding.

use crate::transport::Transport;
use crate::youtube_api::channels::{Channel, ChannelListResponse};
use crate::youtube_api::comments::{Comment, CommentListResponse, CommentThread, CommentThreadListResponse};
use crate::youtube_api::playlist_items::PlaylistItemListResponse;
use crate::youtube_api::types::PageStream;
use crate::youtube_api::videos::{Video, VideoListResponse};
use eyre::Context;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;

/// How a channel is addressed in a `channels.list` call.
#[derive(Debug, Clone, Copy)]
pub enum ChannelIdent<'a> {
    /// Canonical channel ID (`UC…`).
    Id(&'a str),
    /// Handle, without the leading `@`.
    Handle(&'a str),
}

/// Client for the public video-platform API.
///
/// Every method takes the owning session's cancellation token and passes it
/// into the transport, so an in-flight request can be aborted when the
/// session is superseded. Authentication is a plain API key; OAuth flows
/// live outside this pipeline.
#[derive(Debug, Clone)]
pub struct YouTubeClient<T> {
    transport: Arc<T>,
    base_url: String,
    api_key: String,
}

impl<T: Transport> YouTubeClient<T> {
    pub fn new(transport: Arc<T>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            transport,
        }
    }

    /// Issues one `GET` against a list endpoint and decodes the response.
    async fn list<R: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> eyre::Result<R> {
        let url = format!("{}/{resource}", self.base_url);
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("key", self.api_key.as_str()));

        let body = self.transport.get_json(&url, &query, cancel).await?;
        serde_json::from_value(body)
            .with_context(|| format!("parse platform API {resource} response"))
    }

    /// Looks up a channel with metadata, statistics, and the ID of its
    /// uploads playlist. Returns `None` when the API knows no such channel.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/channels/list>
    pub async fn channel(
        &self,
        ident: ChannelIdent<'_>,
        cancel: &CancellationToken,
    ) -> eyre::Result<Option<Channel>> {
        let params = match ident {
            ChannelIdent::Id(id) => ("id", id),
            ChannelIdent::Handle(handle) => ("forHandle", handle),
        };
        let response: ChannelListResponse = self
            .list(
                "channels",
                &[("part", "snippet,statistics,contentDetails"), params],
                cancel,
            )
            .await
            .context("resolve channel")?;

        tracing::debug!(
            ident = ?ident,
            returned_items = response.items.len(),
            "fetched channel"
        );

        Ok(response.items.into_iter().next())
    }

    /// One page of a playlist's items.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/playlistItems/list>
    async fn playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> eyre::Result<PlaylistItemListResponse> {
        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response: PlaylistItemListResponse = self
            .list("playlistItems", &params, cancel)
            .await
            .context("fetch playlist page")?;

        tracing::debug!(
            playlist_id,
            returned_items = response.items.len(),
            has_next = response.next_page_token.is_some(),
            "fetched playlist page"
        );

        Ok(response)
    }

    /// A lazy page walk over a playlist, following `nextPageToken` cursors
    /// until exhausted. Dropping the stream abandons the walk.
    pub fn playlist_pages(
        &self,
        playlist_id: String,
        max_results: u32,
        cancel: CancellationToken,
    ) -> impl Stream<Item = eyre::Result<PlaylistItemListResponse>> + Send + use<'_, T> {
        PageStream::new(move |page_token| {
            let playlist_id = playlist_id.clone();
            let cancel = cancel.clone();
            async move {
                let page = self
                    .playlist_items(&playlist_id, max_results, page_token.as_deref(), &cancel)
                    .await?;
                let next_token = page.next_page_token.clone();
                Ok((page, next_token))
            }
        })
    }

    /// Full statistics and snippets for up to 50 videos by ID.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/videos/list>
    pub async fn videos(
        &self,
        video_ids: &[String],
        cancel: &CancellationToken,
    ) -> eyre::Result<Vec<Video>> {
        let ids = video_ids.join(",");
        let response: VideoListResponse = self
            .list(
                "videos",
                &[
                    ("part", "snippet,statistics,contentDetails"),
                    ("id", ids.as_str()),
                ],
                cancel,
            )
            .await
            .context("fetch video statistics")?;

        tracing::debug!(
            requested = video_ids.len(),
            returned_items = response.items.len(),
            "fetched video batch"
        );

        Ok(response.items)
    }

    /// Up to `max_results` top-level comment threads for a video, ordered
    /// by relevance.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/commentThreads/list>
    pub async fn comment_threads(
        &self,
        video_id: &str,
        max_results: u32,
        cancel: &CancellationToken,
    ) -> eyre::Result<Vec<CommentThread>> {
        let max_results = max_results.to_string();
        let response: CommentThreadListResponse = self
            .list(
                "commentThreads",
                &[
                    ("part", "snippet"),
                    ("videoId", video_id),
                    ("order", "relevance"),
                    ("maxResults", max_results.as_str()),
                ],
                cancel,
            )
            .await
            .context("fetch comment threads")?;

        Ok(response.items)
    }

    /// A single comment by ID; the secondary lookup used when a thread's
    /// inline snippet carries no usable text.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/comments/list>
    pub async fn comment(
        &self,
        comment_id: &str,
        cancel: &CancellationToken,
    ) -> eyre::Result<Option<Comment>> {
        let response: CommentListResponse = self
            .list(
                "comments",
                &[("part", "snippet"), ("id", comment_id)],
                cancel,
            )
            .await
            .context("fetch comment by id")?;

        Ok(response.items.into_iter().next())
    }
}
