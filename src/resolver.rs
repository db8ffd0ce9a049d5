//! The channel/video resolution pipeline.
//!
//! One [`ChannelResolver`] is owned by the search controller for its whole
//! lifetime. Each submitted query opens a resolution session, consults the
//! local catalogue first, falls back to the platform API (channel lookup,
//! uploads-playlist walk, statistics batches, optional comment
//! enrichment), and publishes incremental snapshots through the
//! session-gated [`StatePublisher`]. A superseded session stops at its
//! next checkpoint and never publishes again.

use crate::config::Config;
use crate::enrich;
use crate::local_api::{self, LocalCatalogClient};
use crate::normalize::{self, PlaylistEntry};
use crate::query::{self, ChannelQuery, QueryTarget};
use crate::records::{ChannelRecord, VideoRecord};
use crate::session::{SessionManager, SessionToken};
use crate::state::{ResultState, StateObserver, StatePublisher};
use crate::subscription::SubscriptionClient;
use crate::transport::{self, Transport, TransportError};
use crate::youtube_api::{ChannelIdent, YouTubeClient};
use crate::youtube_api::videos::Video;
use eyre::Context;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_stream::StreamExt;

/// The platform API accepts at most this many IDs per `videos.list` call.
const VIDEO_BATCH_SIZE: usize = 50;

/// User-visible message for the one terminal resolution error.
const NOT_FOUND: &str = "channel or uploads playlist not found";

/// Per-query options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Attach a "top comment" to each video where one can be found.
    pub include_top_comments: bool,
}

/// What a submitted query turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Empty input; published state was cleared.
    Cleared,
    /// The query was a pasted video URL; the caller should navigate to the
    /// video instead of rendering channel results.
    Video { video_id: String },
    /// The channel pipeline ran; results (or a terminal error) were
    /// published to the observer.
    Channel,
}

/// Resolves free-form queries into a channel plus its video catalogue.
#[derive(Debug)]
pub struct ChannelResolver<T> {
    sessions: Arc<SessionManager>,
    publisher: StatePublisher,
    local: LocalCatalogClient<T>,
    youtube: YouTubeClient<T>,
    subscriptions: SubscriptionClient<T>,
}

/// Result of a successful local-catalogue resolution.
struct LocalHit {
    channel: ChannelRecord,
    videos: Vec<VideoRecord>,
}

/// Page size for the uploads-playlist walk, chosen from the channel's
/// declared video count to balance request count against payload size.
fn page_size_for(declared_total: u64) -> u32 {
    if declared_total < 200 {
        50
    } else if declared_total <= 600 {
        25
    } else {
        10
    }
}

impl<T: Transport> ChannelResolver<T> {
    pub fn new(config: &Config, transport: Arc<T>, observer: StateObserver) -> Self {
        let sessions = Arc::new(SessionManager::new());
        Self {
            publisher: StatePublisher::new(Arc::clone(&sessions), observer),
            local: LocalCatalogClient::new(Arc::clone(&transport), config.local_base_url.clone()),
            youtube: YouTubeClient::new(
                Arc::clone(&transport),
                config.youtube_base_url.clone(),
                config.youtube_api_key.clone(),
            ),
            subscriptions: SubscriptionClient::new(
                transport,
                config.subscription_base_url.clone(),
            ),
            sessions,
        }
    }

    /// Interprets and resolves one submission. Channel queries run the full
    /// pipeline; video URLs short-circuit to navigation; empty input clears
    /// the published state.
    #[tracing::instrument(skip(self), ret)]
    pub async fn resolve(&self, raw: &str, options: ResolveOptions) -> Resolution {
        match query::interpret(raw) {
            QueryTarget::Empty => {
                let token = self.sessions.begin();
                self.publisher.publish(&token, |state| *state = ResultState::default());
                Resolution::Cleared
            }
            QueryTarget::Video { video_id } => {
                tracing::debug!(video_id, "query is a video URL, deferring to video navigation");
                Resolution::Video { video_id }
            }
            QueryTarget::Channel(channel_query) => {
                self.resolve_query(channel_query, options).await;
                Resolution::Channel
            }
        }
    }

    /// Runs the pipeline for an already-interpreted query (for example a
    /// suggestion click carrying an explicit channel ID).
    pub async fn resolve_query(&self, query: ChannelQuery, options: ResolveOptions) {
        let token = self.sessions.begin();
        self.publisher.publish(&token, |state| {
            *state = ResultState {
                is_loading: true,
                channel_name: Some(query.raw.clone()),
                ..ResultState::default()
            };
        });

        if let Err(e) = self.run_session(&token, &query, options).await {
            if transport::is_cancelled(&e) {
                tracing::trace!(query = %query.raw, "resolution superseded, discarding");
                return;
            }
            tracing::error!(query = %query.raw, error = ?e, "channel resolution failed");
            self.publisher.publish(&token, |state| {
                state.error = Some(e.to_string());
                state.is_loading = false;
            });
        }
    }

    /// Cancels the in-flight session, if any (controller teardown).
    pub fn shutdown(&self) {
        self.sessions.cancel();
    }

    /// The latest published snapshot.
    pub fn state(&self) -> ResultState {
        self.publisher.current_state()
    }

    /// Converts a stale session into the silent cancellation error so the
    /// whole pipeline funnels through one discard point.
    fn ensure_current(&self, token: &SessionToken) -> eyre::Result<()> {
        if self.sessions.is_current(token) {
            Ok(())
        } else {
            Err(TransportError::Cancelled.into())
        }
    }

    async fn run_session(
        &self,
        token: &SessionToken,
        query: &ChannelQuery,
        options: ResolveOptions,
    ) -> eyre::Result<()> {
        tracing::debug!(query = %query.raw, "resolving against local catalogue");
        if let Some(hit) = self.try_local(token, query, options).await? {
            let LocalHit { channel, videos } = hit;
            let channel_id = channel.id.clone();
            tracing::info!(
                query = %query.raw,
                channel = %channel_id,
                videos = videos.len(),
                "resolved from local catalogue"
            );
            self.publisher.publish(token, move |state| {
                state.channel_name = Some(channel.title.clone());
                state.channel_id = Some(channel.id.clone());
                state.channel = Some(channel);
                state.videos = videos;
                state.is_loading = false;
            });
            self.hydrate_subscription(token, &channel_id).await;
            return Ok(());
        }

        self.ensure_current(token)?;
        tracing::debug!(query = %query.raw, "local miss, resolving via platform API");
        let (channel, uploads_playlist) = self.resolve_remote_channel(token, query).await?;
        let owner_id = channel.id.clone();
        let declared_total = channel.video_count;
        // Channel metadata goes out immediately so the header can render
        // while the catalogue is still being assembled.
        self.publisher.publish(token, move |state| {
            state.channel_name = Some(channel.title.clone());
            state.channel_id = Some(channel.id.clone());
            state.channel = Some(channel);
        });

        self.ensure_current(token)?;
        let universe = self
            .walk_uploads(token, &uploads_playlist, page_size_for(declared_total))
            .await?;
        let video_ids: Vec<String> = universe.keys().cloned().collect();
        let stats = self.fetch_video_batches(token, &video_ids).await?;

        let top_comments = if options.include_top_comments {
            enrich::collect_top_comments(
                &self.youtube,
                &owner_id,
                stats.iter().map(|v| v.id.clone()).collect::<Vec<_>>(),
                &self.sessions,
                token,
            )
            .await
        } else {
            HashMap::new()
        };

        let rows = normalize::dedupe_and_sort(normalize::merge_remote(stats, &universe, top_comments));
        tracing::info!(
            query = %query.raw,
            channel = %owner_id,
            videos = rows.len(),
            "resolved from platform API"
        );
        self.publisher.publish(token, move |state| {
            state.videos = rows;
            state.is_loading = false;
        });
        Ok(())
    }

    /// The local-first leg. Returns `None` on any kind of local miss so the
    /// remote path always gets its chance; only cancellation propagates.
    async fn try_local(
        &self,
        token: &SessionToken,
        query: &ChannelQuery,
        options: ResolveOptions,
    ) -> eyre::Result<Option<LocalHit>> {
        let Some(channel) = self
            .local
            .lookup_channel(query, token.cancellation())
            .await?
        else {
            return Ok(None);
        };

        self.ensure_current(token)?;
        let rows = match self
            .local
            .videos(
                &channel.channel_id,
                options.include_top_comments,
                token.cancellation(),
            )
            .await
        {
            Ok(rows) => rows,
            Err(e) if transport::is_cancelled(&e) => return Err(e),
            Err(e) if local_api::is_soft_miss(&e) => {
                tracing::debug!(
                    channel = %channel.channel_id,
                    "local videos unavailable, falling back to remote"
                );
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!(
                    channel = %channel.channel_id,
                    error = ?e,
                    "local video listing failed, falling back to remote"
                );
                return Ok(None);
            }
        };

        let channel = normalize::local_channel_record(channel);
        let videos = normalize::dedupe_and_sort(
            rows.into_iter().map(normalize::local_video_record).collect(),
        );
        Ok(Some(LocalHit { channel, videos }))
    }

    /// Resolves the canonical channel remotely. A missing channel or a
    /// channel without an uploads playlist is the terminal error of the
    /// pipeline.
    async fn resolve_remote_channel(
        &self,
        token: &SessionToken,
        query: &ChannelQuery,
    ) -> eyre::Result<(ChannelRecord, String)> {
        let ident = match query.channel_id() {
            Some(id) => ChannelIdent::Id(id),
            None => ChannelIdent::Handle(query.handle()),
        };
        let channel = self
            .youtube
            .channel(ident, token.cancellation())
            .await
            .context("resolve channel from platform API")?;

        let Some(channel) = channel else {
            eyre::bail!(NOT_FOUND);
        };
        let Some(uploads) = channel.uploads_playlist_id() else {
            eyre::bail!(NOT_FOUND);
        };
        let uploads = uploads.to_string();
        Ok((normalize::remote_channel_record(&channel), uploads))
    }

    /// Walks the uploads playlist and records every entry into the ordered
    /// video-ID universe. Currency is re-checked after every page.
    async fn walk_uploads(
        &self,
        token: &SessionToken,
        playlist_id: &str,
        page_size: u32,
    ) -> eyre::Result<IndexMap<String, PlaylistEntry>> {
        let mut universe = IndexMap::new();

        let pages = self.youtube.playlist_pages(
            playlist_id.to_string(),
            page_size,
            token.cancellation().clone(),
        );
        let mut pages = std::pin::pin!(pages);
        while let Some(page) = pages.next().await {
            let page = page.context("walk uploads playlist")?;
            self.ensure_current(token)?;

            for item in page.items {
                let Some(snippet) = item.snippet else { continue };
                let Some(video_id) = snippet.resource_id.as_ref().and_then(|r| r.video_id.clone())
                else {
                    continue;
                };
                let thumbnail_url = snippet
                    .thumbnails
                    .as_ref()
                    .and_then(|t| t.best_url().map(str::to_string));
                universe.entry(video_id).or_insert(PlaylistEntry {
                    title: snippet.title,
                    published_at: snippet.published_at,
                    thumbnail_url,
                });
            }
        }

        tracing::debug!(playlist_id, videos = universe.len(), "collected video universe");
        Ok(universe)
    }

    /// Fetches full statistics for the universe in fixed-size ID batches,
    /// re-checking currency before each batch.
    async fn fetch_video_batches(
        &self,
        token: &SessionToken,
        video_ids: &[String],
    ) -> eyre::Result<Vec<Video>> {
        let mut collected = Vec::with_capacity(video_ids.len());
        for batch in video_ids.chunks(VIDEO_BATCH_SIZE) {
            self.ensure_current(token)?;
            let mut videos = self
                .youtube
                .videos(batch, token.cancellation())
                .await
                .context("fetch video statistics batch")?;
            collected.append(&mut videos);
        }
        Ok(collected)
    }

    /// Fills in subscription status after a local hit. Failures here never
    /// disturb the already-published results.
    async fn hydrate_subscription(&self, token: &SessionToken, channel_id: &str) {
        if !self
            .publisher
            .publish(token, |state| state.is_subscription_loading = true)
        {
            return;
        }

        match self
            .subscriptions
            .status(channel_id, token.cancellation())
            .await
        {
            Ok(status) => {
                self.publisher.publish(token, |state| {
                    state.is_subscribed = status;
                    state.is_subscription_loading = false;
                });
            }
            Err(e) if transport::is_cancelled(&e) => {}
            Err(e) => {
                tracing::warn!(channel_id, error = ?e, "subscription status lookup failed");
                self.publisher
                    .publish(token, |state| state.is_subscription_loading = false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::VideoSource;
    use crate::transport::fake::FakeTransport;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    const YT: &str = "http://yt.test/v3";
    const LOCAL: &str = "http://local.test/api";

    fn test_config() -> Config {
        Config {
            youtube_api_key: "test-key".into(),
            youtube_base_url: YT.into(),
            local_base_url: LOCAL.into(),
            subscription_base_url: LOCAL.into(),
        }
    }

    fn build(
        handler: impl Fn(&str, &[(&str, &str)]) -> Result<Value, TransportError>
        + Send
        + Sync
        + 'static,
    ) -> (
        ChannelResolver<FakeTransport>,
        Arc<FakeTransport>,
        mpsc::UnboundedReceiver<ResultState>,
    ) {
        let transport = Arc::new(FakeTransport::new(handler));
        let (tx, rx) = mpsc::unbounded_channel();
        let resolver = ChannelResolver::new(&test_config(), Arc::clone(&transport), tx);
        (resolver, transport, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ResultState>) -> Vec<ResultState> {
        let mut snapshots = Vec::new();
        while let Ok(state) = rx.try_recv() {
            snapshots.push(state);
        }
        snapshots
    }

    fn param<'q>(query: &'q [(&str, &str)], key: &str) -> Option<&'q str> {
        query.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn not_found(url: &str) -> TransportError {
        TransportError::Status {
            url: url.to_string(),
            status: 404,
            body: "not found".into(),
        }
    }

    fn remote_channel_json(id: &str, title: &str, video_count: &str) -> Value {
        json!({
            "items": [{
                "id": id,
                "snippet": {"title": title, "customUrl": format!("@{title}")},
                "statistics": {
                    "subscriberCount": "1000",
                    "videoCount": video_count,
                    "viewCount": "50000",
                },
                "contentDetails": {"relatedPlaylists": {"uploads": format!("UU{}", &id[2..])}},
            }],
            "pageInfo": {"totalResults": 1, "resultsPerPage": 1},
        })
    }

    fn playlist_page_json(entries: &[(&str, &str)], next: Option<&str>) -> Value {
        json!({
            "items": entries.iter().map(|(id, published)| json!({
                "snippet": {
                    "title": format!("video {id}"),
                    "publishedAt": published,
                    "thumbnails": {"medium": {"url": format!("http://img.test/{id}.jpg")}},
                    "resourceId": {"videoId": id},
                }
            })).collect::<Vec<_>>(),
            "nextPageToken": next,
            "pageInfo": {"totalResults": entries.len(), "resultsPerPage": entries.len()},
        })
    }

    fn video_json(id: &str, views: &str, likes: &str, published: &str) -> Value {
        json!({
            "id": id,
            "snippet": {
                "title": format!("video {id}"),
                "publishedAt": published,
                "channelId": "UCexample0000000000000000",
                "channelTitle": "Example",
            },
            "statistics": {
                "viewCount": views,
                "likeCount": likes,
                "favoriteCount": "0",
                "commentCount": "3",
            },
            "contentDetails": {"duration": "PT4M13S"},
        })
    }

    /// The full fallback walk: local 404, remote handle resolution, one
    /// playlist page, one statistics batch, three-key ordering of the
    /// result.
    #[tokio::test]
    async fn falls_back_to_remote_and_sorts_results() {
        let (resolver, transport, mut rx) = build(|url, query| {
            if url.starts_with(LOCAL) {
                return Err(not_found(url));
            }
            if url.contains("/channels") {
                assert_eq!(param(query, "forHandle"), Some("exampleChan"));
                return Ok(remote_channel_json("UCexample0000000000000000", "exampleChan", "3"));
            }
            if url.contains("/playlistItems") {
                assert_eq!(param(query, "playlistId"), Some("UUexample0000000000000000"));
                return Ok(playlist_page_json(
                    &[
                        ("vid_aaaaaaa", "2024-01-01T00:00:00Z"),
                        ("vid_bbbbbbb", "2024-02-01T00:00:00Z"),
                        ("vid_ccccccc", "2023-01-01T00:00:00Z"),
                    ],
                    None,
                ));
            }
            if url.contains("/videos") {
                return Ok(json!({
                    "items": [
                        video_json("vid_aaaaaaa", "100", "5", "2024-01-01T00:00:00Z"),
                        video_json("vid_bbbbbbb", "50", "5", "2024-02-01T00:00:00Z"),
                        video_json("vid_ccccccc", "50", "5", "2023-01-01T00:00:00Z"),
                    ],
                    "pageInfo": {"totalResults": 3, "resultsPerPage": 3},
                }));
            }
            Err(not_found(url))
        });

        let outcome = resolver
            .resolve("@exampleChan", ResolveOptions::default())
            .await;
        assert_eq!(outcome, Resolution::Channel);

        let snapshots = drain(&mut rx);
        let last = snapshots.last().unwrap();
        assert_eq!(last.error, None);
        assert!(!last.is_loading);
        assert_eq!(last.channel_id.as_deref(), Some("UCexample0000000000000000"));

        let ids: Vec<_> = last.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["vid_aaaaaaa", "vid_bbbbbbb", "vid_ccccccc"]);
        assert!(last.videos.iter().all(|v| v.source == VideoSource::Remote));
        assert_eq!(last.videos[0].view_count, 100);
        assert_eq!(last.videos[0].duration.as_deref(), Some("PT4M13S"));

        // Channel metadata was published before any videos arrived.
        let header = snapshots
            .iter()
            .find(|s| s.channel.is_some())
            .expect("channel metadata snapshot");
        assert!(header.videos.is_empty());
        assert!(header.is_loading);

        // Three declared videos means the largest page size.
        assert!(
            transport
                .calls()
                .iter()
                .any(|c| c.contains("playlistItems") && c.contains("maxResults=50"))
        );
    }

    /// A local hit never touches the platform API, and subscription status
    /// is hydrated afterwards.
    #[tokio::test]
    async fn local_hit_skips_remote_calls() {
        let (resolver, transport, mut rx) = build(|url, query| {
            if url.ends_with("/channels/by-custom-url") {
                if param(query, "custom_url") == Some("localchan") {
                    return Ok(json!({"data": {
                        "channel_id": "UClocal00000000000000000",
                        "title": "Local Channel",
                        "custom_url": "@localchan",
                        "subscriber_count": 42,
                        "video_count": 2,
                        "view_count": "900",
                    }}));
                }
                return Err(not_found(url));
            }
            if url.contains("/videos") && url.starts_with(LOCAL) {
                assert_eq!(param(query, "include_top_comment"), Some("false"));
                return Ok(json!({"data": [
                    {
                        "video_id": "vid_local_b",
                        "title": "quiet one",
                        "view_count": "not-a-number",
                        "published_at": "2022-05-01T00:00:00Z",
                    },
                    {
                        "video_id": "vid_local_a",
                        "title": "popular one",
                        "view_count": 10,
                        "like_count": "3",
                        "published_at": "2023-05-01T00:00:00Z",
                    },
                ], "meta": {"total": 2}}));
            }
            if url.contains("/subscriptions/status") {
                return Ok(json!({"subscribed": true}));
            }
            Err(not_found(url))
        });

        resolver.resolve("localchan", ResolveOptions::default()).await;

        assert!(
            transport.calls().iter().all(|c| !c.contains("yt.test")),
            "local hit must not touch the platform API: {:?}",
            transport.calls()
        );

        let snapshots = drain(&mut rx);
        let last = snapshots.last().unwrap();
        assert_eq!(last.channel_id.as_deref(), Some("UClocal00000000000000000"));
        assert_eq!(last.channel.as_ref().unwrap().subscriber_count, 42);
        assert_eq!(last.is_subscribed, Some(true));
        assert!(!last.is_subscription_loading);

        // Garbage counts coerced to 0 push that row below the parsed one.
        let ids: Vec<_> = last.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["vid_local_a", "vid_local_b"]);
        assert_eq!(last.videos[1].view_count, 0);
        assert!(last.videos.iter().all(|v| v.source == VideoSource::Local));

        assert!(
            snapshots
                .iter()
                .any(|s| s.is_subscription_loading && !s.videos.is_empty()),
            "subscription hydration happens after videos are published"
        );
    }

    /// An unknown channel surfaces the terminal error and nothing else.
    #[tokio::test]
    async fn missing_remote_channel_is_terminal() {
        let (resolver, _transport, mut rx) = build(|url, _query| {
            if url.starts_with(LOCAL) {
                return Err(not_found(url));
            }
            if url.contains("/channels") {
                return Ok(json!({"items": [], "pageInfo": {"totalResults": 0, "resultsPerPage": 0}}));
            }
            Err(not_found(url))
        });

        resolver.resolve("@nobody", ResolveOptions::default()).await;

        let snapshots = drain(&mut rx);
        let last = snapshots.last().unwrap();
        assert_eq!(last.error.as_deref(), Some(NOT_FOUND));
        assert!(!last.is_loading);
        assert!(last.videos.is_empty());
    }

    /// Large catalogues get the small adaptive page size, a multi-page
    /// walk, and multiple fixed-size statistics batches.
    #[tokio::test]
    async fn adaptive_paging_and_batching() {
        // 6 playlist pages of 10 entries each, then 60 stats in two batches.
        let (resolver, transport, mut rx) = build(|url, query| {
            if url.starts_with(LOCAL) {
                return Err(not_found(url));
            }
            if url.contains("/channels") {
                return Ok(remote_channel_json("UCbig0000000000000000000", "bigchan", "700"));
            }
            if url.contains("/playlistItems") {
                assert_eq!(param(query, "maxResults"), Some("10"));
                let page: u64 = match param(query, "pageToken") {
                    None => 0,
                    Some(tok) => tok.strip_prefix("page-").unwrap().parse().unwrap(),
                };
                let entries: Vec<(String, String)> = (page * 10..page * 10 + 10)
                    .map(|i| (format!("vid{i:08}"), "2024-01-01T00:00:00Z".to_string()))
                    .collect();
                let borrowed: Vec<(&str, &str)> = entries
                    .iter()
                    .map(|(id, ts)| (id.as_str(), ts.as_str()))
                    .collect();
                let next = (page < 5).then(|| format!("page-{}", page + 1));
                return Ok(playlist_page_json(&borrowed, next.as_deref()));
            }
            if url.contains("/videos") {
                let ids = param(query, "id").unwrap();
                let items: Vec<Value> = ids
                    .split(',')
                    .map(|id| {
                        let n: u64 = id.trim_start_matches("vid").parse().unwrap();
                        video_json(id, &n.to_string(), "0", "2024-01-01T00:00:00Z")
                    })
                    .collect();
                return Ok(json!({"items": items, "pageInfo": {"totalResults": items.len(), "resultsPerPage": items.len()}}));
            }
            Err(not_found(url))
        });

        resolver.resolve("@bigchan", ResolveOptions::default()).await;

        let calls = transport.calls();
        let playlist_calls = calls.iter().filter(|c| c.contains("playlistItems")).count();
        assert_eq!(playlist_calls, 6);
        let batch_calls: Vec<_> = calls.iter().filter(|c| c.contains("/videos")).collect();
        assert_eq!(batch_calls.len(), 2);
        assert_eq!(batch_calls[0].matches("vid0").count(), 50);
        assert_eq!(batch_calls[1].matches("vid0").count(), 10);

        let snapshots = drain(&mut rx);
        let last = snapshots.last().unwrap();
        assert_eq!(last.videos.len(), 60);
        // Highest view count (the highest index) first.
        assert_eq!(last.videos[0].id, "vid00000059");
        assert!(
            last.videos
                .windows(2)
                .all(|w| w[0].view_count >= w[1].view_count)
        );
    }

    /// One video's threads return 403; the rest of the batch still gets
    /// enriched.
    #[tokio::test]
    async fn comment_enrichment_is_best_effort() {
        let (resolver, _transport, mut rx) = build(|url, query| {
            if url.starts_with(LOCAL) {
                return Err(not_found(url));
            }
            if url.contains("/channels") {
                return Ok(remote_channel_json("UCexample0000000000000000", "exampleChan", "2"));
            }
            if url.contains("/playlistItems") {
                return Ok(playlist_page_json(
                    &[
                        ("vid_aaaaaaa", "2024-01-01T00:00:00Z"),
                        ("vid_bbbbbbb", "2024-02-01T00:00:00Z"),
                    ],
                    None,
                ));
            }
            if url.contains("/videos") {
                return Ok(json!({
                    "items": [
                        video_json("vid_aaaaaaa", "100", "5", "2024-01-01T00:00:00Z"),
                        video_json("vid_bbbbbbb", "50", "5", "2024-02-01T00:00:00Z"),
                    ],
                    "pageInfo": {"totalResults": 2, "resultsPerPage": 2},
                }));
            }
            if url.contains("/commentThreads") {
                if param(query, "videoId") == Some("vid_bbbbbbb") {
                    return Err(TransportError::Status {
                        url: url.to_string(),
                        status: 403,
                        body: "commentsDisabled".into(),
                    });
                }
                return Ok(json!({"items": [{
                    "snippet": {
                        "totalReplyCount": 1,
                        "topLevelComment": {
                            "id": "c1",
                            "snippet": {
                                "textDisplay": "first!",
                                "authorDisplayName": "a fan",
                                "authorChannelId": {"value": "UCfan00000000000000000000"},
                                "likeCount": 9,
                            }
                        }
                    }
                }]}));
            }
            Err(not_found(url))
        });

        resolver
            .resolve(
                "@exampleChan",
                ResolveOptions {
                    include_top_comments: true,
                },
            )
            .await;

        let snapshots = drain(&mut rx);
        let last = snapshots.last().unwrap();
        assert_eq!(last.error, None);
        assert_eq!(last.videos.len(), 2);

        let enriched = &last.videos[0];
        assert_eq!(enriched.id, "vid_aaaaaaa");
        let comment = enriched.top_comment.as_ref().expect("top comment");
        assert_eq!(comment.text, "first!");
        assert_eq!(comment.like_count, 9);
        assert_eq!(last.videos[1].top_comment, None);
    }

    /// P1: a slow superseded query never overwrites the newer result.
    #[tokio::test]
    async fn stale_sessions_never_overwrite_newer_results() {
        let (resolver, transport, mut rx) = build(|url, query| {
            if url.starts_with(LOCAL) {
                return Err(not_found(url));
            }
            if url.contains("/channels") {
                return Ok(match param(query, "forHandle") {
                    Some("alphachan") => {
                        remote_channel_json("UCalpha00000000000000000", "alphachan", "1")
                    }
                    Some("betachan") => {
                        remote_channel_json("UCbeta000000000000000000", "betachan", "1")
                    }
                    other => panic!("unexpected channel lookup: {other:?}"),
                });
            }
            if url.contains("/playlistItems") {
                let id = if param(query, "playlistId").unwrap().contains("alpha") {
                    "vid_alpha00"
                } else {
                    "vid_beta000"
                };
                return Ok(playlist_page_json(&[(id, "2024-01-01T00:00:00Z")], None));
            }
            if url.contains("/videos") {
                let id = param(query, "id").unwrap();
                return Ok(json!({
                    "items": [video_json(id, "10", "1", "2024-01-01T00:00:00Z")],
                    "pageInfo": {"totalResults": 1, "resultsPerPage": 1},
                }));
            }
            Err(not_found(url))
        });

        // Hold the first query's remote channel lookup until the second
        // query has fully resolved.
        let release = transport.gate("yt.test/v3/channels", "alphachan");

        tokio::join!(resolver.resolve("@alphachan", ResolveOptions::default()), async {
            tokio::task::yield_now().await;
            resolver
                .resolve("@betachan", ResolveOptions::default())
                .await;
            release.notify_one();
        });

        // The stale request did run to completion...
        assert!(
            transport
                .calls()
                .iter()
                .any(|c| c.contains("forHandle=alphachan"))
        );

        // ...but nothing it produced was ever published.
        let snapshots = drain(&mut rx);
        assert!(
            snapshots
                .iter()
                .all(|s| s.channel_id.as_deref() != Some("UCalpha00000000000000000"))
        );

        let last = snapshots.last().unwrap();
        assert_eq!(last.channel_id.as_deref(), Some("UCbeta000000000000000000"));
        assert_eq!(last.videos.len(), 1);
        assert_eq!(last.videos[0].id, "vid_beta000");
        assert!(!last.is_loading);
    }

    #[tokio::test]
    async fn empty_query_clears_state() {
        let (resolver, transport, mut rx) = build(|url, _| Err(not_found(url)));

        let outcome = resolver.resolve("   ", ResolveOptions::default()).await;
        assert_eq!(outcome, Resolution::Cleared);
        assert!(transport.calls().is_empty());

        let snapshots = drain(&mut rx);
        assert_eq!(snapshots.last().unwrap(), &ResultState::default());
    }

    #[tokio::test]
    async fn video_urls_short_circuit_to_navigation() {
        let (resolver, transport, mut rx) = build(|url, _| Err(not_found(url)));

        let outcome = resolver
            .resolve("https://youtu.be/dQw4w9WgXcQ", ResolveOptions::default())
            .await;
        assert_eq!(
            outcome,
            Resolution::Video {
                video_id: "dQw4w9WgXcQ".into()
            }
        );
        assert!(transport.calls().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn page_size_tracks_declared_catalogue_size() {
        assert_eq!(page_size_for(0), 50);
        assert_eq!(page_size_for(199), 50);
        assert_eq!(page_size_for(200), 25);
        assert_eq!(page_size_for(600), 25);
        assert_eq!(page_size_for(601), 10);
    }
}
