//! Adapters into the canonical row shape, plus dedup and ordering.
//!
//! Each data source gets one adapter; the optional-field fallback chains
//! across heterogeneous shapes live here and nowhere else. The result set
//! ordering (views, then likes, then publish date, all descending) is load
//! bearing: it decides which videos surface first in the UI.

use crate::local_api::{LocalChannel, LocalVideoRow};
use crate::records::{
    ChannelRecord, TopComment, VideoRecord, VideoSource, coerce_count, parse_timestamp,
};
use crate::youtube_api::channels::Channel;
use crate::youtube_api::videos::Video;
use indexmap::IndexMap;
use jiff::Timestamp;
use std::collections::HashMap;

/// Fallback metadata captured while walking the uploads playlist, keyed by
/// video ID. Also defines the video-ID universe for the batch fetcher.
#[derive(Debug, Clone, Default)]
pub struct PlaylistEntry {
    pub title: Option<String>,
    pub published_at: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Adapts a local catalogue channel row.
pub fn local_channel_record(channel: LocalChannel) -> ChannelRecord {
    ChannelRecord {
        id: channel.channel_id,
        title: channel.title,
        handle: channel.custom_url,
        description: channel.description,
        subscriber_count: channel.subscriber_count,
        video_count: channel.video_count,
        view_count: channel.view_count,
    }
}

/// Adapts a platform API channel resource.
pub fn remote_channel_record(channel: &Channel) -> ChannelRecord {
    let snippet = channel.snippet.as_ref();
    let stats = channel.statistics.as_ref();
    ChannelRecord {
        id: channel.id.clone(),
        title: snippet.map(|s| s.title.clone()).unwrap_or_default(),
        handle: snippet.and_then(|s| s.custom_url.clone()),
        description: snippet.and_then(|s| s.description.clone()),
        subscriber_count: coerce_count(stats.and_then(|s| s.subscriber_count.as_deref())),
        video_count: coerce_count(stats.and_then(|s| s.video_count.as_deref())),
        view_count: coerce_count(stats.and_then(|s| s.view_count.as_deref())),
    }
}

/// Adapts a local catalogue video row.
pub fn local_video_record(row: LocalVideoRow) -> VideoRecord {
    let top_comment = row.top_comment.and_then(|c| {
        let text = c.text?.trim().to_string();
        if text.is_empty() {
            return None;
        }
        Some(TopComment {
            text,
            like_count: c.like_count,
            reply_count: c.reply_count,
            author: c.author,
            published_at: parse_timestamp(c.published_at.as_deref()),
        })
    });

    VideoRecord {
        id: row.video_id,
        title: row.title.unwrap_or_default(),
        published_at: parse_timestamp(row.published_at.as_deref()),
        thumbnail_url: row.thumbnail_url,
        view_count: row.view_count,
        like_count: row.like_count,
        favorite_count: row.favorite_count,
        comment_count: row.comment_count,
        top_comment,
        channel_id: row.channel_id,
        channel_title: row.channel_title,
        description: row.description,
        duration: row.duration,
        tags: row.tags,
        source: VideoSource::Local,
    }
}

/// Merges one batch-fetched video resource with its playlist fallback
/// entry and optional top comment. Returns `None` for items that came back
/// without a snippet, which are dropped from the result set.
pub fn remote_video_record(
    video: Video,
    fallback: Option<&PlaylistEntry>,
    top_comment: Option<TopComment>,
) -> Option<VideoRecord> {
    let snippet = video.snippet?;
    let stats = video.statistics.as_ref();

    let title = snippet
        .title
        .or_else(|| fallback.and_then(|f| f.title.clone()))
        .unwrap_or_default();
    let published_at = parse_timestamp(snippet.published_at.as_deref())
        .or_else(|| fallback.and_then(|f| parse_timestamp(f.published_at.as_deref())));
    let thumbnail_url = snippet
        .thumbnails
        .as_ref()
        .and_then(|t| t.best_url().map(str::to_string))
        .or_else(|| fallback.and_then(|f| f.thumbnail_url.clone()));

    Some(VideoRecord {
        id: video.id,
        title,
        published_at,
        thumbnail_url,
        view_count: coerce_count(stats.and_then(|s| s.view_count.as_deref())),
        like_count: coerce_count(stats.and_then(|s| s.like_count.as_deref())),
        favorite_count: coerce_count(stats.and_then(|s| s.favorite_count.as_deref())),
        comment_count: coerce_count(stats.and_then(|s| s.comment_count.as_deref())),
        top_comment,
        channel_id: snippet.channel_id,
        channel_title: snippet.channel_title,
        description: snippet.description,
        duration: video.content_details.and_then(|c| c.duration),
        tags: snippet.tags,
        source: VideoSource::Remote,
    })
}

/// Merges all batch results into canonical rows.
pub fn merge_remote(
    videos: Vec<Video>,
    fallback: &IndexMap<String, PlaylistEntry>,
    mut top_comments: HashMap<String, TopComment>,
) -> Vec<VideoRecord> {
    videos
        .into_iter()
        .filter_map(|video| {
            let entry = fallback.get(&video.id);
            let comment = top_comments.remove(&video.id);
            remote_video_record(video, entry, comment)
        })
        .collect()
}

/// Deduplicates by video ID (first occurrence wins) and applies the
/// canonical ordering: view count, then like count, then publish
/// timestamp, all descending. Rows with an unparsable publish date sort
/// last among otherwise equal rows.
pub fn dedupe_and_sort(rows: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut by_id: IndexMap<String, VideoRecord> = IndexMap::with_capacity(rows.len());
    for row in rows {
        by_id.entry(row.id.clone()).or_insert(row);
    }

    let mut rows: Vec<VideoRecord> = by_id.into_values().collect();
    rows.sort_by_key(|row| {
        std::cmp::Reverse((
            row.view_count,
            row.like_count,
            row.published_at.unwrap_or(Timestamp::UNIX_EPOCH),
        ))
    });
    rows
}
