//! Best-effort "top comment" enrichment.
//!
//! For each video we look for the highest-relevance top-level comment that
//! was not written by the channel owner. Comment availability is flaky by
//! nature (disabled comments, moderation, deleted authors), so every
//! per-video failure degrades to "no comment" and the listing itself never
//! fails because of enrichment.

use crate::records::{TopComment, parse_timestamp};
use crate::session::{SessionManager, SessionToken};
use crate::transport::{self, Transport};
use crate::youtube_api::YouTubeClient;
use crate::youtube_api::comments::CommentThread;
use std::collections::HashMap;

/// Threads examined per video before giving up.
const THREADS_PER_VIDEO: u32 = 5;

/// Collects top comments for `video_ids`, skipping any authored by
/// `owner_channel_id`. Videos without an acceptable comment are simply
/// absent from the returned map.
///
/// Stops early (returning what it has) once the session is superseded.
pub async fn collect_top_comments<T: Transport>(
    youtube: &YouTubeClient<T>,
    owner_channel_id: &str,
    video_ids: impl IntoIterator<Item = String>,
    sessions: &SessionManager,
    token: &SessionToken,
) -> HashMap<String, TopComment> {
    let mut found = HashMap::new();

    for video_id in video_ids {
        if !sessions.is_current(token) {
            tracing::trace!("session superseded, abandoning comment enrichment");
            break;
        }

        match top_comment_for(youtube, owner_channel_id, &video_id, token).await {
            Ok(Some(comment)) => {
                found.insert(video_id, comment);
            }
            Ok(None) => {}
            Err(e) if transport::is_cancelled(&e) => break,
            Err(e) if transport::status_of(&e) == Some(403) => {
                tracing::debug!(video_id, "comments disabled, skipping");
            }
            Err(e) => {
                tracing::warn!(video_id, error = ?e, "comment lookup failed, skipping");
            }
        }
    }

    found
}

/// The two-level lookup for one video: scan up to [`THREADS_PER_VIDEO`]
/// relevance-ordered threads; when a thread's inline snippet has no usable
/// text but names a comment ID, fall back to a single-comment fetch.
async fn top_comment_for<T: Transport>(
    youtube: &YouTubeClient<T>,
    owner_channel_id: &str,
    video_id: &str,
    token: &SessionToken,
) -> eyre::Result<Option<TopComment>> {
    let threads = youtube
        .comment_threads(video_id, THREADS_PER_VIDEO, token.cancellation())
        .await?;

    for thread in &threads {
        if let Some(comment) = accept(thread, owner_channel_id) {
            return Ok(Some(comment));
        }

        // Inline snippet unusable; a comment ID still lets us ask for the
        // full resource.
        let Some(comment_id) = bare_comment_id(thread) else {
            continue;
        };
        let fetched = youtube.comment(comment_id, token.cancellation()).await?;
        if let Some(comment) = fetched {
            let authored_by_owner = comment.author_channel_id() == Some(owner_channel_id);
            if !authored_by_owner {
                if let Some(comment) = to_top_comment(&comment, thread) {
                    return Ok(Some(comment));
                }
            }
        }
    }

    Ok(None)
}

/// Accepts a thread's inline top-level comment when it has text and a
/// non-owner author.
fn accept(thread: &CommentThread, owner_channel_id: &str) -> Option<TopComment> {
    let comment = thread.snippet.as_ref()?.top_level_comment.as_ref()?;
    if comment.author_channel_id() == Some(owner_channel_id) {
        return None;
    }
    to_top_comment(comment, thread)
}

/// A thread whose inline comment lacks text but still carries an ID.
fn bare_comment_id(thread: &CommentThread) -> Option<&str> {
    let comment = thread.snippet.as_ref()?.top_level_comment.as_ref()?;
    if comment.text().is_some() {
        return None;
    }
    comment.id.as_deref()
}

fn to_top_comment(
    comment: &crate::youtube_api::comments::Comment,
    thread: &CommentThread,
) -> Option<TopComment> {
    let text = comment.text()?.to_string();
    let snippet = comment.snippet.as_ref();
    Some(TopComment {
        text,
        like_count: snippet.and_then(|s| s.like_count).unwrap_or(0),
        reply_count: thread
            .snippet
            .as_ref()
            .and_then(|s| s.total_reply_count)
            .unwrap_or(0),
        author: snippet.and_then(|s| s.author_display_name.clone()),
        published_at: parse_timestamp(snippet.and_then(|s| s.published_at.as_deref())),
    })
}
