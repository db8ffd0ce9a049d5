//! Client library for the external video-platform API.
//!
//! Covers the five read endpoints the resolution pipeline consumes:
//! `channels.list`, `playlistItems.list`, `videos.list`,
//! `commentThreads.list`, and `comments.list`. All requests go through the
//! [`crate::transport::Transport`] seam and carry the owning session's
//! cancellation token, so the transport can abandon work for superseded
//! sessions.
//!
//! Response types model only the fields the pipeline reads; unknown fields
//! are ignored on deserialization. Count fields stay in their stringly
//! wire form here and are coerced by the adapter layer.

pub mod channels;
pub mod client;
pub mod comments;
pub mod playlist_items;
pub mod types;
pub mod videos;

pub use channels::{Channel, ChannelSnippet, ChannelStatistics};
pub use client::{ChannelIdent, YouTubeClient};
pub use comments::{Comment, CommentThread};
pub use playlist_items::{PlaylistItem, PlaylistItemListResponse};
pub use types::{PageInfo, PageStream, Thumbnails};
pub use videos::{Video, VideoSnippet, VideoStatistics};
