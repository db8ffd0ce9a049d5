//! `commentThreads.list` and `comments.list` resource types.

use serde::{Deserialize, Serialize};

/// Response structure for the `commentThreads.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/commentThreads/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
}

/// A top-level comment with reply metadata.
///
/// See: <https://developers.google.com/youtube/v3/docs/commentThreads#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(default)]
    pub snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment", default)]
    pub top_level_comment: Option<Comment>,
    #[serde(rename = "totalReplyCount", default)]
    pub total_reply_count: Option<u64>,
}

/// Response structure for the `comments.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/comments/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentListResponse {
    #[serde(default)]
    pub items: Vec<Comment>,
}

/// A `comment` resource.
///
/// See: <https://developers.google.com/youtube/v3/docs/comments#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSnippet {
    /// HTML-formatted comment text as shown in the UI.
    #[serde(rename = "textDisplay", default)]
    pub text_display: Option<String>,
    /// Raw comment text; only present for requesters with full access.
    #[serde(rename = "textOriginal", default)]
    pub text_original: Option<String>,
    #[serde(rename = "authorDisplayName", default)]
    pub author_display_name: Option<String>,
    #[serde(rename = "authorChannelId", default)]
    pub author_channel_id: Option<AuthorChannelId>,
    /// Like count arrives numeric on this endpoint, unlike video counts.
    #[serde(rename = "likeCount", default)]
    pub like_count: Option<u64>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorChannelId {
    #[serde(default)]
    pub value: Option<String>,
}

impl Comment {
    /// The comment's display text, preferring the rendered form.
    pub fn text(&self) -> Option<&str> {
        let snippet = self.snippet.as_ref()?;
        snippet
            .text_display
            .as_deref()
            .or(snippet.text_original.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// The channel ID of the comment's author, when attributed.
    pub fn author_channel_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()?
            .author_channel_id
            .as_ref()?
            .value
            .as_deref()
    }
}
