//! Interpretation of raw search input.
//!
//! A submitted query is either a pasted video URL (which short-circuits to
//! video navigation), an explicit channel ID, or a handle/custom-URL
//! candidate. Interpretation is pure string work; no network calls happen
//! here.

use url::Url;

/// Character set of YouTube video and channel identifiers.
fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// An 11-character video ID.
pub fn is_video_id(s: &str) -> bool {
    s.len() == 11 && s.chars().all(is_id_char)
}

/// The canonical channel-ID shape: `UC` followed by 22 ID characters.
pub fn looks_like_channel_id(s: &str) -> bool {
    s.len() == 24 && s.starts_with("UC") && s.chars().all(is_id_char)
}

/// What a raw query turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// Input was empty after trimming; published state should be cleared.
    Empty,
    /// Input was a video URL; the caller navigates to the video instead of
    /// running the channel pipeline.
    Video { video_id: String },
    /// Input identifies a channel, by ID or by handle.
    Channel(ChannelQuery),
}

/// One channel search submission.
///
/// Immutable once built. `explicit_channel_id` is set when the user picked
/// a concrete suggestion or typed a canonical channel ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelQuery {
    pub raw: String,
    pub explicit_channel_id: Option<String>,
}

impl ChannelQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            explicit_channel_id: None,
        }
    }

    /// A query produced by a suggestion click, which carries the channel ID
    /// alongside the displayed name.
    pub fn with_channel_id(raw: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            explicit_channel_id: Some(channel_id.into()),
        }
    }

    /// The channel ID to use for by-ID lookups, if the query names one
    /// explicitly or is itself shaped like one.
    pub fn channel_id(&self) -> Option<&str> {
        if let Some(id) = self.explicit_channel_id.as_deref() {
            return Some(id);
        }
        looks_like_channel_id(&self.raw).then_some(self.raw.as_str())
    }

    /// The handle form of the query, without a leading `@`.
    pub fn handle(&self) -> &str {
        self.raw.strip_prefix('@').unwrap_or(&self.raw)
    }

    /// Custom-URL lookup candidates, in priority order with duplicates
    /// removed: the query as typed, without a leading `@`, and with one.
    pub fn custom_url_candidates(&self) -> Vec<String> {
        let bare = self.handle();
        let mut candidates = vec![self.raw.clone(), bare.to_string(), format!("@{bare}")];
        let mut seen = Vec::with_capacity(candidates.len());
        candidates.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(c.clone());
                true
            }
        });
        candidates
    }
}

/// Interprets raw user input, in priority order: video URL, then explicit
/// channel ID, then handle.
pub fn interpret(raw: &str) -> QueryTarget {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return QueryTarget::Empty;
    }

    if let Some(video_id) = video_id_from_url(trimmed) {
        return QueryTarget::Video { video_id };
    }

    QueryTarget::Channel(if looks_like_channel_id(trimmed) {
        ChannelQuery::with_channel_id(trimmed, trimmed)
    } else {
        ChannelQuery::new(trimmed)
    })
}

/// Extracts an 11-character video ID from the recognized URL shapes:
/// `youtu.be/<id>`, `…/watch?v=<id>`, `…/embed/<id>`, and `…/v/<id>`.
pub fn video_id_from_url(input: &str) -> Option<String> {
    let url = parse_lenient(input)?;
    let host = url.host_str()?;

    let id = if host == "youtu.be" || host.ends_with(".youtu.be") {
        url.path_segments()?.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        let mut segments = url.path_segments()?;
        match segments.next()? {
            "watch" => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            "embed" | "v" => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    }?;

    is_video_id(&id).then_some(id)
}

/// Parses a URL, tolerating a missing scheme the way pasted addresses
/// usually come ("youtu.be/xyz", "www.youtube.com/watch?v=xyz").
fn parse_lenient(input: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(input) {
        return Some(url);
    }
    if input.starts_with("youtube.com")
        || input.starts_with("www.youtube.com")
        || input.starts_with("m.youtube.com")
        || input.starts_with("youtu.be")
    {
        return Url::parse(&format!("https://{input}")).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_clears() {
        assert_eq!(interpret(""), QueryTarget::Empty);
        assert_eq!(interpret("   "), QueryTarget::Empty);
    }

    #[test]
    fn short_url_yields_video() {
        assert_eq!(
            interpret("https://youtu.be/dQw4w9WgXcQ"),
            QueryTarget::Video {
                video_id: "dQw4w9WgXcQ".into()
            }
        );
        // Pasted without a scheme.
        assert_eq!(
            interpret("youtu.be/dQw4w9WgXcQ?t=42"),
            QueryTarget::Video {
                video_id: "dQw4w9WgXcQ".into()
            }
        );
    }

    #[test]
    fn watch_embed_and_v_urls_yield_video() {
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLx",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "www.youtube.com/v/dQw4w9WgXcQ",
        ] {
            assert_eq!(
                interpret(input),
                QueryTarget::Video {
                    video_id: "dQw4w9WgXcQ".into()
                },
                "input: {input}"
            );
        }
    }

    #[test]
    fn malformed_video_ids_fall_through_to_channel_search() {
        // Wrong length and a non-YouTube host must not navigate.
        assert!(matches!(
            interpret("https://youtu.be/short"),
            QueryTarget::Channel(_)
        ));
        assert!(matches!(
            interpret("https://vimeo.com/watch?v=dQw4w9WgXcQ"),
            QueryTarget::Channel(_)
        ));
    }

    #[test]
    fn canonical_channel_id_is_explicit() {
        let id = "UCuAXFkgsw1L7xaCfnd5JJOw";
        match interpret(id) {
            QueryTarget::Channel(q) => {
                assert_eq!(q.channel_id(), Some(id));
                assert_eq!(q.raw, id);
            }
            other => panic!("expected channel query, got {other:?}"),
        }
    }

    #[test]
    fn handles_are_not_channel_ids() {
        match interpret("@exampleChan") {
            QueryTarget::Channel(q) => {
                assert_eq!(q.channel_id(), None);
                assert_eq!(q.handle(), "exampleChan");
            }
            other => panic!("expected channel query, got {other:?}"),
        }
    }

    #[test]
    fn candidates_are_deduplicated_in_order() {
        let q = ChannelQuery::new("@exampleChan");
        assert_eq!(q.custom_url_candidates(), ["@exampleChan", "exampleChan"]);

        let q = ChannelQuery::new("exampleChan");
        assert_eq!(q.custom_url_candidates(), ["exampleChan", "@exampleChan"]);
    }

    #[test]
    fn suggestion_click_carries_channel_id() {
        let q = ChannelQuery::with_channel_id("Example Channel", "UCuAXFkgsw1L7xaCfnd5JJOw");
        assert_eq!(q.channel_id(), Some("UCuAXFkgsw1L7xaCfnd5JJOw"));
    }
}
