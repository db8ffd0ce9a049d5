//! Shared types and the page-walking stream for the platform API client.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::Stream;

type PendingPage<'a, F, P> =
    Pin<Box<dyn Future<Output = eyre::Result<(F, (P, Option<String>))>> + Send + 'a>>;

/// A lazy stream of result pages from a page-token list endpoint.
///
/// Each yielded item is one whole page; the next page is only requested
/// once the stream is polled again, so a consumer that stops polling (for
/// example because its session went stale) never issues another request.
/// The walk ends when a page comes back without a continuation token.
pub struct PageStream<'a, P, F> {
    pending: Option<PendingPage<'a, F, P>>,
    done: bool,
}

impl<'a, P, F> PageStream<'a, P, F> {
    /// Starts a walk from the first page. `fetcher` receives the page token
    /// to request (`None` for the first page) and returns the page plus the
    /// next token, if any.
    pub fn new<Fut>(fetcher: F) -> Self
    where
        F: Fn(Option<String>) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = eyre::Result<(P, Option<String>)>> + Send + 'a,
    {
        let first_page = async move {
            let page = fetcher(None).await?;
            Ok((fetcher, page))
        };
        Self {
            pending: Some(Box::pin(first_page)),
            done: false,
        }
    }
}

impl<'a, P, F> Unpin for PageStream<'a, P, F> {}

impl<'a, P, F, Fut> Stream for PageStream<'a, P, F>
where
    F: Fn(Option<String>) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = eyre::Result<(P, Option<String>)>> + Send + 'a,
{
    type Item = eyre::Result<P>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        let Some(pending) = self.pending.as_mut() else {
            self.done = true;
            return Poll::Ready(None);
        };

        match pending.as_mut().poll(cx) {
            Poll::Ready(Ok((fetcher, (page, next_token)))) => {
                match next_token {
                    Some(next_token) => {
                        // Queue the fetch for the following page, but do not
                        // poll it until the consumer asks.
                        self.pending = Some(Box::pin(async move {
                            let page = fetcher(Some(next_token)).await?;
                            Ok((fetcher, page))
                        }));
                    }
                    None => {
                        self.pending = None;
                        self.done = true;
                    }
                }
                Poll::Ready(Some(Ok(page)))
            }
            Poll::Ready(Err(e)) => {
                self.pending = None;
                self.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Paging details returned by list endpoints.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Serialize, Deserialize)]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(rename = "totalResults")]
    pub total_results: Option<u32>,
    /// The number of results included in this response.
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: Option<u32>,
}

/// Thumbnail variants keyed by size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl Thumbnails {
    /// The preferred display variant: medium, then high, then default.
    pub fn best_url(&self) -> Option<&str> {
        self.medium
            .as_ref()
            .or(self.high.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}
