//! The HTTP seam between the resolution pipeline and the outside world.
//!
//! Every collaborator API (local catalogue, video platform, subscription
//! status) is consumed through [`Transport`], a narrow `GET`-and-decode
//! interface. The pipeline never touches reqwest directly, which keeps the
//! HTTP wrapper swappable and lets tests drive the whole pipeline against
//! canned responses.

use serde_json::Value;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Error produced at the transport seam.
///
/// This is the one typed error in the crate: the stages above classify
/// failures (soft miss, comments disabled, cancellation) by downcasting an
/// `eyre` report back to this type and inspecting the status code.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-success status code.
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    /// The request could not be sent or the response could not be read.
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    /// The session owning this request was cancelled while it was in flight.
    #[error("request cancelled")]
    Cancelled,
}

impl TransportError {
    /// The HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

/// Returns true when an error chain bottoms out in a cancelled request.
///
/// Cancellation is not an error in this pipeline; callers use this to
/// discard a report silently instead of surfacing it.
pub fn is_cancelled(report: &eyre::Report) -> bool {
    report
        .downcast_ref::<TransportError>()
        .is_some_and(TransportError::is_cancelled)
}

/// The HTTP status code buried in an error chain, if any.
pub fn status_of(report: &eyre::Report) -> Option<u16> {
    report
        .downcast_ref::<TransportError>()
        .and_then(TransportError::status)
}

/// A `fetch(url, query) -> JSON` interface with cancellation support.
///
/// The production implementation is [`HttpTransport`]; tests substitute a
/// fake that routes URLs to canned JSON documents.
pub trait Transport: Send + Sync {
    /// Issues a `GET` request and decodes the response body as JSON.
    ///
    /// Implementations must stop work and return
    /// [`TransportError::Cancelled`] when `cancel` fires while the request
    /// is in flight.
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// Production [`Transport`] over a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError> {
        let request = self.client.get(url).query(query);

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            response = request.send() => response.map_err(|e| TransportError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?,
        };

        let status_code = response.status();
        if !status_code.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status_code.as_u16(),
                body,
            });
        }

        tokio::select! {
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            body = response.json::<Value>() => body.map_err(|e| TransportError::Network {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
