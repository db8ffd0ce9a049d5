//! Client for the subscription-status API.

use crate::transport::{Transport, TransportError};
use eyre::Context;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
struct SubscriptionStatus {
    subscribed: bool,
}

/// Looks up whether the signed-in user subscribes to a channel.
#[derive(Debug, Clone)]
pub struct SubscriptionClient<T> {
    transport: Arc<T>,
    base_url: String,
}

impl<T: Transport> SubscriptionClient<T> {
    pub fn new(transport: Arc<T>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Returns `Some(subscribed)` when known, `None` when the user is not
    /// signed in (401). Other failures propagate; the caller decides how
    /// much it cares.
    pub async fn status(
        &self,
        channel_id: &str,
        cancel: &CancellationToken,
    ) -> eyre::Result<Option<bool>> {
        let url = format!("{}/subscriptions/status", self.base_url);
        let body = match self
            .transport
            .get_json(&url, &[("channel_id", channel_id)], cancel)
            .await
        {
            Ok(body) => body,
            Err(TransportError::Status { status: 401, .. }) => {
                tracing::debug!(channel_id, "not signed in, subscription status unknown");
                return Ok(None);
            }
            Err(e) => return Err(e).context("fetch subscription status"),
        };

        let status: SubscriptionStatus =
            serde_json::from_value(body).context("parse subscription status response")?;
        Ok(Some(status.subscribed))
    }
}
