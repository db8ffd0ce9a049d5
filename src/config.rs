//! Environment-driven configuration for the collaborator endpoints.

use std::env;

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:8000/api";

/// Endpoint configuration for one resolver instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the video-platform API.
    pub youtube_api_key: String,
    pub youtube_base_url: String,
    /// Base URL of the local catalogue service.
    pub local_base_url: String,
    /// Base URL of the subscription-status service; usually the same
    /// backend as the catalogue.
    pub subscription_base_url: String,
}

impl Config {
    /// Reads configuration from the environment. Only `YOUTUBE_API_KEY` is
    /// required; the service URLs default to a local backend and the
    /// public platform endpoint.
    pub fn from_env() -> eyre::Result<Self> {
        let youtube_api_key = env::var("YOUTUBE_API_KEY")
            .map_err(|_| eyre::eyre!("YOUTUBE_API_KEY environment variable must be set"))?;
        let local_base_url =
            env::var("LOCAL_API_BASE_URL").unwrap_or_else(|_| DEFAULT_LOCAL_BASE_URL.to_string());
        let subscription_base_url =
            env::var("SUBSCRIPTION_API_BASE_URL").unwrap_or_else(|_| local_base_url.clone());
        Ok(Self {
            youtube_api_key,
            youtube_base_url: env::var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_YOUTUBE_BASE_URL.to_string()),
            local_base_url,
            subscription_base_url,
        })
    }
}
