use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::FetchError;
use crate::models::{Engagement, SourcePost};
use crate::stages::EngagementSource;

/// Configuration for the engagement lookup service
#[derive(Debug, Clone)]
pub struct EngagementConfig {
    /// Base URL of the status lookup API (from ENGAGEMENT_API_URL)
    pub base_url: String,
    /// Bearer token (from ENGAGEMENT_API_TOKEN), if the service needs one
    pub token: Option<String>,
}

impl EngagementConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("ENGAGEMENT_API_URL")
            .context("ENGAGEMENT_API_URL environment variable not set")?;
        let token = std::env::var("ENGAGEMENT_API_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(Self::new(base_url, token))
    }

    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Lookup URL for a single status
    pub fn status_url(&self) -> String {
        format!("{}/statuses/show.json", self.base_url)
    }
}

/// Fetches the current status payload for a post over HTTP
pub struct EngagementClient {
    client: Client,
    config: EngagementConfig,
}

impl EngagementClient {
    pub fn new(config: EngagementConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Fetch the full current status for a post
    pub async fn show_status(&self, id: &str) -> Result<SourcePost, FetchError> {
        let mut request = self
            .client
            .get(self.config.status_url())
            .query(&[("id", id), ("tweet_mode", "extended")]);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}

impl EngagementSource for EngagementClient {
    async fn fetch(&self, id: &str) -> Result<Engagement, FetchError> {
        let post = self.show_status(id).await?;
        debug!(
            "Fetched {}: {} favorites, {} retweets",
            id, post.favorite_count, post.retweet_count
        );
        Ok(post.engagement())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_url_trims_trailing_slash() {
        let config = EngagementConfig::new("https://api.example.com/1.1/".to_string(), None);
        assert_eq!(config.status_url(), "https://api.example.com/1.1/statuses/show.json");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_transport_error() {
        // bind an ephemeral port, then free it so connections are refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = EngagementClient::new(EngagementConfig::new(format!("http://{}", addr), None));
        let err = client.fetch("1").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert!(!err.is_not_found());
    }
}
