//! Publisher - LinkedIn Posts API adapter
//!
//! One outbound request per call, no retries. Non-success responses are
//! returned with their status and body untouched so the caller sees exactly
//! what LinkedIn said.

use crate::config::PublisherConfig;
use crate::error::PublishError;
use crate::types::Visibility;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// `X-Restli-Protocol-Version` sent with every request
pub const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";

/// Something that can put a post in front of an audience
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Submit a post, returning the raw response body on success
    async fn publish(&self, text: &str, visibility: Visibility) -> Result<String, PublishError>;

    /// Configuration reported by `health`
    fn config(&self) -> &PublisherConfig;
}

/// Build the JSON body for a member-authored text post
pub fn build_post_body(author: &str, text: &str, visibility: Visibility) -> Value {
    json!({
        "author": author,
        "commentary": text,
        "visibility": visibility.as_str(),
        "distribution": {
            "feedDistribution": "MAIN_FEED",
            "targetEntities": [],
            "thirdPartyDistributionChannels": [],
        },
        "lifecycleState": "PUBLISHED",
        "isReshareDisabledByAuthor": false,
    })
}

/// Publisher backed by the LinkedIn REST Posts API
pub struct LinkedInPublisher {
    config: PublisherConfig,
    http: reqwest::Client,
}

impl LinkedInPublisher {
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client (proxies, timeouts)
    pub fn with_client(config: PublisherConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }
}

#[async_trait::async_trait]
impl Publisher for LinkedInPublisher {
    async fn publish(&self, text: &str, visibility: Visibility) -> Result<String, PublishError> {
        let url = self.config.posts_url();
        let author = self.config.author_urn.as_deref().unwrap_or_default();
        let token = self.config.access_token.as_deref().unwrap_or_default();
        let body = build_post_body(author, text, visibility);

        debug!(%url, visibility = visibility.as_str(), "POST LinkedIn post");

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .header("X-Restli-Protocol-Version", RESTLI_PROTOCOL_VERSION)
            .header("Linkedin-Version", &self.config.linkedin_version)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    status = status.as_u16(),
                    error = %e,
                    "Failed to read LinkedIn response body"
                );
                String::new()
            }
        };

        // The status alone decides the outcome; a 2xx means the post is live
        if !status.is_success() {
            warn!(status = status.as_u16(), "LinkedIn rejected post");
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(status = status.as_u16(), "LinkedIn accepted post");
        Ok(text)
    }

    fn config(&self) -> &PublisherConfig {
        &self.config
    }
}
