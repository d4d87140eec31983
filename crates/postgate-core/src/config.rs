//! LinkedIn publisher configuration
//!
//! Read from the process environment. Missing credentials are tolerated at
//! startup and reported through `health`; publishing without them simply
//! fails at the API and is recorded on the post.

use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://api.linkedin.com";
pub const DEFAULT_LINKEDIN_VERSION: &str = "202502";

const ENV_ACCESS_TOKEN: &str = "LINKEDIN_ACCESS_TOKEN";
const ENV_AUTHOR_URN: &str = "LINKEDIN_AUTHOR_URN";
const ENV_VERSION: &str = "LINKEDIN_VERSION";
const ENV_API_BASE: &str = "LINKEDIN_API_BASE";

/// Credentials and endpoint settings for the Posts API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub access_token: Option<String>,
    /// Author URN, e.g. `urn:li:person:xxxx`
    pub author_urn: Option<String>,
    /// `Linkedin-Version` header value (YYYYMM)
    pub linkedin_version: String,
    pub api_base: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            author_urn: None,
            linkedin_version: DEFAULT_LINKEDIN_VERSION.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl PublisherConfig {
    /// Load from environment variables, logging anything missing
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|key| std::env::var(key).ok());

        if !config.has_token() {
            warn!("Missing env {}", ENV_ACCESS_TOKEN);
        }
        if !config.has_author_urn() {
            warn!("Missing env {} (urn:li:person:...)", ENV_AUTHOR_URN);
        }

        config
    }

    /// Build from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            access_token: get(ENV_ACCESS_TOKEN),
            author_urn: get(ENV_AUTHOR_URN),
            linkedin_version: get(ENV_VERSION)
                .unwrap_or_else(|| DEFAULT_LINKEDIN_VERSION.to_string()),
            api_base: get(ENV_API_BASE)
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn has_author_urn(&self) -> bool {
        self.author_urn.is_some()
    }

    /// Full URL of the Posts endpoint
    pub fn posts_url(&self) -> String {
        format!("{}/rest/posts", self.api_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = PublisherConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, PublisherConfig::default());
        assert!(!config.has_token());
        assert!(!config.has_author_urn());
        assert_eq!(config.posts_url(), "https://api.linkedin.com/rest/posts");
    }

    #[test]
    fn test_reads_all_keys() {
        let config = PublisherConfig::from_lookup(lookup_from(&[
            ("LINKEDIN_ACCESS_TOKEN", "tok"),
            ("LINKEDIN_AUTHOR_URN", "urn:li:person:abc"),
            ("LINKEDIN_VERSION", "202406"),
            ("LINKEDIN_API_BASE", "http://127.0.0.1:9000/"),
        ]));
        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.author_urn.as_deref(), Some("urn:li:person:abc"));
        assert_eq!(config.linkedin_version, "202406");
        assert_eq!(config.posts_url(), "http://127.0.0.1:9000/rest/posts");
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let config = PublisherConfig::from_lookup(lookup_from(&[
            ("LINKEDIN_ACCESS_TOKEN", ""),
            ("LINKEDIN_VERSION", ""),
        ]));
        assert!(!config.has_token());
        assert_eq!(config.linkedin_version, DEFAULT_LINKEDIN_VERSION);
    }
}
