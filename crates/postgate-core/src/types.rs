//! Core types for postgate
//!
//! Wire shapes use camelCase keys so records serialize the way MCP clients
//! expect them (`whenIso`, `lastError`, `publishedAtIso`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum post length, counted in UTF-16 code units like the LinkedIn API does.
pub const MAX_TEXT_LEN: usize = 3000;

// ============ Visibility ============

/// Who can see a published post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    #[default]
    Public,
    Connections,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Connections => "CONNECTIONS",
        }
    }
}

// ============ Post ============

/// Post status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Queued,
    Published,
    Failed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Queued => "QUEUED",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Failed => "FAILED",
        }
    }
}

/// A post waiting for, or having gone through, publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: String,
    pub text: String,
    /// Caller-supplied schedule hint, stored verbatim and never acted on
    pub when_iso: String,
    pub visibility: Visibility,
    pub approved: bool,
    pub status: PostStatus,
    /// Diagnostic from the most recent failed publish attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(rename = "publishedAtIso", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PostRecord {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

// ============ Health ============

/// Snapshot returned by the `health` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub ok: bool,
    pub has_token: bool,
    pub has_author_urn: bool,
    pub linkedin_version: String,
    pub queued: usize,
}
