//! Error types for the post workflow

use thiserror::Error;

pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// Errors surfaced to the caller of an operation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Post is not approved: {0}")]
    NotApproved(String),

    #[error("Post is already published: {0}")]
    AlreadyPublished(String),

    #[error("Unknown tool: {0}")]
    UnknownOperation(String),
}

/// Failure of the outbound publish call.
///
/// Captured into the post record by the dispatcher rather than returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The API answered with a non-success status
    #[error("LinkedIn error {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response
    #[error("LinkedIn request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(e: reqwest::Error) -> Self {
        PublishError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_keeps_status_and_body() {
        let err = PublishError::Rejected {
            status: 401,
            body: r#"{"message":"Invalid access token"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"LinkedIn error 401: {"message":"Invalid access token"}"#
        );
    }

    #[test]
    fn test_core_error_messages() {
        assert_eq!(
            CoreError::NotFound("post_x".to_string()).to_string(),
            "Post not found: post_x"
        );
        assert_eq!(
            CoreError::UnknownOperation("delete_post".to_string()).to_string(),
            "Unknown tool: delete_post"
        );
    }
}
