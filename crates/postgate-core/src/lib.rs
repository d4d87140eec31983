//! postgate-core - Human-in-the-loop LinkedIn post queue
//!
//! A caller queues a post, a human approves it, and `publish_post` sends it
//! to the LinkedIn Posts API.
//!
//! - `QueueStore`: in-memory, ordered post records
//! - `Publisher` / `LinkedInPublisher`: the single outbound call
//! - `Dispatcher`: the five operations and the approval gate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use postgate_core::{Dispatcher, LinkedInPublisher, PublisherConfig, QueueStore};
//!
//! # async fn demo() -> Result<(), postgate_core::CoreError> {
//! let store = Arc::new(QueueStore::new());
//! let publisher = Arc::new(LinkedInPublisher::new(PublisherConfig::from_env()));
//! let dispatcher = Dispatcher::new(store, publisher);
//!
//! let output = dispatcher
//!     .call("queue_post", serde_json::json!({"text": "Hello", "whenIso": "2025-01-01T09:00:00Z"}))
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod publisher;
pub mod store;
pub mod types;

pub use config::PublisherConfig;
pub use dispatcher::{Dispatcher, Operation, OperationOutput, PostIdArgs, QueuePostArgs};
pub use error::{CoreError, PublishError};
pub use publisher::{build_post_body, LinkedInPublisher, Publisher};
pub use store::QueueStore;
pub use types::{HealthReport, PostRecord, PostStatus, Visibility, MAX_TEXT_LEN};
