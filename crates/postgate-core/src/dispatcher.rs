//! Dispatcher - Post workflow operations
//!
//! Routes one of the five operations to the queue store and publisher.
//! Only `publish_post` reaches the outside world; a rejected publish is
//! recorded on the post and returned as a normal result.

use crate::error::{CoreError, Result};
use crate::publisher::Publisher;
use crate::store::QueueStore;
use crate::types::{HealthReport, PostRecord, Visibility};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Arguments for `queue_post`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePostArgs {
    pub text: String,
    pub when_iso: String,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

/// Arguments for `approve_post` and `publish_post`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostIdArgs {
    pub id: String,
}

/// A parsed, typed operation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Health,
    QueuePost(QueuePostArgs),
    ListQueue,
    ApprovePost(PostIdArgs),
    PublishPost(PostIdArgs),
}

impl Operation {
    pub const NAMES: [&'static str; 5] = [
        "health",
        "queue_post",
        "list_queue",
        "approve_post",
        "publish_post",
    ];

    /// Resolve a tool name and its JSON arguments
    pub fn parse(name: &str, arguments: Value) -> Result<Self> {
        let arguments = match arguments {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };

        match name {
            "health" => Ok(Operation::Health),
            "queue_post" => Ok(Operation::QueuePost(parse_args(arguments)?)),
            "list_queue" => Ok(Operation::ListQueue),
            "approve_post" => Ok(Operation::ApprovePost(parse_id_args(arguments)?)),
            "publish_post" => Ok(Operation::PublishPost(parse_id_args(arguments)?)),
            other => Err(CoreError::UnknownOperation(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Health => "health",
            Operation::QueuePost(_) => "queue_post",
            Operation::ListQueue => "list_queue",
            Operation::ApprovePost(_) => "approve_post",
            Operation::PublishPost(_) => "publish_post",
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| CoreError::Validation(e.to_string()))
}

fn parse_id_args(arguments: Value) -> Result<PostIdArgs> {
    let args: PostIdArgs = parse_args(arguments)?;
    if args.id.is_empty() {
        return Err(CoreError::Validation("id must not be empty".to_string()));
    }
    Ok(args)
}

/// Result payload of an operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Health(HealthReport),
    Queued(PostRecord),
    Queue(Vec<PostRecord>),
    Approved(PostRecord),
    Published {
        item: PostRecord,
        #[serde(rename = "apiResponse")]
        api_response: String,
    },
    /// The API rejected the post; the record carries `status = FAILED` and `lastError`
    PublishFailed(PostRecord),
}

/// Operation dispatcher
pub struct Dispatcher {
    store: Arc<QueueStore>,
    publisher: Arc<dyn Publisher>,
}

impl Dispatcher {
    pub fn new(store: Arc<QueueStore>, publisher: Arc<dyn Publisher>) -> Self {
        Self { store, publisher }
    }

    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    /// Parse and execute in one step
    pub async fn call(&self, name: &str, arguments: Value) -> Result<OperationOutput> {
        let op = Operation::parse(name, arguments)?;
        self.execute(op).await
    }

    pub async fn execute(&self, op: Operation) -> Result<OperationOutput> {
        debug!(operation = op.name(), "Executing operation");

        match op {
            Operation::Health => Ok(OperationOutput::Health(self.health())),
            Operation::QueuePost(args) => {
                let visibility = args.visibility.unwrap_or_default();
                let post = self.store.enqueue(&args.text, &args.when_iso, visibility)?;
                Ok(OperationOutput::Queued(post))
            }
            Operation::ListQueue => Ok(OperationOutput::Queue(self.store.list())),
            Operation::ApprovePost(args) => {
                Ok(OperationOutput::Approved(self.store.mark_approved(&args.id)?))
            }
            Operation::PublishPost(args) => self.publish(&args.id).await,
        }
    }

    fn health(&self) -> HealthReport {
        let config = self.publisher.config();
        HealthReport {
            ok: true,
            has_token: config.has_token(),
            has_author_urn: config.has_author_urn(),
            linkedin_version: config.linkedin_version.clone(),
            queued: self.store.len(),
        }
    }

    async fn publish(&self, id: &str) -> Result<OperationOutput> {
        // Existence check before taking a lock so unknown ids don't accumulate locks
        self.store.find_by_id(id)?;

        let lock = self.store.publish_lock(id);
        let _guard = lock.lock().await;

        let post = self.store.find_by_id(id)?;
        if !post.approved {
            return Err(CoreError::NotApproved(id.to_string()));
        }
        if post.is_published() {
            return Err(CoreError::AlreadyPublished(id.to_string()));
        }

        info!(post_id = %id, previous_status = post.status.as_str(), "Publishing post");

        match self.publisher.publish(&post.text, post.visibility).await {
            Ok(api_response) => {
                let item = self.store.mark_published(id, Utc::now())?;
                Ok(OperationOutput::Published { item, api_response })
            }
            Err(e) => {
                warn!(post_id = %id, error = %e, "Publish failed");
                let item = self.store.mark_failed(id, &e.to_string())?;
                Ok(OperationOutput::PublishFailed(item))
            }
        }
    }
}
