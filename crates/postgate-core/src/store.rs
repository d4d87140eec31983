//! Queue Store - In-memory post queue
//!
//! Holds every post in creation order. Process-lifetime only: records are
//! never deleted and nothing is persisted.

use crate::error::{CoreError, Result};
use crate::types::{PostRecord, PostStatus, Visibility, MAX_TEXT_LEN};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Queue Store
///
/// Sole owner of all post records. Callers get clones, never references.
#[derive(Default)]
pub struct QueueStore {
    posts: RwLock<Vec<PostRecord>>,
    publish_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl QueueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a new post
    pub fn enqueue(
        &self,
        text: &str,
        when_iso: &str,
        visibility: Visibility,
    ) -> Result<PostRecord> {
        validate_text(text)?;
        if when_iso.is_empty() {
            return Err(CoreError::Validation("whenIso must not be empty".to_string()));
        }

        let record = PostRecord {
            id: new_post_id(),
            text: text.to_string(),
            when_iso: when_iso.to_string(),
            visibility,
            approved: false,
            status: PostStatus::Queued,
            last_error: None,
            published_at: None,
        };

        self.write().push(record.clone());
        info!(post_id = %record.id, visibility = record.visibility.as_str(), "Post queued");
        Ok(record)
    }

    /// Snapshot of all posts in insertion order
    pub fn list(&self) -> Vec<PostRecord> {
        self.read().clone()
    }

    /// Number of posts ever queued
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Get a post by ID
    pub fn find_by_id(&self, id: &str) -> Result<PostRecord> {
        self.read()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    /// Open the approval gate. Approving twice is a no-op.
    pub fn mark_approved(&self, id: &str) -> Result<PostRecord> {
        let record = self.update(id, |post| post.approved = true)?;
        info!(post_id = %id, "Post approved");
        Ok(record)
    }

    pub(crate) fn mark_published(&self, id: &str, at: DateTime<Utc>) -> Result<PostRecord> {
        let record = self.update(id, |post| {
            post.status = PostStatus::Published;
            post.published_at = Some(at);
        })?;
        info!(post_id = %id, published_at = %at, "Post published");
        Ok(record)
    }

    pub(crate) fn mark_failed(&self, id: &str, message: &str) -> Result<PostRecord> {
        let record = self.update(id, |post| {
            post.status = PostStatus::Failed;
            post.last_error = Some(message.to_string());
        })?;
        info!(post_id = %id, "Post marked failed");
        Ok(record)
    }

    /// Per-post lock serializing publish attempts on one record.
    ///
    /// Unknown ids still get a lock; the caller checks existence after acquiring it.
    pub fn publish_lock(&self, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .publish_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    fn update<F>(&self, id: &str, apply: F) -> Result<PostRecord>
    where
        F: FnOnce(&mut PostRecord),
    {
        let mut posts = self.write();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        apply(post);
        debug!(
            post_id = %id,
            status = post.status.as_str(),
            approved = post.approved,
            "Post updated"
        );
        Ok(post.clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<PostRecord>> {
        self.posts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<PostRecord>> {
        self.posts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn new_post_id() -> String {
    format!("post_{}", Uuid::new_v4().simple())
}

fn validate_text(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(CoreError::Validation("text must not be empty".to_string()));
    }
    let len = text.encode_utf16().count();
    if len > MAX_TEXT_LEN {
        return Err(CoreError::Validation(format!(
            "text is {} characters, maximum is {}",
            len, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_enqueue_defaults() {
        let store = QueueStore::new();
        let post = store
            .enqueue("Hello world", "2025-01-01T00:00:00Z", Visibility::Public)
            .unwrap();

        assert!(post.id.starts_with("post_"));
        assert_eq!(post.status, PostStatus::Queued);
        assert!(!post.approved);
        assert_eq!(post.when_iso, "2025-01-01T00:00:00Z");
        assert!(post.last_error.is_none());
        assert!(post.published_at.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let store = QueueStore::new();
        let mut ids = HashSet::new();
        for i in 0..100 {
            let post = store
                .enqueue(&format!("post {}", i), "now", Visibility::Public)
                .unwrap();
            assert!(ids.insert(post.id), "duplicate id generated");
        }
    }

    #[test]
    fn test_enqueue_rejects_bad_text() {
        let store = QueueStore::new();

        let empty = store.enqueue("", "now", Visibility::Public);
        assert!(matches!(empty, Err(CoreError::Validation(_))));

        let long = "a".repeat(MAX_TEXT_LEN + 1);
        let too_long = store.enqueue(&long, "now", Visibility::Public);
        assert!(matches!(too_long, Err(CoreError::Validation(_))));

        let no_when = store.enqueue("hi", "", Visibility::Public);
        assert!(matches!(no_when, Err(CoreError::Validation(_))));

        assert!(store.is_empty());
    }

    #[test]
    fn test_length_counts_utf16_units() {
        let store = QueueStore::new();

        let at_limit = "a".repeat(MAX_TEXT_LEN);
        assert!(store.enqueue(&at_limit, "now", Visibility::Public).is_ok());

        // Each emoji is two UTF-16 code units
        let emoji = "😀".repeat(MAX_TEXT_LEN / 2 + 1);
        assert!(matches!(
            store.enqueue(&emoji, "now", Visibility::Public),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = QueueStore::new();
        let first = store.enqueue("first", "t1", Visibility::Public).unwrap();
        let second = store.enqueue("second", "t2", Visibility::Connections).unwrap();

        let ids: Vec<String> = store.list().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let store = QueueStore::new();
        let post = store.enqueue("first", "t1", Visibility::Public).unwrap();
        let snapshot = store.list();

        store.mark_approved(&post.id).unwrap();
        store.enqueue("second", "t2", Visibility::Public).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot[0].approved);
    }

    #[test]
    fn test_mark_approved_is_idempotent() {
        let store = QueueStore::new();
        let post = store.enqueue("hi", "now", Visibility::Public).unwrap();

        assert!(store.mark_approved(&post.id).unwrap().approved);
        assert!(store.mark_approved(&post.id).unwrap().approved);
        assert!(store.find_by_id(&post.id).unwrap().approved);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let store = QueueStore::new();
        store.enqueue("hi", "now", Visibility::Public).unwrap();

        assert_eq!(
            store.find_by_id("post_missing"),
            Err(CoreError::NotFound("post_missing".to_string()))
        );
        assert!(matches!(
            store.mark_approved("post_missing"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_failed_then_published_keeps_stale_error() {
        let store = QueueStore::new();
        let post = store.enqueue("hi", "now", Visibility::Public).unwrap();

        let failed = store.mark_failed(&post.id, "LinkedIn error 500: boom").unwrap();
        assert_eq!(failed.status, PostStatus::Failed);
        assert_eq!(failed.last_error.as_deref(), Some("LinkedIn error 500: boom"));

        let at = Utc::now();
        let published = store.mark_published(&post.id, at).unwrap();
        assert_eq!(published.status, PostStatus::Published);
        assert_eq!(published.published_at, Some(at));
        assert!(published.last_error.is_some());
    }

    #[test]
    fn test_publish_lock_is_shared_per_id() {
        let store = QueueStore::new();
        let a1 = store.publish_lock("post_a");
        let a2 = store.publish_lock("post_a");
        let b = store.publish_lock("post_b");

        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
    }
}
