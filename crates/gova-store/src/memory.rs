//! In-memory store
//!
//! Keeps nodes per label in insertion order. Besides serving tests and the
//! CLI's offline mode it can inject failures, delay fetches per label and
//! log every create request it receives.

use crate::error::StoreError;
use crate::record::Record;
use crate::store::GraphStore;
use async_trait::async_trait;
use gova_resource::{Label, Properties};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// In-process [`GraphStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: RwLock<HashMap<Label, Vec<Record>>>,
    next_id: AtomicI64,
    fetch_calls: AtomicUsize,
    create_requests: Mutex<Vec<(Label, Properties)>>,
    failure: Mutex<Option<StoreError>>,
    fetch_delays: Mutex<HashMap<Label, Duration>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records directly, bypassing the create log
    pub async fn seed<I>(&self, label: &Label, records: I)
    where
        I: IntoIterator<Item = Properties>,
    {
        let mut nodes = self.nodes.write().await;
        let bucket = nodes.entry(label.clone()).or_default();
        for props in records {
            bucket.push(Record::new(props).with_id(self.allocate_id()));
        }
    }

    /// Make every following operation fail with `error` until cleared
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock() = Some(error);
    }

    /// Stop injecting failures
    pub fn clear_failure(&self) {
        *self.failure.lock() = None;
    }

    /// Delay fetches of `label` by `delay`
    pub fn set_fetch_delay(&self, label: &Label, delay: Duration) {
        self.fetch_delays.lock().insert(label.clone(), delay);
    }

    /// Create requests received so far, failed ones included
    #[must_use]
    pub fn create_requests(&self) -> Vec<(Label, Properties)> {
        self.create_requests.lock().clone()
    }

    /// Number of fetches received so far
    #[inline]
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of stored records with `label`
    pub async fn count(&self, label: &Label) -> usize {
        self.nodes.read().await.get(label).map_or(0, Vec::len)
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn injected_failure(&self) -> Result<(), StoreError> {
        match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn fetch_list(&self, label: &Label, limit: usize) -> Result<Vec<Record>, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.fetch_delays.lock().get(label).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.injected_failure()?;

        let nodes = self.nodes.read().await;
        Ok(nodes
            .get(label)
            .map(|records| records.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn create_record(&self, label: &Label, properties: Properties) -> Result<(), StoreError> {
        self.create_requests
            .lock()
            .push((label.clone(), properties.clone()));
        self.injected_failure()?;

        let record = Record::new(properties).with_id(self.allocate_id());
        self.nodes
            .write()
            .await
            .entry(label.clone())
            .or_default()
            .push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user() -> Label {
        Label::new("User").unwrap()
    }

    fn person(name: &str) -> Properties {
        let mut props = Properties::new();
        props.insert("name".into(), json!(name));
        props
    }

    #[tokio::test]
    async fn empty_label_fetches_empty() {
        let store = MemoryStore::new();
        let rows = store.fetch_list(&user(), 25).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let store = MemoryStore::new();
        let mut props = person("Ada");
        props.insert("email".into(), json!("a@x.com"));

        store.create_record(&user(), props.clone()).await.unwrap();

        let rows = store.fetch_list(&user(), 25).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].properties(), &props);
        assert_eq!(store.create_requests(), vec![(user(), props)]);
    }

    #[tokio::test]
    async fn fetch_respects_limit() {
        let store = MemoryStore::new();
        store
            .seed(&user(), (0..30).map(|i| person(&format!("u{i}"))))
            .await;

        assert_eq!(store.fetch_list(&user(), 25).await.unwrap().len(), 25);
        assert_eq!(store.fetch_list(&user(), 5).await.unwrap().len(), 5);
        assert_eq!(store.count(&user()).await, 30);
    }

    #[tokio::test]
    async fn labels_are_isolated() {
        let store = MemoryStore::new();
        store.seed(&user(), [person("Ada")]).await;

        let post = Label::new("Post").unwrap();
        assert!(store.fetch_list(&post, 25).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn consecutive_fetches_agree() {
        let store = MemoryStore::new();
        store.seed(&user(), [person("Ada"), person("Grace")]).await;

        let first = store.fetch_list(&user(), 25).await.unwrap();
        let second = store.fetch_list(&user(), 25).await.unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(store.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn injected_failure_is_logged_and_returned() {
        let store = MemoryStore::new();
        store.fail_with(StoreError::Connection("refused".into()));

        let err = store.create_record(&user(), person("Ada")).await.unwrap_err();
        assert!(err.is_connection());
        assert_eq!(store.create_requests().len(), 1);
        assert_eq!(store.count(&user()).await, 0);

        store.clear_failure();
        store.create_record(&user(), person("Ada")).await.unwrap();
        assert_eq!(store.count(&user()).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_delay_applies_per_label() {
        let store = MemoryStore::new();
        store.set_fetch_delay(&user(), Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        store.fetch_list(&user(), 25).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));

        let post = Label::new("Post").unwrap();
        let started = tokio::time::Instant::now();
        store.fetch_list(&post, 25).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
