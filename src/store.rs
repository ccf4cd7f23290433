//! Document store boundary.
//!
//! Tournaments and circuits are read and written as whole documents. Live
//! updates are delivered through [`Subscription`]s, which stop delivering the
//! moment they are unsubscribed or dropped.

use crate::models::{Circuit, ErrorKind, Tournament};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    /// The backing store could not be reached or returned garbage.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

/// Called with the new document after every write to a watched tournament.
pub type TournamentCallback = Arc<dyn Fn(&Tournament) + Send + Sync>;

/// Handle to a live subscription.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Stop delivery. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Filter for [`DocumentStore::list_tournaments`].
#[derive(Clone, Debug, Default)]
pub struct TournamentQuery {
    pub circuit_slug: Option<String>,
    pub published_only: bool,
}

impl TournamentQuery {
    fn accepts(&self, t: &Tournament) -> bool {
        if self.published_only && !t.is_published {
            return false;
        }
        match &self.circuit_slug {
            Some(slug) => t.circuit_slug.as_deref() == Some(slug.as_str()),
            None => true,
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when the document does not exist.
    async fn get_tournament(&self, slug: &str) -> Result<Option<Tournament>, StoreError>;

    /// Write a tournament payload. With `merge`, top-level fields of `payload`
    /// overwrite the stored document and everything else is kept.
    async fn put_tournament(
        &self,
        slug: &str,
        payload: Value,
        merge: bool,
    ) -> Result<Tournament, StoreError>;

    /// Matching tournaments, oldest first.
    async fn list_tournaments(&self, query: &TournamentQuery)
        -> Result<Vec<Tournament>, StoreError>;

    async fn get_circuit(&self, slug: &str) -> Result<Option<Circuit>, StoreError>;

    async fn put_circuit(&self, circuit: &Circuit) -> Result<(), StoreError>;

    fn subscribe(&self, slug: &str, callback: TournamentCallback) -> Subscription;

    /// Replace the stored tournament with `tournament`.
    async fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let payload = serde_json::to_value(tournament)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        self.put_tournament(&tournament.slug, payload, false).await?;
        Ok(())
    }
}

type Subscribers = Arc<Mutex<HashMap<u64, (String, TournamentCallback)>>>;

/// Process-local store used by the web binary and by tests.
#[derive(Default)]
pub struct InMemoryStore {
    tournaments: RwLock<HashMap<String, Tournament>>,
    circuits: RwLock<HashMap<String, Circuit>>,
    subscribers: Subscribers,
    next_subscription: AtomicU64,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read and write fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "document store is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn notify(&self, tournament: &Tournament) {
        let callbacks: Vec<TournamentCallback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|(slug, _)| *slug == tournament.slug)
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(tournament);
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_tournament(&self, slug: &str) -> Result<Option<Tournament>, StoreError> {
        self.check_available()?;
        Ok(self.tournaments.read().await.get(slug).cloned())
    }

    async fn put_tournament(
        &self,
        slug: &str,
        payload: Value,
        merge: bool,
    ) -> Result<Tournament, StoreError> {
        self.check_available()?;
        let stored = {
            let mut tournaments = self.tournaments.write().await;
            let mut doc = payload;
            if merge {
                if let Some(existing) = tournaments.get(slug) {
                    let mut base = serde_json::to_value(existing)
                        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                    merge_objects(&mut base, doc);
                    doc = base;
                }
            }
            if let Value::Object(map) = &mut doc {
                map.insert("slug".to_string(), Value::String(slug.to_string()));
            }
            let tournament: Tournament = serde_json::from_value(doc).map_err(|e| {
                StoreError::Unavailable(format!("malformed tournament {slug}: {e}"))
            })?;
            tournaments.insert(slug.to_string(), tournament.clone());
            tournament
        };
        self.notify(&stored);
        Ok(stored)
    }

    async fn list_tournaments(
        &self,
        query: &TournamentQuery,
    ) -> Result<Vec<Tournament>, StoreError> {
        self.check_available()?;
        let mut found: Vec<Tournament> = self
            .tournaments
            .read()
            .await
            .values()
            .filter(|t| query.accepts(t))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.slug.cmp(&b.slug)));
        Ok(found)
    }

    async fn get_circuit(&self, slug: &str) -> Result<Option<Circuit>, StoreError> {
        self.check_available()?;
        Ok(self.circuits.read().await.get(slug).cloned())
    }

    async fn put_circuit(&self, circuit: &Circuit) -> Result<(), StoreError> {
        self.check_available()?;
        self.circuits
            .write()
            .await
            .insert(circuit.slug.clone(), circuit.clone());
        Ok(())
    }

    fn subscribe(&self, slug: &str, callback: TournamentCallback) -> Subscription {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (slug.to_string(), callback));
        let subscribers = Arc::clone(&self.subscribers);
        Subscription::new(move || {
            subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
        })
    }
}

/// Shallow merge: top-level keys of `patch` replace those in `base`.
fn merge_objects(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (k, v) in patch {
                base.insert(k, v);
            }
        }
        (base, patch) => *base = patch,
    }
}
