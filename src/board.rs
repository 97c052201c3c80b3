//! The article board
//! Runs every user action against the store and keeps the snapshot the view shows
//!
//! Every mutation is followed by a full reload; the snapshot is never patched
//! locally. Two mutations in flight at once may reload in either order and
//! the snapshot ends up as whichever reload finished last.

use crate::article::{Article, ArticleId, ArticleInput};
use crate::error::{ErrorPolicy, Failure, Operation, StoreResult};
use crate::store::{ArticleStore, SchemaStatus};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Failures collected while running one board operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Outcome {
    pub failures: Vec<Failure>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// One human-readable line per failure.
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.to_string()).collect()
    }

    fn merge(&mut self, other: Outcome) {
        self.failures.extend(other.failures);
    }
}

pub struct Board {
    store: Arc<dyn ArticleStore>,
    policy: ErrorPolicy,
    snapshot: Mutex<Vec<Article>>,
}

impl Board {
    pub fn new(store: Arc<dyn ArticleStore>, policy: ErrorPolicy) -> Board {
        Board { store, policy, snapshot: Mutex::new(Vec::new()) }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Ensures the schema, then loads the first snapshot.
    ///
    /// A schema failure is recorded but does not stop the load.
    pub async fn start(&self) -> Outcome {
        let mut outcome = Outcome::default();

        match self.attempt(Operation::EnsureSchema, || self.store.ensure_schema()).await {
            Ok(SchemaStatus::Created) => tracing::info!("Schema created successfully"),
            Ok(SchemaStatus::AlreadyExists) => tracing::info!("Schema already exists"),
            Err(failure) => outcome.failures.push(failure),
        }

        outcome.merge(self.reload().await);
        outcome
    }

    /// Replaces the snapshot with a fresh query. On failure the previous
    /// snapshot stays.
    pub async fn reload(&self) -> Outcome {
        match self.attempt(Operation::QueryAll, || self.store.query_all()).await {
            Ok(articles) => {
                tracing::debug!(count = articles.len(), "Snapshot reloaded");
                *self.snapshot() = articles;
                Outcome::default()
            }
            Err(failure) => Outcome { failures: vec![failure] },
        }
    }

    /// Inserts an article, then reloads whether or not the insert went through.
    pub async fn create(&self, input: ArticleInput) -> Outcome {
        let mut outcome = Outcome::default();

        match self.attempt(Operation::Insert, || self.store.insert(&input)).await {
            Ok(id) => tracing::info!(%id, "Data added successfully"),
            Err(failure) => outcome.failures.push(failure),
        }

        outcome.merge(self.reload().await);
        outcome
    }

    /// Replaces an article, reloading only when the update succeeded.
    pub async fn update(&self, id: &ArticleId, input: ArticleInput) -> Outcome {
        match self.attempt(Operation::Update, || self.store.update_by_id(id, &input)).await {
            Ok(()) => {
                tracing::info!(%id, "Data updated successfully");
                self.reload().await
            }
            Err(failure) => Outcome { failures: vec![failure] },
        }
    }

    /// Deletes an article, then reloads whether or not the delete went through.
    pub async fn delete(&self, id: &ArticleId) -> Outcome {
        let mut outcome = Outcome::default();

        match self.attempt(Operation::Delete, || self.store.delete_by_id(id)).await {
            Ok(()) => tracing::info!(%id, "Data deleted successfully"),
            Err(failure) => outcome.failures.push(failure),
        }

        outcome.merge(self.reload().await);
        outcome
    }

    /// Copy of the current snapshot.
    pub fn articles(&self) -> Vec<Article> {
        self.snapshot().clone()
    }

    /// Retained record for `id`, if the snapshot has one.
    pub fn find(&self, id: &ArticleId) -> Option<Article> {
        self.snapshot().iter().find(|a| &a.id == id).cloned()
    }

    /// Runs `call` up to `policy.attempts()` times, logging every failure.
    async fn attempt<T, F, Fut>(&self, operation: Operation, call: F) -> Result<T, Failure>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let attempts = self.policy.attempts();
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < attempts => {
                    tracing::warn!(%operation, attempt, %error, "Retrying");
                    attempt += 1;
                }
                Err(error) => {
                    tracing::error!("Error {}: {}", operation, error);
                    return Err(Failure { operation, error });
                }
            }
        }
    }

    fn snapshot(&self) -> MutexGuard<'_, Vec<Article>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
