//! The store module
//! Provide the CRUD contract for article storage and an in-memory backend

use crate::article::{Article, ArticleId, ArticleInput};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of declaring the article class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Created,
    AlreadyExists,
}

/// CRUD access to the articles held by an external store.
///
/// Every call is a single attempt. Implementations never retry; failures
/// come back as [`StoreError`] and the caller picks the policy.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Declares the article class. Calling it again is not an error.
    async fn ensure_schema(&self) -> StoreResult<SchemaStatus>;

    /// Persists a new article and returns the id the store assigned.
    async fn insert(&self, article: &ArticleInput) -> StoreResult<ArticleId>;

    /// Returns every article in whatever order the store keeps them.
    async fn query_all(&self) -> StoreResult<Vec<Article>>;

    /// Replaces title and content of an existing article.
    async fn update_by_id(&self, id: &ArticleId, article: &ArticleInput) -> StoreResult<()>;

    async fn delete_by_id(&self, id: &ArticleId) -> StoreResult<()>;
}

#[derive(Default)]
struct Records {
    ids: Vec<ArticleId>,
    articles: Vec<ArticleInput>,
    schema: bool,
    offline: bool,
}

impl Records {
    fn position(&self, id: &ArticleId) -> StoreResult<usize> {
        self.ids
            .iter()
            .position(|x| x == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            return Err(StoreError::Transport("store is offline".to_string()));
        }
        Ok(())
    }
}

/// Article store kept in process memory.
///
/// Ids are UUID v4 strings. Articles are returned in insertion order. The
/// store can be taken offline, after which every call fails with
/// [`StoreError::Transport`] until it is brought back.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Records>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Makes every following call fail (`true`) or succeed again (`false`).
    pub fn set_offline(&self, offline: bool) {
        self.records().offline = offline;
    }

    /// Returns the number of stored articles.
    pub fn count(&self) -> usize {
        self.records().ids.len()
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn ensure_schema(&self) -> StoreResult<SchemaStatus> {
        let mut records = self.records();
        records.check_online()?;

        if records.schema {
            return Ok(SchemaStatus::AlreadyExists);
        }
        records.schema = true;
        Ok(SchemaStatus::Created)
    }

    async fn insert(&self, article: &ArticleInput) -> StoreResult<ArticleId> {
        let mut records = self.records();
        records.check_online()?;

        let id = ArticleId::new(uuid::Uuid::new_v4().to_string());
        records.ids.push(id.clone());
        records.articles.push(article.clone());
        Ok(id)
    }

    async fn query_all(&self) -> StoreResult<Vec<Article>> {
        let records = self.records();
        records.check_online()?;

        Ok(records.ids.iter()
            .zip(records.articles.iter())
            .map(|(id, input)| Article::new(id.clone(), input.clone()))
            .collect())
    }

    async fn update_by_id(&self, id: &ArticleId, article: &ArticleInput) -> StoreResult<()> {
        let mut records = self.records();
        records.check_online()?;

        let index = records.position(id)?;
        records.articles[index] = article.clone();
        Ok(())
    }

    async fn delete_by_id(&self, id: &ArticleId) -> StoreResult<()> {
        let mut records = self.records();
        records.check_online()?;

        let index = records.position(id)?;
        records.ids.remove(index);
        records.articles.remove(index);
        Ok(())
    }
}
