//! The article record
//! Provide the id newtype and the title/content payload

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the store when an article is first persisted.
///
/// The value is opaque: Weaviate hands out UUIDs, the in-memory store does
/// the same, but nothing here relies on the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> ArticleId {
        ArticleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(id: &str) -> Self {
        ArticleId::new(id)
    }
}

/// Title and content of an article, without an id.
///
/// Used both to create an article and to replace an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
}

impl ArticleInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> ArticleInput {
        ArticleInput { title: title.into(), content: content.into() }
    }
}

/// A persisted article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
}

impl Article {
    pub fn new(id: ArticleId, input: ArticleInput) -> Article {
        Article { id, title: input.title, content: input.content }
    }

    /// The title/content payload of this article.
    pub fn input(&self) -> ArticleInput {
        ArticleInput::new(self.title.clone(), self.content.clone())
    }
}
