//! # Article Board - CRUD over a Vector Database
//!
//! Article board keeps a list of articles (title and content) in a Weaviate
//! instance, which vectorizes and indexes the text on its side, and shows
//! them as an HTML table with inline edit and delete controls.
//!
//! The store is injected: [`WeaviateStore`] talks to Weaviate over HTTP,
//! [`MemoryStore`] keeps everything in process. After every mutation the
//! [`Board`] reloads the full list; nothing is patched locally.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use article_board::{ArticleInput, Board, ErrorPolicy, MemoryStore};
//!
//! actix_web::rt::System::new().block_on(async {
//!     let board = Board::new(Arc::new(MemoryStore::new()), ErrorPolicy::default());
//!     assert!(board.start().await.is_ok());
//!
//!     let outcome = board.create(ArticleInput::new("Hello", "First article")).await;
//!     assert!(outcome.is_ok());
//!     assert_eq!(board.articles()[0].title, "Hello");
//! });
//! ```

pub mod article;
pub mod board;
pub mod config;
pub mod dialog;
pub mod error;
pub mod server;
pub mod store;
pub mod view;
pub mod weaviate;

pub use article::{Article, ArticleId, ArticleInput};
pub use board::{Board, Outcome};
pub use error::{ErrorKind, ErrorPolicy, StoreError};
pub use store::{ArticleStore, MemoryStore, SchemaStatus};
pub use weaviate::{SchemaConfig, WeaviateStore};
