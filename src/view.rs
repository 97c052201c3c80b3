//! HTML rendering of the article table.
//!
//! Rendering is split in two steps: [`rows`] maps articles to the values a
//! table row shows, and [`Renderer`] turns those rows into markup through the
//! Tera templates under `templates/`. Every control in a row carries the
//! article id in `data-id`, and every response is a full render, so there is
//! nothing to re-bind between renders.

use crate::article::{Article, ArticleId};
use crate::dialog::{EditDialog, EditForm};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const ROWS_TEMPLATE: &str = include_str!("../templates/rows.html");

#[derive(Debug, Error)]
#[error("rendering failed: {0}")]
pub struct ViewError(#[from] tera::Error);

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
}

/// Maps articles to table rows, keeping their order.
pub fn rows(articles: &[Article]) -> Vec<RowView> {
    articles
        .iter()
        .map(|article| RowView {
            id: article.id.clone(),
            title: article.title.clone(),
            content: article.content.clone(),
        })
        .collect()
}

/// Everything one page shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub rows: Vec<RowView>,
    pub edit: Option<EditForm>,
    pub notices: Vec<String>,
}

impl Page {
    pub fn new(articles: &[Article], dialog: &EditDialog) -> Page {
        Page { rows: rows(articles), edit: dialog.form().cloned(), notices: Vec::new() }
    }

    pub fn with_notices(mut self, notices: Vec<String>) -> Page {
        self.notices = notices;
        self
    }
}

pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Renderer, ViewError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![("rows.html", ROWS_TEMPLATE), ("index.html", INDEX_TEMPLATE)])?;
        Ok(Renderer { tera })
    }

    /// Renders the whole document.
    pub fn render_page(&self, page: &Page) -> Result<String, ViewError> {
        let context = Context::from_serialize(page)?;
        Ok(self.tera.render("index.html", &context)?)
    }
}
