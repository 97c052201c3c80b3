//! Edit dialog state
//! Hidden until an article is opened for editing, visible until submitted or cancelled

use crate::article::{Article, ArticleId, ArticleInput};
use serde::Serialize;

/// Values shown in the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditForm {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditDialog {
    #[default]
    Hidden,
    Visible(EditForm),
}

impl EditDialog {
    /// Shows the dialog pre-filled with the given values.
    ///
    /// Opening an already visible dialog replaces its contents.
    pub fn open(&mut self, id: ArticleId, title: impl Into<String>, content: impl Into<String>) {
        *self = EditDialog::Visible(EditForm { id, title: title.into(), content: content.into() });
    }

    /// Shows the dialog pre-filled from a retained record.
    pub fn open_article(&mut self, article: &Article) {
        self.open(article.id.clone(), article.title.clone(), article.content.clone());
    }

    /// Takes the submitted values and returns what should be persisted.
    ///
    /// The dialog stays visible; call [`close`](EditDialog::close) once the
    /// update and the reload have completed. Returns `None` when hidden.
    pub fn submit(&mut self, title: impl Into<String>, content: impl Into<String>) -> Option<(ArticleId, ArticleInput)> {
        match self {
            EditDialog::Hidden => None,
            EditDialog::Visible(form) => {
                form.title = title.into();
                form.content = content.into();
                Some((form.id.clone(), ArticleInput::new(form.title.clone(), form.content.clone())))
            }
        }
    }

    /// Hides the dialog without persisting anything.
    pub fn cancel(&mut self) {
        *self = EditDialog::Hidden;
    }

    /// Hides the dialog after a submit went through.
    pub fn close(&mut self) {
        self.cancel();
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, EditDialog::Visible(_))
    }

    pub fn form(&self) -> Option<&EditForm> {
        match self {
            EditDialog::Hidden => None,
            EditDialog::Visible(form) => Some(form),
        }
    }
}

#[cfg(test)]
mod dialog_test {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        let dialog = EditDialog::default();

        assert!(!dialog.is_visible());
        assert!(dialog.form().is_none());
    }

    #[test]
    fn test_open_prefills_form() {
        let mut dialog = EditDialog::default();
        dialog.open("42".into(), "title", "content");

        let form = dialog.form().unwrap();
        assert_eq!(form.id.as_str(), "42");
        assert_eq!(form.title, "title");
        assert_eq!(form.content, "content");
    }

    #[test]
    fn test_open_article_uses_record_verbatim() {
        // Leading/trailing whitespace must survive, it is part of the record
        let article = Article::new("7".into(), ArticleInput::new("  spaced  ", "\nbody\n"));
        let mut dialog = EditDialog::default();
        dialog.open_article(&article);

        assert_eq!(dialog.form().unwrap().title, "  spaced  ");
        assert_eq!(dialog.form().unwrap().content, "\nbody\n");
    }

    #[test]
    fn test_submit_returns_payload_and_stays_visible() {
        let mut dialog = EditDialog::default();
        dialog.open("1".into(), "old", "old");

        let (id, input) = dialog.submit("new", "").unwrap();

        assert_eq!(id.as_str(), "1");
        assert_eq!(input, ArticleInput::new("new", ""));
        assert!(dialog.is_visible());

        dialog.close();
        assert_eq!(dialog, EditDialog::Hidden);
    }

    #[test]
    fn test_submit_while_hidden() {
        let mut dialog = EditDialog::Hidden;
        assert!(dialog.submit("t", "c").is_none());
    }

    #[test]
    fn test_cancel_discards_values() {
        let mut dialog = EditDialog::default();
        dialog.open("1".into(), "t", "c");
        dialog.cancel();

        assert!(!dialog.is_visible());
        assert!(dialog.submit("x", "y").is_none());
    }
}
