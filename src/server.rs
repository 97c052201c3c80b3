//! Web front end for the article board.
//!
//! Serves the article table as HTML. Each control on the page is a plain
//! form or link, so a user action is one request: the handler runs the board
//! operation (mutation plus full reload) and answers with a fresh render.
//!
//! ## Endpoints
//!
//! - `GET /` - Render the table, `?edit=<id>` opens the edit dialog
//! - `POST /articles` - Create an article from the `title`/`content` form
//! - `POST /articles/{id}` - Submit the edit dialog
//! - `POST /articles/{id}/delete` - Delete an article
//! - `GET /api/articles` - Current snapshot as JSON
//! - `GET /health` - Liveness probe
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use actix_web::{web, App, HttpServer};
//! use article_board::{Board, ErrorPolicy, MemoryStore};
//! use article_board::server::AppState;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let board = Board::new(Arc::new(MemoryStore::new()), ErrorPolicy::default());
//!     let state = web::Data::new(AppState::new(board).unwrap());
//!     HttpServer::new(move || App::new().app_data(state.clone()).configure(article_board::server::config))
//!         .bind("0.0.0.0:7878")?
//!         .run()
//!         .await
//! }
//! ```

use crate::article::{ArticleId, ArticleInput};
use crate::board::{Board, Outcome};
use crate::dialog::EditDialog;
use crate::view::{Page, Renderer, ViewError};
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

/// Shared state handed to every handler.
pub struct AppState {
    board: Board,
    renderer: Renderer,
}

impl AppState {
    pub fn new(board: Board) -> Result<AppState, ViewError> {
        Ok(AppState { board, renderer: Renderer::new()? })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

// --- Request structs ---

#[derive(Deserialize)]
struct IndexQuery {
    edit: Option<String>,
}

#[derive(Deserialize)]
struct ArticleForm {
    title: String,
    content: String,
}

impl From<ArticleForm> for ArticleInput {
    fn from(form: ArticleForm) -> Self {
        ArticleInput::new(form.title, form.content)
    }
}

/// Renders the current snapshot, with the outcome's failures as notices
/// when the policy asks for them.
fn render(state: &AppState, dialog: &EditDialog, outcome: Outcome) -> HttpResponse {
    let mut page = Page::new(&state.board.articles(), dialog);
    if state.board.policy().surface {
        page = page.with_notices(outcome.messages());
    }

    match state.renderer.render_page(&page) {
        Ok(html) => HttpResponse::Ok().content_type(ContentType::html()).body(html),
        Err(e) => {
            tracing::error!(error = %e, "Error rendering page");
            HttpResponse::InternalServerError().json(serde_json::json!({"error": e.to_string()}))
        }
    }
}

// --- Handlers ---

async fn index_handler(state: web::Data<AppState>, query: web::Query<IndexQuery>) -> impl Responder {
    let mut dialog = EditDialog::default();

    if let Some(id) = &query.edit {
        match state.board.find(&ArticleId::new(id.as_str())) {
            Some(article) => dialog.open_article(&article),
            None => tracing::debug!(%id, "Edit requested for unknown article"),
        }
    }

    render(&state, &dialog, Outcome::default())
}

async fn create_handler(state: web::Data<AppState>, form: web::Form<ArticleForm>) -> impl Responder {
    let outcome = state.board.create(form.into_inner().into()).await;

    // The fresh render comes with an empty creation form
    render(&state, &EditDialog::Hidden, outcome)
}

async fn update_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<ArticleForm>,
) -> impl Responder {
    let id = ArticleId::new(path.into_inner());
    let form = form.into_inner();

    let mut dialog = EditDialog::default();
    match state.board.find(&id) {
        Some(article) => dialog.open_article(&article),
        None => dialog.open(id, "", ""),
    }

    let outcome = match dialog.submit(form.title, form.content) {
        Some((id, input)) => state.board.update(&id, input).await,
        None => Outcome::default(),
    };
    dialog.close();

    render(&state, &dialog, outcome)
}

async fn delete_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = ArticleId::new(path.into_inner());
    let outcome = state.board.delete(&id).await;

    render(&state, &EditDialog::Hidden, outcome)
}

async fn list_handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.board.articles())
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index_handler)))
       .service(web::resource("/articles").route(web::post().to(create_handler)))
       .service(web::resource("/articles/{id}").route(web::post().to(update_handler)))
       .service(web::resource("/articles/{id}/delete").route(web::post().to(delete_handler)))
       .service(web::resource("/api/articles").route(web::get().to(list_handler)))
       .service(web::resource("/health").route(web::get().to(health_handler)));
}

#[cfg(test)]
mod server_test {
    use super::*;
    use crate::error::ErrorPolicy;
    use crate::store::{ArticleStore, MemoryStore};
    use actix_web::{test, App};
    use std::sync::Arc;

    fn state(store: Arc<MemoryStore>, policy: ErrorPolicy) -> web::Data<AppState> {
        web::Data::new(AppState::new(Board::new(store, policy)).unwrap())
    }

    #[actix_web::test]
    async fn test_index_renders_snapshot() {
        let store = Arc::new(MemoryStore::new());
        store.insert(&ArticleInput::new("A", "B")).await.unwrap();
        let state = state(store, ErrorPolicy::default());
        let _ = state.board().reload().await;

        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();

        assert!(html.contains("<td>A</td>"));
        assert!(!html.contains("id=\"editModal\""));
    }

    #[actix_web::test]
    async fn test_edit_query_opens_dialog_from_record() {
        let store = Arc::new(MemoryStore::new());
        let id = store.insert(&ArticleInput::new("Title", "Body")).await.unwrap();
        let state = state(store, ErrorPolicy::default());
        let _ = state.board().reload().await;

        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let req = test::TestRequest::get().uri(&format!("/?edit={}", id)).to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();

        assert!(html.contains("id=\"editModal\""));
        assert!(html.contains("value=\"Title\""));
    }

    #[actix_web::test]
    async fn test_edit_unknown_id_keeps_dialog_hidden() {
        let state = state(Arc::new(MemoryStore::new()), ErrorPolicy::default());

        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let req = test::TestRequest::get().uri("/?edit=nope").to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert!(!String::from_utf8(body.to_vec()).unwrap().contains("id=\"editModal\""));
    }

    #[actix_web::test]
    async fn test_create_missing_field_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let state = state(store.clone(), ErrorPolicy::default());

        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/articles")
            .set_form([("title", "only title")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        assert_eq!(store.count(), 0);
    }

    #[actix_web::test]
    async fn test_failures_shown_only_when_surfaced() {
        let quiet = Arc::new(MemoryStore::new());
        quiet.set_offline(true);
        let loud = Arc::new(MemoryStore::new());
        loud.set_offline(true);

        for (store, surface) in [(quiet, false), (loud, true)] {
            let state = state(store, ErrorPolicy { retries: 0, surface });
            let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
            let req = test::TestRequest::post()
                .uri("/articles")
                .set_form([("title", "t"), ("content", "c")])
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 200);

            let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
            assert_eq!(html.contains("Error adding data"), surface);
        }
    }
}
