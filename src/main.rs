use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use article_board::config::Config;
use article_board::server::AppState;
use article_board::{ArticleStore, Board, MemoryStore, WeaviateStore};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let store: Arc<dyn ArticleStore> = if config.memory {
        tracing::info!("Using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!(url = %config.weaviate_url, "Using Weaviate store");
        Arc::new(WeaviateStore::new(config.weaviate_url.clone(), config.schema()))
    };

    let board = Board::new(store, config.policy());
    // Failures are already logged; the server starts regardless
    let _ = board.start().await;

    let state = web::Data::new(AppState::new(board).context("loading templates")?);

    tracing::info!(bind = %config.bind, "Serving article board");
    HttpServer::new(move || App::new().app_data(state.clone()).configure(article_board::server::config))
        .bind(&config.bind)
        .with_context(|| format!("binding {}", config.bind))?
        .run()
        .await?;

    Ok(())
}
