//! Command-line and environment configuration

use crate::error::ErrorPolicy;
use crate::weaviate::{SchemaConfig, ARTICLE_FIELDS, DEFAULT_URL};
use clap::Parser;
use reqwest::Url;

/// Accepts only http(s) URLs that request paths can be appended to.
fn parse_base_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("invalid URL '{}': {}", value, e))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(format!("'{}' is not an http(s) base URL, e.g. {}", value, DEFAULT_URL));
    }
    Ok(url)
}

/// Article board backed by a Weaviate vector database.
#[derive(Debug, Clone, Parser)]
#[command(name = "article-board", version)]
pub struct Config {
    /// Weaviate base URL (scheme and host)
    #[arg(long, env = "ARTICLE_BOARD_WEAVIATE_URL", default_value = DEFAULT_URL, value_parser = parse_base_url)]
    pub weaviate_url: Url,

    /// Address the web server listens on
    #[arg(long, env = "ARTICLE_BOARD_BIND", default_value = "0.0.0.0:7878")]
    pub bind: String,

    /// Keep articles in process memory instead of Weaviate
    #[arg(long)]
    pub memory: bool,

    /// Name of the article class
    #[arg(long, default_value = "Article")]
    pub class_name: String,

    /// Vectorizer module declared on the class
    #[arg(long, default_value = "text2vec-transformers")]
    pub vectorizer: String,

    /// Vector index structure declared on the class
    #[arg(long = "index-type", default_value = "hnsw")]
    pub vector_index_type: String,

    /// Fields fed to the vectorizer
    #[arg(long = "vectorize", value_delimiter = ',', value_parser = ARTICLE_FIELDS, default_values = ARTICLE_FIELDS)]
    pub vectorized_fields: Vec<String>,

    /// Extra attempts per database call after a failure
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Show database failures on the page instead of only logging them
    #[arg(long)]
    pub show_errors: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn schema(&self) -> SchemaConfig {
        SchemaConfig {
            class_name: self.class_name.clone(),
            vectorizer: self.vectorizer.clone(),
            vector_index_type: self.vector_index_type.clone(),
            vectorized_fields: self.vectorized_fields.clone(),
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        ErrorPolicy { retries: self.retries, surface: self.show_errors }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!("article_board={},actix_web=info", level)
    }
}
