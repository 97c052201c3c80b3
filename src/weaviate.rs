//! Weaviate backend for the article store.
//!
//! Talks to a Weaviate instance over its REST and GraphQL endpoints. The
//! article class is declared with a text vectorizer so Weaviate embeds and
//! indexes the text fields on its side; nothing here touches vectors.
//!
//! ## Endpoints used
//!
//! - `POST /v1/schema` - Declare the class
//! - `POST /v1/objects` - Create an article
//! - `POST /v1/graphql` - List all articles with their ids
//! - `PUT /v1/objects/{class}/{id}` - Replace an article
//! - `DELETE /v1/objects/{class}/{id}` - Delete an article

use crate::article::{Article, ArticleId, ArticleInput};
use crate::error::{StoreError, StoreResult};
use crate::store::{ArticleStore, SchemaStatus};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub const DEFAULT_URL: &str = "http://localhost:8080";

/// Text properties of the article class.
pub const ARTICLE_FIELDS: [&str; 2] = ["title", "content"];

/// Declaration of the article class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    pub class_name: String,
    /// Vectorizer module, e.g. `text2vec-transformers`.
    pub vectorizer: String,
    /// Vector index structure, e.g. `hnsw`.
    pub vector_index_type: String,
    /// Properties fed to the vectorizer. The others are declared with `skip`.
    pub vectorized_fields: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            class_name: "Article".to_string(),
            vectorizer: "text2vec-transformers".to_string(),
            vector_index_type: "hnsw".to_string(),
            vectorized_fields: vec!["title".to_string(), "content".to_string()],
        }
    }
}

impl SchemaConfig {
    /// The class object sent to `POST /v1/schema`.
    pub fn class_object(&self) -> Value {
        for field in &self.vectorized_fields {
            if !ARTICLE_FIELDS.contains(&field.as_str()) {
                tracing::warn!(%field, "vectorized field is not an article property, ignoring");
            }
        }

        let properties: Vec<Value> = ARTICLE_FIELDS
            .iter()
            .map(|name| {
                let mut property = json!({ "name": name, "dataType": ["text"] });
                if !self.vectorized_fields.iter().any(|f| f.as_str() == *name) {
                    let mut module = Map::new();
                    module.insert(self.vectorizer.clone(), json!({ "skip": true }));
                    property["moduleConfig"] = Value::Object(module);
                }
                property
            })
            .collect();

        json!({
            "class": self.class_name,
            "vectorizer": self.vectorizer,
            "vectorIndexType": self.vector_index_type,
            "properties": properties,
        })
    }

    fn graphql_query(&self) -> String {
        format!("{{ Get {{ {} {{ title content _additional {{ id }} }} }} }}", self.class_name)
    }
}

// --- Request structs ---

#[derive(Serialize)]
struct ObjectRequest<'a> {
    class: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    properties: &'a ArticleInput,
}

#[derive(Serialize)]
struct GraphQlRequest {
    query: String,
}

// --- Response structs ---

#[derive(Deserialize)]
struct ObjectResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlData {
    #[serde(rename = "Get")]
    get: Option<HashMap<String, Option<Vec<RawArticle>>>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct RawArticle {
    title: Option<String>,
    content: Option<String>,
    #[serde(rename = "_additional")]
    additional: Option<Additional>,
}

#[derive(Deserialize)]
struct Additional {
    id: Option<String>,
}

fn articles_from_graphql(class_name: &str, response: GraphQlResponse) -> StoreResult<Vec<Article>> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(StoreError::Query(messages.join("; ")));
    }

    let raw = response
        .data
        .and_then(|data| data.get)
        .and_then(|mut classes| classes.remove(class_name))
        .flatten()
        .unwrap_or_default();

    let mut articles = Vec::with_capacity(raw.len());
    for entry in raw {
        let Some(id) = entry.additional.and_then(|a| a.id) else {
            tracing::warn!(class = class_name, "skipping record without id");
            continue;
        };
        articles.push(Article {
            id: ArticleId::new(id),
            title: entry.title.unwrap_or_default(),
            content: entry.content.unwrap_or_default(),
        });
    }

    Ok(articles)
}

/// Reads the body of an answer. A connection lost mid-body is a transport failure.
async fn read_body(response: Response) -> StoreResult<String> {
    response.text().await.map_err(|e| StoreError::Transport(e.to_string()))
}

/// Turns a non-success answer into [`StoreError::Status`].
async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = read_body(response).await?;
    Err(StoreError::Status { code: status.as_u16(), body })
}

/// [`ArticleStore`] backed by a Weaviate instance.
pub struct WeaviateStore {
    client: Client,
    base: Url,
    schema: SchemaConfig,
}

impl WeaviateStore {
    pub fn new(base: Url, schema: SchemaConfig) -> WeaviateStore {
        WeaviateStore { client: Client::new(), base, schema }
    }

    /// Builds `<base>/v1/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v1").extend(segments);
        }
        url
    }

    fn object_url(&self, id: &ArticleId) -> Url {
        self.endpoint(&["objects", self.schema.class_name.as_str(), id.as_str()])
    }
}

#[async_trait]
impl ArticleStore for WeaviateStore {
    async fn ensure_schema(&self) -> StoreResult<SchemaStatus> {
        let response = self.client
            .post(self.endpoint(&["schema"]))
            .json(&self.schema.class_object())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(SchemaStatus::Created);
        }

        let body = read_body(response).await?;
        if status == StatusCode::UNPROCESSABLE_ENTITY && body.contains("already exists") {
            return Ok(SchemaStatus::AlreadyExists);
        }
        Err(StoreError::Status { code: status.as_u16(), body })
    }

    async fn insert(&self, article: &ArticleInput) -> StoreResult<ArticleId> {
        let request = ObjectRequest { class: &self.schema.class_name, id: None, properties: article };
        let response = self.client
            .post(self.endpoint(&["objects"]))
            .json(&request)
            .send()
            .await?;

        let created: ObjectResponse = check_status(response).await?.json().await?;
        created
            .id
            .map(ArticleId::new)
            .ok_or_else(|| StoreError::Decode("created object has no id".to_string()))
    }

    async fn query_all(&self) -> StoreResult<Vec<Article>> {
        let request = GraphQlRequest { query: self.schema.graphql_query() };
        let response = self.client
            .post(self.endpoint(&["graphql"]))
            .json(&request)
            .send()
            .await?;

        let body: GraphQlResponse = check_status(response).await?.json().await?;
        articles_from_graphql(&self.schema.class_name, body)
    }

    async fn update_by_id(&self, id: &ArticleId, article: &ArticleInput) -> StoreResult<()> {
        let request = ObjectRequest {
            class: &self.schema.class_name,
            id: Some(id.as_str()),
            properties: article,
        };
        let response = self.client
            .put(self.object_url(id))
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.clone()));
        }
        check_status(response).await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &ArticleId) -> StoreResult<()> {
        let response = self.client.delete(self.object_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.clone()));
        }
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod weaviate_test {
    use super::*;

    fn store(base: &str) -> WeaviateStore {
        WeaviateStore::new(Url::parse(base).unwrap(), SchemaConfig::default())
    }

    // ========== Schema Object Tests ==========

    #[test]
    fn test_default_class_object() {
        let class = SchemaConfig::default().class_object();

        assert_eq!(class["class"], "Article");
        assert_eq!(class["vectorizer"], "text2vec-transformers");
        assert_eq!(class["vectorIndexType"], "hnsw");

        let properties = class["properties"].as_array().unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0]["name"], "title");
        assert_eq!(properties[0]["dataType"], json!(["text"]));
        assert_eq!(properties[1]["name"], "content");
        assert!(properties[1].get("moduleConfig").is_none());
    }

    #[test]
    fn test_unvectorized_field_is_skipped() {
        let schema = SchemaConfig {
            vectorized_fields: vec!["content".to_string()],
            ..SchemaConfig::default()
        };
        let class = schema.class_object();

        assert_eq!(class["properties"][0]["moduleConfig"]["text2vec-transformers"]["skip"], true);
        assert!(class["properties"][1].get("moduleConfig").is_none());
    }

    #[test]
    fn test_unknown_vectorized_field_matches_nothing() {
        let schema = SchemaConfig {
            vectorized_fields: vec!["body".to_string()],
            ..SchemaConfig::default()
        };
        let class = schema.class_object();

        assert_eq!(class["properties"].as_array().unwrap().len(), 2);
        assert_eq!(class["properties"][0]["moduleConfig"]["text2vec-transformers"]["skip"], true);
        assert_eq!(class["properties"][1]["moduleConfig"]["text2vec-transformers"]["skip"], true);
    }

    #[test]
    fn test_graphql_query_names_class() {
        let query = SchemaConfig::default().graphql_query();
        assert_eq!(query, "{ Get { Article { title content _additional { id } } } }");
    }

    // ========== Endpoint Tests ==========

    #[test]
    fn test_endpoint_with_and_without_trailing_slash() {
        assert_eq!(store("http://localhost:8080").endpoint(&["schema"]).as_str(), "http://localhost:8080/v1/schema");
        assert_eq!(store("http://localhost:8080/").endpoint(&["graphql"]).as_str(), "http://localhost:8080/v1/graphql");
    }

    #[test]
    fn test_object_url_encodes_id() {
        let url = store("http://db:8080").object_url(&ArticleId::new("a/b c"));
        assert_eq!(url.as_str(), "http://db:8080/v1/objects/Article/a%2Fb%20c");
    }

    // ========== GraphQL Decoding Tests ==========

    fn parse(value: Value) -> GraphQlResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_articles() {
        let response = parse(json!({
            "data": {"Get": {"Article": [
                {"title": "A", "content": "B", "_additional": {"id": "1"}},
                {"title": "C", "content": null, "_additional": {"id": "2"}}
            ]}}
        }));

        let articles = articles_from_graphql("Article", response).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0], Article::new("1".into(), ArticleInput::new("A", "B")));
        assert_eq!(articles[1].content, "");
    }

    #[test]
    fn test_decode_null_class_is_empty() {
        let response = parse(json!({"data": {"Get": {"Article": null}}}));
        assert!(articles_from_graphql("Article", response).unwrap().is_empty());
    }

    #[test]
    fn test_decode_skips_missing_id() {
        let response = parse(json!({
            "data": {"Get": {"Article": [
                {"title": "no id", "content": "x"},
                {"title": "A", "content": "B", "_additional": {"id": "1"}}
            ]}}
        }));

        let articles = articles_from_graphql("Article", response).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id.as_str(), "1");
    }

    #[test]
    fn test_decode_graphql_errors() {
        let response = parse(json!({
            "data": {"Get": {"Article": null}},
            "errors": [{"message": "Cannot query field \"Article\""}, {"message": "second"}]
        }));

        match articles_from_graphql("Article", response) {
            Err(StoreError::Query(msg)) => {
                assert!(msg.contains("Cannot query field"));
                assert!(msg.contains("second"));
            }
            other => panic!("Expected query error, got {:?}", other),
        }
    }
}
