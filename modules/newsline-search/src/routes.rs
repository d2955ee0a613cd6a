use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use newsline_common::{Config, Embedder};
use newsline_searchengine::{SearchEngineClient, SearchHit};

use crate::blend::{blend_score, cosine_similarity};
use crate::error::{Result, SearchError};
use crate::user_store::UserProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchEngineClient>,
    pub users: UserProfileStore,
    pub config: Config,
    pub embedder: Arc<dyn Embedder>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health))
        .route("/search", axum::routing::get(search))
        .route("/latest", axum::routing::get(latest))
        .route("/by-tag", axum::routing::get(by_tag))
        .route("/click/{user_id}/{doc_id}", axum::routing::post(click))
        .route("/metrics", axum::routing::get(metrics_handler))
        .layer(axum::middleware::from_fn(crate::metrics::track_request))
        .with_state(state)
}

/// `GET /health` (spec §4.4/§6): probes the search engine rather than
/// just answering locally, so a down Typesense surfaces as a failed
/// health check instead of a false "ok".
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.search.health().await {
        Ok(status) => (StatusCode::OK, Json(serde_json::json!({ "typesense": status }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "typesense": "unavailable", "error": e.to_string() })),
        ),
    }
}

async fn metrics_handler(State(_state): State<AppState>) -> impl IntoResponse {
    crate::metrics::render()
}

const MIN_LIMIT: u32 = 1;
const MAX_LIMIT: u32 = 100;

fn validate_limit(limit: u32) -> Result<u32> {
    if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(SearchError::BadRequest(format!(
            "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub semantic: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_limit() -> u32 {
    10
}

/// `GET /search` (spec §4.4): keyword or semantic search, blended with the
/// requesting user's interest vector when `user_id` is supplied. Semantic
/// mode embeds the query text itself (`q_vec = embed(q)`) — distinct from
/// the per-user blend step below, which compares hits against the user's
/// stored interest vector regardless of search mode.
async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Result<impl IntoResponse> {
    let limit = validate_limit(query.limit)?;

    let mut response = if query.semantic {
        let q_vec = state.embedder.embed(&query.q).await?;
        state.search.search_vector(&q_vec, limit).await?
    } else {
        state.search.search_keyword(&query.q, limit, query.cursor.as_deref()).await?
    };

    if let Some(user_id) = &query.user_id {
        if let Some(user) = state.users.get(user_id).await? {
            apply_blend(&mut response.hits, &user.interest, &state.config);
        }
    }

    Ok(Json(response))
}

/// `GET /latest` (spec §11, supplemented).
async fn latest(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Result<impl IntoResponse> {
    let limit = validate_limit(query.limit)?;
    let response = state.search.latest(limit).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    pub tag: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// `GET /by-tag` (spec §11, supplemented).
async fn by_tag(State(state): State<AppState>, Query(query): Query<TagQuery>) -> Result<impl IntoResponse> {
    let limit = validate_limit(query.limit)?;
    let response = state.search.search_by_tag(&query.tag, limit, query.cursor.as_deref()).await?;
    Ok(Json(response))
}

/// `POST /click/{user_id}/{doc_id}`: records a click, folding the
/// clicked document's embedding into the user's running interest mean.
async fn click(State(state): State<AppState>, Path((user_id, doc_id)): Path<(String, String)>) -> Result<impl IntoResponse> {
    let doc = state.search.get_document(&doc_id).await?;
    let interest = state.users.record_click(&user_id, &doc.vec).await?;
    Ok(Json(serde_json::json!({ "user_id": interest.user_id, "cnt": interest.cnt })))
}

fn apply_blend(hits: &mut [SearchHit], user_interest: &[f32], config: &Config) {
    for hit in hits.iter_mut() {
        let doc_vec = hit
            .document
            .get("vec")
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|x| x.as_f64().map(|f| f as f32)).collect::<Vec<f32>>());
        let Some(doc_vec) = doc_vec else {
            warn!("hit document missing vec field, skipping blend");
            continue;
        };
        let similarity = cosine_similarity(&doc_vec, user_interest);
        hit.score = Some(blend_score(
            hit.base_score(),
            similarity,
            config.blend_base_weight,
            config.blend_user_weight,
        ));
    }
    hits.sort_by(|a, b| b.score.unwrap_or(0.0).partial_cmp(&a.score.unwrap_or(0.0)).unwrap());
}
