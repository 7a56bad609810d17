use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sift_core::{build_federation, DocId, DocMeta, EngineConfig, SearchResult, SuperEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Deserialize)]
pub struct BoolParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub collection: Option<String>,
    pub title: String,
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct BoolResponse {
    pub query: String,
    pub collection: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub doc_ids: Vec<DocId>,
}

#[derive(Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub num_docs: usize,
    pub num_terms: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SuperEngine>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn not_found(what: String) -> ApiError {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": what })))
}

/// Index every input as its own collection and build the router over them.
pub fn build_app(inputs: &[PathBuf], config: EngineConfig) -> Result<Router> {
    let engine = build_federation(inputs, config)?;
    Ok(router(Arc::new(engine)))
}

pub fn router(engine: Arc<SuperEngine>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/collections", get(collections_handler))
        .route("/collections/:name/search", get(collection_search_handler))
        .route("/collections/:name/bool", get(bool_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn respond(state: &AppState, query: String, k: usize, scored: Vec<SearchResult>, took_s: f64) -> SearchResponse {
    let total_hits = scored.len();
    let k = k.clamp(1, 100);
    let results = scored
        .into_iter()
        .take(k)
        .map(|r| {
            let meta = state.engine.doc(r.doc_id);
            SearchHit {
                doc_id: r.doc_id,
                score: r.score,
                collection: state.engine.collection_of(r.doc_id).map(str::to_string),
                title: meta.map(|m| m.title.clone()).unwrap_or_default(),
                url: meta.and_then(|m| m.url.clone()),
            }
        })
        .collect();
    SearchResponse { query, took_s, total_hits, results }
}

/// Run a CPU-bound query off the async workers; returns the value and seconds taken.
async fn run_blocking<T, F>(f: F) -> Result<(T, f64), ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let start = std::time::Instant::now();
        let out = f();
        (out, start.elapsed().as_secs_f64())
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "query task failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": "query failed" })))
    })
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let engine = state.engine.clone();
    let q = params.q.clone();
    let (scored, took_s) = run_blocking(move || engine.search(&q)).await?;
    tracing::debug!(query = %params.q, hits = scored.len(), took_s, "federated search");
    Ok(Json(respond(&state, params.q, params.k, scored, took_s)))
}

pub async fn collection_search_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let engine = state.engine.engine(&name).cloned().ok_or_else(|| not_found(format!("no collection {name}")))?;
    let q = params.q.clone();
    let (scored, took_s) = run_blocking(move || engine.vect_search(&q)).await?;
    Ok(Json(respond(&state, params.q, params.k, scored, took_s)))
}

pub async fn bool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<BoolParams>,
) -> Result<Json<BoolResponse>, ApiError> {
    let engine = state.engine.engine(&name).cloned().ok_or_else(|| not_found(format!("no collection {name}")))?;
    let q = params.q.clone();
    let (doc_ids, took_s) = run_blocking(move || engine.bool_search(&q)).await?;
    Ok(Json(BoolResponse { query: params.q, collection: name, took_s, total_hits: doc_ids.len(), doc_ids }))
}

pub async fn collections_handler(State(state): State<AppState>) -> Json<Vec<CollectionInfo>> {
    let infos = state
        .engine
        .engines()
        .iter()
        .map(|e| CollectionInfo {
            name: e.name().to_string(),
            num_docs: e.artifacts().num_docs(),
            num_terms: e.artifacts().num_terms(),
        })
        .collect();
    Json(infos)
}

#[derive(Serialize)]
pub struct DocResponse<'a> {
    pub doc_id: DocId,
    pub collection: Option<&'a str>,
    #[serde(flatten)]
    pub meta: &'a DocMeta,
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Response {
    match state.engine.doc(doc_id) {
        Some(meta) => Json(DocResponse { doc_id, collection: state.engine.collection_of(doc_id), meta }).into_response(),
        None => not_found(format!("no document {doc_id}")).into_response(),
    }
}
