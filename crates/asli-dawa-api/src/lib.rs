//! HTTP API for the Asli Dawa medicine catalog.
//!
//! Routes under `/api/medicines`:
//!
//! | Route                    | Response                                   |
//! |--------------------------|--------------------------------------------|
//! | `GET /search?name=`      | `{ matches, suggestion }`                  |
//! | `GET /byillness?q=`      | ranked records, 400 when `q` is blank      |
//! | `GET /byname?name=`      | one record, 404 when absent                |
//! | `GET /report/:id`        | `{ medicine, verdict }`                    |
//! | `GET /stats`             | `{ total_medicines, total_counterfeit }`   |
//! | `GET /:id`               | one record, 404 when absent                |
//!
//! Queries longer than [`asli_dawa_core::search::MAX_QUERY_CHARS`] are rejected with 400.

pub mod config;

pub use config::Config;

use std::sync::Arc;

use asli_dawa_core::{
    Catalog, CatalogError, CatalogResult, CatalogStats, GenuinenessReport, MedicineRecord,
    SearchResult,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::task::{self, JoinError};
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
}

/// Build the application router over a loaded catalog.
pub fn router(catalog: Arc<Catalog>) -> Router {
    let medicines = Router::new()
        .route("/search", get(search_by_name))
        .route("/byillness", get(search_by_illness))
        .route("/byname", get(search_by_exact_name))
        .route("/stats", get(stats))
        .route("/report/:id", get(report))
        .route("/:id", get(get_by_id));

    Router::new()
        .route("/", get(root))
        .nest("/api/medicines", medicines)
        .layer(CorsLayer::permissive())
        .with_state(AppState { catalog })
}

// =========================================================================
// Errors
// =========================================================================

/// Request failure rendered as an HTTP response with a `{ "msg": ... }` body.
#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    /// The blocking catalog task panicked or was cancelled.
    Task(JoinError),
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError::Catalog(e)
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Task(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Catalog(CatalogError::BadRequest(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Catalog(CatalogError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Medicine not found".into())
            }
            ApiError::Catalog(other) => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".into())
            }
            ApiError::Task(e) => {
                error!(error = %e, "catalog task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".into())
            }
        };

        (status, Json(json!({ "msg": msg }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Run a catalog call on the blocking pool.
///
/// SQLite access and suggestion scoring are synchronous, so they stay off
/// the async workers.
async fn with_catalog<T, F>(state: AppState, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Catalog) -> CatalogResult<T> + Send + 'static,
{
    let result = task::spawn_blocking(move || f(state.catalog.as_ref())).await?;
    Ok(Json(result?))
}

// =========================================================================
// Handlers
// =========================================================================

#[derive(Debug, Deserialize)]
struct NameParams {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct IllnessParams {
    #[serde(default)]
    q: String,
}

async fn root() -> &'static str {
    "Asli Dawa API is running..."
}

async fn search_by_name(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> ApiResult<SearchResult> {
    with_catalog(state, move |catalog| catalog.search_by_name(&params.name)).await
}

async fn search_by_illness(
    State(state): State<AppState>,
    Query(params): Query<IllnessParams>,
) -> ApiResult<Vec<MedicineRecord>> {
    with_catalog(state, move |catalog| catalog.search_by_illness(&params.q)).await
}

async fn search_by_exact_name(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> ApiResult<MedicineRecord> {
    with_catalog(state, move |catalog| catalog.search_by_exact_name(&params.name)).await
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MedicineRecord> {
    with_catalog(state, move |catalog| catalog.get_by_id(&id)).await
}

async fn report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GenuinenessReport> {
    with_catalog(state, move |catalog| catalog.report(&id)).await
}

async fn stats(State(state): State<AppState>) -> ApiResult<CatalogStats> {
    with_catalog(state, |catalog| catalog.stats()).await
}
