//! Route tables: exhibition CRUD under /api/exhibitions, static uploads,
//! and the common service routes.

use crate::handlers::exhibition::{
    create_exhibition, delete_exhibition, get_exhibition, list_exhibitions, nav_exhibitions,
    update_exhibition,
};
use crate::state::AppState;
use crate::upload::UPLOAD_ROUTE;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Cap on write-request bodies: the `data` field plus every uploaded image.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// CRUD routes for the exhibition resource. The nav projection is registered
/// beside `/:id`; axum gives the static segment precedence.
pub fn exhibition_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_exhibitions).post(create_exhibition))
        .route("/nav/exhibitions", get(nav_exhibitions))
        .route(
            "/:id",
            get(get_exhibition)
                .put(update_exhibition)
                .delete(delete_exhibition),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadyBody>, (axum::http::StatusCode, Json<ReadyBody>)> {
    if sqlx::query("SELECT 1")
        .fetch_optional(state.store.pool())
        .await
        .is_err()
    {
        return Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: Some("unavailable"),
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: Some("ok"),
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Common routes: GET /health, GET /ready (with DB ping), GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}

/// The full application: API routes, service routes, and read-only static
/// access to the upload directory.
pub fn app(state: AppState) -> Router {
    let upload_root = state.uploads.root().to_path_buf();
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/exhibitions", exhibition_routes(state))
        .nest_service(UPLOAD_ROUTE, ServeDir::new(upload_root))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
