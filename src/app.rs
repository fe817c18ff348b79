//! Application assembly: system routes, mounted resources, fallback and middleware.

use crate::response::error_body;
use crate::routes::{common_routes, ResourceRegistry};
use crate::state::AppState;
use crate::store::Store;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(error_body("Route not found")))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_body("Internal Server Error")),
    )
        .into_response()
}

/// Mount every registered resource on `store` and wrap the result with the
/// process-wide fallback, panic handler, body limit, CORS and request tracing.
pub async fn build_app(
    store: Arc<dyn Store>,
    registry: ResourceRegistry,
    body_limit_bytes: usize,
) -> Router {
    let mounted = registry.mount(store.clone()).await;
    let state = AppState {
        store,
        resources: Arc::new(mounted.prefixes),
    };
    Router::new()
        .merge(common_routes(state))
        .merge(mounted.router)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
