//! Standard REST routes for one table, nested under its prefix by the registry.

use crate::handlers::resource::{create, delete as delete_handler, list, read, update};
use crate::service::TableAccessor;
use crate::state::ResourceState;
use axum::{routing::get, Router};

/// GET/POST `/`, GET/PUT/DELETE `/:id`.
pub fn resource_routes(accessor: TableAccessor) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(read).put(update).delete(delete_handler))
        .with_state(ResourceState::new(accessor))
}
