//! Shared state for system routes and per-resource routers.

use crate::service::TableAccessor;
use crate::store::Store;
use std::sync::Arc;

/// State for the system routes. Never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// URL prefixes of the mounted resources, e.g. `/api/players`.
    pub resources: Arc<Vec<String>>,
}

/// State for one resource's router.
#[derive(Clone)]
pub struct ResourceState {
    pub accessor: Arc<TableAccessor>,
}

impl ResourceState {
    pub fn new(accessor: TableAccessor) -> Self {
        ResourceState {
            accessor: Arc::new(accessor),
        }
    }

    pub fn resource(&self) -> &str {
        self.accessor.table()
    }
}
