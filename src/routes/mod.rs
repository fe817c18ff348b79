//! Router assembly: system routes, per-resource CRUD routes, and the resource registry.

pub mod common;
pub mod registry;
pub mod resource;

pub use common::common_routes;
pub use registry::{MountedResources, ResourceRegistry, ResourceUnit, API_ROOT, ROUTE_UNIT_SUFFIX, TABLES};
pub use resource::resource_routes;
