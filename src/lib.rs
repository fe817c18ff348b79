//! Football stats API: table-driven CRUD over PostgreSQL, one REST resource per table.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod record;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use app::build_app;
pub use config::{DatabaseConfig, ServerConfig};
pub use error::{AppError, ConfigError};
pub use record::Record;
pub use routes::{ResourceRegistry, TABLES};
pub use service::TableAccessor;
pub use sql::Statement;
pub use state::{AppState, ResourceState};
pub use store::{PgStore, Row, Store};
