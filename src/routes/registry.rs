//! Resource registry: which tables are exposed, and under which URL prefix.
//!
//! The canonical set is the compile-time [`TABLES`] list. A directory of `<table>.routes`
//! entries can be scanned instead (`ROUTES_DIR`); a missing directory mounts nothing.
//! Mounting happens once at startup and the result never changes afterwards.

use crate::record::is_identifier;
use crate::routes::resource::resource_routes;
use crate::service::TableAccessor;
use crate::store::Store;
use axum::Router;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

/// Root under which every resource prefix is mounted.
pub const API_ROOT: &str = "/api";

/// Suffix identifying a route unit entry in a scanned directory.
pub const ROUTE_UNIT_SUFFIX: &str = ".routes";

/// Tables exposed by default, one resource each.
pub const TABLES: &[&str] = &[
    "users",
    "user_preferences",
    "activity_logs",
    "organizations",
    "leagues",
    "seasons",
    "stadiums",
    "teams",
    "team_formations",
    "players",
    "player_contracts",
    "transfers",
    "injuries",
    "fitness_records",
    "medical_records",
    "matches",
    "match_events",
    "match_lineups",
    "match_stats",
    "team_match_stats",
    "standings",
    "training_sessions",
    "training_attendance",
    "training_drills",
    "scouting_reports",
    "transactions",
    "sponsorships",
    "media_gallery",
    "news_articles",
    "notifications",
    "messages",
    "awards",
    "milestones",
    "saved_reports",
];

/// One table's CRUD surface and the prefix it is mounted under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceUnit {
    pub table: String,
    pub prefix: String,
}

impl ResourceUnit {
    /// `None` unless `table` is a plain identifier.
    pub fn for_table(table: &str) -> Option<Self> {
        if !is_identifier(table) {
            return None;
        }
        Some(ResourceUnit {
            table: table.to_string(),
            prefix: format!("{}/{}", API_ROOT, table),
        })
    }

    /// Unit for a directory entry named `<table>.routes`; `None` for any other name.
    pub fn from_entry_name(name: &str) -> Option<Self> {
        name.strip_suffix(ROUTE_UNIT_SUFFIX)
            .filter(|t| !t.is_empty())
            .and_then(Self::for_table)
    }
}

/// Resource units awaiting mounting.
#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    units: Vec<ResourceUnit>,
}

impl ResourceRegistry {
    /// One unit per entry in [`TABLES`].
    pub fn builtin() -> Self {
        Self::from_tables(TABLES.iter().copied())
    }

    /// Units for the given table names. Invalid names and duplicates are skipped with a warning.
    pub fn from_tables<'a>(tables: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = ResourceRegistry::default();
        for table in tables {
            match ResourceUnit::for_table(table) {
                Some(unit) => registry.push(unit),
                None => tracing::warn!(table = %table, "invalid table name, skipping"),
            }
        }
        registry
    }

    /// Scan `dir` for `<table>.routes` entries. Entries with other names are ignored.
    /// A missing or unreadable directory yields an empty registry and a warning.
    pub async fn discover(dir: &Path) -> Self {
        let mut registry = ResourceRegistry::default();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(dir = %dir.display(), "routes directory not found");
                return registry;
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "routes directory unreadable");
                return registry;
            }
        };
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "stopped reading routes directory");
                    break;
                }
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.ends_with(ROUTE_UNIT_SUFFIX) {
                continue;
            }
            match ResourceUnit::from_entry_name(name) {
                Some(unit) => registry.push(unit),
                None => tracing::warn!(entry = %name, "route unit name is not a table identifier, skipping"),
            }
        }
        registry
    }

    fn push(&mut self, unit: ResourceUnit) {
        if self.units.iter().any(|u| u.prefix == unit.prefix) {
            tracing::warn!(prefix = %unit.prefix, "duplicate resource, skipping");
            return;
        }
        self.units.push(unit);
    }

    pub fn units(&self) -> &[ResourceUnit] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Build an accessor per unit (reading its column types from `store`) and nest the
    /// resource routes under each prefix. Units are mounted sequentially. Once a schema
    /// lookup fails, the remaining units are mounted without one instead of waiting on an
    /// unreachable store per table.
    pub async fn mount(self, store: Arc<dyn Store>) -> MountedResources {
        if self.units.is_empty() {
            tracing::warn!("no resource routes to mount");
        }
        let mut router = Router::new();
        let mut prefixes = Vec::with_capacity(self.units.len());
        let mut store_down = false;
        for unit in self.units {
            let accessor = TableAccessor::new(unit.table.as_str(), store.clone());
            let accessor = if store_down {
                accessor
            } else {
                match accessor.load_schema().await {
                    Ok(Some(schema)) => accessor.with_schema(schema),
                    Ok(None) => {
                        tracing::warn!(table = %unit.table, "table has no columns in current schema");
                        accessor
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "schema lookup failed, mounting remaining tables without column types");
                        store_down = true;
                        accessor
                    }
                }
            };
            router = router.nest(&unit.prefix, resource_routes(accessor));
            tracing::info!(prefix = %unit.prefix, "mounted route");
            prefixes.push(unit.prefix);
        }
        MountedResources { router, prefixes }
    }
}

/// Result of [`ResourceRegistry::mount`]: the combined router and the prefixes it serves.
pub struct MountedResources {
    pub router: Router,
    pub prefixes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_table() {
        let reg = ResourceRegistry::builtin();
        assert_eq!(reg.units().len(), TABLES.len());
        assert_eq!(TABLES.len(), 34);
        assert!(reg
            .units()
            .iter()
            .any(|u| u.table == "players" && u.prefix == "/api/players"));
    }

    #[test]
    fn prefix_from_entry_name() {
        let unit = ResourceUnit::from_entry_name("match_events.routes").unwrap();
        assert_eq!(unit.table, "match_events");
        assert_eq!(unit.prefix, "/api/match_events");
        assert!(ResourceUnit::from_entry_name("match_events.rs").is_none());
        assert!(ResourceUnit::from_entry_name(".routes").is_none());
        assert!(ResourceUnit::from_entry_name("bad-name.routes").is_none());
    }

    #[test]
    fn from_tables_skips_invalid_and_duplicates() {
        let reg = ResourceRegistry::from_tables(["players", "players", "drop table", "teams"]);
        let tables: Vec<_> = reg.units().iter().map(|u| u.table.as_str()).collect();
        assert_eq!(tables, vec!["players", "teams"]);
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let dir = std::env::temp_dir().join(format!("no-routes-{}", uuid::Uuid::new_v4()));
        let reg = ResourceRegistry::discover(&dir).await;
        assert!(reg.is_empty());
    }

    #[tokio::test]
    async fn discovers_route_units() {
        let dir = std::env::temp_dir().join(format!("routes-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["players.routes", "injuries.routes", "README.md", "bad name.routes"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        let reg = ResourceRegistry::discover(&dir).await;
        let mut tables: Vec<_> = reg.units().iter().map(|u| u.table.clone()).collect();
        tables.sort();
        assert_eq!(tables, vec!["injuries", "players"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
