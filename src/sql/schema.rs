//! Column types of a table, read from `information_schema` at startup.

use crate::sql::builder::quoted;
use crate::sql::Statement;
use crate::store::Row;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnType {
    pub name: String,
    /// Cast target for placeholders, e.g. `"pg_catalog"."timestamptz"`.
    pub cast: String,
    /// Selected as `::text` (numeric, user enums) since the row decoder has no native mapping.
    pub select_as_text: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSchema {
    columns: Vec<ColumnType>,
}

impl TableSchema {
    /// Statement listing `(column_name, udt_schema, udt_name)` for `table` in the current schema.
    pub fn introspect(table: &str) -> Statement {
        Statement::with_params(
            "SELECT column_name::text AS column_name, udt_schema::text AS udt_schema, \
             udt_name::text AS udt_name FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1 \
             ORDER BY ordinal_position",
            vec![Value::String(table.to_string())],
        )
    }

    /// Build from rows returned by [`TableSchema::introspect`]. Rows missing a field are skipped.
    pub fn from_rows(rows: &[Row]) -> Self {
        let columns = rows
            .iter()
            .filter_map(|r| {
                let name = r.get("column_name")?.as_str()?;
                let udt_schema = r.get("udt_schema")?.as_str()?;
                let udt_name = r.get("udt_name")?.as_str()?;
                Some(column_type(name, udt_schema, udt_name))
            })
            .collect();
        TableSchema { columns }
    }

    /// Build from `(column, pg_catalog type)` pairs.
    pub fn from_columns<'a>(cols: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        TableSchema {
            columns: cols
                .into_iter()
                .map(|(name, udt)| column_type(name, "pg_catalog", udt))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnType> {
        self.columns.iter()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn cast_for(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.cast.as_str())
    }
}

fn column_type(name: &str, udt_schema: &str, udt_name: &str) -> ColumnType {
    ColumnType {
        name: name.to_string(),
        cast: format!("{}.{}", quoted(udt_schema), quoted(udt_name)),
        select_as_text: udt_schema != "pg_catalog" || udt_name == "numeric",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn reads_introspection_rows() {
        let rows = vec![
            row(json!({"column_name": "id", "udt_schema": "pg_catalog", "udt_name": "int4"})),
            row(json!({"column_name": "position", "udt_schema": "public", "udt_name": "player_position"})),
            row(json!({"column_name": "broken"})),
        ];
        let schema = TableSchema::from_rows(&rows);
        assert_eq!(schema.columns().count(), 2);
        assert_eq!(schema.cast_for("id"), Some(r#""pg_catalog"."int4""#));
        assert_eq!(schema.cast_for("position"), Some(r#""public"."player_position""#));
        assert!(schema.columns().any(|c| c.name == "position" && c.select_as_text));
        assert!(!schema.has_column("broken"));
    }

    #[test]
    fn introspect_binds_table_name() {
        let q = TableSchema::introspect("players");
        assert_eq!(q.params, vec![json!("players")]);
        assert!(q.sql.contains("information_schema.columns"));
    }
}
