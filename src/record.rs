//! Validated column → value payload for insert and update statements.

use crate::error::AppError;
use crate::sql::TableSchema;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Primary key column; supplied by the path on update.
pub const ID_COLUMN: &str = "id";
/// Timestamp column overwritten on every update.
pub const UPDATED_AT_COLUMN: &str = "updated_at";

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"))
}

/// True when `s` can be used as an unqualified column or table name.
pub fn is_identifier(s: &str) -> bool {
    identifier_re().is_match(s)
}

/// Ordered mapping from column name to scalar value. Never empty.
///
/// Column order in generated SQL follows the insertion order of the source object.
#[derive(Clone, Debug, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Build from a parsed JSON body. Must be a non-empty object of scalars keyed by identifiers.
    pub fn from_json(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(AppError::BadRequest("body must be a JSON object".into())),
        }
    }

    /// Build from a typed input struct. `None` fields must be skipped with
    /// `#[serde(skip_serializing_if = "Option::is_none")]` to express a partial update.
    pub fn from_serialize<T: Serialize>(input: &T) -> Result<Self, AppError> {
        let value = serde_json::to_value(input)
            .map_err(|e| AppError::BadRequest(format!("unserializable record: {}", e)))?;
        Self::from_json(value)
    }

    fn from_map(map: Map<String, Value>) -> Result<Self, AppError> {
        if map.is_empty() {
            return Err(AppError::BadRequest("body must contain at least one column".into()));
        }
        for (col, val) in &map {
            if !is_identifier(col) {
                return Err(AppError::BadRequest(format!("invalid column name '{}'", col)));
            }
            if val.is_array() || val.is_object() {
                return Err(AppError::BadRequest(format!("{} must be a scalar value", col)));
            }
        }
        Ok(Record(map))
    }

    /// Reject columns this layer sets itself on update.
    pub fn for_update(self) -> Result<Self, AppError> {
        for reserved in [ID_COLUMN, UPDATED_AT_COLUMN] {
            if self.0.contains_key(reserved) {
                return Err(AppError::BadRequest(format!("{} cannot be updated", reserved)));
            }
        }
        Ok(self)
    }

    /// Reject columns the table does not have.
    pub fn check_columns(&self, schema: &TableSchema) -> Result<(), AppError> {
        match self.0.keys().find(|k| !schema.has_column(k)) {
            Some(unknown) => Err(AppError::BadRequest(format!("unknown column '{}'", unknown))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<Value> for Record {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Record::from_json(value)
    }
}
