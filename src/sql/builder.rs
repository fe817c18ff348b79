//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for one table.
//!
//! Placeholders are positional: `$n` always refers to `params[n - 1]`. Record values are
//! pushed in the record's column order and the row id, when present, is pushed last.

use crate::record::{Record, ID_COLUMN, UPDATED_AT_COLUMN};
use crate::sql::TableSchema;
use serde_json::Value;

/// Quote identifier for PostgreSQL.
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// SQL text plus its positional arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn new() -> Self {
        Statement {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Statement without arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Statement {
            sql: sql.into(),
            params,
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// `$n`, cast to the column's type when the table schema is known.
fn placeholder(n: usize, column: &str, schema: Option<&TableSchema>) -> String {
    match schema.and_then(|s| s.cast_for(column)) {
        Some(t) => format!("${}::{}", n, t),
        None => format!("${}", n),
    }
}

/// `*`, or the explicit column list with text casts for types JSON cannot carry natively.
fn select_list(schema: Option<&TableSchema>) -> String {
    match schema {
        Some(s) if !s.is_empty() => s
            .columns()
            .map(|c| {
                let q = quoted(&c.name);
                if c.select_as_text {
                    format!("{}::text AS {}", q, q)
                } else {
                    q
                }
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => "*".to_string(),
    }
}

/// Every row, newest id first.
pub fn select_all(table: &str, schema: Option<&TableSchema>) -> Statement {
    let mut q = Statement::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} DESC",
        select_list(schema),
        quoted(table),
        quoted(ID_COLUMN)
    );
    q
}

pub fn select_by_id(table: &str, id: i64, schema: Option<&TableSchema>) -> Statement {
    let mut q = Statement::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_list(schema),
        quoted(table),
        quoted(ID_COLUMN),
        placeholder(n, ID_COLUMN, schema)
    );
    q
}

/// INSERT every record column in order, returning the stored row.
pub fn insert(table: &str, record: &Record, schema: Option<&TableSchema>) -> Statement {
    let mut q = Statement::new();
    let mut cols = Vec::with_capacity(record.len());
    let mut placeholders = Vec::with_capacity(record.len());
    for (col, val) in record.iter() {
        let n = q.push_param(val.clone());
        cols.push(quoted(col));
        placeholders.push(placeholder(n, col, schema));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table),
        cols.join(", "),
        placeholders.join(", "),
        select_list(schema)
    );
    q
}

/// UPDATE by id: one assignment per record column, then `updated_at`; id is the last argument.
pub fn update(table: &str, id: i64, record: &Record, schema: Option<&TableSchema>) -> Statement {
    let mut q = Statement::new();
    let mut sets = Vec::with_capacity(record.len() + 1);
    for (col, val) in record.iter() {
        let n = q.push_param(val.clone());
        sets.push(format!("{} = {}", quoted(col), placeholder(n, col, schema)));
    }
    sets.push(format!("{} = CURRENT_TIMESTAMP", quoted(UPDATED_AT_COLUMN)));
    let id_param = q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(table),
        sets.join(", "),
        quoted(ID_COLUMN),
        placeholder(id_param, ID_COLUMN, schema),
        select_list(schema)
    );
    q
}

/// DELETE by id, returning the removed row.
pub fn delete(table: &str, id: i64, schema: Option<&TableSchema>) -> Statement {
    let mut q = Statement::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        quoted(table),
        quoted(ID_COLUMN),
        placeholder(n, ID_COLUMN, schema),
        select_list(schema)
    );
    q
}
