#![allow(dead_code)]

//! In-memory stores for tests. `MemoryStore` executes exactly the statement shapes the
//! builder produces, resolving `$n` placeholders against the argument list.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use football_stats::{AppError, Row, Statement, Store};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tower::ServiceExt;

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, BTreeMap<i64, Row>>>,
    next_id: AtomicU64,
    clock: AtomicU64,
    log: Mutex<Vec<Statement>>,
}

impl MemoryStore {
    pub fn statements(&self) -> Vec<Statement> {
        self.log.lock().unwrap().clone()
    }

    pub fn statement_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    fn now(&self) -> Value {
        let t = self.clock.fetch_add(1, Ordering::SeqCst);
        json!(format!("2026-01-01T00:00:{:02}Z", t % 60))
    }

    fn execute(&self, q: &Statement) -> Result<Vec<Row>, String> {
        let sql = q.sql.as_str();
        if sql.contains("information_schema") {
            return Ok(Vec::new());
        }
        if sql == "SELECT 1" {
            return Ok(vec![obj(json!({"?column?": 1}))]);
        }
        let mut tables = self.tables.lock().unwrap();
        if let Some(rest) = sql.strip_prefix("SELECT * FROM ") {
            let table = tables.entry(first_ident(rest)?).or_default();
            if sql.ends_with("ORDER BY \"id\" DESC") {
                return Ok(table.values().rev().cloned().collect());
            }
            let id = id_param(q, 1)?;
            return Ok(table.get(&id).cloned().into_iter().collect());
        }
        if let Some(rest) = sql.strip_prefix("INSERT INTO ") {
            let table = tables.entry(first_ident(rest)?).or_default();
            let open = rest.find('(').ok_or("no column list")?;
            let close = rest.find(')').ok_or("no column list")?;
            let cols: Vec<String> = rest[open + 1..close]
                .split(", ")
                .map(|c| c.trim_matches('"').to_string())
                .collect();
            if cols.len() != q.params.len() {
                return Err("column/argument count mismatch".into());
            }
            let mut row = Row::new();
            for (col, val) in cols.into_iter().zip(q.params.iter()) {
                row.insert(col, val.clone());
            }
            let id = match row.get("id").and_then(Value::as_i64) {
                Some(id) => id,
                None => self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1,
            };
            if table.contains_key(&id) {
                return Err(format!("duplicate key value violates unique constraint: id={}", id));
            }
            let mut stored = Row::new();
            stored.insert("id".into(), json!(id));
            for (k, v) in row {
                stored.insert(k, v);
            }
            let now = self.now();
            stored.insert("created_at".into(), now.clone());
            stored.insert("updated_at".into(), now);
            table.insert(id, stored.clone());
            return Ok(vec![stored]);
        }
        if let Some(rest) = sql.strip_prefix("UPDATE ") {
            let table = tables.entry(first_ident(rest)?).or_default();
            let set_start = rest.find(" SET ").ok_or("no SET")? + 5;
            let set_end = rest.find(" WHERE ").ok_or("no WHERE")?;
            let where_clause = &rest[set_end + 7..];
            let id_n = placeholder_num(where_clause.split(" RETURNING").next().unwrap_or(""))?;
            let id = id_param(q, id_n)?;
            let Some(existing) = table.get(&id).cloned() else {
                return Ok(Vec::new());
            };
            let mut updated = existing;
            for assignment in rest[set_start..set_end].split(", ") {
                let (col, rhs) = assignment.split_once(" = ").ok_or("bad assignment")?;
                let col = col.trim_matches('"').to_string();
                let val = if rhs == "CURRENT_TIMESTAMP" {
                    self.now()
                } else {
                    let n = placeholder_num(rhs)?;
                    q.params.get(n - 1).cloned().ok_or("placeholder out of range")?
                };
                updated.insert(col, val);
            }
            table.insert(id, updated.clone());
            return Ok(vec![updated]);
        }
        if let Some(rest) = sql.strip_prefix("DELETE FROM ") {
            let table = tables.entry(first_ident(rest)?).or_default();
            let id = id_param(q, 1)?;
            return Ok(table.remove(&id).into_iter().collect());
        }
        Err(format!("unsupported statement: {}", sql))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, AppError> {
        self.log.lock().unwrap().push(statement.clone());
        self.execute(statement)
            .map_err(|e| AppError::Db(sqlx::Error::Protocol(e)))
    }
}

/// Every statement fails as if the database were unreachable.
#[derive(Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn query(&self, _statement: &Statement) -> Result<Vec<Row>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
}

pub fn obj(v: Value) -> Row {
    match v {
        Value::Object(m) => m,
        other => panic!("expected object, got {}", other),
    }
}

fn first_ident(s: &str) -> Result<String, String> {
    let start = s.find('"').ok_or("no identifier")? + 1;
    let len = s[start..].find('"').ok_or("unterminated identifier")?;
    Ok(s[start..start + len].to_string())
}

/// Number of the first `$n` placeholder in `s`.
fn placeholder_num(s: &str) -> Result<usize, String> {
    let start = s.find('$').ok_or("no placeholder")? + 1;
    let digits: String = s[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().map_err(|_| format!("bad placeholder in {}", s))
}

fn id_param(q: &Statement, n: usize) -> Result<i64, String> {
    q.params
        .get(n - 1)
        .and_then(Value::as_i64)
        .ok_or_else(|| "id parameter missing".to_string())
}

/// Send one request through the router; returns the status and the body as JSON
/// (non-JSON bodies come back as a JSON string).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, req).await
}

pub async fn send_request(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
