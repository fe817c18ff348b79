//! Response helpers. Rows are returned bare, without an envelope.

use crate::store::Row;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
    pub item: Row,
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn deleted(item: Row) -> (StatusCode, Json<Deleted>) {
    (
        StatusCode::OK,
        Json(Deleted {
            message: "Deleted",
            item,
        }),
    )
}

pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}
