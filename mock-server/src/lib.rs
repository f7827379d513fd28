//! Fixture API for exercising connectors over real HTTP.
//!
//! Everything lives under `/api/v1`:
//! - `product/get`, `product/createOrUpdate`, `product/delete`: a small
//!   in-memory product store keyed by merchant
//! - `echo`: answers any method with what it received
//! - `text`: a non-JSON body
//! - `status/{code}`: a JSON body with the given status
//! - `slow`: answers after [`SLOW_DELAY`]
//! - `cookies`: sets two cookies
//! - `large`: a JSON document of [`LARGE_BLOB_LEN`] bytes of payload

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{AppendHeaders, IntoResponse},
    routing::{any, delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SLOW_DELAY: Duration = Duration::from_millis(1500);
/// Past the 10 MiB default body cap of common HTTP clients.
pub const LARGE_BLOB_LEN: usize = 11 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub merchant_id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProduct {
    pub id: Option<String>,
    pub merchant_id: String,
    pub name: String,
}

pub type Db = Arc<RwLock<HashMap<String, Product>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/v1/product/get", get(get_products))
        .route("/api/v1/product/createOrUpdate", post(create_or_update))
        .route("/api/v1/product/delete", delete(delete_products))
        .route("/api/v1/echo", any(echo))
        .route("/api/v1/text", get(text))
        .route("/api/v1/status/{code}", any(status))
        .route("/api/v1/slow", get(slow))
        .route("/api/v1/cookies", get(cookies))
        .route("/api/v1/large", get(large))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_products(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Product>> {
    let merchants: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "merchantId")
        .map(|(_, v)| v.as_str())
        .collect();
    let products = db.read().await;
    let mut found: Vec<Product> = products
        .values()
        .filter(|p| merchants.is_empty() || merchants.contains(&p.merchant_id.as_str()))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    Json(found)
}

async fn create_or_update(
    State(db): State<Db>,
    Json(input): Json<UpsertProduct>,
) -> (StatusCode, Json<Product>) {
    let mut products = db.write().await;
    let (status, id) = match input.id {
        Some(id) if products.contains_key(&id) => (StatusCode::OK, id),
        Some(id) => (StatusCode::CREATED, id),
        None => (StatusCode::CREATED, Uuid::new_v4().to_string()),
    };
    let product = Product {
        id: id.clone(),
        merchant_id: input.merchant_id,
        name: input.name,
    };
    products.insert(id, product.clone());
    (status, Json(product))
}

async fn delete_products(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let mut products = db.write().await;
    let deleted = params
        .iter()
        .filter(|(k, _)| k == "id")
        .filter(|(_, id)| products.remove(id).is_some())
        .count();
    Json(json!({ "deleted": deleted }))
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": headers,
        "body": body,
    }))
}

async fn text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "oops")
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(json!({ "error": status.canonical_reason(), "code": code }))))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(json!({ "slow": true }))
}

async fn cookies() -> impl IntoResponse {
    (
        AppendHeaders([
            (header::SET_COOKIE, "session=abc123; Path=/api; HttpOnly"),
            (header::SET_COOKIE, "theme=dark"),
        ]),
        Json(json!({ "ok": true })),
    )
}

async fn large() -> impl IntoResponse {
    let body = format!(r#"{{"blob":"{}"}}"#, "x".repeat(LARGE_BLOB_LEN));
    ([(header::CONTENT_TYPE, "application/json")], body)
}
