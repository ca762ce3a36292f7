#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use freelance_portal::domain::Fixtures;
use freelance_portal::handlers::AppState;
use freelance_portal::routes;

pub const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/portal.json");

/// Router over a fresh memory store seeded from the bundled fixtures.
pub fn app() -> Result<Router> {
    let store = Fixtures::load(FIXTURES)?.into_store()?;
    Ok(routes::app(AppState::new(store)))
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let payload = serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?;
    Ok((status, payload))
}

pub async fn get(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    send(app, Request::get(uri).body(Body::empty())?).await
}

/// `id` of every item in a page envelope, in response order.
pub fn ids(payload: &Value) -> Vec<i64> {
    payload["data"]["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}

pub fn sorted(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids
}
