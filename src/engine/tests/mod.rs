//! Test helpers and utilities for Engine tests
//!
//! These tests use `oneshot()` against the router produced by
//! `Engine::into_router()` for fast, in-process testing without network I/O.
//!
//! ## Available Helpers
//!
//! - Configuration builders: `create_base_config()`
//! - Engine builders: `create_test_engine()`
//! - Handlers: `respond()`, `record()`, `noop()`
//! - Request helpers: `request()`, `request_with_body()`
//! - Response helpers: `get_body_json()`

use crate::{Config, Context, Engine, Handler, handler};
use axum::{body::Body, http::Request, response::Response};
use serde_json::{Value, json};


// ============================================================================
// Configuration Helpers
// ============================================================================

/// Base TOML configuration template for tests.
const BASE_CONFIG_TOML: &str = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
max_payload_size_bytes = "1KiB"
trace_requests = false
log_routes = true

[logging]
format = "json"
"#;

/// Creates a base test configuration by parsing TOML.
pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse test config TOML")
}

/// Creates an engine from the base test configuration.
pub(crate) fn create_test_engine() -> Engine {
    Engine::new(create_base_config()).expect("Failed to create Engine")
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler that ends the chain with `value`.
pub(crate) fn respond(value: Value) -> Handler {
    handler(move |_: &mut Context| Ok(Some(value.clone())))
}

/// Middleware that appends `name` to the `trail` value of the context.
pub(crate) fn record(name: &'static str) -> Handler {
    handler(move |ctx: &mut Context| {
        let mut trail = ctx.get("trail").cloned().unwrap_or_else(|| json!([]));
        if let Some(entries) = trail.as_array_mut() {
            entries.push(json!(name));
        }
        ctx.set("trail", trail);
        Ok(None)
    })
}

/// Handler that returns the `trail` recorded by earlier middleware.
pub(crate) fn trail() -> Handler {
    handler(|ctx: &mut Context| Ok(Some(ctx.get("trail").cloned().unwrap_or(json!([])))))
}

pub(crate) fn noop() -> Handler {
    handler(|_: &mut Context| Ok(None))
}

// ============================================================================
// Request / Response Helpers
// ============================================================================

pub(crate) fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn request_with_body(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub(crate) async fn get_body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
