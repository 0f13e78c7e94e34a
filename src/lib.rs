//! # axum-groups
//!
//! Hierarchical route groups for building an Axum route table.
//!
//! A route group carries a base path and a list of middleware. Nested groups
//! extend both, and every route registered through a group is handed to the
//! engine with the group's absolute path and the full handler chain: the
//! middleware of every enclosing group followed by the route's own handlers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum_groups::{Config, Context, Engine, Result, Router, Routes, handler};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();  // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     let mut engine = Engine::new(config)?;
//!     engine.get("/", &[handler(|_: &mut Context| Ok(Some(json!("Hello, World!"))))]);
//!
//!     let mut v1 = engine.group("/api/v1", &[]);
//!     v1.get("/users/:id", &[handler(|ctx: &mut Context| {
//!         Ok(Some(json!({ "id": ctx.param("id") })))
//!     })]);
//!
//!     engine.start().await
//! }
//! ```
//!
//! With `config/dev.toml`:
//! ```toml
//! [http]
//! bind_port = 3000
//! max_payload_size_bytes = "1MiB"
//! ```
//!
//! Run with `RUST_ENV=dev cargo run`.
//!
//! # Route Groups
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`Routes::middleware`] | Appends middleware for routes registered afterwards |
//! | [`Router::group`] | Creates a child group with a joined path and combined middleware |
//! | [`Routes::handle`] | Registers a route for any uppercase method, e.g. `PURGE` |
//! | [`Routes::get`] and friends | Shortcuts for the standard methods |
//! | [`Routes::any`] | Registers a route for the nine standard methods |
//!
//! A group copies its parent's middleware when it is created, so middleware
//! added to the parent later does not reach existing children. A handler chain
//! must stay below [`MAX_HANDLERS`] handlers. Exceeding it, registering an
//! invalid method or registering the same method and path twice are programming
//! errors and panic while the route table is being built.
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type. Errors returned by handlers convert
//! to structured JSON responses:
//!
//! ```json
//! {
//!   "error_code": "INVALID_INPUT",
//!   "message": "name is required"
//! }
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `routing` | Route groups, handlers and the request [`Context`] |
//! | `engine` | Route table and server ([`Engine`]) |
//! | `error` | Error types and handling ([`Error`], [`RouteError`]) |
//! | `utils` | Utilities ([`replace_handlebars_with_env`]) |
mod config;
mod engine;
mod error;
mod routing;
mod utils;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use routing::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
