//! Route groups and the handler contract.
//!
//! - [`group`] - `RouteGroup`, the `Routes`/`Router` traits and the `RouteSink` seam
//! - [`path`] - Path joining and normalization
//! - [`method`] - HTTP method validation
//! - [`handler`] - Handler types and chain execution
//! - [`context`] - Per-request `Context`

mod context;
mod group;
mod handler;
mod method;
mod path;

pub(crate) use group::fatal;

pub use context::Context;
pub use group::{MAX_HANDLERS, RouteGroup, RouteSink, Router, Routes};
pub use handler::{Handler, HandlerChain, HandlerResult, handler, run_chain};
pub use method::{ANY_METHODS, validate_method};
pub use path::{clean_path, join_paths};
