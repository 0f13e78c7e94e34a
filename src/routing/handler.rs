//! Handler contract and chain execution.

use {
    super::Context,
    crate::Result,
    axum::{
        Json,
        response::{IntoResponse, Response},
    },
    http::StatusCode,
    serde_json::Value,
    std::sync::Arc,
};

/// What a handler produces: a value that ends the chain, nothing (continue), or an error.
pub type HandlerResult = Result<Option<Value>>;

/// A request handler or middleware.
///
/// Handlers are opaque to the route groups: they are only ordered, copied into
/// chains and handed to the engine. Use [`handler`] to build one from a closure.
pub type Handler = Arc<dyn Fn(&mut Context) -> HandlerResult + Send + Sync>;

/// An ordered sequence of handlers; middleware first, the endpoint last.
pub type HandlerChain = Vec<Handler>;

/// Wraps a function or closure into a [`Handler`].
///
/// ```
/// use axum_groups::{Context, handler};
/// use serde_json::json;
///
/// let ping = handler(|_ctx: &mut Context| Ok(Some(json!("pong"))));
/// let auth = handler(|ctx: &mut Context| {
///     if ctx.header("authorization").is_none() {
///         ctx.abort_with_status(http::StatusCode::UNAUTHORIZED);
///     }
///     Ok(None)
/// });
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Runs `chain` against `ctx` and renders the outcome.
///
/// Handlers run in order until one of them returns an error, returns a value or
/// aborts the context. A value is rendered as JSON with the context status
/// (200 when unset). A chain that ends without a value answers with the context
/// status, or 204 No Content. Response headers set on the context are applied in
/// every case except errors.
pub fn run_chain(chain: &[Handler], ctx: &mut Context) -> Response {
    let mut value = None;
    for handler in chain {
        match handler(ctx) {
            Err(err) => return err.into_response(),
            Ok(Some(produced)) => {
                value = Some(produced);
                break;
            }
            Ok(None) if ctx.is_aborted() => break,
            Ok(None) => {}
        }
    }

    let mut response = match value {
        Some(value) => (ctx.status().unwrap_or(StatusCode::OK), Json(value)).into_response(),
        None => ctx.status().unwrap_or(StatusCode::NO_CONTENT).into_response(),
    };
    response.headers_mut().extend(ctx.take_response_headers());
    response
}
