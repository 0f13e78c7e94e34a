//! The engine: owner of the route table and the root route group.
//!
//! - [`table`] - `RouteTable`, the `RouteSink` every group forwards to
//! - [`dispatch`] - Translation of the route table into an `axum::Router`
//! - [`shutdown`] - Signal handling for graceful shutdown

mod dispatch;
mod shutdown;
mod table;

pub use table::{RouteInfo, RouteTable};

use {
    crate::{Config, Handler, Result, RouteGroup, Router, Routes},
    shutdown::shutdown_signal,
    std::{fmt, future::Future, rc::Rc, time::Duration},
    tokio::net::TcpListener,
    tokio_util::sync::CancellationToken,
};

/// Owns the route table and exposes the root group's registration surface.
///
/// The engine itself implements [`Routes`] and [`Router`], so routes and groups
/// can be declared on it exactly as on any nested group. Once the table is
/// complete, [`Engine::into_router`] produces an `axum::Router` and
/// [`Engine::start`] serves it.
///
/// Route table construction is single threaded: the engine and its groups share
/// the table through `Rc` and are not `Send`. The router and the serving future
/// are.
///
/// ```rust,no_run
/// use axum_groups::{Config, Context, Engine, Result, Router, Routes, handler};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let config = Config::default();
///     config.setup_tracing();
///
///     let mut engine = Engine::new(config)?;
///     engine.get("/ping", &[handler(|_: &mut Context| Ok(Some(json!("pong"))))]);
///
///     let mut admin = engine.group("/admin", &[handler(|ctx: &mut Context| {
///         if ctx.header("authorization").is_none() {
///             ctx.abort_with_status(http::StatusCode::UNAUTHORIZED);
///         }
///         Ok(None)
///     })]);
///     admin.delete("/cache", &[handler(|_: &mut Context| Ok(None))]);
///
///     engine.start().await
/// }
/// ```
pub struct Engine {
    config: Config,
    table: Rc<RouteTable>,
    root: RouteGroup,
    shutdown: CancellationToken,
}

impl Engine {
    /// Creates an engine with an empty route table after validating `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let table = Rc::new(RouteTable::new(config.http.log_routes));
        let root = RouteGroup::root(table.clone());
        Ok(Self {
            config,
            table,
            root,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The root group: base path `/`, holding the engine-wide middleware.
    pub fn root(&self) -> &RouteGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut RouteGroup {
        &mut self.root
    }

    /// Lists the registered routes in registration order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.routes()
    }

    /// Returns a token that is cancelled when the server begins shutting down.
    ///
    /// Cancelling it yourself triggers a graceful shutdown of [`Engine::start`].
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Builds an `axum::Router` serving every route registered so far.
    ///
    /// Requests without a matching path get 404, requests for a known path with
    /// an unregistered method get 405 and an `Allow` header. Routes registered
    /// through groups that outlive the engine are not picked up afterwards.
    pub fn into_router(self) -> axum::Router {
        let endpoints = dispatch::endpoints(self.table.snapshot());
        tracing::info!(
            routes = self.table.len(),
            paths = endpoints.len(),
            "Route table assembled"
        );
        dispatch::build_router(
            endpoints,
            self.config.http.max_payload_size(),
            self.config.http.trace_requests,
        )
    }

    /// Binds the configured address and serves until a shutdown signal.
    pub fn start(self) -> impl Future<Output = Result<()>> + Send + 'static {
        let bind_addr = self.config.http.full_bind_addr();
        let serve = self.into_router_with_shutdown();
        async move {
            let listener = TcpListener::bind(&bind_addr).await?;
            tracing::info!("Bound to {}", &bind_addr);
            serve.run(listener).await
        }
    }

    /// Serves on an already bound listener until a shutdown signal.
    pub fn start_with_listener(
        self,
        listener: TcpListener,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let serve = self.into_router_with_shutdown();
        serve.run(listener)
    }

    fn into_router_with_shutdown(self) -> Serve {
        let shutdown_timeout = self.config.http.shutdown_timeout;
        let token = self.shutdown.clone();
        Serve {
            router: self.into_router(),
            token,
            shutdown_timeout,
        }
    }
}

/// Everything the serving loop needs, detached from the `!Send` engine.
struct Serve {
    router: axum::Router,
    token: CancellationToken,
    shutdown_timeout: Duration,
}

impl Serve {
    async fn run(self, listener: TcpListener) -> Result<()> {
        tracing::info!("Waiting for connections");

        let token = self.token;
        let serve_future = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(token.clone()));

        // The timeout only starts once shutdown has begun.
        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                token.cancelled().await;
                tokio::time::sleep(self.shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }
}

impl Routes for Engine {
    fn middleware(&mut self, middleware: &[Handler]) -> &mut dyn Routes {
        self.root.middleware(middleware)
    }

    fn handle(
        &mut self,
        method: &str,
        relative_path: &str,
        handlers: &[Handler],
    ) -> &mut dyn Routes {
        self.root.handle(method, relative_path, handlers)
    }

    fn any(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.any(relative_path, handlers)
    }

    fn get(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.get(relative_path, handlers)
    }

    fn post(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.post(relative_path, handlers)
    }

    fn put(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.put(relative_path, handlers)
    }

    fn patch(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.patch(relative_path, handlers)
    }

    fn delete(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.delete(relative_path, handlers)
    }

    fn options(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.options(relative_path, handlers)
    }

    fn head(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.root.head(relative_path, handlers)
    }
}

impl Router for Engine {
    fn group(&self, relative_path: &str, handlers: &[Handler]) -> RouteGroup {
        self.root.group(relative_path, handlers)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("bind_addr", &self.config.http.full_bind_addr())
            .field("routes", &self.table.len())
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests;
