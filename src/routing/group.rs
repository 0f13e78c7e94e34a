//! Route groups: path prefixes plus inherited middleware chains.
//!
//! A [`RouteGroup`] owns an absolute base path and an ordered handler chain.
//! Registering a route on a group joins the group's base path with the route's
//! relative path, appends the route's handlers to a copy of the group's chain,
//! and forwards the resulting `(method, path, chain)` triple to the group's
//! [`RouteSink`]. Child groups are snapshots: they copy the parent's chain when
//! they are created and never see later changes to it.
//!
//! ```
//! use axum_groups::{Config, Context, Engine, Router, Routes, handler};
//! use serde_json::json;
//!
//! let logger = handler(|_ctx: &mut Context| Ok(None));
//! let list_users = handler(|_ctx: &mut Context| Ok(Some(json!([]))));
//!
//! let mut engine = Engine::new(Config::from_toml("").unwrap()).unwrap();
//! engine.middleware(&[logger]);
//!
//! let mut api = engine.group("/api/v1", &[]);
//! api.get("/users", &[list_users.clone()])
//!     .post("/users", &[list_users]);
//!
//! assert_eq!(engine.routes()[0].path, "/api/v1/users");
//! assert_eq!(engine.routes()[0].handler_count, 2);
//! ```

use {
    super::{Handler, HandlerChain, join_paths, method::ANY_METHODS, validate_method},
    crate::RouteError,
    http::Method,
    std::{fmt, rc::Rc},
};

/// Upper bound on the length of any composed handler chain.
///
/// A chain whose length would reach this value is rejected when a group or a
/// route is created.
pub const MAX_HANDLERS: usize = 5;

/// Receives fully composed routes.
///
/// Implemented by whatever stores routes for request matching, such as the
/// [`RouteTable`](crate::RouteTable) behind an [`Engine`](crate::Engine).
/// Every registration call on a group results in exactly one `add_route` call
/// per method, in registration order.
pub trait RouteSink {
    fn add_route(&self, method: Method, path: String, handlers: HandlerChain);
}

/// The route registration surface shared by engines and groups.
///
/// Every method returns `&mut dyn Routes` so calls can be chained without the
/// caller knowing whether it holds the root or a nested group.
///
/// # Panics
///
/// Registration panics when the composed handler chain would reach
/// [`MAX_HANDLERS`], and [`Routes::handle`] panics on an invalid method name.
/// These are route table bugs and surface while the application starts.
pub trait Routes {
    /// Appends middleware to this group's chain. Only routes and groups created
    /// afterwards inherit it.
    fn middleware(&mut self, middleware: &[Handler]) -> &mut dyn Routes;

    /// Registers a route for an arbitrary method, which must be one or more
    /// uppercase ASCII letters (e.g. `"GET"`, `"PURGE"`).
    fn handle(
        &mut self,
        method: &str,
        relative_path: &str,
        handlers: &[Handler],
    ) -> &mut dyn Routes;

    /// Registers the route for GET, POST, PUT, PATCH, HEAD, OPTIONS, DELETE,
    /// CONNECT and TRACE.
    fn any(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;

    fn get(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;
    fn post(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;
    fn put(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;
    fn patch(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;
    fn delete(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;
    fn options(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;
    fn head(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes;
}

/// [`Routes`] plus the ability to open nested groups.
pub trait Router: Routes {
    /// Creates a child group under `relative_path` whose chain is this group's
    /// chain followed by `handlers`.
    fn group(&self, relative_path: &str, handlers: &[Handler]) -> RouteGroup;
}

/// A path prefix and middleware chain under which routes are declared.
#[derive(Clone)]
pub struct RouteGroup {
    handlers: HandlerChain,
    base_path: String,
    sink: Rc<dyn RouteSink>,
    root: bool,
}

impl RouteGroup {
    /// Creates the root group of `sink`: base path `/` and no middleware.
    pub fn root(sink: Rc<dyn RouteSink>) -> Self {
        Self {
            handlers: HandlerChain::new(),
            base_path: "/".to_string(),
            sink,
            root: true,
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// This group's own chain, without any route handlers.
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    fn register(
        &mut self,
        method: Method,
        relative_path: &str,
        handlers: &[Handler],
    ) -> &mut dyn Routes {
        let absolute_path = self.calculate_absolute_path(relative_path);
        let handlers = self.combine_handlers(handlers).unwrap_or_else(|err| fatal(err));
        self.sink.add_route(method, absolute_path, handlers);
        self
    }

    /// Copies this group's chain followed by `handlers` into new storage.
    pub(crate) fn combine_handlers(
        &self,
        handlers: &[Handler],
    ) -> Result<HandlerChain, RouteError> {
        let final_size = self.handlers.len() + handlers.len();
        if final_size >= MAX_HANDLERS {
            return Err(RouteError::HandlerChainOverflow {
                size: final_size,
                limit: MAX_HANDLERS,
            });
        }

        let mut merged = HandlerChain::with_capacity(final_size);
        merged.extend_from_slice(&self.handlers);
        merged.extend_from_slice(handlers);
        Ok(merged)
    }

    fn calculate_absolute_path(&self, relative_path: &str) -> String {
        join_paths(&self.base_path, relative_path)
    }
}

/// Aborts route table construction.
pub(crate) fn fatal(err: RouteError) -> ! {
    tracing::error!(error = %err, "Invalid route registration");
    panic!("{err}")
}

impl Routes for RouteGroup {
    fn middleware(&mut self, middleware: &[Handler]) -> &mut dyn Routes {
        self.handlers.extend_from_slice(middleware);
        self
    }

    fn handle(
        &mut self,
        method: &str,
        relative_path: &str,
        handlers: &[Handler],
    ) -> &mut dyn Routes {
        let method = validate_method(method).unwrap_or_else(|err| fatal(err));
        self.register(method, relative_path, handlers)
    }

    fn any(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        for method in ANY_METHODS {
            self.register(method, relative_path, handlers);
        }
        self
    }

    fn get(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.register(Method::GET, relative_path, handlers)
    }

    fn post(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.register(Method::POST, relative_path, handlers)
    }

    fn put(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.register(Method::PUT, relative_path, handlers)
    }

    fn patch(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.register(Method::PATCH, relative_path, handlers)
    }

    fn delete(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.register(Method::DELETE, relative_path, handlers)
    }

    fn options(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.register(Method::OPTIONS, relative_path, handlers)
    }

    fn head(&mut self, relative_path: &str, handlers: &[Handler]) -> &mut dyn Routes {
        self.register(Method::HEAD, relative_path, handlers)
    }
}

impl Router for RouteGroup {
    fn group(&self, relative_path: &str, handlers: &[Handler]) -> RouteGroup {
        RouteGroup {
            handlers: self.combine_handlers(handlers).unwrap_or_else(|err| fatal(err)),
            base_path: self.calculate_absolute_path(relative_path),
            sink: Rc::clone(&self.sink),
            root: false,
        }
    }
}

impl fmt::Debug for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGroup")
            .field("base_path", &self.base_path)
            .field("handlers", &self.handlers.len())
            .field("root", &self.root)
            .finish()
    }
}
