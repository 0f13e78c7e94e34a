//! In-memory route table filled by route groups.

use {
    crate::{HandlerChain, RouteError, RouteSink, routing::fatal},
    http::Method,
    std::cell::RefCell,
};

/// A registered route: method, absolute path and full handler chain.
#[derive(Clone)]
pub(crate) struct Route {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) handlers: HandlerChain,
}

/// Summary of a registered route, as returned by [`Engine::routes`](crate::Engine::routes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    pub path: String,
    pub handler_count: usize,
}

/// Stores routes in registration order.
///
/// Registering the same method and path twice is a route table bug and panics.
#[derive(Default)]
pub struct RouteTable {
    routes: RefCell<Vec<Route>>,
    log_routes: bool,
}

impl RouteTable {
    pub fn new(log_routes: bool) -> Self {
        Self {
            routes: RefCell::new(Vec::new()),
            log_routes,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.borrow().is_empty()
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes
            .borrow()
            .iter()
            .map(|route| RouteInfo {
                method: route.method.clone(),
                path: route.path.clone(),
                handler_count: route.handlers.len(),
            })
            .collect()
    }

    pub(crate) fn snapshot(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }
}

impl RouteSink for RouteTable {
    fn add_route(&self, method: Method, path: String, handlers: HandlerChain) {
        let duplicate = self
            .routes
            .borrow()
            .iter()
            .any(|route| route.method == method && route.path == path);
        if duplicate {
            fatal(RouteError::DuplicateRoute { method, path });
        }

        if self.log_routes {
            tracing::debug!(
                method = %method,
                path = %path,
                handlers = handlers.len(),
                "Route registered"
            );
        }

        self.routes.borrow_mut().push(Route {
            method,
            path,
            handlers,
        });
    }
}
