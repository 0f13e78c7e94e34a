//! Integration tests for route groups through the public API.
//!
//! ## Test Coverage
//!
//! - `test_custom_sink_receives_composed_routes`: A sink outside the crate sees absolute paths
//!   and full chains
//! - `test_group_chain_is_a_snapshot`: Parent middleware added later does not reach existing
//!   children
//! - `test_any_forwards_nine_routes`: `any` forwards one route per standard method, in order
//! - `test_overflowing_group_panics`: Group creation enforces the handler limit
//! - `test_versioned_api_end_to_end`: Nested groups served through the engine and `oneshot`

use axum::body::Body;
use axum_groups::{
    ANY_METHODS, Context, Engine, Handler, HandlerChain, MAX_HANDLERS, RouteGroup, RouteSink,
    Router, Routes, handler,
};
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use std::{cell::RefCell, rc::Rc, sync::Arc};
use tower::ServiceExt;

/// Records every forwarded route as `(method, path, chain)`.
#[derive(Default)]
struct RecordingSink {
    routes: RefCell<Vec<(Method, String, HandlerChain)>>,
}

impl RouteSink for RecordingSink {
    fn add_route(&self, method: Method, path: String, handlers: HandlerChain) {
        self.routes.borrow_mut().push((method, path, handlers));
    }
}

fn noop() -> Handler {
    handler(|_: &mut Context| Ok(None))
}

#[test]
fn test_custom_sink_receives_composed_routes() {
    let sink = Rc::new(RecordingSink::default());
    let mut root = RouteGroup::root(sink.clone());

    let auth = noop();
    let show = noop();
    root.middleware(&[auth.clone()]);
    let mut users = root.group("/users", &[]);
    users.get(":id", &[show.clone()]);

    let routes = sink.routes.borrow();
    assert_eq!(routes.len(), 1);
    let (method, path, chain) = &routes[0];
    assert_eq!(*method, Method::GET);
    assert_eq!(path, "/users/:id");
    assert_eq!(chain.len(), 2);
    assert!(Arc::ptr_eq(&chain[0], &auth));
    assert!(Arc::ptr_eq(&chain[1], &show));
}

#[test]
fn test_group_chain_is_a_snapshot() {
    let sink = Rc::new(RecordingSink::default());
    let mut root = RouteGroup::root(sink.clone());

    let mut child = root.group("/child", &[noop()]);
    root.middleware(&[noop(), noop()]);
    child.post("/", &[noop()]);

    assert_eq!(child.handlers().len(), 1);
    let routes = sink.routes.borrow();
    assert_eq!(routes[0].1, "/child/");
    assert_eq!(routes[0].2.len(), 2);
}

#[test]
fn test_any_forwards_nine_routes() {
    let sink = Rc::new(RecordingSink::default());
    let mut root = RouteGroup::root(sink.clone());
    root.any("/echo", &[noop()]);

    let methods: Vec<Method> = sink.routes.borrow().iter().map(|r| r.0.clone()).collect();
    assert_eq!(methods, ANY_METHODS.to_vec());
}

#[test]
#[should_panic(expected = "too many handlers")]
fn test_overflowing_group_panics() {
    let sink = Rc::new(RecordingSink::default());
    let root = RouteGroup::root(sink);
    let handlers: Vec<Handler> = (0..MAX_HANDLERS).map(|_| noop()).collect();
    let _ = root.group("/full", &handlers);
}

#[tokio::test]
async fn test_versioned_api_end_to_end() {
    let config = "[http]\nbind_port = 0\n".parse().unwrap();
    let engine = Engine::new(config).unwrap();

    let tag_version = |version: &'static str| {
        handler(move |ctx: &mut Context| {
            ctx.set("version", json!(version));
            Ok(None)
        })
    };
    let show_user = handler(|ctx: &mut Context| {
        Ok(Some(json!({
            "version": ctx.get("version"),
            "id": ctx.param("id"),
        })))
    });

    let api = engine.group("/api", &[]);
    api.group("/v1", &[tag_version("v1")])
        .get("/users/:id", &[show_user.clone()]);
    api.group("/v2", &[tag_version("v2")])
        .get("/users/:id", &[show_user]);

    let router = engine.into_router();
    for (uri, expected) in [
        ("/api/v1/users/1", json!({"version": "v1", "id": "1"})),
        ("/api/v2/users/2", json!({"version": "v2", "id": "2"})),
    ] {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, expected);
    }
}
