//! Benchmarks for route table construction and dispatch.
//!
//! These benchmarks measure the cost of composing handler chains while
//! routes are registered through nested groups, and the per-request cost
//! of running a chain through the assembled router.

use axum::body::Body;
use axum_groups::{Config, Context, Engine, Handler, Router, Routes, handler};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use http::Request;
use serde_json::json;
use std::hint::black_box;
use tower::ServiceExt;

/// Middleware that passes control to the next handler
fn pass() -> Handler {
    handler(|_: &mut Context| Ok(None))
}

/// Creates a test config with route logging disabled
fn test_config() -> Config {
    "[http]\nlog_routes = false\n"
        .parse()
        .expect("Failed to parse bench config")
}

/// Creates a minimal request for benchmarking
fn test_request(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

/// Benchmark: Registering routes under groups of increasing depth
fn bench_nested_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_registration");

    for depth in 0..=3usize {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let engine = Engine::new(test_config()).unwrap();
                let mut current = engine.group("/", &[]);
                for level in 0..depth {
                    current = current.group(&format!("level{level}"), &[pass()]);
                }
                for route in 0..100 {
                    current.get(&format!("/r{route}"), &[pass()]);
                }
                black_box(engine.routes().len())
            })
        });
    }

    group.finish();
}

/// Benchmark: Dispatching a request through a four-handler chain
fn bench_chain_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut engine = Engine::new(test_config()).unwrap();
    engine.middleware(&[pass()]);
    let mut api = engine.group("/api", &[pass()]);
    api.get("/users/:id", &[pass(), handler(|ctx: &mut Context| {
        Ok(Some(json!({ "id": ctx.param("id") })))
    })]);
    let router = engine.into_router();

    c.bench_function("chain_dispatch", |b| {
        b.to_async(&rt).iter(|| async {
            let response = router
                .clone()
                .oneshot(test_request("/api/users/42"))
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(benches, bench_nested_registration, bench_chain_dispatch);
criterion_main!(benches);
