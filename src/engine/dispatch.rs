//! Serves the route table through an `axum::Router`.
//!
//! Route patterns use the `:name` / `*name` syntax. Each distinct pattern becomes
//! one axum route that accepts every method and dispatches on the method itself,
//! which keeps extension methods such as `PURGE` routable.

use {
    super::table::Route,
    crate::{Context, Error, HandlerChain, RequestIdGenerator, run_chain},
    axum::{
        body::Bytes,
        extract::{
            DefaultBodyLimit, FromRequest, FromRequestParts, Path, Request,
            rejection::PathRejection,
        },
        response::{IntoResponse, Response},
        routing::any,
    },
    http::{HeaderValue, Method, StatusCode, Uri, header},
    std::{collections::HashMap, sync::Arc},
    tower::ServiceBuilder,
    tower_http::{
        limit::RequestBodyLimitLayer,
        request_id::{PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
        trace::TraceLayer,
    },
};

/// All routes sharing one pattern.
pub(crate) struct Endpoint {
    pattern: String,
    methods: Vec<(Method, HandlerChain)>,
}

impl Endpoint {
    fn chain_for(&self, method: &Method) -> Option<&HandlerChain> {
        self.methods
            .iter()
            .find(|(registered, _)| registered == method)
            .map(|(_, chain)| chain)
    }

    fn allowed_methods(&self) -> String {
        self.methods
            .iter()
            .map(|(method, _)| method.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Groups routes by pattern, keeping first-registration order.
pub(crate) fn endpoints(routes: Vec<Route>) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for route in routes {
        match index.get(&route.path) {
            Some(&position) => endpoints[position]
                .methods
                .push((route.method, route.handlers)),
            None => {
                index.insert(route.path.clone(), endpoints.len());
                endpoints.push(Endpoint {
                    pattern: route.path,
                    methods: vec![(route.method, route.handlers)],
                });
            }
        }
    }
    endpoints
}

/// Builds the axum router for a set of endpoints.
///
/// Request bodies above `max_payload_size` bytes are rejected with 413, and every
/// request carries an `x-request-id` that is echoed on the response.
///
/// Axum rejects overlapping captures (e.g. `/users/:id` next to `/users/:name`)
/// by panicking, which happens here rather than while serving.
pub(crate) fn build_router(
    endpoints: Vec<Endpoint>,
    max_payload_size: usize,
    trace_requests: bool,
) -> axum::Router {
    let mut router = axum::Router::new();
    for endpoint in endpoints {
        let axum_path = to_axum_path(&endpoint.pattern);
        let endpoint = Arc::new(endpoint);
        router = router.route(
            &axum_path,
            any(move |request: Request| dispatch(Arc::clone(&endpoint), request)),
        );
    }

    let router = router
        .fallback(not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_payload_size))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    if trace_requests {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

async fn dispatch(endpoint: Arc<Endpoint>, request: Request) -> Response {
    if endpoint.chain_for(request.method()).is_none() {
        let mut response = Error::method_not_allowed(format!(
            "{} is not allowed for {}",
            request.method(),
            endpoint.pattern
        ))
        .into_response();
        if let Ok(allow) = HeaderValue::from_str(&endpoint.allowed_methods()) {
            response.headers_mut().insert(header::ALLOW, allow);
        }
        return response;
    }

    let (mut parts, body) = request.into_parts();
    let params = Path::<HashMap<String, String>>::from_request_parts(&mut parts, &()).await;
    let params = match params {
        Ok(Path(params)) => params,
        Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
        Err(rejection) => return Error::invalid_input(rejection.body_text()).into_response(),
    };
    let request_id = parts
        .extensions
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_owned);

    let mut ctx = Context::new(parts.method.clone(), parts.uri.clone())
        .with_headers(parts.headers.clone())
        .with_route(endpoint.pattern.clone(), params);
    if let Some(request_id) = request_id {
        ctx = ctx.with_request_id(request_id);
    }

    let body = match Bytes::from_request(Request::from_parts(parts, body), &()).await {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Error::payload_too_large(rejection.body_text()).into_response();
        }
        Err(rejection) => return Error::invalid_input(rejection.body_text()).into_response(),
    };
    let mut ctx = ctx.with_body(body);

    match endpoint.chain_for(ctx.method()) {
        Some(chain) => run_chain(chain, &mut ctx),
        None => Error::internal("route disappeared during dispatch").into_response(),
    }
}

async fn not_found(uri: Uri) -> Error {
    Error::not_found(format!("No route matches {}", uri.path()))
}

/// Rewrites `:name` and `*name` segments into axum's `{name}` / `{*name}` captures.
pub(crate) fn to_axum_path(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{*{name}}}")
            } else {
                segment.replace('{', "{{").replace('}', "}}")
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
