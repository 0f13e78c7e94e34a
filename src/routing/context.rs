//! Per-request state handed to every handler in a chain.

use {
    crate::{Error, Result},
    axum::body::Bytes,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    serde::de::DeserializeOwned,
    serde_json::Value,
    std::collections::HashMap,
};

/// The execution context of a single request.
///
/// A context is created once per request and passed by mutable reference to each
/// handler of the matched chain in turn. Middleware can stash values for later
/// handlers with [`Context::set`], adjust the response status and headers, or
/// stop the chain with [`Context::abort`].
///
/// ```
/// use axum_groups::Context;
/// use http::Method;
///
/// let mut ctx = Context::new(Method::GET, "/users/42?verbose=1".parse().unwrap());
/// ctx.set("user", serde_json::json!({"id": 42}));
///
/// assert_eq!(ctx.path(), "/users/42");
/// assert_eq!(ctx.query_string(), Some("verbose=1"));
/// assert_eq!(ctx.get("user").unwrap()["id"], 42);
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    full_path: String,
    params: HashMap<String, String>,
    values: HashMap<String, Value>,
    request_id: Option<String>,
    status: Option<StatusCode>,
    response_headers: HeaderMap,
    aborted: bool,
}

impl Context {
    /// Creates a context for a request without headers or body.
    pub fn new(method: Method, uri: Uri) -> Self {
        let full_path = uri.path().to_string();
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            full_path,
            params: HashMap::new(),
            values: HashMap::new(),
            request_id: None,
            status: None,
            response_headers: HeaderMap::new(),
            aborted: false,
        }
    }

    /// Replaces the request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Records the correlation ID assigned to the request.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Replaces the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Records the route pattern that matched and the captured path parameters.
    pub fn with_route(
        mut self,
        full_path: impl Into<String>,
        params: HashMap<String, String>,
    ) -> Self {
        self.full_path = full_path.into();
        self.params = params;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path, without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The registered route pattern that matched, e.g. `/users/:id`.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the value of a path parameter captured by `:name` or `*name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a request header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserializes the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|err| Error::invalid_input(format!("Invalid JSON body: {err}")))
    }

    /// The request's correlation ID.
    ///
    /// Requests served by an [`Engine`](crate::Engine) always carry one: the
    /// incoming `x-request-id` header, or a generated UUIDv7.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Stores a value for handlers later in the chain.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Adds a header to the eventual response.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.response_headers.insert(name, value);
        Ok(())
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub(crate) fn take_response_headers(&mut self) -> HeaderMap {
        std::mem::take(&mut self.response_headers)
    }

    /// Stops the chain after the current handler returns.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    /// Sets the response status and stops the chain.
    pub fn abort_with_status(&mut self, status: StatusCode) {
        self.status = Some(status);
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde::Deserialize;
    use serde_json::json;

    fn ctx(uri: &str) -> Context {
        Context::new(Method::POST, uri.parse().unwrap())
    }

    #[test]
    fn test_route_params() {
        let params = HashMap::from([("id".to_string(), "42".to_string())]);
        let ctx = ctx("/users/42").with_route("/users/:id", params);
        assert_eq!(ctx.full_path(), "/users/:id");
        assert_eq!(ctx.param("id"), Some("42"));
        assert_eq!(ctx.param("name"), None);
    }

    #[test]
    fn test_json_body() {
        #[derive(Deserialize)]
        struct NewUser {
            name: String,
        }

        let ctx = ctx("/users").with_body(r#"{"name":"ada"}"#);
        let user: NewUser = ctx.json().unwrap();
        assert_eq!(user.name, "ada");
    }

    #[test]
    fn test_invalid_json_body() {
        let ctx = ctx("/users").with_body("not json");
        let err = ctx.json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_request_id_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req-1"));
        let ctx = ctx("/").with_headers(headers);
        assert_eq!(ctx.request_id(), None);
        assert_eq!(ctx.header("x-request-id"), Some("req-1"));

        let ctx = ctx.with_request_id("req-1");
        assert_eq!(ctx.request_id(), Some("req-1"));
    }

    #[test]
    fn test_values_and_abort() {
        let mut ctx = ctx("/");
        ctx.set("role", json!("admin"));
        assert_eq!(ctx.get("role"), Some(&json!("admin")));
        assert!(!ctx.is_aborted());

        ctx.abort_with_status(StatusCode::FORBIDDEN);
        assert!(ctx.is_aborted());
        assert_eq!(ctx.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_set_header_rejects_invalid_name() {
        let mut ctx = ctx("/");
        assert!(ctx.set_header("x-trace", "on").is_ok());
        assert_eq!(ctx.response_headers()["x-trace"], "on");
        assert!(ctx.set_header("bad header", "x").is_err());
    }
}
