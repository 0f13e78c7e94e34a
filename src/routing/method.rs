//! HTTP method validation.

use {
    crate::RouteError,
    http::Method,
    regex::Regex,
    std::sync::LazyLock,
};

/// Methods registered by [`Routes::any`](crate::Routes::any), in registration order.
pub const ANY_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::HEAD,
    Method::OPTIONS,
    Method::DELETE,
    Method::CONNECT,
    Method::TRACE,
];

/// One or more uppercase ASCII letters.
static METHOD_REGEXP: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[A-Z]+$").unwrap());

/// Checks that `method` is one or more uppercase ASCII letters and converts it.
///
/// Standard methods map onto their `http::Method` constants; anything else that
/// passes (e.g. `PURGE`) becomes an extension method.
///
/// ```
/// use axum_groups::validate_method;
///
/// assert!(validate_method("PURGE").is_ok());
/// assert!(validate_method("get").is_err());
/// ```
pub fn validate_method(method: &str) -> Result<Method, RouteError> {
    let invalid = || RouteError::InvalidMethod {
        method: method.to_string(),
    };

    if !METHOD_REGEXP.is_match(method) {
        return Err(invalid());
    }
    Method::from_bytes(method.as_bytes()).map_err(|_| invalid())
}
