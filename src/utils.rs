//!
//! Utility functions shared by the configuration and request layers.
//!
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//! - [`RequestIdGenerator`] - Preserves or generates a request ID for correlation
//!

use {
    http::{HeaderValue, Request},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
    tower_http::request_id::{MakeRequestId, RequestId},
    uuid::{ContextV7, Timestamp, Uuid},
};

/// Name of the header carrying the request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Matches `{{ VAR_NAME }}` with optional whitespace around the variable name.
/// Variable names must be uppercase letters, digits, or underscores.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Replaces handlebars-style placeholders with environment variable values.
///
/// Searches the input for patterns like `{{ VAR_NAME }}` and replaces them with
/// the corresponding environment variable value. Missing variables are replaced
/// with an empty string and a warning is logged.
///
/// ```
/// use axum_groups::replace_handlebars_with_env;
///
/// let template = "Value: {{ SURELY_MISSING_VAR }}";
/// assert_eq!(replace_handlebars_with_env(template), "Value: ");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Request ID generator for request correlation.
///
/// Preserves a non-empty `x-request-id` header from the incoming request, or
/// generates a new UUIDv7. UUIDv7 values are time-ordered, so generated IDs sort
/// by arrival time.
///
/// ```
/// use axum_groups::RequestIdGenerator;
/// use tower_http::request_id::SetRequestIdLayer;
///
/// let layer = SetRequestIdLayer::x_request_id(RequestIdGenerator);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, req: &Request<B>) -> Option<RequestId> {
        match req.headers().get(REQUEST_ID_HEADER) {
            Some(value) if !value.is_empty() => Some(RequestId::new(value.clone())),
            _ => {
                let cx = ContextV7::new().with_additional_precision();
                let uuid = Uuid::new_v7(Timestamp::now(cx));
                let value = HeaderValue::from_str(&uuid.to_string()).ok()?;
                Some(RequestId::new(value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_handlebars_with_env_no_variables() {
        let input = "This is a plain string with no variables";
        assert_eq!(replace_handlebars_with_env(input), input);
    }

    #[test]
    fn test_replace_handlebars_with_env_with_variables() {
        unsafe {
            env::set_var("AXUM_GROUPS_TEST_VAR", "test_value");
        }
        let output = replace_handlebars_with_env("port = {{  AXUM_GROUPS_TEST_VAR }}");
        assert_eq!(output, "port = test_value");
        unsafe {
            env::remove_var("AXUM_GROUPS_TEST_VAR");
        }
    }

    #[test]
    fn test_replace_handlebars_ignores_lowercase_names() {
        let input = "{{ lower_case }}";
        assert_eq!(replace_handlebars_with_env(input), input);
    }

    fn request(id: Option<&'static str>) -> Request<()> {
        let mut builder = Request::builder().uri("/");
        if let Some(id) = id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_request_id_preserved_from_header() {
        let id = RequestIdGenerator
            .make_request_id(&request(Some("abc-123")))
            .unwrap();
        assert_eq!(id.header_value(), "abc-123");
    }

    #[test]
    fn test_request_id_generated_as_uuid_v7() {
        for incoming in [None, Some("")] {
            let id = RequestIdGenerator.make_request_id(&request(incoming)).unwrap();
            let uuid = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
            assert_eq!(uuid.get_version_num(), 7);
        }
    }
}
