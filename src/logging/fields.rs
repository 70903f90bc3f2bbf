//! Field extraction helpers for the request header line

use axum::http::{HeaderMap, HeaderName, Uri};

/// Read a caller-supplied request ID from `headers`.
///
/// Empty, whitespace-only, and non-UTF-8 values count as absent.
///
/// # Examples
///
/// ```
/// use axum::http::{HeaderMap, HeaderName, HeaderValue};
/// use wide_event::logging::header_request_id;
///
/// let name = HeaderName::from_static("x-request-id");
/// let mut headers = HeaderMap::new();
/// assert_eq!(header_request_id(&headers, &name), None);
///
/// headers.insert(name.clone(), HeaderValue::from_static("abc-123"));
/// assert_eq!(header_request_id(&headers, &name), Some("abc-123".to_string()));
/// ```
pub fn header_request_id(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Path component of the request URI, without the query string.
pub fn request_path(uri: &Uri) -> String {
    uri.path().to_string()
}
