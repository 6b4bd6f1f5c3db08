//! HTTP response utilities.
//!
//! Shared builders for the handler's small set of responses.

use bytes::Bytes;
use http::header::{ALLOW, CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::Full;

pub type HttpResponse = Response<Full<Bytes>>;

/// Empty-bodied response with the given status.
#[must_use]
pub fn empty(status: StatusCode) -> HttpResponse {
    with_body(status, HeaderMap::new(), None, Bytes::new())
}

/// JSON response carrying the collaborator-provided headers (e.g. `Set-Cookie`).
#[must_use]
pub fn json(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> HttpResponse {
    with_body(
        status,
        headers,
        Some(HeaderValue::from_static("application/json")),
        Bytes::from(body),
    )
}

/// Plain-text response.
#[must_use]
pub fn text(status: StatusCode, body: String) -> HttpResponse {
    with_body(
        status,
        HeaderMap::new(),
        Some(HeaderValue::from_static("text/plain; charset=utf-8")),
        Bytes::from(body),
    )
}

/// Empty response carrying the collaborator-provided headers.
#[must_use]
pub fn with_headers(status: StatusCode, headers: HeaderMap) -> HttpResponse {
    with_body(status, headers, None, Bytes::new())
}

/// 405 listing the methods the login endpoint accepts.
#[must_use]
pub fn method_not_allowed() -> HttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(ALLOW, HeaderValue::from_static("POST, DELETE"));
    with_body(StatusCode::METHOD_NOT_ALLOWED, headers, None, Bytes::new())
}

fn with_body(
    status: StatusCode,
    headers: HeaderMap,
    content_type: Option<HeaderValue>,
    body: Bytes,
) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;

    let out = response.headers_mut();
    out.extend(headers);
    if let Some(content_type) = content_type {
        out.insert(CONTENT_TYPE, content_type);
    }
    out.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
    );

    response
}
