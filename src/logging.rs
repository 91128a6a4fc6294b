//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::Error;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the request or response body is longer than [LOG_BODY_LENGTH_LIMIT]
/// characters, it is truncated and the full body is logged at the `debug` level.
///
/// Cookie headers are redacted since the session cookie grants access to a
/// session's transactions.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_SIZE_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return Error::InvalidRequestBody("could not read request body".to_owned())
                .into_response();
        }
    };

    log_message(
        "Received request",
        &format!("{} {}", parts.method, parts.uri),
        &parts.headers,
        &String::from_utf8_lossy(&body_bytes),
    );

    // The handler must see the original bytes so it can reject invalid UTF-8.
    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_message(
        "Sending response",
        parts.status.as_str(),
        &parts.headers,
        &String::from_utf8_lossy(&body_bytes),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

/// The largest request body, in bytes, that will be read. Matches axum's
/// default body limit.
const REQUEST_BODY_SIZE_LIMIT: usize = 2 * 1024 * 1024;

/// The number of characters of a body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

fn redact_cookies(headers: &HeaderMap) -> HeaderMap {
    let mut redacted = headers.clone();

    for name in [COOKIE, SET_COOKIE] {
        let count = redacted.get_all(&name).iter().count();
        if count == 0 {
            continue;
        }

        redacted.remove(&name);
        for _ in 0..count {
            redacted.append(&name, HeaderValue::from_static(REDACTED));
        }
    }

    redacted
}

fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_message(direction: &str, summary: &str, headers: &HeaderMap, body: &str) {
    let headers = redact_cookies(headers);

    match truncate(body) {
        Some(truncated) => {
            tracing::info!("{direction}: {summary}\nheaders: {headers:#?}\nbody: {truncated:}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{direction}: {summary}\nheaders: {headers:#?}\nbody: {body:?}"),
    }
}
