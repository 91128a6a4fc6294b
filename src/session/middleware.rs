//! Session middleware that rejects requests without an established session.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::session::get_session_id_from_cookies;

/// Middleware function that checks for a valid session cookie.
///
/// The session ID is placed into the request and the request executed normally if the cookie is
/// valid, otherwise a `401 Unauthorized` response is returned and the route handler never runs.
///
/// **Note**: Route handlers can use the function argument `Extension(session_id): Extension<SessionId>` to receive the session ID.
pub async fn session_guard(jar: CookieJar, mut request: Request, next: Next) -> Response {
    let session_id = match get_session_id_from_cookies(&jar) {
        Ok(session_id) => session_id,
        Err(error) => {
            tracing::debug!(
                "Rejecting request to {} without a session: {error}",
                request.uri().path()
            );
            return error.into_response();
        }
    };

    request.extensions_mut().insert(session_id);
    next.run(request).await
}
