//! Defines functions for reading and writing the session cookie.

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use time::Duration;

use crate::{Error, session::SessionId};

/// The name of the cookie that holds the session ID.
pub const COOKIE_SESSION_ID: &str = "sessionId";
/// The default duration for which a newly issued session cookie is valid.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::days(7);

/// Add a session cookie holding `session_id` to the cookie jar.
///
/// The cookie applies to every path and the client should keep it for
/// `duration`. You can use [DEFAULT_SESSION_DURATION] for the default duration.
///
/// The cookie value is the plain session ID, it is neither signed nor
/// encrypted.
pub fn set_session_cookie(jar: CookieJar, session_id: SessionId, duration: Duration) -> CookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION_ID, session_id.to_string()))
            .path("/")
            .max_age(duration)
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Get the session ID from the session cookie in `jar`.
///
/// # Errors
///
/// Returns [Error::MissingSession] if the cookie is missing or its value is
/// not a valid session ID.
pub fn get_session_id_from_cookies(jar: &CookieJar) -> Result<SessionId, Error> {
    let cookie = jar.get(COOKIE_SESSION_ID).ok_or(Error::MissingSession)?;

    cookie.value_trimmed().parse().map_err(|error| {
        tracing::debug!("ignoring session cookie with an invalid session ID: {error}");
        Error::MissingSession
    })
}
