//! Anonymous sessions: minting session IDs, the session cookie and the guard
//! for routes that need an established session.

mod cookie;
mod id;
mod middleware;

pub use cookie::{
    COOKIE_SESSION_ID, DEFAULT_SESSION_DURATION, get_session_id_from_cookies, set_session_cookie,
};
pub use id::SessionId;
pub use middleware::session_guard;
