//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState, Error, endpoints,
    session::session_guard,
    transaction::{
        create_transaction_endpoint, get_summary_endpoint, get_transaction_endpoint,
        get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    // Creating a transaction is the only way to get a session, so it cannot require one.
    let unprotected_routes =
        Router::new().route(endpoints::TRANSACTIONS, post(create_transaction_endpoint));

    let protected_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::TRANSACTIONS_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint))
        .route_layer(middleware::from_fn(session_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
