use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/dns-query",
            get(handlers::get_dns_query).post(handlers::post_dns_query),
        )
        .route("/resolve", get(handlers::resolve_json))
        .with_state(state)
}
