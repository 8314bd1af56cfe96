mod dto;
pub mod handlers;
pub mod registrations;
pub mod repo;
pub mod repo_types;
pub mod services;

use axum::{middleware, Router};

use crate::{auth::middleware::require_auth, state::AppState};

/// Public reads plus token-gated writes on the same paths. The gate pulls its
/// `JwtKeys` out of `state`.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new().merge(handlers::read_routes()).merge(
        handlers::write_routes().route_layer(middleware::from_fn_with_state(state, require_auth)),
    )
}
