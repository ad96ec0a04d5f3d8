use axum::{routing::post, Router};

use crate::state::AppState;

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod token;

pub fn router() -> Router<AppState> {
    // Single endpoint multiplexed on ?action=login|register|logout|verify,
    // matching the client's existing API contract.
    Router::new().route("/auth/", post(handlers::dispatch))
}
