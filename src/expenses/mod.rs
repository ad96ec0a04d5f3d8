use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/expenses/",
        get(handlers::list)
            .post(handlers::create)
            .put(handlers::update)
            .delete(handlers::remove),
    )
}
