use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

pub use dto::PaymentMethod;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/transactions/",
        get(handlers::list)
            .post(handlers::create)
            .put(handlers::update)
            .delete(handlers::remove),
    )
}
