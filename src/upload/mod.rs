use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::state::AppState;

pub mod handlers;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload/", post(handlers::upload).delete(handlers::remove))
        // a little headroom over the 5MB file limit for multipart framing
        .layer(DefaultBodyLimit::max(services::MAX_UPLOAD_BYTES + 1024 * 1024))
}
