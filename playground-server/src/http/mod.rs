//! HTTP surface: router, handlers, bodies and error mapping.

mod error;
mod payload;
mod routes;

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use error::ApiError;
pub use payload::{MessageValue, RenderedPicture, ResponseReply, StartReply};

/// Builds the API router. When `rendered_dir` is set, its files are served under
/// `/rendered` (the local object store's public prefix).
pub fn build_router(state: AppState, rendered_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/", get(routes::index))
        .route("/conversation/start", post(routes::start_conversation))
        .route("/conversation/:code/message/send", post(routes::send_message))
        .route(
            "/conversation/:code/message/response/:response_type",
            post(routes::collect_response),
        )
        .route(
            "/conversation/:code/picture/:picture_code/",
            get(routes::render_picture),
        )
        .route(
            "/conversation/:code/picture/:picture_code",
            get(routes::render_picture),
        )
        .route(
            "/conversation/:code/picture/:picture_code/:area",
            post(routes::add_to_picture),
        );

    let router = match rendered_dir {
        Some(dir) => router.nest_service("/rendered", ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
