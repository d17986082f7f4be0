use axum::routing::{delete, get, post, put};
use axum::response::{IntoResponse, Response};
use axum::Router;
use bytes::Bytes;

pub mod list;
pub mod protection_status;
pub mod public_content;
pub mod remove;
pub mod serve;
pub mod update_password;
pub mod upload;
pub mod verify_password;
pub mod view;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(upload::handler).get(list::handler))
        .route("/:id", delete(remove::handler))
        .route("/:id/protection-status", get(protection_status::handler))
        .route("/:id/password", put(update_password::handler))
        .route("/:id/verify-password", post(verify_password::handler))
        .route("/:id/content", get(serve::handler).post(view::handler))
        .route("/:id/public-content", get(public_content::handler))
        .with_state(state)
}

/// Build a binary response for authorized image content.
///
/// Authorization has already happened; this only attaches the content
/// type guessed from the stored filename and a cache policy.
pub(crate) fn content_response(filename: &str, bytes: Bytes, cache_control: &str) -> Response {
    let mime_type = mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string();

    (
        http::StatusCode::OK,
        [
            (axum::http::header::CONTENT_TYPE, mime_type),
            (
                axum::http::header::CACHE_CONTROL,
                cache_control.to_string(),
            ),
        ],
        bytes,
    )
        .into_response()
}
