use axum::routing::post;
use axum::Router;

pub mod accounts;
pub mod resources;
pub mod sessions;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/sessions", post(sessions::handler))
        .route("/accounts", post(accounts::handler))
        .nest("/resources", resources::router(state.clone()))
        .with_state(state)
}
