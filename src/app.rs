use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/structure", get(handlers::get_structure))
        .route("/api/events", get(handlers::list_events))
        .route("/api/events/:id", post(handlers::select_snapshot))
        .with_state(state)
}
