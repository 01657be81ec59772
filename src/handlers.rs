use crate::errors::AppError;
use crate::models::{BindingInfo, DirectoryStructure, SelectRequest, Table};
use crate::state::AppState;
use crate::ui::BindingId;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    response::Html,
};
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<Bytes> {
    Html(state.page.clone())
}

pub async fn get_structure(State(state): State<AppState>) -> Json<DirectoryStructure> {
    Json(state.structure.as_ref().clone())
}

pub async fn list_events(State(state): State<AppState>) -> Json<Vec<BindingInfo>> {
    Json(state.bindings.describe())
}

/// Selector change event. Loads from the binding's own directory, so the
/// client only ever names the snapshot.
pub async fn select_snapshot(
    State(state): State<AppState>,
    Path(id): Path<BindingId>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<Table>, AppError> {
    let binding = state
        .bindings
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("no selector bound to id {id}")))?;
    debug!(
        id,
        category = binding.category(),
        sub_category = binding.sub_category(),
        identifier = %payload.identifier,
        "selector changed"
    );

    let loader = state.loader.clone();
    let table = tokio::task::spawn_blocking(move || binding.handle(&loader, &payload.identifier))
        .await
        .map_err(AppError::internal)?;
    Ok(Json(table))
}
