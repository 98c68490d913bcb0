//! History log endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{error::AppResult, models::history::HistoryView};

use super::AppPath;

/// Borrow/return log with book titles and member names
#[utoipa::path(
    get,
    path = "/history",
    tag = "history",
    responses(
        (status = 200, description = "History log in insertion order", body = Vec<HistoryView>)
    )
)]
pub async fn list_history(State(state): State<crate::AppState>) -> AppResult<Json<Vec<HistoryView>>> {
    let views = state.services.history.list_views().await?;
    Ok(Json(views))
}

/// Delete the history entry at a position
#[utoipa::path(
    delete,
    path = "/history/{index}",
    tag = "history",
    params(("index" = i64, Path, description = "0-based position in the log")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Index out of range", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_history_entry(
    State(state): State<crate::AppState>,
    AppPath(index): AppPath<i64>,
) -> AppResult<StatusCode> {
    state.services.history.delete_at(index).await?;
    Ok(StatusCode::NO_CONTENT)
}
