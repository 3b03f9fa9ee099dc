//! Catalog home page

use axum::{extract::State, Json};

use crate::{error::AppResult, models::DashboardSummary, AppState};

/// Counts of books, copies, available copies, genres and authors
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog totals", body = DashboardSummary),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<DashboardSummary>> {
    let summary = state.services.dashboard.summary().await?;
    Ok(Json(summary))
}
