//! Genre endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{genre::GenreDetail, Genre},
    services::integrity::{DeleteConfirmation, DeleteOutcome},
    validation::FormInput,
    AppState,
};

/// Genre form fields
#[derive(ToSchema)]
pub struct GenreForm {
    pub name: String,
}

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genres ordered by name", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.genres.list().await?;
    Ok(Json(genres))
}

/// Get a genre with the books filed under it
#[utoipa::path(
    get,
    path = "/catalog/genres/{id}",
    tag = "genres",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre details", body = GenreDetail),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<GenreDetail>> {
    let genre = state.services.genres.get(id).await?;
    Ok(Json(genre))
}

/// Create a genre; an existing genre with the same name is returned instead
#[utoipa::path(
    post,
    path = "/catalog/genres",
    tag = "genres",
    request_body = GenreForm,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 200, description = "Genre already exists", body = Genre),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let (genre, created) = state.services.genres.create(input).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(genre)))
}

/// Rename a genre
#[utoipa::path(
    put,
    path = "/catalog/genres/{id}",
    tag = "genres",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    request_body = GenreForm,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FormInput>,
) -> AppResult<Json<Genre>> {
    let updated = state.services.genres.update(id, input).await?;
    Ok(Json(updated))
}

/// Show a genre and the books blocking its deletion
#[utoipa::path(
    get,
    path = "/catalog/genres/{id}/delete",
    tag = "genres",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = DeleteConfirmation<Genre>),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteConfirmation<Genre>>> {
    let confirmation = state.services.genres.confirm_delete(id).await?;
    Ok(Json(confirmation))
}

/// Delete a genre that no book lists
#[utoipa::path(
    post,
    path = "/catalog/genres/{id}/delete",
    tag = "genres",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre deleted or already absent", body = DeleteOutcome),
        (status = 409, description = "Genre still listed by books", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.services.genres.commit_delete(id).await?;
    Ok(Json(outcome))
}
