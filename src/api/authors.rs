//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{AuthorDetail, AuthorView},
        Author,
    },
    services::integrity::{DeleteConfirmation, DeleteOutcome},
    validation::FormInput,
    AppState,
};

/// Author form fields
#[derive(ToSchema)]
pub struct AuthorForm {
    pub first_name: String,
    pub family_name: String,
    /// ISO-8601 date
    pub date_of_birth: Option<String>,
    /// ISO-8601 date
    pub date_of_death: Option<String>,
}

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Authors ordered by family name", body = Vec<AuthorView>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorView>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get an author with their books
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}",
    tag = "authors",
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/authors",
    tag = "authors",
    request_body = AuthorForm,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let created = state.services.authors.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an author; omitted fields keep their stored value
#[utoipa::path(
    put,
    path = "/catalog/authors/{id}",
    tag = "authors",
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    request_body = AuthorForm,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FormInput>,
) -> AppResult<Json<Author>> {
    let updated = state.services.authors.update(id, input).await?;
    Ok(Json(updated))
}

/// Show an author and the books blocking its deletion
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}/delete",
    tag = "authors",
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = DeleteConfirmation<AuthorView>),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteConfirmation<AuthorView>>> {
    let confirmation = state.services.authors.confirm_delete(id).await?;
    Ok(Json(confirmation))
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/authors/{id}/delete",
    tag = "authors",
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author deleted or already absent", body = DeleteOutcome),
        (status = 409, description = "Author still has books", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.services.authors.commit_delete(id).await?;
    Ok(Json(outcome))
}
