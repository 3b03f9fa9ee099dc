//! Book instance endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{book_instance::BookInstanceView, BookInstance},
    services::integrity::{DeleteConfirmation, DeleteOutcome},
    validation::FormInput,
    AppState,
};

/// Book instance form fields
#[derive(ToSchema)]
pub struct BookInstanceForm {
    /// Book ID
    pub book: String,
    pub imprint: String,
    /// ISO-8601 date
    pub due_back: Option<String>,
    /// Available, Maintenance, Loaned or Reserved (default Maintenance)
    pub status: Option<String>,
}

/// List all copies with their book resolved
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "book_instances",
    responses(
        (status = 200, description = "Copies ordered by imprint", body = Vec<BookInstanceView>)
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookInstanceView>>> {
    let instances = state.services.book_instances.list().await?;
    Ok(Json(instances))
}

/// Get a copy with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstances/{id}",
    tag = "book_instances",
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Book instance details", body = BookInstanceView),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstanceView>> {
    let instance = state.services.book_instances.get(id).await?;
    Ok(Json(instance))
}

/// Create a copy of a book
#[utoipa::path(
    post,
    path = "/catalog/bookinstances",
    tag = "book_instances",
    request_body = BookInstanceForm,
    responses(
        (status = 201, description = "Book instance created", body = BookInstance),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    let created = state.services.book_instances.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a copy; omitted fields keep their stored value
#[utoipa::path(
    put,
    path = "/catalog/bookinstances/{id}",
    tag = "book_instances",
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body = BookInstanceForm,
    responses(
        (status = 200, description = "Book instance updated", body = BookInstance),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FormInput>,
) -> AppResult<Json<BookInstance>> {
    let updated = state.services.book_instances.update(id, input).await?;
    Ok(Json(updated))
}

/// Show a copy before deleting it
#[utoipa::path(
    get,
    path = "/catalog/bookinstances/{id}/delete",
    tag = "book_instances",
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = DeleteConfirmation<BookInstanceView>),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteConfirmation<BookInstanceView>>> {
    let confirmation = state.services.book_instances.confirm_delete(id).await?;
    Ok(Json(confirmation))
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstances/{id}/delete",
    tag = "book_instances",
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Copy deleted or already absent", body = DeleteOutcome)
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.services.book_instances.commit_delete(id).await?;
    Ok(Json(outcome))
}
