//! Book endpoints

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
        book::{BookDetail, BookView},
        Book,
    },
    services::integrity::{DeleteConfirmation, DeleteOutcome},
    validation::FormInput,
    AppState,
};

/// Book form fields
#[derive(ToSchema)]
pub struct BookForm {
    pub title: String,
    /// Author ID
    pub author: String,
    pub summary: String,
    pub isbn: String,
    /// Genre IDs; a single value is accepted too
    pub genre: Option<Vec<String>>,
}

/// List all books with author and genres resolved
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "Books ordered by title", body = Vec<BookView>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookView>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get a book with its copies
#[utoipa::path(
    get,
    path = "/catalog/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/catalog/books",
    tag = "books",
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book; omitted fields keep their stored value
#[utoipa::path(
    put,
    path = "/catalog/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FormInput>,
) -> AppResult<Json<Book>> {
    let updated = state.services.books.update(id, input).await?;
    Ok(Json(updated))
}

/// Show a book and the copies blocking its deletion
#[utoipa::path(
    get,
    path = "/catalog/books/{id}/delete",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = DeleteConfirmation<BookView>),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm_delete_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteConfirmation<BookView>>> {
    let confirmation = state.services.books.confirm_delete(id).await?;
    Ok(Json(confirmation))
}

/// Delete a book that has no copies
#[utoipa::path(
    post,
    path = "/catalog/books/{id}/delete",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted or already absent", body = DeleteOutcome),
        (status = 409, description = "Book still has copies", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.services.books.commit_delete(id).await?;
    Ok(Json(outcome))
}
