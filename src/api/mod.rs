//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod dashboard;
pub mod genres;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::get,
    routing::post,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Accounts
        .route("/auth/login", post(users::login))
        .route("/users", post(users::register))
        .route("/users/profile", get(users::profile))
        // Catalog
        .route("/catalog", get(dashboard::summary))
        .route("/catalog/authors", get(authors::list_authors).post(authors::create_author))
        .route("/catalog/authors/:id", get(authors::get_author).put(authors::update_author))
        .route(
            "/catalog/authors/:id/delete",
            get(authors::confirm_delete_author).post(authors::delete_author),
        )
        .route("/catalog/books", get(books::list_books).post(books::create_book))
        .route("/catalog/books/:id", get(books::get_book).put(books::update_book))
        .route(
            "/catalog/books/:id/delete",
            get(books::confirm_delete_book).post(books::delete_book),
        )
        .route("/catalog/genres", get(genres::list_genres).post(genres::create_genre))
        .route("/catalog/genres/:id", get(genres::get_genre).put(genres::update_genre))
        .route(
            "/catalog/genres/:id/delete",
            get(genres::confirm_delete_genre).post(genres::delete_genre),
        )
        .route(
            "/catalog/bookinstances",
            get(book_instances::list_book_instances).post(book_instances::create_book_instance),
        )
        .route(
            "/catalog/bookinstances/:id",
            get(book_instances::get_book_instance).put(book_instances::update_book_instance),
        )
        .route(
            "/catalog/bookinstances/:id/delete",
            get(book_instances::confirm_delete_book_instance)
                .post(book_instances::delete_book_instance),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
