//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, dashboard, genres, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "1.0.0",
        description = "Lending library catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Accounts
        users::register,
        users::login,
        users::profile,
        // Catalog
        dashboard::summary,
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::confirm_delete_author,
        authors::delete_author,
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::confirm_delete_book,
        books::delete_book,
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::confirm_delete_genre,
        genres::delete_genre,
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance,
        book_instances::update_book_instance,
        book_instances::confirm_delete_book_instance,
        book_instances::delete_book_instance,
    ),
    components(
        schemas(
            // Accounts
            users::RegistrationForm,
            crate::models::user::User,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            // Catalog
            crate::models::DashboardSummary,
            crate::models::EntityKind,
            authors::AuthorForm,
            crate::models::author::Author,
            crate::models::author::AuthorView,
            crate::models::author::AuthorDetail,
            books::BookForm,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookView,
            crate::models::book::BookDetail,
            genres::GenreForm,
            crate::models::genre::Genre,
            crate::models::genre::GenreDetail,
            book_instances::BookInstanceForm,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceView,
            crate::models::book_instance::LoanStatus,
            // Deletion
            crate::services::integrity::DeleteCheck,
            crate::services::integrity::DeleteOutcome,
            // Health
            health::HealthResponse,
            // Errors
            crate::validation::FieldError,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Account registration and profile"),
        (name = "catalog", description = "Catalog home page"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management"),
        (name = "genres", description = "Genre management"),
        (name = "book_instances", description = "Book copy management")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
