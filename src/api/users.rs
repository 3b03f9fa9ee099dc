//! Account endpoints: registration, login and profile

use axum::{extract::State, http::StatusCode, Json};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginRequest, LoginResponse, User},
    validation::FormInput,
    AppState,
};

use super::AuthenticatedUser;

/// Registration form fields
#[derive(ToSchema)]
pub struct RegistrationForm {
    pub email: String,
    pub name: String,
    /// At least 4 characters
    pub password: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegistrationForm,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 422, description = "Validation failed or email in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.services.accounts.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let response = state
        .services
        .accounts
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile of the logged-in user", body = User),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.accounts.profile(claims.sub).await?;
    Ok(Json(user))
}
