//! User account model and related types

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Entity;

/// Full user model from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Validated account fields. The hash is produced by the account service,
/// never copied from request input.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive exact email match
    pub email: Option<String>,
}

impl UserFilter {
    pub fn by_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
        }
    }
}

impl Entity for User {
    type Draft = UserDraft;
    type Filter = UserFilter;

    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: UserDraft) -> Self {
        Self {
            id,
            email: draft.email,
            name: draft.name,
            password_hash: draft.password_hash,
        }
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter
            .email
            .as_ref()
            .map_or(true, |email| self.email.to_lowercase() == email.to_lowercase())
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        self.email
            .cmp(&other.email)
            .then_with(|| self.id.cmp(&other.id))
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.to_lowercase())
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must be specified"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
