//! Account registration, credential checks and token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        user::{LoginResponse, UserClaims},
        User, UserDraft, UserFilter,
    },
    repository::Repository,
    validation::{forms::REGISTRATION_FORM, FieldError, FormInput},
};

/// Verified against when the email is unknown, so both paths cost one hash
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("no such account").ok());

/// Result of a credential check
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(User),
    /// Unknown email or wrong password; callers cannot tell which
    NoMatch,
}

/// Hash a password with Argon2 and a fresh random salt
pub fn hash_password(plaintext: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash
pub fn verify_password(plaintext: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}

fn email_in_use(form: FormInput) -> AppError {
    AppError::ValidationFailed(REGISTRATION_FORM.failure(
        vec![FieldError::new("email", "Email is already in use.")],
        form,
    ))
}

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    config: AuthConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Validate the registration form, hash the password and store the account
    pub async fn register(&self, input: FormInput) -> AppResult<User> {
        let form = REGISTRATION_FORM
            .run(input)
            .map_err(AppError::ValidationFailed)?;

        let taken = self
            .repository
            .users
            .count(&UserFilter::by_email(form.text("email")))
            .await?;
        if taken > 0 {
            return Err(email_in_use(form));
        }

        let password_hash = hash_password(form.text("password"))?;
        let draft = UserDraft {
            email: form.text("email").to_string(),
            name: form.text("name").to_string(),
            password_hash,
        };
        // The count above can race a concurrent registration; the store has the final say.
        let user = match self.repository.users.create(draft).await {
            Err(AppError::Duplicate(_)) => return Err(email_in_use(form)),
            result => result?,
        };

        tracing::info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Check credentials. Store failures during lookup surface as `AuthFailure`.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let user = self
            .repository
            .users
            .find(&UserFilter::by_email(email.trim()))
            .await
            .map_err(|e| AppError::AuthFailure(e.to_string()))?
            .into_iter()
            .next();

        match user {
            Some(user) => {
                if verify_password(password, &user.password_hash)? {
                    Ok(AuthOutcome::Authenticated(user))
                } else {
                    Ok(AuthOutcome::NoMatch)
                }
            }
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    let _ = verify_password(password, dummy);
                }
                Ok(AuthOutcome::NoMatch)
            }
        }
    }

    /// Authenticate and issue a bearer token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        match self.authenticate(email, password).await? {
            AuthOutcome::Authenticated(user) => {
                let token = self.issue_token(&user)?;
                tracing::info!("User {} logged in", user.id);
                Ok(LoginResponse {
                    token,
                    token_type: "Bearer".to_string(),
                    expires_in: self.config.jwt_expiration_hours as i64 * 3600,
                    user,
                })
            }
            AuthOutcome::NoMatch => {
                tracing::debug!("Login rejected for {}", email);
                Err(AppError::Authentication("Invalid email or password".to_string()))
            }
        }
    }

    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.id,
            email: user.email.clone(),
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.repository.users.find_by_id(user_id).await
    }
}
