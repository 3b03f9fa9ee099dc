//! User accounts on PostgreSQL

use async_trait::async_trait;
use uuid::Uuid;

use super::{PgStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{User, UserDraft, UserFilter},
};

#[async_trait]
impl Store<User> for PgStore {
    async fn find(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash FROM users
            WHERE ($1::text IS NULL OR LOWER(email) = LOWER($1))
            ORDER BY email, id
            "#,
        )
        .bind(&filter.email)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT id, email, name, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn count(&self, filter: &UserFilter) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR LOWER(email) = LOWER($1))",
        )
        .bind(&filter.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn create(&self, draft: UserDraft) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.email)
        .bind(&draft.name)
        .bind(&draft.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_by_id(&self, id: Uuid, draft: UserDraft) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET email = $1, name = $2, password_hash = $3
            WHERE id = $4
            RETURNING id, email, name, password_hash
            "#,
        )
        .bind(&draft.email)
        .bind(&draft.name)
        .bind(&draft.password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
