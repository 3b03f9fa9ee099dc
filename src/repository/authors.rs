//! Authors collection on PostgreSQL

use async_trait::async_trait;
use uuid::Uuid;

use super::{PgStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDraft, AuthorFilter},
};

#[async_trait]
impl Store<Author> for PgStore {
    async fn find(&self, filter: &AuthorFilter) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, family_name, date_of_birth, date_of_death
            FROM authors
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
            ORDER BY LOWER(family_name) COLLATE "C", family_name COLLATE "C",
                     LOWER(first_name) COLLATE "C", first_name COLLATE "C", id
            "#,
        )
        .bind(&filter.ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_of_birth, date_of_death FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    async fn count(&self, filter: &AuthorFilter) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM authors WHERE ($1::uuid[] IS NULL OR id = ANY($1))",
        )
        .bind(&filter.ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn create(&self, draft: AuthorDraft) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.first_name)
        .bind(&draft.family_name)
        .bind(draft.date_of_birth)
        .bind(draft.date_of_death)
        .fetch_one(&self.pool)
        .await?;

        Ok(author)
    }

    async fn update_by_id(&self, id: Uuid, draft: AuthorDraft) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET
                first_name = $1,
                family_name = $2,
                date_of_birth = $3,
                date_of_death = $4
            WHERE id = $5
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            "#,
        )
        .bind(&draft.first_name)
        .bind(&draft.family_name)
        .bind(draft.date_of_birth)
        .bind(draft.date_of_death)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        Ok(())
    }
}
