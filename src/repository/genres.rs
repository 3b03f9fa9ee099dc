//! Genres collection on PostgreSQL

use async_trait::async_trait;
use uuid::Uuid;

use super::{PgStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreDraft, GenreFilter},
};

#[async_trait]
impl Store<Genre> for PgStore {
    async fn find(&self, filter: &GenreFilter) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name FROM genres
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::text IS NULL OR LOWER(name) = LOWER($2))
            ORDER BY LOWER(name) COLLATE "C", name COLLATE "C", id
            "#,
        )
        .bind(&filter.ids)
        .bind(&filter.name)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre with id {} not found", id)))
    }

    async fn count(&self, filter: &GenreFilter) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM genres
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::text IS NULL OR LOWER(name) = LOWER($2))
            "#,
        )
        .bind(&filter.ids)
        .bind(&filter.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn create(&self, draft: GenreDraft) -> AppResult<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(genre)
    }

    async fn update_by_id(&self, id: Uuid, draft: GenreDraft) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("UPDATE genres SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(&draft.name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre with id {} not found", id)))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Genre with id {} not found", id)));
        }
        Ok(())
    }
}
