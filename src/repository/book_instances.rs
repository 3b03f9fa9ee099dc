//! Book instances collection on PostgreSQL

use async_trait::async_trait;
use uuid::Uuid;

use super::{PgStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceDraft, BookInstanceFilter},
};

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::uuid[] IS NULL OR id = ANY($1))
      AND ($2::uuid IS NULL OR book_id = $2)
      AND ($3::text IS NULL OR status = $3)
"#;

#[async_trait]
impl Store<BookInstance> for PgStore {
    async fn find(&self, filter: &BookInstanceFilter) -> AppResult<Vec<BookInstance>> {
        let query = format!(
            r#"
            SELECT id, book_id, imprint, due_back, status FROM book_instances {}
            ORDER BY LOWER(imprint) COLLATE "C", imprint COLLATE "C", id
            "#,
            FILTER_CLAUSE
        );

        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(&filter.ids)
            .bind(filter.book)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        Ok(instances)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, due_back, status FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance with id {} not found", id)))
    }

    async fn count(&self, filter: &BookInstanceFilter) -> AppResult<i64> {
        let query = format!("SELECT COUNT(*) FROM book_instances {}", FILTER_CLAUSE);

        let count: i64 = sqlx::query_scalar(&query)
            .bind(&filter.ids)
            .bind(filter.book)
            .bind(filter.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create(&self, draft: BookInstanceDraft) -> AppResult<BookInstance> {
        let instance = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, book_id, imprint, due_back, status
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.book)
        .bind(&draft.imprint)
        .bind(draft.due_back)
        .bind(draft.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(instance)
    }

    async fn update_by_id(&self, id: Uuid, draft: BookInstanceDraft) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances SET
                book_id = $1,
                imprint = $2,
                due_back = $3,
                status = $4
            WHERE id = $5
            RETURNING id, book_id, imprint, due_back, status
            "#,
        )
        .bind(draft.book)
        .bind(&draft.imprint)
        .bind(draft.due_back)
        .bind(draft.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance with id {} not found", id)))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book instance with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
