//! Books collection on PostgreSQL

use async_trait::async_trait;
use uuid::Uuid;

use super::{PgStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDraft, BookFilter},
};

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::uuid[] IS NULL OR id = ANY($1))
      AND ($2::uuid IS NULL OR author_id = $2)
      AND ($3::uuid IS NULL OR $3 = ANY(genre_ids))
"#;

#[async_trait]
impl Store<Book> for PgStore {
    async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let query = format!(
            r#"
            SELECT id, title, author_id, summary, isbn, genre_ids FROM books {}
            ORDER BY LOWER(title) COLLATE "C", title COLLATE "C", id
            "#,
            FILTER_CLAUSE
        );

        let books = sqlx::query_as::<_, Book>(&query)
            .bind(&filter.ids)
            .bind(filter.author)
            .bind(filter.genre)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn, genre_ids FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn count(&self, filter: &BookFilter) -> AppResult<i64> {
        let query = format!("SELECT COUNT(*) FROM books {}", FILTER_CLAUSE);

        let count: i64 = sqlx::query_scalar(&query)
            .bind(&filter.ids)
            .bind(filter.author)
            .bind(filter.genre)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create(&self, draft: BookDraft) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author_id, summary, isbn, genre_ids)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, author_id, summary, isbn, genre_ids
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(draft.author)
        .bind(&draft.summary)
        .bind(&draft.isbn)
        .bind(&draft.genres)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update_by_id(&self, id: Uuid, draft: BookDraft) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = $1,
                author_id = $2,
                summary = $3,
                isbn = $4,
                genre_ids = $5
            WHERE id = $6
            RETURNING id, title, author_id, summary, isbn, genre_ids
            "#,
        )
        .bind(&draft.title)
        .bind(draft.author)
        .bind(&draft.summary)
        .bind(&draft.isbn)
        .bind(&draft.genres)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
