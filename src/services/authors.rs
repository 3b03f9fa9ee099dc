//! Author catalog operations

use uuid::Uuid;

use super::integrity::{DeleteCheck, DeleteConfirmation, DeleteOutcome, IntegrityGuard};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{AuthorDetail, AuthorView},
        book::BookSummary,
        Author, AuthorFilter, BookFilter, EntityKind,
    },
    repository::Repository,
    validation::{
        forms::{author_draft, author_form, AUTHOR_FORM},
        FormInput,
    },
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    guard: IntegrityGuard,
}

impl AuthorsService {
    pub fn new(repository: Repository, guard: IntegrityGuard) -> Self {
        Self { repository, guard }
    }

    /// All authors, ordered by family name
    pub async fn list(&self) -> AppResult<Vec<AuthorView>> {
        let authors = self.repository.authors.find(&AuthorFilter::default()).await?;
        Ok(authors.into_iter().map(AuthorView::from).collect())
    }

    /// Author with the titles and summaries of their books
    pub async fn get(&self, id: Uuid) -> AppResult<AuthorDetail> {
        let books_filter = BookFilter::by_author(id);
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.find(&books_filter),
        )?;

        Ok(AuthorDetail {
            author: AuthorView::from(author),
            books: books.into_iter().map(BookSummary::from).collect(),
        })
    }

    pub async fn create(&self, input: FormInput) -> AppResult<Author> {
        let form = AUTHOR_FORM.run(input).map_err(AppError::ValidationFailed)?;
        let author = self.repository.authors.create(author_draft(&form)).await?;
        tracing::info!("Created author {} ({})", author.id, author.full_name());
        Ok(author)
    }

    /// Submitted fields replace the stored ones; omitted fields are kept
    pub async fn update(&self, id: Uuid, input: FormInput) -> AppResult<Author> {
        let stored = self.repository.authors.find_by_id(id).await?;
        let form = AUTHOR_FORM
            .run(author_form(&stored).overlay(input))
            .map_err(AppError::ValidationFailed)?;

        let author = self
            .repository
            .authors
            .update_by_id(id, author_draft(&form))
            .await?;
        tracing::info!("Updated author {}", id);
        Ok(author)
    }

    pub async fn confirm_delete(&self, id: Uuid) -> AppResult<DeleteConfirmation<AuthorView>> {
        let (author, dependents) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.guard.dependents(EntityKind::Author, id),
        )?;
        Ok(DeleteConfirmation::new(
            AuthorView::from(author),
            DeleteCheck::from(dependents),
        ))
    }

    pub async fn commit_delete(&self, id: Uuid) -> AppResult<DeleteOutcome> {
        self.guard.commit_delete(EntityKind::Author, id).await
    }
}
