//! Book catalog operations

use uuid::Uuid;

use super::{
    integrity::{DeleteCheck, DeleteConfirmation, DeleteOutcome, IntegrityGuard},
    resolver::Resolver,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookDetail, BookView},
        AuthorFilter, Book, BookDraft, BookFilter, BookInstanceFilter, EntityKind, GenreFilter,
    },
    repository::Repository,
    validation::{
        forms::{book_draft, book_form, BOOK_FORM},
        FieldError, FormInput,
    },
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    resolver: Resolver,
    guard: IntegrityGuard,
}

impl BooksService {
    pub fn new(repository: Repository, resolver: Resolver, guard: IntegrityGuard) -> Self {
        Self {
            repository,
            resolver,
            guard,
        }
    }

    /// All books, ordered by title, with author and genres resolved
    pub async fn list(&self) -> AppResult<Vec<BookView>> {
        let books = self.repository.books.find(&BookFilter::default()).await?;
        self.resolver.populate_books(books).await
    }

    /// Book with references resolved and all of its copies
    pub async fn get(&self, id: Uuid) -> AppResult<BookDetail> {
        let instances_filter = BookInstanceFilter::by_book(id);
        let (book, instances) = tokio::try_join!(
            self.repository.books.find_by_id(id),
            self.repository.book_instances.find(&instances_filter),
        )?;

        Ok(BookDetail {
            book: self.resolver.populate_book(book).await?,
            instances,
        })
    }

    pub async fn create(&self, input: FormInput) -> AppResult<Book> {
        let draft = self.validate(input).await?;
        let book = self.repository.books.create(draft).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub async fn update(&self, id: Uuid, input: FormInput) -> AppResult<Book> {
        let stored = self.repository.books.find_by_id(id).await?;
        let draft = self.validate(book_form(&stored).overlay(input)).await?;

        let book = self.repository.books.update_by_id(id, draft).await?;
        tracing::info!("Updated book {}", id);
        Ok(book)
    }

    pub async fn confirm_delete(&self, id: Uuid) -> AppResult<DeleteConfirmation<BookView>> {
        let (book, dependents) = tokio::try_join!(
            self.repository.books.find_by_id(id),
            self.guard.dependents(EntityKind::Book, id),
        )?;
        let book = self.resolver.populate_book(book).await?;
        Ok(DeleteConfirmation::new(book, DeleteCheck::from(dependents)))
    }

    pub async fn commit_delete(&self, id: Uuid) -> AppResult<DeleteOutcome> {
        self.guard.commit_delete(EntityKind::Book, id).await
    }

    /// Run the form rules, then check that the author and every genre exist
    async fn validate(&self, input: FormInput) -> AppResult<BookDraft> {
        let form = BOOK_FORM.run(input).map_err(AppError::ValidationFailed)?;
        let draft = book_draft(&form)?;

        let author_filter = AuthorFilter {
            ids: Some(vec![draft.author]),
        };
        let genre_filter = GenreFilter {
            ids: Some(draft.genres.clone()),
            ..Default::default()
        };
        let (authors, genres) = tokio::try_join!(
            self.repository.authors.count(&author_filter),
            self.repository.genres.find(&genre_filter),
        )?;

        let mut errors = Vec::new();
        if authors == 0 {
            errors.push(FieldError::new("author", "Author not found."));
        }
        if draft
            .genres
            .iter()
            .any(|id| !genres.iter().any(|genre| genre.id == *id))
        {
            errors.push(FieldError::new("genre", "Genre not found."));
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationFailed(BOOK_FORM.failure(errors, form)));
        }
        Ok(draft)
    }
}
