//! Genre catalog operations

use uuid::Uuid;

use super::integrity::{DeleteCheck, DeleteConfirmation, DeleteOutcome, IntegrityGuard};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookSummary, genre::GenreDetail, BookFilter, EntityKind, Genre, GenreFilter,
    },
    repository::Repository,
    validation::{
        forms::{genre_draft, genre_form, GENRE_FORM},
        FormInput,
    },
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
    guard: IntegrityGuard,
}

impl GenresService {
    pub fn new(repository: Repository, guard: IntegrityGuard) -> Self {
        Self { repository, guard }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.find(&GenreFilter::default()).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<GenreDetail> {
        let books_filter = BookFilter::by_genre(id);
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.repository.books.find(&books_filter),
        )?;

        Ok(GenreDetail {
            url: genre.url(),
            genre,
            books: books.into_iter().map(BookSummary::from).collect(),
        })
    }

    /// Create a genre, or return the one already carrying that name.
    /// The flag is `true` when a new genre was stored.
    pub async fn create(&self, input: FormInput) -> AppResult<(Genre, bool)> {
        let form = GENRE_FORM.run(input).map_err(AppError::ValidationFailed)?;
        let draft = genre_draft(&form);

        let same_name = GenreFilter {
            name: Some(draft.name.clone()),
            ..Default::default()
        };
        if let Some(existing) = self.repository.genres.find(&same_name).await?.into_iter().next() {
            tracing::info!("Genre '{}' already exists as {}", existing.name, existing.id);
            return Ok((existing, false));
        }

        let genre = self.repository.genres.create(draft).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok((genre, true))
    }

    pub async fn update(&self, id: Uuid, input: FormInput) -> AppResult<Genre> {
        let stored = self.repository.genres.find_by_id(id).await?;
        let form = GENRE_FORM
            .run(genre_form(&stored).overlay(input))
            .map_err(AppError::ValidationFailed)?;

        let genre = self
            .repository
            .genres
            .update_by_id(id, genre_draft(&form))
            .await?;
        tracing::info!("Updated genre {}", id);
        Ok(genre)
    }

    pub async fn confirm_delete(&self, id: Uuid) -> AppResult<DeleteConfirmation<Genre>> {
        let (genre, dependents) = tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.guard.dependents(EntityKind::Genre, id),
        )?;
        Ok(DeleteConfirmation::new(genre, DeleteCheck::from(dependents)))
    }

    pub async fn commit_delete(&self, id: Uuid) -> AppResult<DeleteOutcome> {
        self.guard.commit_delete(EntityKind::Genre, id).await
    }
}
