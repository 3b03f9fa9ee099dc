//! Referential-integrity guard for deletions

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookFilter, BookInstanceFilter, Dependent, EntityKind},
    repository::Repository,
};

/// Whether an entity may be deleted, and what still references it
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeleteCheck {
    pub allowed: bool,
    #[schema(value_type = Vec<Object>)]
    pub dependents: Vec<Dependent>,
}

impl From<Vec<Dependent>> for DeleteCheck {
    fn from(dependents: Vec<Dependent>) -> Self {
        Self {
            allowed: dependents.is_empty(),
            dependents,
        }
    }
}

/// Result of a committed delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    /// The target did not exist (or vanished before removal)
    AlreadyAbsent,
}

/// Delete confirmation page: the target and its live dependents
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteConfirmation<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub target: T,
    pub allowed: bool,
    #[schema(value_type = Vec<Object>)]
    pub dependents: Vec<Dependent>,
}

impl<T> DeleteConfirmation<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(target: T, check: DeleteCheck) -> Self {
        Self {
            target,
            allowed: check.allowed,
            dependents: check.dependents,
        }
    }
}

#[derive(Clone)]
pub struct IntegrityGuard {
    repository: Repository,
}

impl IntegrityGuard {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Entities whose reference field points at `id`
    pub async fn dependents(&self, kind: EntityKind, id: Uuid) -> AppResult<Vec<Dependent>> {
        let dependents = match kind {
            EntityKind::Author => self
                .repository
                .books
                .find(&BookFilter::by_author(id))
                .await?
                .into_iter()
                .map(Dependent::Book)
                .collect(),
            EntityKind::Genre => self
                .repository
                .books
                .find(&BookFilter::by_genre(id))
                .await?
                .into_iter()
                .map(Dependent::Book)
                .collect(),
            EntityKind::Book => self
                .repository
                .book_instances
                .find(&BookInstanceFilter::by_book(id))
                .await?
                .into_iter()
                .map(Dependent::BookInstance)
                .collect(),
            EntityKind::BookInstance => Vec::new(),
        };
        Ok(dependents)
    }

    async fn ensure_exists(&self, kind: EntityKind, id: Uuid) -> AppResult<()> {
        match kind {
            EntityKind::Author => self.repository.authors.find_by_id(id).await.map(|_| ()),
            EntityKind::Book => self.repository.books.find_by_id(id).await.map(|_| ()),
            EntityKind::Genre => self.repository.genres.find_by_id(id).await.map(|_| ()),
            EntityKind::BookInstance => self
                .repository
                .book_instances
                .find_by_id(id)
                .await
                .map(|_| ()),
        }
    }

    /// Check whether `id` may be deleted.
    ///
    /// The existence read and the dependents read run concurrently.
    /// Fails with `NotFound` when the target does not exist.
    pub async fn can_delete(&self, kind: EntityKind, id: Uuid) -> AppResult<DeleteCheck> {
        let ((), dependents) =
            tokio::try_join!(self.ensure_exists(kind, id), self.dependents(kind, id))?;
        Ok(DeleteCheck::from(dependents))
    }

    /// Re-check and remove.
    ///
    /// Nothing is removed while dependents exist. A target that is already
    /// gone, at check time or before removal, counts as deleted.
    pub async fn commit_delete(&self, kind: EntityKind, id: Uuid) -> AppResult<DeleteOutcome> {
        let check = match self.can_delete(kind, id).await {
            Ok(check) => check,
            Err(AppError::NotFound(_)) => {
                tracing::info!("{} {} already absent", kind, id);
                return Ok(DeleteOutcome::AlreadyAbsent);
            }
            Err(e) => return Err(e),
        };

        if !check.allowed {
            tracing::warn!(
                "Refusing to delete {} {}: {} dependent(s)",
                kind,
                id,
                check.dependents.len()
            );
            return Err(AppError::ReferentialConflict(check.dependents));
        }

        let removed = match kind {
            EntityKind::Author => self.repository.authors.remove_by_id(id).await,
            EntityKind::Book => self.repository.books.remove_by_id(id).await,
            EntityKind::Genre => self.repository.genres.remove_by_id(id).await,
            EntityKind::BookInstance => self.repository.book_instances.remove_by_id(id).await,
        };

        match removed {
            Ok(()) => {
                tracing::info!("Deleted {} {}", kind, id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(AppError::NotFound(_)) => Ok(DeleteOutcome::AlreadyAbsent),
            Err(e) => Err(e),
        }
    }
}
