//! Book instance (copy) operations

use uuid::Uuid;

use super::{
    integrity::{DeleteConfirmation, DeleteOutcome, IntegrityGuard},
    resolver::Resolver,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::BookInstanceView, BookInstance, BookInstanceDraft, BookInstanceFilter,
        EntityKind,
    },
    repository::Repository,
    validation::{
        forms::{book_instance_draft, book_instance_form, BOOK_INSTANCE_FORM},
        FieldError, FormInput,
    },
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
    resolver: Resolver,
    guard: IntegrityGuard,
}

impl BookInstancesService {
    pub fn new(repository: Repository, resolver: Resolver, guard: IntegrityGuard) -> Self {
        Self {
            repository,
            resolver,
            guard,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<BookInstanceView>> {
        let instances = self
            .repository
            .book_instances
            .find(&BookInstanceFilter::default())
            .await?;
        self.resolver.populate_instances(instances).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<BookInstanceView> {
        let instance = self.repository.book_instances.find_by_id(id).await?;
        self.populate_one(instance).await
    }

    pub async fn create(&self, input: FormInput) -> AppResult<BookInstance> {
        let draft = self.validate(input).await?;
        let instance = self.repository.book_instances.create(draft).await?;
        tracing::info!("Created book instance {} of book {}", instance.id, instance.book);
        Ok(instance)
    }

    pub async fn update(&self, id: Uuid, input: FormInput) -> AppResult<BookInstance> {
        let stored = self.repository.book_instances.find_by_id(id).await?;
        let draft = self
            .validate(book_instance_form(&stored).overlay(input))
            .await?;

        let instance = self.repository.book_instances.update_by_id(id, draft).await?;
        tracing::info!("Updated book instance {}", id);
        Ok(instance)
    }

    /// Copies have no dependents; the check is always allowed once the copy exists
    pub async fn confirm_delete(
        &self,
        id: Uuid,
    ) -> AppResult<DeleteConfirmation<BookInstanceView>> {
        let (instance, check) = tokio::try_join!(
            self.repository.book_instances.find_by_id(id),
            self.guard.can_delete(EntityKind::BookInstance, id),
        )?;
        let view = self.populate_one(instance).await?;
        Ok(DeleteConfirmation::new(view, check))
    }

    pub async fn commit_delete(&self, id: Uuid) -> AppResult<DeleteOutcome> {
        self.guard.commit_delete(EntityKind::BookInstance, id).await
    }

    async fn populate_one(&self, instance: BookInstance) -> AppResult<BookInstanceView> {
        self.resolver
            .populate_instances(vec![instance])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("instance population returned nothing".to_string()))
    }

    /// Run the form rules, then check that the book exists
    async fn validate(&self, input: FormInput) -> AppResult<BookInstanceDraft> {
        let form = BOOK_INSTANCE_FORM
            .run(input)
            .map_err(AppError::ValidationFailed)?;
        let draft = book_instance_draft(&form)?;

        match self.repository.books.find_by_id(draft.book).await {
            Ok(_) => Ok(draft),
            Err(AppError::NotFound(_)) => Err(AppError::ValidationFailed(
                BOOK_INSTANCE_FORM.failure(vec![FieldError::new("book", "Book not found.")], form),
            )),
            Err(e) => Err(e),
        }
    }
}
