//! Bounded-time decorator for any store

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::Store;
use crate::{
    error::{AppError, AppResult},
    models::Entity,
};

/// Fails any call that does not settle within `limit` with `StoreFailure`
pub struct TimeoutStore<E: Entity> {
    inner: Arc<dyn Store<E>>,
    limit: Duration,
}

impl<E: Entity> TimeoutStore<E> {
    pub fn new(inner: Arc<dyn Store<E>>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn wrap(inner: Arc<dyn Store<E>>, limit: Duration) -> Arc<dyn Store<E>> {
        Arc::new(Self::new(inner, limit))
    }

    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("{}.{} timed out after {:?}", E::COLLECTION, op, self.limit);
                Err(AppError::StoreFailure(format!(
                    "{}.{} timed out after {:?}",
                    E::COLLECTION,
                    op,
                    self.limit
                )))
            }
        }
    }
}

#[async_trait]
impl<E: Entity> Store<E> for TimeoutStore<E> {
    async fn find(&self, filter: &E::Filter) -> AppResult<Vec<E>> {
        self.bounded("find", self.inner.find(filter)).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<E> {
        self.bounded("find_by_id", self.inner.find_by_id(id)).await
    }

    async fn count(&self, filter: &E::Filter) -> AppResult<i64> {
        self.bounded("count", self.inner.count(filter)).await
    }

    async fn create(&self, draft: E::Draft) -> AppResult<E> {
        self.bounded("create", self.inner.create(draft)).await
    }

    async fn update_by_id(&self, id: Uuid, draft: E::Draft) -> AppResult<E> {
        self.bounded("update_by_id", self.inner.update_by_id(id, draft)).await
    }

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()> {
        self.bounded("remove_by_id", self.inner.remove_by_id(id)).await
    }
}
