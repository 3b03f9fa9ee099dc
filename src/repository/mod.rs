//! Repository layer: one typed store per collection

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;
pub mod timeout;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, Entity, Genre, User},
};

pub use memory::MemoryStore;
pub use timeout::TimeoutStore;

/// Typed persistence for one document collection.
///
/// Every operation is atomic for a single document. `find_by_id`,
/// `update_by_id` and `remove_by_id` fail with `NotFound` when no document
/// has the id; any backend failure surfaces as `StoreFailure`.
#[async_trait]
pub trait Store<E: Entity>: Send + Sync {
    /// Documents matching `filter`, in the entity's listing order
    async fn find(&self, filter: &E::Filter) -> AppResult<Vec<E>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<E>;

    async fn count(&self, filter: &E::Filter) -> AppResult<i64>;

    /// Insert a new document under a freshly generated id
    async fn create(&self, draft: E::Draft) -> AppResult<E>;

    /// Replace every field of the document with `draft`
    async fn update_by_id(&self, id: Uuid, draft: E::Draft) -> AppResult<E>;

    async fn remove_by_id(&self, id: Uuid) -> AppResult<()>;
}

/// PostgreSQL-backed store; implements [`Store`] for every collection
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Main repository struct holding one store per collection
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn Store<Author>>,
    pub genres: Arc<dyn Store<Genre>>,
    pub books: Arc<dyn Store<Book>>,
    pub book_instances: Arc<dyn Store<BookInstance>>,
    pub users: Arc<dyn Store<User>>,
}

impl Repository {
    /// Repository over a PostgreSQL pool, each call bounded by `query_timeout`
    pub fn postgres(pool: Pool<Postgres>, query_timeout: Duration) -> Self {
        let store = PgStore::new(pool);
        Self {
            authors: TimeoutStore::wrap(Arc::new(store.clone()), query_timeout),
            genres: TimeoutStore::wrap(Arc::new(store.clone()), query_timeout),
            books: TimeoutStore::wrap(Arc::new(store.clone()), query_timeout),
            book_instances: TimeoutStore::wrap(Arc::new(store.clone()), query_timeout),
            users: TimeoutStore::wrap(Arc::new(store), query_timeout),
        }
    }

    /// Repository keeping every collection in process memory
    pub fn in_memory(query_timeout: Duration) -> Self {
        Self {
            authors: TimeoutStore::wrap(Arc::new(MemoryStore::<Author>::new()), query_timeout),
            genres: TimeoutStore::wrap(Arc::new(MemoryStore::<Genre>::new()), query_timeout),
            books: TimeoutStore::wrap(Arc::new(MemoryStore::<Book>::new()), query_timeout),
            book_instances: TimeoutStore::wrap(
                Arc::new(MemoryStore::<BookInstance>::new()),
                query_timeout,
            ),
            users: TimeoutStore::wrap(Arc::new(MemoryStore::<User>::new()), query_timeout),
        }
    }
}
