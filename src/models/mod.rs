//! Data models for the Local Library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod dashboard;
pub mod genre;
pub mod user;

use std::cmp::Ordering;

use serde::Serialize;
use uuid::Uuid;

// Re-export commonly used types
pub use author::{Author, AuthorDraft, AuthorFilter};
pub use book::{Book, BookDraft, BookFilter};
pub use book_instance::{BookInstance, BookInstanceDraft, BookInstanceFilter, LoanStatus};
pub use dashboard::DashboardSummary;
pub use genre::{Genre, GenreDraft, GenreFilter};
pub use user::{User, UserDraft, UserFilter};

/// A document persisted in one of the store collections.
///
/// `Draft` is the validated field set without an id; `Filter` is the typed
/// predicate accepted by `find` and `count`.
pub trait Entity: Clone + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Filter: Default + Send + Sync + 'static;

    /// Collection name, used in log lines and error messages
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    fn from_draft(id: Uuid, draft: Self::Draft) -> Self;

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Order in which `find` returns documents
    fn listing_order(&self, other: &Self) -> Ordering;

    /// Key that must be unique across the collection, if any
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// Case-insensitive text order, ties broken by exact bytes.
/// Matches `ORDER BY LOWER(col) COLLATE "C", col COLLATE "C"` on PostgreSQL.
pub fn caseless_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Kinds of catalog entity that can be deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Book,
    Genre,
    BookInstance,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntityKind::Author => "Author",
            EntityKind::Book => "Book",
            EntityKind::Genre => "Genre",
            EntityKind::BookInstance => "Book instance",
        };
        write!(f, "{}", label)
    }
}

/// An entity whose reference field points at an entity being deleted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dependent {
    Book(Book),
    BookInstance(BookInstance),
}

impl Dependent {
    pub fn id(&self) -> Uuid {
        match self {
            Dependent::Book(book) => book.id,
            Dependent::BookInstance(instance) => instance.id,
        }
    }
}
