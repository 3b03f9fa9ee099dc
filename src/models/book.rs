//! Book model and related types

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{author::AuthorView, book_instance::BookInstance, caseless_order, genre::Genre, Entity};

/// Full book model from the store. References are stored as ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    #[sqlx(rename = "author_id")]
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    #[sqlx(rename = "genre_ids")]
    pub genres: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Validated book fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genres: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub ids: Option<Vec<Uuid>>,
    pub author: Option<Uuid>,
    pub genre: Option<Uuid>,
}

impl BookFilter {
    pub fn by_author(author: Uuid) -> Self {
        Self {
            author: Some(author),
            ..Default::default()
        }
    }

    pub fn by_genre(genre: Uuid) -> Self {
        Self {
            genre: Some(genre),
            ..Default::default()
        }
    }
}

impl Entity for Book {
    type Draft = BookDraft;
    type Filter = BookFilter;

    const COLLECTION: &'static str = "books";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            summary: draft.summary,
            isbn: draft.isbn,
            genres: draft.genres,
        }
    }

    fn matches(&self, filter: &BookFilter) -> bool {
        filter.ids.as_ref().map_or(true, |ids| ids.contains(&self.id))
            && filter.author.map_or(true, |author| self.author == author)
            && filter.genre.map_or(true, |genre| self.genres.contains(&genre))
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        caseless_order(&self.title, &other.title)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Title and summary only, as listed on author and genre pages
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub url: String,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            url: book.url(),
            id: book.id,
            title: book.title,
            summary: book.summary,
        }
    }
}

/// Book with its author and genres resolved.
/// A reference that no longer resolves is rendered as `null`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: Option<AuthorView>,
    pub genres: Vec<Option<Genre>>,
}

/// Book detail page: the populated book and its copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: BookView,
    pub instances: Vec<BookInstance>,
}
