//! Genre model and related types

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{book::BookSummary, caseless_order, Entity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreDraft {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenreFilter {
    pub ids: Option<Vec<Uuid>>,
    /// Case-insensitive exact name match
    pub name: Option<String>,
}

impl Entity for Genre {
    type Draft = GenreDraft;
    type Filter = GenreFilter;

    const COLLECTION: &'static str = "genres";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: GenreDraft) -> Self {
        Self {
            id,
            name: draft.name,
        }
    }

    fn matches(&self, filter: &GenreFilter) -> bool {
        filter.ids.as_ref().map_or(true, |ids| ids.contains(&self.id))
            && filter
                .name
                .as_ref()
                .map_or(true, |name| self.name.to_lowercase() == name.to_lowercase())
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        caseless_order(&self.name, &other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Genre detail page: the genre and the books filed under it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreDetail {
    pub genre: Genre,
    pub url: String,
    pub books: Vec<BookSummary>,
}
