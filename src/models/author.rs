//! Author model and related types

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{book::BookSummary, caseless_order, Entity};

/// Full author model from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First"
    pub fn full_name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Human-readable life span, e.g. "Dec 16, 1775 - Jul 18, 1817".
    /// Empty when neither date is known.
    pub fn lifespan(&self) -> String {
        if self.date_of_birth.is_none() && self.date_of_death.is_none() {
            return String::new();
        }
        format!(
            "{} - {}",
            format_date(self.date_of_birth),
            format_date(self.date_of_death)
        )
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Validated author fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorDraft {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    pub ids: Option<Vec<Uuid>>,
}

impl Entity for Author {
    type Draft = AuthorDraft;
    type Filter = AuthorFilter;

    const COLLECTION: &'static str = "authors";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: AuthorDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            family_name: draft.family_name,
            date_of_birth: draft.date_of_birth,
            date_of_death: draft.date_of_death,
        }
    }

    fn matches(&self, filter: &AuthorFilter) -> bool {
        filter.ids.as_ref().map_or(true, |ids| ids.contains(&self.id))
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        caseless_order(&self.family_name, &other.family_name)
            .then_with(|| caseless_order(&self.first_name, &other.first_name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Author with derived display fields
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub url: String,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: author.full_name(),
            lifespan: author.lifespan(),
            url: author.url(),
            author,
        }
    }
}

/// Author detail page: the author and the books written
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    pub author: AuthorView,
    pub books: Vec<BookSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn austen() -> Author {
        Author {
            id: Uuid::nil(),
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1775, 12, 16),
            date_of_death: NaiveDate::from_ymd_opt(1817, 7, 18),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(austen().full_name(), "Austen, Jane");
    }

    #[test]
    fn test_lifespan() {
        assert_eq!(austen().lifespan(), "Dec 16, 1775 - Jul 18, 1817");

        let mut living = austen();
        living.date_of_death = None;
        assert_eq!(living.lifespan(), "Dec 16, 1775 - ");

        living.date_of_birth = None;
        assert_eq!(living.lifespan(), "");
    }

    #[test]
    fn test_url() {
        assert_eq!(
            austen().url(),
            "/catalog/author/00000000-0000-0000-0000-000000000000"
        );
    }
}
