//! Book instance (physical copy) model and related types

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{book::Book, caseless_order, Entity};

/// Loan status of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Available,
        LoanStatus::Maintenance,
        LoanStatus::Loaned,
        LoanStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Available => "Available",
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::Loaned => "Loaned",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid loan status: {}", s))
    }
}

// SQLx conversion for LoanStatus (stored as TEXT)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full book instance model from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    #[sqlx(rename = "book_id")]
    pub book: Uuid,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    /// Due date as displayed, e.g. "Mar 3, 2024"
    pub fn due_back_formatted(&self) -> String {
        self.due_back
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_default()
    }
}

/// Validated book instance fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceDraft {
    pub book: Uuid,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, Default)]
pub struct BookInstanceFilter {
    pub ids: Option<Vec<Uuid>>,
    pub book: Option<Uuid>,
    pub status: Option<LoanStatus>,
}

impl BookInstanceFilter {
    pub fn by_book(book: Uuid) -> Self {
        Self {
            book: Some(book),
            ..Default::default()
        }
    }

    pub fn by_status(status: LoanStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Entity for BookInstance {
    type Draft = BookInstanceDraft;
    type Filter = BookInstanceFilter;

    const COLLECTION: &'static str = "book_instances";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: BookInstanceDraft) -> Self {
        Self {
            id,
            book: draft.book,
            imprint: draft.imprint,
            due_back: draft.due_back,
            status: draft.status,
        }
    }

    fn matches(&self, filter: &BookInstanceFilter) -> bool {
        filter.ids.as_ref().map_or(true, |ids| ids.contains(&self.id))
            && filter.book.map_or(true, |book| self.book == book)
            && filter.status.map_or(true, |status| self.status == status)
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        caseless_order(&self.imprint, &other.imprint)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Book instance with its book resolved (`null` when the book is gone)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub due_back_formatted: String,
    pub status: LoanStatus,
    pub url: String,
    pub book: Option<Book>,
}

impl BookInstanceView {
    pub fn new(instance: BookInstance, book: Option<Book>) -> Self {
        Self {
            url: instance.url(),
            due_back_formatted: instance.due_back_formatted(),
            id: instance.id,
            imprint: instance.imprint,
            due_back: instance.due_back,
            status: instance.status,
            book,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Available".parse::<LoanStatus>(), Ok(LoanStatus::Available));
        assert_eq!("Reserved".parse::<LoanStatus>(), Ok(LoanStatus::Reserved));
        assert!("available".parse::<LoanStatus>().is_err());
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }

    #[test]
    fn test_due_back_formatted() {
        let instance = BookInstance {
            id: Uuid::new_v4(),
            book: Uuid::new_v4(),
            imprint: "Penguin, 2003".to_string(),
            due_back: NaiveDate::from_ymd_opt(2024, 3, 3),
            status: LoanStatus::Loaned,
        };
        assert_eq!(instance.due_back_formatted(), "Mar 3, 2024");
    }
}
