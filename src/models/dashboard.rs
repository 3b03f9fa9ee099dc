//! Dashboard summary returned by the aggregate counter

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog totals shown on the home page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    /// Number of books
    pub books: i64,
    /// Number of book instances (copies)
    pub instances: i64,
    /// Copies with status Available
    pub available: i64,
    /// Number of genres
    pub genres: i64,
    /// Number of authors
    pub authors: i64,
}
