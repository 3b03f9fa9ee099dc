//! Dashboard counts

use crate::{
    error::AppResult,
    models::{
        AuthorFilter, BookFilter, BookInstanceFilter, DashboardSummary, GenreFilter, LoanStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Run the five catalog counts concurrently.
    ///
    /// The first failing count is the result; counts still in flight are dropped.
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let all_books = BookFilter::default();
        let all_instances = BookInstanceFilter::default();
        let available = BookInstanceFilter::by_status(LoanStatus::Available);
        let all_genres = GenreFilter::default();
        let all_authors = AuthorFilter::default();

        let (books, instances, available, genres, authors) = tokio::try_join!(
            self.repository.books.count(&all_books),
            self.repository.book_instances.count(&all_instances),
            self.repository.book_instances.count(&available),
            self.repository.genres.count(&all_genres),
            self.repository.authors.count(&all_authors),
        )?;

        Ok(DashboardSummary {
            books,
            instances,
            available,
            genres,
            authors,
        })
    }
}
