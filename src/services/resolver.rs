//! Relationship population: resolve stored ids into the entities they name

use std::collections::HashMap;

use indexmap::IndexSet;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorView, book::BookView, book_instance::BookInstanceView, Author, AuthorFilter,
        Book, BookFilter, BookInstance, Genre, GenreFilter,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct Resolver {
    repository: Repository,
}

impl Resolver {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Resolve author and genres for every book.
    ///
    /// Issues one batched author read and one batched genre read, concurrently,
    /// whatever the number of books. References that no longer resolve become
    /// `None`; the list order is preserved.
    pub async fn populate_books(&self, books: Vec<Book>) -> AppResult<Vec<BookView>> {
        if books.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: IndexSet<Uuid> = books.iter().map(|book| book.author).collect();
        let genre_ids: IndexSet<Uuid> = books
            .iter()
            .flat_map(|book| book.genres.iter().copied())
            .collect();

        let author_filter = AuthorFilter {
            ids: Some(author_ids.into_iter().collect()),
        };
        let genre_filter = GenreFilter {
            ids: Some(genre_ids.into_iter().collect()),
            ..Default::default()
        };

        let (authors, genres) = tokio::try_join!(
            self.repository.authors.find(&author_filter),
            self.repository.genres.find(&genre_filter),
        )?;

        let authors: HashMap<Uuid, Author> = authors.into_iter().map(|a| (a.id, a)).collect();
        let genres: HashMap<Uuid, Genre> = genres.into_iter().map(|g| (g.id, g)).collect();

        Ok(books
            .into_iter()
            .map(|book| BookView {
                url: book.url(),
                author: authors.get(&book.author).cloned().map(AuthorView::from),
                genres: book.genres.iter().map(|id| genres.get(id).cloned()).collect(),
                id: book.id,
                title: book.title,
                summary: book.summary,
                isbn: book.isbn,
            })
            .collect())
    }

    pub async fn populate_book(&self, book: Book) -> AppResult<BookView> {
        self.populate_books(vec![book])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("book population returned nothing".to_string()))
    }

    /// Resolve the book of every instance with a single batched read
    pub async fn populate_instances(
        &self,
        instances: Vec<BookInstance>,
    ) -> AppResult<Vec<BookInstanceView>> {
        if instances.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: IndexSet<Uuid> = instances.iter().map(|instance| instance.book).collect();
        let filter = BookFilter {
            ids: Some(book_ids.into_iter().collect()),
            ..Default::default()
        };
        let books: HashMap<Uuid, Book> = self
            .repository
            .books
            .find(&filter)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(instances
            .into_iter()
            .map(|instance| {
                let book = books.get(&instance.book).cloned();
                BookInstanceView::new(instance, book)
            })
            .collect())
    }
}
