//! Business logic services

pub mod accounts;
pub mod authors;
pub mod book_instances;
pub mod books;
pub mod dashboard;
pub mod genres;
pub mod integrity;
pub mod resolver;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub genres: genres::GenresService,
    pub book_instances: book_instances::BookInstancesService,
    pub dashboard: dashboard::DashboardService,
    pub integrity: integrity::IntegrityGuard,
    pub resolver: resolver::Resolver,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let resolver = resolver::Resolver::new(repository.clone());
        let integrity = integrity::IntegrityGuard::new(repository.clone());

        Self {
            accounts: accounts::AccountsService::new(repository.clone(), auth_config),
            authors: authors::AuthorsService::new(repository.clone(), integrity.clone()),
            books: books::BooksService::new(repository.clone(), resolver.clone(), integrity.clone()),
            genres: genres::GenresService::new(repository.clone(), integrity.clone()),
            book_instances: book_instances::BookInstancesService::new(
                repository.clone(),
                resolver.clone(),
                integrity.clone(),
            ),
            dashboard: dashboard::DashboardService::new(repository),
            integrity,
            resolver,
        }
    }
}
