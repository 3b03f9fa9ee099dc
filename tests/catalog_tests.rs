//! Service-level tests over the in-memory store

use std::time::Duration;

use locallibrary_server::{
    config::AuthConfig,
    error::AppError,
    models::{AuthorFilter, BookFilter, BookInstanceFilter, UserFilter},
    repository::Repository,
    services::{accounts::AuthOutcome, integrity::DeleteOutcome, Services},
    validation::{sanitize, FormInput},
};
use uuid::Uuid;

fn setup() -> (Repository, Services) {
    let repository = Repository::in_memory(Duration::from_secs(5));
    let services = Services::new(
        repository.clone(),
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
        },
    );
    (repository, services)
}

fn author_form(first: &str, family: &str) -> FormInput {
    FormInput::new()
        .with("first_name", first)
        .with("family_name", family)
}

async fn create_author(services: &Services, first: &str, family: &str) -> Uuid {
    services
        .authors
        .create(author_form(first, family))
        .await
        .unwrap()
        .id
}

async fn create_genre(services: &Services, name: &str) -> Uuid {
    services
        .genres
        .create(FormInput::new().with("name", name))
        .await
        .unwrap()
        .0
        .id
}

async fn create_book(services: &Services, title: &str, author: Uuid, genres: &[Uuid]) -> Uuid {
    services
        .books
        .create(
            FormInput::new()
                .with("title", title)
                .with("author", author.to_string())
                .with("summary", "A summary")
                .with("isbn", "9780000000000")
                .with_list("genre", genres.iter().map(Uuid::to_string)),
        )
        .await
        .unwrap()
        .id
}

async fn create_instance(services: &Services, book: Uuid, status: &str) -> Uuid {
    services
        .book_instances
        .create(
            FormInput::new()
                .with("book", book.to_string())
                .with("imprint", "Penguin Classics, 2003")
                .with("status", status),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_author_with_books_cannot_be_deleted() {
    let (repository, services) = setup();
    let author = create_author(&services, "Jane", "Austen").await;
    let emma = create_book(&services, "Emma", author, &[]).await;
    let persuasion = create_book(&services, "Persuasion", author, &[]).await;

    let err = services.authors.commit_delete(author).await.unwrap_err();
    match err {
        AppError::ReferentialConflict(dependents) => {
            let ids: Vec<Uuid> = dependents.iter().map(|d| d.id()).collect();
            assert_eq!(ids, vec![emma, persuasion]);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert_eq!(services.authors.get(author).await.unwrap().books.len(), 2);
    assert_eq!(
        repository.books.count(&BookFilter::by_author(author)).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn test_author_without_books_is_deleted() {
    let (_, services) = setup();
    let author = create_author(&services, "Jane", "Austen").await;

    let confirmation = services.authors.confirm_delete(author).await.unwrap();
    assert!(confirmation.allowed);
    assert!(confirmation.dependents.is_empty());

    assert_eq!(
        services.authors.commit_delete(author).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(matches!(
        services.authors.get(author).await,
        Err(AppError::NotFound(_))
    ));

    // a second commit is an idempotent success
    assert_eq!(
        services.authors.commit_delete(author).await.unwrap(),
        DeleteOutcome::AlreadyAbsent
    );
}

fn conflict_ids(err: AppError) -> Vec<Uuid> {
    match err {
        AppError::ReferentialConflict(dependents) => dependents.iter().map(|d| d.id()).collect(),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_author_delete_rechecks_after_confirmation() {
    let (_, services) = setup();
    let author = create_author(&services, "Jane", "Austen").await;

    assert!(services.authors.confirm_delete(author).await.unwrap().allowed);
    let emma = create_book(&services, "Emma", author, &[]).await;

    let err = services.authors.commit_delete(author).await.unwrap_err();
    assert_eq!(conflict_ids(err), vec![emma]);
    assert_eq!(services.authors.get(author).await.unwrap().books.len(), 1);
}

#[tokio::test]
async fn test_book_delete_rechecks_after_confirmation() {
    let (repository, services) = setup();
    let author = create_author(&services, "Jane", "Austen").await;
    let emma = create_book(&services, "Emma", author, &[]).await;

    assert!(services.books.confirm_delete(emma).await.unwrap().allowed);
    let copy = create_instance(&services, emma, "Available").await;

    let err = services.books.commit_delete(emma).await.unwrap_err();
    assert_eq!(conflict_ids(err), vec![copy]);
    tokio_test::assert_ok!(services.books.get(emma).await);
    assert_eq!(
        repository
            .book_instances
            .count(&BookInstanceFilter::by_book(emma))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_genre_delete_rechecks_after_confirmation() {
    let (_, services) = setup();
    let author = create_author(&services, "Jane", "Austen").await;
    let novel = create_genre(&services, "Novel").await;

    assert!(services.genres.confirm_delete(novel).await.unwrap().allowed);
    let emma = create_book(&services, "Emma", author, &[novel]).await;

    let err = services.genres.commit_delete(novel).await.unwrap_err();
    assert_eq!(conflict_ids(err), vec![emma]);
    tokio_test::assert_ok!(services.genres.get(novel).await);
}

#[tokio::test]
async fn test_empty_required_fields_are_never_persisted() {
    let (repository, services) = setup();
    let fields = [("first_name", "Jane"), ("family_name", "Austen")];

    for mask in 0..3u8 {
        let mut form = FormInput::new();
        for (i, (field, value)) in fields.iter().enumerate() {
            let value = if mask & (1 << i) != 0 { *value } else { "" };
            form = form.with(field, value);
        }

        let err = services.authors.create(form).await.unwrap_err();
        match err {
            AppError::ValidationFailed(failure) => assert!(!failure.errors.is_empty()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(repository.authors.count(&AuthorFilter::default()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_then_get_author() {
    let (_, services) = setup();
    let created = services
        .authors
        .create(author_form("Jane", "Austen"))
        .await
        .unwrap();
    assert!(!created.id.is_nil());

    let detail = services.authors.get(created.id).await.unwrap();
    assert_eq!(detail.author.author.first_name, "Jane");
    assert_eq!(detail.author.author.family_name, "Austen");
    assert_eq!(detail.author.name, "Austen, Jane");
    assert_eq!(detail.author.url, format!("/catalog/author/{}", created.id));
}

#[tokio::test]
async fn test_dashboard_counts() {
    let (_, services) = setup();
    let austen = create_author(&services, "Jane", "Austen").await;
    let bronte = create_author(&services, "Charlotte", "Bronte").await;

    let mut genres = Vec::new();
    for name in ["Romance", "Satire", "Gothic", "Classic"] {
        genres.push(create_genre(&services, name).await);
    }

    let emma = create_book(&services, "Emma", austen, &genres[..2]).await;
    let persuasion = create_book(&services, "Persuasion", austen, &genres[..1]).await;
    let jane_eyre = create_book(&services, "Jane Eyre", bronte, &genres[2..]).await;

    create_instance(&services, emma, "Available").await;
    create_instance(&services, emma, "Loaned").await;
    create_instance(&services, persuasion, "Available").await;
    create_instance(&services, jane_eyre, "Maintenance").await;
    create_instance(&services, jane_eyre, "Reserved").await;

    let summary = services.dashboard.summary().await.unwrap();
    assert_eq!(summary.books, 3);
    assert_eq!(summary.instances, 5);
    assert_eq!(summary.available, 2);
    assert_eq!(summary.genres, 4);
    assert_eq!(summary.authors, 2);
}

#[tokio::test]
async fn test_wrong_password_is_no_match_and_changes_nothing() {
    let (repository, services) = setup();
    let user = services
        .accounts
        .register(
            FormInput::new()
                .with("email", "reader@example.org")
                .with("name", "Reader")
                .with("password", "hunter22"),
        )
        .await
        .unwrap();

    let outcome = services
        .accounts
        .authenticate("reader@example.org", "wrong password")
        .await
        .unwrap();
    assert_eq!(outcome, AuthOutcome::NoMatch);

    let stored = repository
        .users
        .find(&UserFilter::by_email("reader@example.org"))
        .await
        .unwrap();
    assert_eq!(stored, vec![user]);
}

#[tokio::test]
async fn test_update_keeps_unspecified_fields() {
    let (_, services) = setup();
    let created = services
        .authors
        .create(author_form("Jane", "Austen").with("date_of_birth", "1775-12-16"))
        .await
        .unwrap();

    services
        .authors
        .update(created.id, FormInput::new().with("first_name", "Cassandra"))
        .await
        .unwrap();

    let author = services.authors.get(created.id).await.unwrap().author.author;
    assert_eq!(author.first_name, "Cassandra");
    assert_eq!(author.family_name, "Austen");
    assert_eq!(author.date_of_birth, created.date_of_birth);

    // an explicitly empty optional field clears it
    services
        .authors
        .update(created.id, FormInput::new().with("date_of_birth", ""))
        .await
        .unwrap();
    let author = services.authors.get(created.id).await.unwrap().author.author;
    assert_eq!(author.date_of_birth, None);
}

#[tokio::test]
async fn test_sanitized_values_survive_a_second_pass() {
    let (_, services) = setup();
    let created = services
        .genres
        .create(FormInput::new().with("name", "  Science & <Fiction>  "))
        .await
        .unwrap()
        .0;
    assert_eq!(created.name, "Science &amp; &lt;Fiction&gt;");
    assert_eq!(sanitize::escape(&created.name), created.name);

    // re-submitting the stored form leaves the name as is
    let updated = services
        .genres
        .update(created.id, FormInput::new())
        .await
        .unwrap();
    assert_eq!(updated.name, created.name);
}

#[tokio::test]
async fn test_genre_create_returns_existing_name() {
    let (_, services) = setup();
    let (first, created) = services
        .genres
        .create(FormInput::new().with("name", "Poetry"))
        .await
        .unwrap();
    assert!(created);

    let (second, created) = services
        .genres
        .create(FormInput::new().with("name", "poetry"))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_book_references_must_exist() {
    let (repository, services) = setup();
    let err = services
        .books
        .create(
            FormInput::new()
                .with("title", "Orphan")
                .with("author", Uuid::new_v4().to_string())
                .with("summary", "No author")
                .with("isbn", "0000000000")
                .with("genre", Uuid::new_v4().to_string()),
        )
        .await
        .unwrap_err();

    match err {
        AppError::ValidationFailed(failure) => {
            let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, vec!["author", "genre"]);
            assert_eq!(failure.input.text("title"), "Orphan");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(repository.books.count(&BookFilter::default()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_book_detail_tolerates_dangling_genre() {
    let (_, services) = setup();
    let author = create_author(&services, "Jane", "Austen").await;
    let genre = create_genre(&services, "Romance").await;
    let book = create_book(&services, "Emma", author, &[genre]).await;
    create_instance(&services, book, "").await;

    assert!(matches!(
        services.genres.commit_delete(genre).await,
        Err(AppError::ReferentialConflict(_))
    ));

    let detail = services.books.get(book).await.unwrap();
    assert_eq!(detail.book.author.map(|a| a.name), Some("Austen, Jane".to_string()));
    assert_eq!(detail.instances.len(), 1);
    assert_eq!(detail.instances[0].status.as_str(), "Maintenance");
}
