//! Field rules and form conversions for each catalog entity

use once_cell::sync::Lazy;
use uuid::Uuid;

use super::{parse_iso_date, Constraint, FieldRule, FormInput, Pipeline};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorDraft, Book, BookDraft, BookInstance, BookInstanceDraft, Genre, GenreDraft,
        LoanStatus,
    },
};

const STATUSES: &[&str] = &["Available", "Maintenance", "Loaned", "Reserved"];

pub static AUTHOR_FORM: Lazy<Pipeline> = Lazy::new(|| {
    Pipeline::new(vec![
        FieldRule::scalar("first_name")
            .trim()
            .escape()
            .required("First name must be specified.")
            .check(Constraint::Alphanumeric, "First name has non-alphanumeric characters."),
        FieldRule::scalar("family_name")
            .trim()
            .escape()
            .required("Family name must be specified.")
            .check(Constraint::Alphanumeric, "Family name has non-alphanumeric characters."),
        FieldRule::scalar("date_of_birth")
            .trim()
            .check(Constraint::Iso8601Date, "Invalid date of birth"),
        FieldRule::scalar("date_of_death")
            .trim()
            .check(Constraint::Iso8601Date, "Invalid date of death"),
    ])
});

pub static GENRE_FORM: Lazy<Pipeline> = Lazy::new(|| {
    Pipeline::new(vec![FieldRule::scalar("name")
        .trim()
        .escape()
        .required("Genre name required")])
});

pub static BOOK_FORM: Lazy<Pipeline> = Lazy::new(|| {
    Pipeline::new(vec![
        FieldRule::scalar("title")
            .trim()
            .escape()
            .required("Title must not be empty."),
        FieldRule::scalar("author")
            .trim()
            .escape()
            .required("Author must not be empty.")
            .check(Constraint::Identifier, "Author must be a valid identifier."),
        FieldRule::scalar("summary")
            .trim()
            .escape()
            .required("Summary must not be empty."),
        FieldRule::scalar("isbn")
            .trim()
            .escape()
            .required("ISBN must not be empty."),
        FieldRule::list("genre")
            .trim()
            .escape()
            .check(Constraint::Identifier, "Genre must be a valid identifier."),
    ])
});

pub static BOOK_INSTANCE_FORM: Lazy<Pipeline> = Lazy::new(|| {
    Pipeline::new(vec![
        FieldRule::scalar("book")
            .trim()
            .escape()
            .required("Book must be specified.")
            .check(Constraint::Identifier, "Book must be a valid identifier."),
        FieldRule::scalar("imprint")
            .trim()
            .escape()
            .required("Imprint must be specified."),
        FieldRule::scalar("due_back")
            .trim()
            .check(Constraint::Iso8601Date, "Invalid date"),
        FieldRule::scalar("status")
            .trim()
            .escape()
            .check(Constraint::OneOf(STATUSES), "Invalid status"),
    ])
});

pub static REGISTRATION_FORM: Lazy<Pipeline> = Lazy::new(|| {
    Pipeline::new(vec![
        FieldRule::scalar("email")
            .trim()
            .lowercase()
            .escape()
            .required("Email must be specified.")
            .check(Constraint::Email, "Email must be a valid address."),
        FieldRule::scalar("name")
            .trim()
            .escape()
            .required("Name must be specified."),
        FieldRule::scalar("password")
            .required("Password must be specified.")
            .check(Constraint::MinLength(4), "Password must be at least 4 characters.")
            .secret(),
    ])
});

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_id(form: &FormInput, field: &str) -> AppResult<Uuid> {
    Uuid::parse_str(form.text(field))
        .map_err(|_| AppError::Internal(format!("validated field {} is not an identifier", field)))
}

pub fn author_draft(form: &FormInput) -> AuthorDraft {
    AuthorDraft {
        first_name: form.text("first_name").to_string(),
        family_name: form.text("family_name").to_string(),
        date_of_birth: parse_iso_date(form.text("date_of_birth")),
        date_of_death: parse_iso_date(form.text("date_of_death")),
    }
}

pub fn author_form(author: &Author) -> FormInput {
    FormInput::new()
        .with("first_name", author.first_name.clone())
        .with("family_name", author.family_name.clone())
        .with("date_of_birth", format_date(author.date_of_birth))
        .with("date_of_death", format_date(author.date_of_death))
}

pub fn genre_draft(form: &FormInput) -> GenreDraft {
    GenreDraft {
        name: form.text("name").to_string(),
    }
}

pub fn genre_form(genre: &Genre) -> FormInput {
    FormInput::new().with("name", genre.name.clone())
}

pub fn book_draft(form: &FormInput) -> AppResult<BookDraft> {
    let genres = form
        .list("genre")
        .into_iter()
        .map(|id| {
            Uuid::parse_str(id)
                .map_err(|_| AppError::Internal("validated genre is not an identifier".to_string()))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(BookDraft {
        title: form.text("title").to_string(),
        author: parse_id(form, "author")?,
        summary: form.text("summary").to_string(),
        isbn: form.text("isbn").to_string(),
        genres,
    })
}

pub fn book_form(book: &Book) -> FormInput {
    FormInput::new()
        .with("title", book.title.clone())
        .with("author", book.author.to_string())
        .with("summary", book.summary.clone())
        .with("isbn", book.isbn.clone())
        .with_list("genre", book.genres.iter().map(Uuid::to_string))
}

pub fn book_instance_draft(form: &FormInput) -> AppResult<BookInstanceDraft> {
    let status = match form.text("status") {
        "" => LoanStatus::default(),
        status => status.parse().map_err(AppError::Internal)?,
    };

    Ok(BookInstanceDraft {
        book: parse_id(form, "book")?,
        imprint: form.text("imprint").to_string(),
        due_back: parse_iso_date(form.text("due_back")),
        status,
    })
}

pub fn book_instance_form(instance: &BookInstance) -> FormInput {
    FormInput::new()
        .with("book", instance.book.to_string())
        .with("imprint", instance.imprint.clone())
        .with("due_back", format_date(instance.due_back))
        .with("status", instance.status.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;
    use crate::validation::FieldValue;
    use chrono::NaiveDate;

    #[test]
    fn test_author_form_messages() {
        let failure = AUTHOR_FORM
            .run(FormInput::new().with("first_name", "Jane!"))
            .unwrap_err();
        let messages: Vec<&str> = failure.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "First name has non-alphanumeric characters.",
                "Family name must be specified."
            ]
        );
    }

    #[test]
    fn test_author_draft_from_form() {
        let form = AUTHOR_FORM
            .run(
                FormInput::new()
                    .with("first_name", " Jane ")
                    .with("family_name", "Austen")
                    .with("date_of_birth", "1775-12-16")
                    .with("date_of_death", ""),
            )
            .unwrap();

        let draft = author_draft(&form);
        assert_eq!(draft.first_name, "Jane");
        assert_eq!(draft.date_of_birth, NaiveDate::from_ymd_opt(1775, 12, 16));
        assert_eq!(draft.date_of_death, None);
    }

    #[test]
    fn test_book_form_coerces_single_genre() {
        let genre = Uuid::new_v4();
        let form = BOOK_FORM
            .run(
                FormInput::new()
                    .with("title", "Emma")
                    .with("author", Uuid::new_v4().to_string())
                    .with("summary", "Matchmaking")
                    .with("isbn", "9780141439587")
                    .with("genre", genre.to_string()),
            )
            .unwrap();

        assert_eq!(
            form.get("genre"),
            Some(&FieldValue::Many(vec![genre.to_string()]))
        );
        assert_eq!(book_draft(&form).unwrap().genres, vec![genre]);
    }

    #[test]
    fn test_book_form_rejects_bad_references() {
        let failure = BOOK_FORM
            .run(
                FormInput::new()
                    .with("title", "Emma")
                    .with("author", "austen")
                    .with("summary", "Matchmaking")
                    .with("isbn", "9780141439587")
                    .with_list("genre", ["not-an-id"]),
            )
            .unwrap_err();
        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["author", "genre"]);
    }

    #[test]
    fn test_book_instance_status_defaults_to_maintenance() {
        let form = BOOK_INSTANCE_FORM
            .run(
                FormInput::new()
                    .with("book", Uuid::new_v4().to_string())
                    .with("imprint", "Penguin, 2003"),
            )
            .unwrap();
        assert_eq!(
            book_instance_draft(&form).unwrap().status,
            LoanStatus::Maintenance
        );
    }

    #[test]
    fn test_book_instance_rejects_unknown_status() {
        let failure = BOOK_INSTANCE_FORM
            .run(
                FormInput::new()
                    .with("book", Uuid::new_v4().to_string())
                    .with("imprint", "Penguin, 2003")
                    .with("status", "Lost"),
            )
            .unwrap_err();
        assert_eq!(failure.errors[0].message, "Invalid status");
    }

    #[test]
    fn test_registration_never_echoes_password() {
        let failure = REGISTRATION_FORM
            .run(
                FormInput::new()
                    .with("email", " Reader@Example.org ")
                    .with("name", "")
                    .with("password", "abc"),
            )
            .unwrap_err();
        assert_eq!(failure.input.text("email"), "reader@example.org");
        assert!(!failure.input.contains("password"));
        assert_eq!(failure.errors.len(), 2);
    }

    #[test]
    fn test_stored_author_revalidates() {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1775, 12, 16),
            date_of_death: None,
        };
        let form = AUTHOR_FORM.run(author_form(&author)).unwrap();
        let draft = author_draft(&form);
        assert_eq!(Author::from_draft(author.id, draft), author);
    }
}
