//! Form validation pipeline.
//!
//! A [`Pipeline`] is an ordered list of [`FieldRule`]s applied to a
//! [`FormInput`]. Input is first normalized (list fields become lists),
//! then sanitized, then every rule is checked and every violation is kept.
//! Sanitization happens whatever the outcome, so a failed form echoes back
//! only sanitized values.

pub mod forms;
pub mod sanitize;

use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateEmail;

/// A submitted field: a single value or a list (multi-select)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

/// Text form of a submitted JSON scalar. `null` is an empty value.
fn scalar_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::Many(items.into_iter().map(scalar_text).collect()),
            scalar => FieldValue::Single(scalar_text(scalar)),
        }
    }
}

// Any JSON value is accepted here; the pipeline decides what is valid.
impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}

/// Submitted form fields, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormInput(IndexMap<String, FieldValue>);

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a single value
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.0.insert(field.to_string(), FieldValue::Single(value.into()));
        self
    }

    /// Builder-style insert of a list value
    pub fn with_list<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.0.insert(field.to_string(), FieldValue::Many(values));
        self
    }

    pub fn insert(&mut self, field: &str, value: FieldValue) {
        self.0.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.0.shift_remove(field)
    }

    /// Scalar value of a field; empty when absent
    pub fn text(&self, field: &str) -> &str {
        match self.0.get(field) {
            Some(FieldValue::Single(value)) => value,
            Some(FieldValue::Many(values)) => values.first().map(String::as_str).unwrap_or(""),
            None => "",
        }
    }

    /// List value of a field; empty when absent
    pub fn list(&self, field: &str) -> Vec<&str> {
        match self.0.get(field) {
            Some(FieldValue::Single(value)) => vec![value.as_str()],
            Some(FieldValue::Many(values)) => values.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Replace the fields of `self` with every field present in `submitted`.
    /// Fields absent from `submitted` keep their current value.
    pub fn overlay(mut self, submitted: FormInput) -> Self {
        for (field, value) in submitted.0 {
            self.0.insert(field, value);
        }
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// One violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Every violation found, plus the sanitized input to redisplay
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
    pub input: FormInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    Trim,
    Lowercase,
    Escape,
}

impl Sanitizer {
    fn apply(&self, value: &str) -> String {
        match self {
            Sanitizer::Trim => sanitize::trim(value),
            Sanitizer::Lowercase => sanitize::lowercase(value),
            Sanitizer::Escape => sanitize::escape(value),
        }
    }
}

/// Format constraint checked on non-empty values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// ASCII letters and digits only
    Alphanumeric,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    Iso8601Date,
    Email,
    MinLength(usize),
    /// A store identifier (UUID)
    Identifier,
    OneOf(&'static [&'static str]),
}

impl Constraint {
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Constraint::Alphanumeric => value.chars().all(|c| c.is_ascii_alphanumeric()),
            Constraint::Iso8601Date => parse_iso_date(value).is_some(),
            Constraint::Email => value.to_string().validate_email(),
            Constraint::MinLength(min) => value.chars().count() >= *min,
            Constraint::Identifier => Uuid::parse_str(value).is_ok(),
            Constraint::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

/// Parse an ISO-8601 date, accepting a plain date or a full timestamp
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Validation and sanitization rule for one field
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    shape: Shape,
    required: Option<&'static str>,
    sanitizers: Vec<Sanitizer>,
    checks: Vec<(Constraint, &'static str)>,
    secret: bool,
}

impl FieldRule {
    /// Rule for a single-valued field
    pub fn scalar(field: &'static str) -> Self {
        Self {
            field,
            shape: Shape::Scalar,
            required: None,
            sanitizers: Vec::new(),
            checks: Vec::new(),
            secret: false,
        }
    }

    /// Rule for a multi-valued field; a lone value is coerced to a list
    pub fn list(field: &'static str) -> Self {
        Self {
            shape: Shape::List,
            ..Self::scalar(field)
        }
    }

    pub fn trim(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Trim);
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Lowercase);
        self
    }

    pub fn escape(mut self) -> Self {
        self.sanitizers.push(Sanitizer::Escape);
        self
    }

    /// Reject empty values with `message`
    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub fn check(mut self, constraint: Constraint, message: &'static str) -> Self {
        self.checks.push((constraint, message));
        self
    }

    /// Never echo this field back on failure
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    fn sanitize(&self, value: &str) -> String {
        self.sanitizers
            .iter()
            .fold(value.to_string(), |acc, sanitizer| sanitizer.apply(&acc))
    }

    /// Normalize the field's shape and sanitize it
    fn normalize(&self, raw: Option<FieldValue>) -> Option<FieldValue> {
        match self.shape {
            Shape::Scalar => {
                let value = match raw? {
                    FieldValue::Single(value) => value,
                    FieldValue::Many(values) => values.into_iter().next().unwrap_or_default(),
                };
                Some(FieldValue::Single(self.sanitize(&value)))
            }
            Shape::List => {
                let values = match raw {
                    Some(FieldValue::Single(value)) => vec![value],
                    Some(FieldValue::Many(values)) => values,
                    None => Vec::new(),
                };
                let values = values
                    .iter()
                    .map(|value| self.sanitize(value))
                    .filter(|value| !value.trim().is_empty())
                    .collect();
                Some(FieldValue::Many(values))
            }
        }
    }

    fn validate(&self, form: &FormInput, errors: &mut Vec<FieldError>) {
        let values: Vec<&str> = match self.shape {
            Shape::Scalar => {
                let value = form.text(self.field);
                if value.is_empty() {
                    Vec::new()
                } else {
                    vec![value]
                }
            }
            Shape::List => form.list(self.field),
        };

        if values.is_empty() {
            if let Some(message) = self.required {
                errors.push(FieldError::new(self.field, message));
            }
            return;
        }

        for (constraint, message) in &self.checks {
            if values.iter().any(|value| !constraint.accepts(value)) {
                errors.push(FieldError::new(self.field, message));
            }
        }
    }
}

/// Ordered list of field rules
#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: Vec<FieldRule>,
}

impl Pipeline {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Sanitize `input` and check every rule.
    ///
    /// Only fields covered by a rule survive; unknown fields are dropped so
    /// raw values can never be echoed back. Returns the sanitized form, or
    /// every violation found together with the sanitized form.
    pub fn run(&self, mut input: FormInput) -> Result<FormInput, ValidationFailure> {
        let mut sanitized = FormInput::new();
        for rule in &self.rules {
            if let Some(value) = rule.normalize(input.remove(rule.field)) {
                sanitized.insert(rule.field, value);
            }
        }

        let mut errors = Vec::new();
        for rule in &self.rules {
            rule.validate(&sanitized, &mut errors);
        }

        if errors.is_empty() {
            return Ok(sanitized);
        }

        Err(self.failure(errors, sanitized))
    }

    /// Build a failure for errors found after the pipeline ran
    /// (e.g. references that do not resolve), redacting secret fields.
    pub fn failure(&self, errors: Vec<FieldError>, mut input: FormInput) -> ValidationFailure {
        for rule in self.rules.iter().filter(|rule| rule.secret) {
            input.remove(rule.field);
        }
        ValidationFailure { errors, input }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_json_value_becomes_a_field_value() {
        let input: FormInput = serde_json::from_str(
            r#"{"date_of_birth": null, "isbn": 9780141439587, "flag": true, "genre": ["a", null, 7], "extra": {"k": 1}}"#,
        )
        .unwrap();

        assert_eq!(input.get("date_of_birth"), Some(&FieldValue::Single(String::new())));
        assert_eq!(input.text("isbn"), "9780141439587");
        assert_eq!(input.text("flag"), "true");
        assert_eq!(input.list("genre"), vec!["a", "", "7"]);
        assert_eq!(input.text("extra"), r#"{"k":1}"#);
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(vec![
            FieldRule::scalar("first_name")
                .trim()
                .escape()
                .required("First name must be specified.")
                .check(Constraint::Alphanumeric, "First name has non-alphanumeric characters."),
            FieldRule::scalar("family_name")
                .trim()
                .escape()
                .required("Family name must be specified."),
            FieldRule::scalar("date_of_birth")
                .trim()
                .check(Constraint::Iso8601Date, "Invalid date of birth"),
            FieldRule::list("genre")
                .trim()
                .escape()
                .check(Constraint::Identifier, "Invalid genre"),
            FieldRule::scalar("password")
                .required("Password must be specified.")
                .secret(),
        ])
    }

    #[test]
    fn test_accumulates_every_violation() {
        let input = FormInput::new()
            .with("first_name", "J@ne")
            .with("family_name", "   ")
            .with("date_of_birth", "yesterday");

        let failure = pipeline().run(input).unwrap_err();
        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name", "date_of_birth", "password"]);
        assert_eq!(failure.errors[1].message, "Family name must be specified.");
    }

    #[test]
    fn test_empty_required_field_reports_required_message_only() {
        let input = FormInput::new()
            .with("first_name", "")
            .with("family_name", "Austen")
            .with("password", "secret");

        let failure = pipeline().run(input).unwrap_err();
        assert_eq!(
            failure.errors,
            vec![FieldError::new("first_name", "First name must be specified.")]
        );
    }

    #[test]
    fn test_optional_empty_field_skips_checks() {
        let input = FormInput::new()
            .with("first_name", "Jane")
            .with("family_name", "Austen")
            .with("date_of_birth", "")
            .with("password", "secret");

        let form = pipeline().run(input).unwrap();
        assert_eq!(form.text("date_of_birth"), "");
    }

    #[test]
    fn test_single_list_value_becomes_list() {
        let genre = Uuid::new_v4().to_string();
        let input = FormInput::new()
            .with("first_name", "Jane")
            .with("family_name", "Austen")
            .with("genre", genre.clone())
            .with("password", "secret");

        let form = pipeline().run(input).unwrap();
        assert_eq!(form.get("genre"), Some(&FieldValue::Many(vec![genre])));
    }

    #[test]
    fn test_absent_list_becomes_empty_list() {
        let input = FormInput::new()
            .with("first_name", "Jane")
            .with("family_name", "Austen")
            .with("password", "secret");

        let form = pipeline().run(input).unwrap();
        assert_eq!(form.get("genre"), Some(&FieldValue::Many(vec![])));
    }

    #[test]
    fn test_failure_echoes_sanitized_input_without_secrets() {
        let input = FormInput::new()
            .with("first_name", "  <b>Jane</b> ")
            .with("family_name", "Austen")
            .with("password", "hunter2")
            .with("unexpected", "<script>");

        let failure = pipeline().run(input).unwrap_err();
        assert_eq!(failure.input.text("first_name"), "&lt;b&gt;Jane&lt;&#x2F;b&gt;");
        assert!(!failure.input.contains("password"));
        assert!(!failure.input.contains("unexpected"));
    }

    #[test]
    fn test_sanitized_form_passes_through_unchanged() {
        let input = FormInput::new()
            .with("first_name", " Jane ")
            .with("family_name", "Fish & Chips")
            .with("password", "secret");

        let once = pipeline().run(input).unwrap();
        let twice = pipeline().run(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_overlay_keeps_unsubmitted_fields() {
        let stored = FormInput::new()
            .with("first_name", "Jane")
            .with("date_of_birth", "1775-12-16");
        let merged = stored.overlay(FormInput::new().with("first_name", "Janet"));
        assert_eq!(merged.text("first_name"), "Janet");
        assert_eq!(merged.text("date_of_birth"), "1775-12-16");
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("1775-12-16"), NaiveDate::from_ymd_opt(1775, 12, 16));
        assert_eq!(
            parse_iso_date("2024-03-03T10:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 3)
        );
        assert_eq!(parse_iso_date("16/12/1775"), None);
    }

    #[test]
    fn test_constraints() {
        assert!(Constraint::Email.accepts("reader@example.org"));
        assert!(!Constraint::Email.accepts("reader"));
        assert!(Constraint::MinLength(4).accepts("abcd"));
        assert!(!Constraint::MinLength(4).accepts("abc"));
        assert!(Constraint::OneOf(&["Available", "Loaned"]).accepts("Loaned"));
        assert!(!Constraint::OneOf(&["Available", "Loaned"]).accepts("Lost"));
    }
}
