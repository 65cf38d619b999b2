use crate::coerce::{CoercionError, CoercionErrorKind};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ValidateError
///

#[derive(Debug, ThisError)]
pub enum ValidateError {
    #[error("validation failed")]
    ValidationFailed(BTreeMap<String, Vec<String>>),
}

impl ValidateError {
    /// Messages recorded against `field`.
    #[must_use]
    pub fn messages_on(&self, field: &str) -> &[String] {
        match self {
            Self::ValidationFailed(issues) => issues.get(field).map_or(&[], Vec::as_slice),
        }
    }
}

///
/// FieldError
///
/// One validation failure on one field. The message is the coercion error's
/// display text, e.g. `'fake_breed' is not a valid Breed`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: CoercionErrorKind,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, err: &CoercionError) -> Self {
        Self {
            field,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

///
/// ValidationSink
///
/// Narrow interface a host record exposes for collecting field errors.
///

pub trait ValidationSink {
    fn add_validation_error(&mut self, field: &str, message: String);
}

///
/// FieldRule
///
/// A check bound to one field of `H`. Object safe, so a host can list its
/// rules as `&[&dyn FieldRule<Self>]`.
///

pub trait FieldRule<H: ?Sized> {
    fn field(&self) -> &'static str;

    fn check(&self, host: &H) -> Option<FieldError>;
}

// collect_errors
fn collect_errors<H: ?Sized>(host: &H, rules: &[&dyn FieldRule<H>]) -> Vec<FieldError> {
    rules.iter().filter_map(|rule| rule.check(host)).collect()
}

///
/// validate_record
/// Run every rule against `host`, collecting messages by field.
///
pub fn validate_record<H: ?Sized>(
    host: &H,
    rules: &[&dyn FieldRule<H>],
) -> Result<(), ValidateError> {
    let mut issues: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for error in collect_errors(host, rules) {
        issues
            .entry(error.field.to_string())
            .or_default()
            .push(error.message);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::ValidationFailed(issues))
    }
}

/// Run every rule against `host` and push failures into `sink`.
/// Returns the number of errors added.
pub fn validate_into<H: ?Sized, S: ValidationSink + ?Sized>(
    host: &H,
    rules: &[&dyn FieldRule<H>],
    sink: &mut S,
) -> usize {
    let errors = collect_errors(host, rules);
    let count = errors.len();

    for error in errors {
        tracing::debug!(field = error.field, kind = %error.kind, "validation error");
        sink.add_validation_error(error.field, error.message);
    }

    count
}

///
/// Errors
///
/// Ready-made `ValidationSink`, messages kept per field in field order.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Errors {
    by_field: BTreeMap<String, Vec<String>>,
}

impl Errors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(&self, field: &str) -> &[String] {
        self.by_field.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn count_on(&self, field: &str) -> usize {
        self.on(field).len()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_field.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_field.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_field.iter().flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| (field.as_str(), message.as_str()))
        })
    }
}

impl ValidationSink for Errors {
    fn add_validation_error(&mut self, field: &str, message: String) {
        self.by_field
            .entry(field.to_string())
            .or_default()
            .push(message);
    }
}

///
/// TESTS
///
