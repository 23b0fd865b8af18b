//! Per-field validation errors.

use std::collections::BTreeMap;

use thiserror::Error;

use super::payload::PayloadError;

/// A problem with one submitted field, shown next to that field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required field was left empty.
    #[error("This field is required.")]
    Required,

    /// Text longer than the field allows.
    #[error("Ensure this value has at most {max} characters (it has {actual}).")]
    TooLong { max: usize, actual: usize },

    /// A value that is not among the offered choices.
    #[error("Select a valid choice. {value} is not one of the available choices.")]
    InvalidChoice { value: String },

    /// An uploaded file was refused. `prefix` names what the file holds.
    #[error("{}", payload_message(.prefix, .error))]
    Payload { prefix: String, error: PayloadError },
}

/// Oversized files keep the bare size message; unreadable ones name the file.
fn payload_message(prefix: &str, error: &PayloadError) -> String {
    match error {
        PayloadError::TooLarge { .. } => error.to_string(),
        PayloadError::Malformed { message } => {
            format!("There was a problem parsing the {}: {}", prefix, message)
        }
    }
}

/// Validation errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against `field`.
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.entry(field.into()).or_default().push(error);
    }

    /// Errors recorded for `field`.
    pub fn get(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Flatten into `field: message` lines.
    pub fn messages(&self) -> Vec<String> {
        field_messages(&self.errors)
    }

    /// Turn an empty collection into `Ok(value)`.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn field_messages(errors: &BTreeMap<String, Vec<FieldError>>) -> Vec<String> {
    errors
        .iter()
        .flat_map(|(field, errors)| errors.iter().map(move |e| format!("{}: {}", field, e)))
        .collect()
}

fn join_messages(errors: &BTreeMap<String, Vec<FieldError>>) -> String {
    field_messages(errors).join("; ")
}
