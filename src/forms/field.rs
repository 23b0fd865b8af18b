//! Form schemas and cleaning.
//!
//! A form is described statically as a slice of [`FieldSpec`]s and bound at
//! runtime into a [`Form`], which carries what can only be known per
//! request: dynamic choices, initial values and the upload limit.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use super::errors::{FieldError, FieldErrors};
use super::payload::{validate_payload, UploadedFile, DEFAULT_MAX_UPLOAD};

/// Values that passed validation, keyed by field name.
pub type CleanedData = BTreeMap<String, String>;

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Single-line text that is never echoed back.
    Password,
    /// Multi-line text.
    Textarea,
    /// One value out of a list of choices.
    Choice,
    /// Uploaded file.
    File,
}

/// Static description of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub choices: &'static [(&'static str, &'static str)],
}

impl FieldSpec {
    /// A required field of the given kind.
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            max_length: None,
            choices: &[],
        }
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn choices(mut self, choices: &'static [(&'static str, &'static str)]) -> Self {
        self.choices = choices;
        self
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A field bound to its runtime state.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub choices: Vec<Choice>,
    pub initial: Option<String>,
    #[serde(skip)]
    max_length: Option<usize>,
}

impl Field {
    fn from_spec(spec: &FieldSpec) -> Self {
        Self {
            name: spec.name,
            label: spec.label,
            kind: spec.kind,
            required: spec.required,
            choices: spec
                .choices
                .iter()
                .map(|(value, label)| Choice::new(*value, *label))
                .collect(),
            initial: None,
            max_length: spec.max_length,
        }
    }

    /// Whether `value` is one of the offered choices.
    pub fn offers(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }
}

/// A form ready to display or to clean a submission.
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    fields: Vec<Field>,
    #[serde(skip)]
    upload_limit: usize,
}

impl Form {
    /// Bind a static schema.
    pub fn from_schema(schema: &[FieldSpec]) -> Self {
        Self {
            fields: schema.iter().map(Field::from_spec).collect(),
            upload_limit: DEFAULT_MAX_UPLOAD,
        }
    }

    /// Set the maximum accepted upload size in bytes.
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }

    pub fn upload_limit(&self) -> usize {
        self.upload_limit
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Replace the choices offered by `name`.
    pub fn set_choices(&mut self, name: &str, choices: Vec<Choice>) {
        if let Some(field) = self.field_mut(name) {
            field.choices = choices;
        }
    }

    /// Pre-select or pre-fill `name`.
    pub fn set_initial(&mut self, name: &str, initial: Option<String>) {
        if let Some(field) = self.field_mut(name) {
            field.initial = initial;
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Validate a submission against every field.
    ///
    /// Text is trimmed, required fields must be non-empty, choices must be
    /// offered, and uploads go through [`validate_payload`]. Uploaded files
    /// appear in the cleaned data under their own field name; absent
    /// optional uploads do not appear at all.
    pub fn clean(&self, submission: &Submission) -> Result<CleanedData, FieldErrors> {
        let mut cleaned = CleanedData::new();
        let mut errors = FieldErrors::new();

        for field in &self.fields {
            match field.kind {
                FieldKind::File => match submission.file(field.name) {
                    Some(file) => match validate_payload(file, self.upload_limit) {
                        Ok(text) => {
                            cleaned.insert(field.name.to_string(), text);
                        }
                        Err(error) => errors.add(
                            field.name,
                            FieldError::Payload {
                                prefix: upload_prefix(field.name).to_string(),
                                error,
                            },
                        ),
                    },
                    None if field.required => errors.add(field.name, FieldError::Required),
                    None => {}
                },
                FieldKind::Choice => {
                    let value = submission.value(field.name).unwrap_or_default();
                    if value.is_empty() {
                        if field.required {
                            errors.add(field.name, FieldError::Required);
                        } else {
                            cleaned.insert(field.name.to_string(), String::new());
                        }
                    } else if !field.offers(value) {
                        errors.add(
                            field.name,
                            FieldError::InvalidChoice {
                                value: value.to_string(),
                            },
                        );
                    } else {
                        cleaned.insert(field.name.to_string(), value.to_string());
                    }
                }
                FieldKind::Text | FieldKind::Password | FieldKind::Textarea => {
                    let value = submission.value(field.name).unwrap_or_default().trim();
                    if value.is_empty() && field.required {
                        errors.add(field.name, FieldError::Required);
                        continue;
                    }
                    let length = value.chars().count();
                    match field.max_length {
                        Some(max) if length > max => errors.add(
                            field.name,
                            FieldError::TooLong {
                                max,
                                actual: length,
                            },
                        ),
                        _ => {
                            cleaned.insert(field.name.to_string(), value.to_string());
                        }
                    }
                }
            }
        }

        errors.into_result(cleaned)
    }
}

/// `key_upload` -> `key`.
fn upload_prefix(field: &str) -> &str {
    field.strip_suffix("_upload").unwrap_or(field)
}

/// Raw data posted by the user: text fields and uploaded files.
#[derive(Clone, Default)]
pub struct Submission {
    values: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text value.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_value(name, value);
        self
    }

    /// Add an uploaded file.
    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.insert_file(name, file);
        self
    }

    pub fn insert_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.files.insert(name.into(), file);
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values: Vec<_> = self.values.keys().collect();
        values.sort();
        f.debug_struct("Submission")
            .field("values", &values)
            .field("files", &self.files)
            .finish()
    }
}
