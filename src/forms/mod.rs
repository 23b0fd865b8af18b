//! Form definitions and field validation.
//!
//! - [`FieldSpec`] / [`Form`] - static schemas bound to runtime choices
//! - [`Submission`] - raw posted values and uploaded files
//! - [`validate_payload`] - size and encoding checks for uploads
//! - [`FieldErrors`] - per-field error reporting
//!
//! # Example
//!
//! ```
//! use lbcerts::forms::{FieldKind, FieldSpec, Form, Submission};
//!
//! const SCHEMA: &[FieldSpec] = &[
//!     FieldSpec::new("name", "Name", FieldKind::Text).max_length(255),
//! ];
//!
//! let form = Form::from_schema(SCHEMA);
//! let cleaned = form.clean(&Submission::new().with_value("name", " web ")).unwrap();
//! assert_eq!(cleaned["name"], "web");
//!
//! let errors = form.clean(&Submission::new()).unwrap_err();
//! assert!(errors.contains("name"));
//! ```

pub mod errors;
pub mod field;
pub mod payload;

pub use errors::{FieldError, FieldErrors};
pub use field::{Choice, CleanedData, Field, FieldKind, FieldSpec, Form, Submission};
pub use payload::{normalize_newlines, validate_payload, PayloadError, UploadedFile, DEFAULT_MAX_UPLOAD};
