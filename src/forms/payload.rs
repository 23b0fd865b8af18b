//! Uploaded file validation.
//!
//! Key and certificate material may arrive as an uploaded file. Before it
//! is staged for the controller it must fit the upload limit and decode as
//! text; newlines are normalised to `\n`.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Default upload limit in bytes (16 KiB).
pub const DEFAULT_MAX_UPLOAD: usize = 16 * 1024;

static NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r").expect("newline pattern compiles"));

/// Why an uploaded payload was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload is bigger than the configured limit.
    #[error("File exceeds maximum size ({}kb)", .max / 1024)]
    TooLarge { size: usize, max: usize },

    /// The payload could not be read as text.
    #[error("{message}")]
    Malformed { message: String },
}

/// A file posted with a form.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side file name.
    pub filename: String,
    /// Size declared by the client.
    pub size: usize,
    /// Raw content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Create an upload whose declared size matches its content.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self {
            filename: filename.into(),
            size: content.len(),
            content,
        }
    }

    /// Override the size the client declared.
    pub fn with_declared_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
///
/// # Example
///
/// ```
/// use lbcerts::forms::normalize_newlines;
///
/// assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
/// ```
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    NEWLINES.replace_all(text, "\n")
}

/// Validate an uploaded payload and return its normalised text.
///
/// The larger of the declared and actual size is checked against
/// `max_size`, so a client cannot slip past the limit by under-declaring.
/// Empty uploads are accepted and yield an empty string.
///
/// # Example
///
/// ```
/// use lbcerts::forms::{validate_payload, PayloadError, UploadedFile};
///
/// let file = UploadedFile::new("key.pem", "KEY\r\n");
/// assert_eq!(validate_payload(&file, 16 * 1024).unwrap(), "KEY\n");
///
/// let big = UploadedFile::new("big.pem", vec![b'a'; 20]);
/// assert!(matches!(
///     validate_payload(&big, 10),
///     Err(PayloadError::TooLarge { size: 20, max: 10 })
/// ));
/// ```
pub fn validate_payload(file: &UploadedFile, max_size: usize) -> Result<String, PayloadError> {
    let size = file.size.max(file.content.len());
    if size > max_size {
        return Err(PayloadError::TooLarge {
            size,
            max: max_size,
        });
    }

    let text = std::str::from_utf8(&file.content).map_err(|e| PayloadError::Malformed {
        message: e.to_string(),
    })?;

    Ok(normalize_newlines(text).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_text_at_the_limit() {
        let file = UploadedFile::new("cert.pem", vec![b'x'; DEFAULT_MAX_UPLOAD]);
        let text = validate_payload(&file, DEFAULT_MAX_UPLOAD).unwrap();
        assert_eq!(text.len(), DEFAULT_MAX_UPLOAD);
    }

    #[test]
    fn rejects_one_byte_over_the_limit() {
        let file = UploadedFile::new("cert.pem", vec![b'x'; DEFAULT_MAX_UPLOAD + 1]);
        let err = validate_payload(&file, DEFAULT_MAX_UPLOAD).unwrap_err();
        assert_eq!(
            err,
            PayloadError::TooLarge {
                size: DEFAULT_MAX_UPLOAD + 1,
                max: DEFAULT_MAX_UPLOAD
            }
        );
        assert_eq!(err.to_string(), "File exceeds maximum size (16kb)");
    }

    #[test]
    fn declared_size_counts_even_when_content_is_small() {
        let file = UploadedFile::new("cert.pem", "tiny").with_declared_size(DEFAULT_MAX_UPLOAD * 2);
        assert!(matches!(
            validate_payload(&file, DEFAULT_MAX_UPLOAD),
            Err(PayloadError::TooLarge { .. })
        ));
    }

    #[test]
    fn size_is_checked_before_content() {
        let mut content = vec![0xff, 0xfe];
        content.extend(vec![b'a'; DEFAULT_MAX_UPLOAD]);
        let file = UploadedFile::new("junk.bin", content);
        assert!(matches!(
            validate_payload(&file, DEFAULT_MAX_UPLOAD),
            Err(PayloadError::TooLarge { .. })
        ));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let file = UploadedFile::new("key.der", vec![0x30, 0x82, 0xff, 0xfe]);
        let err = validate_payload(&file, DEFAULT_MAX_UPLOAD).unwrap_err();
        assert!(matches!(err, PayloadError::Malformed { .. }));
    }

    #[test]
    fn empty_upload_is_accepted() {
        let file = UploadedFile::new("empty.pem", Vec::new());
        assert_eq!(validate_payload(&file, DEFAULT_MAX_UPLOAD).unwrap(), "");
    }

    #[test]
    fn normalizes_mixed_line_endings() {
        let pem = "-----BEGIN CERTIFICATE-----\r\nMIIB\rAAAA\n-----END CERTIFICATE-----\r\n";
        let file = UploadedFile::new("cert.pem", pem);
        assert_eq!(
            validate_payload(&file, DEFAULT_MAX_UPLOAD).unwrap(),
            "-----BEGIN CERTIFICATE-----\nMIIB\nAAAA\n-----END CERTIFICATE-----\n"
        );
    }

    #[test]
    fn normalize_leaves_unix_text_borrowed() {
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn debug_omits_content() {
        let file = UploadedFile::new("key.pem", "SECRET KEY");
        assert!(!format!("{:?}", file).contains("SECRET"));
    }
}
