//! Settings validation rules.
//!
//! - The controller address must be an http(s) URL
//! - The upload limit must be positive
//! - The request timeout must be positive

use crate::config::schema::Settings;
use crate::error::{LbError, Result};

/// A single failed rule.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Check every rule and return all failures.
pub fn validate_settings(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let controller = &settings.controller;

    if controller.address.trim().is_empty() {
        errors.push(ValidationError::new(
            "missing-controller",
            "controller.address must be set (or LBCERTS_CONTROLLER)",
        ));
    } else {
        match reqwest::Url::parse(&controller.address) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "invalid-controller",
                format!(
                    "controller.address '{}' must use http or https, not '{}'",
                    controller.address,
                    url.scheme()
                ),
            )),
            Err(e) => errors.push(ValidationError::new(
                "invalid-controller",
                format!("controller.address '{}' is not a URL: {}", controller.address, e),
            )),
        }
    }

    if controller.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "zero-timeout",
            "controller.timeout_secs must be greater than 0",
        ));
    }

    if settings.uploads.max_size == 0 {
        errors.push(ValidationError::new(
            "zero-upload-limit",
            "uploads.max_size must be greater than 0",
        ));
    }

    errors
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(settings: &Settings) -> Result<()> {
    let errors = validate_settings(settings);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(LbError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
