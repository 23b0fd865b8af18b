//! Error types for lbcerts operations.
//!
//! This module defines [`LbError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Field-level input problems are not `LbError`s: they are collected as
//!   [`FieldErrors`](crate::forms::FieldErrors) and reported per field
//! - Controller failures surface as [`ServiceError`] and are converted into
//!   user-facing messages by the component that made the call
//! - `LbError` covers what is left: configuration, workflow definition
//!   mistakes and the one fatal deployment error ([`LbError::AssetMissing`])

use std::path::PathBuf;
use thiserror::Error;

use crate::service::ServiceError;

/// Core error type for lbcerts operations.
#[derive(Debug, Error)]
pub enum LbError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A step depends on a key that only a later step contributes.
    #[error("Step '{step}' depends on '{key}', which is only contributed by later step '{provider}'")]
    UnsatisfiableDependency {
        step: String,
        key: String,
        provider: String,
    },

    /// A step needs a key that neither the caller nor an earlier step provides.
    #[error("Workflow '{workflow}' step '{step}' needs '{key}' to be provided")]
    MissingDependency {
        workflow: String,
        step: String,
        key: String,
    },

    /// A context key was contributed twice during one workflow run.
    #[error("Context key '{key}' has already been contributed")]
    ContextKeyConflict { key: String },

    /// The static analytics template is missing from the deployment.
    #[error("Missing analytics template: {path}")]
    AssetMissing { path: PathBuf },

    /// Controller call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for lbcerts operations.
pub type Result<T> = std::result::Result<T, LbError>;
