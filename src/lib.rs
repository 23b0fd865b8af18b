//! lbcerts - TLS certificate management for load balancer pools.
//!
//! The crate provides the screens of a load balancer certificate dashboard
//! as plain library components: multi-step form workflows that upload and
//! associate certificates, a tolerant certificate list, and the session
//! handle for an embedded analytics frame. A host (web framework or the
//! bundled CLI) supplies submissions and renders the results.
//!
//! # Modules
//!
//! - [`certs`] - The add and associate certificate workflows
//! - [`cli`] - Command-line host and argument parsing
//! - [`config`] - Settings loading, overrides, and validation
//! - [`error`] - Error types and result aliases
//! - [`forms`] - Field schemas, submissions, and upload validation
//! - [`messages`] - User-facing notifications
//! - [`service`] - Controller API trait, HTTP client, and in-memory mock
//! - [`tabs`] - Certificate list and analytics tabs
//! - [`workflow`] - Step/context/commit workflow engine
//!
//! # Example
//!
//! ```
//! use lbcerts::certs::associate_certificates;
//! use lbcerts::messages::MessageLog;
//! use lbcerts::service::MockController;
//! use lbcerts::workflow::{Context, Request, WorkflowRunner};
//!
//! let controller = MockController::new()
//!     .with_certificates(&["c1", "c2"])
//!     .with_pool_certificate("P", "c1");
//! let mut messages = MessageLog::new();
//! let mut request = Request::new("admin", &controller, &mut messages);
//!
//! let workflow = associate_certificates().unwrap();
//! let seed = Context::seeded([("pool_id", "P"), ("vip_id", "V")]).unwrap();
//! let views = WorkflowRunner::new(&workflow).present(&mut request, &seed).unwrap();
//!
//! let pool = views[0].form.field("pool_cert").unwrap();
//! assert_eq!(pool.initial.as_deref(), Some("c1"));
//! ```

pub mod certs;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod messages;
pub mod service;
pub mod tabs;
pub mod workflow;

pub use error::{LbError, Result};
