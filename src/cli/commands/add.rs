//! Add command implementation.
//!
//! The `lbcerts add` command submits the add-certificate workflow. Key and
//! certificate can each be given inline or as a file; files go through the
//! same upload checks as a browser upload.

use std::fs;
use std::path::Path;

use anyhow::Context as _;

use crate::certs::add_certificate;
use crate::cli::args::AddArgs;
use crate::error::Result;
use crate::forms::{Submission, UploadedFile};
use crate::workflow::{Context, Request, WorkflowRunner};

use super::dispatcher::{Command, CommandResult};
use super::display::report_result;

/// The add command implementation.
pub struct AddCommand {
    args: AddArgs,
    upload_limit: usize,
}

impl AddCommand {
    /// Create a new add command.
    pub fn new(args: AddArgs, upload_limit: usize) -> Self {
        Self { args, upload_limit }
    }

    /// Build the form submission from the arguments.
    pub fn submission(&self) -> Result<Submission> {
        let mut submission = Submission::new().with_value("name", &self.args.name);
        if let Some(passphrase) = &self.args.passphrase {
            submission.insert_value("passphrase", passphrase);
        }

        let sources = [
            ("key", &self.args.key, &self.args.key_file),
            ("cert", &self.args.cert, &self.args.cert_file),
        ];
        for (prefix, text, file) in sources {
            match (text, file) {
                (_, Some(path)) => {
                    submission.insert_value(format!("{}_source", prefix), "file");
                    submission.insert_file(format!("{}_upload", prefix), read_upload(path)?);
                }
                (Some(text), None) => {
                    submission.insert_value(format!("{}_source", prefix), "raw");
                    submission.insert_value(format!("{}_data", prefix), text);
                }
                (None, None) => {}
            }
        }
        Ok(submission)
    }
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedFile::new(filename, content))
}

impl Command for AddCommand {
    fn execute(&self, request: &mut Request<'_>) -> Result<CommandResult> {
        let workflow = add_certificate(self.upload_limit)?;
        let submission = self.submission()?;

        let result = WorkflowRunner::new(&workflow).run(request, Context::new(), &submission);
        if let Some(id) = result.context.get("certificate_id") {
            request.messages.info(&format!("Certificate id: {}", id));
        }
        Ok(report_result(request.messages, &result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageLog;
    use crate::service::MockController;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args() -> AddArgs {
        AddArgs {
            name: "web".into(),
            key: Some("KEY".into()),
            cert: Some("CERT".into()),
            passphrase: Some("pw".into()),
            ..AddArgs::default()
        }
    }

    #[test]
    fn inline_material_is_raw_source() {
        let submission = AddCommand::new(args(), 1024).submission().unwrap();
        assert_eq!(submission.value("key_source"), Some("raw"));
        assert_eq!(submission.value("key_data"), Some("KEY"));
        assert!(submission.file("key_upload").is_none());
    }

    #[test]
    fn file_material_is_uploaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("web.crt");
        fs::write(&path, "FILE CERT").unwrap();

        let mut args = args();
        args.cert = None;
        args.cert_file = Some(path);
        let submission = AddCommand::new(args, 1024).submission().unwrap();

        assert_eq!(submission.value("cert_source"), Some("file"));
        let upload = submission.file("cert_upload").unwrap();
        assert_eq!(upload.filename, "web.crt");
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let mut args = args();
        args.key_file = Some(PathBuf::from("/nonexistent/key.pem"));
        let err = AddCommand::new(args, 1024).submission().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/key.pem"));
    }

    #[test]
    fn execute_reports_certificate_id() {
        let controller = MockController::new();
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let result = AddCommand::new(args(), 1024).execute(&mut request).unwrap();

        assert!(result.success);
        assert!(log.has_success("Added certificate"));
        assert!(log.entries().iter().any(|(_, m)| m.starts_with("Certificate id: cert-")));
    }

    #[test]
    fn missing_passphrase_is_invalid() {
        let mut args = args();
        args.passphrase = None;
        let controller = MockController::new();
        let mut log = MessageLog::new();
        let mut request = Request::new("admin", &controller, &mut log);

        let result = AddCommand::new(args, 1024).execute(&mut request).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(log.has_error("passphrase: This field is required."));
        assert_eq!(controller.call_count("create_certificate"), 0);
    }
}
