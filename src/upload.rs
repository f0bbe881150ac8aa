//! Upload form model and local validation
//!
//! Validation runs before any network call: a form that fails it never
//! produces an [`UploadJob`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Client-side constraints from config
#[derive(Debug, Clone)]
pub struct UploadRules {
    pub accepted_extensions: Vec<String>,
    /// Advisory only: larger files get a note, the server enforces the limit
    pub max_bytes: u64,
}

impl Default for UploadRules {
    fn default() -> Self {
        Self {
            accepted_extensions: default_extensions(),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

pub fn default_extensions() -> Vec<String> {
    ["pdf", "doc", "docx", "txt"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadValidationError {
    #[error("Please choose a file to upload.")]
    NoFile,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Unsupported file type '{extension}'. Accepted: {accepted}")]
    UnsupportedType { extension: String, accepted: String },

    #[error("Please enter your business name.")]
    NoBusinessName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadField {
    #[default]
    File,
    BusinessName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub file_path: String,
    pub business_name: String,
    pub focus: UploadField,
    /// Local validation error from the last submit
    pub error: Option<String>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(file_path: &str, business_name: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            business_name: business_name.to_string(),
            ..Self::default()
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
        self.error = None;
    }

    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
        self.error = None;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            UploadField::File => UploadField::BusinessName,
            UploadField::BusinessName => UploadField::File,
        };
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            UploadField::File => &mut self.file_path,
            UploadField::BusinessName => &mut self.business_name,
        }
    }

    /// Check the form locally and build the job to send.
    pub fn validate(&self, rules: &UploadRules) -> Result<UploadJob, UploadValidationError> {
        let raw = self.file_path.trim();
        if raw.is_empty() {
            return Err(UploadValidationError::NoFile);
        }

        let path = expand_path(raw);
        let metadata = std::fs::metadata(&path)
            .map_err(|_| UploadValidationError::FileNotFound(path.display().to_string()))?;
        if !metadata.is_file() {
            return Err(UploadValidationError::NotAFile(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !rules
            .accepted_extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&extension))
        {
            return Err(UploadValidationError::UnsupportedType {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
                accepted: rules.accepted_extensions.join(", "),
            });
        }

        let business_name = self.business_name.trim();
        if business_name.is_empty() {
            return Err(UploadValidationError::NoBusinessName);
        }

        Ok(UploadJob {
            file: path,
            business_name: business_name.to_string(),
            size: metadata.len(),
            status: UploadStatus::Pending,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Success,
    Failure,
}

/// One form submission; dropped once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub file: PathBuf,
    pub business_name: String,
    pub size: u64,
    pub status: UploadStatus,
}

impl UploadJob {
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file.display().to_string())
    }

    pub fn resolve(mut self, succeeded: bool) -> Self {
        self.status = if succeeded {
            UploadStatus::Success
        } else {
            UploadStatus::Failure
        };
        self
    }

    /// The form to show again on retry, inputs preserved
    pub fn to_form(&self) -> UploadForm {
        UploadForm::with_values(&self.file.display().to_string(), &self.business_name)
    }
}

/// What the upload panel currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPanel {
    Form(UploadForm),
    Uploading {
        file_name: String,
        business_name: String,
        /// Advisory note (e.g. oversized file)
        note: Option<String>,
    },
    Succeeded {
        business_name: String,
        message: Option<String>,
    },
    Failed {
        message: String,
        form: UploadForm,
    },
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

pub fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

pub fn format_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / MIB)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_rejected_first() {
        let form = UploadForm::with_values("", "");
        assert_eq!(
            form.validate(&UploadRules::default()),
            Err(UploadValidationError::NoFile)
        );
    }

    #[test]
    fn test_nonexistent_file() {
        let form = UploadForm::with_values("/definitely/not/here.pdf", "Acme");
        assert!(matches!(
            form.validate(&UploadRules::default()),
            Err(UploadValidationError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let form = UploadForm::with_values(dir.path().to_str().unwrap(), "Acme");
        assert!(matches!(
            form.validate(&UploadRules::default()),
            Err(UploadValidationError::NotAFile(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.png");
        fs::write(&path, b"png").unwrap();
        let form = UploadForm::with_values(path.to_str().unwrap(), "Acme");
        match form.validate(&UploadRules::default()) {
            Err(UploadValidationError::UnsupportedType { extension, accepted }) => {
                assert_eq!(extension, "png");
                assert!(accepted.contains("pdf"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_business_name_required() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.txt");
        fs::write(&path, b"coffee").unwrap();
        let form = UploadForm::with_values(path.to_str().unwrap(), "   ");
        assert_eq!(
            form.validate(&UploadRules::default()),
            Err(UploadValidationError::NoBusinessName)
        );
    }

    #[test]
    fn test_valid_form_builds_pending_job() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Brochure.PDF");
        fs::write(&path, b"%PDF-1.4").unwrap();
        let form = UploadForm::with_values(path.to_str().unwrap(), " Acme ");
        let job = form.validate(&UploadRules::default()).unwrap();
        assert_eq!(job.business_name, "Acme");
        assert_eq!(job.size, 8);
        assert_eq!(job.status, UploadStatus::Pending);
        assert_eq!(job.file_name(), "Brochure.PDF");
        assert_eq!(job.resolve(true).status, UploadStatus::Success);
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut form = UploadForm::new();
        form.error = Some("old".into());
        form.push_char('a');
        form.toggle_focus();
        form.push_char('B');
        form.push_char('x');
        form.pop_char();
        assert_eq!(form.file_path, "a");
        assert_eq!(form.business_name, "B");
        assert!(form.error.is_none());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_for(Path::new("a.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("a.txt")), "text/plain");
        assert_eq!(mime_for(Path::new("a")), "application/octet-stream");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(16 * 1024 * 1024), "16.0 MB");
    }
}
