//! JSON report types.
//!
//! A run produces one [`FileReport`] per file. The CLI prints them, wrapped
//! in a [`RunReport`], when `--json` is given; errors that stop the whole
//! run are printed as an [`ErrorResponse`].

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, TugstyleError};
use crate::FixResult;

/// Version of the JSON report shape.
pub const SCHEMA_VERSION: &str = "1";

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// No rule changed anything.
    Unchanged,
    /// At least one rule changed the file; it was written back unless this
    /// was a dry run.
    Fixed,
    /// The suppression filter excludes the file.
    Suppressed,
    /// Parsing, rewriting or writing failed.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_rules: Vec<String>,
    /// Passes the fixpoint loop ran.
    #[serde(default)]
    pub passes: usize,
    #[serde(default = "default_true")]
    pub converged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FileReport {
    pub fn fixed(path: &Path, result: &FixResult) -> Self {
        let status = if result.is_changed() {
            FileStatus::Fixed
        } else {
            FileStatus::Unchanged
        };
        FileReport {
            path: path.display().to_string(),
            status,
            changed_rules: result.changed_rules.iter().cloned().collect(),
            passes: result.outcome.passes(),
            converged: result.outcome.is_converged(),
            error: None,
        }
    }

    pub fn suppressed(path: &Path) -> Self {
        FileReport {
            path: path.display().to_string(),
            status: FileStatus::Suppressed,
            changed_rules: Vec::new(),
            passes: 0,
            converged: true,
            error: None,
        }
    }

    pub fn failed(path: &Path, err: &TugstyleError) -> Self {
        FileReport {
            path: path.display().to_string(),
            status: FileStatus::Failed,
            changed_rules: Vec::new(),
            passes: 0,
            converged: true,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub files: usize,
    pub fixed: usize,
    pub unchanged: usize,
    pub suppressed: usize,
    pub failed: usize,
    pub not_converged: usize,
}

impl Summary {
    pub fn of(files: &[FileReport]) -> Self {
        let mut summary = Summary {
            files: files.len(),
            ..Summary::default()
        };
        for file in files {
            match file.status {
                FileStatus::Fixed => summary.fixed += 1,
                FileStatus::Unchanged => summary.unchanged += 1,
                FileStatus::Suppressed => summary.suppressed += 1,
                FileStatus::Failed => summary.failed += 1,
            }
            if !file.converged {
                summary.not_converged += 1;
            }
        }
        summary
    }
}

/// The result of a `fix` or `check` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: String,
    pub schema_version: String,
    /// Whether files were written.
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

impl RunReport {
    pub fn new(files: Vec<FileReport>, dry_run: bool) -> Self {
        let summary = Summary::of(&files);
        RunReport {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            dry_run,
            files,
            summary,
        }
    }

    pub fn changed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.status == FileStatus::Fixed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u8,
    pub message: String,
}

impl ErrorInfo {
    pub fn from_error(err: &TugstyleError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &TugstyleError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Write `response` as pretty-printed JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn report(path: &str, status: FileStatus, converged: bool) -> FileReport {
        FileReport {
            path: path.to_string(),
            status,
            changed_rules: Vec::new(),
            passes: 1,
            converged,
            error: None,
        }
    }

    #[test]
    fn test_summary_counts() {
        let files = vec![
            report("A.java", FileStatus::Fixed, true),
            report("B.java", FileStatus::Fixed, false),
            report("C.java", FileStatus::Unchanged, true),
            report("D.java", FileStatus::Suppressed, true),
            report("E.java", FileStatus::Failed, true),
        ];
        let run = RunReport::new(files, true);
        assert_eq!(
            run.summary,
            Summary {
                files: 5,
                fixed: 2,
                unchanged: 1,
                suppressed: 1,
                failed: 1,
                not_converged: 1,
            }
        );
        assert_eq!(run.changed_files().count(), 2);
    }

    #[test]
    fn test_file_report_shape() {
        let mut fixed = report("src/A.java", FileStatus::Fixed, true);
        fixed.changed_rules = vec!["NeedBraces".to_string()];
        let value = serde_json::to_value(&fixed).unwrap();
        assert_eq!(
            value,
            json!({
                "path": "src/A.java",
                "status": "fixed",
                "changed_rules": ["NeedBraces"],
                "passes": 1,
                "converged": true,
            })
        );

        let failed = FileReport::failed(
            &PathBuf::from("B.java"),
            &TugstyleError::internal("boom"),
        );
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "internal error: boom");
        assert!(value.get("changed_rules").is_none());
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::from_error(&TugstyleError::invalid_args("no paths"));
        let mut out = Vec::new();
        emit_response(&response, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["error"]["code"], 2);
    }
}
