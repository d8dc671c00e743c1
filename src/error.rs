//! Error types for the extraction pipeline.
//!
//! Individual-file problems never abort the pipeline; they are recorded
//! as [`Diagnostic`]s and surfaced as aggregate counts. `IndexError` is
//! reserved for failures that genuinely stop a run (bad arguments,
//! unusable project root, writer connection loss).

use std::path::PathBuf;
use thiserror::Error;

pub type IndexResult<T> = Result<T, IndexError>;

/// Failures that stop a pipeline run.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project path '{path}' does not exist or is not a directory")]
    ProjectNotFound { path: PathBuf },

    #[error("Unsupported file type '{extension}' for '{path}'. Supported: .kt, .kts, .java, .ts, .tsx, .js, .jsx")]
    UnsupportedFileType { path: PathBuf, extension: String },

    #[error("Failed to initialize {language} grammar: {reason}")]
    GrammarInit { language: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Graph writer failure during {operation}: {cause}")]
    Writer { operation: String, cause: String },

    #[error("{0}")]
    General(String),
}

/// Per-file issue captured during a run. Never raised as an error past
/// `build` or `resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Source text could not be read; the file was skipped.
    IoFailure,
    /// The CST had a fatal error and no partial tree was available.
    ParseFailure,
    /// The CST had errors but a partial tree was extracted.
    PartialParse,
    /// A type participated in an inheritance cycle; the closure was truncated.
    HierarchyCycle,
    /// Two declarations produced the same FQN; the later one won `by_fqn`.
    DuplicateFqn,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_actionable() {
        let err = IndexError::ProjectNotFound {
            path: PathBuf::from("/nope"),
        };
        assert!(err.to_string().contains("/nope"));

        let err = IndexError::UnsupportedFileType {
            path: PathBuf::from("a.rb"),
            extension: "rb".into(),
        };
        assert!(err.to_string().contains("rb"));
        assert!(err.to_string().contains("Supported"));
    }
}
