use tower_lsp::lsp_types::Url;

use crate::diagnostic::DiagnosticKind;

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    /// The file does not belong to any known workspace folder.
    #[error("no workspace contains {0}")]
    NoWorkspace(Url),
    #[error("no syntax tree for {0}")]
    MissingTree(Url),
    #[error("{kind:?} diagnostics failed: {message}")]
    Source { kind: DiagnosticKind, message: String },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl DiagnosticsError {
    /// Lookup failures are per-file and recoverable; callers may skip the file and carry on.
    pub fn is_missing_workspace(&self) -> bool {
        matches!(self, DiagnosticsError::NoWorkspace(_))
    }

    pub fn source_failed(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        DiagnosticsError::Source {
            kind,
            message: message.into(),
        }
    }
}
