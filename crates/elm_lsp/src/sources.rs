//! Diagnostics producers that live outside this crate.

use std::sync::Arc;

use elm::Module;
use rustc_hash::FxHashMap;
use tower_lsp::lsp_types::Url;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::DiagnosticsError;
use crate::workspace::WorkspaceSnapshot;

/// Per-file analysis, e.g. the type checker.
#[tower_lsp::async_trait]
pub trait FileDiagnosticsSource: Send + Sync + 'static {
    async fn diagnostics(
        &self,
        uri: &Url,
        module: Arc<Module>,
        workspace: Arc<dyn WorkspaceSnapshot>,
    ) -> Result<Vec<Diagnostic>, DiagnosticsError>;
}

/// Whole-project analysis (`elm make`, the external linter). The result lists only the files
/// with problems; anything it leaves out is considered clean.
#[tower_lsp::async_trait]
pub trait ProjectDiagnosticsSource: Send + Sync + 'static {
    fn kind(&self) -> DiagnosticKind;

    async fn diagnostics(
        &self,
        trigger: &Url,
        workspace: Arc<dyn WorkspaceSnapshot>,
    ) -> Result<FxHashMap<Url, Vec<Diagnostic>>, DiagnosticsError>;
}

/// Stand-in for a producer the session does not have.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

#[tower_lsp::async_trait]
impl FileDiagnosticsSource for NoDiagnostics {
    async fn diagnostics(
        &self,
        _uri: &Url,
        _module: Arc<Module>,
        _workspace: Arc<dyn WorkspaceSnapshot>,
    ) -> Result<Vec<Diagnostic>, DiagnosticsError> {
        Ok(Vec::new())
    }
}
