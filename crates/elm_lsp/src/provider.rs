//! Reacts to document lifecycle and configuration events by asking the right producers
//! for fresh diagnostics and feeding the results to the aggregator.

use std::sync::Arc;

use elm::Module;
use parking_lot::RwLock;
use tower_lsp::lsp_types::Url;

use crate::aggregator::DiagnosticsHandle;
use crate::config::DiagnosticsConfig;
use crate::diagnostic::{DiagnosticKind, DiagnosticSeverity};
use crate::error::DiagnosticsError;
use crate::rules::RuleEngine;
use crate::sources::{FileDiagnosticsSource, NoDiagnostics, ProjectDiagnosticsSource};
use crate::workspace::{WorkspaceProvider, WorkspaceSnapshot};

pub struct DiagnosticsProvider {
    workspaces: Arc<dyn WorkspaceProvider>,
    diagnostics: DiagnosticsHandle,
    type_checker: Arc<dyn FileDiagnosticsSource>,
    compiler: Option<Arc<dyn ProjectDiagnosticsSource>>,
    external_linter: Option<Arc<dyn ProjectDiagnosticsSource>>,
    config: RwLock<DiagnosticsConfig>,
    rules: RwLock<RuleEngine>,
}

impl DiagnosticsProvider {
    pub fn new(workspaces: Arc<dyn WorkspaceProvider>, diagnostics: DiagnosticsHandle) -> Self {
        Self {
            workspaces,
            diagnostics,
            type_checker: Arc::new(NoDiagnostics),
            compiler: None,
            external_linter: None,
            config: RwLock::new(DiagnosticsConfig::default()),
            rules: RwLock::new(RuleEngine::new()),
        }
    }

    pub fn with_type_checker(mut self, source: Arc<dyn FileDiagnosticsSource>) -> Self {
        self.type_checker = source;
        self
    }

    pub fn with_compiler(mut self, source: Arc<dyn ProjectDiagnosticsSource>) -> Self {
        self.compiler = Some(source);
        self
    }

    pub fn with_external_linter(mut self, source: Arc<dyn ProjectDiagnosticsSource>) -> Self {
        self.external_linter = Some(source);
        self
    }

    pub fn with_config(self, config: DiagnosticsConfig) -> Self {
        *self.rules.write() = RuleEngine::with_disabled(&config.disabled_rules);
        *self.config.write() = config;
        self
    }

    pub fn config(&self) -> DiagnosticsConfig {
        self.config.read().clone()
    }

    pub async fn opened(&self, uri: &Url) -> Result<(), DiagnosticsError> {
        self.refresh_all(uri).await
    }

    pub async fn saved(&self, uri: &Url) -> Result<(), DiagnosticsError> {
        self.refresh_all(uri).await
    }

    /// Edits only rerun the in-process producers, and not at all in save-only mode.
    pub async fn changed(&self, uri: &Url) -> Result<(), DiagnosticsError> {
        if self.config.read().only_update_diagnostics_on_save {
            return Ok(());
        }
        self.refresh_file(uri).await.map(|_| ())
    }

    pub fn deleted(&self, uri: &Url) {
        self.diagnostics.delete(uri.clone());
    }

    /// Applies new client settings. Invalid settings are rejected and the old ones stay.
    pub fn configuration_changed(
        &self,
        settings: serde_json::Value,
    ) -> Result<(), DiagnosticsError> {
        let config = DiagnosticsConfig::from_settings(settings)?;
        *self.rules.write() = RuleEngine::with_disabled(&config.disabled_rules);
        let previous = std::mem::replace(&mut *self.config.write(), config.clone());

        if !config.lint_enabled() {
            if previous.lint_enabled() {
                tracing::debug!("rule diagnostics disabled; clearing");
                self.diagnostics.clear_kind(DiagnosticKind::Lint);
            }
        } else if !previous.lint_enabled()
            || previous.disabled_rules != config.disabled_rules
            || previous.excluded_paths != config.excluded_paths
        {
            self.lint_tracked_files();
        }

        if previous.external_lint_enabled() && !config.external_lint_enabled() {
            self.diagnostics.clear_kind(DiagnosticKind::ExternalLint);
        }
        Ok(())
    }

    async fn refresh_all(&self, uri: &Url) -> Result<(), DiagnosticsError> {
        let workspace = self.refresh_file(uri).await?;
        if let Some(compiler) = &self.compiler {
            self.spawn_project_run(compiler.clone(), uri, workspace.clone(), None);
        }
        let severity = self.config.read().elm_review_diagnostics.severity();
        if let (Some(linter), Some(severity)) = (&self.external_linter, severity) {
            self.spawn_project_run(linter.clone(), uri, workspace, Some(severity));
        }
        Ok(())
    }

    /// Lint and type inference for one file. A failing type checker is logged and leaves
    /// every other slot alone.
    async fn refresh_file(
        &self,
        uri: &Url,
    ) -> Result<Arc<dyn WorkspaceSnapshot>, DiagnosticsError> {
        let (workspace, module) = self.resolve(uri)?;
        self.lint(uri, &module, workspace.as_ref());

        match self
            .type_checker
            .diagnostics(uri, module, workspace.clone())
            .await
        {
            Ok(diagnostics) => {
                self.diagnostics
                    .update(uri.clone(), DiagnosticKind::TypeInference, diagnostics);
            }
            Err(err) => {
                tracing::warn!(uri = %uri, error = %err, "type inference diagnostics failed");
            }
        }
        Ok(workspace)
    }

    fn resolve(
        &self,
        uri: &Url,
    ) -> Result<(Arc<dyn WorkspaceSnapshot>, Arc<Module>), DiagnosticsError> {
        let workspace = self.workspaces.snapshot_for(uri).inspect_err(|err| {
            if err.is_missing_workspace() {
                tracing::warn!(uri = %uri, "file is outside every workspace folder; skipping");
            }
        })?;
        let module = workspace
            .tree(uri)
            .ok_or_else(|| DiagnosticsError::MissingTree(uri.clone()))?;
        Ok((workspace, module))
    }

    fn lint(&self, uri: &Url, module: &Module, workspace: &dyn WorkspaceSnapshot) {
        let excluded = {
            let config = self.config.read();
            if !config.lint_enabled() {
                return;
            }
            uri.to_file_path()
                .ok()
                .and_then(|path| {
                    path.strip_prefix(workspace.root())
                        .ok()
                        .map(|relative| config.is_excluded(relative))
                })
                .unwrap_or(false)
        };
        let diagnostics = if excluded {
            Vec::new()
        } else {
            self.rules.read().evaluate(module, uri, workspace)
        };
        self.diagnostics
            .update(uri.clone(), DiagnosticKind::Lint, diagnostics);
    }

    fn lint_tracked_files(&self) {
        for uri in self.workspaces.tracked_files() {
            match self.resolve(&uri) {
                Ok((workspace, module)) => self.lint(&uri, &module, workspace.as_ref()),
                Err(err) => tracing::debug!(uri = %uri, error = %err, "skipping lint"),
            }
        }
    }

    /// Project runs are not awaited: their results land whenever they finish, through
    /// `replace_all` so files they stop reporting get cleared.
    fn spawn_project_run(
        &self,
        source: Arc<dyn ProjectDiagnosticsSource>,
        uri: &Url,
        workspace: Arc<dyn WorkspaceSnapshot>,
        severity: Option<DiagnosticSeverity>,
    ) {
        let diagnostics = self.diagnostics.clone();
        let uri = uri.clone();
        tokio::spawn(async move {
            let kind = source.kind();
            match source.diagnostics(&uri, workspace).await {
                Ok(mut results) => {
                    if let Some(severity) = severity {
                        results
                            .values_mut()
                            .flatten()
                            .for_each(|diagnostic| diagnostic.severity = severity);
                    }
                    diagnostics.replace_all(kind, results);
                }
                Err(err) => {
                    tracing::warn!(
                        uri = %uri,
                        kind = ?kind,
                        error = %err,
                        "project diagnostics failed"
                    );
                }
            }
        });
    }
}
