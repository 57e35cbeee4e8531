use std::path::Path;

use serde::Deserialize;

use crate::diagnostic::DiagnosticSeverity;
use crate::error::DiagnosticsError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalLintLevel {
    #[default]
    Off,
    Warning,
    Error,
}

impl ExternalLintLevel {
    /// Severity forced onto external linter diagnostics, or `None` when the linter is off.
    pub fn severity(self) -> Option<DiagnosticSeverity> {
        match self {
            ExternalLintLevel::Off => None,
            ExternalLintLevel::Warning => Some(DiagnosticSeverity::Warning),
            ExternalLintLevel::Error => Some(DiagnosticSeverity::Error),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    /// Turns the in-process rule engine off.
    #[serde(rename = "disableElmLSDiagnostics")]
    pub disable_elm_ls_diagnostics: bool,
    pub only_update_diagnostics_on_save: bool,
    pub elm_review_diagnostics: ExternalLintLevel,
    /// Rule codes (`unused_import`, ...) the engine should skip.
    pub disabled_rules: Vec<String>,
    /// Workspace-relative path prefixes that are never linted.
    pub excluded_paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSettings {
    #[serde(rename = "elmLS")]
    elm_ls: Option<serde_json::Value>,
}

impl DiagnosticsConfig {
    /// Reads `workspace/didChangeConfiguration` settings, either flat or nested under `elmLS`.
    pub fn from_settings(settings: serde_json::Value) -> Result<Self, DiagnosticsError> {
        if settings.is_null() {
            return Ok(Self::default());
        }
        let nested = serde_json::from_value::<ClientSettings>(settings.clone())
            .ok()
            .and_then(|wrapper| wrapper.elm_ls);
        Ok(serde_json::from_value(nested.unwrap_or(settings))?)
    }

    pub fn lint_enabled(&self) -> bool {
        !self.disable_elm_ls_diagnostics
    }

    pub fn external_lint_enabled(&self) -> bool {
        self.elm_review_diagnostics.severity().is_some()
    }

    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.excluded_paths
            .iter()
            .map(|prefix| prefix.trim_end_matches('/'))
            .filter(|prefix| !prefix.is_empty())
            .any(|prefix| relative.starts_with(prefix))
    }
}
