//! Diagnostics for Elm sources: a rule engine over the syntax tree, and the aggregation
//! and publishing layer that merges it with the type checker, `elm make` and the external
//! linter.

mod aggregator;
mod code_actions;
mod config;
mod diagnostic;
mod error;
mod file_diagnostics;
mod provider;
mod publish;
mod rules;
mod sources;
mod usage;
mod walk;
mod workspace;


pub use aggregator::{DiagnosticsAggregator, DiagnosticsHandle, DiagnosticsStore};
pub use code_actions::{QUICK_FIX_KEY, QuickFix, quick_fixes};
pub use config::{DiagnosticsConfig, ExternalLintLevel};
pub use diagnostic::{
    Diagnostic, DiagnosticKind, DiagnosticSeverity, DiagnosticTag, ELM_LS_SOURCE, span_to_range,
};
pub use error::DiagnosticsError;
pub use file_diagnostics::FileDiagnostics;
pub use provider::DiagnosticsProvider;
pub use publish::{DEFAULT_COALESCE_WINDOW, DiagnosticsSink};
pub use rules::{Rule, RuleEngine};
pub use sources::{FileDiagnosticsSource, NoDiagnostics, ProjectDiagnosticsSource};
pub use usage::{DeclId, ModuleUsage};
pub use workspace::{
    ModuleInterface, WorkspaceIndex, WorkspaceProvider, WorkspaceSnapshot, Workspaces,
};
