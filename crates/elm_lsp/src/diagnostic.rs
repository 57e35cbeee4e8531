use std::hash::{Hash, Hasher};

use elm::Span;
use serde::Serialize;
use tower_lsp::lsp_types::{self, NumberOrString, Position, Range};

/// Source label of everything the rule engine reports.
pub const ELM_LS_SOURCE: &str = "Elm";

/// The producer a diagnostic list came from. Also the merge order of a file's diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// `elm make` output.
    Compile,
    /// The external linter process.
    ExternalLint,
    TypeInference,
    /// The in-process rule engine.
    Lint,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 4] = [
        DiagnosticKind::Compile,
        DiagnosticKind::ExternalLint,
        DiagnosticKind::TypeInference,
        DiagnosticKind::Lint,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            DiagnosticKind::Compile => 0,
            DiagnosticKind::ExternalLint => 1,
            DiagnosticKind::TypeInference => 2,
            DiagnosticKind::Lint => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticTag {
    Unnecessary,
    Deprecated,
}

impl DiagnosticTag {
    fn bit(self) -> u8 {
        match self {
            DiagnosticTag::Unnecessary => 1,
            DiagnosticTag::Deprecated => 2,
        }
    }
}

/// One reported problem.
///
/// Equality and hashing look at code, message, severity, range and the *set* of tags.
/// `source` and `data` are presentation details and never make two diagnostics differ.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub range: Span,
    pub tags: Vec<DiagnosticTag>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Diagnostic {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: DiagnosticSeverity,
        range: Span,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            range,
            tags: Vec::new(),
            source: ELM_LS_SOURCE.to_string(),
            data: None,
        }
    }

    pub fn with_tag(mut self, tag: DiagnosticTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    fn tag_set(&self) -> u8 {
        self.tags.iter().fold(0, |bits, tag| bits | tag.bit())
    }

    pub fn to_lsp(&self) -> lsp_types::Diagnostic {
        let tags = (!self.tags.is_empty()).then(|| {
            self.tags
                .iter()
                .map(|tag| match tag {
                    DiagnosticTag::Unnecessary => lsp_types::DiagnosticTag::UNNECESSARY,
                    DiagnosticTag::Deprecated => lsp_types::DiagnosticTag::DEPRECATED,
                })
                .collect()
        });
        lsp_types::Diagnostic {
            range: span_to_range(self.range),
            severity: Some(match self.severity {
                DiagnosticSeverity::Error => lsp_types::DiagnosticSeverity::ERROR,
                DiagnosticSeverity::Warning => lsp_types::DiagnosticSeverity::WARNING,
                DiagnosticSeverity::Information => lsp_types::DiagnosticSeverity::INFORMATION,
                DiagnosticSeverity::Hint => lsp_types::DiagnosticSeverity::HINT,
            }),
            code: Some(NumberOrString::String(self.code.clone())),
            code_description: None,
            source: Some(self.source.clone()),
            message: self.message.clone(),
            related_information: None,
            tags,
            data: self.data.clone(),
        }
    }
}

impl PartialEq for Diagnostic {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.severity == other.severity
            && self.range == other.range
            && self.tag_set() == other.tag_set()
    }
}

impl Eq for Diagnostic {}

impl Hash for Diagnostic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.message.hash(state);
        self.severity.hash(state);
        self.range.hash(state);
        self.tag_set().hash(state);
    }
}

pub fn span_to_range(span: Span) -> Range {
    Range::new(
        Position::new(span.start.line, span.start.column),
        Position::new(span.end.line, span.end.column),
    )
}
