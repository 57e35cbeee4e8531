use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, Diagnostic, TextEdit, Url, WorkspaceEdit,
};

/// Key under which a rule embeds its fix in `Diagnostic.data`.
pub const QUICK_FIX_KEY: &str = "elmLsQuickFix";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickFix {
    pub title: String,
    #[serde(default)]
    pub is_preferred: bool,
    pub edits: Vec<TextEdit>,
}

impl QuickFix {
    pub fn preferred(title: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            title: title.into(),
            is_preferred: true,
            edits,
        }
    }

    pub fn into_data(self) -> serde_json::Value {
        json!({ QUICK_FIX_KEY: self })
    }

    /// Reads back a fix stored by [`QuickFix::into_data`]; other payloads yield `None`.
    pub fn from_data(data: &serde_json::Value) -> Option<Self> {
        let fix = data.get(QUICK_FIX_KEY)?;
        serde_json::from_value(fix.clone()).ok()
    }

    fn into_action(self, uri: &Url, diagnostic: &Diagnostic) -> CodeAction {
        let changes = HashMap::from([(uri.clone(), self.edits)]);
        CodeAction {
            title: self.title,
            kind: Some(CodeActionKind::QUICKFIX),
            diagnostics: Some(vec![diagnostic.clone()]),
            edit: Some(WorkspaceEdit::new(changes)),
            is_preferred: Some(self.is_preferred),
            ..CodeAction::default()
        }
    }
}

/// Quick fixes carried by the diagnostics a `textDocument/codeAction` request hands back.
pub fn quick_fixes(uri: &Url, diagnostics: &[Diagnostic]) -> Vec<CodeActionOrCommand> {
    let mut actions = Vec::new();
    for diagnostic in diagnostics {
        let Some(fix) = diagnostic.data.as_ref().and_then(QuickFix::from_data) else {
            continue;
        };
        if !fix.edits.is_empty() {
            actions.push(CodeActionOrCommand::CodeAction(fix.into_action(uri, diagnostic)));
        }
    }
    actions
}
