//! The in-process rule engine.
//!
//! Every rule is an independent, pure check over the syntax tree. Rules never see each
//! other's output; the engine concatenates their results in `Rule::ALL` order.

mod imports;
mod lists;
mod style;
mod unused;

use std::cell::OnceCell;

use elm::{Module, Span};
use rustc_hash::FxHashSet;
use tower_lsp::lsp_types::Url;

use crate::diagnostic::{Diagnostic, DiagnosticSeverity, DiagnosticTag};
use crate::usage::ModuleUsage;
use crate::workspace::WorkspaceSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    BooleanCaseExpr,
    UnusedTopLevel,
    UnusedImport,
    UnusedAlias,
    UnusedImportedValue,
    UnusedPattern,
    UnusedTypeAlias,
    UnusedValueConstructor,
    DropConsOfItemAndList,
    DropConcatOfLists,
    UseConsOverConcat,
    SingleFieldRecord,
    UnnecessaryListConcat,
    UnnecessaryPortModule,
    NoUncurriedPrefix,
}

impl Rule {
    pub const ALL: [Rule; 15] = [
        Rule::BooleanCaseExpr,
        Rule::UnusedTopLevel,
        Rule::UnusedImport,
        Rule::UnusedAlias,
        Rule::UnusedImportedValue,
        Rule::UnusedPattern,
        Rule::UnusedTypeAlias,
        Rule::UnusedValueConstructor,
        Rule::DropConsOfItemAndList,
        Rule::DropConcatOfLists,
        Rule::UseConsOverConcat,
        Rule::SingleFieldRecord,
        Rule::UnnecessaryListConcat,
        Rule::UnnecessaryPortModule,
        Rule::NoUncurriedPrefix,
    ];

    /// Stable public code. Never renamed.
    pub fn code(self) -> &'static str {
        match self {
            Rule::BooleanCaseExpr => "boolean_case_expr",
            Rule::UnusedTopLevel => "unused_top_level",
            Rule::UnusedImport => "unused_import",
            Rule::UnusedAlias => "unused_alias",
            Rule::UnusedImportedValue => "unused_imported_value",
            Rule::UnusedPattern => "unused_pattern",
            Rule::UnusedTypeAlias => "unused_type_alias",
            Rule::UnusedValueConstructor => "unused_value_constructor",
            Rule::DropConsOfItemAndList => "drop_cons_of_item_and_list",
            Rule::DropConcatOfLists => "drop_concat_of_lists",
            Rule::UseConsOverConcat => "use_cons_over_concat",
            Rule::SingleFieldRecord => "single_field_record",
            Rule::UnnecessaryListConcat => "unnecessary_list_concat",
            Rule::UnnecessaryPortModule => "unnecessary_port_module",
            Rule::NoUncurriedPrefix => "no_uncurried_prefix",
        }
    }

    pub fn from_code(code: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|rule| rule.code() == code)
    }

    fn is_unused_check(self) -> bool {
        matches!(
            self,
            Rule::UnusedTopLevel
                | Rule::UnusedImport
                | Rule::UnusedAlias
                | Rule::UnusedImportedValue
                | Rule::UnusedPattern
                | Rule::UnusedTypeAlias
                | Rule::UnusedValueConstructor
        )
    }

    fn check(self, cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
        match self {
            Rule::BooleanCaseExpr => style::boolean_case_expr(cx, out),
            Rule::UnusedTopLevel => unused::unused_top_level(cx, out),
            Rule::UnusedImport => imports::unused_import(cx, out),
            Rule::UnusedAlias => imports::unused_alias(cx, out),
            Rule::UnusedImportedValue => imports::unused_imported_value(cx, out),
            Rule::UnusedPattern => unused::unused_pattern(cx, out),
            Rule::UnusedTypeAlias => unused::unused_type_alias(cx, out),
            Rule::UnusedValueConstructor => unused::unused_value_constructor(cx, out),
            Rule::DropConsOfItemAndList => lists::drop_cons_of_item_and_list(cx, out),
            Rule::DropConcatOfLists => lists::drop_concat_of_lists(cx, out),
            Rule::UseConsOverConcat => lists::use_cons_over_concat(cx, out),
            Rule::SingleFieldRecord => style::single_field_record(cx, out),
            Rule::UnnecessaryListConcat => lists::unnecessary_list_concat(cx, out),
            Rule::UnnecessaryPortModule => style::unnecessary_port_module(cx, out),
            Rule::NoUncurriedPrefix => style::no_uncurried_prefix(cx, out),
        }
    }

    /// Every rule reports a warning; dead-code rules are tagged so editors can fade them.
    pub(crate) fn diagnostic(self, message: impl Into<String>, range: Span) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.code(), message, DiagnosticSeverity::Warning, range);
        if self.is_unused_check() {
            diagnostic.with_tag(DiagnosticTag::Unnecessary)
        } else {
            diagnostic
        }
    }
}

/// Inputs shared by every rule of one run.
pub(crate) struct RuleContext<'a> {
    pub(crate) module: &'a Module,
    pub(crate) workspace: &'a dyn WorkspaceSnapshot,
    usage: OnceCell<ModuleUsage<'a>>,
}

impl<'a> RuleContext<'a> {
    fn new(module: &'a Module, workspace: &'a dyn WorkspaceSnapshot) -> Self {
        Self {
            module,
            workspace,
            usage: OnceCell::new(),
        }
    }

    /// Usage analysis, computed once and shared by the dead-code rules.
    pub(crate) fn usage(&self) -> &ModuleUsage<'a> {
        self.usage.get_or_init(|| ModuleUsage::compute(self.module))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    disabled: FxHashSet<Rule>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine skipping the rules with the given codes; unknown codes are ignored.
    pub fn with_disabled<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let disabled = codes
            .into_iter()
            .filter_map(|code| Rule::from_code(code.as_ref()))
            .collect();
        Self { disabled }
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        !self.disabled.contains(&rule)
    }

    /// Runs every enabled rule over `module`. Deterministic, and never fails: a shape a rule
    /// does not recognise just yields nothing.
    pub fn evaluate(
        &self,
        module: &Module,
        uri: &Url,
        workspace: &dyn WorkspaceSnapshot,
    ) -> Vec<Diagnostic> {
        let cx = RuleContext::new(module, workspace);
        let mut out = Vec::new();
        for rule in Rule::ALL {
            if self.is_enabled(rule) {
                rule.check(&cx, &mut out);
            }
        }
        tracing::debug!(uri = %uri, count = out.len(), "rule diagnostics computed");
        out
    }
}
