use elm::{ExposedItem, Import, Span};
use tower_lsp::lsp_types::TextEdit;

use super::{Rule, RuleContext};
use crate::code_actions::QuickFix;
use crate::diagnostic::{Diagnostic, span_to_range};

pub(super) fn unused_import(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let usage = cx.usage();
    for import in &cx.module.imports {
        if import.alias.is_some() || import.exposing.is_some() {
            continue;
        }
        if usage.is_qualifier_used(&import.module.name) {
            continue;
        }
        let fix = QuickFix::preferred(
            format!("Remove unused import `{}`", import.module.name),
            vec![remove(whole_lines(import.span))],
        );
        out.push(
            Rule::UnusedImport
                .diagnostic(format!("Unused import `{}`", import.module.name), import.span)
                .with_data(fix.into_data()),
        );
    }
}

pub(super) fn unused_alias(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let usage = cx.usage();
    for import in &cx.module.imports {
        let Some(alias) = &import.alias else {
            continue;
        };
        if usage.is_qualifier_used(&alias.name) {
            continue;
        }
        // Drops ` as Alias`, keeping the import itself.
        let clause = Span::new(import.module.span.end, alias.span.end);
        let fix = QuickFix::preferred(
            format!("Remove unused alias `{}`", alias.name),
            vec![remove(clause)],
        );
        out.push(
            Rule::UnusedAlias
                .diagnostic(format!("Unused import alias `{}`", alias.name), alias.span)
                .with_data(fix.into_data()),
        );
    }
}

pub(super) fn unused_imported_value(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let usage = cx.usage();
    for import in &cx.module.imports {
        let Some(exposing) = &import.exposing else {
            continue;
        };
        for item in exposing.items() {
            match item {
                ExposedItem::Value(name) => {
                    if !usage.is_value_used(&name.name) {
                        out.push(Rule::UnusedImportedValue.diagnostic(
                            format!("Unused imported value `{}`", name.name),
                            name.span,
                        ));
                    }
                }
                ExposedItem::Operator(op) => {
                    if !usage.is_operator_used(&op.name) {
                        out.push(Rule::UnusedImportedValue.diagnostic(
                            format!("Unused imported value `({})`", op.name),
                            op.span,
                        ));
                    }
                }
                ExposedItem::Type {
                    name, constructors, ..
                } => {
                    // Record aliases are also constructor functions.
                    let mut used =
                        usage.is_type_used(&name.name) || usage.is_value_used(&name.name);
                    if constructors.is_some() {
                        match open_constructors(cx, import, &name.name) {
                            Some(ctors) => {
                                used |= ctors.iter().any(|ctor| usage.is_value_used(ctor))
                            }
                            // Without the module's interface its constructors are unknown.
                            None => continue,
                        }
                    }
                    if !used {
                        out.push(Rule::UnusedImportedValue.diagnostic(
                            format!("Unused imported type `{}`", name.name),
                            name.span,
                        ));
                    }
                }
            }
        }
    }
}

fn open_constructors<'cx>(
    cx: &'cx RuleContext<'_>,
    import: &Import,
    type_name: &str,
) -> Option<&'cx [String]> {
    let interface = cx.workspace.module_interface(&import.module.name)?;
    Some(interface.constructors_of(type_name).unwrap_or_default())
}

/// `span` widened to full lines, trailing newline included.
fn whole_lines(span: Span) -> Span {
    Span::from_coords(span.start.line, 0, span.end.line + 1, 0)
}

fn remove(span: Span) -> TextEdit {
    TextEdit {
        range: span_to_range(span),
        new_text: String::new(),
    }
}
