use elm::{Declaration, ExposedItem, Expr, LetDeclaration, Pattern, ValueDecl};
use rustc_hash::FxHashSet;

use super::{Rule, RuleContext};
use crate::diagnostic::Diagnostic;
use crate::usage::DeclId;
use crate::walk::{References, for_each_expr};

/// Values and custom types; aliases are left to `unused_type_alias`.
pub(super) fn unused_top_level(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let usage = cx.usage();
    for decl in &cx.module.declarations {
        let name = decl.name();
        let id = match decl {
            Declaration::Value(_) => DeclId::Value(&name.name),
            Declaration::CustomType(_) => DeclId::CustomType(&name.name),
            _ => continue,
        };
        if !usage.is_reachable(id) {
            out.push(Rule::UnusedTopLevel.diagnostic(
                format!("Unused top level definition `{}`", name.name),
                name.span,
            ));
        }
    }
}

pub(super) fn unused_type_alias(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let usage = cx.usage();
    for decl in &cx.module.declarations {
        let Declaration::TypeAlias(alias) = decl else {
            continue;
        };
        if !usage.is_reachable(DeclId::TypeAlias(&alias.name.name)) {
            out.push(Rule::UnusedTypeAlias.diagnostic(
                format!("Unused type alias `{}`", alias.name.name),
                decl.span(),
            ));
        }
    }
}

/// Constructors are judged by plain occurrence anywhere in the module, expressions and
/// patterns alike. A type exposed with `(..)` hands its constructors to other modules.
pub(super) fn unused_value_constructor(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    if cx.module.exposes_all() {
        return;
    }
    let exposed_open: FxHashSet<&str> = cx
        .module
        .header
        .iter()
        .flat_map(|header| header.exposing.items())
        .filter_map(|item| match item {
            ExposedItem::Type {
                name,
                constructors: Some(_),
                ..
            } => Some(name.name.as_str()),
            _ => None,
        })
        .collect();

    let usage = cx.usage();
    for decl in &cx.module.declarations {
        let Declaration::CustomType(custom) = decl else {
            continue;
        };
        if exposed_open.contains(custom.name.name.as_str()) {
            continue;
        }
        for ctor in &custom.constructors {
            if !usage.is_value_used(&ctor.name.name) {
                out.push(Rule::UnusedValueConstructor.diagnostic(
                    format!("Unused value constructor `{}`", ctor.name.name),
                    ctor.name.span,
                ));
            }
        }
    }
}

/// Pattern variables that their governing expression never mentions: function and lambda
/// parameters against the body, case branches against the branch, and let destructuring
/// against the whole `let` (siblings included). Elm forbids shadowing, so a plain name
/// occurrence check is exact.
pub(super) fn unused_pattern(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for value in cx.module.value_decls() {
        check_params(value, out);
    }
    for_each_expr(cx.module, &mut |expr| match expr {
        Expr::Lambda { params, body, .. } => {
            let refs = References::of_expr(body);
            params.iter().for_each(|param| report_unbound(param, &refs, out));
        }
        Expr::Case { branches, .. } => {
            for branch in branches {
                let refs = References::of_expr(&branch.body);
                report_unbound(&branch.pattern, &refs, out);
            }
        }
        Expr::Let { declarations, .. } => {
            let refs = References::of_expr(expr);
            for decl in declarations {
                match decl {
                    LetDeclaration::Value(value) => check_params(value, out),
                    LetDeclaration::Destructure { pattern, .. } => {
                        report_unbound(pattern, &refs, out)
                    }
                }
            }
        }
        _ => {}
    });
}

fn check_params(value: &ValueDecl, out: &mut Vec<Diagnostic>) {
    if value.params.is_empty() {
        return;
    }
    let refs = References::of_expr(&value.body);
    value
        .params
        .iter()
        .for_each(|param| report_unbound(param, &refs, out));
}

fn report_unbound(pattern: &Pattern, refs: &References<'_>, out: &mut Vec<Diagnostic>) {
    let used: FxHashSet<&str> = refs.local_values().collect();
    for binder in pattern.binders() {
        if !used.contains(binder.name.as_str()) {
            out.push(Rule::UnusedPattern.diagnostic(
                format!("Unused pattern variable `{}`", binder.name),
                binder.span,
            ));
        }
    }
}
