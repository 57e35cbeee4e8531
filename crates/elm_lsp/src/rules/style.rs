use elm::{Expr, ModuleKind, Pattern, TypeExpr};

use super::{Rule, RuleContext};
use crate::diagnostic::Diagnostic;
use crate::walk::{for_each_expr, for_each_type_root};

/// `True`, `False`, or their `Basics.`-qualified spellings, without arguments.
fn bool_pattern(pattern: &Pattern) -> Option<bool> {
    let Pattern::Ctor { ctor, args, .. } = pattern.unparen() else {
        return None;
    };
    if !args.is_empty() || !matches!(ctor.qualifier(), None | Some("Basics")) {
        return None;
    }
    match ctor.name.name.as_str() {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}

/// A two-way split on a boolean: `True`/`False` against `_` or the other constant.
pub(super) fn boolean_case_expr(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for_each_expr(cx.module, &mut |expr| {
        let Expr::Case { branches, span, .. } = expr else {
            return;
        };
        let [first, second] = branches.as_slice() else {
            return;
        };
        let is_boolean_split = |a: &Pattern, b: &Pattern| match bool_pattern(a) {
            Some(value) => {
                matches!(b.unparen(), Pattern::Wildcard(_)) || bool_pattern(b) == Some(!value)
            }
            None => false,
        };
        if is_boolean_split(&first.pattern, &second.pattern)
            || is_boolean_split(&second.pattern, &first.pattern)
        {
            out.push(Rule::BooleanCaseExpr.diagnostic(
                "Use an if expression instead of a boolean case expression.",
                *span,
            ));
        }
    });
}

pub(super) fn single_field_record(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for_each_type_root(cx.module, &mut |ty| single_field_records_in(ty, out));
}

fn single_field_records_in(ty: &TypeExpr, out: &mut Vec<Diagnostic>) {
    match ty {
        TypeExpr::Record {
            extends, fields, span,
        } => {
            if extends.is_none() && fields.len() == 1 {
                out.push(Rule::SingleFieldRecord.diagnostic(
                    "Using a record is obsolete if you only plan to store a single field in it.",
                    *span,
                ));
            }
            fields
                .iter()
                .for_each(|field| single_field_records_in(&field.ty, out));
        }
        TypeExpr::Ref { args, .. } => args.iter().for_each(|arg| single_field_records_in(arg, out)),
        TypeExpr::Function { from, to, .. } => {
            single_field_records_in(from, out);
            single_field_records_in(to, out);
        }
        TypeExpr::Tuple { items, .. } => {
            items.iter().for_each(|item| single_field_records_in(item, out))
        }
        TypeExpr::Var(_) | TypeExpr::Unit(_) => {}
    }
}

pub(super) fn unnecessary_port_module(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let Some(header) = &cx.module.header else {
        return;
    };
    if header.kind == ModuleKind::Port && cx.module.ports().next().is_none() {
        out.push(Rule::UnnecessaryPortModule.diagnostic(
            "Module is defined as a `port` module, but does not define any ports.",
            header.span,
        ));
    }
}

/// `(+) 1 2`. A single argument is a legitimate partial application.
pub(super) fn no_uncurried_prefix(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for_each_expr(cx.module, &mut |expr| {
        let Expr::Call { func, args, span } = expr else {
            return;
        };
        if let Expr::OperatorRef(op) = func.unparen()
            && args.len() == 2
        {
            out.push(Rule::NoUncurriedPrefix.diagnostic(
                format!("Use an infix operator instead of a prefix operator: `{}`", op.name),
                *span,
            ));
        }
    });
}
