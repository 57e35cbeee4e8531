use elm::Expr;

use super::{Rule, RuleContext};
use crate::diagnostic::Diagnostic;
use crate::walk::for_each_expr;

fn binop<'e>(expr: &'e Expr, symbol: &str) -> Option<(&'e Expr, &'e Expr)> {
    match expr {
        Expr::BinOp {
            op, left, right, ..
        } if op.name == symbol => Some((left, right)),
        _ => None,
    }
}

pub(super) fn drop_cons_of_item_and_list(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for_each_expr(cx.module, &mut |expr| {
        if let Some((_, right)) = binop(expr, "::")
            && right.is_list_literal()
        {
            out.push(Rule::DropConsOfItemAndList.diagnostic(
                "If you cons an item to a literal list, \
                 then you can just put the item into the list.",
                expr.span(),
            ));
        }
    });
}

pub(super) fn drop_concat_of_lists(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for_each_expr(cx.module, &mut |expr| {
        if let Some((left, right)) = binop(expr, "++")
            && left.is_list_literal()
            && right.is_list_literal()
        {
            out.push(Rule::DropConcatOfLists.diagnostic(
                "If you concatenate two lists, then you can merge them into one list.",
                expr.span(),
            ));
        }
    });
}

pub(super) fn use_cons_over_concat(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for_each_expr(cx.module, &mut |expr| {
        let Some((left, right)) = binop(expr, "++") else {
            return;
        };
        if let Expr::List { items, .. } = left.unparen()
            && items.len() == 1
            && !right.is_list_literal()
        {
            out.push(Rule::UseConsOverConcat.diagnostic(
                "If you concatenate two lists, but the first item is a single element list, \
                 then you should use the cons operator.",
                expr.span(),
            ));
        }
    });
}

/// `List.concat [ [ a ], [ b, c ] ]` is just `[ a, b, c ]`.
pub(super) fn unnecessary_list_concat(cx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for_each_expr(cx.module, &mut |expr| {
        let Expr::Call { func, args, span } = expr else {
            return;
        };
        let is_list_concat = matches!(
            func.unparen(),
            Expr::Var(name) if name.qualifier() == Some("List") && name.name.name == "concat"
        );
        if !is_list_concat || args.len() != 1 {
            return;
        }
        if let Expr::List { items, .. } = args[0].unparen()
            && !items.is_empty()
            && items.iter().all(Expr::is_list_literal)
        {
            out.push(Rule::UnnecessaryListConcat.diagnostic(
                "You should just merge the arrays.",
                *span,
            ));
        }
    });
}
