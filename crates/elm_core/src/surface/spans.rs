use crate::surface::ast::{Declaration, Expr, Literal, Pattern, SpannedName, TypeExpr};
use crate::Span;

impl Literal {
    pub fn span(&self) -> Span {
        match self {
            Literal::Int { span, .. }
            | Literal::Float { span, .. }
            | Literal::Char { span, .. }
            | Literal::String { span, .. } => *span,
        }
    }
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Var(name) | Expr::Ctor(name) => name.span,
            Expr::OperatorRef(name) | Expr::FieldAccessor(name) => name.span,
            Expr::Literal(lit) => lit.span(),
            Expr::Unit(span) => *span,
            Expr::Negate { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Tuple { span, .. }
            | Expr::List { span, .. }
            | Expr::Record { span, .. }
            | Expr::RecordUpdate { span, .. }
            | Expr::FieldAccess { span, .. }
            | Expr::Call { span, .. }
            | Expr::BinOp { span, .. }
            | Expr::Lambda { span, .. }
            | Expr::If { span, .. }
            | Expr::Case { span, .. }
            | Expr::Let { span, .. } => *span,
        }
    }

    /// Strips any number of redundant parentheses.
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren { expr: inner, .. } = expr {
            expr = inner;
        }
        expr
    }

    pub fn is_list_literal(&self) -> bool {
        matches!(self.unparen(), Expr::List { .. })
    }
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Wildcard(span) | Pattern::Unit(span) => *span,
            Pattern::Var(name) => name.span,
            Pattern::Literal(lit) => lit.span(),
            Pattern::Paren { span, .. }
            | Pattern::Tuple { span, .. }
            | Pattern::List { span, .. }
            | Pattern::Cons { span, .. }
            | Pattern::Record { span, .. }
            | Pattern::Ctor { span, .. }
            | Pattern::As { span, .. } => *span,
        }
    }

    pub fn unparen(&self) -> &Pattern {
        let mut pattern = self;
        while let Pattern::Paren { pattern: inner, .. } = pattern {
            pattern = inner;
        }
        pattern
    }

    /// Every name this pattern binds, in source order. Wildcards bind nothing.
    pub fn binders(&self) -> Vec<&SpannedName> {
        let mut out = Vec::new();
        collect_binders(self, &mut out);
        out
    }
}

fn collect_binders<'a>(pattern: &'a Pattern, out: &mut Vec<&'a SpannedName>) {
    match pattern {
        Pattern::Var(name) => out.push(name),
        Pattern::Record { fields, .. } => out.extend(fields.iter()),
        Pattern::As { pattern, alias, .. } => {
            collect_binders(pattern, out);
            out.push(alias);
        }
        Pattern::Paren { pattern, .. } => collect_binders(pattern, out),
        Pattern::Tuple { items, .. } | Pattern::List { items, .. } => {
            items.iter().for_each(|item| collect_binders(item, out))
        }
        Pattern::Cons { head, tail, .. } => {
            collect_binders(head, out);
            collect_binders(tail, out);
        }
        Pattern::Ctor { args, .. } => args.iter().for_each(|arg| collect_binders(arg, out)),
        Pattern::Wildcard(_) | Pattern::Literal(_) | Pattern::Unit(_) => {}
    }
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Var(name) => name.span,
            TypeExpr::Unit(span) => *span,
            TypeExpr::Ref { span, .. }
            | TypeExpr::Function { span, .. }
            | TypeExpr::Tuple { span, .. }
            | TypeExpr::Record { span, .. } => *span,
        }
    }
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::Value(decl) => decl.span,
            Declaration::TypeAlias(decl) => decl.span,
            Declaration::CustomType(decl) => decl.span,
            Declaration::Port(decl) => decl.span,
            Declaration::Infix(decl) => decl.span,
        }
    }

    pub fn name(&self) -> &SpannedName {
        match self {
            Declaration::Value(decl) => &decl.name,
            Declaration::TypeAlias(decl) => &decl.name,
            Declaration::CustomType(decl) => &decl.name,
            Declaration::Port(decl) => &decl.name,
            Declaration::Infix(decl) => &decl.operator,
        }
    }
}
