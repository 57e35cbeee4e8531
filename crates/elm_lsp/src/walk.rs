//! Tree traversals shared by the resolver and the rules.

use elm::{
    Declaration, Expr, LetDeclaration, Module, Pattern, QualifiedName, TypeExpr, ValueDecl,
};

/// A name as written at a use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NameRef<'a> {
    pub(crate) qualifier: Option<&'a str>,
    pub(crate) name: &'a str,
}

impl<'a> NameRef<'a> {
    fn of(name: &'a QualifiedName) -> Self {
        Self {
            qualifier: name.qualifier(),
            name: &name.name.name,
        }
    }
}

/// Every reference made inside one region of a module.
#[derive(Debug, Default)]
pub(crate) struct References<'a> {
    /// Lowercase value references, including record-update targets.
    pub(crate) values: Vec<NameRef<'a>>,
    /// Constructor references from expressions and patterns.
    pub(crate) ctors: Vec<NameRef<'a>>,
    pub(crate) types: Vec<NameRef<'a>>,
    pub(crate) operators: Vec<&'a str>,
}

impl<'a> References<'a> {
    pub(crate) fn of_expr(expr: &'a Expr) -> Self {
        let mut refs = References::default();
        refs.expr(expr);
        refs
    }

    pub(crate) fn of_declaration(decl: &'a Declaration) -> Self {
        let mut refs = References::default();
        match decl {
            Declaration::Value(value) => refs.value_decl(value),
            Declaration::TypeAlias(alias) => refs.ty(&alias.aliased),
            Declaration::CustomType(custom) => custom
                .constructors
                .iter()
                .flat_map(|ctor| ctor.args.iter())
                .for_each(|arg| refs.ty(arg)),
            Declaration::Port(port) => refs.ty(&port.ty),
            Declaration::Infix(infix) => refs.values.push(NameRef {
                qualifier: None,
                name: &infix.function.name,
            }),
        }
        refs
    }

    /// Unqualified value names, the only ones a local binder can satisfy.
    pub(crate) fn local_values(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.values
            .iter()
            .filter(|r| r.qualifier.is_none())
            .map(|r| r.name)
    }

    pub(crate) fn value_decl(&mut self, decl: &'a ValueDecl) {
        if let Some(annotation) = &decl.annotation {
            self.ty(&annotation.ty);
        }
        decl.params.iter().for_each(|param| self.pattern(param));
        self.expr(&decl.body);
    }

    pub(crate) fn expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Var(name) => self.values.push(NameRef::of(name)),
            Expr::Ctor(name) => self.ctors.push(NameRef::of(name)),
            Expr::OperatorRef(op) => self.operators.push(&op.name),
            Expr::Literal(_) | Expr::Unit(_) | Expr::FieldAccessor(_) => {}
            Expr::Negate { expr, .. } | Expr::Paren { expr, .. } => self.expr(expr),
            Expr::Tuple { items, .. } | Expr::List { items, .. } => {
                items.iter().for_each(|item| self.expr(item))
            }
            Expr::Record { fields, .. } => fields.iter().for_each(|field| self.expr(&field.value)),
            Expr::RecordUpdate { record, fields, .. } => {
                self.values.push(NameRef {
                    qualifier: None,
                    name: &record.name,
                });
                fields.iter().for_each(|field| self.expr(&field.value));
            }
            Expr::FieldAccess { base, .. } => self.expr(base),
            Expr::Call { func, args, .. } => {
                self.expr(func);
                args.iter().for_each(|arg| self.expr(arg));
            }
            Expr::BinOp {
                op, left, right, ..
            } => {
                self.operators.push(&op.name);
                self.expr(left);
                self.expr(right);
            }
            Expr::Lambda { params, body, .. } => {
                params.iter().for_each(|param| self.pattern(param));
                self.expr(body);
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.expr(cond);
                self.expr(then_branch);
                self.expr(else_branch);
            }
            Expr::Case {
                scrutinee,
                branches,
                ..
            } => {
                self.expr(scrutinee);
                for branch in branches {
                    self.pattern(&branch.pattern);
                    self.expr(&branch.body);
                }
            }
            Expr::Let {
                declarations, body, ..
            } => {
                for decl in declarations {
                    match decl {
                        LetDeclaration::Value(value) => self.value_decl(value),
                        LetDeclaration::Destructure { pattern, expr, .. } => {
                            self.pattern(pattern);
                            self.expr(expr);
                        }
                    }
                }
                self.expr(body);
            }
        }
    }

    pub(crate) fn pattern(&mut self, pattern: &'a Pattern) {
        match pattern {
            Pattern::Ctor { ctor, args, .. } => {
                self.ctors.push(NameRef::of(ctor));
                args.iter().for_each(|arg| self.pattern(arg));
            }
            Pattern::Paren { pattern, .. } | Pattern::As { pattern, .. } => self.pattern(pattern),
            Pattern::Tuple { items, .. } | Pattern::List { items, .. } => {
                items.iter().for_each(|item| self.pattern(item))
            }
            Pattern::Cons { head, tail, .. } => {
                self.pattern(head);
                self.pattern(tail);
            }
            Pattern::Wildcard(_)
            | Pattern::Var(_)
            | Pattern::Literal(_)
            | Pattern::Unit(_)
            | Pattern::Record { .. } => {}
        }
    }

    pub(crate) fn ty(&mut self, ty: &'a TypeExpr) {
        match ty {
            TypeExpr::Ref { name, args, .. } => {
                self.types.push(NameRef::of(name));
                args.iter().for_each(|arg| self.ty(arg));
            }
            TypeExpr::Function { from, to, .. } => {
                self.ty(from);
                self.ty(to);
            }
            TypeExpr::Tuple { items, .. } => items.iter().for_each(|item| self.ty(item)),
            TypeExpr::Record { fields, .. } => fields.iter().for_each(|field| self.ty(&field.ty)),
            TypeExpr::Var(_) | TypeExpr::Unit(_) => {}
        }
    }
}

/// Visits every expression of the module in source order, parents before children.
pub(crate) fn for_each_expr<'a>(module: &'a Module, visit: &mut dyn FnMut(&'a Expr)) {
    for decl in &module.declarations {
        if let Declaration::Value(value) = decl {
            walk_expr(&value.body, visit);
        }
    }
}

fn walk_expr<'a>(expr: &'a Expr, visit: &mut dyn FnMut(&'a Expr)) {
    visit(expr);
    match expr {
        Expr::Var(_)
        | Expr::Ctor(_)
        | Expr::OperatorRef(_)
        | Expr::Literal(_)
        | Expr::Unit(_)
        | Expr::FieldAccessor(_) => {}
        Expr::Negate { expr, .. } | Expr::Paren { expr, .. } => walk_expr(expr, visit),
        Expr::FieldAccess { base, .. } => walk_expr(base, visit),
        Expr::Tuple { items, .. } | Expr::List { items, .. } => {
            items.iter().for_each(|item| walk_expr(item, visit))
        }
        Expr::Record { fields, .. } | Expr::RecordUpdate { fields, .. } => fields
            .iter()
            .for_each(|field| walk_expr(&field.value, visit)),
        Expr::Call { func, args, .. } => {
            walk_expr(func, visit);
            args.iter().for_each(|arg| walk_expr(arg, visit));
        }
        Expr::BinOp { left, right, .. } => {
            walk_expr(left, visit);
            walk_expr(right, visit);
        }
        Expr::Lambda { body, .. } => walk_expr(body, visit),
        Expr::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => {
            walk_expr(cond, visit);
            walk_expr(then_branch, visit);
            walk_expr(else_branch, visit);
        }
        Expr::Case {
            scrutinee,
            branches,
            ..
        } => {
            walk_expr(scrutinee, visit);
            branches
                .iter()
                .for_each(|branch| walk_expr(&branch.body, visit));
        }
        Expr::Let {
            declarations, body, ..
        } => {
            for decl in declarations {
                match decl {
                    LetDeclaration::Value(value) => walk_expr(&value.body, visit),
                    LetDeclaration::Destructure { expr, .. } => walk_expr(expr, visit),
                }
            }
            walk_expr(body, visit);
        }
    }
}

/// Visits the root of every type written in the module: annotations (let-bound ones
/// included), alias bodies, constructor arguments and port signatures.
pub(crate) fn for_each_type_root<'a>(module: &'a Module, visit: &mut dyn FnMut(&'a TypeExpr)) {
    for decl in &module.declarations {
        match decl {
            Declaration::Value(value) => {
                if let Some(annotation) = &value.annotation {
                    visit(&annotation.ty);
                }
                let mut nested = |expr: &'a Expr| {
                    if let Expr::Let { declarations, .. } = expr {
                        for decl in declarations {
                            if let LetDeclaration::Value(ValueDecl {
                                annotation: Some(annotation),
                                ..
                            }) = decl
                            {
                                visit(&annotation.ty);
                            }
                        }
                    }
                };
                walk_expr(&value.body, &mut nested);
            }
            Declaration::TypeAlias(alias) => visit(&alias.aliased),
            Declaration::CustomType(custom) => custom
                .constructors
                .iter()
                .flat_map(|ctor| ctor.args.iter())
                .for_each(|arg| visit(arg)),
            Declaration::Port(port) => visit(&port.ty),
            Declaration::Infix(_) => {}
        }
    }
}
