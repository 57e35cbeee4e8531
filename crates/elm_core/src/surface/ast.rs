use crate::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedName {
    pub name: String,
    pub span: Span,
}

impl SpannedName {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A possibly qualified reference: `foo`, `Maybe.Just`, `Html.Attributes.class`, `A.Model`.
///
/// The qualifier holds the whole dotted prefix, spelled the way the source spells it (the
/// module name or an import alias).
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    pub qualifier: Option<SpannedName>,
    pub name: SpannedName,
    pub span: Span,
}

impl QualifiedName {
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_ref().map(|q| q.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Plain,
    Port,
    Effect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleHeader {
    pub kind: ModuleKind,
    pub name: SpannedName,
    pub exposing: Exposing,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Exposing {
    /// `exposing (..)`
    All(Span),
    Explicit {
        items: Vec<ExposedItem>,
        span: Span,
    },
}

impl Exposing {
    pub fn span(&self) -> Span {
        match self {
            Exposing::All(span) | Exposing::Explicit { span, .. } => *span,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Exposing::All(_))
    }

    pub fn items(&self) -> &[ExposedItem] {
        match self {
            Exposing::All(_) => &[],
            Exposing::Explicit { items, .. } => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExposedItem {
    Value(SpannedName),
    /// `(|.)`; the name holds the bare operator symbol.
    Operator(SpannedName),
    Type {
        name: SpannedName,
        /// Span of `(..)` when the constructors are exposed too.
        constructors: Option<Span>,
        span: Span,
    },
}

impl ExposedItem {
    pub fn name(&self) -> &SpannedName {
        match self {
            ExposedItem::Value(name) | ExposedItem::Operator(name) => name,
            ExposedItem::Type { name, .. } => name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ExposedItem::Value(name) | ExposedItem::Operator(name) => name.span,
            ExposedItem::Type { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub module: SpannedName,
    pub alias: Option<SpannedName>,
    pub exposing: Option<Exposing>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub name: SpannedName,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueDecl {
    pub annotation: Option<TypeAnnotation>,
    pub name: SpannedName,
    pub params: Vec<Pattern>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: SpannedName,
    pub params: Vec<SpannedName>,
    pub aliased: TypeExpr,
    pub span: Span,
}

impl TypeAlias {
    /// Record aliases double as constructor functions: `Model 0 ""`.
    pub fn is_record_constructor(&self) -> bool {
        matches!(self.aliased, TypeExpr::Record { extends: None, .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomType {
    pub name: SpannedName,
    pub params: Vec<SpannedName>,
    pub constructors: Vec<ValueConstructor>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueConstructor {
    pub name: SpannedName,
    pub args: Vec<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortDecl {
    pub name: SpannedName,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `infix left 6 (+) = add`
#[derive(Debug, Clone, PartialEq)]
pub struct InfixDecl {
    pub operator: SpannedName,
    pub function: SpannedName,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Value(ValueDecl),
    TypeAlias(TypeAlias),
    CustomType(CustomType),
    Port(PortDecl),
    Infix(InfixDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// `None` for a headerless file, which Elm treats as `module Main exposing (..)`.
    pub header: Option<ModuleHeader>,
    pub imports: Vec<Import>,
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl Module {
    pub fn name(&self) -> &str {
        self.header
            .as_ref()
            .map(|header| header.name.name.as_str())
            .unwrap_or("Main")
    }

    pub fn kind(&self) -> ModuleKind {
        self.header
            .as_ref()
            .map(|header| header.kind)
            .unwrap_or(ModuleKind::Plain)
    }

    pub fn exposes_all(&self) -> bool {
        self.header
            .as_ref()
            .is_none_or(|header| header.exposing.is_all())
    }

    pub fn value_decls(&self) -> impl Iterator<Item = &ValueDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Value(value) => Some(value),
            _ => None,
        })
    }

    pub fn ports(&self) -> impl Iterator<Item = &PortDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Port(port) => Some(port),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Lowercase type variable: `a`, `msg`.
    Var(SpannedName),
    Ref {
        name: QualifiedName,
        args: Vec<TypeExpr>,
        span: Span,
    },
    Function {
        from: Box<TypeExpr>,
        to: Box<TypeExpr>,
        span: Span,
    },
    Unit(Span),
    Tuple {
        items: Vec<TypeExpr>,
        span: Span,
    },
    /// `{ a | x : Int }` has `extends: Some(a)`.
    Record {
        extends: Option<SpannedName>,
        fields: Vec<FieldType>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    pub name: SpannedName,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int { text: String, span: Span },
    Float { text: String, span: Span },
    Char { text: String, span: Span },
    String { text: String, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Lowercase value reference, possibly qualified.
    Var(QualifiedName),
    /// Uppercase constructor reference, possibly qualified. `True`/`False` land here too.
    Ctor(QualifiedName),
    /// Operator used as a function: `(+)`. The name holds the bare symbol.
    OperatorRef(SpannedName),
    Literal(Literal),
    Negate {
        expr: Box<Expr>,
        span: Span,
    },
    Paren {
        expr: Box<Expr>,
        span: Span,
    },
    Unit(Span),
    Tuple {
        items: Vec<Expr>,
        span: Span,
    },
    List {
        items: Vec<Expr>,
        span: Span,
    },
    Record {
        fields: Vec<RecordField>,
        span: Span,
    },
    /// `{ model | count = 1 }`
    RecordUpdate {
        record: SpannedName,
        fields: Vec<RecordField>,
        span: Span,
    },
    FieldAccess {
        base: Box<Expr>,
        field: SpannedName,
        span: Span,
    },
    /// `.name`
    FieldAccessor(SpannedName),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    /// Infix application with precedence already resolved by the parser.
    BinOp {
        op: SpannedName,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Lambda {
        params: Vec<Pattern>,
        body: Box<Expr>,
        span: Span,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        span: Span,
    },
    Case {
        scrutinee: Box<Expr>,
        branches: Vec<CaseBranch>,
        span: Span,
    },
    Let {
        declarations: Vec<LetDeclaration>,
        body: Box<Expr>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: SpannedName,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub pattern: Pattern,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LetDeclaration {
    Value(ValueDecl),
    /// `( a, b ) = pair`
    Destructure {
        pattern: Pattern,
        expr: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Wildcard(Span),
    Var(SpannedName),
    Literal(Literal),
    Unit(Span),
    Paren {
        pattern: Box<Pattern>,
        span: Span,
    },
    Tuple {
        items: Vec<Pattern>,
        span: Span,
    },
    List {
        items: Vec<Pattern>,
        span: Span,
    },
    Cons {
        head: Box<Pattern>,
        tail: Box<Pattern>,
        span: Span,
    },
    /// `{ name, age }`; every field name is also a binder.
    Record {
        fields: Vec<SpannedName>,
        span: Span,
    },
    Ctor {
        ctor: QualifiedName,
        args: Vec<Pattern>,
        span: Span,
    },
    /// `( a, b ) as pair`
    As {
        pattern: Box<Pattern>,
        alias: SpannedName,
        span: Span,
    },
}
