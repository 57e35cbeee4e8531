//! Usage and reachability of a module's declarations and imports.
//!
//! Declarations form a reference graph: an edge `A -> B` means `B` is named somewhere in
//! `A`'s definition. Everything reachable from the exposing list (plus ports and infix
//! functions) is used; the rest is dead, even when it refers to itself.

use elm::{Declaration, ExposedItem, Module, ModuleKind};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::walk::{NameRef, References};

/// Identity of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclId<'a> {
    Value(&'a str),
    Port(&'a str),
    TypeAlias(&'a str),
    CustomType(&'a str),
    Ctor(&'a str),
}

/// Top-level names of the module, split by the namespace a use site looks them up in.
#[derive(Debug, Default)]
struct LocalScope<'a> {
    values: FxHashMap<&'a str, DeclId<'a>>,
    ctors: FxHashMap<&'a str, DeclId<'a>>,
    types: FxHashMap<&'a str, DeclId<'a>>,
    ctors_of: FxHashMap<&'a str, Vec<DeclId<'a>>>,
    infix_functions: FxHashMap<&'a str, &'a str>,
}

impl<'a> LocalScope<'a> {
    fn new(module: &'a Module) -> Self {
        let mut scope = LocalScope::default();
        for decl in &module.declarations {
            match decl {
                Declaration::Value(value) => {
                    scope
                        .values
                        .insert(&value.name.name, DeclId::Value(&value.name.name));
                }
                Declaration::Port(port) => {
                    scope
                        .values
                        .insert(&port.name.name, DeclId::Port(&port.name.name));
                }
                Declaration::TypeAlias(alias) => {
                    let id = DeclId::TypeAlias(&alias.name.name);
                    scope.types.insert(&alias.name.name, id);
                    if alias.is_record_constructor() {
                        scope.ctors.insert(&alias.name.name, id);
                    }
                }
                Declaration::CustomType(custom) => {
                    scope
                        .types
                        .insert(&custom.name.name, DeclId::CustomType(&custom.name.name));
                    let ctors = scope.ctors_of.entry(&custom.name.name).or_default();
                    for ctor in &custom.constructors {
                        let id = DeclId::Ctor(&ctor.name.name);
                        ctors.push(id);
                        scope.ctors.insert(&ctor.name.name, id);
                    }
                }
                Declaration::Infix(infix) => {
                    scope
                        .infix_functions
                        .insert(&infix.operator.name, &infix.function.name);
                }
            }
        }
        scope
    }

    /// Local declarations named by `refs`. Qualified and unknown names resolve to nothing.
    fn resolve(&self, refs: &References<'a>) -> FxHashSet<DeclId<'a>> {
        let lookup = |table: &FxHashMap<&'a str, DeclId<'a>>, name: &NameRef<'a>| {
            name.qualifier
                .is_none()
                .then(|| table.get(name.name).copied())
                .flatten()
        };
        let values = refs.values.iter().filter_map(|r| lookup(&self.values, r));
        let ctors = refs.ctors.iter().filter_map(|r| lookup(&self.ctors, r));
        let types = refs.types.iter().filter_map(|r| lookup(&self.types, r));
        values.chain(ctors).chain(types).collect()
    }
}

/// Result of the usage analysis of one module.
#[derive(Debug, Default)]
pub struct ModuleUsage<'a> {
    reachable: FxHashSet<DeclId<'a>>,
    qualifiers: FxHashSet<&'a str>,
    unqualified_values: FxHashSet<&'a str>,
    unqualified_types: FxHashSet<&'a str>,
    operators: FxHashSet<&'a str>,
}

impl<'a> ModuleUsage<'a> {
    pub fn compute(module: &'a Module) -> Self {
        let scope = LocalScope::new(module);
        let mut usage = ModuleUsage::default();
        let mut edges: FxHashMap<DeclId<'a>, FxHashSet<DeclId<'a>>> = FxHashMap::default();

        for decl in &module.declarations {
            let refs = References::of_declaration(decl);
            usage.record(&refs);
            let targets = scope.resolve(&refs);
            match decl {
                Declaration::Value(value) => {
                    add_edges(&mut edges, DeclId::Value(&value.name.name), &targets);
                }
                Declaration::Port(port) => {
                    add_edges(&mut edges, DeclId::Port(&port.name.name), &targets);
                }
                Declaration::TypeAlias(alias) => {
                    add_edges(&mut edges, DeclId::TypeAlias(&alias.name.name), &targets);
                }
                Declaration::CustomType(custom) => {
                    let type_id = DeclId::CustomType(&custom.name.name);
                    add_edges(&mut edges, type_id, &targets);
                    for ctor in &custom.constructors {
                        let mut ctor_refs = References::default();
                        ctor.args.iter().for_each(|arg| ctor_refs.ty(arg));
                        let mut ctor_targets = scope.resolve(&ctor_refs);
                        ctor_targets.insert(type_id);
                        add_edges(&mut edges, DeclId::Ctor(&ctor.name.name), &ctor_targets);
                    }
                }
                Declaration::Infix(_) => {}
            }
        }

        let roots = roots(module, &scope);
        usage.reachable = reach(roots, &edges);
        usage
    }

    fn record(&mut self, refs: &References<'a>) {
        let named = refs.values.iter().chain(&refs.ctors).chain(&refs.types);
        self.qualifiers.extend(named.filter_map(|r| r.qualifier));
        self.unqualified_values.extend(
            refs.values
                .iter()
                .chain(&refs.ctors)
                .filter(|r| r.qualifier.is_none())
                .map(|r| r.name),
        );
        self.unqualified_types.extend(
            refs.types
                .iter()
                .filter(|r| r.qualifier.is_none())
                .map(|r| r.name),
        );
        self.operators.extend(refs.operators.iter().copied());
    }

    pub fn is_reachable(&self, id: DeclId<'a>) -> bool {
        self.reachable.contains(&id)
    }

    /// `qualifier` (a module name or an alias) prefixes at least one reference.
    pub fn is_qualifier_used(&self, qualifier: &str) -> bool {
        self.qualifiers.contains(qualifier)
    }

    /// Unqualified use as an expression, a constructor, or in a pattern.
    pub fn is_value_used(&self, name: &str) -> bool {
        self.unqualified_values.contains(name)
    }

    pub fn is_type_used(&self, name: &str) -> bool {
        self.unqualified_types.contains(name)
    }

    pub fn is_operator_used(&self, symbol: &str) -> bool {
        self.operators.contains(symbol)
    }
}

fn add_edges<'a>(
    edges: &mut FxHashMap<DeclId<'a>, FxHashSet<DeclId<'a>>>,
    from: DeclId<'a>,
    targets: &FxHashSet<DeclId<'a>>,
) {
    let entry = edges.entry(from).or_default();
    entry.extend(targets.iter().copied().filter(|target| *target != from));
}

fn roots<'a>(module: &'a Module, scope: &LocalScope<'a>) -> Vec<DeclId<'a>> {
    let mut roots: Vec<DeclId<'a>> = Vec::new();

    if module.exposes_all() {
        roots.extend(scope.values.values().copied());
        roots.extend(scope.types.values().copied());
        roots.extend(scope.ctors.values().copied());
    } else if let Some(header) = &module.header {
        for item in header.exposing.items() {
            match item {
                ExposedItem::Value(name) => {
                    roots.extend(scope.values.get(name.name.as_str()).copied());
                }
                ExposedItem::Operator(op) => {
                    if let Some(function) = scope.infix_functions.get(op.name.as_str()) {
                        roots.extend(scope.values.get(function).copied());
                    }
                }
                ExposedItem::Type {
                    name, constructors, ..
                } => {
                    roots.extend(scope.types.get(name.name.as_str()).copied());
                    if constructors.is_some() {
                        if let Some(ctors) = scope.ctors_of.get(name.name.as_str()) {
                            roots.extend(ctors.iter().copied());
                        }
                    }
                }
            }
        }
    }

    // Infix declarations are the module's own operator table; their functions are always live.
    for function in scope.infix_functions.values() {
        roots.extend(scope.values.get(function).copied());
    }

    if module.kind() == ModuleKind::Port {
        for port in module.ports() {
            roots.push(DeclId::Port(&port.name.name));
            let mut refs = References::default();
            refs.ty(&port.ty);
            roots.extend(scope.resolve(&refs));
        }
    }

    roots
}

fn reach<'a>(
    roots: Vec<DeclId<'a>>,
    edges: &FxHashMap<DeclId<'a>, FxHashSet<DeclId<'a>>>,
) -> FxHashSet<DeclId<'a>> {
    let mut reachable = FxHashSet::default();
    let mut worklist = roots;
    while let Some(decl) = worklist.pop() {
        if !reachable.insert(decl) {
            continue;
        }
        if let Some(targets) = edges.get(&decl) {
            worklist.extend(targets.iter().filter(|t| !reachable.contains(*t)).copied());
        }
    }
    reachable
}
