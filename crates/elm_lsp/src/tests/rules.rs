use elm::{Declaration, Expr};
use rustc_hash::FxHashMap;

use super::fixtures::*;
use crate::diagnostic::{DiagnosticSeverity, DiagnosticTag};
use crate::rules::{Rule, RuleEngine};
use crate::workspace::ModuleInterface;

fn decl_name_span(decl: &Declaration) -> elm::Span {
    decl.name().span
}

#[test]
fn rule_codes_are_unique_and_round_trip() {
    let mut seen = std::collections::HashSet::new();
    for rule in Rule::ALL {
        assert!(seen.insert(rule.code()), "duplicate code {}", rule.code());
        assert_eq!(Rule::from_code(rule.code()), Some(rule));
    }
    assert_eq!(Rule::from_code("no_such_rule"), None);
}

#[test]
fn rendered_diagnostics_of_a_messy_module() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(import("Html"))
        .import(import_as("Json.Decode", "D"))
        .import(import_exposing("List.Extra", vec![expose_value("find")]))
        .decl(value(
            "main",
            vec![],
            case(
                var("flag"),
                vec![
                    (pctor("True", vec![]), binop(list(vec![int(1)]), "++", var("rest"))),
                    (pwild(), binop(int(1), "::", list(vec![int(2)]))),
                ],
            ),
        ))
        .decl(value("flag", vec![], ctor("True")))
        .decl(value("rest", vec![], list(vec![])))
        .decl(value("orphan", vec![], int(1)))
        .build();

    let rendered = lint(&module)
        .iter()
        .map(|diagnostic| format!("{}: {}", diagnostic.code, diagnostic.message))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    boolean_case_expr: Use an if expression instead of a boolean case expression.
    unused_top_level: Unused top level definition `orphan`
    unused_import: Unused import `Html`
    unused_alias: Unused import alias `D`
    unused_imported_value: Unused imported value `find`
    drop_cons_of_item_and_list: If you cons an item to a literal list, then you can just put the item into the list.
    use_cons_over_concat: If you concatenate two lists, but the first item is a single element list, then you should use the cons operator.
    ");
}

#[test]
fn evaluation_is_idempotent() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(import("Html"))
        .decl(value("main", vec![pvar("unused")], call(op_ref("+"), vec![int(1), int(2)])))
        .decl(value("dead", vec![], var("dead")))
        .build();

    let first = lint(&module);
    let second = lint(&module);
    assert!(!first.is_empty());
    assert_eq!(first, second);
    let first_ranges: Vec<_> = first.iter().map(|d| (d.code.clone(), d.range)).collect();
    let second_ranges: Vec<_> = second.iter().map(|d| (d.code.clone(), d.range)).collect();
    assert_eq!(first_ranges, second_ranges);
}

#[test]
fn rule_diagnostics_are_warnings_from_the_elm_source() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(import("Html"))
        .decl(value("main", vec![], binop(int(1), "::", list(vec![]))))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(diagnostics.len(), 2);
    for diagnostic in &diagnostics {
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Warning);
        assert_eq!(diagnostic.source, "Elm");
    }
    let import = diagnostics.iter().find(|d| d.code == "unused_import").expect("import");
    assert_eq!(import.tags, vec![DiagnosticTag::Unnecessary]);
    let cons = diagnostics
        .iter()
        .find(|d| d.code == "drop_cons_of_item_and_list")
        .expect("cons");
    assert!(cons.tags.is_empty());
}

#[test]
fn disabled_rules_are_skipped() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(import("Html"))
        .decl(value("main", vec![], int(1)))
        .decl(value("dead", vec![], int(2)))
        .build();

    let engine = RuleEngine::with_disabled(["unused_import", "not_a_rule"]);
    let diagnostics = engine.evaluate(&module, &uri("src/Main.elm"), &workspace());
    assert!(messages(&diagnostics, "unused_import").is_empty());
    assert_eq!(messages(&diagnostics, "unused_top_level").len(), 1);
    assert!(!engine.is_enabled(Rule::UnusedImport));
    assert!(engine.is_enabled(Rule::UnusedTopLevel));
}

// unused_top_level

#[test]
fn unused_top_level_reports_the_unreachable_declaration_name() {
    let baz = value("baz", vec![], int(2));
    let baz_span = decl_name_span(&baz);
    let module = ModuleBuilder::new("Bar", exposing(vec![expose_value("foo")]))
        .decl(value("foo", vec![], var("some")))
        .decl(baz)
        .decl(value("some", vec![], int(1)))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(
        messages(&diagnostics, "unused_top_level"),
        vec!["Unused top level definition `baz`"]
    );
    assert_eq!(ranges(&diagnostics, "unused_top_level"), vec![baz_span]);
}

#[test]
fn unused_top_level_ignores_self_reference() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("foo")]))
        .decl(value("foo", vec![], int(1)))
        .decl(value("bar", vec![], binop(var("bar"), "+", var("foo"))))
        .build();

    assert_eq!(
        messages(&lint(&module), "unused_top_level"),
        vec!["Unused top level definition `bar`"]
    );
}

#[test]
fn unused_top_level_covers_unreachable_custom_types() {
    let orphan = custom("Orphan", vec![("A", vec![]), ("B", vec![])]);
    let orphan_span = decl_name_span(&orphan);
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .decl(annotated("main", tref("Shown", vec![]), vec![], ctor("Visible")))
        .decl(custom("Shown", vec![("Visible", vec![])]))
        .decl(orphan)
        .build();

    let diagnostics = lint(&module);
    assert_eq!(
        messages(&diagnostics, "unused_top_level"),
        vec!["Unused top level definition `Orphan`"]
    );
    assert_eq!(ranges(&diagnostics, "unused_top_level"), vec![orphan_span]);
}

#[test]
fn exposing_everything_reports_no_unused_top_level() {
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value("a", vec![], int(1)))
        .decl(value("b", vec![], int(2)))
        .build();

    assert!(messages(&lint(&module), "unused_top_level").is_empty());
}

// unused_import / unused_alias

#[test]
fn unused_import_needs_no_alias_no_exposing_and_no_qualified_use() {
    let html = import("Html");
    let html_span = html.span;
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(html)
        .import(import("Browser"))
        .import(import_as("Json.Decode", "Decode"))
        .import(import_exposing("Dict", vec![expose_type("Dict")]))
        .decl(value("main", vec![], call(var("Browser.sandbox"), vec![])))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(messages(&diagnostics, "unused_import"), vec!["Unused import `Html`"]);
    assert_eq!(ranges(&diagnostics, "unused_import"), vec![html_span]);
}

#[test]
fn qualified_pattern_and_type_uses_keep_an_import() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("view")]))
        .import(import("Maybe"))
        .import(import("Html"))
        .decl(annotated(
            "view",
            tfun(tref("Int", vec![]), tref("Html.Html", vec![tvar("msg")])),
            vec![pvar("n")],
            case(
                var("n"),
                vec![(pctor("Maybe.Just", vec![pwild()]), var("n")), (pwild(), var("n"))],
            ),
        ))
        .build();

    assert!(messages(&lint(&module), "unused_import").is_empty());
}

#[test]
fn unused_alias_is_reported_on_the_alias_token() {
    let decode = import_as("Json.Decode", "D");
    let alias_span = decode.alias.as_ref().map(|alias| alias.span);
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(decode)
        .import(import_as("Json.Encode", "E"))
        .decl(value("main", vec![], var("E.null")))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(messages(&diagnostics, "unused_alias"), vec!["Unused import alias `D`"]);
    assert_eq!(ranges(&diagnostics, "unused_alias").first().copied(), alias_span);
    assert!(messages(&diagnostics, "unused_import").is_empty());
}

// unused_imported_value

#[test]
fn unused_imported_values_and_types_are_told_apart() {
    let div = expose_value("div");
    let div_span = div.name().span;
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("view")]))
        .import(import_exposing("Html", vec![expose_value("text"), div]))
        .import(import_exposing("Dict", vec![expose_type("Dict")]))
        .import(import_exposing("Set", vec![expose_type("Set")]))
        .decl(annotated(
            "view",
            tref("Dict", vec![tref("String", vec![]), tref("Int", vec![])]),
            vec![],
            call(var("text"), vec![string("x")]),
        ))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(
        messages(&diagnostics, "unused_imported_value"),
        vec!["Unused imported value `div`", "Unused imported type `Set`"]
    );
    assert_eq!(ranges(&diagnostics, "unused_imported_value")[0], div_span);
}

#[test]
fn imported_operators_are_used_through_infix_application() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("parser")]))
        .import(import_exposing("Parser", vec![expose_operator("|."), expose_operator("|=")]))
        .decl(value("parser", vec![], binop(var("a"), "|.", var("b"))))
        .build();

    assert_eq!(
        messages(&lint(&module), "unused_imported_value"),
        vec!["Unused imported value `(|=)`"]
    );
}

fn route_interface() -> ModuleInterface {
    let mut types = FxHashMap::default();
    types.insert(
        "Route".to_string(),
        vec!["Home".to_string(), "About".to_string()],
    );
    ModuleInterface {
        name: "Route".to_string(),
        values: vec!["parse".to_string()],
        types,
    }
}

#[test]
fn open_type_import_is_used_through_its_constructors() {
    let mut index = workspace();
    index.insert_interface(route_interface());
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("title")]))
        .import(import_exposing("Route", vec![expose_type_open("Route")]))
        .decl(value(
            "title",
            vec![pvar("route")],
            case(
                var("route"),
                vec![(pctor("Home", vec![]), string("home")), (pwild(), string("other"))],
            ),
        ))
        .build();

    let diagnostics = lint_in(&module, &index);
    assert!(messages(&diagnostics, "unused_imported_value").is_empty());
    // Constructor patterns bind nothing, so nothing is an unused pattern either.
    assert!(messages(&diagnostics, "unused_pattern").is_empty());
}

#[test]
fn open_type_import_without_any_use_is_reported() {
    let mut index = workspace();
    index.insert_interface(route_interface());
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(import_exposing("Route", vec![expose_type_open("Route")]))
        .decl(value("main", vec![], int(0)))
        .build();

    assert_eq!(
        messages(&lint_in(&module, &index), "unused_imported_value"),
        vec!["Unused imported type `Route`"]
    );
}

#[test]
fn open_type_import_from_an_unknown_module_is_left_alone() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .import(import_exposing("Vendor.Widget", vec![expose_type_open("Widget")]))
        .decl(value("main", vec![], int(0)))
        .build();

    assert!(messages(&lint(&module), "unused_imported_value").is_empty());
}

// unused_pattern

#[test]
fn unused_case_binding_is_reported_but_wildcards_are_not() {
    let value_name = pvar("value");
    let value_span = value_name.span();
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("f")]))
        .decl(value(
            "f",
            vec![pvar("maybe")],
            case(
                var("maybe"),
                vec![
                    (pctor("Just", vec![value_name]), int(1)),
                    (pwild(), int(0)),
                ],
            ),
        ))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(
        messages(&diagnostics, "unused_pattern"),
        vec!["Unused pattern variable `value`"]
    );
    assert_eq!(ranges(&diagnostics, "unused_pattern"), vec![value_span]);
}

#[test]
fn record_destructuring_that_is_used_is_not_reported() {
    // let { error } = result in error
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("f")]))
        .decl(value(
            "f",
            vec![pvar("result")],
            let_in(
                vec![destructure(precord(&["error"]), var("result"))],
                var("error"),
            ),
        ))
        .build();

    assert!(messages(&lint(&module), "unused_pattern").is_empty());
}

#[test]
fn let_destructuring_reports_each_unused_binder() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("f")]))
        .decl(value(
            "f",
            vec![pvar("pair")],
            let_in(
                vec![
                    destructure(ptuple(vec![pvar("a"), pvar("b")]), var("pair")),
                    let_value("c", vec![], var("a")),
                ],
                var("c"),
            ),
        ))
        .build();

    assert_eq!(
        messages(&lint(&module), "unused_pattern"),
        vec!["Unused pattern variable `b`"]
    );
}

#[test]
fn lambda_and_function_parameters_are_checked() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("f")]))
        .decl(value(
            "f",
            vec![pvar("x"), pvar("ignored")],
            call(
                var("List.map"),
                vec![lambda(vec![pvar("y")], int(1)), var("x")],
            ),
        ))
        .build();

    assert_eq!(
        messages(&lint(&module), "unused_pattern"),
        vec![
            "Unused pattern variable `ignored`",
            "Unused pattern variable `y`"
        ]
    );
}

#[test]
fn record_update_uses_its_target_binding() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("update")]))
        .decl(value(
            "update",
            vec![],
            lambda(
                vec![pvar("model")],
                record_update("model", vec![("count", int(1))]),
            ),
        ))
        .build();

    assert!(messages(&lint(&module), "unused_pattern").is_empty());
}

#[test]
fn nested_patterns_report_cons_and_as_binders() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("f")]))
        .decl(value(
            "f",
            vec![pvar("xs")],
            case(
                var("xs"),
                vec![
                    (pas(pcons(pvar("head"), pvar("tail")), "all"), var("head")),
                    (pparen(pwild()), int(0)),
                ],
            ),
        ))
        .build();

    assert_eq!(
        messages(&lint(&module), "unused_pattern"),
        vec![
            "Unused pattern variable `tail`",
            "Unused pattern variable `all`"
        ]
    );
}

// unused_type_alias / unused_value_constructor

#[test]
fn unused_type_alias_covers_the_whole_declaration() {
    let unused = alias("Unused", tref("Int", vec![]));
    let unused_span = unused.span();
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("main")]))
        .decl(alias("Used", tref("Int", vec![])))
        .decl(unused)
        .decl(annotated("main", tref("Used", vec![]), vec![], int(1)))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(
        messages(&diagnostics, "unused_type_alias"),
        vec!["Unused type alias `Unused`"]
    );
    assert_eq!(ranges(&diagnostics, "unused_type_alias"), vec![unused_span]);
}

#[test]
fn record_alias_used_as_constructor_is_not_unused() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_value("init")]))
        .decl(alias("Model", trecord(vec![("a", tref("Int", vec![])), ("b", tref("Int", vec![]))])))
        .decl(value("init", vec![], call(ctor("Model"), vec![int(1), int(2)])))
        .build();

    assert!(messages(&lint(&module), "unused_type_alias").is_empty());
}

#[test]
fn unused_value_constructor_reports_constructors_never_named() {
    let exposed = exposing(vec![expose_value("update"), expose_type("Msg")]);
    let module = ModuleBuilder::new("Main", exposed)
        .decl(custom("Msg", vec![("Increment", vec![]), ("Decrement", vec![])]))
        .decl(value(
            "update",
            vec![pvar("msg")],
            case(
                var("msg"),
                vec![(pctor("Increment", vec![]), int(1)), (pwild(), int(0))],
            ),
        ))
        .build();

    assert_eq!(
        messages(&lint(&module), "unused_value_constructor"),
        vec!["Unused value constructor `Decrement`"]
    );
}

#[test]
fn constructors_exposed_with_the_type_are_never_unused() {
    let module = ModuleBuilder::new("Main", exposing(vec![expose_type_open("Msg")]))
        .decl(custom("Msg", vec![("Increment", vec![]), ("Decrement", vec![])]))
        .build();
    assert!(messages(&lint(&module), "unused_value_constructor").is_empty());

    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(custom("Msg", vec![("Increment", vec![])]))
        .build();
    assert!(messages(&lint(&module), "unused_value_constructor").is_empty());
}

// List rules

#[test]
fn cons_onto_a_literal_list_is_reported_over_the_whole_expression() {
    let cons = binop(var("x"), "::", paren(list(vec![int(2), int(3)])));
    let cons_span = cons.span();
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value("a", vec![pvar("x")], cons))
        .decl(value("b", vec![pvar("x"), pvar("xs")], binop(var("x"), "::", var("xs"))))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(ranges(&diagnostics, "drop_cons_of_item_and_list"), vec![cons_span]);
}

#[test]
fn concatenating_two_literal_lists_is_reported() {
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value("a", vec![], binop(list(vec![int(1)]), "++", list(vec![int(2)]))))
        .decl(value("b", vec![pvar("xs")], binop(list(vec![int(1)]), "++", var("xs"))))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(
        messages(&diagnostics, "drop_concat_of_lists"),
        vec!["If you concatenate two lists, then you can merge them into one list."]
    );
    // Only `[1] ++ xs` asks for a cons; both sides literal is the other rule's case.
    assert_eq!(messages(&diagnostics, "use_cons_over_concat").len(), 1);
}

#[test]
fn concat_with_a_longer_left_list_is_not_a_cons() {
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value(
            "a",
            vec![pvar("xs")],
            binop(list(vec![int(1), int(2)]), "++", var("xs")),
        ))
        .build();

    assert!(messages(&lint(&module), "use_cons_over_concat").is_empty());
}

#[test]
fn list_concat_of_literal_lists_is_reported() {
    let concat = call(
        var("List.concat"),
        vec![list(vec![list(vec![int(1)]), list(vec![int(2), int(3)])])],
    );
    let concat_span = concat.span();
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value("a", vec![], concat))
        .decl(value(
            "b",
            vec![pvar("xs")],
            call(var("List.concat"), vec![list(vec![list(vec![int(1)]), var("xs")])]),
        ))
        .decl(value("c", vec![], call(var("List.concat"), vec![list(vec![])])))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(ranges(&diagnostics, "unnecessary_list_concat"), vec![concat_span]);
}

// Style rules

#[test]
fn boolean_case_expressions_are_reported() {
    let true_or_wildcard = case(
        var("flag"),
        vec![(pctor("True", vec![]), int(1)), (pwild(), int(0))],
    );
    let case_span = true_or_wildcard.span();
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value("a", vec![pvar("flag")], true_or_wildcard))
        .decl(value(
            "b",
            vec![pvar("flag")],
            case(
                var("flag"),
                vec![
                    (pctor("Basics.False", vec![]), int(1)),
                    (pparen(pctor("True", vec![])), int(0)),
                ],
            ),
        ))
        .decl(value(
            "c",
            vec![pvar("maybe")],
            case(
                var("maybe"),
                vec![(pctor("Just", vec![pwild()]), int(1)), (pwild(), int(0))],
            ),
        ))
        .decl(value(
            "d",
            vec![pvar("flag")],
            case(
                var("flag"),
                vec![
                    (pctor("True", vec![]), int(1)),
                    (pctor("True", vec![]), int(2)),
                ],
            ),
        ))
        .build();

    let diagnostics = lint(&module);
    let found = ranges(&diagnostics, "boolean_case_expr");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0], case_span);
}

#[test]
fn single_field_records_are_found_in_nested_positions() {
    let inner = trecord(vec![("b", tref("Int", vec![]))]);
    let inner_span = inner.span();
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(alias(
            "Outer",
            trecord(vec![("a", inner), ("c", tref("Int", vec![]))]),
        ))
        .decl(alias("Named", trecord(vec![("name", tref("String", vec![]))])))
        .decl(alias(
            "Extensible",
            textensible("r", vec![("name", tref("String", vec![]))]),
        ))
        .decl(annotated(
            "f",
            tfun(
                textensible("r", vec![("inner", trecord(vec![("x", tref("Int", vec![]))]))]),
                tref("Int", vec![]),
            ),
            vec![pvar("r")],
            access(access(var("r"), "inner"), "x"),
        ))
        .build();

    let diagnostics = lint(&module);
    let found = ranges(&diagnostics, "single_field_record");
    // Outer.a, Named, and the record nested in the extensible parameter.
    assert_eq!(found.len(), 3);
    assert_eq!(found[0], inner_span);
}

#[test]
fn single_field_records_in_let_annotations_are_reported() {
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value(
            "f",
            vec![],
            let_in(
                vec![let_annotated(
                    "x",
                    trecord(vec![("only", tref("Int", vec![]))]),
                    record(vec![("only", int(1))]),
                )],
                access(var("x"), "only"),
            ),
        ))
        .build();

    assert_eq!(messages(&lint(&module), "single_field_record").len(), 1);
}

#[test]
fn port_module_without_ports_is_reported_on_its_header() {
    let module = ModuleBuilder::port("Ports", exposing_all())
        .decl(value("main", vec![], int(1)))
        .build();
    let header_span = module.header.as_ref().map(|header| header.span);

    let diagnostics = lint(&module);
    assert_eq!(
        ranges(&diagnostics, "unnecessary_port_module").first().copied(),
        header_span
    );

    let module = ModuleBuilder::port("Ports", exposing_all())
        .decl(port("send", tfun(tref("String", vec![]), tref("Cmd", vec![tvar("msg")]))))
        .build();
    assert!(messages(&lint(&module), "unnecessary_port_module").is_empty());
}

#[test]
fn prefix_operator_needs_two_arguments_to_be_reported() {
    let full = call(op_ref("+"), vec![int(1), int(2)]);
    let full_span = full.span();
    let module = ModuleBuilder::new("Main", exposing_all())
        .decl(value("a", vec![], full))
        .decl(value("b", vec![], call(op_ref("+"), vec![int(1)])))
        .build();

    let diagnostics = lint(&module);
    assert_eq!(ranges(&diagnostics, "no_uncurried_prefix"), vec![full_span]);
}

#[test]
fn rules_ignore_shapes_they_do_not_recognise() {
    let module = ModuleBuilder::headerless()
        .decl(value(
            "main",
            vec![],
            if_then_else(
                ctor("True"),
                tuple(vec![Expr::Unit(fresh(2)), int(1)]),
                tuple(vec![Expr::Unit(fresh(2)), int(2)]),
            ),
        ))
        .build();

    assert!(lint(&module).is_empty());
}
