use tsz_ast::{NodeIndex, SyntaxKind, modifier_flags};
use tsz_binder::symbol_flags;
use tsz_checker::{CheckerError, CheckerOptions, SymbolAccessibility, TypeChecker};
use tsz_solver::{LiteralValue, ObjectFlags, OrderedFloat, TypeData, TypeFlags, TypeId};
use tsz_test_util::ProgramBuilder;

#[test]
fn test_interface_members_are_typed_from_annotations() {
    let mut b = ProgramBuilder::new();
    let string = b.keyword(SyntaxKind::StringKeyword);
    let name = b.property_signature("name", string, false, 0);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let age = b.property_signature("age", number, true, modifier_flags::READONLY);
    let point = b.interface("Person", vec![], vec![name, age], 0);
    b.file("main.ts", vec![point], None);
    let program = b.build_default();

    let declared = program.declared_type("Person").expect("declared");
    let info = program.interner.get(declared);
    assert!(info.has_object_flags(ObjectFlags::INTERFACE));
    let props = program.interner.properties_of_type(declared);
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].name, "name");
    assert_eq!(props[0].type_id, TypeId::STRING);
    assert!(props[1].optional);
    assert!(props[1].readonly);
    // Optional properties include undefined under strict null checks.
    let expected = program.interner.union(&[TypeId::NUMBER, TypeId::UNDEFINED]);
    assert_eq!(props[1].type_id, expected);
}

#[test]
fn test_const_keeps_literal_and_let_widens() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let (const_stmt, _) = b.variable("a", NodeIndex::NONE, one, true, 0);
    let two = b.number_lit("2");
    let (let_stmt, _) = b.variable("b", NodeIndex::NONE, two, false, 0);
    b.file("main.ts", vec![const_stmt, let_stmt], None);
    let program = b.build_default();

    let a = program.type_of("a").expect("a");
    assert_eq!(
        program.interner.lookup(a),
        Some(TypeData::Literal {
            value: LiteralValue::Number(OrderedFloat(1.0)),
            fresh: false,
        })
    );
    assert_eq!(program.type_of("b").expect("b"), TypeId::NUMBER);
}

#[test]
fn test_as_const_object_has_readonly_literal_properties() {
    let mut b = ProgramBuilder::new();
    let hello = b.string_lit("hello");
    let object = b.object_literal(vec![("greeting", hello)]);
    let asserted = b.as_const(object);
    let (stmt, _) = b.variable("config", NodeIndex::NONE, asserted, true, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();

    assert!(program.checker.is_const_context(object));
    let config = program.type_of("config").expect("config");
    let props = program.interner.properties_of_type(config);
    assert_eq!(props.len(), 1);
    assert!(props[0].readonly);
    assert_eq!(props[0].type_id, program.interner.string_literal("hello"));
}

#[test]
fn test_enum_members_auto_increment() {
    let mut b = ProgramBuilder::new();
    let ten = b.number_lit("10");
    let color = b.enum_declaration("Color", vec![("Red", None), ("Green", Some(ten)), ("Blue", None)], 0);
    b.file("main.ts", vec![color], None);
    let program = b.build_default();

    let declared = program.declared_type("Color").expect("Color");
    let info = program.interner.get(declared);
    assert!(info.has(TypeFlags::UNION | TypeFlags::ENUM_LITERAL));
    assert_eq!(info.alias_symbol, info.symbol);
    let values: Vec<LiteralValue> = info
        .constituents()
        .iter()
        .filter_map(|member| match program.interner.lookup(*member) {
            Some(TypeData::EnumLiteral { value, .. }) => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(
        values,
        vec![
            LiteralValue::Number(OrderedFloat(0.0)),
            LiteralValue::Number(OrderedFloat(10.0)),
            LiteralValue::Number(OrderedFloat(11.0)),
        ]
    );
}

#[test]
fn test_array_literal_widens_element_literals() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let two = b.number_lit("2");
    let array = b.array_literal(vec![one, two]);
    let (stmt, _) = b.variable("xs", NodeIndex::NONE, array, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();

    let xs = program.type_of("xs").expect("xs");
    let (target, args) = program.interner.reference_parts(xs).expect("array reference");
    assert_eq!(Some(target), program.checker.globals().array);
    assert_eq!(args, vec![TypeId::NUMBER]);
}

#[test]
fn test_arrow_return_type_is_inferred_from_body() {
    let mut b = ProgramBuilder::new();
    let string = b.keyword(SyntaxKind::StringKeyword);
    let p = b.param("s", string, false);
    let body = b.string_lit("x");
    let arrow = b.arrow(vec![p], NodeIndex::NONE, body);
    let (stmt, _) = b.variable("f", NodeIndex::NONE, arrow, true, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();

    let sig = program
        .checker
        .get_signature_from_declaration(arrow)
        .expect("signature");
    assert_eq!(program.checker.get_return_type_of_signature(sig), TypeId::STRING);
    let f = program.type_of("f").expect("f");
    assert_eq!(program.interner.signatures_of_type(f, tsz_solver::SignatureKind::Call), vec![sig]);
}

#[test]
fn test_optional_parameter_requires_implicit_undefined() {
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let optional = b.param("x", number, true);
    let undefined = b.keyword(SyntaxKind::UndefinedKeyword);
    let number2 = b.keyword(SyntaxKind::NumberKeyword);
    let with_undefined = b.union_type(vec![number2, undefined]);
    let explicit = b.param("y", with_undefined, true);
    let void = b.keyword(SyntaxKind::VoidKeyword);
    let f = b.function_declaration("f", vec![], vec![optional, explicit], void, NodeIndex::NONE, 0);
    b.file("main.ts", vec![f], None);
    let program = b.build_default();

    assert!(program.checker.requires_adding_implicit_undefined(optional));
    assert!(!program.checker.requires_adding_implicit_undefined(explicit));

    let loose = {
        let mut b = ProgramBuilder::new();
        let number = b.keyword(SyntaxKind::NumberKeyword);
        let optional = b.param("x", number, true);
        let void = b.keyword(SyntaxKind::VoidKeyword);
        let f = b.function_declaration("f", vec![], vec![optional], void, NodeIndex::NONE, 0);
        b.file("main.ts", vec![f], None);
        (b.build(CheckerOptions {
            strict_null_checks: false,
        }), optional)
    };
    assert!(!loose.0.checker.requires_adding_implicit_undefined(loose.1));
}

#[test]
fn test_namespace_member_accessibility() {
    let mut b = ProgramBuilder::new();
    let exported = b.interface("Shown", vec![], vec![], modifier_flags::EXPORT);
    let hidden = b.interface("Hidden", vec![], vec![], 0);
    let ns = b.namespace("NS", vec![exported, hidden], 0);
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let outside = b.type_alias("Outside", vec![], any, 0);
    b.file("main.ts", vec![ns, outside], None);
    let program = b.build_default();

    let shown = program.symbol_of(exported).expect("Shown");
    let hidden_sym = program.symbol_of(hidden).expect("Hidden");
    let checker = &program.checker;
    assert!(checker.is_symbol_accessible(shown, outside, symbol_flags::TYPE).is_accessible());
    let result = checker.is_symbol_accessible(hidden_sym, outside, symbol_flags::TYPE);
    assert_eq!(result.accessibility, SymbolAccessibility::NotAccessible);
    assert_eq!(result.error_symbol_name.as_deref(), Some("Hidden"));
    // Inside the namespace the local is in scope.
    assert!(checker.is_symbol_accessible(hidden_sym, exported, symbol_flags::TYPE).is_accessible());
}

#[test]
fn test_external_module_exports_are_accessible_by_import_type() {
    let mut b = ProgramBuilder::new();
    let lib_item = b.interface("Item", vec![], vec![], modifier_flags::EXPORT);
    b.file("lib.ts", vec![lib_item], Some("./lib"));
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let local = b.type_alias("Local", vec![], any, 0);
    b.file("main.ts", vec![local], Some("./main"));
    let program = b.build_default();

    let item = program.symbol_of(lib_item).expect("Item");
    assert!(program.checker.is_symbol_accessible(item, local, symbol_flags::TYPE).is_accessible());
    let module = program.binder.symbol(item).and_then(|s| s.parent).expect("module");
    assert_eq!(program.checker.get_module_specifier(module).as_deref(), Some("./lib"));
}

#[test]
fn test_union_alias_carries_alias_symbol() {
    let mut b = ProgramBuilder::new();
    let a = b.string_literal_type("a");
    let c = b.string_literal_type("b");
    let union = b.union_type(vec![a, c]);
    let alias = b.type_alias("AB", vec![], union, 0);
    b.file("main.ts", vec![alias], None);
    let program = b.build_default();

    let declared = program.declared_type("AB").expect("AB");
    let info = program.interner.get(declared);
    assert!(info.has(TypeFlags::UNION));
    assert_eq!(info.alias_symbol, Some(program.symbol("AB").expect("symbol")));
    // The annotation itself still denotes the unaliased union.
    assert_ne!(program.checker.get_type_from_type_node(union), declared);
}

#[test]
fn test_host_tables_override_and_validate() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let (stmt, decl) = b.variable("x", NodeIndex::NONE, one, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();

    let x = program.symbol_of(decl).expect("x");
    program
        .checker
        .define_symbol_type(x, TypeId::STRING)
        .expect("known symbol");
    assert_eq!(program.checker.get_type_of_symbol(x), TypeId::STRING);

    let err = program
        .checker
        .define_type_node_type(one, TypeId::NUMBER)
        .expect_err("numeric literal is not a type node");
    assert!(matches!(err, CheckerError::UnexpectedNodeKind { .. }));
    assert!(matches!(
        program.checker.define_symbol_type(tsz_binder::SymbolId(u32::MAX), TypeId::ANY),
        Err(CheckerError::UnknownSymbol(_))
    ));
}

#[test]
fn test_const_type_parameter_makes_const_context() {
    let mut b = ProgramBuilder::new();
    let t = b.const_type_param("T");
    let t_ref = b.type_ref("T", vec![]);
    let p = b.param("value", t_ref, false);
    let void = b.keyword(SyntaxKind::VoidKeyword);
    let f = b.function_declaration("f", vec![t], vec![p], void, NodeIndex::NONE, 0);
    b.file("main.ts", vec![f], None);
    let program = b.build_default();

    let t_type = program.checker.get_type_from_type_node(t_ref);
    assert!(program.interner.flags(t_type).contains(TypeFlags::TYPE_PARAMETER));
    match program.interner.lookup(t_type) {
        Some(TypeData::TypeParameter(info)) => assert!(info.is_const),
        other => panic!("expected a type parameter, got {other:?}"),
    }
}
