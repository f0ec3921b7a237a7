use tsz_ast::{NodeData, NodeIndex, SyntaxKind};
use tsz_pseudo::{PseudoChecker, PseudoObjectElementKind, PseudoType};
use tsz_test_util::ProgramBuilder;

fn object_with_members(b: &mut ProgramBuilder, properties: Vec<NodeIndex>) -> NodeIndex {
    b.arena.add(
        SyntaxKind::ObjectLiteralExpression,
        NodeData::ObjectLiteral { properties },
    )
}

#[test]
fn test_annotated_declaration_is_direct() {
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let init = b.number_lit("1");
    let (stmt, decl) = b.variable("x", number, init, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    assert_eq!(pseudo.get_type_of_declaration(decl), PseudoType::Direct(number));
}

#[test]
fn test_const_declaration_keeps_literal_and_let_defers() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let (const_stmt, const_decl) = b.variable("a", NodeIndex::NONE, one, true, 0);
    let two = b.number_lit("2");
    let (let_stmt, let_decl) = b.variable("b", NodeIndex::NONE, two, false, 0);
    b.file("main.ts", vec![const_stmt, let_stmt], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    assert_eq!(pseudo.get_type_of_declaration(const_decl), PseudoType::Literal(one));
    assert_eq!(
        pseudo.get_type_of_declaration(let_decl),
        PseudoType::maybe_const(two, PseudoType::Literal(two), PseudoType::Number)
    );
}

#[test]
fn test_negative_number_is_a_literal_location() {
    let mut b = ProgramBuilder::new();
    let five = b.number_lit("5");
    let negated = b.arena.add(
        SyntaxKind::PrefixUnaryExpression,
        NodeData::PrefixUnary {
            operator: SyntaxKind::MinusToken,
            operand: five,
        },
    );
    let (stmt, decl) = b.variable("n", NodeIndex::NONE, negated, true, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    assert_eq!(pseudo.get_type_of_declaration(decl), PseudoType::Literal(negated));
}

#[test]
fn test_unannotated_parameter_has_no_result() {
    let mut b = ProgramBuilder::new();
    let p = b.param("value", NodeIndex::NONE, false);
    let void = b.keyword(SyntaxKind::VoidKeyword);
    let f = b.function_declaration("f", vec![], vec![p], void, NodeIndex::NONE, 0);
    b.file("main.ts", vec![f], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    assert_eq!(pseudo.get_type_of_declaration(p), PseudoType::NoResult(p));
    assert_eq!(pseudo.get_return_type_of_signature(f), PseudoType::Direct(void));
}

#[test]
fn test_object_literal_with_spread_or_shorthand_is_inferred() {
    let mut b = ProgramBuilder::new();
    let other = b.ident("other");
    let spread = b
        .arena
        .add(SyntaxKind::SpreadAssignment, NodeData::Spread { expression: other });
    let with_spread = object_with_members(&mut b, vec![spread]);
    let name = b.ident("value");
    let shorthand = b.arena.add(
        SyntaxKind::ShorthandPropertyAssignment,
        NodeData::ShorthandPropertyAssignment { name },
    );
    let with_shorthand = object_with_members(&mut b, vec![shorthand]);
    let (s1, _) = b.variable("a", NodeIndex::NONE, with_spread, false, 0);
    let (s2, _) = b.variable("b", NodeIndex::NONE, with_shorthand, false, 0);
    b.file("main.ts", vec![s1, s2], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    assert_eq!(pseudo.get_type_of_expression(with_spread), PseudoType::Inferred(with_spread));
    assert_eq!(
        pseudo.get_type_of_expression(with_shorthand),
        PseudoType::Inferred(with_shorthand)
    );
}

#[test]
fn test_computed_literal_key_is_safe_but_expression_key_is_not() {
    let mut b = ProgramBuilder::new();
    let key = b.string_lit("a-b");
    let literal_name = b.computed_name(key);
    let one = b.number_lit("1");
    let literal_prop = b.arena.add(
        SyntaxKind::PropertyAssignment,
        NodeData::PropertyAssignment {
            name: literal_name,
            initializer: one,
        },
    );
    let safe = object_with_members(&mut b, vec![literal_prop]);

    let sym = b.ident("sym");
    let expression_name = b.computed_name(sym);
    let two = b.number_lit("2");
    let expression_prop = b.arena.add(
        SyntaxKind::PropertyAssignment,
        NodeData::PropertyAssignment {
            name: expression_name,
            initializer: two,
        },
    );
    let unsafe_object = object_with_members(&mut b, vec![expression_prop]);
    let (s1, _) = b.variable("a", NodeIndex::NONE, safe, false, 0);
    let (s2, _) = b.variable("b", NodeIndex::NONE, unsafe_object, false, 0);
    b.file("main.ts", vec![s1, s2], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    match pseudo.get_type_of_expression(safe) {
        PseudoType::ObjectLiteral(elements) => {
            assert_eq!(elements.len(), 1);
            assert_eq!(elements[0].name, literal_name);
        }
        other => panic!("expected an object literal, got {other:?}"),
    }
    assert_eq!(
        pseudo.get_type_of_expression(unsafe_object),
        PseudoType::Inferred(unsafe_object)
    );
}

#[test]
fn test_array_literal_is_a_tuple_only_in_const_context() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let plain = b.array_literal(vec![one]);
    let two = b.number_lit("2");
    let constant = b.array_literal(vec![two]);
    let asserted = b.as_const(constant);
    let (s1, _) = b.variable("a", NodeIndex::NONE, plain, false, 0);
    let (s2, _) = b.variable("b", NodeIndex::NONE, asserted, false, 0);
    b.file("main.ts", vec![s1, s2], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    assert_eq!(pseudo.get_type_of_expression(plain), PseudoType::Inferred(plain));
    assert_eq!(
        pseudo.get_type_of_expression(asserted),
        PseudoType::Tuple(vec![PseudoType::maybe_const(
            two,
            PseudoType::Literal(two),
            PseudoType::Number
        )])
    );
}

#[test]
fn test_arrow_with_unknowable_return_degrades_whole_expression() {
    let mut b = ProgramBuilder::new();
    let string = b.keyword(SyntaxKind::StringKeyword);
    let p = b.param("s", string, false);
    let body = b.string_lit("x");
    let concise = b.arrow(vec![p], NodeIndex::NONE, body);

    let call_target = b.ident("compute");
    let call = b.arena.add(
        SyntaxKind::CallExpression,
        NodeData::Call {
            expression: call_target,
            arguments: Vec::new(),
        },
    );
    let ret = b.return_statement(call);
    let block = b.block(vec![ret]);
    let with_block = b.arrow(Vec::new(), NodeIndex::NONE, block);
    let (s1, _) = b.variable("f", NodeIndex::NONE, concise, true, 0);
    let (s2, _) = b.variable("g", NodeIndex::NONE, with_block, true, 0);
    b.file("main.ts", vec![s1, s2], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    match pseudo.get_type_of_expression(concise) {
        PseudoType::SingleCallSignature(signature) => {
            assert_eq!(signature.parameters.len(), 1);
            assert_eq!(signature.parameters[0].type_, PseudoType::Direct(string));
            assert!(matches!(signature.return_type, PseudoType::MaybeConstLocation { .. }));
        }
        other => panic!("expected a signature, got {other:?}"),
    }
    assert_eq!(pseudo.get_type_of_expression(with_block), PseudoType::Inferred(with_block));
}

#[test]
fn test_object_literal_accessor_pairing() {
    let mut b = ProgramBuilder::new();
    // get only: readonly property
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let getter_only = b.accessor(SyntaxKind::GetAccessor, "size", Vec::new(), number);
    // same annotation on both sides: one mutable property
    let string = b.keyword(SyntaxKind::StringKeyword);
    let get_name = b.accessor(SyntaxKind::GetAccessor, "name", Vec::new(), string);
    let string2 = b.keyword(SyntaxKind::StringKeyword);
    let name_param = b.param("v", string2, false);
    let set_name = b.accessor(SyntaxKind::SetAccessor, "name", vec![name_param], NodeIndex::NONE);
    // different annotations: separate accessors
    let number2 = b.keyword(SyntaxKind::NumberKeyword);
    let get_width = b.accessor(SyntaxKind::GetAccessor, "width", Vec::new(), number2);
    let string3 = b.keyword(SyntaxKind::StringKeyword);
    let width_param = b.param("v", string3, false);
    let set_width = b.accessor(SyntaxKind::SetAccessor, "width", vec![width_param], NodeIndex::NONE);

    let object = object_with_members(
        &mut b,
        vec![getter_only, get_name, set_name, get_width, set_width],
    );
    let (stmt, _) = b.variable("o", NodeIndex::NONE, object, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    let PseudoType::ObjectLiteral(elements) = pseudo.get_type_of_expression(object) else {
        panic!("expected an object literal");
    };
    assert_eq!(elements.len(), 4);
    assert_eq!(
        elements[0].kind,
        PseudoObjectElementKind::Property {
            readonly: true,
            type_: PseudoType::Direct(number),
        }
    );
    assert_eq!(
        elements[1].kind,
        PseudoObjectElementKind::Property {
            readonly: false,
            type_: PseudoType::Direct(string),
        }
    );
    assert_eq!(
        elements[2].kind,
        PseudoObjectElementKind::GetAccessor(PseudoType::Direct(number2))
    );
    match &elements[3].kind {
        PseudoObjectElementKind::SetAccessor(param) => {
            assert_eq!(param.type_, PseudoType::Direct(string3));
        }
        other => panic!("expected a set accessor, got {other:?}"),
    }
}

#[test]
fn test_class_accessor_prefers_getter_annotation() {
    let mut b = ProgramBuilder::new();
    let string = b.keyword(SyntaxKind::StringKeyword);
    let param = b.param("v", string, false);
    let setter = b.accessor(SyntaxKind::SetAccessor, "label", vec![param], NodeIndex::NONE);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let getter = b.accessor(SyntaxKind::GetAccessor, "label", Vec::new(), number);
    let class = b.class("Widget", vec![setter, getter], 0);
    b.file("main.ts", vec![class], None);
    let program = b.build_default();

    let pseudo = PseudoChecker::new(&program.arena, &program.binder);
    assert_eq!(pseudo.get_type_of_declaration(setter), PseudoType::Direct(number));
    assert_eq!(pseudo.get_return_type_of_signature(setter), PseudoType::Void);
}
