use tsz_ast::synth::{SignatureKind, TypeNode};
use tsz_ast::{NodeData, NodeIndex, SyntaxKind, print_type_node};
use tsz_checker::{CheckerOptions, TypeChecker};
use tsz_nodebuilder::{NodeBuilder, NoopTracker, RecordingTracker, SynthesisOptions, SynthesisScope};
use tsz_test_util::{Program, ProgramBuilder, init_tracing};

fn builder_for(program: &Program) -> NodeBuilder {
    init_tracing();
    NodeBuilder::new(program.shared_checker(), SynthesisOptions::default())
}

/// Declaration type written for the symbol declared at `declaration`.
fn declaration_type(builder: &NodeBuilder, program: &Program, declaration: NodeIndex) -> String {
    let symbol = program.symbol_of(declaration).expect("bound declaration");
    let type_id = program.checker.get_type_of_symbol(symbol);
    let node = builder
        .serialize_type_for_declaration(
            declaration,
            type_id,
            Some(symbol),
            SynthesisScope::new(declaration),
            &mut NoopTracker,
        )
        .expect("serializes");
    print_type_node(&node)
}

#[test]
fn test_annotated_variable_keeps_its_annotation() {
    let mut b = ProgramBuilder::new();
    let string = b.keyword(SyntaxKind::StringKeyword);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let union = b.union_type(vec![string, number]);
    let (stmt, decl) = b.variable("x", union, NodeIndex::NONE, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program);

    assert_eq!(declaration_type(&builder, &program, decl), "string | number");
}

#[test]
fn test_const_asserted_object_literal_is_readonly_and_literal() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let object = b.object_literal(vec![("a", one)]);
    let asserted = b.as_const(object);
    let (stmt, decl) = b.variable("x", NodeIndex::NONE, asserted, true, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program);

    assert_eq!(declaration_type(&builder, &program, decl), "{ readonly a: 1; }");
}

#[test]
fn test_mutable_object_literal_is_widened() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let object = b.object_literal(vec![("a", one)]);
    let (stmt, decl) = b.variable("y", NodeIndex::NONE, object, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program);

    assert_eq!(declaration_type(&builder, &program, decl), "{ a: number; }");
}

fn optional_parameter_program(options: CheckerOptions) -> (Program, NodeIndex) {
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let x = b.param("x", number, true);
    let void = b.keyword(SyntaxKind::VoidKeyword);
    let f = b.function_declaration("f", vec![], vec![x], void, NodeIndex::NONE, 0);
    b.file("main.ts", vec![f], None);
    (b.build(options), x)
}

#[test]
fn test_optional_parameter_gains_undefined_under_strict_null_checks() {
    let (program, x) = optional_parameter_program(CheckerOptions::default());
    let builder = builder_for(&program);
    assert_eq!(declaration_type(&builder, &program, x), "number | undefined");
}

#[test]
fn test_optional_parameter_without_strict_null_checks() {
    let (program, x) = optional_parameter_program(CheckerOptions {
        strict_null_checks: false,
    });
    init_tracing();
    let builder = NodeBuilder::new(
        program.shared_checker(),
        SynthesisOptions {
            strict_null_checks: false,
            ..SynthesisOptions::default()
        },
    );
    assert_eq!(declaration_type(&builder, &program, x), "number");
}

#[test]
fn test_unannotated_parameter_falls_back_to_checker_once() {
    let mut b = ProgramBuilder::new();
    let p = b.param("p", NodeIndex::NONE, false);
    let g = b.function_declaration("g", vec![], vec![p], NodeIndex::NONE, NodeIndex::NONE, 0);
    b.file("main.ts", vec![g], None);
    let program = b.build_default();
    let builder = builder_for(&program);

    let symbol = program.symbol_of(p).expect("p");
    let type_id = program.checker.get_type_of_symbol(symbol);
    let mut tracker = RecordingTracker::new();
    let node = builder
        .serialize_type_for_declaration(p, type_id, Some(symbol), SynthesisScope::new(p), &mut tracker)
        .expect("serializes");
    assert_eq!(tracker.inference_fallbacks(), 1);

    let synthesized = builder
        .type_to_string(type_id, SynthesisScope::new(p), &mut NoopTracker)
        .expect("synthesizes");
    assert_eq!(print_type_node(&node), synthesized);
}

#[test]
fn test_signature_becomes_function_type() {
    let mut b = ProgramBuilder::new();
    let string = b.keyword(SyntaxKind::StringKeyword);
    let a = b.param("a", string, false);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let opt = b.param("b", number, true);
    let boolean = b.keyword(SyntaxKind::BooleanKeyword);
    let f = b.function_declaration("f", vec![], vec![a, opt], boolean, NodeIndex::NONE, 0);
    b.file("main.ts", vec![f], None);
    let program = b.build_default();
    let builder = builder_for(&program);

    let signature = program
        .checker
        .get_signature_from_declaration(f)
        .expect("signature");
    let declaration = builder
        .signature_to_signature_declaration(
            signature,
            SignatureKind::FunctionType,
            SynthesisScope::new(f),
            &mut NoopTracker,
        )
        .expect("serializes");
    assert_eq!(
        print_type_node(&TypeNode::Function(Box::new(declaration))),
        "(a: string, b?: number | undefined) => boolean"
    );
}

#[test]
fn test_type_predicate_return_is_written_as_predicate() {
    let mut b = ProgramBuilder::new();
    let unknown = b.keyword(SyntaxKind::UnknownKeyword);
    let x = b.param("x", unknown, false);
    let parameter_name = b.ident("x");
    let string = b.keyword(SyntaxKind::StringKeyword);
    let predicate = b.arena.add(
        SyntaxKind::TypePredicate,
        NodeData::TypePredicate {
            asserts: false,
            parameter_name,
            type_node: string,
        },
    );
    let is_string = b.function_declaration("isString", vec![], vec![x], predicate, NodeIndex::NONE, 0);
    b.file("main.ts", vec![is_string], None);
    let program = b.build_default();
    let builder = builder_for(&program);

    let signature = program
        .checker
        .get_signature_from_declaration(is_string)
        .expect("signature");
    let node = builder
        .serialize_return_type_for_signature(signature, SynthesisScope::new(is_string), &mut NoopTracker)
        .expect("serializes");
    assert_eq!(print_type_node(&node), "x is string");
}

#[test]
fn test_fallback_reports_once_for_declarations_inside_the_synthesized_type() {
    // function g(p) {}
    // let h = g;
    let mut b = ProgramBuilder::new();
    let p = b.param("p", NodeIndex::NONE, false);
    let g = b.function_declaration("g", vec![], vec![p], NodeIndex::NONE, NodeIndex::NONE, 0);
    let reference = b.ident("g");
    let (stmt, h) = b.variable("h", NodeIndex::NONE, reference, false, 0);
    b.file("main.ts", vec![g, stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program);

    let symbol = program.symbol_of(h).expect("h");
    let type_id = program.checker.get_type_of_symbol(symbol);
    let mut tracker = RecordingTracker::new();
    let node = builder
        .serialize_type_for_declaration(h, type_id, Some(symbol), SynthesisScope::new(h), &mut tracker)
        .expect("serializes");
    assert!(print_type_node(&node).starts_with("(p"), "{}", print_type_node(&node));
    assert_eq!(
        tracker.events,
        vec![tsz_nodebuilder::TrackerEvent::InferenceFallback { node: reference }]
    );

    // Asked for directly, the parameter still reports its own fallback.
    let mut tracker = RecordingTracker::new();
    let p_symbol = program.symbol_of(p).expect("p");
    let p_type = program.checker.get_type_of_symbol(p_symbol);
    builder
        .serialize_type_for_declaration(p, p_type, Some(p_symbol), SynthesisScope::new(p), &mut tracker)
        .expect("serializes");
    assert_eq!(tracker.inference_fallbacks(), 1);
}

#[test]
fn test_annotation_naming_an_alias_is_kept_for_the_unaliased_type() {
    // type Pair = string | number;
    // let x: Pair;
    let mut b = ProgramBuilder::new();
    let string = b.keyword(SyntaxKind::StringKeyword);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let union = b.union_type(vec![string, number]);
    let pair = b.type_alias("Pair", vec![], union, 0);
    let annotation = b.type_ref("Pair", vec![]);
    let (stmt, x) = b.variable("x", annotation, NodeIndex::NONE, false, 0);
    b.file("main.ts", vec![pair, stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program);
    let symbol = program.symbol_of(x).expect("x");
    let serialize = |type_id| {
        builder
            .serialize_type_for_declaration(x, type_id, Some(symbol), SynthesisScope::new(x), &mut NoopTracker)
            .map(|node| print_type_node(&node))
            .expect("serializes")
    };

    let aliased = program.checker.get_type_of_symbol(symbol);
    let body = program.interner.union(&[tsz_solver::TypeId::STRING, tsz_solver::TypeId::NUMBER]);
    assert_ne!(aliased, body);
    assert_eq!(serialize(aliased), "Pair");
    assert_eq!(serialize(body), "Pair");
    assert_eq!(serialize(tsz_solver::TypeId::STRING), "string");
}
