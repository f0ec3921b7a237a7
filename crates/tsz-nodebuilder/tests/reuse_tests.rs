use tsz_ast::{NodeIndex, SyntaxKind, modifier_flags, print_type_node};
use tsz_binder::symbol_flags;
use tsz_checker::TypeChecker;
use tsz_nodebuilder::{
    CancellationToken, InternalNodeBuilderFlags, NodeBuilder, NodeBuilderError, NoopTracker, RecordingTracker,
    SynthesisOptions, SynthesisScope,
};
use tsz_test_util::{Program, ProgramBuilder, init_tracing};

/// ```ts
/// namespace NS {
///     type Hidden = { a: number };
///     export let v: Hidden;
///     export interface Shown { b: string }
/// }
/// type Outside = any;
/// ```
struct Fixture {
    program: Program,
    v: NodeIndex,
    v_annotation: NodeIndex,
    outside: NodeIndex,
}

fn fixture() -> Fixture {
    init_tracing();
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let a = b.property_signature("a", number, false, 0);
    let literal = b.type_literal(vec![a]);
    let hidden = b.type_alias("Hidden", vec![], literal, 0);
    let v_annotation = b.type_ref("Hidden", vec![]);
    let (v_stmt, v) = b.variable("v", v_annotation, NodeIndex::NONE, false, modifier_flags::EXPORT);
    let string = b.keyword(SyntaxKind::StringKeyword);
    let member = b.property_signature("b", string, false, 0);
    let shown = b.interface("Shown", vec![], vec![member], modifier_flags::EXPORT);
    let ns = b.namespace("NS", vec![hidden, v_stmt, shown], 0);
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let outside = b.type_alias("Outside", vec![], any, 0);
    b.file("main.ts", vec![ns, outside], None);
    Fixture {
        program: b.build_default(),
        v,
        v_annotation,
        outside,
    }
}

fn serialize_v(fx: &Fixture, builder: &NodeBuilder, enclosing: NodeIndex, tracker: &mut RecordingTracker) -> String {
    let symbol = fx.program.symbol_of(fx.v).expect("v");
    let type_id = fx.program.checker.get_type_of_symbol(symbol);
    let node = builder
        .serialize_type_for_declaration(fx.v, type_id, Some(symbol), SynthesisScope::new(enclosing), tracker)
        .expect("serializes");
    print_type_node(&node)
}

#[test]
fn test_annotation_inaccessible_from_target_is_rebuilt_structurally() {
    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());

    let mut tracker = RecordingTracker::new();
    assert_eq!(serialize_v(&fx, &builder, fx.outside, &mut tracker), "{ a: number; }");
    assert_eq!(tracker.inference_fallbacks(), 1);
}

#[test]
fn test_annotation_accessible_from_target_is_copied() {
    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());

    let mut tracker = RecordingTracker::new();
    assert_eq!(serialize_v(&fx, &builder, fx.v, &mut tracker), "Hidden");
    assert_eq!(tracker.inference_fallbacks(), 0);
}

#[test]
fn test_unexported_interface_is_written_by_structure_outside_its_namespace() {
    init_tracing();
    // namespace NS { interface Hidden { a: number } export let v: Hidden; }
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let a = b.property_signature("a", number, false, 0);
    let hidden = b.interface("Hidden", vec![], vec![a], 0);
    let annotation = b.type_ref("Hidden", vec![]);
    let (v_stmt, v) = b.variable("v", annotation, NodeIndex::NONE, false, modifier_flags::EXPORT);
    let ns = b.namespace("NS", vec![hidden, v_stmt], 0);
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let outside = b.type_alias("Outside", vec![], any, 0);
    b.file("main.ts", vec![ns, outside], None);
    let program = b.build_default();
    let builder = NodeBuilder::new(program.shared_checker(), SynthesisOptions::default());
    let symbol = program.symbol_of(v).expect("v");
    let type_id = program.checker.get_type_of_symbol(symbol);

    let mut tracker = RecordingTracker::new();
    let node = builder
        .serialize_type_for_declaration(v, type_id, Some(symbol), SynthesisScope::new(outside), &mut tracker)
        .expect("serializes");
    assert_eq!(print_type_node(&node), "{ a: number; }");
    assert_eq!(tracker.inference_fallbacks(), 1);

    let inside = builder
        .type_to_string(type_id, SynthesisScope::new(v), &mut NoopTracker)
        .expect("synthesizes");
    assert_eq!(inside, "Hidden");
}

#[test]
fn test_reuse_type_node_reports_unreusable_annotations_as_none() {
    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());

    let inside = builder
        .reuse_type_node(fx.v_annotation, SynthesisScope::new(fx.v), &mut NoopTracker)
        .expect("no error");
    assert_eq!(inside.as_ref().map(print_type_node).as_deref(), Some("Hidden"));

    let outside = builder
        .reuse_type_node(fx.v_annotation, SynthesisScope::new(fx.outside), &mut NoopTracker)
        .expect("no error");
    assert!(outside.is_none());
}

#[test]
fn test_exported_member_is_qualified_through_its_namespace() {
    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());
    let ns = fx.program.symbol("NS").expect("NS");
    let shown = fx
        .program
        .binder
        .symbol(ns)
        .and_then(|s| s.exports.get("Shown"))
        .expect("Shown is exported");

    let mut tracker = RecordingTracker::new();
    let name = builder
        .symbol_to_entity_name(shown, symbol_flags::TYPE, SynthesisScope::new(fx.outside), &mut tracker)
        .expect("names");
    assert_eq!(name.text(), "NS.Shown");
    assert!(tracker.tracked.iter().any(|(symbol, _, _)| *symbol == shown));
}

#[test]
fn test_cancelled_builder_stops_before_synthesis() {
    let fx = fixture();
    let token = CancellationToken::new();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default())
        .with_cancellation(token.clone());
    let scope = SynthesisScope::new(fx.v);
    let symbol = fx.program.symbol_of(fx.v).expect("v");
    let type_id = fx.program.checker.get_type_of_symbol(symbol);

    assert!(builder.type_to_type_node(type_id, scope, &mut NoopTracker).is_ok());

    token.cancel();
    assert!(builder.cancellation_token().is_cancelled());
    assert_eq!(
        builder.type_to_type_node(type_id, scope, &mut NoopTracker),
        Err(NodeBuilderError::Cancelled)
    );
    assert_eq!(
        builder.reuse_type_node(fx.v_annotation, scope, &mut NoopTracker),
        Err(NodeBuilderError::Cancelled)
    );
}

#[test]
fn test_inaccessible_member_annotation_is_partially_reused() {
    init_tracing();
    // namespace NS { type Hidden = { a: number }; export let w: { h: Hidden; s: string } }
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let a = b.property_signature("a", number, false, 0);
    let literal = b.type_literal(vec![a]);
    let hidden = b.type_alias("Hidden", vec![], literal, 0);
    let hidden_ref = b.type_ref("Hidden", vec![]);
    let h = b.property_signature("h", hidden_ref, false, 0);
    let string = b.keyword(SyntaxKind::StringKeyword);
    let s = b.property_signature("s", string, false, 0);
    let annotation = b.type_literal(vec![h, s]);
    let (w_stmt, w) = b.variable("w", annotation, NodeIndex::NONE, false, modifier_flags::EXPORT);
    let ns = b.namespace("NS", vec![hidden, w_stmt], 0);
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let outside = b.type_alias("Outside", vec![], any, 0);
    b.file("main.ts", vec![ns, outside], None);
    let program = b.build_default();
    let builder = NodeBuilder::new(program.shared_checker(), SynthesisOptions::default());

    let inside = builder
        .reuse_type_node(annotation, SynthesisScope::new(w), &mut NoopTracker)
        .expect("no error");
    assert_eq!(inside.as_ref().map(print_type_node).as_deref(), Some("{ h: Hidden; s: string; }"));

    let outside = builder
        .reuse_type_node(annotation, SynthesisScope::new(outside), &mut NoopTracker)
        .expect("no error");
    assert_eq!(
        outside.as_ref().map(print_type_node).as_deref(),
        Some("{ h: { a: number; }; s: string; }")
    );
}

#[test]
fn test_unresolved_name_is_reused_only_when_allowed() {
    init_tracing();
    let mut b = ProgramBuilder::new();
    let missing = b.type_ref("Missing", vec![]);
    let (stmt, v) = b.variable("v", missing, NodeIndex::NONE, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();
    let builder = NodeBuilder::new(program.shared_checker(), SynthesisOptions::default());

    let rejected = builder
        .reuse_type_node(missing, SynthesisScope::new(v), &mut NoopTracker)
        .expect("no error");
    assert!(rejected.is_none());

    let scope = SynthesisScope::new(v).with_internal_flags(InternalNodeBuilderFlags::ALLOW_UNRESOLVED_NAMES);
    let allowed = builder
        .reuse_type_node(missing, scope, &mut NoopTracker)
        .expect("no error");
    assert_eq!(allowed.as_ref().map(print_type_node).as_deref(), Some("Missing"));
}

#[test]
fn test_jsdoc_types_are_normalized_when_reused() {
    init_tracing();
    let mut b = ProgramBuilder::new();
    let all = b.keyword(SyntaxKind::JSDocAllType);
    let string = b.keyword(SyntaxKind::StringKeyword);
    let nullable = b.type_wrapper(SyntaxKind::JSDocNullableType, string);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let optional = b.type_wrapper(SyntaxKind::JSDocOptionalType, number);
    let boolean = b.keyword(SyntaxKind::BooleanKeyword);
    let variadic = b.type_wrapper(SyntaxKind::JSDocVariadicType, boolean);
    let unknown = b.keyword(SyntaxKind::JSDocUnknownType);
    let union = b.union_type(vec![all, nullable, optional, variadic, unknown]);
    let (stmt, j) = b.variable("j", union, NodeIndex::NONE, false, 0);
    let file = b.file("main.js", vec![stmt], None);
    b.mark_javascript(file);
    let program = b.build_default();
    let builder = NodeBuilder::new(program.shared_checker(), SynthesisOptions::default());

    let cases = [
        (all, "any"),
        (nullable, "string | null"),
        (optional, "number | undefined"),
        (variadic, "boolean[]"),
        (unknown, "unknown"),
    ];
    for (node, expected) in cases {
        let reused = builder
            .reuse_type_node(node, SynthesisScope::new(j), &mut NoopTracker)
            .expect("no error");
        assert_eq!(reused.as_ref().map(print_type_node).as_deref(), Some(expected));
    }
}
