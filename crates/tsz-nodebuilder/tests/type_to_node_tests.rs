use std::sync::Arc;

use tsz_ast::{MappedTypeData, NodeData, NodeIndex, SyntaxKind, modifier_flags, print_type_node};
use tsz_nodebuilder::{
    NodeBuilder, NodeBuilderError, NodeBuilderFlags, NoopTracker, RecordingTracker, SynthesisOptions,
    SynthesisScope, TrackerEvent,
};
use tsz_solver::{
    ConditionalRoot, ConditionalType, ElementFlags, ObjectFlags, ObjectType, PropertyInfo, ReverseMappedInfo,
    TupleElementLabel, TypeData, TypeFlags, TypeId, TypeInfo, TypeParamInfo, TypeSubstitution, Visibility,
    check_flags, instantiate_type,
};
use tsz_checker::TypeChecker;
use tsz_test_util::{Program, ProgramBuilder, init_tracing};

fn builder_for(program: &Program, options: SynthesisOptions) -> NodeBuilder {
    init_tracing();
    NodeBuilder::new(program.shared_checker(), options)
}

fn empty_program() -> Program {
    let mut b = ProgramBuilder::new();
    b.file("main.ts", vec![], None);
    b.build_default()
}

fn print(builder: &NodeBuilder, type_id: TypeId, scope: SynthesisScope) -> String {
    builder
        .type_to_string(type_id, scope, &mut NoopTracker)
        .expect("synthesis succeeds")
}

fn object_with(program: &Program, properties: Vec<PropertyInfo>) -> TypeId {
    program.interner.object(ObjectType {
        properties,
        ..ObjectType::default()
    })
}

#[test]
fn test_primitives_print_as_keywords() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let scope = SynthesisScope::default();
    let cases = [
        (TypeId::ANY, "any"),
        (TypeId::ERROR, "any"),
        (TypeId::UNKNOWN, "unknown"),
        (TypeId::STRING, "string"),
        (TypeId::NUMBER, "number"),
        (TypeId::BIGINT, "bigint"),
        (TypeId::BOOLEAN, "boolean"),
        (TypeId::SYMBOL, "symbol"),
        (TypeId::VOID, "void"),
        (TypeId::UNDEFINED, "undefined"),
        (TypeId::NULL, "null"),
        (TypeId::NEVER, "never"),
        (TypeId::OBJECT, "object"),
        (TypeId::EMPTY_OBJECT, "{}"),
    ];
    for (type_id, expected) in cases {
        assert_eq!(print(&builder, type_id, scope), expected, "type {type_id:?}");
    }
}

#[test]
fn test_literal_types() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let scope = SynthesisScope::default();
    let interner = &program.interner;

    assert_eq!(print(&builder, interner.string_literal("hello"), scope), "\"hello\"");
    assert_eq!(print(&builder, interner.number_literal(1.5), scope), "1.5");
    assert_eq!(print(&builder, interner.bigint_literal("10"), scope), "10n");
    assert_eq!(print(&builder, TypeId::BOOLEAN_TRUE, scope), "true");
    assert_eq!(print(&builder, TypeId::BOOLEAN_FALSE, scope), "false");

    let single = scope.with_flags(NodeBuilderFlags::USE_SINGLE_QUOTES_FOR_STRING_LITERAL_TYPE);
    assert_eq!(print(&builder, interner.string_literal("hello"), single), "'hello'");
}

#[test]
fn test_union_folds_booleans_and_moves_nullables_last() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let union = program.interner.union(&[
        TypeId::UNDEFINED,
        TypeId::BOOLEAN_TRUE,
        TypeId::STRING,
        TypeId::BOOLEAN_FALSE,
    ]);
    assert_eq!(
        print(&builder, union, SynthesisScope::default()),
        "string | boolean | undefined"
    );
}

#[test]
fn test_empty_union_is_an_error_unless_allowed() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let empty = program.interner.origin_union(Vec::new());

    let err = builder
        .type_to_type_node(empty, SynthesisScope::default(), &mut NoopTracker)
        .expect_err("empty union cannot be written");
    assert_eq!(err, NodeBuilderError::EncounteredError);

    let allowed = SynthesisScope::default().with_flags(NodeBuilderFlags::ALLOW_EMPTY_UNION_OR_INTERSECTION);
    assert_eq!(print(&builder, empty, allowed), "never");
}

#[test]
fn test_synthesis_is_repeatable_on_one_binding() {
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let x = b.property_signature("x", number, false, 0);
    let string = b.keyword(SyntaxKind::StringKeyword);
    let label = b.property_signature("label", string, false, 0);
    let literal = b.type_literal(vec![x, label]);
    let (stmt, decl) = b.variable("point", literal, NodeIndex::NONE, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program, SynthesisOptions::default());
    let point = program.type_of("point").expect("point");

    let mut tracker = RecordingTracker::new();
    let mut bound = builder.bind(&mut tracker);
    let scope = SynthesisScope::new(decl);
    let first = bound.type_to_type_node(point, scope).expect("first");
    let second = bound.type_to_type_node(point, scope).expect("second");
    assert_eq!(first, second);
    assert_eq!(bound.context_depth(), 0);
    assert_eq!(print_type_node(&first), "{ x: number; label: string; }");
}

#[test]
fn test_enum_and_enum_members_are_named() {
    let mut b = ProgramBuilder::new();
    let color = b.enum_declaration("Color", vec![("Red", None), ("Green", None)], 0);
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let anchor = b.type_alias("Anchor", vec![], any, 0);
    b.file("main.ts", vec![color, anchor], None);
    let program = b.build_default();
    let builder = builder_for(&program, SynthesisOptions::default());
    let scope = SynthesisScope::new(anchor);

    let declared = program.declared_type("Color").expect("Color");
    assert_eq!(print(&builder, declared, scope), "Color");
    let red = program.interner.get(declared).constituents()[0];
    assert_eq!(print(&builder, red, scope), "Color.Red");
}

#[test]
fn test_array_reference_uses_array_syntax() {
    let mut b = ProgramBuilder::new();
    let one = b.number_lit("1");
    let two = b.number_lit("2");
    let array = b.array_literal(vec![one, two]);
    let (stmt, decl) = b.variable("xs", NodeIndex::NONE, array, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program, SynthesisOptions::default());
    let xs = program.type_of("xs").expect("xs");

    assert_eq!(print(&builder, xs, SynthesisScope::new(decl)), "number[]");
    let generic = SynthesisScope::new(decl).with_flags(NodeBuilderFlags::WRITE_ARRAY_AS_GENERIC_TYPE);
    assert_eq!(print(&builder, xs, generic), "Array<number>");
}

#[test]
fn test_conditional_type_keeps_its_shape() {
    let mut b = ProgramBuilder::new();
    let t = b.type_param("T", NodeIndex::NONE);
    let check = b.type_ref("T", vec![]);
    let string = b.keyword(SyntaxKind::StringKeyword);
    let true_token = b.token(SyntaxKind::TrueKeyword);
    let yes = b.literal_type(true_token);
    let false_token = b.token(SyntaxKind::FalseKeyword);
    let no = b.literal_type(false_token);
    let conditional = b.arena.add(
        SyntaxKind::ConditionalType,
        NodeData::Conditional {
            check_type: check,
            extends_type: string,
            true_type: yes,
            false_type: no,
        },
    );
    let alias = b.type_alias("IsString", vec![t], conditional, 0);
    b.file("main.ts", vec![alias], None);
    let program = b.build_default();
    let builder = builder_for(&program, SynthesisOptions::default());

    let conditional_type = program.checker.get_type_from_type_node(conditional);
    assert!(program.interner.flags(conditional_type).contains(TypeFlags::CONDITIONAL));
    assert_eq!(
        print(&builder, conditional_type, SynthesisScope::new(alias)),
        "T extends string ? true : false"
    );
}

#[test]
fn test_distributive_conditional_renames_only_the_check_variable() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let interner = &program.interner;

    // `T extends keyof U ? true : false` instantiated with `T := keyof U`.
    let t = interner.type_parameter(TypeParamInfo::new("T"));
    let u = interner.type_parameter(TypeParamInfo::new("U"));
    let keyof_u = interner.index(u);
    let root = ConditionalRoot {
        node: NodeIndex::NONE,
        check_type: t,
        extends_type: keyof_u,
        true_type: TypeId::BOOLEAN_TRUE,
        false_type: TypeId::BOOLEAN_FALSE,
        is_distributive: true,
        infer_type_parameters: Vec::new(),
    };
    let conditional = interner.alloc(TypeInfo::new(
        TypeFlags::CONDITIONAL,
        TypeData::Conditional(ConditionalType {
            root,
            check_type: t,
            extends_type: keyof_u,
            true_type: TypeId::BOOLEAN_TRUE,
            false_type: TypeId::BOOLEAN_FALSE,
            mapper: None,
        }),
    ));
    let mut substitution = TypeSubstitution::new();
    substitution.insert(t, keyof_u);
    let instantiated = instantiate_type(interner, conditional, &substitution);

    let scope = SynthesisScope::default().with_flags(NodeBuilderFlags::GENERATE_NAMES_FOR_SHADOWED_TYPE_PARAMS);
    let printed = print(&builder, instantiated, scope);
    assert!(printed.starts_with("keyof U extends infer T ? "), "{printed}");
    assert!(printed.contains("T extends keyof U ? true : false"), "{printed}");
    assert!(!printed.contains("T extends T"), "{printed}");
}

#[test]
fn test_mapped_type_modifiers() {
    let mut b = ProgramBuilder::new();
    let a = b.string_literal_type("a");
    let c = b.string_literal_type("b");
    let keys = b.union_type(vec![a, c]);
    let k = b.type_param("K", keys);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let mapped = b.arena.add(
        SyntaxKind::MappedType,
        NodeData::Mapped(MappedTypeData {
            readonly_token: SyntaxKind::ReadonlyKeyword,
            type_parameter: k,
            name_type: NodeIndex::NONE,
            question_token: SyntaxKind::QuestionToken,
            type_node: number,
        }),
    );
    let (stmt, decl) = b.variable("frozen", mapped, NodeIndex::NONE, false, 0);
    b.file("main.ts", vec![stmt], None);
    let program = b.build_default();
    let builder = builder_for(&program, SynthesisOptions::default());

    let mapped_type = program.checker.get_type_from_type_node(mapped);
    assert_eq!(
        print(&builder, mapped_type, SynthesisScope::new(decl)),
        "{ readonly [K in \"a\" | \"b\"]?: number; }"
    );
}

/// `depth` objects nested through `child`, every level sharing `symbol`.
fn nested_objects(program: &Program, symbol: tsz_binder::SymbolId, depth: usize) -> TypeId {
    let mut inner = object_with(program, vec![PropertyInfo::new("leaf", TypeId::STRING)]);
    for _ in 0..depth {
        let info = TypeInfo::new(
            TypeFlags::OBJECT,
            TypeData::Object(ObjectType {
                properties: vec![PropertyInfo::new("child", inner)],
                ..ObjectType::default()
            }),
        )
        .with_object_flags(ObjectFlags::ANONYMOUS)
        .with_symbol(symbol);
        inner = program.interner.alloc(info);
    }
    inner
}

fn tree_program() -> Program {
    let mut b = ProgramBuilder::new();
    let tree = b.interface("Tree", vec![], vec![], 0);
    b.file("main.ts", vec![tree], None);
    b.build_default()
}

#[test]
fn test_recurring_symbol_is_cut_after_depth_limit() {
    let program = tree_program();
    let tree = program.symbol("Tree").expect("Tree");
    let builder = builder_for(
        &program,
        SynthesisOptions {
            maximum_truncation_length: 100_000,
            ..SynthesisOptions::default()
        },
    );
    let nested = nested_objects(&program, tree, 20);

    let printed = print(&builder, nested, SynthesisScope::default());
    let expected = format!("{}...{}", "{ child: ".repeat(11), "; }".repeat(11));
    assert_eq!(printed, expected);
    assert!(!printed.contains("leaf"));
}

#[test]
fn test_symbol_depth_limit_is_configurable() {
    let program = tree_program();
    let tree = program.symbol("Tree").expect("Tree");
    let builder = builder_for(
        &program,
        SynthesisOptions {
            maximum_symbol_depth: 1,
            ..SynthesisOptions::default()
        },
    );
    let nested = nested_objects(&program, tree, 5);
    assert_eq!(
        print(&builder, nested, SynthesisScope::default()),
        "{ child: { child: ...; }; }"
    );

    // Shallow enough to finish: the unshared leaf object is written in full.
    let shallow = nested_objects(&program, tree, 2);
    assert_eq!(
        print(&builder, shallow, SynthesisScope::default()),
        "{ child: { child: { leaf: string; }; }; }"
    );
}

fn wide_object(program: &Program, count: usize) -> TypeId {
    let properties = (0..count)
        .map(|i| PropertyInfo::new(format!("p{i}"), TypeId::NUMBER))
        .collect();
    object_with(program, properties)
}

#[test]
fn test_long_member_list_is_abbreviated_keeping_the_last_member() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let wide = wide_object(&program, 1000);

    let node = builder
        .type_to_type_node(wide, SynthesisScope::default(), &mut NoopTracker)
        .expect("synthesis succeeds");
    let printed = print_type_node(&node);
    assert!(printed.starts_with("{ p0: number; p1: number; "), "{printed}");
    assert!(printed.ends_with("p999: number; }"), "{printed}");
    let tsz_ast::synth::TypeNode::TypeLiteral(members) = node else {
        panic!("expected a type literal");
    };
    assert!(members.len() < 40, "{} members survived", members.len());

    // `written` leading members, the marker, then the last member: the
    // marker counts every property in between.
    let written = members.len() - 2;
    let elided = 1000 - written - 1;
    let expected_tail = format!(
        "p{}: number; ... {elided} more ...; p999: number; }}",
        written - 1
    );
    assert!(printed.ends_with(&expected_tail), "{printed}");
}

#[test]
fn test_no_truncation_writes_everything_within_its_budget() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let wide = wide_object(&program, 1000);

    let mut tracker = RecordingTracker::new();
    let printed = builder
        .type_to_string(
            wide,
            SynthesisScope::default().with_flags(NodeBuilderFlags::NO_TRUNCATION),
            &mut tracker,
        )
        .expect("synthesis succeeds");
    assert!(printed.contains("p500: number; p501: number;"));
    assert!(!printed.contains("more"));
    assert!(tracker.events.is_empty());
}

#[test]
fn test_no_truncation_over_budget_reports_truncation() {
    let program = empty_program();
    let builder = builder_for(
        &program,
        SynthesisOptions {
            no_truncation_maximum_truncation_length: 50,
            ..SynthesisOptions::default()
        },
    );
    let wide = wide_object(&program, 100);

    let mut tracker = RecordingTracker::new();
    builder
        .type_to_type_node(
            wide,
            SynthesisScope::default().with_flags(NodeBuilderFlags::NO_TRUNCATION),
            &mut tracker,
        )
        .expect("truncation is reported, not fatal");
    assert_eq!(tracker.events, vec![TrackerEvent::Truncation]);
}

#[test]
fn test_reverse_mapped_stack_is_balanced_between_siblings() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let interner = &program.interner;
    let mapped = interner.object(ObjectType::default());
    let anonymous_source = interner.object(ObjectType::default());

    let reverse_mapped = |name: &str, type_id: TypeId, property_type: TypeId| {
        let mut property = PropertyInfo::new(name, type_id);
        property.check_flags = check_flags::REVERSE_MAPPED;
        property.reverse_mapped = Some(ReverseMappedInfo {
            property_type,
            mapped_type: mapped,
        });
        property
    };

    // Inside `a` the innermost entry came from a non-anonymous source, so
    // nested reverse-mapped members are elided. Once `a` is done its entry
    // must be gone again, leaving `c` unaffected.
    let inner = object_with(&program, vec![reverse_mapped("d", TypeId::NUMBER, anonymous_source)]);
    let outer = object_with(
        &program,
        vec![
            reverse_mapped("a", inner, TypeId::STRING),
            reverse_mapped("c", TypeId::NUMBER, anonymous_source),
        ],
    );
    assert_eq!(
        print(&builder, outer, SynthesisScope::default()),
        "{ a: { d: ...; }; c: number; }"
    );
}

#[test]
fn test_iterable_drops_trailing_default_type_arguments() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let scope = SynthesisScope::default();
    let interner = &program.interner;
    let iterable = program.checker.globals().iterable.expect("lib declares Iterable");

    let cases = [
        (vec![TypeId::NUMBER, TypeId::ANY, TypeId::ANY], "Iterable<number>"),
        (vec![TypeId::NUMBER, TypeId::STRING, TypeId::ANY], "Iterable<number, string>"),
        (vec![TypeId::NUMBER, TypeId::ANY, TypeId::STRING], "Iterable<number, any, string>"),
    ];
    for (arguments, expected) in cases {
        let reference = interner.reference(iterable, arguments);
        assert_eq!(print(&builder, reference, scope), expected);
    }
}

#[test]
fn test_tuple_element_kinds() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let scope = SynthesisScope::default();
    let interner = &program.interner;
    let flags = vec![ElementFlags::REQUIRED, ElementFlags::OPTIONAL, ElementFlags::REST];
    let elements = vec![TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN];

    let plain = interner.tuple_target(flags.clone(), vec![None, None, None], false);
    assert_eq!(
        print(&builder, interner.reference(plain, elements.clone()), scope),
        "[string, number?, ...boolean[]]"
    );

    let label = |name: &str| {
        Some(TupleElementLabel {
            name: name.to_string(),
            declaration: NodeIndex::NONE,
        })
    };
    let labeled = interner.tuple_target(flags, vec![label("first"), label("second"), label("rest")], true);
    assert_eq!(
        print(&builder, interner.reference(labeled, elements), scope),
        "readonly [first: string, second?: number, ...rest: boolean[]]"
    );
}

#[test]
fn test_empty_tuple_is_an_error_unless_allowed() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let interner = &program.interner;
    let empty = interner.reference(interner.tuple_target(vec![], vec![], false), vec![]);

    assert_eq!(
        builder.type_to_string(empty, SynthesisScope::default(), &mut NoopTracker),
        Err(NodeBuilderError::EncounteredError)
    );
    let allowed = SynthesisScope::default().with_flags(NodeBuilderFlags::ALLOW_EMPTY_TUPLE);
    assert_eq!(print(&builder, empty, allowed), "[]");
}

/// ```ts
/// namespace NS { let s: any; }
/// type Outside = any;
/// ```
fn unique_symbol_program() -> (Program, NodeIndex, NodeIndex) {
    let mut b = ProgramBuilder::new();
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let (s_stmt, s) = b.variable("s", any, NodeIndex::NONE, false, 0);
    let ns = b.namespace("NS", vec![s_stmt], 0);
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let outside = b.type_alias("Outside", vec![], any, 0);
    b.file("main.ts", vec![ns, outside], None);
    (b.build_default(), s, outside)
}

#[test]
fn test_unique_symbol_is_written_as_typeof_where_accessible() {
    let (program, s, outside) = unique_symbol_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let symbol = program.symbol_of(s).expect("s");
    let unique = program.interner.unique_symbol(symbol);

    let mut tracker = RecordingTracker::new();
    let inside = builder
        .type_to_string(unique, SynthesisScope::new(s), &mut tracker)
        .expect("synthesizes");
    assert_eq!(inside, "typeof s");
    assert!(!tracker.events.contains(&TrackerEvent::InaccessibleUniqueSymbol));

    let mut tracker = RecordingTracker::new();
    let elsewhere = builder
        .type_to_string(unique, SynthesisScope::new(outside), &mut tracker)
        .expect("synthesizes");
    assert_eq!(elsewhere, "unique symbol");
    assert!(tracker.events.contains(&TrackerEvent::InaccessibleUniqueSymbol));

    let mut tracker = RecordingTracker::new();
    let allowed = SynthesisScope::new(outside).with_flags(NodeBuilderFlags::ALLOW_UNIQUE_ES_SYMBOL_TYPE);
    assert_eq!(
        builder.type_to_string(unique, allowed, &mut tracker).expect("synthesizes"),
        "unique symbol"
    );
    assert!(tracker.events.is_empty());
}

#[test]
fn test_late_bound_property_names() {
    let (program, s, _) = unique_symbol_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let symbol = program.symbol_of(s).expect("s");
    let late = |name_type: Option<TypeId>| {
        let mut property = PropertyInfo::new("__@s", TypeId::NUMBER);
        property.check_flags = check_flags::LATE;
        property.name_type = name_type;
        property
    };

    let named = object_with(&program, vec![late(Some(program.interner.unique_symbol(symbol)))]);
    let mut tracker = RecordingTracker::new();
    assert_eq!(
        builder
            .type_to_string(named, SynthesisScope::new(s), &mut tracker)
            .expect("synthesizes"),
        "{ [s]: number; }"
    );
    assert!(tracker.events.is_empty());

    let unnamed = object_with(&program, vec![late(None)]);
    let mut tracker = RecordingTracker::new();
    builder
        .type_to_string(unnamed, SynthesisScope::new(s), &mut tracker)
        .expect("synthesizes");
    assert_eq!(
        tracker.events,
        vec![TrackerEvent::NonSerializableProperty {
            property_name: "__@s".to_string()
        }]
    );
}

#[test]
fn test_this_inside_object_literal() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let this_type = program.interner.type_parameter(TypeParamInfo {
        is_this: true,
        ..TypeParamInfo::new("this")
    });
    let object = object_with(&program, vec![PropertyInfo::new("self", this_type)]);

    let mut tracker = RecordingTracker::new();
    assert_eq!(
        builder.type_to_string(this_type, SynthesisScope::default(), &mut tracker),
        Ok("this".to_string())
    );
    assert!(tracker.events.is_empty());

    let mut tracker = RecordingTracker::new();
    assert_eq!(
        builder.type_to_string(object, SynthesisScope::default(), &mut tracker),
        Err(NodeBuilderError::EncounteredError)
    );
    assert_eq!(tracker.events, vec![TrackerEvent::InaccessibleThis]);

    let mut tracker = RecordingTracker::new();
    let allowed = SynthesisScope::default().with_flags(NodeBuilderFlags::ALLOW_THIS_IN_OBJECT_LITERAL);
    assert_eq!(
        builder.type_to_string(object, allowed, &mut tracker).expect("allowed"),
        "{ self: this; }"
    );
    assert_eq!(tracker.events, vec![TrackerEvent::InaccessibleThis]);
}

#[test]
fn test_non_public_member_of_class_expression_is_reported() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let mut secret = PropertyInfo::new("secret", TypeId::STRING);
    secret.visibility = Visibility::Private;
    let object = object_with(&program, vec![PropertyInfo::new("open", TypeId::NUMBER), secret]);

    let mut tracker = RecordingTracker::new();
    builder
        .type_to_string(object, SynthesisScope::default(), &mut tracker)
        .expect("synthesizes");
    assert!(tracker.events.is_empty());

    let mut tracker = RecordingTracker::new();
    let scope = SynthesisScope::default().with_flags(NodeBuilderFlags::WRITE_CLASS_EXPRESSION_AS_TYPE_LITERAL);
    builder
        .type_to_string(object, scope, &mut tracker)
        .expect("synthesizes");
    assert_eq!(
        tracker.events,
        vec![TrackerEvent::PrivateInBaseOfClassExpression {
            property_name: "secret".to_string()
        }]
    );
}

#[test]
fn test_conflicting_intersection_is_reduced_unless_asked_not_to() {
    let program = empty_program();
    let builder = builder_for(&program, SynthesisOptions::default());
    let interner = &program.interner;
    let kind = |value: &str| object_with(&program, vec![PropertyInfo::new("kind", interner.string_literal(value))]);
    let conflicting = interner.intersection(&[kind("a"), kind("b")]);

    assert_eq!(print(&builder, conflicting, SynthesisScope::default()), "never");
    let unreduced = SynthesisScope::default().with_flags(NodeBuilderFlags::NO_TYPE_REDUCTION);
    assert_eq!(
        print(&builder, conflicting, unreduced),
        "{ kind: \"a\"; } & { kind: \"b\"; }"
    );

    let extra = object_with(&program, vec![PropertyInfo::new("n", TypeId::NUMBER)]);
    let compatible = interner.intersection(&[kind("a"), extra]);
    assert_eq!(
        print(&builder, compatible, SynthesisScope::default()),
        "{ kind: \"a\"; } & { n: number; }"
    );
}

#[test]
fn test_import_type_from_node_modules_is_reported() {
    init_tracing();
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let a = b.property_signature("a", number, false, 0);
    let exported = b.interface("Options", vec![], vec![a], modifier_flags::EXPORT);
    b.file("index.d.ts", vec![exported], Some("/app/node_modules/pkg/index"));
    let any = b.keyword(SyntaxKind::AnyKeyword);
    let local = b.type_alias("Local", vec![], any, 0);
    b.file("main.ts", vec![local], None);
    let program = b.build_default();
    let builder = builder_for(&program, SynthesisOptions::default());
    let options = program.symbol_of(exported).expect("Options");
    let options_type = program.checker.get_declared_type_of_symbol(options);

    let mut tracker = RecordingTracker::new();
    let printed = builder
        .type_to_string(options_type, SynthesisScope::new(local), &mut tracker)
        .expect("synthesizes");
    assert_eq!(printed, "import(\"/app/node_modules/pkg/index\").Options");
    assert_eq!(
        tracker.events,
        vec![TrackerEvent::LikelyUnsafeImport {
            specifier: "/app/node_modules/pkg/index".to_string()
        }]
    );

    let mut tracker = RecordingTracker::new();
    let allowed = SynthesisScope::new(local).with_flags(NodeBuilderFlags::ALLOW_NODE_MODULES_RELATIVE_PATHS);
    builder
        .type_to_string(options_type, allowed, &mut tracker)
        .expect("synthesizes");
    assert!(tracker.events.is_empty());
}

#[test]
fn test_shared_builder_is_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NodeBuilder>();
    assert_send_sync::<Arc<tsz_nodebuilder::SerializedTypeCache>>();
}
