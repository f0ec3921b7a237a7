use std::sync::Arc;

use rayon::prelude::*;
use tsz_ast::{NodeIndex, SyntaxKind};
use tsz_binder::SymbolId;
use tsz_nodebuilder::{
    CompositeTypeCacheIdentity, InternalNodeBuilderFlags, NodeBuilder, NodeBuilderFlags, NoopTracker,
    RecordingTracker, SerializedTypeCache, SynthesisOptions, SynthesisScope,
};
use tsz_solver::{ObjectFlags, ObjectType, PropertyInfo, TypeData, TypeFlags, TypeId, TypeInfo};
use tsz_test_util::{Program, ProgramBuilder, init_tracing};

/// ```ts
/// interface Point { x: number; y: number }
/// let shape: { origin: Point; size: number };
/// ```
struct Fixture {
    program: Program,
    shape: NodeIndex,
    shape_type: TypeId,
    point: SymbolId,
}

fn fixture() -> Fixture {
    init_tracing();
    let mut b = ProgramBuilder::new();
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let x = b.property_signature("x", number, false, 0);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let y = b.property_signature("y", number, false, 0);
    let point = b.interface("Point", vec![], vec![x, y], 0);
    let point_ref = b.type_ref("Point", vec![]);
    let origin = b.property_signature("origin", point_ref, false, 0);
    let number = b.keyword(SyntaxKind::NumberKeyword);
    let size = b.property_signature("size", number, false, 0);
    let literal = b.type_literal(vec![origin, size]);
    let (stmt, shape) = b.variable("shape", literal, NodeIndex::NONE, false, 0);
    b.file("main.ts", vec![point, stmt], None);
    let program = b.build_default();
    let shape_type = program.type_of("shape").expect("shape");
    let point = program.symbol("Point").expect("Point");
    Fixture {
        program,
        shape,
        shape_type,
        point,
    }
}

const EXPECTED: &str = "{ origin: Point; size: number; }";

fn shape_key(fx: &Fixture) -> CompositeTypeCacheIdentity {
    CompositeTypeCacheIdentity {
        type_id: fx.shape_type,
        flags: NodeBuilderFlags::empty(),
        internal_flags: InternalNodeBuilderFlags::empty(),
    }
}

#[test]
fn test_cache_does_not_change_output() {
    let fx = fixture();
    let cached = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());
    let uncached = NodeBuilder::new(
        fx.program.shared_checker(),
        SynthesisOptions {
            enable_cache: false,
            ..SynthesisOptions::default()
        },
    );
    assert!(uncached.cache().is_none());
    let scope = SynthesisScope::new(fx.shape);

    for _ in 0..2 {
        let with_cache = cached
            .type_to_string(fx.shape_type, scope, &mut NoopTracker)
            .expect("cached");
        let without_cache = uncached
            .type_to_string(fx.shape_type, scope, &mut NoopTracker)
            .expect("uncached");
        assert_eq!(with_cache, EXPECTED);
        assert_eq!(without_cache, EXPECTED);
    }
}

#[test]
fn test_entry_records_symbols_written_by_name() {
    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());
    let cache = Arc::clone(builder.cache().expect("cache enabled"));

    let mut tracker = RecordingTracker::new();
    builder
        .type_to_type_node(fx.shape_type, SynthesisScope::new(fx.shape), &mut tracker)
        .expect("synthesizes");
    assert!(tracker.tracked.iter().any(|(symbol, _, _)| *symbol == fx.point));

    let entry = cache.get(fx.shape, &shape_key(&fx)).expect("shape was stored");
    assert!(!entry.truncating);
    assert!(entry.added_length > 0);
    assert!(entry.tracked_symbols.iter().any(|args| args.symbol == fx.point));

    // Another enclosing declaration has its own entries.
    assert!(cache.get(NodeIndex::NONE, &shape_key(&fx)).is_none());
}

#[test]
fn test_cache_hit_replays_tracked_symbols() {
    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());
    let scope = SynthesisScope::new(fx.shape);

    builder
        .type_to_type_node(fx.shape_type, scope, &mut NoopTracker)
        .expect("populates");
    let entries = builder.cache().map_or(0, |c| c.len());
    assert!(entries > 0);

    let mut tracker = RecordingTracker::new();
    let printed = builder
        .type_to_string(fx.shape_type, scope, &mut tracker)
        .expect("hits");
    assert_eq!(printed, EXPECTED);
    assert!(tracker.tracked.iter().any(|(symbol, _, _)| *symbol == fx.point));
    assert_eq!(builder.cache().map_or(0, |c| c.len()), entries);
}

#[test]
fn test_rejected_symbol_keeps_result_out_of_cache() {
    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());

    let mut tracker = RecordingTracker::rejecting([fx.point]);
    let printed = builder
        .type_to_string(fx.shape_type, SynthesisScope::new(fx.shape), &mut tracker)
        .expect("still synthesizes");
    assert_eq!(printed, EXPECTED);
    let cache = builder.cache().expect("cache enabled");
    assert!(cache.get(fx.shape, &shape_key(&fx)).is_none());
}

#[test]
fn test_result_cut_by_a_cycle_is_not_cached() {
    let fx = fixture();
    let interner = &fx.program.interner;
    let literal = interner.get(fx.shape_type).symbol.expect("type literal symbol");
    let anonymous = |properties: Vec<PropertyInfo>| {
        TypeInfo::new(
            TypeFlags::OBJECT,
            TypeData::Object(ObjectType {
                properties,
                ..ObjectType::default()
            }),
        )
        .with_object_flags(ObjectFlags::ANONYMOUS)
        .with_symbol(literal)
    };
    // X = { b: Y }, Y = { a: X }, z = { p: X }, w = { q: Y }
    let x = interner.reserve();
    let y = interner.alloc(anonymous(vec![PropertyInfo::new("a", x)]));
    interner.define(x, anonymous(vec![PropertyInfo::new("b", y)]));
    let z = interner.alloc(anonymous(vec![PropertyInfo::new("p", x)]));
    let w = interner.alloc(anonymous(vec![PropertyInfo::new("q", y)]));
    let scope = SynthesisScope::new(fx.shape);

    let uncached = NodeBuilder::new(
        fx.program.shared_checker(),
        SynthesisOptions {
            enable_cache: false,
            ..SynthesisOptions::default()
        },
    );
    let expected = uncached
        .type_to_string(w, scope, &mut NoopTracker)
        .expect("uncached");
    assert_eq!(expected, "{ q: { a: { b: ...; }; }; }");

    let cached = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default());
    assert_eq!(
        cached.type_to_string(z, scope, &mut NoopTracker).expect("z"),
        "{ p: { b: { a: ...; }; }; }"
    );
    // Every object on the path from z saw the cut, so none of them is kept.
    assert_eq!(cached.cache().map_or(usize::MAX, |c| c.len()), 0);
    assert_eq!(cached.type_to_string(w, scope, &mut NoopTracker).expect("w"), expected);
}

#[test]
fn test_builders_share_an_injected_cache() {
    let fx = fixture();
    let shared = Arc::new(SerializedTypeCache::new());
    let first = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default())
        .with_cache(Arc::clone(&shared));
    let second = NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default())
        .with_cache(Arc::clone(&shared));
    let scope = SynthesisScope::new(fx.shape);

    first
        .type_to_type_node(fx.shape_type, scope, &mut NoopTracker)
        .expect("populates");
    assert!(shared.get(fx.shape, &shape_key(&fx)).is_some());
    let populated = shared.len();

    let mut tracker = RecordingTracker::new();
    assert_eq!(
        second
            .type_to_string(fx.shape_type, scope, &mut tracker)
            .expect("hits"),
        EXPECTED
    );
    assert_eq!(shared.len(), populated);
    assert!(tracker.tracked.iter().any(|(symbol, _, _)| *symbol == fx.point));

    shared.evict_enclosing(fx.shape);
    assert!(shared.get(fx.shape, &shape_key(&fx)).is_none());
}

#[test]
fn test_parallel_requests_agree() {
    let fx = fixture();
    let builder = Arc::new(NodeBuilder::new(fx.program.shared_checker(), SynthesisOptions::default()));
    let scope = SynthesisScope::new(fx.shape);

    let results: Vec<String> = (0..32)
        .into_par_iter()
        .map(|_| {
            builder
                .type_to_string(fx.shape_type, scope, &mut NoopTracker)
                .expect("synthesizes")
        })
        .collect();
    assert!(results.iter().all(|r| r == EXPECTED));
}

#[test]
fn test_options_load_from_json_with_defaults() {
    let options: SynthesisOptions =
        serde_json::from_str(r#"{ "maximum_truncation_length": 200, "enable_cache": false }"#)
            .expect("valid options");
    assert_eq!(options.maximum_truncation_length, 200);
    assert!(!options.enable_cache);
    assert_eq!(options.maximum_symbol_depth, SynthesisOptions::default().maximum_symbol_depth);
    assert!(options.strict_null_checks);

    let fx = fixture();
    let builder = NodeBuilder::new(fx.program.shared_checker(), options)
        .with_cache(Arc::new(SerializedTypeCache::new()));
    assert!(builder.cache().is_none());
}
