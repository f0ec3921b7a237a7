use super::*;
use tsz_ast::factory;
use tsz_ast::synth::KeywordTypeKind;

fn state(approximate_length: usize, truncating: bool) -> BudgetState {
    BudgetState {
        approximate_length,
        truncating,
        max_truncation_length: 100,
    }
}

fn entry(started: BudgetState, truncating: bool, added_length: usize) -> SerializedTypeEntry {
    SerializedTypeEntry {
        node: factory::keyword(KeywordTypeKind::Number),
        truncating,
        added_length,
        tracked_symbols: Vec::new(),
        started,
    }
}

#[test]
fn test_untruncated_entry_replays_where_it_still_fits() {
    let e = entry(state(0, false), false, 40);
    assert!(e.is_reusable_from(state(0, false)));
    assert!(e.is_reusable_from(state(60, false)));
    assert!(!e.is_reusable_from(state(61, false)));
    assert!(!e.is_reusable_from(state(0, true)));
}

#[test]
fn test_entry_built_while_truncating_needs_truncation() {
    let e = entry(state(120, true), true, 3);
    assert!(e.is_reusable_from(state(150, true)));
    assert!(!e.is_reusable_from(state(0, false)));
}

#[test]
fn test_entry_that_latched_midway_needs_identical_start() {
    let start = state(80, false);
    let e = entry(start, true, 30);
    assert!(e.is_reusable_from(start));
    assert!(!e.is_reusable_from(state(79, false)));
    assert!(!e.is_reusable_from(state(80, true)));
}

#[test]
fn test_first_store_wins() {
    let cache = SerializedTypeCache::new();
    let key = CompositeTypeCacheIdentity {
        type_id: TypeId::STRING,
        flags: NodeBuilderFlags::empty(),
        internal_flags: InternalNodeBuilderFlags::empty(),
    };
    let enclosing = NodeIndex(7);
    assert!(cache.insert(enclosing, key, entry(state(0, false), false, 6)));
    assert!(!cache.insert(enclosing, key, entry(state(5, false), false, 9)));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(enclosing, &key).map(|e| e.added_length), Some(6));

    cache.clear();
    assert!(cache.is_empty());
}
