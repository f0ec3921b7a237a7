use tsz_ast::*;
use tsz_binder::{BinderState, symbol_flags};

fn interface(arena: &mut NodeArena, name: &str, modifiers: u32) -> NodeIndex {
    let name = arena.add_identifier(name);
    arena.add(
        SyntaxKind::InterfaceDeclaration,
        NodeData::Interface(InterfaceData {
            modifiers,
            name,
            ..Default::default()
        }),
    )
}

fn file(arena: &mut NodeArena, statements: Vec<NodeIndex>, module: Option<&str>) -> NodeIndex {
    arena.add_source_file(SourceFileData {
        file_name: "test.ts".into(),
        statements,
        module_specifier: module.map(str::to_string),
        is_declaration_file: false,
    })
}

#[test]
fn test_script_declarations_are_global() {
    let mut arena = NodeArena::new();
    let i = interface(&mut arena, "Foo", 0);
    let f = file(&mut arena, vec![i], None);
    let binder = BinderState::bind_program(&arena, &[f]);

    let sym = binder.get_symbol_of_declaration(i).expect("bound");
    assert_eq!(binder.globals.get("Foo"), Some(sym));
    assert_eq!(binder.resolve_name(&arena, i, "Foo", symbol_flags::TYPE), Some(sym));
    assert_eq!(binder.resolve_name(&arena, i, "Foo", symbol_flags::VALUE), None);
}

#[test]
fn test_interfaces_merge() {
    let mut arena = NodeArena::new();
    let a = interface(&mut arena, "Foo", 0);
    let b = interface(&mut arena, "Foo", 0);
    let f = file(&mut arena, vec![a, b], None);
    let binder = BinderState::bind_program(&arena, &[f]);

    let sym_a = binder.get_symbol_of_declaration(a);
    assert_eq!(sym_a, binder.get_symbol_of_declaration(b));
    let sym = binder.symbol(sym_a.expect("bound")).expect("symbol");
    assert_eq!(sym.declarations, vec![a, b]);
}

#[test]
fn test_namespace_exports_and_qualified_resolution() {
    let mut arena = NodeArena::new();
    let inner = interface(&mut arena, "Item", modifier_flags::EXPORT);
    let hidden = interface(&mut arena, "Hidden", 0);
    let body = arena.add(
        SyntaxKind::ModuleBlock,
        NodeData::Block {
            statements: vec![inner, hidden],
        },
    );
    let ns_name = arena.add_identifier("NS");
    let ns = arena.add(
        SyntaxKind::ModuleDeclaration,
        NodeData::Module {
            modifiers: 0,
            name: ns_name,
            body,
        },
    );
    let reference = arena.add_entity_name("NS.Item");
    let alias_name = arena.add_identifier("Alias");
    let type_ref = arena.add_type_reference(reference, vec![]);
    let alias = arena.add(
        SyntaxKind::TypeAliasDeclaration,
        NodeData::TypeAlias(TypeAliasData {
            modifiers: 0,
            name: alias_name,
            type_parameters: vec![],
            type_node: type_ref,
        }),
    );
    let f = file(&mut arena, vec![ns, alias], None);
    let binder = BinderState::bind_program(&arena, &[f]);

    let ns_sym = binder.get_symbol_of_declaration(ns).expect("namespace");
    let item_sym = binder.get_symbol_of_declaration(inner).expect("item");
    assert_eq!(binder.get_export(ns_sym, "Item"), Some(item_sym));
    assert_eq!(binder.get_export(ns_sym, "Hidden"), None);
    assert_eq!(binder.symbol(item_sym).and_then(|s| s.parent), Some(ns_sym));
    assert_eq!(
        binder.resolve_entity_name(&arena, reference, symbol_flags::TYPE, NodeIndex::NONE),
        Some(item_sym)
    );
    assert_eq!(binder.parent_chain(item_sym), vec![ns_sym, item_sym]);
    // `Hidden` resolves inside the namespace but not outside.
    assert!(binder.resolve_name(&arena, inner, "Hidden", symbol_flags::TYPE).is_some());
    assert!(binder.resolve_name(&arena, alias, "Hidden", symbol_flags::TYPE).is_none());
}

#[test]
fn test_module_file_exports() {
    let mut arena = NodeArena::new();
    let exported = interface(&mut arena, "Public", modifier_flags::EXPORT);
    let local = interface(&mut arena, "Local", 0);
    let f = file(&mut arena, vec![exported, local], Some("./lib"));
    let binder = BinderState::bind_program(&arena, &[f]);

    let module = binder.module_symbol_of_file(&arena, f).expect("module symbol");
    assert!(binder.get_export(module, "Public").is_some());
    assert!(binder.get_export(module, "Local").is_none());
    assert!(binder.globals.is_empty());
}

#[test]
fn test_function_type_parameters_are_scoped_to_function() {
    let mut arena = NodeArena::new();
    let tp_name = arena.add_identifier("T");
    let tp = arena.add_type_parameter(TypeParameterData {
        name: tp_name,
        ..Default::default()
    });
    let fn_name = arena.add_identifier("f");
    let func = arena.add_function(
        SyntaxKind::FunctionDeclaration,
        FunctionData {
            name: fn_name,
            type_parameters: vec![tp],
            ..Default::default()
        },
    );
    let f = file(&mut arena, vec![func], None);
    let binder = BinderState::bind_program(&arena, &[f]);

    let t = binder.get_symbol_of_declaration(tp);
    assert!(t.is_some());
    assert_eq!(binder.resolve_name(&arena, func, "T", symbol_flags::TYPE), t);
    assert_eq!(binder.resolve_name(&arena, f, "T", symbol_flags::TYPE), None);
}
