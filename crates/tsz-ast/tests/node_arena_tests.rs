use tsz_ast::*;

#[test]
fn test_add_links_children_to_parent() {
    let mut arena = NodeArena::new();
    let a = arena.add_identifier("A");
    let b = arena.add_identifier("B");
    let qualified = arena.add_qualified_name(a, b);
    assert_eq!(arena.parent(a), qualified);
    assert_eq!(arena.parent(b), qualified);
    assert_eq!(arena.entity_name_text(qualified).as_deref(), Some("A.B"));
    assert_eq!(arena.first_identifier(qualified), a);
}

#[test]
fn test_add_entity_name_builds_left_nested_chain() {
    let mut arena = NodeArena::new();
    let name = arena.add_entity_name("NS.Inner.Leaf");
    assert_eq!(arena.kind(name), SyntaxKind::QualifiedName);
    assert_eq!(arena.entity_name_text(name).as_deref(), Some("NS.Inner.Leaf"));
    assert!(arena.is_entity_name_expression(name));
}

#[test]
fn test_find_ancestor_and_source_file() {
    let mut arena = NodeArena::new();
    let name = arena.add_identifier("x");
    let init = arena.add_literal(SyntaxKind::NumericLiteral, "1");
    let decl = arena.add(
        SyntaxKind::VariableDeclaration,
        NodeData::VariableDeclaration(VariableDeclarationData {
            name,
            type_annotation: NodeIndex::NONE,
            initializer: init,
        }),
    );
    let list = arena.add_with_flags(
        SyntaxKind::VariableDeclarationList,
        node_flags::CONST,
        NodeData::VariableDeclarationList {
            declarations: vec![decl],
        },
    );
    let stmt = arena.add(
        SyntaxKind::VariableStatement,
        NodeData::VariableStatement {
            modifiers: modifier_flags::EXPORT,
            declaration_list: list,
        },
    );
    let file = arena.add_source_file(SourceFileData {
        file_name: "a.ts".into(),
        statements: vec![stmt],
        ..Default::default()
    });

    assert_eq!(arena.source_file_of(init), file);
    assert!(arena.is_const_variable(decl));
    assert!(arena.has_modifier(decl, modifier_flags::EXPORT));
    assert_eq!(arena.declaration_name_text(decl).as_deref(), Some("x"));
    assert_eq!(arena.initializer(decl), init);
    assert!(arena.is_descendant_of(init, stmt));
    assert!(!arena.is_descendant_of(stmt, init));
}

#[test]
fn test_for_each_child_skips_absent_slots() {
    let mut arena = NodeArena::new();
    let name = arena.add_identifier("p");
    let param = arena.add_parameter(ParameterData {
        name,
        ..Default::default()
    });
    let mut seen = Vec::new();
    arena.for_each_child(param, |c| seen.push(c));
    assert_eq!(seen, vec![name]);
}

#[test]
fn test_computed_literal_property_name_text() {
    let mut arena = NodeArena::new();
    let lit = arena.add_string_literal("a-b", false);
    let computed = arena.add(
        SyntaxKind::ComputedPropertyName,
        NodeData::ComputedPropertyName { expression: lit },
    );
    assert_eq!(arena.property_name_text(computed).as_deref(), Some("a-b"));
}

#[test]
fn test_identifier_text_validity() {
    assert!(is_identifier_text("foo"));
    assert!(is_identifier_text("_$x1"));
    assert!(!is_identifier_text("1x"));
    assert!(!is_identifier_text("a-b"));
    assert!(!is_identifier_text("class"));
    assert!(!is_identifier_text(""));
}
