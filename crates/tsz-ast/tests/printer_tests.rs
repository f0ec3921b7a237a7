use tsz_ast::factory::*;
use tsz_ast::synth::*;
use tsz_ast::{print_signature, print_type_node};

#[test]
fn test_print_type_literal() {
    let node = TypeNode::TypeLiteral(vec![
        property_signature(false, PropertyName::Identifier("a".into()), false, Some(keyword(KeywordTypeKind::Number))),
        property_signature(true, PropertyName::StringLiteral { text: "b-c".into(), single_quote: false }, true, Some(keyword(KeywordTypeKind::String))),
    ]);
    assert_eq!(print_type_node(&node), "{ a: number; readonly \"b-c\"?: string; }");
    assert_eq!(print_type_node(&TypeNode::TypeLiteral(vec![])), "{}");
}

#[test]
fn test_print_parenthesizes_union_in_array() {
    let node = array(union(vec![identifier_reference("A"), identifier_reference("B")]));
    assert_eq!(print_type_node(&node), "(A | B)[]");
}

#[test]
fn test_print_parenthesizes_function_in_union() {
    let mut sig = SignatureDeclaration::new(SignatureKind::FunctionType);
    sig.return_type = Some(keyword(KeywordTypeKind::Void));
    let node = union(vec![TypeNode::Function(Box::new(sig)), keyword(KeywordTypeKind::Undefined)]);
    assert_eq!(print_type_node(&node), "(() => void) | undefined");
}

#[test]
fn test_print_readonly_named_tuple() {
    let tuple = TypeNode::Tuple(vec![
        TupleMember::Named { dot_dot_dot: false, name: "x".into(), question: false, type_node: number_literal_type("1") },
        TupleMember::Named { dot_dot_dot: false, name: "y".into(), question: true, type_node: number_literal_type("-2") },
    ]);
    let node = type_operator(TypeOperatorKind::Readonly, tuple);
    assert_eq!(print_type_node(&node), "readonly [x: 1, y?: -2]");
}

#[test]
fn test_print_conditional_and_infer() {
    let node = conditional(
        identifier_reference("T"),
        array(TypeNode::Infer(Box::new(type_parameter("U")))),
        identifier_reference("U"),
        keyword(KeywordTypeKind::Never),
    );
    assert_eq!(print_type_node(&node), "T extends (infer U)[] ? U : never");
}

#[test]
fn test_print_mapped_type() {
    let mut tp = type_parameter("K");
    tp.constraint = Some(Box::new(type_operator(TypeOperatorKind::KeyOf, identifier_reference("T"))));
    let node = TypeNode::Mapped {
        readonly_token: Some(MappedModifierToken::Minus),
        type_parameter: Box::new(tp),
        name_type: None,
        question_token: Some(MappedModifierToken::Plain),
        type_node: Some(Box::new(indexed_access(identifier_reference("T"), identifier_reference("K")))),
    };
    assert_eq!(print_type_node(&node), "{ -readonly [K in keyof T]?: T[K]; }");
}

#[test]
fn test_print_string_literal_escaping() {
    assert_eq!(print_type_node(&string_literal_type("a\"b", false)), "\"a\\\"b\"");
    assert_eq!(print_type_node(&string_literal_type("it's", true)), "'it\\'s'");
}

#[test]
fn test_print_method_signature() {
    let mut sig = SignatureDeclaration::new(SignatureKind::MethodSignature);
    sig.name = Some(PropertyName::Identifier("m".into()));
    sig.question = true;
    sig.type_parameters = vec![type_parameter("T")];
    let mut rest = parameter("args", Some(array(identifier_reference("T"))));
    rest.dot_dot_dot = true;
    sig.parameters = vec![rest];
    sig.return_type = Some(identifier_reference("T"));
    assert_eq!(print_signature(&sig), "m?<T>(...args: T[]): T");
}

#[test]
fn test_print_import_type() {
    let node = TypeNode::Import {
        argument: "./mod".into(),
        qualifier: Some(EntityName::from_segments(&["NS", "Item"])),
        type_arguments: vec![keyword(KeywordTypeKind::String)],
        is_type_of: false,
    };
    assert_eq!(print_type_node(&node), "import(\"./mod\").NS.Item<string>");
}

#[test]
fn test_property_name_from_text() {
    assert_eq!(property_name_from_text("abc", false), PropertyName::Identifier("abc".into()));
    assert_eq!(property_name_from_text("42", false), PropertyName::NumericLiteral("42".into()));
    assert_eq!(
        property_name_from_text("a b", true),
        PropertyName::StringLiteral { text: "a b".into(), single_quote: true }
    );
}
