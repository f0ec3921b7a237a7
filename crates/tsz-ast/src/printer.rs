//! Single-line printer for synthesized type syntax.
//!
//! Produces the compact form used by quick info and diagnostics:
//! `{ a: number; b: string; }`, `(A | B)[]`, `<T>(x: T) => T`. Parentheses are
//! inserted from the position a node occupies, so the builder never needs to
//! wrap nodes itself.

use crate::synth::*;
use crate::text::escape_string;

/// Syntactic slot a type occupies, for deciding parentheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Top,
    /// Array element, indexed-access object, optional tuple element.
    Postfix,
    UnionMember,
    IntersectionMember,
    OperatorOperand,
    CheckType,
    ExtendsType,
}

fn needs_parens(node: &TypeNode, position: Position) -> bool {
    let function_like = matches!(node, TypeNode::Function(_) | TypeNode::Conditional { .. });
    match position {
        Position::Top => false,
        Position::Postfix => {
            function_like
                || matches!(
                    node,
                    TypeNode::Union(_)
                        | TypeNode::Intersection(_)
                        | TypeNode::Operator { .. }
                        | TypeNode::Infer(_)
                        | TypeNode::Query { .. }
                )
        }
        Position::UnionMember | Position::IntersectionMember | Position::OperatorOperand => {
            function_like || matches!(node, TypeNode::Union(_) | TypeNode::Intersection(_))
        }
        Position::CheckType => function_like,
        Position::ExtendsType => matches!(node, TypeNode::Conditional { .. }),
    }
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn list<T>(&mut self, items: &[T], separator: &str, mut f: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            f(self, item);
        }
    }

    fn type_node_at(&mut self, node: &TypeNode, position: Position) {
        if needs_parens(node, position) {
            self.write("(");
            self.type_node(node);
            self.write(")");
        } else {
            self.type_node(node);
        }
    }

    fn type_arguments(&mut self, args: &[TypeNode]) {
        if args.is_empty() {
            return;
        }
        self.write("<");
        self.list(args, ", ", |p, a| p.type_node(a));
        self.write(">");
    }

    fn entity_name(&mut self, name: &EntityName) {
        match name {
            EntityName::Identifier(text) => self.write(text),
            EntityName::Qualified(left, right) => {
                self.entity_name(left);
                self.write(".");
                self.write(right);
            }
        }
    }

    fn literal(&mut self, literal: &LiteralNode) {
        match literal {
            LiteralNode::String { text, single_quote } => {
                let quote = if *single_quote { '\'' } else { '"' };
                self.out.push(quote);
                self.write(&escape_string(text, quote));
                self.out.push(quote);
            }
            LiteralNode::Number(text) => self.write(text),
            LiteralNode::BigInt(text) => {
                self.write(text);
                self.write("n");
            }
            LiteralNode::True => self.write("true"),
            LiteralNode::False => self.write("false"),
            LiteralNode::Null => self.write("null"),
            LiteralNode::Negative(inner) => {
                self.write("-");
                self.literal(inner);
            }
        }
    }

    fn property_name(&mut self, name: &PropertyName) {
        match name {
            PropertyName::Identifier(text)
            | PropertyName::NumericLiteral(text)
            | PropertyName::PrivateIdentifier(text) => self.write(text),
            PropertyName::StringLiteral { text, single_quote } => {
                self.literal(&LiteralNode::String {
                    text: text.clone(),
                    single_quote: *single_quote,
                });
            }
            PropertyName::Computed(expr) => {
                self.write("[");
                self.entity_name(expr);
                self.write("]");
            }
        }
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) {
        for m in modifiers {
            self.write(m.text());
            self.write(" ");
        }
    }

    fn type_parameter(&mut self, tp: &TypeParameterDeclaration) {
        self.modifiers(&tp.modifiers);
        self.write(&tp.name);
        if let Some(constraint) = &tp.constraint {
            self.write(" extends ");
            self.type_node(constraint);
        }
        if let Some(default) = &tp.default {
            self.write(" = ");
            self.type_node(default);
        }
    }

    fn type_parameters(&mut self, tps: &[TypeParameterDeclaration]) {
        if tps.is_empty() {
            return;
        }
        self.write("<");
        self.list(tps, ", ", |p, tp| p.type_parameter(tp));
        self.write(">");
    }

    fn parameter(&mut self, param: &ParameterDeclaration) {
        self.modifiers(&param.modifiers);
        if param.dot_dot_dot {
            self.write("...");
        }
        self.write(&param.name);
        if param.question {
            self.write("?");
        }
        if let Some(ty) = &param.type_node {
            self.write(": ");
            self.type_node(ty);
        }
    }

    fn parameter_list(&mut self, params: &[ParameterDeclaration]) {
        self.write("(");
        self.list(params, ", ", |p, param| p.parameter(param));
        self.write(")");
    }

    fn signature(&mut self, sig: &SignatureDeclaration) {
        match sig.kind {
            SignatureKind::FunctionType | SignatureKind::ArrowFunction => {
                self.modifiers(&sig.modifiers);
                self.type_parameters(&sig.type_parameters);
                self.parameter_list(&sig.parameters);
                self.write(" => ");
                self.return_type_or_any(sig);
            }
            SignatureKind::ConstructorType => {
                self.modifiers(&sig.modifiers);
                self.write("new ");
                self.type_parameters(&sig.type_parameters);
                self.parameter_list(&sig.parameters);
                self.write(" => ");
                self.return_type_or_any(sig);
            }
            SignatureKind::CallSignature | SignatureKind::ConstructSignature => {
                if sig.kind == SignatureKind::ConstructSignature {
                    self.write("new ");
                }
                self.type_parameters(&sig.type_parameters);
                self.parameter_list(&sig.parameters);
                self.return_annotation(sig);
            }
            SignatureKind::MethodSignature | SignatureKind::MethodDeclaration => {
                self.modifiers(&sig.modifiers);
                self.signature_name(sig);
                self.type_parameters(&sig.type_parameters);
                self.parameter_list(&sig.parameters);
                self.return_annotation(sig);
            }
            SignatureKind::GetAccessor | SignatureKind::SetAccessor => {
                self.modifiers(&sig.modifiers);
                self.write(if sig.kind == SignatureKind::GetAccessor { "get " } else { "set " });
                self.signature_name(sig);
                self.parameter_list(&sig.parameters);
                self.return_annotation(sig);
            }
            SignatureKind::FunctionDeclaration => {
                self.modifiers(&sig.modifiers);
                self.write("function ");
                self.signature_name(sig);
                self.type_parameters(&sig.type_parameters);
                self.parameter_list(&sig.parameters);
                self.return_annotation(sig);
            }
        }
    }

    fn signature_name(&mut self, sig: &SignatureDeclaration) {
        if let Some(name) = &sig.name {
            self.property_name(name);
        }
        if sig.question {
            self.write("?");
        }
    }

    fn return_annotation(&mut self, sig: &SignatureDeclaration) {
        if let Some(ret) = &sig.return_type {
            self.write(": ");
            self.type_node(ret);
        }
    }

    fn return_type_or_any(&mut self, sig: &SignatureDeclaration) {
        match &sig.return_type {
            Some(ret) => self.type_node(ret),
            None => self.write("any"),
        }
    }

    fn type_element(&mut self, element: &TypeElement) {
        match element {
            TypeElement::Property {
                readonly,
                name,
                question,
                type_node,
            } => {
                if *readonly {
                    self.write("readonly ");
                }
                self.property_name(name);
                if *question {
                    self.write("?");
                }
                if let Some(ty) = type_node {
                    self.write(": ");
                    self.type_node(ty);
                }
            }
            TypeElement::Signature(sig) => self.signature(sig),
            TypeElement::Index {
                readonly,
                parameter_name,
                key_type,
                type_node,
            } => {
                if *readonly {
                    self.write("readonly ");
                }
                self.write("[");
                self.write(parameter_name);
                self.write(": ");
                self.type_node(key_type);
                self.write("]: ");
                self.type_node(type_node);
            }
        }
    }

    fn mapped_modifier(&mut self, token: Option<MappedModifierToken>) {
        match token {
            Some(MappedModifierToken::Plus) => self.write("+"),
            Some(MappedModifierToken::Minus) => self.write("-"),
            _ => {}
        }
    }

    fn tuple_member(&mut self, member: &TupleMember) {
        match member {
            TupleMember::Plain(ty) => self.type_node(ty),
            TupleMember::Optional(ty) => {
                self.type_node_at(ty, Position::Postfix);
                self.write("?");
            }
            TupleMember::Rest(ty) => {
                self.write("...");
                self.type_node(ty);
            }
            TupleMember::Named {
                dot_dot_dot,
                name,
                question,
                type_node,
            } => {
                if *dot_dot_dot {
                    self.write("...");
                }
                self.write(name);
                if *question {
                    self.write("?");
                }
                self.write(": ");
                self.type_node(type_node);
            }
        }
    }

    fn template_text(&mut self, text: &str) {
        self.write(&text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${"));
    }

    fn type_node(&mut self, node: &TypeNode) {
        match node {
            TypeNode::Keyword(kind) => self.write(kind.text()),
            TypeNode::This => self.write("this"),
            TypeNode::Literal(literal) => self.literal(literal),
            TypeNode::Reference {
                name,
                type_arguments,
            } => {
                self.entity_name(name);
                self.type_arguments(type_arguments);
            }
            TypeNode::Import {
                argument,
                qualifier,
                type_arguments,
                is_type_of,
            } => {
                if *is_type_of {
                    self.write("typeof ");
                }
                self.write("import(\"");
                self.write(&escape_string(argument, '"'));
                self.write("\")");
                if let Some(q) = qualifier {
                    self.write(".");
                    self.entity_name(q);
                }
                self.type_arguments(type_arguments);
            }
            TypeNode::Query {
                expr_name,
                type_arguments,
            } => {
                self.write("typeof ");
                self.entity_name(expr_name);
                self.type_arguments(type_arguments);
            }
            TypeNode::Array(element) => {
                self.type_node_at(element, Position::Postfix);
                self.write("[]");
            }
            TypeNode::Tuple(members) => {
                self.write("[");
                self.list(members, ", ", |p, m| p.tuple_member(m));
                self.write("]");
            }
            TypeNode::Union(types) => {
                self.list(types, " | ", |p, t| p.type_node_at(t, Position::UnionMember));
            }
            TypeNode::Intersection(types) => {
                self.list(types, " & ", |p, t| p.type_node_at(t, Position::IntersectionMember));
            }
            TypeNode::Operator {
                operator,
                type_node,
            } => {
                self.write(match operator {
                    TypeOperatorKind::KeyOf => "keyof ",
                    TypeOperatorKind::Unique => "unique ",
                    TypeOperatorKind::Readonly => "readonly ",
                });
                self.type_node_at(type_node, Position::OperatorOperand);
            }
            TypeNode::IndexedAccess {
                object_type,
                index_type,
            } => {
                self.type_node_at(object_type, Position::Postfix);
                self.write("[");
                self.type_node(index_type);
                self.write("]");
            }
            TypeNode::Conditional {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => {
                self.type_node_at(check_type, Position::CheckType);
                self.write(" extends ");
                self.type_node_at(extends_type, Position::ExtendsType);
                self.write(" ? ");
                self.type_node(true_type);
                self.write(" : ");
                self.type_node(false_type);
            }
            TypeNode::Infer(tp) => {
                self.write("infer ");
                self.type_parameter(tp);
            }
            TypeNode::Mapped {
                readonly_token,
                type_parameter,
                name_type,
                question_token,
                type_node,
            } => {
                self.write("{ ");
                if readonly_token.is_some() {
                    self.mapped_modifier(*readonly_token);
                    self.write("readonly ");
                }
                self.write("[");
                self.write(&type_parameter.name);
                self.write(" in ");
                match &type_parameter.constraint {
                    Some(c) => self.type_node(c),
                    None => self.write("unknown"),
                }
                if let Some(name_type) = name_type {
                    self.write(" as ");
                    self.type_node(name_type);
                }
                self.write("]");
                if question_token.is_some() {
                    self.mapped_modifier(*question_token);
                    self.write("?");
                }
                self.write(": ");
                match type_node {
                    Some(t) => self.type_node(t),
                    None => self.write("any"),
                }
                self.write("; }");
            }
            TypeNode::TypeLiteral(members) => {
                if members.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                for member in members {
                    self.type_element(member);
                    self.write("; ");
                }
                self.write("}");
            }
            TypeNode::Function(sig) => self.signature(sig),
            TypeNode::TemplateLiteral { head, spans } => {
                self.write("`");
                self.template_text(head);
                for span in spans {
                    self.write("${");
                    self.type_node(&span.type_node);
                    self.write("}");
                    self.template_text(&span.literal);
                }
                self.write("`");
            }
            TypeNode::Predicate {
                asserts,
                parameter_name,
                type_node,
            } => {
                if *asserts {
                    self.write("asserts ");
                }
                self.write(parameter_name);
                if let Some(ty) = type_node {
                    self.write(" is ");
                    self.type_node(ty);
                }
            }
            TypeNode::Parenthesized(inner) => {
                self.write("(");
                self.type_node(inner);
                self.write(")");
            }
        }
    }
}

/// Print a synthesized type on one line.
pub fn print_type_node(node: &TypeNode) -> String {
    let mut printer = Printer::default();
    printer.type_node(node);
    printer.out
}

/// Print a type literal member without its trailing `;`.
pub fn print_type_element(element: &TypeElement) -> String {
    let mut printer = Printer::default();
    printer.type_element(element);
    printer.out
}

pub fn print_signature(signature: &SignatureDeclaration) -> String {
    let mut printer = Printer::default();
    printer.signature(signature);
    printer.out
}
