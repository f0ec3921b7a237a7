//! Declaration binding.

use tracing::trace;
use tsz_ast::{NodeArena, NodeData, NodeIndex, SyntaxKind, modifier_flags, node_flags};

use crate::state::BinderState;
use crate::symbols::{SymbolId, SymbolTable, symbol_flags};

/// Where the declarations of the current scope go.
#[derive(Clone, Copy, Debug)]
struct BindScope {
    container: NodeIndex,
    /// Script files declare into the global table.
    global: bool,
    /// Namespace or module receiving `export`ed declarations.
    export_target: Option<SymbolId>,
}

impl BindScope {
    fn nested(container: NodeIndex) -> Self {
        BindScope {
            container,
            global: false,
            export_target: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Target {
    Locals(NodeIndex),
    Globals,
    Members(SymbolId),
    Exports(SymbolId),
    /// Anonymous symbol kept only in `node_symbols`.
    Detached,
}

impl BinderState {
    pub fn bind_source_file(&mut self, arena: &NodeArena, file: NodeIndex) {
        let Some(NodeData::SourceFile(data)) = arena.data(file) else {
            return;
        };
        let module_symbol = data.module_specifier.as_ref().map(|specifier| {
            let id = self
                .symbols
                .alloc(symbol_flags::VALUE_MODULE, format!("\"{specifier}\""));
            if let Some(sym) = self.symbols.get_mut(id) {
                sym.declarations.push(file);
                sym.value_declaration = file;
            }
            self.node_symbols.insert(file, id);
            self.module_symbols.insert(specifier.clone(), id);
            id
        });
        trace!(
            file = %data.file_name,
            is_module = module_symbol.is_some(),
            "bind_source_file"
        );
        let scope = BindScope {
            container: file,
            global: module_symbol.is_none(),
            export_target: module_symbol,
        };
        for &stmt in &data.statements {
            self.bind_node(arena, stmt, scope);
        }
    }

    fn table_mut(&mut self, target: Target) -> Option<&mut SymbolTable> {
        match target {
            Target::Locals(container) => Some(self.locals.entry(container).or_default()),
            Target::Globals => Some(&mut self.globals),
            Target::Members(owner) => self.symbols.get_mut(owner).map(|s| &mut s.members),
            Target::Exports(owner) => self.symbols.get_mut(owner).map(|s| &mut s.exports),
            Target::Detached => None,
        }
    }

    fn declare(&mut self, target: Target, name: String, flags: u32, decl: NodeIndex) -> SymbolId {
        let existing = self.table_mut(target).and_then(|t| t.get(&name));
        let merge_into = existing.filter(|&id| {
            self.symbols
                .get(id)
                .is_some_and(|s| symbol_flags::merge_compatible(s.flags, flags))
        });
        let id = match merge_into {
            Some(id) => id,
            None => {
                let id = self.symbols.alloc(flags, name.clone());
                if let Some(table) = self.table_mut(target) {
                    table.set(name, id);
                }
                id
            }
        };
        if let Some(sym) = self.symbols.get_mut(id) {
            sym.flags |= flags;
            sym.declarations.push(decl);
            if flags & symbol_flags::VALUE != 0 && sym.value_declaration.is_none() {
                sym.value_declaration = decl;
            }
        }
        self.node_symbols.insert(decl, id);
        id
    }

    fn locals_target(scope: BindScope) -> Target {
        if scope.global {
            Target::Globals
        } else {
            Target::Locals(scope.container)
        }
    }

    /// Declare into the scope's locals and, when exported, into the export
    /// target too.
    fn declare_in_scope(
        &mut self,
        arena: &NodeArena,
        scope: BindScope,
        decl: NodeIndex,
        flags: u32,
    ) -> Option<SymbolId> {
        let name = arena.declaration_name_text(decl)?;
        let exported = arena.has_modifier(decl, modifier_flags::EXPORT);
        let id = match (exported, scope.export_target) {
            (true, Some(owner)) => {
                let id = self.declare(Target::Exports(owner), name.clone(), flags, decl);
                if let Some(sym) = self.symbols.get_mut(id) {
                    sym.parent = Some(owner);
                }
                if let Some(table) = self.table_mut(Self::locals_target(scope)) {
                    table.set(name, id);
                }
                id
            }
            _ => self.declare(Self::locals_target(scope), name, flags, decl),
        };
        Some(id)
    }

    fn bind_children(&mut self, arena: &NodeArena, idx: NodeIndex, scope: BindScope) {
        let Some(node) = arena.get(idx) else {
            return;
        };
        for child in node.data.children() {
            self.bind_node(arena, child, scope);
        }
    }

    fn bind_node(&mut self, arena: &NodeArena, idx: NodeIndex, scope: BindScope) {
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node.kind {
            SyntaxKind::VariableDeclaration => {
                let list_flags = arena.get(node.parent).map_or(0, |n| n.flags);
                let flags = if list_flags & node_flags::BLOCK_SCOPED != 0 {
                    symbol_flags::BLOCK_SCOPED_VARIABLE
                } else {
                    symbol_flags::FUNCTION_SCOPED_VARIABLE
                };
                self.declare_in_scope(arena, scope, idx, flags);
                self.bind_children(arena, idx, scope);
            }
            SyntaxKind::FunctionDeclaration => {
                self.declare_in_scope(arena, scope, idx, symbol_flags::FUNCTION);
                self.bind_function_like(arena, idx);
            }
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => {
                self.declare(
                    Target::Detached,
                    "__function".to_string(),
                    symbol_flags::FUNCTION,
                    idx,
                );
                self.bind_function_like(arena, idx);
            }
            SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression => {
                let sym = if node.kind == SyntaxKind::ClassDeclaration {
                    self.declare_in_scope(arena, scope, idx, symbol_flags::CLASS)
                } else {
                    let name = arena
                        .declaration_name_text(idx)
                        .unwrap_or_else(|| "__class".to_string());
                    Some(self.declare(Target::Detached, name, symbol_flags::CLASS, idx))
                };
                self.bind_declaration_with_members(arena, idx, sym);
            }
            SyntaxKind::InterfaceDeclaration => {
                let sym = self.declare_in_scope(arena, scope, idx, symbol_flags::INTERFACE);
                self.bind_declaration_with_members(arena, idx, sym);
            }
            SyntaxKind::TypeAliasDeclaration => {
                self.declare_in_scope(arena, scope, idx, symbol_flags::TYPE_ALIAS);
                if let Some(NodeData::TypeAlias(data)) = arena.data(idx) {
                    let inner = BindScope::nested(idx);
                    for &tp in &data.type_parameters {
                        self.bind_node(arena, tp, inner);
                    }
                    self.bind_node(arena, data.type_node, inner);
                }
            }
            SyntaxKind::EnumDeclaration => {
                let flags = if arena.has_modifier(idx, modifier_flags::CONST) {
                    symbol_flags::CONST_ENUM
                } else {
                    symbol_flags::REGULAR_ENUM
                };
                let Some(enum_sym) = self.declare_in_scope(arena, scope, idx, flags) else {
                    return;
                };
                for &member in arena.members(idx) {
                    if let Some(name) = arena.declaration_name_text(member) {
                        let id = self.declare(
                            Target::Exports(enum_sym),
                            name,
                            symbol_flags::ENUM_MEMBER,
                            member,
                        );
                        if let Some(sym) = self.symbols.get_mut(id) {
                            sym.parent = Some(enum_sym);
                        }
                    }
                }
            }
            SyntaxKind::ModuleDeclaration => {
                let flags = symbol_flags::VALUE_MODULE | symbol_flags::NAMESPACE_MODULE;
                let module_sym = self.declare_in_scope(arena, scope, idx, flags);
                if let Some(NodeData::Module { body, .. }) = arena.data(idx) {
                    let inner = BindScope {
                        container: idx,
                        global: false,
                        export_target: module_sym,
                    };
                    if let Some(NodeData::Block { statements }) = arena.data(*body) {
                        for &stmt in statements {
                            self.bind_node(arena, stmt, inner);
                        }
                    }
                }
            }
            SyntaxKind::TypeLiteral | SyntaxKind::JSDocTypeLiteral => {
                let sym = self.declare(
                    Target::Detached,
                    "__type".to_string(),
                    symbol_flags::TYPE_LITERAL,
                    idx,
                );
                self.bind_members(arena, sym, idx, scope);
            }
            SyntaxKind::ObjectLiteralExpression => {
                let sym = self.declare(
                    Target::Detached,
                    "__object".to_string(),
                    symbol_flags::OBJECT_LITERAL,
                    idx,
                );
                self.bind_members(arena, sym, idx, scope);
            }
            SyntaxKind::MappedType | SyntaxKind::ConditionalType => {
                if node.kind == SyntaxKind::MappedType {
                    self.declare(
                        Target::Detached,
                        "__type".to_string(),
                        symbol_flags::TYPE_LITERAL,
                        idx,
                    );
                }
                self.bind_children(arena, idx, BindScope::nested(idx));
            }
            SyntaxKind::TypeParameter => {
                if let Some(name) = arena.declaration_name_text(idx) {
                    self.declare(
                        Target::Locals(scope.container),
                        name,
                        symbol_flags::TYPE_PARAMETER,
                        idx,
                    );
                }
                self.bind_children(arena, idx, scope);
            }
            _ => self.bind_children(arena, idx, scope),
        }
    }

    /// Classes and interfaces: type parameters in the declaration's locals,
    /// members on the symbol.
    fn bind_declaration_with_members(&mut self, arena: &NodeArena, idx: NodeIndex, sym: Option<SymbolId>) {
        let inner = BindScope::nested(idx);
        if let Some(NodeData::Class(data) | NodeData::Interface(data)) = arena.data(idx) {
            for &tp in &data.type_parameters {
                self.bind_node(arena, tp, inner);
            }
        }
        if let Some(sym) = sym {
            self.bind_members(arena, sym, idx, inner);
        }
    }

    fn bind_members(&mut self, arena: &NodeArena, owner: SymbolId, idx: NodeIndex, scope: BindScope) {
        let members: Vec<NodeIndex> = match arena.data(idx) {
            Some(NodeData::JSDocTypeLiteral { property_tags, .. }) => property_tags.clone(),
            _ => arena.members(idx).to_vec(),
        };
        for member in members {
            let kind = arena.kind(member);
            let is_static = arena.has_modifier(member, modifier_flags::STATIC);
            let target = if is_static {
                Target::Exports(owner)
            } else {
                Target::Members(owner)
            };
            let optional = if arena.has_question_token(member) {
                symbol_flags::OPTIONAL
            } else {
                0
            };
            let (name, flags) = match kind {
                SyntaxKind::PropertySignature
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::PropertyAssignment
                | SyntaxKind::ShorthandPropertyAssignment
                | SyntaxKind::JSDocPropertyTag => (
                    arena.declaration_name_text(member),
                    symbol_flags::PROPERTY | optional,
                ),
                SyntaxKind::MethodSignature | SyntaxKind::MethodDeclaration => (
                    arena.declaration_name_text(member),
                    symbol_flags::METHOD | optional,
                ),
                SyntaxKind::GetAccessor => (arena.declaration_name_text(member), symbol_flags::GET_ACCESSOR),
                SyntaxKind::SetAccessor => (arena.declaration_name_text(member), symbol_flags::SET_ACCESSOR),
                SyntaxKind::Constructor => (Some("__constructor".to_string()), symbol_flags::CONSTRUCTOR),
                SyntaxKind::CallSignature => (Some("__call".to_string()), symbol_flags::SIGNATURE),
                SyntaxKind::ConstructSignature => (Some("__new".to_string()), symbol_flags::SIGNATURE),
                SyntaxKind::IndexSignature => (Some("__index".to_string()), symbol_flags::SIGNATURE),
                _ => {
                    self.bind_node(arena, member, scope);
                    continue;
                }
            };
            // Computed names that are not literals are late-bound.
            let name = name.unwrap_or_else(|| "__computed".to_string());
            let id = self.declare(target, name, flags, member);
            if is_static && let Some(sym) = self.symbols.get_mut(id) {
                sym.parent = Some(owner);
            }
            if kind.is_function_like() || kind == SyntaxKind::IndexSignature {
                self.bind_function_like(arena, member);
            } else {
                self.bind_children(arena, member, scope);
            }
        }
    }

    /// Parameters and type parameters of a function-like node go into the
    /// node's own locals; the body is bound inside it.
    fn bind_function_like(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let inner = BindScope::nested(idx);
        let (type_parameters, parameters, type_annotation, body) = match arena.data(idx) {
            Some(NodeData::Function(data)) => (
                data.type_parameters.clone(),
                data.parameters.clone(),
                data.type_annotation,
                data.body,
            ),
            Some(NodeData::IndexSignature {
                parameters,
                type_annotation,
                ..
            }) => (Vec::new(), parameters.clone(), *type_annotation, NodeIndex::NONE),
            _ => return,
        };
        for tp in type_parameters {
            self.bind_node(arena, tp, inner);
        }
        for param in parameters {
            if let Some(name) = arena.declaration_name_text(param) {
                self.declare(
                    Target::Locals(idx),
                    name,
                    symbol_flags::FUNCTION_SCOPED_VARIABLE,
                    param,
                );
            }
            self.bind_children(arena, param, inner);
        }
        self.bind_node(arena, type_annotation, inner);
        match arena.data(body) {
            Some(NodeData::Block { statements }) => {
                for &stmt in statements {
                    self.bind_node(arena, stmt, inner);
                }
            }
            _ => self.bind_node(arena, body, inner),
        }
    }
}
