//! Bound and checkable programs built from a [`ProgramBuilder`].

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tsz_ast::{NodeArena, NodeIndex, SyntaxKind, modifier_flags};
use tsz_binder::{BinderState, SymbolId};
use tsz_checker::{Checker, CheckerOptions, GlobalTypes, TypeChecker};
use tsz_solver::{TypeId, TypeInterner};

use crate::builder::ProgramBuilder;

pub struct Program {
    pub arena: Arc<NodeArena>,
    pub binder: Arc<BinderState>,
    pub interner: Arc<TypeInterner>,
    pub checker: Arc<Checker>,
    /// The standard library file followed by user files in insertion order.
    pub files: Vec<NodeIndex>,
}

impl ProgramBuilder {
    /// Declares the global generics synthesis special-cases:
    /// `Array`, `ReadonlyArray` and the iterable interfaces.
    fn lib_file(&mut self) -> NodeIndex {
        let mut statements = Vec::new();

        let t = self.type_param("T", NodeIndex::NONE);
        let number = self.keyword(SyntaxKind::NumberKeyword);
        let length = self.property_signature("length", number, false, 0);
        let key = self.keyword(SyntaxKind::NumberKeyword);
        let element = self.type_ref("T", Vec::new());
        let index = self.index_signature("n", key, element, false);
        statements.push(self.interface("Array", vec![t], vec![length, index], 0));

        let t = self.type_param("T", NodeIndex::NONE);
        let number = self.keyword(SyntaxKind::NumberKeyword);
        let length = self.property_signature("length", number, false, modifier_flags::READONLY);
        let key = self.keyword(SyntaxKind::NumberKeyword);
        let element = self.type_ref("T", Vec::new());
        let index = self.index_signature("n", key, element, true);
        statements.push(self.interface("ReadonlyArray", vec![t], vec![length, index], 0));

        for name in [
            "Iterable",
            "IterableIterator",
            "AsyncIterable",
            "AsyncIterableIterator",
        ] {
            let t = self.type_param("T", NodeIndex::NONE);
            let type_params = ["TReturn", "TNext"]
                .into_iter()
                .map(|param| {
                    let default = self.keyword(SyntaxKind::AnyKeyword);
                    let name = self.ident(param);
                    self.arena.add_type_parameter(tsz_ast::TypeParameterData {
                        name,
                        default,
                        ..Default::default()
                    })
                })
                .collect::<Vec<_>>();
            let mut params = vec![t];
            params.extend(type_params);
            statements.push(self.interface(name, params, Vec::new(), 0));
        }

        let file = self.arena.add_source_file(tsz_ast::SourceFileData {
            file_name: "lib.d.ts".to_string(),
            statements,
            module_specifier: None,
            is_declaration_file: true,
        });
        self.arena.set_flags_recursive(file, tsz_ast::node_flags::AMBIENT);
        file
    }

    /// Binds every file, creates a checker and registers the lib globals.
    pub fn build(mut self, options: CheckerOptions) -> Program {
        let lib = self.lib_file();
        let mut files = vec![lib];
        files.append(&mut self.files);

        let arena = Arc::new(self.arena);
        let binder = Arc::new(BinderState::bind_program(&arena, &files));
        let interner = Arc::new(TypeInterner::new());
        let checker = Arc::new(Checker::new(
            Arc::clone(&arena),
            Arc::clone(&binder),
            Arc::clone(&interner),
            options,
        ));
        let global = |name: &str| {
            binder
                .globals
                .get(name)
                .map(|symbol| checker.get_declared_type_of_symbol(symbol))
        };
        checker.set_globals(GlobalTypes {
            array: global("Array"),
            readonly_array: global("ReadonlyArray"),
            iterable: global("Iterable"),
            iterable_iterator: global("IterableIterator"),
            async_iterable: global("AsyncIterable"),
            async_iterable_iterator: global("AsyncIterableIterator"),
        });
        Program {
            arena,
            binder,
            interner,
            checker,
            files,
        }
    }

    pub fn build_default(self) -> Program {
        self.build(CheckerOptions::default())
    }
}

impl Program {
    /// Finds a top-level symbol by name: globals first, then each file's
    /// locals.
    pub fn symbol(&self, name: &str) -> Result<SymbolId> {
        if let Some(symbol) = self.binder.globals.get(name) {
            return Ok(symbol);
        }
        self.files
            .iter()
            .find_map(|file| self.binder.locals_of(*file).and_then(|t| t.get(name)))
            .ok_or_else(|| anyhow!("no top-level symbol named `{name}`"))
    }

    pub fn symbol_of(&self, declaration: NodeIndex) -> Result<SymbolId> {
        self.binder
            .get_symbol_of_declaration(declaration)
            .with_context(|| format!("declaration {declaration:?} is not bound"))
    }

    pub fn declared_type(&self, name: &str) -> Result<TypeId> {
        Ok(self.checker.get_declared_type_of_symbol(self.symbol(name)?))
    }

    pub fn type_of(&self, name: &str) -> Result<TypeId> {
        Ok(self.checker.get_type_of_symbol(self.symbol(name)?))
    }

    /// First user file.
    pub fn main_file(&self) -> Result<NodeIndex> {
        self.files
            .get(1)
            .copied()
            .context("program has no user files")
    }

    pub fn shared_checker(&self) -> Arc<dyn TypeChecker> {
        Arc::clone(&self.checker) as Arc<dyn TypeChecker>
    }
}
