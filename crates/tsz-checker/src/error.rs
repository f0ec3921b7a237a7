use thiserror::Error;
use tsz_ast::NodeIndex;
use tsz_binder::SymbolId;

/// Misuse of the checker's host tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckerError {
    #[error("unknown symbol {0:?}")]
    UnknownSymbol(SymbolId),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeIndex),
    #[error("node {node:?} is a {found}, expected {expected}")]
    UnexpectedNodeKind {
        node: NodeIndex,
        expected: &'static str,
        found: String,
    },
}
