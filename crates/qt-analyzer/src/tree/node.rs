//! The query tree node sum type

use super::column::ColumnNode;
use super::constant::ConstantNode;
use super::dump::{self, FormatState};
use super::function::FunctionNode;
use super::identifier::IdentifierNode;
use super::identity::{self, TreeHash, TreeHashState};
use super::join::JoinNode;
use super::list::ListNode;
use super::runtime_filter::RuntimeFilterNode;
use super::syntax::Syntax;
use super::table::TableNode;
use crate::error::AnalysisResult;
use std::hash::{Hash, Hasher};

/// Node type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTreeNodeType {
    Identifier,
    Constant,
    Column,
    Function,
    List,
    Table,
    Join,
    RuntimeFilter,
}

impl std::fmt::Display for QueryTreeNodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryTreeNodeType::Identifier => write!(f, "IDENTIFIER"),
            QueryTreeNodeType::Constant => write!(f, "CONSTANT"),
            QueryTreeNodeType::Column => write!(f, "COLUMN"),
            QueryTreeNodeType::Function => write!(f, "FUNCTION"),
            QueryTreeNodeType::List => write!(f, "LIST"),
            QueryTreeNodeType::Table => write!(f, "TABLE"),
            QueryTreeNodeType::Join => write!(f, "JOIN"),
            QueryTreeNodeType::RuntimeFilter => write!(f, "RUNTIME_FILTER"),
        }
    }
}

/// A node of the analyzer's query tree.
///
/// Every child is owned by exactly one parent. `clone()` copies the whole
/// subtree, so a clone can be mutated without affecting the original.
/// Equality and hashing are structural (see [`identity`](super::identity)).
#[derive(Debug, Clone)]
pub enum QueryTreeNode {
    Identifier(IdentifierNode),
    Constant(ConstantNode),
    Column(ColumnNode),
    Function(FunctionNode),
    List(ListNode),
    Table(TableNode),
    Join(JoinNode),
    RuntimeFilter(RuntimeFilterNode),
}

macro_rules! dispatch {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            QueryTreeNode::Identifier($inner) => $body,
            QueryTreeNode::Constant($inner) => $body,
            QueryTreeNode::Column($inner) => $body,
            QueryTreeNode::Function($inner) => $body,
            QueryTreeNode::List($inner) => $body,
            QueryTreeNode::Table($inner) => $body,
            QueryTreeNode::Join($inner) => $body,
            QueryTreeNode::RuntimeFilter($inner) => $body,
        }
    };
}

impl QueryTreeNode {
    /// Node type tag
    pub fn node_type(&self) -> QueryTreeNodeType {
        match self {
            QueryTreeNode::Identifier(_) => QueryTreeNodeType::Identifier,
            QueryTreeNode::Constant(_) => QueryTreeNodeType::Constant,
            QueryTreeNode::Column(_) => QueryTreeNodeType::Column,
            QueryTreeNode::Function(_) => QueryTreeNodeType::Function,
            QueryTreeNode::List(_) => QueryTreeNodeType::List,
            QueryTreeNode::Table(_) => QueryTreeNodeType::Table,
            QueryTreeNode::Join(_) => QueryTreeNodeType::Join,
            QueryTreeNode::RuntimeFilter(_) => QueryTreeNodeType::RuntimeFilter,
        }
    }

    /// Whether this node can appear in a table slot of a join
    pub fn is_table_expression(&self) -> bool {
        matches!(self, QueryTreeNode::Table(_) | QueryTreeNode::Join(_))
    }

    /// Fixed child slots, in order. Absent optional children are `None`.
    pub fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        dispatch!(self, n => n.children())
    }

    /// Present children, in slot order
    pub fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        dispatch!(self, n => n.children_mut())
    }

    /// Structural equality: same node types, same scalars, same child slots
    pub fn is_equal(&self, other: &QueryTreeNode) -> bool {
        identity::trees_equal(self, other)
    }

    /// Fold this subtree into a hasher
    pub fn update_tree_hash<H: Hasher>(&self, state: &mut H) {
        identity::hash_tree(self, state);
    }

    /// Structural fingerprint of this subtree
    pub fn tree_hash(&self) -> TreeHash {
        let mut state = TreeHashState::new();
        state.update(self);
        state.finish()
    }

    /// Compare scalar fields only. Nodes of different types are never equal.
    pub(crate) fn scalars_equal(&self, other: &QueryTreeNode) -> bool {
        match (self, other) {
            (QueryTreeNode::Identifier(l), QueryTreeNode::Identifier(r)) => l.scalars_equal(r),
            (QueryTreeNode::Constant(l), QueryTreeNode::Constant(r)) => l.scalars_equal(r),
            (QueryTreeNode::Column(l), QueryTreeNode::Column(r)) => l.scalars_equal(r),
            (QueryTreeNode::Function(l), QueryTreeNode::Function(r)) => l.scalars_equal(r),
            (QueryTreeNode::List(_), QueryTreeNode::List(_)) => true,
            (QueryTreeNode::Table(l), QueryTreeNode::Table(r)) => l.scalars_equal(r),
            (QueryTreeNode::Join(l), QueryTreeNode::Join(r)) => l.scalars_equal(r),
            (QueryTreeNode::RuntimeFilter(l), QueryTreeNode::RuntimeFilter(r)) => {
                l.scalars_equal(r)
            }
            _ => false,
        }
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        match self {
            QueryTreeNode::List(_) => {}
            QueryTreeNode::Identifier(n) => n.hash_scalars(state),
            QueryTreeNode::Constant(n) => n.hash_scalars(state),
            QueryTreeNode::Column(n) => n.hash_scalars(state),
            QueryTreeNode::Function(n) => n.hash_scalars(state),
            QueryTreeNode::Table(n) => n.hash_scalars(state),
            QueryTreeNode::Join(n) => n.hash_scalars(state),
            QueryTreeNode::RuntimeFilter(n) => n.hash_scalars(state),
        }
    }

    /// Append a human-readable dump of this subtree at the given indent
    pub fn dump_tree(&self, out: &mut String, indent: usize) {
        let mut state = FormatState::new();
        self.dump_tree_with_state(out, &mut state, indent);
    }

    /// Dump this subtree into a fresh string
    pub fn dump_tree_to_string(&self) -> String {
        let mut out = String::new();
        self.dump_tree(&mut out, 0);
        out
    }

    pub(crate) fn dump_tree_with_state(
        &self,
        out: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) {
        dump::write_header(out, state, indent, self);
        dispatch!(self, n => n.dump_tree_impl(out, state, indent))
    }

    /// Surface syntax of this subtree.
    ///
    /// Fails with `UnsupportedConstruct` when the subtree contains a node that
    /// only exists inside the analyzer.
    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        dispatch!(self, n => n.to_syntax())
    }

    pub fn as_identifier(&self) -> Option<&IdentifierNode> {
        match self {
            QueryTreeNode::Identifier(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantNode> {
        match self {
            QueryTreeNode::Constant(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&ColumnNode> {
        match self {
            QueryTreeNode::Column(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionNode> {
        match self {
            QueryTreeNode::Function(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            QueryTreeNode::List(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableNode> {
        match self {
            QueryTreeNode::Table(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_join(&self) -> Option<&JoinNode> {
        match self {
            QueryTreeNode::Join(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_join_mut(&mut self) -> Option<&mut JoinNode> {
        match self {
            QueryTreeNode::Join(n) => Some(n),
            _ => None,
        }
    }
}

impl PartialEq for QueryTreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for QueryTreeNode {}

impl Hash for QueryTreeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.update_tree_hash(state);
    }
}

impl std::fmt::Display for QueryTreeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_syntax() {
            Ok(syntax) => write!(f, "{syntax}"),
            Err(_) => {
                let dump = self.dump_tree_to_string();
                write!(f, "{}", dump.lines().next().unwrap_or_default())
            }
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for QueryTreeNode {
                fn from(node: $ty) -> Self {
                    QueryTreeNode::$variant(node)
                }
            }
        )*
    };
}

impl_from_node!(
    Identifier(IdentifierNode),
    Constant(ConstantNode),
    Column(ColumnNode),
    Function(FunctionNode),
    List(ListNode),
    Table(TableNode),
    Join(JoinNode),
    RuntimeFilter(RuntimeFilterNode),
);

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
