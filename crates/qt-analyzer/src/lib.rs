//! qt-analyzer - query tree for the analyzer
//!
//! This crate holds the analyzer's tree IR and the passes that produce
//! and consume it:
//! - `tree`: node model with structural equality, hashing, dumps and SQL rendering
//! - `builder`: builds the join tree of a `SELECT` from parsed SQL
//! - `resolver`: binds identifiers in join conditions to table columns
//! - `filter_chain`: splits AND-chain filters into ordered filter steps

pub mod builder;
pub mod error;
pub mod filter_chain;
pub mod resolver;
pub mod tree;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use builder::QueryTreeBuilder;
pub use error::{AnalysisError, AnalysisResult};
pub use filter_chain::split_and_chain;
pub use resolver::{JoinTreeResolver, SchemaCatalog, Scope, TableSchema};
pub use tree::{
    ColumnNode, ColumnSource, ConstantNode, ConstantValue, FunctionNode, IdentifierNode,
    JoinNode, ListNode, QueryTreeNode, QueryTreeNodeType, RuntimeFilterNode, Syntax, TableNode,
    TreeHash,
};
