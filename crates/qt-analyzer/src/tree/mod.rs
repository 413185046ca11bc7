//! Query tree
//!
//! The analyzer's intermediate representation between the parsed SQL and
//! the query plan. Nodes own their children, compare and hash
//! structurally, and can be dumped or rendered back to SQL.

pub mod column;
pub mod constant;
pub mod dump;
pub mod function;
pub mod identifier;
pub mod identity;
pub mod join;
pub mod list;
pub mod node;
pub mod runtime_filter;
pub mod syntax;
pub mod table;

pub use column::{ColumnNode, ColumnSource};
pub use constant::{ConstantNode, ConstantValue};
pub use dump::FormatState;
pub use function::FunctionNode;
pub use identifier::IdentifierNode;
pub use identity::{children_equal, TreeHash, TreeHashState};
pub use join::JoinNode;
pub use list::ListNode;
pub use node::{QueryTreeNode, QueryTreeNodeType};
pub use runtime_filter::RuntimeFilterNode;
pub use syntax::Syntax;
pub use table::TableNode;
