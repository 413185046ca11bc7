//! Optimizer-injected runtime filter

use super::dump::{self, FormatState};
use super::node::QueryTreeNode;
use super::syntax::Syntax;
use crate::error::{AnalysisError, AnalysisResult};
use std::hash::{Hash, Hasher};

/// Filter built at execution time from the right side of a join and applied
/// to `column` on the left side. It has no surface syntax.
#[derive(Debug, Clone)]
pub struct RuntimeFilterNode {
    filter_id: u64,
    column: Box<QueryTreeNode>,
}

impl RuntimeFilterNode {
    pub fn new(filter_id: u64, column: QueryTreeNode) -> Self {
        Self {
            filter_id,
            column: Box::new(column),
        }
    }

    pub fn filter_id(&self) -> u64 {
        self.filter_id
    }

    pub fn column(&self) -> &QueryTreeNode {
        &self.column
    }

    pub(crate) fn scalars_equal(&self, other: &Self) -> bool {
        self.filter_id == other.filter_id
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        self.filter_id.hash(state);
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        vec![Some(self.column.as_ref())]
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        vec![self.column.as_mut()]
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, state: &mut FormatState, indent: usize) {
        out.push_str(&format!(", filter_id: {}", self.filter_id));
        dump::write_section(out, state, indent, "EXPRESSION", &self.column);
    }

    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        Err(AnalysisError::unsupported(format!(
            "runtime filter {} has no SQL representation",
            self.filter_id
        )))
    }
}
