//! Ordered node list

use super::dump::FormatState;
use super::node::QueryTreeNode;
use super::syntax::Syntax;
use crate::error::AnalysisResult;

/// Ordered sequence of nodes: function arguments, or the USING list of a join
#[derive(Debug, Clone, Default)]
pub struct ListNode {
    nodes: Vec<QueryTreeNode>,
}

impl ListNode {
    pub fn new(nodes: Vec<QueryTreeNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[QueryTreeNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<QueryTreeNode> {
        &mut self.nodes
    }

    pub fn into_nodes(self) -> Vec<QueryTreeNode> {
        self.nodes
    }

    pub fn push(&mut self, node: QueryTreeNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        self.nodes.iter().map(Some).collect()
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        self.nodes.iter_mut().collect()
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, state: &mut FormatState, indent: usize) {
        out.push_str(&format!(", nodes: {}", self.nodes.len()));
        for node in &self.nodes {
            out.push('\n');
            node.dump_tree_with_state(out, state, indent + 2);
        }
    }

    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        let items = self
            .nodes
            .iter()
            .map(QueryTreeNode::to_syntax)
            .collect::<AnalysisResult<Vec<_>>>()?;
        Ok(Syntax::List(items))
    }
}

impl FromIterator<QueryTreeNode> for ListNode {
    fn from_iter<I: IntoIterator<Item = QueryTreeNode>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
