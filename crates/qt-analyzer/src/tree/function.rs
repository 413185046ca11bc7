//! Function application

use super::dump::{self, FormatState};
use super::list::ListNode;
use super::node::QueryTreeNode;
use super::syntax::{self, Syntax};
use crate::error::AnalysisResult;
use std::hash::{Hash, Hasher};

/// Function applied to an argument list.
///
/// SQL operators are functions too: `a = b` is `equals(a, b)`.
#[derive(Debug, Clone)]
pub struct FunctionNode {
    name: String,
    arguments: Box<QueryTreeNode>,
}

impl FunctionNode {
    pub fn new(name: impl Into<String>, arguments: Vec<QueryTreeNode>) -> Self {
        Self {
            name: name.into(),
            arguments: Box::new(ListNode::new(arguments).into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument nodes, in call order
    pub fn arguments(&self) -> &[QueryTreeNode] {
        match self.arguments.as_list() {
            Some(list) => list.nodes(),
            None => &[],
        }
    }

    pub fn arguments_mut(&mut self) -> &mut [QueryTreeNode] {
        match self.arguments.as_mut() {
            QueryTreeNode::List(list) => list.nodes_mut().as_mut_slice(),
            _ => &mut [],
        }
    }

    /// Consume the node and return its arguments
    pub fn into_arguments(self) -> Vec<QueryTreeNode> {
        match *self.arguments {
            QueryTreeNode::List(list) => list.into_nodes(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn scalars_equal(&self, other: &Self) -> bool {
        self.name == other.name
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        vec![Some(self.arguments.as_ref())]
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        vec![self.arguments.as_mut()]
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, state: &mut FormatState, indent: usize) {
        out.push_str(&format!(", function_name: {}", self.name));
        dump::write_section(out, state, indent, "ARGUMENTS", &self.arguments);
    }

    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        let arguments = self
            .arguments()
            .iter()
            .map(|argument| argument.to_syntax()?.into_expr())
            .collect::<AnalysisResult<Vec<_>>>()?;
        Ok(Syntax::Expr(syntax::function_to_expr(&self.name, arguments)))
    }
}
