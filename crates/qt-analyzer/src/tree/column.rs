//! Resolved column reference

use super::dump::{self, FormatState};
use super::list::ListNode;
use super::node::QueryTreeNode;
use super::syntax::Syntax;
use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use sqlparser::ast::{Expr, Ident};
use std::hash::{Hash, Hasher};

/// Where a resolved column comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSource {
    /// Column of the table expression with this label (alias, or name)
    Table(String),
    /// Column shared by both sides of a USING join
    Using,
}

impl std::fmt::Display for ColumnSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSource::Table(label) => write!(f, "{label}"),
            ColumnSource::Using => write!(f, "USING"),
        }
    }
}

/// Column bound to its source.
///
/// A USING column carries `List[left column, right column]` as its
/// expression, one column from each side of the join.
#[derive(Debug, Clone)]
pub struct ColumnNode {
    name: String,
    source: ColumnSource,
    expression: Option<Box<QueryTreeNode>>,
}

impl ColumnNode {
    /// Column read from a table expression
    pub fn new(name: impl Into<String>, source: ColumnSource) -> Self {
        Self {
            name: name.into(),
            source,
            expression: None,
        }
    }

    /// USING column backed by one column from each side
    pub fn using(name: impl Into<String>, left: QueryTreeNode, right: QueryTreeNode) -> Self {
        Self::new(name, ColumnSource::Using)
            .with_expression(ListNode::new(vec![left, right]).into())
    }

    pub fn with_expression(mut self, expression: QueryTreeNode) -> Self {
        self.expression = Some(Box::new(expression));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &ColumnSource {
        &self.source
    }

    pub fn expression(&self) -> Option<&QueryTreeNode> {
        self.expression.as_deref()
    }

    pub(crate) fn scalars_equal(&self, other: &Self) -> bool {
        self.name == other.name && self.source == other.source
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.source.hash(state);
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        vec![self.expression.as_deref()]
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        self.expression.as_deref_mut().into_iter().collect()
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, state: &mut FormatState, indent: usize) {
        out.push_str(&format!(
            ", column_name: {}, column_source: {}",
            self.name, self.source
        ));
        if let Some(expression) = &self.expression {
            dump::write_section(out, state, indent, "EXPRESSION", expression);
        }
    }

    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        let expr = match &self.source {
            ColumnSource::Table(label) => {
                Expr::CompoundIdentifier(vec![Ident::new(label), Ident::new(&self.name)])
            }
            ColumnSource::Using => Expr::Identifier(Ident::new(&self.name)),
        };
        Ok(Syntax::Expr(expr))
    }
}
