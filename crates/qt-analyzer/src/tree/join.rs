//! JOIN node
//!
//! A join of two table expressions. The optional third child is the join
//! expression, and its node type decides the constraint form:
//!
//! - a `List` node holds the identifiers of a `USING (...)` clause
//! - any other node is the predicate of an `ON ...` clause
//!
//! The form is recomputed from the child on every call, so replacing the
//! join expression through [`JoinNode::set_join_expression`] or
//! [`JoinNode::join_expression_mut`] is always reflected.

use super::dump::{self, FormatState};
use super::list::ListNode;
use super::node::QueryTreeNode;
use super::syntax::Syntax;
use crate::error::{AnalysisError, AnalysisResult};
use qt_sql::{JoinKind, JoinLocality, JoinStrictness, TableJoin};
use sqlparser::ast::Ident;
use std::hash::{Hash, Hasher};

/// Join of a left and a right table expression
#[derive(Debug, Clone)]
pub struct JoinNode {
    locality: JoinLocality,
    strictness: JoinStrictness,
    kind: JoinKind,
    left: Box<QueryTreeNode>,
    right: Box<QueryTreeNode>,
    join_expression: Option<Box<QueryTreeNode>>,
}

impl JoinNode {
    /// Join with an optional ON predicate.
    ///
    /// Use [`JoinNode::with_using`] for the USING form; a `List` here would
    /// silently turn the predicate into a USING clause.
    pub fn new(
        left: QueryTreeNode,
        right: QueryTreeNode,
        join_expression: Option<QueryTreeNode>,
        locality: JoinLocality,
        strictness: JoinStrictness,
        kind: JoinKind,
    ) -> Self {
        debug_assert!(
            !matches!(join_expression, Some(QueryTreeNode::List(_))),
            "ON join expression must not be a list"
        );
        Self {
            locality,
            strictness,
            kind,
            left: Box::new(left),
            right: Box::new(right),
            join_expression: join_expression.map(Box::new),
        }
    }

    /// Join with a USING clause over the given identifiers
    pub fn with_using(
        left: QueryTreeNode,
        right: QueryTreeNode,
        using_identifiers: Vec<QueryTreeNode>,
        locality: JoinLocality,
        strictness: JoinStrictness,
        kind: JoinKind,
    ) -> Self {
        Self {
            locality,
            strictness,
            kind,
            left: Box::new(left),
            right: Box::new(right),
            join_expression: Some(Box::new(ListNode::new(using_identifiers).into())),
        }
    }

    pub fn left_table_expression(&self) -> &QueryTreeNode {
        &self.left
    }

    pub fn left_table_expression_mut(&mut self) -> &mut QueryTreeNode {
        &mut self.left
    }

    pub fn right_table_expression(&self) -> &QueryTreeNode {
        &self.right
    }

    pub fn right_table_expression_mut(&mut self) -> &mut QueryTreeNode {
        &mut self.right
    }

    pub fn join_expression(&self) -> Option<&QueryTreeNode> {
        self.join_expression.as_deref()
    }

    pub fn join_expression_mut(&mut self) -> Option<&mut QueryTreeNode> {
        self.join_expression.as_deref_mut()
    }

    /// Replace the join expression subtree. `None` removes it.
    pub fn set_join_expression(&mut self, join_expression: Option<QueryTreeNode>) {
        self.join_expression = join_expression.map(Box::new);
    }

    /// Detach the join expression, leaving the join unconditioned
    pub fn take_join_expression(&mut self) -> Option<QueryTreeNode> {
        self.join_expression.take().map(|expression| *expression)
    }

    /// Join expression is present and is a USING list
    pub fn is_using_join_expression(&self) -> bool {
        matches!(self.join_expression.as_deref(), Some(QueryTreeNode::List(_)))
    }

    /// Join expression is present and is not a USING list
    pub fn is_on_join_expression(&self) -> bool {
        matches!(self.join_expression.as_deref(), Some(node) if !matches!(node, QueryTreeNode::List(_)))
    }

    pub fn locality(&self) -> JoinLocality {
        self.locality
    }

    pub fn set_locality(&mut self, locality: JoinLocality) {
        self.locality = locality;
    }

    pub fn strictness(&self) -> JoinStrictness {
        self.strictness
    }

    pub fn set_strictness(&mut self, strictness: JoinStrictness) {
        self.strictness = strictness;
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: JoinKind) {
        self.kind = kind;
    }

    /// Join clause keywords plus the ON or USING constraint
    pub fn to_ast_table_join(&self) -> AnalysisResult<TableJoin> {
        let mut table_join = TableJoin::new(self.locality, self.strictness, self.kind);

        match self.join_expression.as_deref() {
            None => {}
            Some(QueryTreeNode::List(list)) => {
                let columns = list
                    .nodes()
                    .iter()
                    .map(using_column_ident)
                    .collect::<AnalysisResult<Vec<_>>>()?;
                table_join.using_expression_list = Some(columns);
            }
            Some(expression) => {
                table_join.on_expression = Some(expression.to_syntax()?.into_expr()?);
            }
        }

        Ok(table_join)
    }

    pub(crate) fn scalars_equal(&self, other: &Self) -> bool {
        self.locality == other.locality
            && self.strictness == other.strictness
            && self.kind == other.kind
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        self.locality.hash(state);
        self.strictness.hash(state);
        self.kind.hash(state);
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        vec![
            Some(self.left.as_ref()),
            Some(self.right.as_ref()),
            self.join_expression.as_deref(),
        ]
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        let mut children = vec![self.left.as_mut(), self.right.as_mut()];
        children.extend(self.join_expression.as_deref_mut());
        children
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, state: &mut FormatState, indent: usize) {
        out.push_str(&format!(
            ", locality: {}, strictness: {}, kind: {}",
            self.locality, self.strictness, self.kind
        ));
        dump::write_section(out, state, indent, "LEFT TABLE EXPRESSION", &self.left);
        dump::write_section(out, state, indent, "RIGHT TABLE EXPRESSION", &self.right);
        if let Some(expression) = &self.join_expression {
            dump::write_section(out, state, indent, "JOIN EXPRESSION", expression);
        }
    }

    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        Ok(Syntax::Join {
            left: Box::new(self.left.to_syntax()?),
            join: self.to_ast_table_join()?,
            right: Box::new(self.right.to_syntax()?),
        })
    }
}

/// Name a USING list entry renders as.
///
/// Before resolution the entries are single-part identifiers, afterwards
/// they are USING columns.
fn using_column_ident(node: &QueryTreeNode) -> AnalysisResult<Ident> {
    match node {
        QueryTreeNode::Identifier(identifier) if !identifier.is_compound() => {
            Ok(Ident::new(identifier.short_name()))
        }
        QueryTreeNode::Column(column) => Ok(Ident::new(column.name())),
        QueryTreeNode::RuntimeFilter(filter) => Err(AnalysisError::unsupported(format!(
            "runtime filter {} in USING list",
            filter.filter_id()
        ))),
        other => Err(AnalysisError::LogicalError {
            message: format!("unexpected {} node in USING list", other.node_type()),
            tree_dump: other.dump_tree_to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "join_test.rs"]
mod tests;
