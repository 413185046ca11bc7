//! Unresolved identifier

use super::dump::FormatState;
use super::node::QueryTreeNode;
use super::syntax::Syntax;
use crate::error::AnalysisResult;
use sqlparser::ast::{Expr, Ident};
use std::hash::{Hash, Hasher};

/// A possibly compound name (`x`, `t.x`, `db.t.x`) that has not been bound
/// to a column yet
#[derive(Debug, Clone)]
pub struct IdentifierNode {
    parts: Vec<String>,
}

impl IdentifierNode {
    /// Single-part identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    /// Compound identifier from its parts
    pub fn compound(parts: Vec<String>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Last part, the column name for a qualified identifier
    pub fn short_name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }

    /// Every part except the last one
    pub fn qualifier(&self) -> &[String] {
        match self.parts.split_last() {
            Some((_, qualifier)) => qualifier,
            None => &[],
        }
    }

    pub fn is_compound(&self) -> bool {
        self.parts.len() > 1
    }

    /// Dotted full name
    pub fn full_name(&self) -> String {
        self.parts.join(".")
    }

    pub(crate) fn scalars_equal(&self, other: &Self) -> bool {
        self.parts == other.parts
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        Vec::new()
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        Vec::new()
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, _state: &mut FormatState, _indent: usize) {
        out.push_str(&format!(", identifier: {}", self.full_name()));
    }

    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        let expr = match self.parts.as_slice() {
            [name] => Expr::Identifier(Ident::new(name)),
            parts => Expr::CompoundIdentifier(parts.iter().map(Ident::new).collect()),
        };
        Ok(Syntax::Expr(expr))
    }
}
