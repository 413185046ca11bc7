//! Table expression leaf

use super::dump::FormatState;
use super::node::QueryTreeNode;
use super::syntax::Syntax;
use crate::error::AnalysisResult;
use std::hash::{Hash, Hasher};

/// Named table, possibly database-qualified (`db.events`), with an optional alias
#[derive(Debug, Clone)]
pub struct TableNode {
    name: String,
    alias: Option<String>,
}

impl TableNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Name that qualified column references use: the alias, or the table name
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Whether `qualifier` (the part before the column name) refers to this table.
    ///
    /// An aliased table is only reachable through its alias. Otherwise both
    /// the full name and the bare table name match.
    pub fn matches_qualifier(&self, qualifier: &[String]) -> bool {
        let joined = qualifier.join(".");
        match &self.alias {
            Some(alias) => joined == *alias,
            None => {
                joined == self.name
                    || self.name.rsplit('.').next() == Some(joined.as_str())
            }
        }
    }

    pub(crate) fn scalars_equal(&self, other: &Self) -> bool {
        self.name == other.name && self.alias == other.alias
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.alias.hash(state);
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        Vec::new()
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        Vec::new()
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, _state: &mut FormatState, _indent: usize) {
        out.push_str(&format!(", table_name: {}", self.name));
        if let Some(alias) = &self.alias {
            out.push_str(&format!(", alias: {alias}"));
        }
    }

    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        Ok(Syntax::Table {
            name: self.name.clone(),
            alias: self.alias.clone(),
        })
    }
}
