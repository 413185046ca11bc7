//! Identifier resolution for join trees
//!
//! Binds the identifiers of USING lists and ON predicates to the columns of
//! the tables they refer to. Tables come from a [`SchemaCatalog`]; the
//! resolver walks the join tree bottom-up and builds a [`Scope`] for every
//! table expression.

use crate::error::{AnalysisError, AnalysisResult};
use crate::tree::{ColumnNode, ColumnSource, IdentifierNode, ListNode, QueryTreeNode, TableNode};
use std::collections::HashMap;

/// Columns of one catalog table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Table name to schema
pub type SchemaCatalog = HashMap<String, TableSchema>;

/// A table visible in a scope
#[derive(Debug, Clone)]
pub struct ScopeTable {
    table: TableNode,
    schema: TableSchema,
}

impl ScopeTable {
    pub fn label(&self) -> &str {
        self.table.label()
    }

    pub fn table(&self) -> &TableNode {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.schema.columns
    }
}

/// Names visible from a table expression: its tables in left-to-right
/// order, plus the columns merged by USING joins inside it
#[derive(Debug, Clone, Default)]
pub struct Scope {
    tables: Vec<ScopeTable>,
    using_columns: Vec<ColumnNode>,
}

impl Scope {
    pub fn tables(&self) -> &[ScopeTable] {
        &self.tables
    }

    pub fn using_columns(&self) -> &[ColumnNode] {
        &self.using_columns
    }

    /// Labels of the visible tables
    pub fn labels(&self) -> Vec<&str> {
        self.tables.iter().map(ScopeTable::label).collect()
    }

    fn using_column(&self, name: &str) -> Option<&ColumnNode> {
        self.using_columns.iter().find(|c| c.name() == name)
    }

    fn describe(&self) -> String {
        format!("scope of [{}]", self.labels().join(", "))
    }

    fn merge(mut self, other: Scope) -> Scope {
        self.tables.extend(other.tables);
        for column in other.using_columns {
            self.add_using_column(column);
        }
        self
    }

    fn add_using_column(&mut self, column: ColumnNode) {
        self.using_columns.retain(|c| c.name() != column.name());
        self.using_columns.push(column);
    }

    /// Resolve a column name against this scope. `place` names the scope
    /// in error messages.
    ///
    /// A USING column stands for the columns it merged. Any other table
    /// providing the name is a second candidate.
    fn resolve_name(&self, name: &str, place: &str) -> AnalysisResult<QueryTreeNode> {
        let using = self.using_column(name);
        let merged = using.map(merged_tables).unwrap_or_default();
        let candidates: Vec<&ScopeTable> = self
            .tables
            .iter()
            .filter(|t| t.schema.has_column(name) && !merged.contains(&t.label()))
            .collect();

        let Some(column) = using else {
            let table = single_candidate(name, candidates, place)?;
            return Ok(ColumnNode::new(name, column_source(table)).into());
        };
        if candidates.is_empty() {
            return Ok(column.clone().into());
        }
        Err(AnalysisError::AmbiguousReference {
            identifier: name.to_string(),
            candidates: std::iter::once(column.source().to_string())
                .chain(candidates.iter().map(|t| t.label().to_string()))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    fn resolve_identifier(&self, identifier: &IdentifierNode) -> AnalysisResult<QueryTreeNode> {
        if !identifier.is_compound() {
            return self.resolve_name(identifier.short_name(), &self.describe());
        }

        let qualifier = identifier.qualifier();
        let name = identifier.short_name();
        let candidates = self
            .tables
            .iter()
            .filter(|t| t.table.matches_qualifier(qualifier) && t.schema.has_column(name))
            .collect();
        let table = single_candidate(&identifier.full_name(), candidates, &self.describe())?;
        Ok(ColumnNode::new(name, column_source(table)).into())
    }
}

/// Labels of the tables whose columns a USING column merges, following
/// USING columns of inner joins
fn merged_tables(column: &ColumnNode) -> Vec<&str> {
    let mut labels = Vec::new();
    let mut stack = vec![column];
    while let Some(column) = stack.pop() {
        let Some(QueryTreeNode::List(sides)) = column.expression() else {
            continue;
        };
        for side in sides.nodes() {
            if let QueryTreeNode::Column(side) = side {
                match side.source() {
                    ColumnSource::Table(label) => labels.push(label.as_str()),
                    ColumnSource::Using => stack.push(side),
                }
            }
        }
    }
    labels
}

fn column_source(table: &ScopeTable) -> ColumnSource {
    ColumnSource::Table(table.label().to_string())
}

/// Exactly one table must provide the column
fn single_candidate<'s>(
    identifier: &str,
    candidates: Vec<&'s ScopeTable>,
    place: &str,
) -> AnalysisResult<&'s ScopeTable> {
    match candidates.as_slice() {
        [] => Err(AnalysisError::UnresolvedReference {
            identifier: identifier.to_string(),
            scope: place.to_string(),
        }),
        [table] => Ok(*table),
        _ => Err(AnalysisError::AmbiguousReference {
            identifier: identifier.to_string(),
            candidates: candidates
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Resolves the identifiers of a join tree against a schema catalog
pub struct JoinTreeResolver<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> JoinTreeResolver<'a> {
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve a table expression in place and return its scope.
    ///
    /// Resolving an already resolved tree leaves it unchanged.
    pub fn resolve(&self, node: &mut QueryTreeNode) -> AnalysisResult<Scope> {
        match node {
            QueryTreeNode::Table(table) => self.resolve_table(table),
            QueryTreeNode::Join(join) => {
                let left = self.resolve(join.left_table_expression_mut())?;
                let right = self.resolve(join.right_table_expression_mut())?;

                match join.join_expression_mut() {
                    Some(QueryTreeNode::List(list)) => {
                        let using_columns = resolve_using_list(list, &left, &right)?;
                        let mut scope = left.merge(right);
                        for column in using_columns {
                            scope.add_using_column(column);
                        }
                        Ok(scope)
                    }
                    Some(expression) => {
                        let scope = left.merge(right);
                        resolve_expression(expression, &scope)?;
                        Ok(scope)
                    }
                    None => Ok(left.merge(right)),
                }
            }
            other => Err(logical_error(
                &format!("{} node in a table expression slot", other.node_type()),
                other,
            )),
        }
    }

    fn resolve_table(&self, table: &TableNode) -> AnalysisResult<Scope> {
        let short_name = table.name().rsplit('.').next().unwrap_or(table.name());
        let schema = self
            .catalog
            .get(table.name())
            .or_else(|| self.catalog.get(short_name))
            .ok_or_else(|| AnalysisError::UnknownTable {
                table: table.name().to_string(),
            })?;

        Ok(Scope {
            tables: vec![ScopeTable {
                table: table.clone(),
                schema: schema.clone(),
            }],
            using_columns: Vec::new(),
        })
    }
}

fn logical_error(message: &str, node: &QueryTreeNode) -> AnalysisError {
    AnalysisError::LogicalError {
        message: message.to_string(),
        tree_dump: node.dump_tree_to_string(),
    }
}

/// Replace each USING identifier with a USING column over both sides
fn resolve_using_list(
    list: &mut ListNode,
    left: &Scope,
    right: &Scope,
) -> AnalysisResult<Vec<ColumnNode>> {
    let mut resolved = Vec::with_capacity(list.len());

    for entry in list.nodes_mut().iter_mut() {
        let column = match &*entry {
            QueryTreeNode::Column(column) if *column.source() == ColumnSource::Using => {
                column.clone()
            }
            QueryTreeNode::Identifier(identifier) if !identifier.is_compound() => {
                let name = identifier.short_name().to_string();
                let left_column = left.resolve_name(&name, "left table expression")?;
                let right_column = right.resolve_name(&name, "right table expression")?;
                log::trace!("Resolved USING column '{name}'");
                ColumnNode::using(name, left_column, right_column)
            }
            other => {
                return Err(logical_error(
                    &format!("{} node in a USING list", other.node_type()),
                    other,
                ))
            }
        };
        *entry = column.clone().into();
        resolved.push(column);
    }

    Ok(resolved)
}

/// Replace every identifier in an ON expression with the column it names
fn resolve_expression(expression: &mut QueryTreeNode, scope: &Scope) -> AnalysisResult<()> {
    let mut stack = vec![expression];

    while let Some(node) = stack.pop() {
        if let QueryTreeNode::Identifier(identifier) = &*node {
            let resolved = scope.resolve_identifier(identifier)?;
            log::trace!("Resolved identifier '{}' to {}", identifier.full_name(), resolved);
            *node = resolved;
            continue;
        }
        if matches!(&*node, QueryTreeNode::Column(_)) {
            continue;
        }
        stack.extend(node.children_mut());
    }

    Ok(())
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
