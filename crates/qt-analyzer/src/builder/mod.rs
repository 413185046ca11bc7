//! Query tree construction from parsed SQL
//!
//! The builder turns the FROM clause of a `SELECT` into a left-deep tree of
//! `JoinNode`s over `TableNode` leaves. Each join clause is validated before
//! its node is created, so malformed clauses never reach later passes.

mod expr;
mod join;

pub use join::validate_table_join;

use crate::error::{AnalysisError, AnalysisResult};
use crate::tree::{IdentifierNode, JoinNode, QueryTreeNode, TableNode};
use qt_sql::{JoinKeywords, SqlParser, TableJoin};
use sqlparser::ast::{Expr, SetExpr, Statement, TableFactor, TableWithJoins};

/// Builds query trees from SQL text or parsed statements
#[derive(Default)]
pub struct QueryTreeBuilder {
    parser: SqlParser,
}

impl QueryTreeBuilder {
    /// Create a builder that parses with the given parser
    pub fn new(parser: SqlParser) -> Self {
        Self { parser }
    }

    /// Parse a single `SELECT` and build the join tree of its FROM clause.
    /// ClickHouse join keywords (`ANY LEFT JOIN`, `PASTE JOIN`, ...) are read
    /// as well.
    pub fn build_from_sql(&self, sql: &str) -> AnalysisResult<QueryTreeNode> {
        let (statement, keywords) = self.parser.parse_single_with_join_keywords(sql)?;
        self.build_from_statement_with_keywords(&statement, &keywords)
    }

    /// Build the join tree of a parsed `SELECT`
    pub fn build_from_statement(&self, statement: &Statement) -> AnalysisResult<QueryTreeNode> {
        self.build_from_statement_with_keywords(statement, &JoinKeywords::default())
    }

    /// Build the join tree of a `SELECT` parsed with
    /// [`SqlParser::parse_single_with_join_keywords`]
    pub fn build_from_statement_with_keywords(
        &self,
        statement: &Statement,
        keywords: &JoinKeywords,
    ) -> AnalysisResult<QueryTreeNode> {
        let Statement::Query(query) = statement else {
            return Err(AnalysisError::structural("expected a SELECT statement"));
        };
        match query.body.as_ref() {
            SetExpr::Select(select) => self.build_tables(&select.from, keywords),
            SetExpr::Query(_) => Err(AnalysisError::unsupported("parenthesised query body")),
            other => Err(AnalysisError::unsupported(format!(
                "query body '{other}' is not a plain SELECT"
            ))),
        }
    }

    /// Build a FROM clause. Additional comma-separated entries fold left-deep
    /// into `Comma` joins.
    pub fn build_tables(
        &self,
        from: &[TableWithJoins],
        keywords: &JoinKeywords,
    ) -> AnalysisResult<QueryTreeNode> {
        let mut entries = from.iter();
        let Some(first) = entries.next() else {
            return Err(AnalysisError::structural("SELECT has no FROM clause"));
        };

        let mut tree = self.build_table_with_joins(first, keywords)?;
        for entry in entries {
            let right = self.build_table_with_joins(entry, keywords)?;
            tree = self.build_join(tree, right, &TableJoin::comma())?.into();
        }
        Ok(tree)
    }

    /// Build one FROM entry: a table expression followed by its joins
    pub fn build_table_with_joins(
        &self,
        entry: &TableWithJoins,
        keywords: &JoinKeywords,
    ) -> AnalysisResult<QueryTreeNode> {
        let mut tree = self.build_table_expression(&entry.relation, keywords)?;
        for join in &entry.joins {
            let table_join = TableJoin::from_sql_join_with_keywords(join, keywords)?;
            let right = self.build_table_expression(&join.relation, keywords)?;
            tree = self.build_join(tree, right, &table_join)?.into();
        }
        Ok(tree)
    }

    /// Build a table expression: a named table or a parenthesised join
    pub fn build_table_expression(
        &self,
        factor: &TableFactor,
        keywords: &JoinKeywords,
    ) -> AnalysisResult<QueryTreeNode> {
        match factor {
            TableFactor::Table {
                name, alias, args, ..
            } => {
                if args.is_some() {
                    return Err(AnalysisError::unsupported(format!(
                        "table function '{name}'"
                    )));
                }
                let mut table = TableNode::new(name.to_string());
                if let Some(alias) = alias {
                    if !alias.columns.is_empty() {
                        return Err(AnalysisError::unsupported(format!(
                            "column aliases on table '{name}'"
                        )));
                    }
                    table = table.with_alias(alias.name.value.clone());
                }
                Ok(table.into())
            }
            TableFactor::NestedJoin {
                table_with_joins,
                alias,
            } => {
                if let Some(alias) = alias {
                    return Err(AnalysisError::unsupported(format!(
                        "alias '{}' on a parenthesised join",
                        alias.name
                    )));
                }
                self.build_table_with_joins(table_with_joins, keywords)
            }
            other => Err(AnalysisError::unsupported(format!(
                "table expression '{other}'"
            ))),
        }
    }

    /// Validate a join clause and build its node.
    ///
    /// The ON form stores the built predicate; the USING form stores the
    /// column identifiers in a list.
    pub fn build_join(
        &self,
        left: QueryTreeNode,
        right: QueryTreeNode,
        table_join: &TableJoin,
    ) -> AnalysisResult<JoinNode> {
        validate_table_join(table_join)?;

        log::debug!(
            "Building {} {} {} join",
            table_join.locality,
            table_join.strictness,
            table_join.kind
        );

        let node = match (&table_join.on_expression, &table_join.using_expression_list) {
            (_, Some(columns)) => JoinNode::with_using(
                left,
                right,
                columns
                    .iter()
                    .map(|column| IdentifierNode::new(column.value.clone()).into())
                    .collect(),
                table_join.locality,
                table_join.strictness,
                table_join.kind,
            ),
            (on_expression, None) => JoinNode::new(
                left,
                right,
                on_expression
                    .as_ref()
                    .map(|expr| self.build_expression(expr))
                    .transpose()?,
                table_join.locality,
                table_join.strictness,
                table_join.kind,
            ),
        };
        Ok(node)
    }

    /// Build a scalar expression node
    pub fn build_expression(&self, expr: &Expr) -> AnalysisResult<QueryTreeNode> {
        expr::build_expression(expr)
    }

    /// Parse and build a standalone scalar expression
    pub fn build_expression_from_sql(&self, sql: &str) -> AnalysisResult<QueryTreeNode> {
        let expr = self.parser.parse_expr(sql)?;
        self.build_expression(&expr)
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
