//! SQL parser wrapper

use crate::dialect::{ClickHouseDialect, GenericDialect, SnowflakeDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use crate::join_keywords::{extract_join_keywords, JoinKeywords};
use sqlparser::ast::{Expr, Statement};

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a new parser with ClickHouse dialect
    pub fn clickhouse() -> Self {
        Self {
            dialect: Box::new(ClickHouseDialect::new()),
        }
    }

    /// Create a new parser with the generic dialect
    pub fn generic() -> Self {
        Self {
            dialect: Box::new(GenericDialect::new()),
        }
    }

    /// Create a new parser with Snowflake dialect
    pub fn snowflake() -> Self {
        Self {
            dialect: Box::new(SnowflakeDialect::new()),
        }
    }

    /// Create a parser from dialect name
    pub fn from_dialect_name(name: &str) -> SqlResult<Self> {
        match name.to_lowercase().as_str() {
            "clickhouse" => Ok(Self::clickhouse()),
            "generic" => Ok(Self::generic()),
            "snowflake" => Ok(Self::snowflake()),
            _ => Err(SqlError::UnknownDialect(name.to_string())),
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Parse SQL and return the first statement
    pub fn parse_single(&self, sql: &str) -> SqlResult<Statement> {
        let stmts = self.parse(sql)?;
        stmts.into_iter().next().ok_or(SqlError::EmptySql)
    }

    /// Parse a single statement, reading ClickHouse join keywords
    /// (`ANY`, `ALL`, `LOCAL`, `PASTE`, `ASOF`) that sqlparser has no
    /// grammar for. Apply the returned keywords with
    /// [`TableJoin::from_sql_join_with_keywords`](crate::TableJoin::from_sql_join_with_keywords).
    pub fn parse_single_with_join_keywords(
        &self,
        sql: &str,
    ) -> SqlResult<(Statement, JoinKeywords)> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        let prepared = extract_join_keywords(self.dialect.parser_dialect(), sql)?;
        let statement = self
            .dialect
            .parse(&prepared.sql)?
            .into_iter()
            .next()
            .ok_or(SqlError::EmptySql)?;
        Ok((statement, prepared.join_keywords))
    }

    /// Parse a standalone expression
    pub fn parse_expr(&self, sql: &str) -> SqlResult<Expr> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse_expr(sql)
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Quote an identifier for the current dialect
    pub fn quote_ident(&self, ident: &str) -> String {
        self.dialect.quote_ident(ident)
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::clickhouse()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
