//! Error types for qt-sql

use thiserror::Error;

/// SQL parsing and join clause errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Unsupported SQL statement (S003)
    #[error("[S003] Unsupported SQL statement type: {0}")]
    UnsupportedStatement(String),

    /// Unknown dialect name (S004)
    #[error("[S004] Unknown SQL dialect: {0}")]
    UnknownDialect(String),

    /// Join operator with no query tree counterpart (S005)
    #[error("[S005] Unsupported join: {0}")]
    UnsupportedJoin(String),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
