//! Error types for qt-analyzer

use thiserror::Error;

/// Query tree construction and analysis errors
///
/// These use the `AE` prefix (Analysis Error) to keep them apart from the
/// `S` codes of qt-sql and the `E` codes of qt-core.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// AE001: Malformed clause detected while building the tree
    #[error("[AE001] Invalid query structure: {message}")]
    StructuralValidation { message: String },

    /// AE002: Construct with no tree or syntax counterpart
    #[error("[AE002] Unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String },

    /// AE003: Table missing from the schema catalog
    #[error("[AE003] Unknown table '{table}'")]
    UnknownTable { table: String },

    /// AE004: Identifier does not match any visible column
    #[error("[AE004] Cannot resolve identifier '{identifier}' in {scope}")]
    UnresolvedReference { identifier: String, scope: String },

    /// AE005: Identifier matches columns of more than one table
    #[error("[AE005] Identifier '{identifier}' is ambiguous, candidates: {candidates}")]
    AmbiguousReference {
        identifier: String,
        candidates: String,
    },

    /// AE006: Broken tree invariant; aborts compilation of the current query
    #[error("[AE006] Logical error: {message}\n{tree_dump}")]
    LogicalError { message: String, tree_dump: String },

    /// AE007: SQL crate error propagation
    #[error("[AE007] SQL error: {0}")]
    Sql(#[from] qt_sql::SqlError),

    /// AE008: Core crate error propagation
    #[error("[AE008] Core error: {0}")]
    Core(#[from] qt_core::CoreError),
}

impl AnalysisError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        AnalysisError::StructuralValidation {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        AnalysisError::UnsupportedConstruct {
            construct: construct.into(),
        }
    }
}

/// Result type alias for AnalysisError
pub type AnalysisResult<T> = Result<T, AnalysisError>;
