//! qt-sql - syntax layer for the query tree
//!
//! This crate wraps sqlparser-rs with dialect support and defines the
//! surface-syntax join clause (`TableJoin`) together with the join enums
//! shared by the query tree and its renderers. ClickHouse join keywords that
//! sqlparser cannot read are taken out before parsing (`join_keywords`).

pub mod dialect;
pub mod error;
pub mod join_keywords;
pub mod joins;
pub mod parser;
pub mod table_join;

pub use dialect::{ClickHouseDialect, GenericDialect, SnowflakeDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use join_keywords::{extract_join_keywords, JoinKeywordHint, JoinKeywords, PreparedSql};
pub use joins::{JoinKind, JoinLocality, JoinStrictness};
pub use parser::SqlParser;
pub use table_join::TableJoin;
