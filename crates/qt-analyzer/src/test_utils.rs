//! Shared test utilities for qt-analyzer

use crate::resolver::{SchemaCatalog, TableSchema};
use crate::tree::{
    ConstantNode, ConstantValue, FunctionNode, IdentifierNode, JoinNode, QueryTreeNode, TableNode,
};
use qt_core::{BuildPipelineSettings, ExecutionContext, Settings};
use qt_sql::{JoinKind, JoinLocality, JoinStrictness};

/// Table leaf
pub fn table(name: &str) -> QueryTreeNode {
    TableNode::new(name).into()
}

/// Aliased table leaf
pub fn aliased(name: &str, alias: &str) -> QueryTreeNode {
    TableNode::new(name).with_alias(alias).into()
}

/// Identifier from a dotted name, `"t1.id"` becomes `[t1, id]`
pub fn ident(name: &str) -> QueryTreeNode {
    IdentifierNode::compound(name.split('.').map(str::to_string).collect()).into()
}

/// Integer constant
pub fn int(value: i64) -> QueryTreeNode {
    ConstantNode::new(ConstantValue::Int(value)).into()
}

/// Function application
pub fn func(name: &str, arguments: Vec<QueryTreeNode>) -> QueryTreeNode {
    FunctionNode::new(name, arguments).into()
}

/// `equals(lhs, rhs)` over two identifiers
pub fn equals(lhs: &str, rhs: &str) -> QueryTreeNode {
    func("equals", vec![ident(lhs), ident(rhs)])
}

/// Join with an ON predicate and unspecified locality/strictness
pub fn on_join(
    left: QueryTreeNode,
    right: QueryTreeNode,
    predicate: QueryTreeNode,
    kind: JoinKind,
) -> JoinNode {
    JoinNode::new(
        left,
        right,
        Some(predicate),
        JoinLocality::Unspecified,
        JoinStrictness::Unspecified,
        kind,
    )
}

/// Join with a USING list and unspecified locality/strictness
pub fn using_join(
    left: QueryTreeNode,
    right: QueryTreeNode,
    columns: &[&str],
    kind: JoinKind,
) -> JoinNode {
    JoinNode::with_using(
        left,
        right,
        columns.iter().map(|c| ident(c)).collect(),
        JoinLocality::Unspecified,
        JoinStrictness::Unspecified,
        kind,
    )
}

/// Catalog from `(table, columns)` pairs
pub fn catalog(tables: &[(&str, &[&str])]) -> SchemaCatalog {
    tables
        .iter()
        .map(|(name, columns)| {
            (
                name.to_string(),
                TableSchema::new(columns.iter().map(|c| c.to_string()).collect()),
            )
        })
        .collect()
}

/// Pipeline snapshot with and-chain splitting forced on or off
pub fn pipeline_settings(split_and_chain: bool) -> BuildPipelineSettings {
    let settings = Settings {
        query_plan_merge_filters: split_and_chain,
        ..Settings::default()
    };
    BuildPipelineSettings::from_context(&ExecutionContext::new(settings))
        .expect("default-derived settings are consistent")
}
