//! Join clause validation

use crate::error::{AnalysisError, AnalysisResult};
use qt_sql::{JoinKind, JoinStrictness, TableJoin};

/// Check that a join clause describes a join the query tree can represent.
///
/// Rejects clauses with both ON and USING, an empty USING list, conditions
/// on joins that take none, missing conditions on joins that need one, and
/// strictness/kind combinations with no meaning.
pub fn validate_table_join(table_join: &TableJoin) -> AnalysisResult<()> {
    let kind = table_join.kind;
    let strictness = table_join.strictness;

    if table_join.on_expression.is_some() && table_join.using_expression_list.is_some() {
        return Err(AnalysisError::structural(format!(
            "{kind} JOIN cannot have both ON and USING"
        )));
    }

    if matches!(&table_join.using_expression_list, Some(columns) if columns.is_empty()) {
        return Err(AnalysisError::structural(format!(
            "{kind} JOIN has an empty USING list"
        )));
    }

    if kind.is_unconditional() && table_join.has_constraint() {
        return Err(AnalysisError::structural(format!(
            "{kind} JOIN cannot have a join condition"
        )));
    }

    match strictness {
        JoinStrictness::Semi | JoinStrictness::Anti
            if !matches!(kind, JoinKind::Left | JoinKind::Right) =>
        {
            return Err(AnalysisError::structural(format!(
                "{strictness} JOIN requires LEFT or RIGHT kind, got {kind}"
            )));
        }
        JoinStrictness::Asof if !matches!(kind, JoinKind::Inner | JoinKind::Left) => {
            return Err(AnalysisError::structural(format!(
                "ASOF JOIN requires INNER or LEFT kind, got {kind}"
            )));
        }
        _ => {}
    }

    if !kind.is_unconditional() && !table_join.has_constraint() {
        return Err(AnalysisError::structural(format!(
            "{kind} JOIN requires an ON or USING condition"
        )));
    }

    Ok(())
}
