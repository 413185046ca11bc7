//! Surface-syntax JOIN clause
//!
//! `TableJoin` is the join clause as it appears between two table expressions:
//! the locality/strictness/kind keywords plus an optional ON or USING
//! constraint. Both constraint slots may be filled at once so that malformed
//! input can reach the tree builder, which rejects it.

use crate::error::{SqlError, SqlResult};
use crate::join_keywords::JoinKeywords;
use crate::joins::{JoinKind, JoinLocality, JoinStrictness};
use sqlparser::ast::{BinaryOperator, Expr, Ident, Join, JoinConstraint, JoinOperator, ObjectName};

/// JOIN clause keywords and constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableJoin {
    /// Distributed placement
    pub locality: JoinLocality,
    /// Multiplicity policy
    pub strictness: JoinStrictness,
    /// Join topology
    pub kind: JoinKind,
    /// `ON <expr>` predicate
    pub on_expression: Option<Expr>,
    /// `USING (a, b)` column list
    pub using_expression_list: Option<Vec<Ident>>,
}

impl TableJoin {
    /// Create a join clause without a constraint
    pub fn new(locality: JoinLocality, strictness: JoinStrictness, kind: JoinKind) -> Self {
        Self {
            locality,
            strictness,
            kind,
            on_expression: None,
            using_expression_list: None,
        }
    }

    /// Join produced by a comma-separated FROM list
    pub fn comma() -> Self {
        Self::new(
            JoinLocality::Unspecified,
            JoinStrictness::Unspecified,
            JoinKind::Comma,
        )
    }

    /// Attach an ON predicate
    pub fn with_on(mut self, expr: Expr) -> Self {
        self.on_expression = Some(expr);
        self
    }

    /// Attach a USING column list
    pub fn with_using(mut self, columns: Vec<Ident>) -> Self {
        self.using_expression_list = Some(columns);
        self
    }

    /// Whether an ON or USING constraint is present
    pub fn has_constraint(&self) -> bool {
        self.on_expression.is_some() || self.using_expression_list.is_some()
    }

    /// Convert a parsed sqlparser join into a join clause.
    ///
    /// NATURAL joins and operators with no query tree counterpart
    /// (APPLY, STRAIGHT_JOIN, ...) are rejected.
    pub fn from_sql_join(join: &Join) -> SqlResult<Self> {
        let locality = if join.global {
            JoinLocality::Global
        } else {
            JoinLocality::Unspecified
        };

        let (kind, strictness, constraint) = match &join.join_operator {
            JoinOperator::Join(c) | JoinOperator::Inner(c) => {
                (JoinKind::Inner, JoinStrictness::Unspecified, c)
            }
            JoinOperator::Left(c) | JoinOperator::LeftOuter(c) => {
                (JoinKind::Left, JoinStrictness::Unspecified, c)
            }
            JoinOperator::Right(c) | JoinOperator::RightOuter(c) => {
                (JoinKind::Right, JoinStrictness::Unspecified, c)
            }
            JoinOperator::FullOuter(c) => (JoinKind::Full, JoinStrictness::Unspecified, c),
            JoinOperator::CrossJoin(c) => (JoinKind::Cross, JoinStrictness::Unspecified, c),
            JoinOperator::Semi(c) | JoinOperator::LeftSemi(c) => {
                (JoinKind::Left, JoinStrictness::Semi, c)
            }
            JoinOperator::RightSemi(c) => (JoinKind::Right, JoinStrictness::Semi, c),
            JoinOperator::Anti(c) | JoinOperator::LeftAnti(c) => {
                (JoinKind::Left, JoinStrictness::Anti, c)
            }
            JoinOperator::RightAnti(c) => (JoinKind::Right, JoinStrictness::Anti, c),
            JoinOperator::AsOf {
                match_condition,
                constraint,
            } => {
                let on_expression = match constraint {
                    JoinConstraint::On(expr) => Expr::BinaryOp {
                        left: Box::new(expr.clone()),
                        op: BinaryOperator::And,
                        right: Box::new(match_condition.clone()),
                    },
                    JoinConstraint::None => match_condition.clone(),
                    _ => {
                        return Err(SqlError::UnsupportedJoin(format!(
                            "ASOF join with USING or NATURAL constraint: {join}"
                        )))
                    }
                };
                return Ok(
                    Self::new(locality, JoinStrictness::Asof, JoinKind::Inner)
                        .with_on(on_expression),
                );
            }
            _ => return Err(SqlError::UnsupportedJoin(join.to_string())),
        };

        let mut table_join = Self::new(locality, strictness, kind);
        match constraint {
            JoinConstraint::On(expr) => table_join.on_expression = Some(expr.clone()),
            JoinConstraint::Using(columns) => {
                let idents = columns
                    .iter()
                    .map(using_column_ident)
                    .collect::<SqlResult<Vec<_>>>()?;
                table_join.using_expression_list = Some(idents);
            }
            JoinConstraint::Natural => {
                return Err(SqlError::UnsupportedJoin(format!(
                    "NATURAL join is not supported: {join}"
                )))
            }
            JoinConstraint::None => {}
        }
        Ok(table_join)
    }

    /// Convert a parsed join, restoring the ClickHouse keywords that were
    /// taken out of its clause before parsing
    pub fn from_sql_join_with_keywords(join: &Join, keywords: &JoinKeywords) -> SqlResult<Self> {
        let mut table_join = Self::from_sql_join(join)?;
        if let Some(hint) = keywords.for_join(join) {
            hint.apply(&mut table_join)?;
        }
        Ok(table_join)
    }

    /// Keywords written before the right table expression,
    /// e.g. `GLOBAL ANY LEFT JOIN`
    pub fn keywords(&self) -> String {
        if self.kind == JoinKind::Comma {
            return ",".to_string();
        }

        let mut out = String::new();
        match self.locality {
            JoinLocality::Global => out.push_str("GLOBAL "),
            JoinLocality::Local => out.push_str("LOCAL "),
            JoinLocality::Unspecified => {}
        }

        match self.kind {
            JoinKind::Cross => out.push_str("CROSS JOIN"),
            JoinKind::Paste => out.push_str("PASTE JOIN"),
            kind => {
                match self.strictness {
                    JoinStrictness::All => out.push_str("ALL "),
                    JoinStrictness::Any => out.push_str("ANY "),
                    JoinStrictness::Asof => out.push_str("ASOF "),
                    _ => {}
                }
                let kind_keyword = match kind {
                    JoinKind::Left => Some("LEFT"),
                    JoinKind::Right => Some("RIGHT"),
                    JoinKind::Full => Some("FULL OUTER"),
                    JoinKind::Inner if self.strictness.is_filtering() => None,
                    JoinKind::Inner if self.strictness == JoinStrictness::Asof => None,
                    _ => Some("INNER"),
                };
                if let Some(keyword) = kind_keyword {
                    out.push_str(keyword);
                    out.push(' ');
                }
                if self.strictness.is_filtering() {
                    out.push_str(&self.strictness.to_string());
                    out.push(' ');
                }
                out.push_str("JOIN");
            }
        }
        out
    }

    /// Constraint written after the right table expression,
    /// e.g. ` ON a.id = b.id` or ` USING (id)`
    ///
    /// An inner ASOF join moves the last conjunct of its predicate into
    /// `MATCH_CONDITION (...)`.
    pub fn constraint(&self) -> String {
        let mut out = String::new();
        if let Some(expr) = &self.on_expression {
            if self.strictness == JoinStrictness::Asof && self.kind == JoinKind::Inner {
                let (rest, match_condition) = split_match_condition(expr);
                out.push_str(&format!(" MATCH_CONDITION ({match_condition})"));
                if let Some(rest) = rest {
                    out.push_str(&format!(" ON {rest}"));
                }
            } else {
                out.push_str(&format!(" ON {expr}"));
            }
        }
        if let Some(columns) = &self.using_expression_list {
            let names: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
            out.push_str(&format!(" USING ({})", names.join(", ")));
        }
        out
    }
}

impl std::fmt::Display for TableJoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.keywords(), self.constraint())
    }
}

/// Leading conjuncts and the trailing inequality of an ASOF predicate
fn split_match_condition(expr: &Expr) -> (Option<&Expr>, &Expr) {
    match unnested(expr) {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => (Some(unnested(left)), unnested(right)),
        other => (None, other),
    }
}

fn unnested(mut expr: &Expr) -> &Expr {
    while let Expr::Nested(inner) = expr {
        expr = &**inner;
    }
    expr
}

/// A USING column must be a single unqualified identifier
fn using_column_ident(name: &ObjectName) -> SqlResult<Ident> {
    match name.0.as_slice() {
        [part] => part.as_ident().cloned().ok_or_else(|| {
            SqlError::UnsupportedJoin(format!("USING column '{name}' is not an identifier"))
        }),
        _ => Err(SqlError::UnsupportedJoin(format!(
            "USING column '{name}' must not be qualified"
        ))),
    }
}

#[cfg(test)]
#[path = "table_join_test.rs"]
mod tests;
