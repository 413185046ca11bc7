//! Expression building: sqlparser `Expr` to query tree nodes

use crate::error::{AnalysisError, AnalysisResult};
use crate::tree::syntax::{binary_operator_function, unary_operator_function};
use crate::tree::{ConstantNode, ConstantValue, FunctionNode, IdentifierNode, QueryTreeNode};
use sqlparser::ast::{
    self, Expr, FunctionArg, FunctionArgExpr, UnaryOperator, Value,
};

/// Build a scalar expression node.
///
/// Operators become functions named after them (`a = b` is `equals(a, b)`)
/// and parentheses are dropped; the tree shape carries precedence.
pub(crate) fn build_expression(expr: &Expr) -> AnalysisResult<QueryTreeNode> {
    match expr {
        Expr::Identifier(ident) => Ok(IdentifierNode::new(ident.value.clone()).into()),

        Expr::CompoundIdentifier(idents) => Ok(IdentifierNode::compound(
            idents.iter().map(|i| i.value.clone()).collect(),
        )
        .into()),

        Expr::Value(val) => Ok(ConstantNode::new(constant_from_value(&val.value)?).into()),

        Expr::BinaryOp { left, op, right } => {
            let name = binary_operator_function(op)
                .ok_or_else(|| AnalysisError::unsupported(format!("binary operator '{op}'")))?;
            Ok(FunctionNode::new(
                name,
                vec![build_expression(left)?, build_expression(right)?],
            )
            .into())
        }

        Expr::UnaryOp { op, expr: inner } => {
            // -5 is a negative literal, not negate(5)
            if *op == UnaryOperator::Minus {
                if let Expr::Value(val) = inner.as_ref() {
                    if let Some(negated) = negate_constant(constant_from_value(&val.value)?) {
                        return Ok(ConstantNode::new(negated).into());
                    }
                }
            }
            if *op == UnaryOperator::Plus {
                return build_expression(inner);
            }
            let name = unary_operator_function(op)
                .ok_or_else(|| AnalysisError::unsupported(format!("unary operator '{op}'")))?;
            Ok(FunctionNode::new(name, vec![build_expression(inner)?]).into())
        }

        Expr::Nested(inner) => build_expression(inner),

        Expr::IsNull(inner) => Ok(FunctionNode::new("isNull", vec![build_expression(inner)?]).into()),

        Expr::IsNotNull(inner) => {
            Ok(FunctionNode::new("isNotNull", vec![build_expression(inner)?]).into())
        }

        Expr::Between {
            expr: inner,
            negated,
            low,
            high,
        } => {
            let value = build_expression(inner)?;
            // BETWEEN: expr >= low AND expr <= high
            // NOT BETWEEN: expr < low OR expr > high
            let (low_fn, high_fn, combine_fn) = if *negated {
                ("less", "greater", "or")
            } else {
                ("greaterOrEquals", "lessOrEquals", "and")
            };
            Ok(FunctionNode::new(
                combine_fn,
                vec![
                    FunctionNode::new(low_fn, vec![value.clone(), build_expression(low)?]).into(),
                    FunctionNode::new(high_fn, vec![value, build_expression(high)?]).into(),
                ],
            )
            .into())
        }

        Expr::Function(func) => build_function(func),

        other => Err(AnalysisError::unsupported(format!("expression '{other}'"))),
    }
}

fn build_function(func: &ast::Function) -> AnalysisResult<QueryTreeNode> {
    if func.over.is_some() {
        return Err(AnalysisError::unsupported(format!("window function '{func}'")));
    }
    if func.filter.is_some() || !func.within_group.is_empty() {
        return Err(AnalysisError::unsupported(format!("aggregate clause in '{func}'")));
    }

    let arguments = match &func.args {
        ast::FunctionArguments::None => vec![],
        ast::FunctionArguments::Subquery(_) => {
            return Err(AnalysisError::unsupported(format!(
                "subquery argument in '{func}'"
            )))
        }
        ast::FunctionArguments::List(arg_list) => {
            if arg_list.duplicate_treatment.is_some() || !arg_list.clauses.is_empty() {
                return Err(AnalysisError::unsupported(format!(
                    "argument modifiers in '{func}'"
                )));
            }
            arg_list
                .args
                .iter()
                .map(|arg| match arg {
                    FunctionArg::Unnamed(FunctionArgExpr::Expr(e)) => build_expression(e),
                    other => Err(AnalysisError::unsupported(format!(
                        "function argument '{other}'"
                    ))),
                })
                .collect::<AnalysisResult<Vec<_>>>()?
        }
    };

    Ok(FunctionNode::new(func.name.to_string(), arguments).into())
}

/// Convert a literal into a constant value
pub(crate) fn constant_from_value(val: &Value) -> AnalysisResult<ConstantValue> {
    match val {
        Value::Number(n, _long) => {
            if let Ok(i) = n.parse::<i64>() {
                Ok(ConstantValue::Int(i))
            } else if let Ok(u) = n.parse::<u64>() {
                Ok(ConstantValue::UInt(u))
            } else if let Ok(f) = n.parse::<f64>() {
                Ok(ConstantValue::Float(f))
            } else {
                Err(AnalysisError::unsupported(format!("numeric literal '{n}'")))
            }
        }
        Value::SingleQuotedString(s) | Value::DoubleQuotedString(s) => {
            Ok(ConstantValue::String(s.clone()))
        }
        Value::Boolean(b) => Ok(ConstantValue::Bool(*b)),
        Value::Null => Ok(ConstantValue::Null),
        other => Err(AnalysisError::unsupported(format!("literal '{other}'"))),
    }
}

/// Negate a numeric constant; `None` when the result is not representable
fn negate_constant(value: ConstantValue) -> Option<ConstantValue> {
    match value {
        ConstantValue::Int(i) => i.checked_neg().map(ConstantValue::Int),
        ConstantValue::UInt(u) => i64::try_from(-i128::from(u)).ok().map(ConstantValue::Int),
        ConstantValue::Float(f) => Some(ConstantValue::Float(-f)),
        _ => None,
    }
}
