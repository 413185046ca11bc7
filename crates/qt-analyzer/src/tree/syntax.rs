//! Surface syntax produced from query tree nodes

use crate::error::{AnalysisError, AnalysisResult};
use qt_sql::{JoinKind, TableJoin};
use sqlparser::ast::{
    BinaryOperator, Expr, Function, FunctionArg, FunctionArgExpr, FunctionArgumentList,
    FunctionArguments, Ident, ObjectName, UnaryOperator, Value,
};

/// Surface form of a node
#[derive(Debug, Clone, PartialEq)]
pub enum Syntax {
    /// Scalar expression
    Expr(Expr),
    /// Comma-separated list
    List(Vec<Syntax>),
    /// Table reference with optional alias
    Table { name: String, alias: Option<String> },
    /// Two table expressions joined by a join clause
    Join {
        left: Box<Syntax>,
        join: TableJoin,
        right: Box<Syntax>,
    },
}

impl Syntax {
    /// Unwrap into a scalar expression. Lists become tuples.
    pub fn into_expr(self) -> AnalysisResult<Expr> {
        match self {
            Syntax::Expr(expr) => Ok(expr),
            Syntax::List(items) => Ok(Expr::Tuple(
                items
                    .into_iter()
                    .map(Syntax::into_expr)
                    .collect::<AnalysisResult<Vec<_>>>()?,
            )),
            table @ (Syntax::Table { .. } | Syntax::Join { .. }) => Err(
                AnalysisError::unsupported(format!("table expression '{table}' used as a scalar")),
            ),
        }
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Syntax::Expr(expr) => write!(f, "{expr}"),
            Syntax::List(items) => {
                let rendered: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "{}", rendered.join(", "))
            }
            Syntax::Table { name, alias } => match alias {
                Some(alias) => write!(f, "{name} AS {alias}"),
                None => write!(f, "{name}"),
            },
            Syntax::Join { left, join, right } => {
                let right = match right.as_ref() {
                    nested @ Syntax::Join { .. } => format!("({nested})"),
                    other => other.to_string(),
                };
                if join.kind == JoinKind::Comma {
                    return write!(f, "{left}, {right}");
                }
                // `a, b JOIN c` would bind as `a, (b JOIN c)`
                let left = match left.as_ref() {
                    comma @ Syntax::Join { join, .. } if join.kind == JoinKind::Comma => {
                        format!("({comma})")
                    }
                    other => other.to_string(),
                };
                write!(f, "{left} {} {right}{}", join.keywords(), join.constraint())
            }
        }
    }
}

/// Function name for a binary SQL operator
pub(crate) fn binary_operator_function(op: &BinaryOperator) -> Option<&'static str> {
    let name = match op {
        BinaryOperator::Eq => "equals",
        BinaryOperator::NotEq => "notEquals",
        BinaryOperator::Lt => "less",
        BinaryOperator::LtEq => "lessOrEquals",
        BinaryOperator::Gt => "greater",
        BinaryOperator::GtEq => "greaterOrEquals",
        BinaryOperator::And => "and",
        BinaryOperator::Or => "or",
        BinaryOperator::Plus => "plus",
        BinaryOperator::Minus => "minus",
        BinaryOperator::Multiply => "multiply",
        BinaryOperator::Divide => "divide",
        BinaryOperator::Modulo => "modulo",
        BinaryOperator::StringConcat => "concat",
        _ => return None,
    };
    Some(name)
}

fn function_binary_operator(name: &str) -> Option<BinaryOperator> {
    let op = match name {
        "equals" => BinaryOperator::Eq,
        "notEquals" => BinaryOperator::NotEq,
        "less" => BinaryOperator::Lt,
        "lessOrEquals" => BinaryOperator::LtEq,
        "greater" => BinaryOperator::Gt,
        "greaterOrEquals" => BinaryOperator::GtEq,
        "and" => BinaryOperator::And,
        "or" => BinaryOperator::Or,
        "plus" => BinaryOperator::Plus,
        "minus" => BinaryOperator::Minus,
        "multiply" => BinaryOperator::Multiply,
        "divide" => BinaryOperator::Divide,
        "modulo" => BinaryOperator::Modulo,
        "concat" => BinaryOperator::StringConcat,
        _ => return None,
    };
    Some(op)
}

/// Function name for a unary SQL operator
pub(crate) fn unary_operator_function(op: &UnaryOperator) -> Option<&'static str> {
    match op {
        UnaryOperator::Not => Some("not"),
        UnaryOperator::Minus => Some("negate"),
        _ => None,
    }
}

fn function_unary_operator(name: &str) -> Option<UnaryOperator> {
    match name {
        "not" => Some(UnaryOperator::Not),
        "negate" => Some(UnaryOperator::Minus),
        _ => None,
    }
}

/// Wrap binary operations so operator precedence survives rendering
fn operand(expr: Expr) -> Box<Expr> {
    match expr {
        binary @ Expr::BinaryOp { .. } => Box::new(Expr::Nested(Box::new(binary))),
        other => Box::new(other),
    }
}

/// Operand of a unary minus. Another minus directly after it would start a
/// `--` comment.
fn negated_operand(expr: Expr) -> Box<Expr> {
    let starts_with_minus = match &expr {
        Expr::UnaryOp { .. } => true,
        Expr::Value(value) => {
            matches!(&value.value, Value::Number(number, _) if number.starts_with('-'))
        }
        _ => false,
    };
    if starts_with_minus {
        Box::new(Expr::Nested(Box::new(expr)))
    } else {
        operand(expr)
    }
}

/// Render a function application, using operator syntax where one exists
pub(crate) fn function_to_expr(name: &str, mut arguments: Vec<Expr>) -> Expr {
    match arguments.len() {
        2 => {
            if let Some(op) = function_binary_operator(name) {
                let right = arguments.pop().map(operand);
                let left = arguments.pop().map(operand);
                if let (Some(left), Some(right)) = (left, right) {
                    return Expr::BinaryOp { left, op, right };
                }
            }
        }
        1 => {
            let single = |arguments: &mut Vec<Expr>| arguments.pop().map(operand);
            match name {
                "isNull" => {
                    if let Some(expr) = single(&mut arguments) {
                        return Expr::IsNull(expr);
                    }
                }
                "isNotNull" => {
                    if let Some(expr) = single(&mut arguments) {
                        return Expr::IsNotNull(expr);
                    }
                }
                _ => {
                    if let Some(op) = function_unary_operator(name) {
                        if let Some(expr) = arguments.pop() {
                            let expr = if op == UnaryOperator::Minus {
                                negated_operand(expr)
                            } else {
                                operand(expr)
                            };
                            return Expr::UnaryOp { op, expr };
                        }
                    }
                }
            }
        }
        _ => {}
    }

    Expr::Function(Function {
        name: ObjectName::from(vec![Ident::new(name)]),
        uses_odbc_syntax: false,
        parameters: FunctionArguments::None,
        args: FunctionArguments::List(FunctionArgumentList {
            duplicate_treatment: None,
            args: arguments
                .into_iter()
                .map(|arg| FunctionArg::Unnamed(FunctionArgExpr::Expr(arg)))
                .collect(),
            clauses: vec![],
        }),
        filter: None,
        null_treatment: None,
        over: None,
        within_group: vec![],
    })
}
