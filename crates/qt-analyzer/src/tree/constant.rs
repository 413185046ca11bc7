//! Literal constants

use super::dump::FormatState;
use super::node::QueryTreeNode;
use super::syntax::Syntax;
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use sqlparser::ast::{Expr, Value};
use std::hash::{Hash, Hasher};

/// Literal value of a constant node
///
/// Floats compare and hash by bit pattern, so `NaN` equals itself and
/// `0.0` differs from `-0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl ConstantValue {
    /// Type name shown in tree dumps
    pub fn type_name(&self) -> &'static str {
        match self {
            ConstantValue::Null => "Nullable(Nothing)",
            ConstantValue::Bool(_) => "Bool",
            ConstantValue::Int(_) => "Int64",
            ConstantValue::UInt(_) => "UInt64",
            ConstantValue::Float(_) => "Float64",
            ConstantValue::String(_) => "String",
        }
    }

    fn to_ast_value(&self) -> Value {
        match self {
            ConstantValue::Null => Value::Null,
            ConstantValue::Bool(b) => Value::Boolean(*b),
            ConstantValue::Int(i) => Value::Number(i.to_string(), false),
            ConstantValue::UInt(u) => Value::Number(u.to_string(), false),
            // `{:?}` keeps the fractional part (`1.0`), so the literal reparses as a float
            ConstantValue::Float(f) => Value::Number(format!("{f:?}"), false),
            ConstantValue::String(s) => Value::SingleQuotedString(s.clone()),
        }
    }
}

impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstantValue::Null, ConstantValue::Null) => true,
            (ConstantValue::Bool(l), ConstantValue::Bool(r)) => l == r,
            (ConstantValue::Int(l), ConstantValue::Int(r)) => l == r,
            (ConstantValue::UInt(l), ConstantValue::UInt(r)) => l == r,
            (ConstantValue::Float(l), ConstantValue::Float(r)) => l.to_bits() == r.to_bits(),
            (ConstantValue::String(l), ConstantValue::String(r)) => l == r,
            _ => false,
        }
    }
}

impl Eq for ConstantValue {}

impl Hash for ConstantValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ConstantValue::Null => {}
            ConstantValue::Bool(b) => b.hash(state),
            ConstantValue::Int(i) => i.hash(state),
            ConstantValue::UInt(u) => u.hash(state),
            ConstantValue::Float(f) => f.to_bits().hash(state),
            ConstantValue::String(s) => s.hash(state),
        }
    }
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstantValue::Null => write!(f, "NULL"),
            ConstantValue::Bool(b) => write!(f, "{b}"),
            ConstantValue::Int(i) => write!(f, "{i}"),
            ConstantValue::UInt(u) => write!(f, "{u}"),
            ConstantValue::Float(v) => write!(f, "{v:?}"),
            ConstantValue::String(s) => write!(f, "'{s}'"),
        }
    }
}

/// Literal constant
#[derive(Debug, Clone)]
pub struct ConstantNode {
    value: ConstantValue,
}

impl ConstantNode {
    pub fn new(value: ConstantValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &ConstantValue {
        &self.value
    }

    pub(crate) fn scalars_equal(&self, other: &Self) -> bool {
        self.value == other.value
    }

    pub(crate) fn hash_scalars<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }

    pub(crate) fn children(&self) -> Vec<Option<&QueryTreeNode>> {
        Vec::new()
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut QueryTreeNode> {
        Vec::new()
    }

    pub(crate) fn dump_tree_impl(&self, out: &mut String, _state: &mut FormatState, _indent: usize) {
        out.push_str(&format!(
            ", constant_value: {}, constant_value_type: {}",
            self.value,
            self.value.type_name()
        ));
    }

    /// Infinite and NaN floats have no SQL literal form
    pub fn to_syntax(&self) -> AnalysisResult<Syntax> {
        if let ConstantValue::Float(f) = self.value {
            if !f.is_finite() {
                return Err(AnalysisError::unsupported(format!("float constant {f}")));
            }
        }
        Ok(Syntax::Expr(Expr::value(self.value.to_ast_value())))
    }
}

impl From<ConstantValue> for ConstantNode {
    fn from(value: ConstantValue) -> Self {
        Self::new(value)
    }
}
