//! Query settings table
//!
//! The settings table is the ambient, mutable configuration a query runs
//! with. It can be loaded from YAML and changed at runtime through
//! `SET name = value`. Consumers never read it directly during compilation;
//! they take an immutable snapshot through
//! [`BuildPipelineSettings::from_context`](crate::BuildPipelineSettings::from_context).

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How functions with lazily evaluated arguments (`and`, `or`, `if`, ...) run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortCircuitFunctionEvaluation {
    /// Short-circuit functions that are worth it
    #[default]
    Enable,
    /// Short-circuit every function that supports it
    ForceEnable,
    /// Always evaluate every argument
    Disable,
}

impl std::str::FromStr for ShortCircuitFunctionEvaluation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enable" => Ok(Self::Enable),
            "force_enable" => Ok(Self::ForceEnable),
            "disable" => Ok(Self::Disable),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ShortCircuitFunctionEvaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enable => write!(f, "enable"),
            Self::ForceEnable => write!(f, "force_enable"),
            Self::Disable => write!(f, "disable"),
        }
    }
}

/// Settings that affect how a resolved query tree is compiled into a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// JIT-compile frequently used expression chains
    #[serde(default = "default_true")]
    pub compile_expressions: bool,

    /// How many identical expressions are needed before compiling them
    #[serde(default = "default_min_count_to_compile_expression")]
    pub min_count_to_compile_expression: u64,

    /// Limit on temporary columns kept while evaluating an expression (0 = unlimited)
    #[serde(default)]
    pub max_temporary_columns: u64,

    /// Limit on non-constant temporary columns (0 = unlimited)
    #[serde(default)]
    pub max_temporary_non_const_columns: u64,

    /// Short-circuit evaluation policy
    #[serde(default)]
    pub short_circuit_function_evaluation: ShortCircuitFunctionEvaluation,

    /// Merge adjacent filter steps into a single step
    #[serde(default = "default_true")]
    pub query_plan_merge_filters: bool,

    /// Split an AND-chain filter into one step per conjunct.
    ///
    /// Unset means "follow `query_plan_merge_filters`"; merging filters without
    /// splitting the resulting AND-chain evaluates guarded conjuncts eagerly.
    #[serde(default)]
    pub query_plan_split_filter_and_chain: Option<bool>,
}

fn default_min_count_to_compile_expression() -> u64 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compile_expressions: true,
            min_count_to_compile_expression: default_min_count_to_compile_expression(),
            max_temporary_columns: 0,
            max_temporary_non_const_columns: 0,
            short_circuit_function_evaluation: ShortCircuitFunctionEvaluation::default(),
            query_plan_merge_filters: true,
            query_plan_split_filter_and_chain: None,
        }
    }
}

/// Names accepted by [`Settings::set`] and [`Settings::get`]
pub const SETTING_NAMES: &[&str] = &[
    "compile_expressions",
    "min_count_to_compile_expression",
    "max_temporary_columns",
    "max_temporary_non_const_columns",
    "short_circuit_function_evaluation",
    "query_plan_merge_filters",
    "query_plan_split_filter_and_chain",
];

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate settings from a YAML document
    pub fn from_yaml_str(content: &str) -> CoreResult<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate value ranges and setting combinations
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_temporary_columns != 0
            && self.max_temporary_non_const_columns > self.max_temporary_columns
        {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "max_temporary_non_const_columns ({}) exceeds max_temporary_columns ({})",
                    self.max_temporary_non_const_columns, self.max_temporary_columns
                ),
            });
        }

        self.check_consistency()
    }

    /// Reject filter merging that is decoupled from AND-chain splitting.
    ///
    /// A merged filter step evaluates its whole AND-chain at once. Unless the
    /// chain is split back into ordered steps (or short-circuit evaluation is
    /// off anyway), a conjunct such as `intDiv(1, x) > 0` stops being guarded
    /// by a preceding `x != 0`.
    pub fn check_consistency(&self) -> CoreResult<()> {
        if self.query_plan_merge_filters
            && self.query_plan_split_filter_and_chain == Some(false)
            && self.short_circuit_function_evaluation != ShortCircuitFunctionEvaluation::Disable
        {
            return Err(CoreError::InconsistentSettings {
                message: "query_plan_merge_filters is enabled but \
                          query_plan_split_filter_and_chain is disabled; \
                          merged filters would no longer short-circuit guarded conditions"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Whether AND-chains are split into one filter step per conjunct
    pub fn split_filter_and_chain(&self) -> bool {
        self.query_plan_split_filter_and_chain
            .unwrap_or(self.query_plan_merge_filters)
    }

    /// Apply `SET name = value`
    pub fn set(&mut self, name: &str, value: &str) -> CoreResult<()> {
        let value = value.trim();
        match name {
            "compile_expressions" => self.compile_expressions = parse_bool(name, value)?,
            "min_count_to_compile_expression" => {
                self.min_count_to_compile_expression = parse_u64(name, value)?
            }
            "max_temporary_columns" => self.max_temporary_columns = parse_u64(name, value)?,
            "max_temporary_non_const_columns" => {
                self.max_temporary_non_const_columns = parse_u64(name, value)?
            }
            "short_circuit_function_evaluation" => {
                self.short_circuit_function_evaluation =
                    value.parse().map_err(|_| CoreError::InvalidSettingValue {
                        name: name.to_string(),
                        value: value.to_string(),
                        expected: "one of enable, force_enable, disable",
                    })?
            }
            "query_plan_merge_filters" => self.query_plan_merge_filters = parse_bool(name, value)?,
            "query_plan_split_filter_and_chain" => {
                self.query_plan_split_filter_and_chain = if value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    Some(parse_bool(name, value)?)
                }
            }
            _ => {
                return Err(CoreError::UnknownSetting {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Current value of a setting rendered as text
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match name {
            "compile_expressions" => self.compile_expressions.to_string(),
            "min_count_to_compile_expression" => self.min_count_to_compile_expression.to_string(),
            "max_temporary_columns" => self.max_temporary_columns.to_string(),
            "max_temporary_non_const_columns" => self.max_temporary_non_const_columns.to_string(),
            "short_circuit_function_evaluation" => {
                self.short_circuit_function_evaluation.to_string()
            }
            "query_plan_merge_filters" => self.query_plan_merge_filters.to_string(),
            "query_plan_split_filter_and_chain" => match self.query_plan_split_filter_and_chain {
                Some(v) => v.to_string(),
                None => "default".to_string(),
            },
            _ => return None,
        };
        Some(value)
    }
}

fn parse_bool(name: &str, value: &str) -> CoreResult<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(CoreError::InvalidSettingValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: "a boolean (0, 1, true, false)",
        }),
    }
}

fn parse_u64(name: &str, value: &str) -> CoreResult<u64> {
    value.parse().map_err(|_| CoreError::InvalidSettingValue {
        name: name.to_string(),
        value: value.to_string(),
        expected: "an unsigned integer",
    })
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
