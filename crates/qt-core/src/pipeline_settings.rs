//! Pipeline settings bridge
//!
//! Projects the ambient [`ExecutionContext`] into the immutable
//! [`BuildPipelineSettings`] snapshot handed, together with a resolved query
//! tree, to the pipeline compiler. A fresh snapshot is derived for every
//! compilation; nothing here is cached.

use crate::context::{ExecutionContext, Progress, ProgressCallback, QueryStatus};
use crate::error::CoreResult;
use crate::settings::{Settings, ShortCircuitFunctionEvaluation};
use std::sync::Arc;

/// Whether the caller allows JIT compilation of expressions at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileExpressions {
    /// Compilation is allowed if the settings ask for it
    Yes,
    /// Never compile, regardless of settings
    No,
}

/// Expression evaluation settings derived from the settings table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionActionsSettings {
    /// Expressions may be JIT-compiled
    pub can_compile_expressions: bool,
    /// Identical expressions needed before compiling
    pub min_count_to_compile_expression: u64,
    /// Limit on temporary columns (0 = unlimited)
    pub max_temporary_columns: u64,
    /// Limit on non-constant temporary columns (0 = unlimited)
    pub max_temporary_non_const_columns: u64,
    /// Short-circuit evaluation policy
    pub short_circuit_function_evaluation: ShortCircuitFunctionEvaluation,
}

impl ExpressionActionsSettings {
    /// Derive expression settings from the settings table
    pub fn from_settings(settings: &Settings, compile_expressions: CompileExpressions) -> Self {
        Self {
            can_compile_expressions: settings.compile_expressions
                && compile_expressions == CompileExpressions::Yes,
            min_count_to_compile_expression: settings.min_count_to_compile_expression,
            max_temporary_columns: settings.max_temporary_columns,
            max_temporary_non_const_columns: settings.max_temporary_non_const_columns,
            short_circuit_function_evaluation: settings.short_circuit_function_evaluation,
        }
    }
}

/// Immutable settings snapshot consumed once by the pipeline compiler
#[derive(Clone)]
pub struct BuildPipelineSettings {
    /// Expression evaluation settings
    pub actions_settings: ExpressionActionsSettings,
    /// Cancellation/progress handle of the running query
    pub process_list_element: Option<Arc<QueryStatus>>,
    /// Progress callback of the caller
    pub progress_callback: Option<ProgressCallback>,
    /// Split AND-chain filters into one step per conjunct
    pub enable_multiple_filters_transforms_for_and_chain: bool,
}

impl BuildPipelineSettings {
    /// Take a snapshot of the context.
    ///
    /// Filter merging is enabled by default, but a merged filter no longer
    /// short-circuits unless its AND-chain is split back into ordered steps,
    /// so the split follows `query_plan_merge_filters` unless set explicitly.
    /// An explicit setting that would break short-circuiting is rejected, as
    /// are limits changed through `SET` that loading would have refused.
    pub fn from_context(context: &ExecutionContext) -> CoreResult<Self> {
        let settings = context.settings();
        settings.validate()?;

        if let Some(split) = settings.query_plan_split_filter_and_chain {
            if split != settings.query_plan_merge_filters {
                log::warn!(
                    "query_plan_split_filter_and_chain={} differs from query_plan_merge_filters={}",
                    split,
                    settings.query_plan_merge_filters
                );
            }
        }

        let snapshot = Self {
            actions_settings: ExpressionActionsSettings::from_settings(
                settings,
                CompileExpressions::Yes,
            ),
            process_list_element: context.process_list_element(),
            progress_callback: context.progress_callback(),
            enable_multiple_filters_transforms_for_and_chain: settings.split_filter_and_chain(),
        };
        log::debug!("Derived pipeline settings: {:?}", snapshot);
        Ok(snapshot)
    }

    /// Forward a progress increment to the process list entry and the callback
    pub fn report_progress(&self, progress: &Progress) {
        if let Some(status) = &self.process_list_element {
            status.update_progress(progress);
        }
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}

impl std::fmt::Debug for BuildPipelineSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildPipelineSettings")
            .field("actions_settings", &self.actions_settings)
            .field(
                "process_list_element",
                &self.process_list_element.as_ref().map(|s| s.query_id()),
            )
            .field("progress_callback", &self.progress_callback.is_some())
            .field(
                "enable_multiple_filters_transforms_for_and_chain",
                &self.enable_multiple_filters_transforms_for_and_chain,
            )
            .finish()
    }
}

#[cfg(test)]
#[path = "pipeline_settings_test.rs"]
mod tests;
