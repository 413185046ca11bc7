//! qt-core - ambient execution context for the query tree
//!
//! This crate owns the mutable settings table a query runs with, the
//! cancellation/progress handle of a running query, and the bridge that
//! projects both into the immutable snapshot consumed by the pipeline
//! compiler.

pub mod context;
pub mod error;
pub mod pipeline_settings;
pub(crate) mod serde_helpers;
pub mod settings;

pub use context::{ExecutionContext, Progress, ProgressCallback, QueryStatus};
pub use error::{CoreError, CoreResult};
pub use pipeline_settings::{BuildPipelineSettings, CompileExpressions, ExpressionActionsSettings};
pub use settings::{Settings, ShortCircuitFunctionEvaluation};
