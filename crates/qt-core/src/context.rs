//! Execution context: the ambient state a query is compiled and run with

use crate::error::{CoreError, CoreResult};
use crate::settings::Settings;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Incremental progress reported by the execution stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Rows read since the last report
    pub read_rows: u64,
    /// Bytes read since the last report
    pub read_bytes: u64,
    /// Estimated rows still to read, when known
    pub total_rows_to_read: u64,
}

/// Callback invoked with every progress increment
pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Process list entry of a running query: cooperative cancellation flag and
/// accumulated progress.
#[derive(Debug, Default)]
pub struct QueryStatus {
    query_id: String,
    cancelled: AtomicBool,
    read_rows: AtomicU64,
    read_bytes: AtomicU64,
    total_rows_to_read: AtomicU64,
}

impl QueryStatus {
    /// Register a new running query
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            ..Self::default()
        }
    }

    /// Query id this entry belongs to
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    /// Request cancellation; the execution stage observes it cooperatively
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            log::debug!("Cancellation requested for query '{}'", self.query_id);
        }
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fail with `QueryCancelled` once cancellation was requested
    pub fn check_cancelled(&self) -> CoreResult<()> {
        if self.is_cancelled() {
            return Err(CoreError::QueryCancelled {
                query_id: self.query_id.clone(),
            });
        }
        Ok(())
    }

    /// Accumulate a progress increment
    pub fn update_progress(&self, progress: &Progress) {
        self.read_rows
            .fetch_add(progress.read_rows, Ordering::Relaxed);
        self.read_bytes
            .fetch_add(progress.read_bytes, Ordering::Relaxed);
        self.total_rows_to_read
            .fetch_add(progress.total_rows_to_read, Ordering::Relaxed);
    }

    /// Progress accumulated so far
    pub fn progress(&self) -> Progress {
        Progress {
            read_rows: self.read_rows.load(Ordering::Relaxed),
            read_bytes: self.read_bytes.load(Ordering::Relaxed),
            total_rows_to_read: self.total_rows_to_read.load(Ordering::Relaxed),
        }
    }
}

/// Ambient context of one query: settings plus optional cancellation handle
/// and progress callback. Callers own its lifecycle.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    settings: Settings,
    process_list_element: Option<Arc<QueryStatus>>,
    progress_callback: Option<ProgressCallback>,
}

impl ExecutionContext {
    /// Create a context with the given settings and no handles
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            process_list_element: None,
            progress_callback: None,
        }
    }

    /// Attach the process list entry of the running query
    pub fn with_process_list_element(mut self, status: Arc<QueryStatus>) -> Self {
        self.process_list_element = Some(status);
        self
    }

    /// Attach a progress callback
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Settings table
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings table (`SET name = value`)
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Process list entry, if the query is registered
    pub fn process_list_element(&self) -> Option<Arc<QueryStatus>> {
        self.process_list_element.clone()
    }

    /// Progress callback, if any
    pub fn progress_callback(&self) -> Option<ProgressCallback> {
        self.progress_callback.clone()
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("settings", &self.settings)
            .field("process_list_element", &self.process_list_element)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}
