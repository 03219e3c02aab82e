//! Bulk operation executor with partial-failure reporting.

use std::future::Future;

use tracing::{info, warn};

use classhub_core::types::bulk::BulkReport;
use classhub_core::types::id::EntityId;

/// Progress callback, called with a fraction in `(0, 1]` after each
/// attempted item.
pub type ProgressFn = Box<dyn Fn(f64) + Send + Sync>;

/// Options for [`execute_bulk`].
pub struct BulkOptions {
    /// Keep going after a per-item failure. When `false`, the executor
    /// stops at the first failure and counts the remainder as
    /// not attempted.
    pub continue_on_error: bool,
    /// Optional progress reporting for long batches.
    pub progress: Option<ProgressFn>,
}

impl BulkOptions {
    /// Stop the batch at the first per-item failure.
    pub fn stop_on_first_failure() -> Self {
        Self {
            continue_on_error: false,
            progress: None,
        }
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, progress: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            progress: None,
        }
    }
}

impl std::fmt::Debug for BulkOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkOptions")
            .field("continue_on_error", &self.continue_on_error)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Run an async operation over a list of ids, one at a time, in input
/// order.
///
/// Sequential execution is deliberate: it keeps backend load bounded,
/// and the n-th error always belongs to the n-th attempted id rather
/// than to whichever future lost a race. The executor itself never
/// fails; every per-item error is captured in the report, and the
/// report's counters always sum to `ids.len()`.
pub async fn execute_bulk<F, Fut>(ids: &[EntityId], operation: F, options: BulkOptions) -> BulkReport
where
    F: Fn(EntityId) -> Fut,
    Fut: Future<Output = classhub_core::AppResult<()>>,
{
    let mut report = BulkReport::new();
    let total = ids.len();

    for (index, id) in ids.iter().enumerate() {
        let failed = match operation(*id).await {
            Ok(()) => {
                report.record_success();
                false
            }
            Err(err) => {
                warn!(id = %id, error = %err, "Bulk item failed");
                report.record_failure(*id, err.to_string());
                true
            }
        };

        if let Some(progress) = &options.progress {
            progress((index + 1) as f64 / total as f64);
        }

        if failed && !options.continue_on_error {
            report.not_attempted = total - index - 1;
            break;
        }
    }

    info!(
        total,
        succeeded = report.success_count,
        failed = report.failed_count,
        not_attempted = report.not_attempted,
        "Bulk operation completed"
    );

    report
}
