//! Result types for bulk operations.

use serde::{Deserialize, Serialize};

use crate::types::id::EntityId;

/// One failed item in a bulk operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFailure {
    /// The identifier the operation was attempted on.
    pub id: EntityId,
    /// What went wrong, phrased for display.
    pub message: String,
}

/// Outcome of a bulk operation over a list of identifiers.
///
/// The three counters always sum to the input length; `errors` holds one
/// entry per failed item, in attempt order. Items the executor never
/// reached (after an early stop) are counted in `not_attempted` and do
/// not appear in `errors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkReport {
    /// Number of items that completed successfully.
    pub success_count: usize,
    /// Number of items whose operation returned an error.
    pub failed_count: usize,
    /// Number of items skipped after an early stop.
    pub not_attempted: usize,
    /// Per-item failure details, in attempt order.
    pub errors: Vec<BulkFailure>,
}

impl BulkReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful item.
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    /// Record one failed item.
    pub fn record_failure(&mut self, id: EntityId, message: impl Into<String>) {
        self.failed_count += 1;
        self.errors.push(BulkFailure {
            id,
            message: message.into(),
        });
    }

    /// Total number of items the report accounts for.
    pub fn total(&self) -> usize {
        self.success_count + self.failed_count + self.not_attempted
    }

    /// True when every attempted item succeeded and nothing was skipped.
    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0 && self.not_attempted == 0
    }

    /// True when at least one item failed or was skipped.
    pub fn has_failures(&self) -> bool {
        !self.is_complete_success()
    }

    /// Short display line, e.g. `"3 succeeded, 2 failed"`.
    pub fn summary(&self) -> String {
        if self.not_attempted > 0 {
            format!(
                "{} succeeded, {} failed, {} not attempted",
                self.success_count, self.failed_count, self.not_attempted
            )
        } else {
            format!(
                "{} succeeded, {} failed",
                self.success_count, self.failed_count
            )
        }
    }
}
