//! Batched message moves.

use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::{debug, error};

use crate::host::{FolderRef, MailHost, MessageId};

/// A move batch the host rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Zero-based index of the batch.
    pub index: usize,
    /// Number of messages in the batch.
    pub size: usize,
    /// Host error message.
    pub error: String,
}

/// Result of relocating one group of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelocationOutcome {
    /// Messages moved successfully.
    pub moved: usize,
    /// Batches that failed; their messages stayed where they were.
    pub failures: Vec<BatchFailure>,
}

impl RelocationOutcome {
    /// Whether every batch succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Split ids into consecutive batches of at most `batch_size`, in order.
pub fn batches(ids: &[MessageId], batch_size: NonZeroUsize) -> std::slice::Chunks<'_, MessageId> {
    ids.chunks(batch_size.get())
}

/// Move `ids` into `target`, one host call per batch.
///
/// A failed batch is logged and recorded; later batches are still sent.
/// Nothing is rolled back.
pub async fn relocate<H: MailHost>(
    host: &H,
    ids: &[MessageId],
    target: &FolderRef,
    batch_size: NonZeroUsize,
) -> RelocationOutcome {
    let mut outcome = RelocationOutcome::default();

    for (index, batch) in batches(ids, batch_size).enumerate() {
        match host.move_messages(batch, &target.id).await {
            Ok(()) => {
                debug!(folder = %target.path, batch = index, size = batch.len(), "Moved batch");
                outcome.moved += batch.len();
            }
            Err(e) => {
                error!(
                    folder = %target.path,
                    batch = index,
                    size = batch.len(),
                    error = %e,
                    "Failed to move batch"
                );
                outcome.failures.push(BatchFailure {
                    index,
                    size: batch.len(),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}
