use crate::error::{Error, Result};
use crate::operation::{Operation, OperationStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

/// Runs an ordered list of operations sequentially, recording per-operation
/// outcome and timing.
///
/// Ordering is the correctness-critical property here: later operations may
/// depend on earlier side effects, so there is no reordering and no
/// parallelism. Failures are caught per operation and never propagate out of
/// the run; the batch always finishes with a [`BatchSummary`].
pub struct BatchExecutor {
    operations: Vec<Operation>,
    executed: Vec<usize>,
    failed: Vec<usize>,
    started: bool,
}

impl BatchExecutor {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            executed: Vec::new(),
            failed: Vec::new(),
            started: false,
        }
    }

    /// Append an operation to the batch. Insertion order is execution order.
    pub fn add_operation(&mut self, operation: Operation) {
        tracing::debug!(operation = %operation.name, "added operation");
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Execute all operations in insertion order.
    ///
    /// With `stop_on_error` the run halts at the first failure, leaving every
    /// later operation untouched; otherwise the full sequence is attempted.
    /// A batch is single-use: a second call returns
    /// [`Error::BatchAlreadyExecuted`] instead of re-running operations.
    pub async fn execute_all(&mut self, stop_on_error: bool) -> Result<BatchSummary> {
        if self.started {
            return Err(Error::BatchAlreadyExecuted);
        }
        self.started = true;

        info!("executing batch of {} operations", self.operations.len());
        let started_at = Utc::now();

        for idx in 0..self.operations.len() {
            let op = &mut self.operations[idx];
            op.started_at = Some(Utc::now());
            info!(operation = %op.name, "executing");

            match op.action.run().await {
                Ok(()) => {
                    op.executed = true;
                    op.success = true;
                    self.executed.push(idx);
                    info!(operation = %op.name, "operation succeeded");
                }
                Err(e) => {
                    op.executed = true;
                    op.success = false;
                    op.error = Some(e.to_string());
                    self.failed.push(idx);
                    error!(operation = %op.name, error = %e, "operation failed");

                    if stop_on_error {
                        warn!("stopping batch execution after failure");
                        break;
                    }
                }
            }
        }

        let finished_at = Utc::now();
        let summary = BatchSummary {
            total: self.operations.len(),
            executed: self.executed.len() + self.failed.len(),
            succeeded: self.executed.len(),
            failed: self.failed.len(),
            duration_seconds: (finished_at - started_at).num_milliseconds() as f64 / 1000.0,
            started_at,
            finished_at,
        };

        info!(
            "batch execution complete: {}/{} succeeded",
            summary.succeeded, summary.executed
        );
        Ok(summary)
    }

    /// Operations that executed successfully, in execution order. This is the
    /// input the rollback coordinator walks in reverse.
    pub fn executed_operations(&self) -> Vec<&Operation> {
        self.executed.iter().map(|&i| &self.operations[i]).collect()
    }

    /// Operations whose execute action failed, in execution order.
    pub fn failed_operations(&self) -> Vec<&Operation> {
        self.failed.iter().map(|&i| &self.operations[i]).collect()
    }

    /// Current status of the batch, including one entry per operation.
    pub fn status(&self) -> BatchStatus {
        let attempted = self.executed.len() + self.failed.len();
        BatchStatus {
            total: self.operations.len(),
            executed: attempted,
            pending: self.operations.len() - attempted,
            succeeded: self.executed.len(),
            failed: self.failed.len(),
            operations: self.operations.iter().map(OperationStatus::from).collect(),
        }
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one batch run. `executed` counts operations actually attempted
/// this run, so a halted batch reports fewer than `total`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub executed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_seconds: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchStatus {
    pub total: usize,
    pub executed: usize,
    pub pending: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub operations: Vec<OperationStatus>,
}
