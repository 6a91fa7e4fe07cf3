use crate::operation::Operation;
use serde::Serialize;
use tracing::{error, info, warn};

/// Re-invokes compensating actions for an executed batch in strict reverse
/// order of execution.
///
/// Semantics are best-effort, not transactional: operations without a
/// rollback action are skipped, and a failing compensation is collected but
/// never aborts the sweep. The sweep is not re-entrant; calling it twice on
/// the same operations re-invokes their compensations.
pub struct RollbackCoordinator;

impl RollbackCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Roll back `executed` (successfully executed operations, in execution
    /// order), visiting them last-to-first.
    pub async fn rollback_all(&self, executed: &[&Operation]) -> RollbackSummary {
        warn!("starting rollback of {} operations", executed.len());
        let mut rolled_back = 0;
        let mut errors = Vec::new();

        for op in executed.iter().rev() {
            let Some(rollback) = op.rollback.as_ref() else {
                warn!(operation = %op.name, "no rollback action, skipping");
                continue;
            };

            info!(operation = %op.name, "rolling back");
            match rollback.run().await {
                Ok(()) => {
                    rolled_back += 1;
                    info!(operation = %op.name, "rolled back");
                }
                Err(e) => {
                    let message = format!("failed to roll back {}: {e}", op.name);
                    error!("{message}");
                    errors.push(message);
                }
            }
        }

        let summary = RollbackSummary {
            rolled_back,
            total_executed: executed.len(),
            errors,
        };
        info!("rollback complete: {} operations rolled back", summary.rolled_back);
        summary
    }
}

impl Default for RollbackCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RollbackSummary {
    pub rolled_back: usize,
    pub total_executed: usize,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::action;
    use crate::executor::BatchExecutor;
    use crate::operation::Operation;
    use std::sync::{Arc, Mutex};

    fn tracked_op(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Operation {
        let exec_log = Arc::clone(log);
        let exec_label = format!("exec-{name}");
        let rb_log = Arc::clone(log);
        let rb_label = format!("rollback-{name}");

        Operation::new(
            name,
            action(move || {
                let log = Arc::clone(&exec_log);
                let label = exec_label.clone();
                async move {
                    log.lock().unwrap().push(label);
                    Ok(())
                }
            }),
        )
        .with_rollback(action(move || {
            let log = Arc::clone(&rb_log);
            let label = rb_label.clone();
            async move {
                log.lock().unwrap().push(label);
                Ok(())
            }
        }))
    }

    #[tokio::test]
    async fn test_rollback_runs_in_reverse_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut batch = BatchExecutor::new();
        batch.add_operation(tracked_op("1", &log));
        batch.add_operation(tracked_op("2", &log));
        batch.add_operation(tracked_op("3", &log));

        batch.execute_all(true).await.unwrap();
        let summary = RollbackCoordinator::new()
            .rollback_all(&batch.executed_operations())
            .await;

        assert_eq!(summary.rolled_back, 3);
        assert_eq!(summary.total_executed, 3);
        assert!(summary.errors.is_empty());
        assert_eq!(
            *log.lock().unwrap(),
            vec!["exec-1", "exec-2", "exec-3", "rollback-3", "rollback-2", "rollback-1"]
        );
    }

    #[tokio::test]
    async fn test_operation_without_rollback_is_skipped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut batch = BatchExecutor::new();
        batch.add_operation(tracked_op("1", &log));
        batch.add_operation(Operation::new("irreversible", action(|| async { Ok(()) })));

        batch.execute_all(true).await.unwrap();
        let summary = RollbackCoordinator::new()
            .rollback_all(&batch.executed_operations())
            .await;

        assert_eq!(summary.total_executed, 2);
        assert_eq!(summary.rolled_back, 1);
        assert!(summary.errors.is_empty());
    }

    #[tokio::test]
    async fn test_failed_rollback_does_not_block_earlier_ones() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut batch = BatchExecutor::new();
        batch.add_operation(tracked_op("a", &log));

        let broken = Operation::new("b", action(|| async { Ok(()) }))
            .with_rollback(action(|| async { Err(anyhow::anyhow!("rollback broke")) }));
        batch.add_operation(broken);

        batch.execute_all(true).await.unwrap();
        let summary = RollbackCoordinator::new()
            .rollback_all(&batch.executed_operations())
            .await;

        // b's compensation fails first; a's still runs and is counted.
        assert_eq!(summary.rolled_back, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("b"));
        assert!(summary.errors[0].contains("rollback broke"));
        assert!(log.lock().unwrap().contains(&"rollback-a".to_string()));
    }

    #[tokio::test]
    async fn test_only_successful_operations_are_considered() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut batch = BatchExecutor::new();
        batch.add_operation(tracked_op("ok", &log));

        let ran = Arc::new(Mutex::new(false));
        let ran_inner = Arc::clone(&ran);
        let failing = Operation::new("bad", action(|| async { Err(anyhow::anyhow!("nope")) }))
            .with_rollback(action(move || {
                let ran = Arc::clone(&ran_inner);
                async move {
                    *ran.lock().unwrap() = true;
                    Ok(())
                }
            }));
        batch.add_operation(failing);

        batch.execute_all(false).await.unwrap();
        let summary = RollbackCoordinator::new()
            .rollback_all(&batch.executed_operations())
            .await;

        // The failed operation never made it into the executed list, so its
        // compensation is never invoked.
        assert_eq!(summary.total_executed, 1);
        assert_eq!(summary.rolled_back, 1);
        assert!(!*ran.lock().unwrap());
    }
}
