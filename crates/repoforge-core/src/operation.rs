use crate::action::Action;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// A named unit of work with an execute action and an optional compensating
/// rollback action.
///
/// The action fields are immutable after construction. The outcome fields
/// (`executed`, `success`, `error`, `started_at`) are written exactly once by
/// the executor during a batch run; an operation is never reused across runs.
pub struct Operation {
    pub id: String,
    pub name: String,
    pub(crate) action: Box<dyn Action>,
    pub(crate) rollback: Option<Box<dyn Action>>,
    pub metadata: HashMap<String, String>,
    pub executed: bool,
    pub success: bool,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl Operation {
    pub fn new(name: impl Into<String>, action: impl Action + 'static) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            action: Box::new(action),
            rollback: None,
            metadata: HashMap::new(),
            executed: false,
            success: false,
            error: None,
            started_at: None,
        }
    }

    pub fn with_rollback(mut self, rollback: impl Action + 'static) -> Self {
        self.rollback = Some(Box::new(rollback));
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether a compensating action was provided at construction time.
    pub fn is_reversible(&self) -> bool {
        self.rollback.is_some()
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("reversible", &self.rollback.is_some())
            .field("executed", &self.executed)
            .field("success", &self.success)
            .field("error", &self.error)
            .finish()
    }
}

/// Snapshot of one operation's outcome, surfaced in status reports.
#[derive(Debug, Clone, Serialize)]
pub struct OperationStatus {
    pub name: String,
    pub executed: bool,
    pub success: bool,
    pub error: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl From<&Operation> for OperationStatus {
    fn from(op: &Operation) -> Self {
        Self {
            name: op.name.clone(),
            executed: op.executed,
            success: op.success,
            error: op.error.clone(),
            metadata: op.metadata.clone(),
        }
    }
}
