pub mod action;
pub mod analytics;
pub mod error;
pub mod executor;
pub mod health;
pub mod operation;
pub mod rollback;
pub mod suggest;

// Re-exports
pub use action::{action, Action, FnAction};
pub use analytics::{AnalyticsSummary, RepoAnalytics, ReportFormat};
pub use error::{Error, Result};
pub use executor::{BatchExecutor, BatchStatus, BatchSummary};
pub use health::{HealthRating, HealthReport};
pub use operation::{Operation, OperationStatus};
pub use rollback::{RollbackCoordinator, RollbackSummary};
