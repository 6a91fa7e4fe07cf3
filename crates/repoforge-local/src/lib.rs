pub mod creator;
pub mod error;
pub mod events;
pub mod push;
pub mod scaffold;
pub mod templates;
pub mod workspace;

// Re-exports
pub use creator::{CreatedRepo, CreationRequest, RepositoryBatchCreator};
pub use error::{Error, Result};
pub use events::{DeveloperEvent, EventEmitter, EventSummary};
pub use push::{PushResult, PushRunner, PushTask};
pub use workspace::GitWorkspace;
