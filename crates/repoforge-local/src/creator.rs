use repoforge_core::{
    action, BatchExecutor, BatchStatus, BatchSummary, Operation, RollbackCoordinator,
    RollbackSummary,
};
use repoforge_github::RepoService;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// A repository to create remotely, with an optional local working directory.
#[derive(Debug, Clone)]
pub struct CreationRequest {
    pub name: String,
    pub owner: String,
    pub description: String,
    pub private: bool,
    pub local_path: Option<PathBuf>,
}

impl CreationRequest {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            description: String::new(),
            private: true,
            local_path: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_local_path(mut self, path: PathBuf) -> Self {
        self.local_path = Some(path);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRepo {
    pub owner: String,
    pub name: String,
}

/// Batch-creates repositories with rollback support.
///
/// Each added creation becomes one operation: create the remote repository,
/// then the local directory. Its compensation removes the local directory
/// only; remote repositories are never deleted, a known limitation that is
/// logged on every rollback.
pub struct RepositoryBatchCreator {
    client: Arc<dyn RepoService>,
    executor: BatchExecutor,
    coordinator: RollbackCoordinator,
    created_repos: Arc<Mutex<Vec<CreatedRepo>>>,
    created_dirs: Arc<Mutex<Vec<PathBuf>>>,
}

impl RepositoryBatchCreator {
    pub fn new(client: Arc<dyn RepoService>) -> Self {
        Self {
            client,
            executor: BatchExecutor::new(),
            coordinator: RollbackCoordinator::new(),
            created_repos: Arc::new(Mutex::new(Vec::new())),
            created_dirs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue one repository creation.
    pub fn add_repository_creation(&mut self, request: CreationRequest) {
        let operation_name = format!("create repository {}/{}", request.owner, request.name);

        let execute = {
            let client = Arc::clone(&self.client);
            let created_repos = Arc::clone(&self.created_repos);
            let created_dirs = Arc::clone(&self.created_dirs);
            let request = request.clone();
            action(move || {
                let client = Arc::clone(&client);
                let created_repos = Arc::clone(&created_repos);
                let created_dirs = Arc::clone(&created_dirs);
                let request = request.clone();
                async move {
                    client
                        .create_repo(
                            &request.owner,
                            &request.name,
                            &request.description,
                            request.private,
                        )
                        .await?;
                    created_repos.lock().await.push(CreatedRepo {
                        owner: request.owner.clone(),
                        name: request.name.clone(),
                    });

                    if let Some(path) = &request.local_path {
                        tokio::fs::create_dir_all(path).await?;
                        created_dirs.lock().await.push(path.clone());
                    }
                    Ok(())
                }
            })
        };

        let rollback = {
            let full_name = format!("{}/{}", request.owner, request.name);
            let local_path = request.local_path.clone();
            action(move || {
                let full_name = full_name.clone();
                let local_path = local_path.clone();
                async move {
                    // Remote deletion is out of scope: compensation is
                    // local-only.
                    warn!("rollback leaves remote repository {} in place", full_name);
                    if let Some(path) = local_path {
                        if path.exists() {
                            tokio::fs::remove_dir_all(&path).await?;
                            info!("removed local directory: {:?}", path);
                        }
                    }
                    Ok(())
                }
            })
        };

        let mut operation = Operation::new(operation_name, execute)
            .with_rollback(rollback)
            .with_metadata("owner", request.owner.as_str())
            .with_metadata("repo_name", request.name.as_str());
        if let Some(path) = &request.local_path {
            operation = operation.with_metadata("local_path", path.to_string_lossy());
        }

        self.executor.add_operation(operation);
    }

    pub fn len(&self) -> usize {
        self.executor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executor.is_empty()
    }

    /// Execute all queued creations.
    pub async fn execute(&mut self, stop_on_error: bool) -> repoforge_core::Result<BatchSummary> {
        self.executor.execute_all(stop_on_error).await
    }

    /// Roll back everything that executed successfully, in reverse order.
    pub async fn rollback(&self) -> RollbackSummary {
        self.coordinator
            .rollback_all(&self.executor.executed_operations())
            .await
    }

    pub fn status(&self) -> BatchStatus {
        self.executor.status()
    }

    /// Remote repositories actually created by this batch.
    pub async fn created_repositories(&self) -> Vec<CreatedRepo> {
        self.created_repos.lock().await.clone()
    }

    /// Local directories actually created by this batch.
    pub async fn created_directories(&self) -> Vec<PathBuf> {
        self.created_dirs.lock().await.clone()
    }
}
