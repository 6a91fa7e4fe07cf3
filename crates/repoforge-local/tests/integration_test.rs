use async_trait::async_trait;
use repoforge_core::{action, BatchExecutor, Operation, RollbackCoordinator};
use repoforge_github::{RemoteRepo, RepoService};
use repoforge_local::{
    scaffold, CreationRequest, GitWorkspace, PushRunner, PushTask, RepositoryBatchCreator,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory hosting API: records creations, optionally failing one name.
struct FakeHosting {
    fail_on: Option<String>,
    created: Mutex<Vec<String>>,
}

impl FakeHosting {
    fn new() -> Self {
        Self {
            fail_on: None,
            created: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            created: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RepoService for FakeHosting {
    async fn repo_exists(&self, _owner: &str, _name: &str) -> repoforge_github::Result<bool> {
        Ok(false)
    }

    async fn create_repo(
        &self,
        owner: &str,
        name: &str,
        _description: &str,
        private: bool,
    ) -> repoforge_github::Result<RemoteRepo> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(repoforge_github::Error::Conflict(format!(
                "name already exists on this account: {name}"
            )));
        }
        self.created.lock().unwrap().push(format!("{owner}/{name}"));
        Ok(RemoteRepo {
            id: 1,
            name: name.to_string(),
            full_name: format!("{owner}/{name}"),
            private,
            description: None,
            html_url: None,
            clone_url: None,
            ssh_url: None,
            default_branch: None,
        })
    }

    async fn get_repo(&self, owner: &str, name: &str) -> repoforge_github::Result<RemoteRepo> {
        self.create_repo(owner, name, "", true).await
    }
}

/// A committed working copy plus a bare repository acting as its remote.
fn working_copy_with_remote(root: &Path, name: &str) -> PushTask {
    let local = root.join(name);
    let remote = root.join(format!("{name}.git"));
    git2::Repository::init_bare(&remote).unwrap();

    let ws = GitWorkspace::new("test-token".to_string());
    let repo = ws.init_repository(&local, "main").unwrap();
    scaffold::ensure_minimal_files(&local, name, "integration fixture").unwrap();
    ws.stage_all(&repo).unwrap();
    ws.commit_staged(&repo, "initial").unwrap();

    PushTask::new(name, local, remote.to_string_lossy().to_string()).with_commit_message("sync")
}

#[tokio::test]
async fn test_batch_execute_then_rollback_in_reverse() {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut batch = BatchExecutor::new();
    for name in ["a", "b", "c"] {
        let exec_log = Arc::clone(&log);
        let exec_label = format!("exec-{name}");
        let rb_log = Arc::clone(&log);
        let rb_label = format!("rollback-{name}");

        batch.add_operation(
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
            })),
        );
    }

    let summary = batch.execute_all(true).await.unwrap();
    assert_eq!(summary.succeeded, 3);

    let rollback = RollbackCoordinator::new()
        .rollback_all(&batch.executed_operations())
        .await;
    assert_eq!(rollback.rolled_back, 3);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["exec-a", "exec-b", "exec-c", "rollback-c", "rollback-b", "rollback-a"]
    );
}

#[tokio::test]
async fn test_creation_batch_failure_rolls_back_local_directories() {
    let root = TempDir::new().unwrap();
    let first = root.path().join("first");
    let second = root.path().join("second");

    let mut creator = RepositoryBatchCreator::new(Arc::new(FakeHosting::failing_on("doomed")));
    creator.add_repository_creation(
        CreationRequest::new("first", "acme").with_local_path(first.clone()),
    );
    creator.add_repository_creation(
        CreationRequest::new("second", "acme").with_local_path(second.clone()),
    );
    creator.add_repository_creation(CreationRequest::new("doomed", "acme"));

    let summary = creator.execute(true).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.executed, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(first.is_dir());
    assert!(second.is_dir());

    let rollback = creator.rollback().await;
    assert_eq!(rollback.rolled_back, 2);
    assert!(rollback.errors.is_empty());
    assert!(!first.exists());
    assert!(!second.exists());

    // The remote side is untouched by rollback.
    assert_eq!(creator.created_repositories().await.len(), 2);
}

#[tokio::test]
async fn test_create_scaffold_and_push_flow() {
    let root = TempDir::new().unwrap();
    let local = root.path().join("widget");
    let remote = root.path().join("widget.git");
    git2::Repository::init_bare(&remote).unwrap();

    // Create the remote record and local directory through the batch creator.
    let hosting = Arc::new(FakeHosting::new());
    let mut creator = RepositoryBatchCreator::new(Arc::clone(&hosting) as Arc<dyn RepoService>);
    creator.add_repository_creation(
        CreationRequest::new("widget", "acme")
            .with_description("a widget")
            .with_local_path(local.clone()),
    );
    let summary = creator.execute(true).await.unwrap();
    assert_eq!(summary.succeeded, 1);

    // Scaffold and wire up the working copy.
    scaffold::ensure_minimal_files(&local, "widget", "a widget").unwrap();
    let ws = GitWorkspace::new("test-token".to_string());
    ws.init_repository(&local, "main").unwrap();

    // Push through the parallel runner.
    let task = PushTask::new("widget", local, remote.to_string_lossy().to_string())
        .with_commit_message("Initial commit");
    let results = PushRunner::new("test-token".to_string())
        .push_all(vec![task])
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].success, "push failed: {:?}", results[0].error);

    let bare = git2::Repository::open_bare(&remote).unwrap();
    assert!(bare.find_branch("main", git2::BranchType::Local).is_ok());
}

#[tokio::test]
async fn test_parallel_push_isolates_failures() {
    let root = TempDir::new().unwrap();
    let mut tasks: Vec<PushTask> = (0..4)
        .map(|i| working_copy_with_remote(root.path(), &format!("repo-{i}")))
        .collect();
    tasks[2].remote_url = root.path().join("missing.git").to_string_lossy().to_string();

    let results = PushRunner::new("test-token".to_string())
        .with_workers(2)
        .push_all(tasks)
        .await;

    assert_eq!(results.len(), 4);
    let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "repo-2");
}
