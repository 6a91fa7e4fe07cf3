use crate::error::Result;
use crate::workspace::GitWorkspace;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, error, info};

/// One repository's stage/commit/push job. Tasks share no mutable state and
/// may run in any order or interleaving.
#[derive(Debug, Clone, Serialize)]
pub struct PushTask {
    pub name: String,
    pub local_path: PathBuf,
    pub remote_url: String,
    pub branch: String,
    pub commit_message: String,
}

impl PushTask {
    pub fn new(name: impl Into<String>, local_path: PathBuf, remote_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_path,
            remote_url: remote_url.into(),
            branch: "main".to_string(),
            commit_message: "Initial commit".to_string(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PushResult {
    pub name: String,
    pub success: bool,
    pub error: Option<String>,
}

impl PushResult {
    fn ok(name: String) -> Self {
        Self {
            name,
            success: true,
            error: None,
        }
    }

    fn failed(name: String, error: String) -> Self {
        Self {
            name,
            success: false,
            error: Some(error),
        }
    }
}

/// Executes independent push tasks concurrently on a bounded worker pool.
///
/// Every submitted task yields exactly one [`PushResult`], in completion
/// order. A failing task never affects its siblings, and nothing is retried.
pub struct PushRunner {
    token: String,
    workers: usize,
}

impl PushRunner {
    pub fn new(token: String) -> Self {
        Self { token, workers: 4 }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub async fn push_all(&self, tasks: Vec<PushTask>) -> Vec<PushResult> {
        let total = tasks.len();
        info!("pushing {} repositories in parallel (workers={})", total, self.workers);

        // The results vector is the only cross-task shared state.
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let results: Arc<Mutex<Vec<PushResult>>> = Arc::new(Mutex::new(Vec::with_capacity(total)));

        let mut handles = Vec::with_capacity(total);
        for task in tasks {
            let semaphore = Arc::clone(&semaphore);
            let results = Arc::clone(&results);
            let token = self.token.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();

                let name = task.name.clone();
                // git2 is synchronous; run each task's pipeline off the
                // async workers.
                let outcome = tokio::task::spawn_blocking(move || push_one(&task, &token))
                    .await
                    .unwrap_or_else(|e| {
                        PushResult::failed(name, format!("push worker panicked: {e}"))
                    });

                results.lock().await.push(outcome);
            }));
        }

        for handle in handles {
            let _ = handle.await;
        }

        let guard = results.lock().await;
        let collected: Vec<PushResult> = guard.clone();
        drop(guard);

        let succeeded = collected.iter().filter(|r| r.success).count();
        info!("push summary: {}/{}", succeeded, total);
        collected
    }
}

/// Stage, commit and push a single repository. Always produces a result,
/// never an error.
fn push_one(task: &PushTask, token: &str) -> PushResult {
    info!("pushing {} from {:?}", task.name, task.local_path);
    match run_pipeline(task, token) {
        Ok(()) => {
            info!("successfully pushed {}", task.name);
            PushResult::ok(task.name.clone())
        }
        Err(e) => {
            error!("push failed for {}: {}", task.name, e);
            PushResult::failed(task.name.clone(), e.to_string())
        }
    }
}

fn run_pipeline(task: &PushTask, token: &str) -> Result<()> {
    let workspace = GitWorkspace::new(token.to_string());
    let repo = workspace.open(&task.local_path)?;

    workspace.stage_all(&repo)?;
    match workspace.commit_staged(&repo, &task.commit_message)? {
        Some(commit) => debug!("created commit {} for {}", commit, task.name),
        None => debug!("nothing to commit for {}", task.name),
    }
    workspace.push_branch(&repo, &task.remote_url, &task.branch)?;
    Ok(())
}
