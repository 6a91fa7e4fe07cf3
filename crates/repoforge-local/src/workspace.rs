use crate::error::Result;
use git2::{
    Cred, ErrorCode, IndexAddOption, Oid, PushOptions, RemoteCallbacks, Repository, Signature,
    StatusOptions,
};
use std::path::Path;
use tracing::{debug, info};

/// Local working-copy operations, authenticated against the remote with the
/// hosting token.
pub struct GitWorkspace {
    token: String,
    author_name: String,
    author_email: String,
}

impl GitWorkspace {
    pub fn new(token: String) -> Self {
        Self {
            token,
            author_name: "RepoForge Bot".to_string(),
            author_email: "repoforge@users.noreply.github.com".to_string(),
        }
    }

    pub fn with_author(mut self, name: String, email: String) -> Self {
        self.author_name = name;
        self.author_email = email;
        self
    }

    /// Initialize a repository at `path` with `branch` as the (unborn) HEAD.
    pub fn init_repository(&self, path: &Path, branch: &str) -> Result<Repository> {
        debug!("initializing repository at {:?}", path);

        let repo = Repository::init(path)?;
        repo.set_head(&format!("refs/heads/{branch}"))?;

        info!("initialized repository at {:?} on branch {}", path, branch);
        Ok(repo)
    }

    pub fn open(&self, path: &Path) -> Result<Repository> {
        Ok(Repository::open(path)?)
    }

    /// Point `origin` at `url`, creating the remote if it does not exist yet.
    pub fn ensure_remote(&self, repo: &Repository, url: &str) -> Result<()> {
        if let Ok(remote) = repo.find_remote("origin") {
            let needs_update = remote.url() != Some(url);
            drop(remote);
            if needs_update {
                debug!("updating origin to {}", url);
                repo.remote_set_url("origin", url)?;
            }
        } else {
            debug!("adding origin {}", url);
            repo.remote("origin", url)?;
        }
        Ok(())
    }

    /// Stage every change in the working directory.
    pub fn stage_all(&self, repo: &Repository) -> Result<()> {
        let mut index = repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.write()?;
        Ok(())
    }

    /// Commit whatever is staged. Returns `None` when the staged tree matches
    /// HEAD: "nothing to commit" is benign, not an error.
    pub fn commit_staged(&self, repo: &Repository, message: &str) -> Result<Option<Oid>> {
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                debug!("nothing to commit");
                return Ok(None);
            }
        } else if index.is_empty() {
            debug!("nothing to commit (empty repository)");
            return Ok(None);
        }

        let tree = repo.find_tree(tree_id)?;
        let sig = Signature::now(&self.author_name, &self.author_email)?;
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let commit_id = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        info!("changes committed: {}", commit_id);
        Ok(Some(commit_id))
    }

    /// Push `branch` to `remote_url`.
    pub fn push_branch(&self, repo: &Repository, remote_url: &str, branch: &str) -> Result<()> {
        info!("pushing branch {} to {}", branch, remote_url);

        let mut callbacks = RemoteCallbacks::new();
        let token = self.token.clone();
        callbacks.credentials(move |_url, _username_from_url, _allowed_types| {
            Cred::userpass_plaintext("x-access-token", &token)
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let mut remote = repo.remote_anonymous(remote_url)?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[&refspec], Some(&mut push_options))?;

        info!("branch pushed successfully: {}", branch);
        Ok(())
    }

    /// Whether the working directory has any staged, unstaged or untracked
    /// changes.
    pub fn has_changes(&self, repo: &Repository) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true);
        let statuses = repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace() -> GitWorkspace {
        GitWorkspace::new("test-token".to_string())
    }

    #[test]
    fn test_init_sets_branch_head() {
        let dir = tempfile::tempdir().unwrap();
        let repo = workspace().init_repository(dir.path(), "trunk").unwrap();

        assert_eq!(repo.head().unwrap_err().code(), ErrorCode::UnbornBranch);
        fs::write(dir.path().join("README.md"), "# hi\n").unwrap();
        workspace().stage_all(&repo).unwrap();
        workspace().commit_staged(&repo, "initial").unwrap().unwrap();

        assert_eq!(repo.head().unwrap().shorthand(), Some("trunk"));
    }

    #[test]
    fn test_commit_staged_is_benign_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace();
        let repo = ws.init_repository(dir.path(), "main").unwrap();

        fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        ws.stage_all(&repo).unwrap();
        assert!(ws.commit_staged(&repo, "first").unwrap().is_some());

        // No new changes: second commit attempt is a no-op.
        ws.stage_all(&repo).unwrap();
        assert!(ws.commit_staged(&repo, "second").unwrap().is_none());
    }

    #[test]
    fn test_has_changes_sees_untracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace();
        let repo = ws.init_repository(dir.path(), "main").unwrap();

        assert!(!ws.has_changes(&repo).unwrap());
        fs::write(dir.path().join("new.txt"), "data\n").unwrap();
        assert!(ws.has_changes(&repo).unwrap());
    }

    #[test]
    fn test_ensure_remote_adds_and_updates() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace();
        let repo = ws.init_repository(dir.path(), "main").unwrap();

        ws.ensure_remote(&repo, "https://example.com/a.git").unwrap();
        assert_eq!(
            repo.find_remote("origin").unwrap().url(),
            Some("https://example.com/a.git")
        );

        ws.ensure_remote(&repo, "https://example.com/b.git").unwrap();
        assert_eq!(
            repo.find_remote("origin").unwrap().url(),
            Some("https://example.com/b.git")
        );
    }

    #[test]
    fn test_push_to_local_bare_remote() {
        let local = tempfile::tempdir().unwrap();
        let remote = tempfile::tempdir().unwrap();
        Repository::init_bare(remote.path()).unwrap();

        let ws = workspace();
        let repo = ws.init_repository(local.path(), "main").unwrap();
        fs::write(local.path().join("README.md"), "# test\n").unwrap();
        ws.stage_all(&repo).unwrap();
        ws.commit_staged(&repo, "initial").unwrap();

        let url = remote.path().to_string_lossy().to_string();
        ws.push_branch(&repo, &url, "main").unwrap();

        let bare = Repository::open_bare(remote.path()).unwrap();
        assert!(bare.find_branch("main", git2::BranchType::Local).is_ok());
    }
}
