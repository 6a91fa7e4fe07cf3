use serde::{Deserialize, Serialize};

/// A repository coordinate: owner, name and working branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl Repository {
    pub fn new(owner: String, name: String) -> Self {
        Self {
            owner,
            name,
            branch: "main".to_string(),
        }
    }

    pub fn with_branch(mut self, branch: String) -> Self {
        self.branch = branch;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }

    pub fn ssh_url(&self) -> String {
        format!("git@github.com:{}/{}.git", self.owner, self.name)
    }

    pub fn https_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }

    /// The URL pushes go to, depending on the transport the caller configured.
    pub fn remote_url(&self, use_ssh: bool) -> String {
        if use_ssh {
            self.ssh_url()
        } else {
            self.clone_url()
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Subset of the repository object returned by the hosting API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub ssh_url: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_defaults_to_main() {
        let repo = Repository::new("owner".to_string(), "name".to_string());
        assert_eq!(repo.owner, "owner");
        assert_eq!(repo.name, "name");
        assert_eq!(repo.branch, "main");
    }

    #[test]
    fn test_repository_urls() {
        let repo = Repository::new("myorg".to_string(), "myrepo".to_string());

        assert_eq!(repo.full_name(), "myorg/myrepo");
        assert_eq!(repo.clone_url(), "https://github.com/myorg/myrepo.git");
        assert_eq!(repo.ssh_url(), "git@github.com:myorg/myrepo.git");
        assert_eq!(repo.https_url(), "https://github.com/myorg/myrepo");
    }

    #[test]
    fn test_remote_url_honors_transport() {
        let repo = Repository::new("myorg".to_string(), "myrepo".to_string());
        assert_eq!(repo.remote_url(false), repo.clone_url());
        assert_eq!(repo.remote_url(true), repo.ssh_url());
    }

    #[test]
    fn test_with_branch() {
        let repo = Repository::new("owner".to_string(), "name".to_string())
            .with_branch("develop".to_string());
        assert_eq!(repo.branch, "develop");
    }

    #[test]
    fn test_remote_repo_deserializes_sparse_payload() {
        let repo: RemoteRepo = serde_json::from_str(
            r#"{"id": 42, "name": "widget", "full_name": "acme/widget", "private": true}"#,
        )
        .unwrap();
        assert_eq!(repo.id, 42);
        assert_eq!(repo.full_name, "acme/widget");
        assert!(repo.default_branch.is_none());
    }
}
