use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One repository in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_private")]
    pub private: bool,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub owner: Option<String>,
}

fn default_private() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    pub default_branch: String,
    pub commit_message: String,
    pub use_ssh: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            commit_message: "Initial commit from RepoForge".to_string(),
            use_ssh: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    pub repos: Vec<RepoEntry>,
    #[serde(default)]
    pub options: SyncOptions,
}

/// Load and validate the manifest. Any problem here is fatal and reported
/// before a single repository is touched.
pub fn load_and_validate(path: &Path) -> Result<RepoConfig> {
    if !path.exists() {
        bail!("config file not found: {}", path.display());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: RepoConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("invalid config schema in {}", path.display()))?;

    for entry in &config.repos {
        if entry.name.is_empty() || entry.name.contains(' ') {
            bail!(
                "invalid repository name {:?}: must be non-empty and cannot contain spaces",
                entry.name
            );
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_and_validate(Path::new("/nonexistent/repos.yml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let file = write_config("repos:\n  - name: widget\n");
        let config = load_and_validate(file.path()).unwrap();

        assert_eq!(config.repos.len(), 1);
        let entry = &config.repos[0];
        assert_eq!(entry.name, "widget");
        assert!(entry.private);
        assert!(entry.template.is_none());

        assert_eq!(config.options.default_branch, "main");
        assert_eq!(config.options.commit_message, "Initial commit from RepoForge");
        assert!(!config.options.use_ssh);
    }

    #[test]
    fn test_full_entry_and_options() {
        let file = write_config(
            r#"
repos:
  - name: widget
    description: a widget
    private: false
    template: rust-service
    path: work/widget
    owner: acme
options:
  default_branch: trunk
  commit_message: hello
  use_ssh: true
"#,
        );
        let config = load_and_validate(file.path()).unwrap();

        let entry = &config.repos[0];
        assert!(!entry.private);
        assert_eq!(entry.template.as_deref(), Some("rust-service"));
        assert_eq!(entry.path.as_deref(), Some(Path::new("work/widget")));
        assert_eq!(entry.owner.as_deref(), Some("acme"));
        assert_eq!(config.options.default_branch, "trunk");
        assert!(config.options.use_ssh);
    }

    #[test]
    fn test_name_with_space_is_rejected() {
        let file = write_config("repos:\n  - name: \"my repo\"\n");
        let err = load_and_validate(file.path()).unwrap_err();
        assert!(err.to_string().contains("cannot contain spaces"));
    }

    #[test]
    fn test_garbage_yaml_is_rejected() {
        let file = write_config("repos: {not a list\n");
        let err = load_and_validate(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid config schema"));
    }
}
