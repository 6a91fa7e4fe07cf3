use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repoforge")]
#[command(about = "RepoForge - Bulk repository creation and synchronization", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN")]
    pub github_token: String,

    /// User the token belongs to (owner for personal repositories)
    #[arg(long, env = "GITHUB_USER")]
    pub github_user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, scaffold and push every repository in the manifest
    Sync {
        /// Path to the repository manifest
        #[arg(long, short = 'c', default_value = "repos.yml")]
        config: PathBuf,

        /// Templates directory
        #[arg(long, default_value = "templates")]
        templates_dir: PathBuf,

        /// Log what would happen without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Re-initialize local working copies even if they already exist
        #[arg(long)]
        force: bool,

        /// Number of parallel pushes
        #[arg(long, default_value = "4")]
        parallel: usize,

        /// Override owner (user or organization) for every entry
        #[arg(long)]
        owner: Option<String>,

        /// Create repositories as one batch, rolling back on failure
        #[arg(long)]
        batch: bool,

        /// Keep going after a failed creation instead of stopping
        #[arg(long)]
        continue_on_error: bool,

        /// Show name suggestions for described repositories
        #[arg(long)]
        suggest_names: bool,

        /// Generate standard community files (issues, PR, security)
        #[arg(long)]
        auto_templates: bool,

        /// Score repository health after scaffolding
        #[arg(long)]
        health_check: bool,

        /// Print an analytics report at the end
        #[arg(long)]
        analytics: bool,

        /// Webhook URL for developer activity events
        #[arg(long, env = "REPOFORGE_WEBHOOK_URL")]
        events_webhook: Option<String>,
    },

    /// Validate the manifest and exit
    Validate {
        /// Path to the repository manifest
        #[arg(long, short = 'c', default_value = "repos.yml")]
        config: PathBuf,
    },

    /// Suggest repository names for a description
    Suggest {
        /// Repository description
        #[arg(long)]
        description: String,

        /// Current name, excluded from suggestions
        #[arg(long, default_value = "")]
        name: String,

        /// Number of suggestions
        #[arg(long, default_value = "3")]
        count: usize,
    },

    /// Score the health of an existing directory tree
    Health {
        /// Directory to score
        path: PathBuf,
    },

    /// Write the generated community files into a directory
    Templates {
        /// Target directory
        path: PathBuf,
    },
}
