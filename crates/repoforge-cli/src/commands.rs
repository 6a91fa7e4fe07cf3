use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use repoforge_core::{health, suggest, HealthRating, RepoAnalytics, ReportFormat};
use repoforge_github::{GitHubClient, RepoService, Repository};
use repoforge_local::{
    scaffold, templates, CreationRequest, EventEmitter, GitWorkspace, PushRunner, PushTask,
    RepositoryBatchCreator,
};

use crate::cli::Commands;
use crate::config::{self, RepoEntry, SyncOptions};

pub async fn execute(
    command: Commands,
    github_token: String,
    github_user: Option<String>,
) -> Result<()> {
    match command {
        Commands::Sync {
            config,
            templates_dir,
            dry_run,
            force,
            parallel,
            owner,
            batch,
            continue_on_error,
            suggest_names,
            auto_templates,
            health_check,
            analytics,
            events_webhook,
        } => {
            let args = SyncArgs {
                config,
                templates_dir,
                dry_run,
                force,
                parallel,
                owner,
                batch,
                continue_on_error,
                suggest_names,
                auto_templates,
                health_check,
                analytics,
                events_webhook,
            };
            sync(args, github_token, github_user).await
        }

        Commands::Validate { config: path } => {
            let config = config::load_and_validate(&path)?;
            println!(
                "✓ Config valid: {} repositories, default branch '{}'",
                config.repos.len(),
                config.options.default_branch
            );
            Ok(())
        }

        Commands::Suggest {
            description,
            name,
            count,
        } => {
            let suggestions = suggest::suggest_names(&description, &name, count);
            if suggestions.is_empty() {
                println!("No suggestions for this description");
            } else {
                println!("Suggested names:");
                for suggestion in suggestions {
                    println!("  {suggestion}");
                }
            }
            Ok(())
        }

        Commands::Health { path } => {
            let files = list_files(&path)?;
            let report = health::score(&files);
            println!(
                "Health Score: {}/{} ({}%) - {}",
                report.score, report.max_score, report.percentage, report.rating
            );
            for rec in &report.recommendations {
                println!("  - {rec}");
            }
            Ok(())
        }

        Commands::Templates { path } => {
            templates::write_community_files(&path)?;
            println!("✓ Community files written to {}", path.display());
            Ok(())
        }
    }
}

struct SyncArgs {
    config: PathBuf,
    templates_dir: PathBuf,
    dry_run: bool,
    force: bool,
    parallel: usize,
    owner: Option<String>,
    batch: bool,
    continue_on_error: bool,
    suggest_names: bool,
    auto_templates: bool,
    health_check: bool,
    analytics: bool,
    events_webhook: Option<String>,
}

/// One manifest entry, resolved against CLI overrides and options.
struct RepoPlan {
    entry: RepoEntry,
    owner: String,
    local_path: PathBuf,
    repository: Repository,
    remote: String,
}

async fn sync(args: SyncArgs, token: String, user: Option<String>) -> Result<()> {
    let config = config::load_and_validate(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;

    let mut client = GitHubClient::new(token.clone())?;
    if let Some(user) = &user {
        client = client.with_user(user.clone());
    }
    let client: Arc<dyn RepoService> = Arc::new(client);

    let options = config.options.clone();
    let use_ssh = match std::env::var("REPOFORGE_USE_SSH") {
        Ok(value) => value == "1",
        Err(_) => options.use_ssh,
    };

    let developer = user.clone().unwrap_or_else(|| "unknown".to_string());
    let mut emitter = EventEmitter::new(args.events_webhook.clone());
    let mut analytics = args.analytics.then(RepoAnalytics::new);

    // Resolve every entry up front; a missing owner is a config-level error.
    let mut plans = Vec::with_capacity(config.repos.len());
    for entry in &config.repos {
        let owner = args
            .owner
            .clone()
            .or_else(|| entry.owner.clone())
            .or_else(|| user.clone())
            .unwrap_or_default();
        if owner.is_empty() {
            bail!(
                "no owner for repository '{}': set --owner, the entry's owner, or GITHUB_USER",
                entry.name
            );
        }

        let local_path = entry
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&entry.name));
        let repository = Repository::new(owner.clone(), entry.name.clone())
            .with_branch(options.default_branch.clone());
        let remote = repository.remote_url(use_ssh);

        info!("processing {} (owner={})", entry.name, owner);
        plans.push(RepoPlan {
            entry: entry.clone(),
            owner,
            local_path,
            repository,
            remote,
        });
    }

    // Phase 1: make sure the remote repositories (and, in batch mode, the
    // local directories) exist.
    let mut ready = vec![true; plans.len()];
    if args.batch {
        batch_create(
            &client,
            &plans,
            &mut ready,
            &args,
            &mut analytics,
            &mut emitter,
            &developer,
        )
        .await?;
    } else {
        for (i, plan) in plans.iter().enumerate() {
            match ensure_remote_repo(client.as_ref(), plan, args.dry_run).await {
                Ok(created) => {
                    if created {
                        if let Some(analytics) = analytics.as_mut() {
                            analytics.track(
                                &plan.entry.name,
                                &plan.owner,
                                plan.entry.private,
                                plan.entry.template.as_deref(),
                            );
                        }
                        emitter
                            .emit(
                                "repo_created",
                                &developer,
                                &plan.repository.full_name(),
                                HashMap::new(),
                            )
                            .await;
                    }
                }
                Err(e) => {
                    error!("failed to ensure {}: {e:#}", plan.repository.full_name());
                    ready[i] = false;
                }
            }
        }
    }

    // Phase 2: scaffold the local working copies and collect one push task
    // per repository.
    let workspace = GitWorkspace::new(token.clone());
    let mut push_tasks = Vec::new();
    for (i, plan) in plans.iter().enumerate() {
        if !ready[i] {
            continue;
        }

        if args.suggest_names && !plan.entry.description.is_empty() {
            let suggestions = suggest::suggest_names(&plan.entry.description, &plan.entry.name, 3);
            if !suggestions.is_empty() {
                println!(
                    "Suggested names for '{}': {}",
                    plan.entry.name,
                    suggestions.join(", ")
                );
            }
        }

        if args.dry_run {
            info!(
                "[dry-run] would scaffold: {} (template={:?}) at {}",
                plan.entry.name,
                plan.entry.template,
                plan.local_path.display()
            );
            continue;
        }

        if let Err(e) = scaffold_entry(&workspace, plan, &args, &options, &mut emitter, &developer).await
        {
            error!("failed processing {}: {e:#}", plan.entry.name);
            continue;
        }

        push_tasks.push(
            PushTask::new(
                plan.entry.name.as_str(),
                plan.local_path.clone(),
                plan.remote.as_str(),
            )
            .with_branch(options.default_branch.as_str())
            .with_commit_message(options.commit_message.as_str()),
        );
    }

    // Phase 3: push everything in parallel.
    if args.dry_run {
        info!("[dry-run] no push performed");
    } else if push_tasks.is_empty() {
        info!("nothing to push");
    } else {
        println!(
            "Pushing {} repositories in parallel (workers={})",
            push_tasks.len(),
            args.parallel
        );
        let runner = PushRunner::new(token).with_workers(args.parallel);
        let results = runner.push_all(push_tasks).await;

        let succeeded = results.iter().filter(|r| r.success).count();
        for result in &results {
            if result.success {
                println!("  ✓ {}", result.name);
            } else {
                println!(
                    "  ✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        println!("Push summary: {}/{}", succeeded, results.len());
    }

    if let Some(analytics) = &analytics {
        let report = analytics.report(ReportFormat::Text);
        println!();
        println!("{report}");

        let report_path = PathBuf::from("repoforge_analytics_report.txt");
        std::fs::write(&report_path, &report)
            .with_context(|| format!("failed to write {}", report_path.display()))?;
        println!("✓ Analytics report saved to: {}", report_path.display());
    }

    Ok(())
}

/// Check-then-create for a single plan. Returns whether a repository was
/// actually created.
async fn ensure_remote_repo(
    client: &dyn RepoService,
    plan: &RepoPlan,
    dry_run: bool,
) -> Result<bool> {
    if client.repo_exists(&plan.owner, &plan.entry.name).await? {
        info!("repo exists: {}", plan.repository.full_name());
        return Ok(false);
    }

    if dry_run {
        info!(
            "[dry-run] would create repo: {} (private={})",
            plan.repository.full_name(),
            plan.entry.private
        );
        return Ok(false);
    }

    info!("creating repo {}", plan.repository.full_name());
    client
        .create_repo(
            &plan.owner,
            &plan.entry.name,
            &plan.entry.description,
            plan.entry.private,
        )
        .await?;
    Ok(true)
}

/// Queue every missing repository through the rollback-capable creator. On
/// failure (unless `--continue-on-error`), compensations run and the sync
/// aborts before any scaffolding or pushing.
#[allow(clippy::too_many_arguments)]
async fn batch_create(
    client: &Arc<dyn RepoService>,
    plans: &[RepoPlan],
    ready: &mut [bool],
    args: &SyncArgs,
    analytics: &mut Option<RepoAnalytics>,
    emitter: &mut EventEmitter,
    developer: &str,
) -> Result<()> {
    let mut creator = RepositoryBatchCreator::new(Arc::clone(client));
    let mut queued = Vec::new();

    for (i, plan) in plans.iter().enumerate() {
        match client.repo_exists(&plan.owner, &plan.entry.name).await {
            Ok(true) => {
                info!("repo exists: {}", plan.repository.full_name());
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                error!(
                    "existence check failed for {}: {e}",
                    plan.repository.full_name()
                );
                ready[i] = false;
                continue;
            }
        }

        if args.dry_run {
            info!(
                "[dry-run] would create repo: {} (private={})",
                plan.repository.full_name(),
                plan.entry.private
            );
            continue;
        }

        creator.add_repository_creation(
            CreationRequest::new(plan.entry.name.as_str(), plan.owner.as_str())
                .with_description(plan.entry.description.as_str())
                .with_private(plan.entry.private)
                .with_local_path(plan.local_path.clone()),
        );
        queued.push(i);
    }

    if creator.is_empty() {
        return Ok(());
    }

    let summary = creator.execute(!args.continue_on_error).await?;
    println!(
        "Batch creation: {}/{} succeeded in {:.2}s",
        summary.succeeded, summary.executed, summary.duration_seconds
    );

    if summary.failed > 0 && !args.continue_on_error {
        let rollback = creator.rollback().await;
        println!(
            "Rolled back {}/{} operations",
            rollback.rolled_back, rollback.total_executed
        );
        for err in &rollback.errors {
            error!("{err}");
        }
        bail!("batch creation failed; local state rolled back");
    }

    let status = creator.status();
    for (slot, &plan_idx) in queued.iter().enumerate() {
        let op = &status.operations[slot];
        if op.executed && op.success {
            let plan = &plans[plan_idx];
            if let Some(analytics) = analytics.as_mut() {
                analytics.track(
                    &plan.entry.name,
                    &plan.owner,
                    plan.entry.private,
                    plan.entry.template.as_deref(),
                );
            }
            emitter
                .emit(
                    "repo_created",
                    developer,
                    &plan.repository.full_name(),
                    HashMap::new(),
                )
                .await;
        } else {
            ready[plan_idx] = false;
        }
    }

    if summary.failed == 0 {
        emitter
            .emit("batch_operation_success", developer, "batch", HashMap::new())
            .await;
    } else {
        warn!(
            "{} creations failed; continuing with the remaining repositories",
            summary.failed
        );
    }
    Ok(())
}

/// Fill one working copy: template, minimal files, optional community files,
/// git init and origin wiring, optional health scoring.
async fn scaffold_entry(
    workspace: &GitWorkspace,
    plan: &RepoPlan,
    args: &SyncArgs,
    options: &SyncOptions,
    emitter: &mut EventEmitter,
    developer: &str,
) -> Result<()> {
    std::fs::create_dir_all(&plan.local_path)?;

    if let Some(template) = &plan.entry.template {
        scaffold::copy_template(&args.templates_dir, template, &plan.local_path)?;
        emitter
            .emit(
                "template_applied",
                developer,
                &plan.repository.full_name(),
                HashMap::new(),
            )
            .await;
    }
    scaffold::ensure_minimal_files(&plan.local_path, &plan.entry.name, &plan.entry.description)?;

    if args.auto_templates {
        templates::write_community_files(&plan.local_path)?;
        emitter
            .emit(
                "security_policy_added",
                developer,
                &plan.repository.full_name(),
                HashMap::new(),
            )
            .await;
    }

    // Wire up git. An existing repository is left alone unless --force.
    if plan.local_path.join(".git").exists() && !args.force {
        info!("local git exists for {} (skipping init)", plan.entry.name);
        let repo = workspace.open(&plan.local_path)?;
        workspace.ensure_remote(&repo, &plan.remote)?;
    } else {
        let repo = workspace.init_repository(&plan.local_path, &options.default_branch)?;
        workspace.ensure_remote(&repo, &plan.remote)?;
        emitter
            .emit(
                "repo_initialized",
                developer,
                &plan.repository.full_name(),
                HashMap::new(),
            )
            .await;
    }

    if args.health_check {
        let files = list_files(&plan.local_path)?;
        let report = health::score(&files);
        println!(
            "Health Score for {}: {}/{} ({}%) - {}",
            plan.entry.name, report.score, report.max_score, report.percentage, report.rating
        );
        for rec in report.recommendations.iter().take(3) {
            println!("  - {rec}");
        }

        let event = match report.rating {
            HealthRating::Excellent => Some("health_check_excellent"),
            HealthRating::Good => Some("health_check_good"),
            HealthRating::Fair => Some("health_check_fair"),
            HealthRating::NeedsImprovement => None,
        };
        if let Some(event) = event {
            emitter
                .emit(event, developer, &plan.repository.full_name(), HashMap::new())
                .await;
        }
    }

    Ok(())
}

/// Relative file listing of a directory tree, as input for health scoring.
fn list_files(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(files)
}
