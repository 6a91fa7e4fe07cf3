//! Creation tracking and insight reporting for a sync run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct TrackedRepo {
    pub name: String,
    pub owner: String,
    pub private: bool,
    pub template: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
}

/// Tracks repositories created during a run and derives summary statistics,
/// naming-pattern analysis, and recommendations.
pub struct RepoAnalytics {
    repos: Vec<TrackedRepo>,
}

impl RepoAnalytics {
    pub fn new() -> Self {
        Self { repos: Vec::new() }
    }

    pub fn track(&mut self, name: &str, owner: &str, private: bool, template: Option<&str>) {
        debug!(repo = %format!("{owner}/{name}"), "tracked repository");
        self.repos.push(TrackedRepo {
            name: name.to_string(),
            owner: owner.to_string(),
            private,
            template: template.map(str::to_string),
            created_at: Utc::now(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn summary(&self) -> AnalyticsSummary {
        let total = self.repos.len();
        let private_count = self.repos.iter().filter(|r| r.private).count();

        let mut by_owner: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_template: BTreeMap<String, usize> = BTreeMap::new();
        for repo in &self.repos {
            *by_owner.entry(repo.owner.clone()).or_default() += 1;
            let template = repo.template.clone().unwrap_or_else(|| "none".to_string());
            *by_template.entry(template).or_default() += 1;
        }

        let most_active_owner = by_owner
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(owner, _)| owner.clone());
        let most_used_template = by_template
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(template, _)| template.clone());

        let private_percentage = if total > 0 {
            (private_count as f64 / total as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        AnalyticsSummary {
            total_repos: total,
            private_repos: private_count,
            public_repos: total - private_count,
            private_percentage,
            by_owner,
            by_template,
            name_patterns: self.name_patterns(),
            most_active_owner,
            most_used_template,
        }
    }

    fn name_patterns(&self) -> NamePatterns {
        let names: Vec<&str> = self.repos.iter().map(|r| r.name.as_str()).collect();
        if names.is_empty() {
            return NamePatterns::default();
        }

        let kebab_case = names.iter().filter(|n| n.contains('-') && !n.contains('_')).count();
        let snake_case = names.iter().filter(|n| n.contains('_')).count();
        let camel_case = names.iter().filter(|n| is_camel_case(n)).count();

        let mut prefixes: BTreeMap<String, usize> = BTreeMap::new();
        for name in &names {
            if let Some(prefix) = name.split('-').next() {
                if prefix.len() <= 10 && prefix.len() < name.len() {
                    *prefixes.entry(prefix.to_string()).or_default() += 1;
                }
            }
        }
        let mut common_prefixes: Vec<(String, usize)> = prefixes.into_iter().collect();
        common_prefixes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        common_prefixes.truncate(5);

        let total_len: usize = names.iter().map(|n| n.len()).sum();
        let average_name_length = (total_len as f64 / names.len() as f64 * 10.0).round() / 10.0;

        NamePatterns {
            kebab_case_count: kebab_case,
            snake_case_count: snake_case,
            camel_case_count: camel_case,
            common_prefixes,
            average_name_length,
            shortest_name: names.iter().min_by_key(|n| n.len()).map(|n| n.to_string()),
            longest_name: names.iter().max_by_key(|n| n.len()).map(|n| n.to_string()),
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let mut recommendations = Vec::new();
        let summary = self.summary();

        if summary.total_repos == 0 {
            return vec!["Create some repositories to get recommendations".to_string()];
        }

        if summary.private_percentage == 0.0 {
            recommendations.push(
                "All repositories are public. Consider making sensitive repositories private."
                    .to_string(),
            );
        } else if summary.private_percentage == 100.0 {
            recommendations.push(
                "All repositories are private. Consider open-sourcing some if appropriate."
                    .to_string(),
            );
        }

        let untemplated = summary.by_template.get("none").copied().unwrap_or(0);
        if untemplated as f64 > summary.total_repos as f64 * 0.3 {
            recommendations.push(
                "Many repositories without templates. Consider using templates for consistency."
                    .to_string(),
            );
        }

        let patterns = &summary.name_patterns;
        if patterns.kebab_case_count > 0 && patterns.snake_case_count > 0 {
            recommendations.push(
                "Mixed naming conventions detected (kebab-case and snake_case). \
                 Consider standardizing on one convention."
                    .to_string(),
            );
        }

        let owner_count = summary.by_owner.len();
        if owner_count > 3 {
            recommendations.push(format!(
                "Repositories spread across {owner_count} owners. \
                 Consider consolidating under fewer organizations for easier management."
            ));
        }

        recommendations
    }

    /// Render the summary and recommendations as a report.
    pub fn report(&self, format: ReportFormat) -> String {
        let summary = self.summary();
        let recommendations = self.recommendations();
        match format {
            ReportFormat::Text => text_report(&summary, &recommendations),
            ReportFormat::Markdown => markdown_report(&summary, &recommendations),
        }
    }
}

impl Default for RepoAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_alphanumeric()) && name.chars().any(|c| c.is_ascii_uppercase())
        }
        _ => false,
    }
}

fn text_report(summary: &AnalyticsSummary, recommendations: &[String]) -> String {
    let divider = "=".repeat(60);
    let rule = "-".repeat(60);
    let mut lines = vec![
        divider.clone(),
        "REPOSITORY ANALYTICS REPORT".to_string(),
        divider.clone(),
        format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S")),
        String::new(),
        "SUMMARY".to_string(),
        rule.clone(),
        format!("Total Repositories: {}", summary.total_repos),
        format!(
            "Private: {} ({}%)",
            summary.private_repos, summary.private_percentage
        ),
        format!("Public: {}", summary.public_repos),
        String::new(),
    ];

    if !summary.by_owner.is_empty() {
        lines.push("BY OWNER".to_string());
        lines.push(rule.clone());
        for (owner, count) in &summary.by_owner {
            lines.push(format!("  {owner}: {count}"));
        }
        lines.push(String::new());
    }

    if !summary.by_template.is_empty() {
        lines.push("BY TEMPLATE".to_string());
        lines.push(rule.clone());
        for (template, count) in &summary.by_template {
            lines.push(format!("  {template}: {count}"));
        }
        lines.push(String::new());
    }

    if !recommendations.is_empty() {
        lines.push("RECOMMENDATIONS".to_string());
        lines.push(rule);
        for rec in recommendations {
            lines.push(format!("  - {rec}"));
        }
        lines.push(String::new());
    }

    lines.push(divider);
    lines.join("\n")
}

fn markdown_report(summary: &AnalyticsSummary, recommendations: &[String]) -> String {
    let mut lines = vec![
        "# Repository Analytics Report".to_string(),
        format!("*Generated: {}*", Utc::now().format("%Y-%m-%d %H:%M:%S")),
        String::new(),
        "## Summary".to_string(),
        format!("- **Total Repositories:** {}", summary.total_repos),
        format!(
            "- **Private:** {} ({}%)",
            summary.private_repos, summary.private_percentage
        ),
        format!("- **Public:** {}", summary.public_repos),
        String::new(),
    ];

    if !summary.by_owner.is_empty() {
        lines.push("## By Owner".to_string());
        for (owner, count) in &summary.by_owner {
            lines.push(format!("- **{owner}:** {count}"));
        }
        lines.push(String::new());
    }

    if !summary.by_template.is_empty() {
        lines.push("## By Template".to_string());
        for (template, count) in &summary.by_template {
            lines.push(format!("- **{template}:** {count}"));
        }
        lines.push(String::new());
    }

    if !recommendations.is_empty() {
        lines.push("## Recommendations".to_string());
        for rec in recommendations {
            lines.push(format!("- {rec}"));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_repos: usize,
    pub private_repos: usize,
    pub public_repos: usize,
    pub private_percentage: f64,
    pub by_owner: BTreeMap<String, usize>,
    pub by_template: BTreeMap<String, usize>,
    pub name_patterns: NamePatterns,
    pub most_active_owner: Option<String>,
    pub most_used_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NamePatterns {
    pub kebab_case_count: usize,
    pub snake_case_count: usize,
    pub camel_case_count: usize,
    pub common_prefixes: Vec<(String, usize)>,
    pub average_name_length: f64,
    pub shortest_name: Option<String>,
    pub longest_name: Option<String>,
}
