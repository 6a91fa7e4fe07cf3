//! Filename-based repository health scoring.

use serde::Serialize;

const WEIGHT_README: u32 = 20;
const WEIGHT_LICENSE: u32 = 15;
const WEIGHT_GITIGNORE: u32 = 10;
const WEIGHT_CONTRIBUTING: u32 = 10;
const WEIGHT_CODE_OF_CONDUCT: u32 = 10;
const WEIGHT_SECURITY: u32 = 10;
const WEIGHT_CI: u32 = 15;
const WEIGHT_TESTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl std::fmt::Display for HealthRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HealthRating::Excellent => "Excellent",
            HealthRating::Good => "Good",
            HealthRating::Fair => "Fair",
            HealthRating::NeedsImprovement => "Needs Improvement",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub has_readme: bool,
    pub has_license: bool,
    pub has_gitignore: bool,
    pub has_contributing: bool,
    pub has_code_of_conduct: bool,
    pub has_security: bool,
    pub has_ci: bool,
    pub has_tests: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub rating: HealthRating,
    pub checks: HealthChecks,
    pub recommendations: Vec<String>,
}

/// Score a repository from its (relative) file listing.
pub fn score(repo_files: &[String]) -> HealthReport {
    let files: Vec<String> = repo_files.iter().map(|f| f.to_lowercase()).collect();

    let checks = HealthChecks {
        has_readme: files.iter().any(|f| f.contains("readme")),
        has_license: files.iter().any(|f| f.contains("license") || f.contains("licence")),
        has_gitignore: files.iter().any(|f| f == ".gitignore"),
        has_contributing: files.iter().any(|f| f.contains("contributing")),
        has_code_of_conduct: files
            .iter()
            .any(|f| f.contains("code_of_conduct") || f.contains("code-of-conduct")),
        has_security: files.iter().any(|f| f.contains("security")),
        has_ci: files.iter().any(|f| {
            f.contains(".github/workflows") || f.contains(".gitlab-ci") || f.contains("jenkinsfile")
        }),
        has_tests: files.iter().any(|f| f.contains("test")),
    };

    let max_score = WEIGHT_README
        + WEIGHT_LICENSE
        + WEIGHT_GITIGNORE
        + WEIGHT_CONTRIBUTING
        + WEIGHT_CODE_OF_CONDUCT
        + WEIGHT_SECURITY
        + WEIGHT_CI
        + WEIGHT_TESTS;

    let mut total = 0;
    for (passed, weight) in [
        (checks.has_readme, WEIGHT_README),
        (checks.has_license, WEIGHT_LICENSE),
        (checks.has_gitignore, WEIGHT_GITIGNORE),
        (checks.has_contributing, WEIGHT_CONTRIBUTING),
        (checks.has_code_of_conduct, WEIGHT_CODE_OF_CONDUCT),
        (checks.has_security, WEIGHT_SECURITY),
        (checks.has_ci, WEIGHT_CI),
        (checks.has_tests, WEIGHT_TESTS),
    ] {
        if passed {
            total += weight;
        }
    }

    let percentage = (f64::from(total) / f64::from(max_score) * 1000.0).round() / 10.0;
    let rating = if percentage >= 90.0 {
        HealthRating::Excellent
    } else if percentage >= 75.0 {
        HealthRating::Good
    } else if percentage >= 50.0 {
        HealthRating::Fair
    } else {
        HealthRating::NeedsImprovement
    };

    HealthReport {
        score: total,
        max_score,
        percentage,
        recommendations: recommendations(&checks),
        rating,
        checks,
    }
}

fn recommendations(checks: &HealthChecks) -> Vec<String> {
    let mut out = Vec::new();
    if !checks.has_readme {
        out.push("Add a README.md with project description and usage instructions".to_string());
    }
    if !checks.has_license {
        out.push("Add a LICENSE file to clarify usage rights".to_string());
    }
    if !checks.has_gitignore {
        out.push("Add a .gitignore file to exclude unnecessary files".to_string());
    }
    if !checks.has_contributing {
        out.push("Add CONTRIBUTING.md to guide contributors".to_string());
    }
    if !checks.has_security {
        out.push("Add SECURITY.md to document security policies".to_string());
    }
    if !checks.has_ci {
        out.push("Set up CI/CD pipeline for automated testing".to_string());
    }
    if !checks.has_tests {
        out.push("Add tests to ensure code quality".to_string());
    }
    out
}
