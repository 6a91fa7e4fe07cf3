//! Generated community files for freshly scaffolded repositories.

use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::info;

const ISSUE_TEMPLATE_GENERAL: &str = r#"---
name: Bug report
about: Create a report to help us improve
title: '[BUG] '
labels: 'bug'
assignees: ''

---

**Describe the bug**
A clear and concise description of what the bug is.

**To Reproduce**
Steps to reproduce the behavior:
1. Go to '...'
2. Click on '....'
3. Scroll down to '....'
4. See error

**Expected behavior**
A clear and concise description of what you expected to happen.

**Screenshots**
If applicable, add screenshots to help explain your problem.

**Environment:**
 - OS: [e.g. Ubuntu 20.04]
 - Version [e.g. 1.0.0]

**Additional context**
Add any other context about the problem here.
"#;

const ISSUE_TEMPLATE_API: &str = r#"---
name: API Issue
about: Report an API-related issue
title: '[API] '
labels: 'api, bug'
assignees: ''

---

**Endpoint**
Which API endpoint is affected?

**Request**
```
Provide request details (method, headers, body)
```

**Expected Response**
What did you expect?

**Actual Response**
What actually happened?

**Environment:**
 - API Version:
 - Client:
"#;

const PR_TEMPLATE: &str = r#"## Description
Please include a summary of the changes and the related issue.

Fixes # (issue)

## Type of change
- [ ] Bug fix (non-breaking change which fixes an issue)
- [ ] New feature (non-breaking change which adds functionality)
- [ ] Breaking change (fix/feature causing existing functionality to break)
- [ ] Documentation update

## How Has This Been Tested?
Please describe the tests that you ran to verify your changes.

- [ ] Test A
- [ ] Test B

## Checklist:
- [ ] My code follows the style guidelines of this project
- [ ] I have performed a self-review of my own code
- [ ] I have commented my code, particularly in hard-to-understand areas
- [ ] I have made corresponding changes to the documentation
- [ ] My changes generate no new warnings
- [ ] I have added tests that prove my fix is effective or that my feature works
- [ ] New and existing unit tests pass locally with my changes
"#;

const SECURITY_POLICY: &str = r#"# Security Policy

## Supported Versions

| Version | Supported          |
| ------- | ------------------ |
| 1.x.x   | :white_check_mark: |
| < 1.0   | :x:                |

## Reporting a Vulnerability

We take security vulnerabilities seriously. If you discover a security issue, please:

1. **Do NOT** open a public issue
2. Email security@example.com with details
3. Include steps to reproduce if possible
4. Allow up to 48 hours for initial response

## Security Best Practices

When using this project:
- Keep dependencies up to date
- Use environment variables for secrets
- Enable two-factor authentication
- Follow the principle of least privilege

## Disclosure Policy

- Security issues will be patched within 30 days
- Public disclosure will occur after a patch is available
- Credit will be given to security researchers
"#;

const CODE_OF_CONDUCT: &str = r#"# Code of Conduct

## Our Pledge

We pledge to make participation in our project a harassment-free experience for everyone.

## Our Standards

Examples of behavior that contributes to creating a positive environment:
- Using welcoming and inclusive language
- Being respectful of differing viewpoints
- Gracefully accepting constructive criticism
- Focusing on what is best for the community

Examples of unacceptable behavior:
- Trolling, insulting/derogatory comments, and personal attacks
- Public or private harassment
- Publishing others' private information without permission
- Other conduct which could reasonably be considered inappropriate

## Enforcement

Instances of abusive behavior may be reported by contacting the project team.

## Attribution

This Code of Conduct is adapted from the Contributor Covenant, version 2.0.
"#;

/// Issue template for the given repository kind; unknown kinds fall back to
/// the general one.
pub fn issue_template(kind: &str) -> &'static str {
    match kind {
        "api" => ISSUE_TEMPLATE_API,
        _ => ISSUE_TEMPLATE_GENERAL,
    }
}

pub fn pr_template() -> &'static str {
    PR_TEMPLATE
}

pub fn security_policy() -> &'static str {
    SECURITY_POLICY
}

pub fn code_of_conduct() -> &'static str {
    CODE_OF_CONDUCT
}

/// Write the standard community files into a working copy: issue and PR
/// templates under `.github/`, plus SECURITY.md and CODE_OF_CONDUCT.md.
pub fn write_community_files(target: &Path) -> Result<()> {
    let github_dir = target.join(".github");
    let issue_dir = github_dir.join("ISSUE_TEMPLATE");
    fs::create_dir_all(&issue_dir)?;

    fs::write(issue_dir.join("bug_report.md"), issue_template("general"))?;
    fs::write(github_dir.join("PULL_REQUEST_TEMPLATE.md"), pr_template())?;
    fs::write(target.join("SECURITY.md"), security_policy())?;
    fs::write(target.join("CODE_OF_CONDUCT.md"), code_of_conduct())?;

    info!("generated community files in {:?}", target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_issue_template_kinds() {
        assert!(issue_template("api").contains("[API]"));
        assert!(issue_template("general").contains("[BUG]"));
        assert!(issue_template("something-else").contains("[BUG]"));
    }

    #[test]
    fn test_write_community_files() {
        let target = TempDir::new().unwrap();
        write_community_files(target.path()).unwrap();

        assert!(target
            .path()
            .join(".github/ISSUE_TEMPLATE/bug_report.md")
            .is_file());
        assert!(target.path().join(".github/PULL_REQUEST_TEMPLATE.md").is_file());
        assert!(target.path().join("SECURITY.md").is_file());
        assert!(target.path().join("CODE_OF_CONDUCT.md").is_file());
    }
}
