use crate::error::{GhimError, Result};
use std::process::Command;

/// Separates commit records in `git log` output.
const RECORD_SEPARATOR: char = '\u{1e}';

/// A commit's subject line and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub subject: String,
    pub body: String,
}

impl Commit {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Git queries the release workflow and repo context need.
pub trait GitRepo {
    fn is_git_repo(&self) -> bool;

    fn current_branch(&self) -> Result<String>;

    /// Most recent tag reachable from HEAD, `None` when there are no tags.
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Commits after `tag` (all commits when `None`), newest first.
    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<Commit>>;
}

/// [`GitRepo`] backed by the `git` binary in the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit {
    perf: bool,
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_performance_monitoring(mut self, enabled: bool) -> Self {
        self.perf = enabled;
        self
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        let label = format!("git {}", args.first().copied().unwrap_or(""));
        crate::logging::timed(self.perf, &label, || {
            Command::new("git").args(args).output().map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GhimError::DependencyMissing("git".to_string())
                } else {
                    GhimError::Io(e)
                }
            })
        })
    }
}

impl GitRepo for SystemGit {
    fn is_git_repo(&self) -> bool {
        self.run(&["rev-parse", "--git-dir"])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn current_branch(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;

        if !output.status.success() {
            return Err(GhimError::GitError(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        let output = self.run(&["describe", "--tags", "--abbrev=0"])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("No names found")
                || stderr.contains("No tags can describe")
                || stderr.contains("cannot describe anything")
            {
                return Ok(None);
            }
            return Err(GhimError::GitError(stderr.trim().to_string()));
        }

        let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!tag.is_empty()).then_some(tag))
    }

    fn commits_since(&self, tag: Option<&str>) -> Result<Vec<Commit>> {
        let range = match tag {
            Some(tag) => format!("{}..HEAD", tag),
            None => "HEAD".to_string(),
        };
        let output = self.run(&["log", &range, "--no-merges", "--pretty=format:%s%n%b%x1e"])?;

        if !output.status.success() {
            return Err(GhimError::GitError(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_log(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `git log --pretty=format:%s%n%b%x1e` output.
pub fn parse_log(output: &str) -> Vec<Commit> {
    output
        .split(RECORD_SEPARATOR)
        .map(|record| record.trim_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .map(|record| {
            let (subject, body) = record.split_once('\n').unwrap_or((record, ""));
            Commit::new(subject.trim(), body.trim())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_records() {
        let output = "feat: add login\nLonger body\n\nFixes #12\n\u{1e}\nfix: typo\n\n\u{1e}\ndocs: readme\n\u{1e}";
        let commits = parse_log(output);

        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0].subject, "feat: add login");
        assert_eq!(commits[0].body, "Longer body\n\nFixes #12");
        assert_eq!(commits[1], Commit::new("fix: typo", ""));
        assert_eq!(commits[2].subject, "docs: readme");
    }

    #[test]
    fn test_parse_log_empty() {
        assert!(parse_log("").is_empty());
        assert!(parse_log("\n\u{1e}\n").is_empty());
    }

    #[test]
    fn test_commit_new() {
        let commit = Commit::new("chore: bump", "");
        assert_eq!(commit.subject, "chore: bump");
        assert!(commit.body.is_empty());
    }
}
