//! `gh` binary implementation of [`GitHubClient`].

use std::io;
use std::process::Command;

use serde::Deserialize;

use crate::config::ProjectRef;
use crate::error::{GhimError, Result};
use crate::logging::timed;

use super::client::GitHubClient;
use super::types::{
    Issue, IssueState, IssueUpdate, ReleaseInfo, ReleaseRequest, RepoId,
};

const ISSUE_FIELDS: &str = "number,title,body,state,url";
const RELEASE_FIELDS: &str = "tagName,name,publishedAt,isDraft,isPrerelease";

/// Runs the GitHub CLI.
#[derive(Debug, Clone, Default)]
pub struct GhCli {
    /// Log the duration of each call.
    perf: bool,
    /// Passed to `gh` as `GH_TOKEN` when set.
    token: Option<String>,
}

impl GhCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_performance_monitoring(mut self, enabled: bool) -> Self {
        self.perf = enabled;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("gh");
        if let Some(token) = &self.token {
            cmd.env("GH_TOKEN", token);
        }
        cmd
    }

    /// Run `gh` with `args`, returning trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let label = args.iter().take(2).copied().collect::<Vec<_>>().join(" ");
        tracing::debug!(command = %label, "running gh");

        timed(self.perf, &format!("gh {}", label), || {
            let output = self.command().args(args).output().map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    GhimError::DependencyMissing("gh".to_string())
                } else {
                    GhimError::Io(e)
                }
            })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                tracing::warn!(command = %label, %stderr, "gh failed");
                return Err(GhimError::GhCommand {
                    command: label.clone(),
                    stderr,
                });
            }

            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        })
    }

    fn issue_database_id(&self, number: u64) -> Result<u64> {
        let path = format!("repos/{{owner}}/{{repo}}/issues/{}", number);
        let stdout = self.run(&["api", &path, "--jq", ".id"])?;
        parse_id(&stdout)
    }
}

impl GitHubClient for GhCli {
    fn is_installed(&self) -> bool {
        Command::new("gh")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn is_authenticated(&self) -> bool {
        self.command()
            .args(["auth", "status"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn auth_login(&self) -> Result<()> {
        let status = Command::new("gh").args(["auth", "login"]).status()?;
        if !status.success() {
            return Err(GhimError::NotAuthenticated);
        }
        Ok(())
    }

    fn repo(&self) -> Result<RepoId> {
        let stdout = self.run(&["repo", "view", "--json", "owner,name"])?;
        parse_repo_json(&stdout)
    }

    fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        let stdout = self.run(&["issue", "create", "--title", title, "--body", body])?;
        let url = stdout
            .lines()
            .rev()
            .find(|l| l.starts_with("https://"))
            .unwrap_or(&stdout)
            .trim()
            .to_string();
        let number = parse_issue_url(&url)
            .ok_or_else(|| GhimError::GhOutput(format!("no issue URL in '{}'", stdout)))?;

        tracing::info!(number, %url, "issue created");
        Ok(Issue {
            number,
            title: title.to_string(),
            body: body.to_string(),
            state: IssueState::Open,
            url,
        })
    }

    fn view_issue(&self, number: u64) -> Result<Issue> {
        let n = number.to_string();
        let stdout = self.run(&["issue", "view", &n, "--json", ISSUE_FIELDS])?;
        Ok(serde_json::from_str(&stdout)?)
    }

    fn list_issues(&self, state: IssueState, limit: usize) -> Result<Vec<Issue>> {
        let limit = limit.to_string();
        let stdout = self.run(&[
            "issue",
            "list",
            "--state",
            state.as_str(),
            "--limit",
            &limit,
            "--json",
            ISSUE_FIELDS,
        ])?;
        parse_json_list(&stdout)
    }

    fn edit_issue(&self, number: u64, update: &IssueUpdate) -> Result<()> {
        if !update.has_content_changes() {
            return Ok(());
        }
        let n = number.to_string();
        let mut args = vec!["issue", "edit", n.as_str()];
        if let Some(title) = &update.title {
            args.extend(["--title", title.as_str()]);
        }
        if let Some(body) = &update.body {
            args.extend(["--body", body.as_str()]);
        }
        self.run(&args)?;
        Ok(())
    }

    fn set_issue_state(&self, number: u64, state: IssueState, comment: Option<&str>) -> Result<()> {
        let n = number.to_string();
        let verb = match state {
            IssueState::Open => "reopen",
            IssueState::Closed => "close",
        };
        let mut args = vec!["issue", verb, n.as_str()];
        if let Some(comment) = comment {
            args.extend(["--comment", comment]);
        }
        self.run(&args)?;
        Ok(())
    }

    fn link_sub_issue(&self, parent: u64, child: u64) -> Result<()> {
        let child_id = self.issue_database_id(child)?.to_string();
        let path = format!("repos/{{owner}}/{{repo}}/issues/{}/sub_issues", parent);
        let field = format!("sub_issue_id={}", child_id);
        self.run(&[
            "api",
            "--method",
            "POST",
            "-H",
            "Accept: application/vnd.github+json",
            &path,
            "-F",
            &field,
        ])?;
        tracing::info!(parent, child, "sub-issue linked");
        Ok(())
    }

    fn add_to_project(&self, project: &ProjectRef, issue_url: &str) -> Result<()> {
        let number = project.number.to_string();
        self.run(&[
            "project",
            "item-add",
            &number,
            "--owner",
            &project.owner,
            "--url",
            issue_url,
        ])?;
        Ok(())
    }

    fn create_release(&self, request: &ReleaseRequest) -> Result<String> {
        let notes_file = request.notes_file.to_string_lossy().to_string();
        let mut args = vec![
            "release",
            "create",
            request.tag.as_str(),
            "--title",
            request.title.as_str(),
            "--notes-file",
            notes_file.as_str(),
        ];
        if request.prerelease {
            args.push("--prerelease");
        }
        if let Some(target) = &request.target {
            args.extend(["--target", target.as_str()]);
        }
        let stdout = self.run(&args)?;
        Ok(stdout.lines().last().unwrap_or("").trim().to_string())
    }

    fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseInfo>> {
        let limit = limit.to_string();
        let stdout = self.run(&["release", "list", "--limit", &limit, "--json", RELEASE_FIELDS])?;
        parse_json_list(&stdout)
    }
}

// ============================================================================
// Output parsing
// ============================================================================

/// Extract the issue number from `https://github.com/<o>/<r>/issues/<n>`.
pub fn parse_issue_url(url: &str) -> Option<u64> {
    let mut segments = url.trim().trim_end_matches('/').rsplit('/');
    let number = segments.next()?.parse().ok()?;
    (segments.next()? == "issues").then_some(number)
}

fn parse_id(stdout: &str) -> Result<u64> {
    stdout
        .trim()
        .parse()
        .map_err(|_| GhimError::GhOutput(format!("expected a numeric id, got '{}'", stdout)))
}

/// Parse a JSON array; empty output means an empty list.
pub fn parse_json_list<T: serde::de::DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[derive(Deserialize)]
struct RepoView {
    name: String,
    owner: RepoOwner,
}

#[derive(Deserialize)]
struct RepoOwner {
    login: String,
}

/// Parse `gh repo view --json owner,name`.
pub fn parse_repo_json(stdout: &str) -> Result<RepoId> {
    let view: RepoView = serde_json::from_str(stdout.trim())?;
    Ok(RepoId {
        owner: view.owner.login,
        name: view.name,
    })
}
