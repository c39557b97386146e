//! Recording fakes for the GitHub client and git, used by tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;

use crate::config::ProjectRef;
use crate::error::{GhimError, Result};
use crate::git::{Commit, GitRepo};

use super::client::GitHubClient;
use super::types::{
    Issue, IssueState, IssueUpdate, ReleaseInfo, ReleaseRequest, RepoId,
};

/// A release created through the fake, with the notes read at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRelease {
    pub request: ReleaseRequest,
    pub notes: String,
}

#[derive(Default)]
struct State {
    issues: Vec<Issue>,
    next_number: u64,
    links: Vec<(u64, u64)>,
    project_items: Vec<String>,
    state_changes: Vec<(u64, IssueState, Option<String>)>,
    releases: Vec<CreatedRelease>,
    listed_releases: Vec<ReleaseInfo>,
    /// Operation name -> (remaining failures, stderr). `u32::MAX` never runs out.
    failures: HashMap<&'static str, (u32, String)>,
    calls: Vec<String>,
}

/// In-memory GitHub that records every call.
pub struct FakeGitHub {
    installed: Cell<bool>,
    authenticated: Cell<bool>,
    login_succeeds: Cell<bool>,
    state: RefCell<State>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            installed: Cell::new(true),
            authenticated: Cell::new(true),
            login_succeeds: Cell::new(true),
            state: RefCell::new(State {
                next_number: 1,
                ..Default::default()
            }),
        }
    }

    pub fn set_installed(&self, installed: bool) {
        self.installed.set(installed);
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.set(authenticated);
    }

    pub fn set_login_succeeds(&self, succeeds: bool) {
        self.login_succeeds.set(succeeds);
    }

    /// Make every call to `op` fail with `stderr`.
    pub fn fail(&self, op: &'static str, stderr: &str) {
        self.fail_times(op, u32::MAX, stderr);
    }

    /// Make the next `times` calls to `op` fail with `stderr`.
    pub fn fail_times(&self, op: &'static str, times: u32, stderr: &str) {
        self.state
            .borrow_mut()
            .failures
            .insert(op, (times, stderr.to_string()));
    }

    pub fn add_issue(&self, title: &str, body: &str) -> Issue {
        let mut state = self.state.borrow_mut();
        let number = state.next_number;
        state.next_number += 1;
        let issue = Issue {
            number,
            title: title.to_string(),
            body: body.to_string(),
            state: IssueState::Open,
            url: format!("https://github.com/acme/widgets/issues/{}", number),
        };
        state.issues.push(issue.clone());
        issue
    }

    pub fn add_listed_release(&self, tag: &str) {
        self.state.borrow_mut().listed_releases.push(ReleaseInfo {
            tag_name: tag.to_string(),
            name: tag.to_string(),
            published_at: Some("2026-01-01T00:00:00Z".to_string()),
            is_draft: false,
            is_prerelease: false,
        });
    }

    pub fn issues(&self) -> Vec<Issue> {
        self.state.borrow().issues.clone()
    }

    pub fn issue(&self, number: u64) -> Option<Issue> {
        self.state
            .borrow()
            .issues
            .iter()
            .find(|i| i.number == number)
            .cloned()
    }

    pub fn links(&self) -> Vec<(u64, u64)> {
        self.state.borrow().links.clone()
    }

    pub fn project_items(&self) -> Vec<String> {
        self.state.borrow().project_items.clone()
    }

    pub fn state_changes(&self) -> Vec<(u64, IssueState, Option<String>)> {
        self.state.borrow().state_changes.clone()
    }

    pub fn releases(&self) -> Vec<CreatedRelease> {
        self.state.borrow().releases.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.state.borrow().calls.iter().filter(|c| *c == op).count()
    }

    fn enter(&self, op: &'static str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(op.to_string());
        if let Some((remaining, stderr)) = state.failures.get_mut(op) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(GhimError::GhCommand {
                    command: op.to_string(),
                    stderr: stderr.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for FakeGitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubClient for FakeGitHub {
    fn is_installed(&self) -> bool {
        self.installed.get()
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.get()
    }

    fn auth_login(&self) -> Result<()> {
        self.enter("auth_login")?;
        if self.login_succeeds.get() {
            self.authenticated.set(true);
            Ok(())
        } else {
            Err(GhimError::NotAuthenticated)
        }
    }

    fn repo(&self) -> Result<RepoId> {
        self.enter("repo")?;
        Ok(RepoId {
            owner: "acme".to_string(),
            name: "widgets".to_string(),
        })
    }

    fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        self.enter("create_issue")?;
        Ok(self.add_issue(title, body))
    }

    fn view_issue(&self, number: u64) -> Result<Issue> {
        self.enter("view_issue")?;
        self.issue(number).ok_or_else(|| GhimError::GhCommand {
            command: "issue view".to_string(),
            stderr: format!(
                "GraphQL: Could not resolve to an issue or pull request with the number of {}.",
                number
            ),
        })
    }

    fn list_issues(&self, state: IssueState, limit: usize) -> Result<Vec<Issue>> {
        self.enter("list_issues")?;
        Ok(self
            .issues()
            .into_iter()
            .filter(|i| i.state == state)
            .take(limit)
            .collect())
    }

    fn edit_issue(&self, number: u64, update: &IssueUpdate) -> Result<()> {
        self.enter("edit_issue")?;
        let mut state = self.state.borrow_mut();
        let issue = state
            .issues
            .iter_mut()
            .find(|i| i.number == number)
            .ok_or_else(|| GhimError::GhCommand {
                command: "issue edit".to_string(),
                stderr: "HTTP 404: Not Found".to_string(),
            })?;
        if let Some(title) = &update.title {
            issue.title = title.clone();
        }
        if let Some(body) = &update.body {
            issue.body = body.clone();
        }
        Ok(())
    }

    fn set_issue_state(&self, number: u64, new_state: IssueState, comment: Option<&str>) -> Result<()> {
        self.enter("set_issue_state")?;
        let mut state = self.state.borrow_mut();
        if let Some(issue) = state.issues.iter_mut().find(|i| i.number == number) {
            issue.state = new_state;
        }
        state
            .state_changes
            .push((number, new_state, comment.map(str::to_string)));
        Ok(())
    }

    fn link_sub_issue(&self, parent: u64, child: u64) -> Result<()> {
        self.enter("link_sub_issue")?;
        self.state.borrow_mut().links.push((parent, child));
        Ok(())
    }

    fn add_to_project(&self, _project: &ProjectRef, issue_url: &str) -> Result<()> {
        self.enter("add_to_project")?;
        self.state
            .borrow_mut()
            .project_items
            .push(issue_url.to_string());
        Ok(())
    }

    fn create_release(&self, request: &ReleaseRequest) -> Result<String> {
        self.enter("create_release")?;
        let notes = fs::read_to_string(&request.notes_file)?;
        self.state.borrow_mut().releases.push(CreatedRelease {
            request: request.clone(),
            notes,
        });
        Ok(format!(
            "https://github.com/acme/widgets/releases/tag/{}",
            request.tag
        ))
    }

    fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseInfo>> {
        self.enter("list_releases")?;
        Ok(self
            .state
            .borrow()
            .listed_releases
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}

/// In-memory git repository.
pub struct FakeGit {
    pub branch: String,
    pub tag: Option<String>,
    pub commits: Vec<Commit>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self {
            branch: "main".to_string(),
            tag: None,
            commits: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn with_commit(mut self, subject: &str, body: &str) -> Self {
        self.commits.push(Commit::new(subject, body));
        self
    }
}

impl Default for FakeGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRepo for FakeGit {
    fn is_git_repo(&self) -> bool {
        true
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self.tag.clone())
    }

    fn commits_since(&self, _tag: Option<&str>) -> Result<Vec<Commit>> {
        Ok(self.commits.clone())
    }
}
