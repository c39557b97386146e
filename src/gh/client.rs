//! The GitHub client seam.
//!
//! Every GitHub-side effect goes through [`GitHubClient`]. Production code
//! uses [`super::GhCli`], tests use the recording fake.

use crate::config::ProjectRef;
use crate::error::{GhimError, Result};
use crate::git::GitRepo;

use super::types::{
    Issue, IssueState, IssueUpdate, ReleaseInfo, ReleaseRequest, RepoContext, RepoId,
};

pub trait GitHubClient {
    /// Whether the client binary is available.
    fn is_installed(&self) -> bool;

    fn is_authenticated(&self) -> bool;

    /// Run the interactive login flow.
    fn auth_login(&self) -> Result<()>;

    fn repo(&self) -> Result<RepoId>;

    fn create_issue(&self, title: &str, body: &str) -> Result<Issue>;

    fn view_issue(&self, number: u64) -> Result<Issue>;

    fn list_issues(&self, state: IssueState, limit: usize) -> Result<Vec<Issue>>;

    /// Change title and/or body. State changes go through `set_issue_state`.
    fn edit_issue(&self, number: u64, update: &IssueUpdate) -> Result<()>;

    fn set_issue_state(&self, number: u64, state: IssueState, comment: Option<&str>) -> Result<()>;

    /// Link `child` as a native sub-issue of `parent`.
    fn link_sub_issue(&self, parent: u64, child: u64) -> Result<()>;

    fn add_to_project(&self, project: &ProjectRef, issue_url: &str) -> Result<()>;

    /// Create a release and return its URL.
    fn create_release(&self, request: &ReleaseRequest) -> Result<String>;

    fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseInfo>>;
}

impl RepoContext {
    /// Gather owner, name, branch and auth state once for the run.
    pub fn fetch(client: &dyn GitHubClient, git: &dyn GitRepo) -> Result<Self> {
        if !client.is_installed() {
            return Err(GhimError::DependencyMissing("gh".to_string()));
        }
        if !client.is_authenticated() {
            return Err(GhimError::NotAuthenticated);
        }
        let repo = client.repo()?;
        let branch = git.current_branch()?;
        tracing::info!(owner = %repo.owner, repo = %repo.name, %branch, "repository context");

        Ok(Self {
            owner: repo.owner,
            name: repo.name,
            branch,
            authenticated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gh::fake::{FakeGit, FakeGitHub};

    #[test]
    fn test_fetch_repo_context() {
        let client = FakeGitHub::new();
        let git = FakeGit::new();
        let context = RepoContext::fetch(&client, &git).unwrap();
        assert_eq!(context.full_name(), "acme/widgets");
        assert_eq!(context.branch, "main");
        assert!(context.authenticated);
    }

    #[test]
    fn test_fetch_requires_auth() {
        let client = FakeGitHub::new();
        client.set_authenticated(false);
        let err = RepoContext::fetch(&client, &FakeGit::new()).unwrap_err();
        assert!(matches!(err, GhimError::NotAuthenticated));
    }

    #[test]
    fn test_fetch_requires_gh() {
        let client = FakeGitHub::new();
        client.set_installed(false);
        let err = RepoContext::fetch(&client, &FakeGit::new()).unwrap_err();
        assert!(matches!(err, GhimError::DependencyMissing(_)));
    }
}
