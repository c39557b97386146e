//! Core types for GitHub issue and release operations.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{GhimError, Result};

/// Open/closed state of an issue. `gh` reports it in upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueState {
    type Err = GhimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            other => Err(GhimError::InvalidInput(format!(
                "state must be open or closed (got '{}')",
                other
            ))),
        }
    }
}

/// A GitHub issue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub state: IssueState,
    #[serde(default)]
    pub url: String,
}

/// Fields to change on an existing issue. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub state: Option<IssueState>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.state.is_none()
    }

    /// Whether title or body change (state changes use a separate call).
    pub fn has_content_changes(&self) -> bool {
        self.title.is_some() || self.body.is_some()
    }
}

/// A published or draft release as listed by `gh release list`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_prerelease: bool,
}

/// Parameters for `gh release create`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRequest {
    pub tag: String,
    pub title: String,
    pub notes_file: PathBuf,
    pub prerelease: bool,
    pub target: Option<String>,
}

/// Repository owner and name as reported by `gh repo view`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

/// Repository the tools operate on, fetched once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub authenticated: bool,
}

impl RepoContext {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_state_parse() {
        assert_eq!("OPEN".parse::<IssueState>().unwrap(), IssueState::Open);
        assert_eq!("closed".parse::<IssueState>().unwrap(), IssueState::Closed);
        assert!("merged".parse::<IssueState>().is_err());
    }

    #[test]
    fn test_issue_deserializes_gh_json() {
        let json = r#"{"number":7,"title":"Parent","body":"b","state":"OPEN","url":"https://github.com/a/b/issues/7"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.number, 7);
        assert_eq!(issue.state, IssueState::Open);
    }

    #[test]
    fn test_issue_update_is_empty() {
        assert!(IssueUpdate::default().is_empty());
        let update = IssueUpdate {
            state: Some(IssueState::Closed),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(!update.has_content_changes());
    }

    #[test]
    fn test_repo_full_name() {
        let repo = RepoContext {
            owner: "acme".into(),
            name: "tools".into(),
            branch: "main".into(),
            authenticated: true,
        };
        assert_eq!(repo.full_name(), "acme/tools");
    }
}
