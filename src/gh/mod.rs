//! GitHub CLI integration for issue and release operations.
//!
//! # Modules
//!
//! - [`types`] - Issues, releases, and repository context
//! - [`client`] - The [`GitHubClient`] trait every GitHub call goes through
//! - [`command`] - [`GhCli`], the implementation that runs the `gh` binary

mod client;
mod command;
#[cfg(test)]
pub mod fake;
mod types;

pub use client::GitHubClient;
pub use command::{parse_issue_url, parse_json_list, parse_repo_json, GhCli};
pub use types::{
    Issue, IssueState, IssueUpdate, ReleaseInfo, ReleaseRequest, RepoContext, RepoId,
};
