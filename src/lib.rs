//! GitHub CLI orchestration.
//!
//! Library behind three binaries:
//!
//! - `gh-issue-manager` - linked parent/child issues, `UPDATE`, `PROCESS_FILES`
//! - `gh-release-manager` - semver bump, Keep-a-Changelog section, GitHub release
//! - `gh-wizard` - a menu-driven front end over both
//!
//! All GitHub access goes through [`gh::GitHubClient`] and all git access
//! through [`git::GitRepo`]; the production implementations shell out to
//! `gh` and `git`.

pub mod changelog;
pub mod commands;
pub mod config;
pub mod error;
pub mod gh;
pub mod git;
pub mod issue;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod recovery;
pub mod release;
pub mod validate;
pub mod version;
pub mod wizard;

#[cfg(test)]
pub mod test_utils;

pub use error::{GhimError, Result};
pub use recovery::{ErrorHandler, ErrorKind};
pub use wizard::Wizard;
