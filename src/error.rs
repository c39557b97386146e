use std::path::PathBuf;
use thiserror::Error;

use crate::recovery::ErrorKind;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for general and validation failures.
pub const EXIT_GENERAL: i32 = 1;
/// Exit code for authentication failures.
pub const EXIT_AUTH: i32 = 2;
/// Exit code for network and GitHub API failures.
pub const EXIT_NETWORK: i32 = 3;

#[derive(Error, Debug)]
pub enum GhimError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid version '{0}': expected MAJOR.MINOR.PATCH with non-negative integers")]
    InvalidVersion(String),

    #[error("Invalid pre-release tag '{0}'")]
    InvalidPreRelease(String),

    #[error("Required tool not found: {0}")]
    DependencyMissing(String),

    #[error("Not authenticated with GitHub CLI (run 'gh auth login')")]
    NotAuthenticated,

    #[error("gh {command} failed: {stderr}")]
    GhCommand { command: String, stderr: String },

    #[error("Unexpected gh output: {0}")]
    GhOutput(String),

    #[error("Git error: {0}")]
    GitError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("Issue #{0} has no \"Files to Create\" section")]
    NoFilesSection(u64),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GhimError {
    /// Map this error onto the failure taxonomy used by the recovery handlers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GhimError::MissingArgument(_)
            | GhimError::InvalidInput(_)
            | GhimError::InvalidVersion(_)
            | GhimError::InvalidPreRelease(_)
            | GhimError::NoFilesSection(_)
            | GhimError::Cancelled => ErrorKind::Input,
            GhimError::DependencyMissing(_) => ErrorKind::Dependency,
            GhimError::NotAuthenticated => ErrorKind::Auth,
            GhimError::GhCommand { stderr, .. } => match crate::recovery::classify(stderr) {
                ErrorKind::Unknown => ErrorKind::GitHub,
                kind => kind,
            },
            GhimError::GhOutput(_) => ErrorKind::GitHub,
            GhimError::Config(_) | GhimError::ConfigExists(_) => ErrorKind::Config,
            GhimError::GitError(_) | GhimError::Io(_) | GhimError::Json(_) => ErrorKind::Unknown,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Auth => EXIT_AUTH,
            ErrorKind::Network | ErrorKind::GitHub => EXIT_NETWORK,
            _ => EXIT_GENERAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, GhimError>;
