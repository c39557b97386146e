//! Command handlers behind the binaries.
//!
//! Each handler takes its GitHub and git seams as trait objects so the
//! binaries pass the real `gh` / `git` wrappers and tests pass fakes.
//!
//! # Commands
//!
//! - [`issue`] - Linked issue creation, `UPDATE` and `PROCESS_FILES`
//! - [`release`] - Version bump, changelog and GitHub release
//! - [`wizard`] - The interactive menu

mod issue;
mod release;
mod wizard;

pub use issue::{create_issues_command, process_files_command, update_command, IssueArgs};
pub use release::release_command;
pub use wizard::wizard_command;

use crate::config::Config;
use crate::error::{GhimError, Result, EXIT_GENERAL, EXIT_SUCCESS};
use crate::gh::{GhCli, GitHubClient};
use crate::git::SystemGit;
use crate::logging;
use crate::recovery::{ErrorHandler, ErrorLog};

/// Parse the command line, printing clap's message and exiting on failure.
pub fn parse_args<P: clap::Parser>() -> P {
    match P::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_code(&e))
        }
    }
}

/// Help and version exit 0; every other usage error is a general failure.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.exit_code() == 0 {
        EXIT_SUCCESS
    } else {
        EXIT_GENERAL
    }
}

/// Load and validate configuration, then install logging.
pub fn bootstrap() -> Result<Config> {
    let config = Config::load()?;
    config.validate()?;
    logging::init(&config);
    Ok(config)
}

/// The `gh` wrapper configured from `config`.
pub fn gh_client(config: &Config) -> GhCli {
    GhCli::new()
        .with_performance_monitoring(config.performance_monitoring)
        .with_token(config.github_token.clone())
}

pub fn git_repo(config: &Config) -> SystemGit {
    SystemGit::new().with_performance_monitoring(config.performance_monitoring)
}

/// Fail unless `gh` is installed and logged in.
pub fn require_gh(client: &dyn GitHubClient) -> Result<()> {
    if !client.is_installed() {
        return Err(GhimError::DependencyMissing("gh".to_string()));
    }
    if !client.is_authenticated() {
        return Err(GhimError::NotAuthenticated);
    }
    Ok(())
}

/// Report a failed command once and map it to a process exit code.
pub fn finish(config: &Config, context: &str, result: Result<()>) -> i32 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let handler = ErrorHandler::new(ErrorLog::new(&config.error_log_file));
            handler.report(e.kind(), &e.to_string(), context);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_AUTH;
    use crate::gh::fake::FakeGitHub;
    use crate::recovery::ErrorKind;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config {
            error_log_file: dir.path().join("errors.log"),
            ..Config::default()
        }
    }

    #[test]
    fn test_require_gh() {
        let client = FakeGitHub::new();
        assert!(require_gh(&client).is_ok());

        client.set_authenticated(false);
        assert!(matches!(require_gh(&client), Err(GhimError::NotAuthenticated)));

        client.set_installed(false);
        assert!(matches!(
            require_gh(&client),
            Err(GhimError::DependencyMissing(tool)) if tool == "gh"
        ));
    }

    #[test]
    fn test_finish_success_logs_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        assert_eq!(finish(&config, "issue create", Ok(())), EXIT_SUCCESS);
        assert!(!config.error_log_file.exists());
    }

    #[test]
    fn test_finish_maps_exit_code_and_logs() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let code = finish(
            &config,
            "issue create",
            Err(GhimError::MissingArgument("CHILD_BODY".to_string())),
        );
        assert_eq!(code, EXIT_GENERAL);

        let code = finish(&config, "issue create", Err(GhimError::NotAuthenticated));
        assert_eq!(code, EXIT_AUTH);

        let stats = ErrorLog::new(&config.error_log_file).stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_kind.get(&ErrorKind::Input), Some(&1));
        assert_eq!(stats.by_kind.get(&ErrorKind::Auth), Some(&1));
    }
}
