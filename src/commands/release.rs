//! Release manager command handler.

use chrono::NaiveDate;

use crate::error::{GhimError, Result};
use crate::gh::GitHubClient;
use crate::git::GitRepo;
use crate::output::{print_success, print_warning};
use crate::release::{execute_release, plan_release, print_plan, ReleaseOptions, ReleaseOutcome};

use super::require_gh;

/// Plan the next release from git history and apply it.
///
/// A dry run needs neither `gh` nor authentication and writes nothing.
pub fn release_command(
    client: &dyn GitHubClient,
    git: &dyn GitRepo,
    options: &ReleaseOptions,
    today: NaiveDate,
) -> Result<ReleaseOutcome> {
    if !git.is_git_repo() {
        return Err(GhimError::GitError("not inside a git repository".to_string()));
    }

    let plan = plan_release(git, options.bump, options.pre_release.as_deref(), today)?;
    if options.dry_run {
        return execute_release(client, &plan, options);
    }

    require_gh(client)?;
    print_plan(&plan, options);
    let outcome = execute_release(client, &plan, options)?;

    if !outcome.close_failures.is_empty() {
        print_warning(&format!(
            "{} issue(s) could not be closed",
            outcome.close_failures.len()
        ));
    }
    print_success(&format!("Released {}", outcome.tag));
    Ok(outcome)
}
