//! Interactive wizard command handler.

use crate::config::Config;
use crate::error::Result;
use crate::prompt::Prompter;
use crate::wizard::Wizard;

use super::{gh_client, git_repo};

/// Run the menu-driven wizard on stdin until the user exits.
///
/// Failures inside workflows are reported by the wizard itself, so this only
/// fails when the wizard cannot start.
pub fn wizard_command(config: Config) -> Result<()> {
    let client = gh_client(&config);
    let git = git_repo(&config);
    let mut wizard = Wizard::new(&client, &git, config, Prompter::stdin());
    wizard.run();
    Ok(())
}
