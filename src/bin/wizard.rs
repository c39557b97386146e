//! gh-wizard entry point.
//!
//! Menu-driven front end over the issue and release workflows.

use clap::Parser;
use ghim::commands::{bootstrap, finish, parse_args, wizard_command};
use ghim::config::Config;

#[derive(Parser)]
#[command(name = "gh-wizard")]
#[command(
    version,
    about = "Interactive menu for repository status, issues, releases and configuration",
    after_help = "MENUS:
    1) Status   Repository overview, open issues, recent releases, error stats
    2) Issue    Create linked issues, update, process files, view
    3) Release  Current version, preview, create
    4) Config   Show, validate, create .env, clear error log
    5) Exit

Invalid choices are rejected without leaving the current menu.
End of input exits the wizard."
)]
struct Cli {}

fn main() {
    let _cli: Cli = parse_args();

    let config = match bootstrap() {
        Ok(config) => config,
        Err(e) => std::process::exit(finish(&Config::default(), "configuration", Err(e))),
    };

    let error_config = config.clone();
    let code = finish(&error_config, "wizard", wizard_command(config));
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghim::commands::usage_exit_code;
    use ghim::error::EXIT_GENERAL;

    #[test]
    fn test_takes_no_arguments() {
        assert!(Cli::try_parse_from(["gh-wizard"]).is_ok());
        assert!(Cli::try_parse_from(["gh-wizard", "extra"]).is_err());
    }

    #[test]
    fn test_unexpected_argument_exits_general() {
        let err = Cli::try_parse_from(["gh-wizard", "extra"]).err().unwrap();
        assert_eq!(usage_exit_code(&err), EXIT_GENERAL);
    }
}
