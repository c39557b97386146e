//! gh-issue-manager entry point.
//!
//! Creates linked parent/child issues, updates issues, and turns a
//! "Files to Create" list into linked sub-issues.

use clap::{Parser, Subcommand};
use ghim::commands::{
    bootstrap, create_issues_command, finish, gh_client, parse_args, process_files_command,
    update_command, IssueArgs,
};
use ghim::config::{ensure_dependencies, Config};
use ghim::gh::{IssueState, IssueUpdate};
use ghim::output::print_header;
use ghim::Result;

#[derive(Parser)]
#[command(name = "gh-issue-manager")]
#[command(
    version,
    about = "Create linked parent/child GitHub issues and add them to a project",
    args_conflicts_with_subcommands = true,
    after_help = "EXAMPLES:
    # Create a parent issue and a linked child issue
    gh-issue-manager \"Epic: search\" \"Track search work\" \"Index documents\" \"Build the index\"

    # Close an issue and retitle it
    gh-issue-manager UPDATE 42 --title \"Search (done)\" --state closed

    # Create one sub-issue per entry of the issue's \"Files to Create\" list
    gh-issue-manager PROCESS_FILES 42

ENVIRONMENT:
    PROJECT_URL     Project board to add new issues to
    GITHUB_TOKEN    Token used instead of the stored gh login
    ENABLE_LOGGING  Write a rotating log to LOG_FILE
    Values are also read from ./.env; the process environment wins."
)]
struct Cli {
    /// Title of the parent issue
    parent_title: Option<String>,

    /// Body of the parent issue
    parent_body: Option<String>,

    /// Title of the child issue
    child_title: Option<String>,

    /// Body of the child issue
    child_body: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Update the title, body or state of an existing issue
    #[command(name = "UPDATE")]
    Update {
        /// Issue to update
        issue_number: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        body: Option<String>,

        /// New state: open or closed
        #[arg(long, value_parser = parse_state)]
        state: Option<IssueState>,
    },

    /// Create a linked sub-issue for every file listed under "Files to Create"
    #[command(name = "PROCESS_FILES")]
    ProcessFiles {
        /// Issue whose body lists the files
        issue_number: u64,
    },
}

fn parse_state(raw: &str) -> std::result::Result<IssueState, String> {
    raw.parse().map_err(|e: ghim::GhimError| e.to_string())
}

impl Cli {
    fn context(&self) -> &'static str {
        match self.command {
            Some(Commands::Update { .. }) => "issue update",
            Some(Commands::ProcessFiles { .. }) => "process files",
            None => "issue create",
        }
    }

    fn issue_args(&self) -> IssueArgs {
        let arg = |value: &Option<String>| value.clone().unwrap_or_default();
        IssueArgs {
            parent_title: arg(&self.parent_title),
            parent_body: arg(&self.parent_body),
            child_title: arg(&self.child_title),
            child_body: arg(&self.child_body),
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    ensure_dependencies()?;
    let client = gh_client(config);

    match &cli.command {
        Some(Commands::Update {
            issue_number,
            title,
            body,
            state,
        }) => {
            let update = IssueUpdate {
                title: title.clone(),
                body: body.clone(),
                state: *state,
            };
            update_command(&client, *issue_number, &update)?;
        }
        Some(Commands::ProcessFiles { issue_number }) => {
            process_files_command(&client, *issue_number)?;
        }
        None => {
            let project = config.project()?;
            create_issues_command(&client, project.as_ref(), &cli.issue_args())?;
        }
    }
    Ok(())
}

fn main() {
    let cli: Cli = parse_args();

    let config = match bootstrap() {
        Ok(config) => config,
        Err(e) => std::process::exit(finish(&Config::default(), "configuration", Err(e))),
    };

    print_header("gh-issue-manager");
    let code = finish(&config, cli.context(), run(&cli, &config));
    std::process::exit(code);
}
