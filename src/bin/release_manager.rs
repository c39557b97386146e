//! gh-release-manager entry point.
//!
//! Bumps the version from the latest git tag, prepends a changelog section,
//! updates the README and publishes a GitHub release.

use chrono::Local;
use clap::{ArgGroup, Parser};
use ghim::commands::{bootstrap, finish, gh_client, git_repo, parse_args, release_command};
use ghim::config::{ensure_tools, Config, REQUIRED_TOOLS};
use ghim::output::print_header;
use ghim::release::ReleaseOptions;
use ghim::version::{pre_release_identifier, BumpKind};
use ghim::Result;

#[derive(Parser)]
#[command(name = "gh-release-manager")]
#[command(
    version,
    about = "Create a semantic-versioned GitHub release with a generated changelog",
    group(ArgGroup::new("bump").args(["major", "minor", "patch"])),
    group(ArgGroup::new("channel").args(["alpha", "beta"])),
    after_help = "EXAMPLES:
    gh-release-manager                 # Patch release
    gh-release-manager -m              # Minor release
    gh-release-manager -M -d           # Preview a major release without writing
    gh-release-manager -a 1            # Patch release tagged vX.Y.Z-alpha.1
    gh-release-manager --close-issues  # Close issues referenced by fixes/closes/resolves #N

Commits since the last tag are grouped by conventional-commit type:
    feat -> Added, fix -> Fixed, everything else -> Changed.
CHANGELOG.md and README.md are copied to <file>.backup before they change."
)]
struct Cli {
    /// Bump the major version
    #[arg(short = 'M', long)]
    major: bool,

    /// Bump the minor version
    #[arg(short = 'm', long)]
    minor: bool,

    /// Bump the patch version (default)
    #[arg(short = 'p', long)]
    patch: bool,

    /// Mark as alpha pre-release with the given tag, e.g. `1` for `alpha.1`
    #[arg(short = 'a', long, value_name = "TAG")]
    alpha: Option<String>,

    /// Mark as beta pre-release with the given tag
    #[arg(short = 'b', long, value_name = "TAG")]
    beta: Option<String>,

    /// Show what would happen without writing files or creating the release
    #[arg(short = 'd', long)]
    dry_run: bool,

    /// Close issues referenced by the released commits
    #[arg(long)]
    close_issues: bool,
}

impl Cli {
    fn bump(&self) -> BumpKind {
        if self.major {
            BumpKind::Major
        } else if self.minor {
            BumpKind::Minor
        } else {
            BumpKind::Patch
        }
    }

    fn pre_release(&self) -> Option<String> {
        match (&self.alpha, &self.beta) {
            (Some(tag), _) => Some(pre_release_identifier("alpha", tag)),
            (None, Some(tag)) => Some(pre_release_identifier("beta", tag)),
            (None, None) => None,
        }
    }

    fn options(&self) -> ReleaseOptions {
        ReleaseOptions {
            bump: self.bump(),
            pre_release: self.pre_release(),
            dry_run: self.dry_run,
            close_issues: self.close_issues,
            ..Default::default()
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    // A dry run never calls gh.
    let tools: &[&str] = if cli.dry_run { &["git"] } else { REQUIRED_TOOLS };
    ensure_tools(tools)?;

    let client = gh_client(config);
    let git = git_repo(config);
    release_command(&client, &git, &cli.options(), Local::now().date_naive())?;
    Ok(())
}

fn main() {
    let cli: Cli = parse_args();

    let config = match bootstrap() {
        Ok(config) => config,
        Err(e) => std::process::exit(finish(&Config::default(), "configuration", Err(e))),
    };

    print_header("gh-release-manager");
    let code = finish(&config, "release", run(&cli, &config));
    std::process::exit(code);
}
