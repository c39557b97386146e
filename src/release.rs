//! Release workflow: plan the next version, update the changelog and README,
//! create the GitHub release and close resolved issues.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::changelog::{
    backup_file, collect_entries, find_resolved_issues, prepend_section, render_section,
    replace_version, ChangeEntry,
};
use crate::error::Result;
use crate::gh::{GitHubClient, IssueState, ReleaseRequest};
use crate::git::GitRepo;
use crate::output::{
    print_info, print_section_banner, print_success, print_warning, BannerColor, Spinner, BOLD,
    GRAY, RESET,
};
use crate::version::{version_from_tag, BumpKind, VersionInfo};

pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";
pub const DEFAULT_README: &str = "README.md";

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    pub bump: BumpKind,
    /// Full pre-release identifier, e.g. `alpha.1`.
    pub pre_release: Option<String>,
    pub dry_run: bool,
    pub close_issues: bool,
    pub changelog_path: PathBuf,
    pub readme_path: PathBuf,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            bump: BumpKind::Patch,
            pre_release: None,
            dry_run: false,
            close_issues: false,
            changelog_path: PathBuf::from(DEFAULT_CHANGELOG),
            readme_path: PathBuf::from(DEFAULT_README),
        }
    }
}

/// Everything computed for a release before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub version: VersionInfo,
    pub previous_tag: Option<String>,
    pub entries: Vec<ChangeEntry>,
    /// Changelog section including its `## [vX.Y.Z] - date` header.
    pub section: String,
    pub resolved_issues: Vec<u64>,
}

impl ReleasePlan {
    pub fn tag(&self) -> String {
        self.version.next_tag()
    }

    /// Release notes: the changelog section without its header line.
    pub fn notes(&self) -> String {
        let body = self
            .section
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or("");
        format!("{}\n", body.trim())
    }
}

/// What a release run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseOutcome {
    pub tag: String,
    pub dry_run: bool,
    pub url: Option<String>,
    pub backups: Vec<PathBuf>,
    pub closed_issues: Vec<u64>,
    /// Issues that could not be closed, with the reason.
    pub close_failures: Vec<(u64, String)>,
}

/// Compute the next version and changelog section from git history.
pub fn plan_release(
    git: &dyn GitRepo,
    bump: BumpKind,
    pre_release: Option<&str>,
    date: NaiveDate,
) -> Result<ReleasePlan> {
    let previous_tag = git.latest_tag()?;
    let current = version_from_tag(previous_tag.as_deref())?;
    let version = VersionInfo::compute(&current.to_string(), bump, pre_release)?;

    let commits = git.commits_since(previous_tag.as_deref())?;
    let entries = collect_entries(&commits);
    let section = render_section(&version.next_tag(), date, &entries);
    let resolved_issues = find_resolved_issues(&commits);

    tracing::info!(
        current = %version.current,
        next = %version.next,
        bump = %bump,
        commits = commits.len(),
        "release planned"
    );

    Ok(ReleasePlan {
        version,
        previous_tag,
        entries,
        section,
        resolved_issues,
    })
}

/// Print the computed plan.
pub fn print_plan(plan: &ReleasePlan, options: &ReleaseOptions) {
    print_section_banner(&format!("Release {}", plan.tag()), BannerColor::Cyan);
    println!(
        "{BOLD}Current version:{RESET} {}  {GRAY}({}){RESET}",
        plan.version.current,
        plan.previous_tag.as_deref().unwrap_or("no tags yet")
    );
    println!("{BOLD}Next version:{RESET}    {}", plan.version.next);
    println!("{BOLD}Bump:{RESET}            {}", plan.version.bump);
    if let Some(pre) = &plan.version.pre_release {
        println!("{BOLD}Pre-release:{RESET}     {}", pre);
    }
    println!();
    println!("{}", plan.section.trim_end());
    println!();
    if options.close_issues && !plan.resolved_issues.is_empty() {
        let list: Vec<String> = plan.resolved_issues.iter().map(|n| format!("#{}", n)).collect();
        print_info(&format!("Issues to close: {}", list.join(", ")));
    }
}

/// Changelog and README contents after the release, without writing them.
pub fn updated_files(plan: &ReleasePlan, options: &ReleaseOptions) -> Result<(String, Option<String>)> {
    let existing = read_optional(&options.changelog_path)?;
    let changelog = prepend_section(existing.as_deref(), &plan.section);

    let readme = read_optional(&options.readme_path)?.map(|text| {
        replace_version(
            &text,
            &plan.version.current.to_string(),
            &plan.version.next.to_string(),
        )
    });
    Ok((changelog, readme))
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if path.exists() {
        Ok(Some(fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

/// Apply a plan. In dry-run mode this only prints what would happen.
pub fn execute_release(
    client: &dyn GitHubClient,
    plan: &ReleasePlan,
    options: &ReleaseOptions,
) -> Result<ReleaseOutcome> {
    let mut outcome = ReleaseOutcome {
        tag: plan.tag(),
        dry_run: options.dry_run,
        ..Default::default()
    };

    let (changelog, readme) = updated_files(plan, options)?;

    if options.dry_run {
        print_plan(plan, options);
        print_info(&format!(
            "Dry run: would update {} and {}, then create release {}",
            options.changelog_path.display(),
            options.readme_path.display(),
            outcome.tag
        ));
        tracing::info!(tag = %outcome.tag, "dry run, nothing written");
        return Ok(outcome);
    }

    let mut rewritten = Rewritten::default();
    match publish(client, plan, options, (changelog, readme), &mut rewritten, &mut outcome) {
        Ok(url) => outcome.url = Some(url),
        Err(e) => {
            rewritten.restore();
            return Err(e);
        }
    }

    if options.close_issues {
        close_resolved_issues(client, plan, &mut outcome);
    }

    Ok(outcome)
}

/// Write the updated files, then create the release. Returns the release URL.
fn publish(
    client: &dyn GitHubClient,
    plan: &ReleasePlan,
    options: &ReleaseOptions,
    (changelog, readme): (String, Option<String>),
    rewritten: &mut Rewritten,
    outcome: &mut ReleaseOutcome,
) -> Result<String> {
    outcome.backups.extend(backup_file(&options.changelog_path)?);
    rewritten.write(&options.changelog_path, &changelog)?;
    print_success(&format!("Updated {}", options.changelog_path.display()));

    if let Some(readme) = readme {
        outcome.backups.extend(backup_file(&options.readme_path)?);
        rewritten.write(&options.readme_path, &readme)?;
        print_success(&format!("Updated {}", options.readme_path.display()));
    }

    // Removed when dropped, including on the error path
    let mut notes_file = NamedTempFile::new()?;
    notes_file.write_all(plan.notes().as_bytes())?;
    notes_file.flush()?;

    let request = ReleaseRequest {
        tag: outcome.tag.clone(),
        title: outcome.tag.clone(),
        notes_file: notes_file.path().to_path_buf(),
        prerelease: plan.version.is_pre_release(),
        target: None,
    };

    let spinner = Spinner::start(&format!("Creating release {}", outcome.tag));
    match client.create_release(&request) {
        Ok(url) => {
            spinner.finish_success();
            print_success(&format!("Release {} created: {}", outcome.tag, url));
            tracing::info!(tag = %outcome.tag, %url, "release created");
            Ok(url)
        }
        Err(e) => {
            spinner.finish_error(&e.to_string());
            Err(e)
        }
    }
}

/// Files written during a release together with their previous contents.
#[derive(Debug, Default)]
struct Rewritten {
    files: Vec<(PathBuf, Option<String>)>,
}

impl Rewritten {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        let previous = read_optional(path)?;
        self.files.push((path.to_path_buf(), previous));
        fs::write(path, contents)?;
        Ok(())
    }

    /// Put every written file back; files that did not exist are removed.
    fn restore(&self) {
        for (path, previous) in self.files.iter().rev() {
            let result = match previous {
                Some(contents) => fs::write(path, contents),
                None => fs::remove_file(path),
            };
            match result {
                Ok(()) => print_info(&format!("Restored {}", path.display())),
                Err(e) => {
                    print_warning(&format!("Could not restore {}: {}", path.display(), e));
                    tracing::warn!(path = %path.display(), error = %e, "restore failed");
                }
            }
        }
    }
}

fn close_resolved_issues(client: &dyn GitHubClient, plan: &ReleasePlan, outcome: &mut ReleaseOutcome) {
    let comment = format!("Resolved in {}", outcome.tag);
    for &number in &plan.resolved_issues {
        match client.set_issue_state(number, IssueState::Closed, Some(&comment)) {
            Ok(()) => {
                print_success(&format!("Closed #{}", number));
                outcome.closed_issues.push(number);
            }
            Err(e) => {
                print_warning(&format!("Could not close #{}: {}", number, e));
                tracing::warn!(issue = number, error = %e, "close failed");
                outcome.close_failures.push((number, e.to_string()));
            }
        }
    }
}
