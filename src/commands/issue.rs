//! Issue manager command handlers.

use crate::config::ProjectRef;
use crate::error::Result;
use crate::gh::{GitHubClient, IssueUpdate};
use crate::issue::{
    create_linked_issues, process_files, update_issue, LinkedIssues, ProcessedFiles,
    StepOutcome, UpdateOutcome,
};
use crate::output::{
    make_progress_bar, print_action, print_info, print_section_banner, print_success,
    print_warning, BannerColor, BOLD, GRAY, RESET,
};
use crate::validate::validate_issue_args;

use super::require_gh;

/// Positional arguments of the default command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueArgs {
    pub parent_title: String,
    pub parent_body: String,
    pub child_title: String,
    pub child_body: String,
}

/// Create a parent and child issue, link them and add both to the project.
///
/// Link and project failures are printed as warnings and do not fail the
/// command.
pub fn create_issues_command(
    client: &dyn GitHubClient,
    project: Option<&ProjectRef>,
    args: &IssueArgs,
) -> Result<LinkedIssues> {
    validate_issue_args(
        &args.parent_title,
        &args.parent_body,
        &args.child_title,
        &args.child_body,
    )?;
    require_gh(client)?;

    print_action("Creating parent and child issues");
    let linked = create_linked_issues(
        client,
        project,
        &args.parent_title,
        &args.parent_body,
        &args.child_title,
        &args.child_body,
    )?;
    print_linked(&linked);
    Ok(linked)
}

fn print_linked(linked: &LinkedIssues) {
    print_section_banner("Issues created", BannerColor::Green);
    println!(
        "{BOLD}Parent:{RESET} #{} {}  {GRAY}{}{RESET}",
        linked.parent.number, linked.parent.title, linked.parent.url
    );
    println!(
        "{BOLD}Child:{RESET}  #{} {}  {GRAY}{}{RESET}",
        linked.child.number, linked.child.title, linked.child.url
    );
    println!("{BOLD}Link:{RESET}    {}", linked.link);
    println!("{BOLD}Project:{RESET} {}", linked.project);
    println!();

    for warning in linked.warnings() {
        print_warning(&warning);
    }
    if let StepOutcome::Skipped(reason) = &linked.project {
        print_info(&format!("Project assignment skipped: {}", reason));
    }
    if linked.is_complete() {
        print_success("Parent and child issues linked");
    }
}

/// Update title, body or state of an existing issue.
pub fn update_command(
    client: &dyn GitHubClient,
    number: u64,
    update: &IssueUpdate,
) -> Result<UpdateOutcome> {
    if update.is_empty() {
        print_info("Nothing to update. Pass --title, --body or --state.");
        return Ok(UpdateOutcome::NoChanges);
    }
    require_gh(client)?;

    let outcome = update_issue(client, number, update)?;
    if let UpdateOutcome::Updated { number, fields } = &outcome {
        print_success(&format!("Updated #{} ({})", number, fields.join(", ")));
    }
    Ok(outcome)
}

/// Create one linked issue per entry of the "Files to Create" section.
pub fn process_files_command(client: &dyn GitHubClient, number: u64) -> Result<ProcessedFiles> {
    require_gh(client)?;

    print_action(&format!("Reading \"Files to Create\" from #{}", number));
    let processed = process_files(client, number)?;
    print_section_banner(
        &format!("Files to create from #{}", processed.source),
        BannerColor::Cyan,
    );
    for issue in &processed.created {
        println!("  #{} {}  {GRAY}{}{RESET}", issue.number, issue.title, issue.url);
    }
    let total = processed.created.len();
    let linked = total - processed.link_failures.len();
    println!(
        "  {BOLD}Linked{RESET} {} {}/{}",
        make_progress_bar(linked, total, 20),
        linked,
        total
    );
    println!();
    for (child, reason) in &processed.link_failures {
        print_warning(&format!("Could not link #{} to #{}: {}", child, number, reason));
    }
    print_success(&format!("Created {} issue(s)", processed.created.len()));
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GhimError;
    use crate::gh::fake::FakeGitHub;
    use crate::gh::IssueState;

    fn args() -> IssueArgs {
        IssueArgs {
            parent_title: "Epic: search".to_string(),
            parent_body: "Track search work".to_string(),
            child_title: "Index documents".to_string(),
            child_body: "Build the index".to_string(),
        }
    }

    #[test]
    fn test_create_issues_links_child() {
        let client = FakeGitHub::new();
        let linked = create_issues_command(&client, None, &args()).unwrap();

        assert_eq!(client.links(), vec![(linked.parent.number, linked.child.number)]);
        assert_eq!(linked.link, StepOutcome::Done);
        assert!(matches!(linked.project, StepOutcome::Skipped(_)));
    }

    #[test]
    fn test_create_issues_rejects_blank_argument_before_gh() {
        let client = FakeGitHub::new();
        client.set_authenticated(false);
        let mut bad = args();
        bad.child_body = "   ".to_string();

        let err = create_issues_command(&client, None, &bad).unwrap_err();
        assert!(matches!(err, GhimError::MissingArgument(ref name) if name == "CHILD_BODY"));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_create_issues_link_failure_is_not_fatal() {
        let client = FakeGitHub::new();
        client.fail("link_sub_issue", "HTTP 422: sub-issues are not enabled");

        let linked = create_issues_command(&client, None, &args()).unwrap();
        assert!(linked.link.is_failed());
        assert_eq!(client.issues().len(), 2);
    }

    #[test]
    fn test_create_issues_requires_auth() {
        let client = FakeGitHub::new();
        client.set_authenticated(false);
        let err = create_issues_command(&client, None, &args()).unwrap_err();
        assert!(matches!(err, GhimError::NotAuthenticated));
        assert!(client.issues().is_empty());
    }

    #[test]
    fn test_update_without_flags_is_noop() {
        let client = FakeGitHub::new();
        client.set_installed(false);
        let outcome = update_command(&client, 7, &IssueUpdate::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::NoChanges);
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_update_closes_issue() {
        let client = FakeGitHub::new();
        let issue = client.add_issue("Old", "body");
        let update = IssueUpdate {
            state: Some(IssueState::Closed),
            ..Default::default()
        };

        update_command(&client, issue.number, &update).unwrap();
        assert_eq!(client.issue(issue.number).unwrap().state, IssueState::Closed);
    }

    #[test]
    fn test_process_files_command() {
        let client = FakeGitHub::new();
        let source = client.add_issue(
            "Scaffold",
            "## Files to Create\n\n- `src/lib.rs`: crate root\n- `src/cli.rs`: argument parsing\n",
        );

        let processed = process_files_command(&client, source.number).unwrap();
        assert_eq!(processed.created.len(), 2);
        assert_eq!(client.links().len(), 2);
    }

    #[test]
    fn test_process_files_without_section() {
        let client = FakeGitHub::new();
        let source = client.add_issue("Plain", "No list here");
        let err = process_files_command(&client, source.number).unwrap_err();
        assert!(matches!(err, GhimError::NoFilesSection(n) if n == source.number));
    }
}
