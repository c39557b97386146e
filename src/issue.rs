//! Issue workflows: linked parent/child creation, updates, and expanding a
//! "Files to Create" section into one issue per file.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ProjectRef;
use crate::error::{GhimError, Result};
use crate::gh::{GitHubClient, Issue, IssueUpdate};
use crate::validate::validate_issue_args;

static FILES_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*files\s+to\s+create\b")
        .expect("files heading pattern is valid")
});

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(?:\[[ xX]\]\s+)?(?P<item>.+?)\s*$")
        .expect("list item pattern is valid")
});

/// Result of one optional step of a multi-step workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Skipped(String),
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Done => write!(f, "done"),
            StepOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            StepOutcome::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// Parent and child issue plus the outcome of linking them.
///
/// Creating either issue is fatal on failure. Linking and project
/// assignment are not: GitHub has no rollback for created issues, so a
/// partial result is reported instead.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedIssues {
    pub parent: Issue,
    pub child: Issue,
    pub link: StepOutcome,
    pub project: StepOutcome,
}

impl LinkedIssues {
    /// Warnings for every failed optional step.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let StepOutcome::Failed(msg) = &self.link {
            warnings.push(format!(
                "Could not link #{} as a sub-issue of #{}: {}",
                self.child.number, self.parent.number, msg
            ));
        }
        if let StepOutcome::Failed(msg) = &self.project {
            warnings.push(format!("Could not add issues to the project: {}", msg));
        }
        warnings
    }

    pub fn is_complete(&self) -> bool {
        !self.link.is_failed() && !self.project.is_failed()
    }
}

/// Create a parent issue and a child issue, link the child as a sub-issue
/// and add both to `project` when one is configured.
pub fn create_linked_issues(
    client: &dyn GitHubClient,
    project: Option<&ProjectRef>,
    parent_title: &str,
    parent_body: &str,
    child_title: &str,
    child_body: &str,
) -> Result<LinkedIssues> {
    validate_issue_args(parent_title, parent_body, child_title, child_body)?;

    let parent = client.create_issue(parent_title.trim(), parent_body)?;
    tracing::info!(number = parent.number, "parent issue created");
    let child = client.create_issue(child_title.trim(), child_body)?;
    tracing::info!(number = child.number, "child issue created");

    let link = match client.link_sub_issue(parent.number, child.number) {
        Ok(()) => StepOutcome::Done,
        Err(e) => {
            tracing::warn!(parent = parent.number, child = child.number, error = %e, "sub-issue link failed");
            StepOutcome::Failed(e.to_string())
        }
    };

    let project = match project {
        None => StepOutcome::Skipped("PROJECT_URL not set".to_string()),
        Some(project) => add_all_to_project(client, project, &[&parent, &child]),
    };

    Ok(LinkedIssues {
        parent,
        child,
        link,
        project,
    })
}

fn add_all_to_project(client: &dyn GitHubClient, project: &ProjectRef, issues: &[&Issue]) -> StepOutcome {
    let mut failures = Vec::new();
    for issue in issues {
        if let Err(e) = client.add_to_project(project, &issue.url) {
            tracing::warn!(issue = issue.number, error = %e, "project add failed");
            failures.push(format!("#{}: {}", issue.number, e));
        }
    }
    if failures.is_empty() {
        StepOutcome::Done
    } else {
        StepOutcome::Failed(failures.join("; "))
    }
}

/// What an update changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing was requested.
    NoChanges,
    Updated { number: u64, fields: Vec<&'static str> },
}

/// Apply `update` to issue `number`. An empty update is a no-op.
pub fn update_issue(client: &dyn GitHubClient, number: u64, update: &IssueUpdate) -> Result<UpdateOutcome> {
    if update.is_empty() {
        return Ok(UpdateOutcome::NoChanges);
    }
    if number == 0 {
        return Err(GhimError::InvalidInput("issue number must be positive".to_string()));
    }
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(GhimError::InvalidInput("title cannot be empty".to_string()));
    }

    let mut fields = Vec::new();
    if update.has_content_changes() {
        client.edit_issue(number, update)?;
        if update.title.is_some() {
            fields.push("title");
        }
        if update.body.is_some() {
            fields.push("body");
        }
    }
    if let Some(state) = update.state {
        client.set_issue_state(number, state, None)?;
        fields.push("state");
    }

    tracing::info!(number, ?fields, "issue updated");
    Ok(UpdateOutcome::Updated { number, fields })
}

/// A file listed under "Files to Create".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub description: Option<String>,
}

impl FileEntry {
    fn parse(item: &str) -> Option<Self> {
        let item = item.trim();
        let (path, rest) = if let Some(stripped) = item.strip_prefix('`') {
            let end = stripped.find('`')?;
            (&stripped[..end], &stripped[end + 1..])
        } else {
            match item.find(char::is_whitespace) {
                Some(i) => (&item[..i], &item[i..]),
                None => (item, ""),
            }
        };

        let path = path.trim().trim_end_matches(':');
        if path.is_empty() {
            return None;
        }
        let description = rest
            .trim()
            .trim_start_matches(['-', ':', '–', '—'])
            .trim();

        Some(Self {
            path: path.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }

    pub fn issue_title(&self) -> String {
        format!("Create {}", self.path)
    }

    pub fn issue_body(&self, source: u64) -> String {
        let mut body = format!("Create `{}`.\n\n", self.path);
        if let Some(description) = &self.description {
            body.push_str(description);
            body.push_str("\n\n");
        }
        body.push_str(&format!("Part of #{}", source));
        body
    }
}

/// Files listed under a "Files to Create" heading.
///
/// Returns `None` when the body has no such heading. The section ends at the
/// next heading.
pub fn extract_files_to_create(body: &str) -> Option<Vec<FileEntry>> {
    let mut lines = body.lines();
    lines.by_ref().find(|line| FILES_HEADING.is_match(line))?;

    let mut entries = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.starts_with('#') || (trimmed.starts_with("**") && trimmed.ends_with("**") && trimmed.len() > 4) {
            break;
        }
        if let Some(caps) = LIST_ITEM.captures(line) {
            entries.extend(FileEntry::parse(&caps["item"]));
        }
    }
    Some(entries)
}

/// Issues created from a "Files to Create" section.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFiles {
    pub source: u64,
    pub created: Vec<Issue>,
    /// Created issues that could not be linked, with the reason.
    pub link_failures: Vec<(u64, String)>,
}

/// Create one issue per file listed in issue `number`'s "Files to Create"
/// section, each linked as a sub-issue of the source issue.
pub fn process_files(client: &dyn GitHubClient, number: u64) -> Result<ProcessedFiles> {
    let source = client.view_issue(number)?;
    let entries = extract_files_to_create(&source.body).ok_or(GhimError::NoFilesSection(number))?;
    tracing::info!(number, files = entries.len(), "processing files to create");

    let mut processed = ProcessedFiles {
        source: number,
        created: Vec::new(),
        link_failures: Vec::new(),
    };

    for entry in &entries {
        let issue = client.create_issue(&entry.issue_title(), &entry.issue_body(number))?;
        if let Err(e) = client.link_sub_issue(number, issue.number) {
            tracing::warn!(parent = number, child = issue.number, error = %e, "sub-issue link failed");
            processed.link_failures.push((issue.number, e.to_string()));
        }
        processed.created.push(issue);
    }

    Ok(processed)
}
