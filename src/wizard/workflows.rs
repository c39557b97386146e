//! Workflow handlers behind the wizard's menu items.

use chrono::Local;
use semver::Prerelease;

use crate::config::{check_dependencies, write_env_template};
use crate::error::GhimError;
use crate::gh::{IssueState, IssueUpdate, RepoContext};
use crate::issue::{self, StepOutcome, UpdateOutcome};
use crate::output::{
    print_hint, print_info, print_key_values, print_section_banner, print_success, print_table,
    print_warning, BannerColor, Spinner,
};
use crate::prompt::print_options;
use crate::recovery::ErrorKind;
use crate::release::{execute_release, plan_release, ReleaseOptions, ReleasePlan};
use crate::validate::{
    parse_issue_number, parse_menu_choice, validate_input, InputKind, InputViolation,
};
use crate::version::{version_from_tag, BumpKind};

use super::{Flow, Wizard, WorkflowError};

const ISSUE_LIST_LIMIT: usize = 20;
const RELEASE_LIST_LIMIT: usize = 10;
const MIN_TITLE_LEN: usize = 3;

impl<'a> Wizard<'a> {
    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    fn ask_raw(&mut self, question: &str, default: Option<&str>) -> Flow<String> {
        self.prompter
            .ask(question, default)
            .ok_or(WorkflowError::Failed(GhimError::Cancelled))
    }

    /// Yes/no answer; end of input cancels the workflow.
    fn confirm(&mut self, question: &str, default: bool) -> Flow<bool> {
        self.prompter
            .confirm(question, default)
            .ok_or(WorkflowError::Failed(GhimError::Cancelled))
    }

    /// Ask until the answer has at least `min_len` characters.
    fn ask_text(&mut self, question: &str, min_len: usize) -> Flow<String> {
        loop {
            let answer = self.ask_raw(question, None)?;
            match validate_input(InputKind::Text { min_len }, &answer) {
                Ok(()) => return Ok(answer.trim().to_string()),
                Err(violation) => self.errors.handle_input_violation(&violation, question),
            }
        }
    }

    /// Free-form answer; blank means "keep".
    fn ask_optional(&mut self, question: &str) -> Flow<Option<String>> {
        let answer = self.ask_raw(question, None)?;
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn ask_issue_number(&mut self, default: Option<u64>) -> Flow<u64> {
        let default = default.map(|n| n.to_string());
        loop {
            let answer = self.ask_raw("Issue number:", default.as_deref())?;
            match parse_issue_number(&answer) {
                Ok(number) => return Ok(number),
                Err(violation) => self.errors.handle_input_violation(&violation, "issue number"),
            }
        }
    }

    fn ask_state(&mut self) -> Flow<Option<IssueState>> {
        loop {
            let Some(answer) = self.ask_optional("New state, open or closed (blank to keep):")? else {
                return Ok(None);
            };
            match answer.parse::<IssueState>() {
                Ok(state) => return Ok(Some(state)),
                Err(_) => {
                    let violation = InputViolation::NotIssueState(answer);
                    self.errors.handle_input_violation(&violation, "issue state");
                }
            }
        }
    }

    fn ask_bump(&mut self) -> Flow<BumpKind> {
        const BUMPS: [BumpKind; 3] = [BumpKind::Major, BumpKind::Minor, BumpKind::Patch];
        print_options(&["major", "minor", "patch"], 2);
        loop {
            let answer = self.ask_raw("Version bump [1-3]:", Some("3"))?;
            match parse_menu_choice(&answer, 1, 3) {
                Ok(choice) => return Ok(BUMPS[choice as usize - 1]),
                Err(violation) => self.errors.handle_input_violation(&violation, "version bump"),
            }
        }
    }

    fn ask_pre_release(&mut self) -> Flow<Option<String>> {
        loop {
            let Some(tag) = self.ask_optional("Pre-release tag, e.g. alpha.1 (blank for none):")? else {
                return Ok(None);
            };
            if Prerelease::new(&tag).is_ok() {
                return Ok(Some(tag));
            }
            self.errors
                .handle_input_violation(&InputViolation::BadPreRelease(tag), "pre-release tag");
        }
    }

    fn release_options(&self, plan: &ReleasePlan, dry_run: bool, close_issues: bool) -> ReleaseOptions {
        ReleaseOptions {
            bump: plan.version.bump,
            pre_release: plan.version.pre_release.clone(),
            dry_run,
            close_issues,
            changelog_path: self.changelog_path.clone(),
            readme_path: self.readme_path.clone(),
        }
    }

    fn new_plan(&mut self) -> Flow<ReleasePlan> {
        let bump = self.ask_bump()?;
        let pre_release = self.ask_pre_release()?;
        Ok(plan_release(
            self.git,
            bump,
            pre_release.as_deref(),
            Local::now().date_naive(),
        )?)
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    pub(super) fn show_repo_overview(&mut self) -> Flow {
        let repo = match self.session.repo.clone() {
            Some(repo) => repo,
            None => {
                let git = self.git;
                let repo = self.gh("repository context", |client| RepoContext::fetch(client, git))?;
                self.session.repo = Some(repo.clone());
                repo
            }
        };

        print_section_banner("Repository Overview", BannerColor::Cyan);
        let mut entries = vec![
            ("Repository", repo.full_name()),
            ("Branch", repo.branch.clone()),
            (
                "Authenticated",
                if repo.authenticated { "yes" } else { "no" }.to_string(),
            ),
            ("Session", self.session.short_id().to_string()),
            (
                "Started",
                self.session.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            ("Operations", self.session.operations.to_string()),
        ];
        if let Some(number) = self.session.last_created_issue {
            entries.push(("Last created issue", format!("#{}", number)));
        }
        if let Some(plan) = &self.session.release_plan {
            entries.push(("Previewed release", plan.tag()));
        }
        print_key_values(&entries);
        Ok(())
    }

    pub(super) fn show_open_issues(&mut self) -> Flow {
        let issues = self.gh("list open issues", |client| {
            client.list_issues(IssueState::Open, ISSUE_LIST_LIMIT)
        })?;

        print_section_banner("Open Issues", BannerColor::Cyan);
        let rows: Vec<Vec<String>> = issues
            .iter()
            .map(|i| vec![format!("#{}", i.number), i.title.clone()])
            .collect();
        print_table(&["#", "Title"], &rows, "No open issues.");
        Ok(())
    }

    pub(super) fn show_recent_releases(&mut self) -> Flow {
        let releases = self.gh("list releases", |client| client.list_releases(RELEASE_LIST_LIMIT))?;

        print_section_banner("Recent Releases", BannerColor::Cyan);
        let rows: Vec<Vec<String>> = releases
            .iter()
            .map(|r| {
                let kind = if r.is_draft {
                    "draft"
                } else if r.is_prerelease {
                    "pre-release"
                } else {
                    "release"
                };
                let published = r
                    .published_at
                    .as_deref()
                    .map(|d| d.chars().take(10).collect())
                    .unwrap_or_else(|| "-".to_string());
                vec![r.tag_name.clone(), r.name.clone(), published, kind.to_string()]
            })
            .collect();
        print_table(&["Tag", "Name", "Published", "Type"], &rows, "No releases yet.");
        Ok(())
    }

    pub(super) fn show_error_stats(&mut self) -> Flow {
        let stats = self.errors.log().stats();

        print_section_banner("Error Statistics", BannerColor::Cyan);
        let mut entries: Vec<(&str, String)> = ErrorKind::ALL
            .iter()
            .map(|kind| {
                let count = stats.by_kind.get(kind).copied().unwrap_or(0);
                (kind.as_str(), count.to_string())
            })
            .collect();
        entries.push(("total", stats.total.to_string()));
        print_key_values(&entries);

        if let Some(last) = &stats.last {
            print_info(&format!(
                "Last error ({}) at {}: {}",
                last.kind,
                last.timestamp.format("%Y-%m-%d %H:%M:%S"),
                last.message
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Issues
    // ------------------------------------------------------------------

    pub(super) fn create_issues(&mut self) -> Flow {
        print_section_banner("Create Linked Issues", BannerColor::Cyan);
        let parent_title = self.ask_text("Parent issue title:", MIN_TITLE_LEN)?;
        let parent_body = self.ask_text("Parent issue body:", 1)?;
        let child_title = self.ask_text("Child issue title:", MIN_TITLE_LEN)?;
        let child_body = self.ask_text("Child issue body:", 1)?;
        let project = self.config.project()?;

        if !self.confirm("Create these issues?", true)? {
            return Err(GhimError::Cancelled.into());
        }

        let spinner = Spinner::start("Creating issues");
        let linked = match issue::create_linked_issues(
            self.client,
            project.as_ref(),
            &parent_title,
            &parent_body,
            &child_title,
            &child_body,
        ) {
            Ok(linked) => {
                spinner.finish_success();
                linked
            }
            Err(e) => {
                spinner.finish_error(&e.to_string());
                return Err(e.into());
            }
        };

        print_success(&format!("Parent #{}: {}", linked.parent.number, linked.parent.url));
        print_success(&format!("Child #{}: {}", linked.child.number, linked.child.url));
        if linked.link == StepOutcome::Done {
            print_success(&format!(
                "Linked #{} as a sub-issue of #{}",
                linked.child.number, linked.parent.number
            ));
        }
        if linked.project == StepOutcome::Done {
            print_success("Added both issues to the project");
        }
        for warning in linked.warnings() {
            print_warning(&warning);
        }

        self.session.last_created_issue = Some(linked.parent.number);
        Ok(())
    }

    pub(super) fn update_issue(&mut self) -> Flow {
        print_section_banner("Update Issue", BannerColor::Cyan);
        let number = self.ask_issue_number(self.session.last_created_issue)?;
        let update = IssueUpdate {
            title: self.ask_optional("New title (blank to keep):")?,
            body: self.ask_optional("New body (blank to keep):")?,
            state: self.ask_state()?,
        };

        let outcome = self.gh("update issue", |client| issue::update_issue(client, number, &update))?;
        match outcome {
            UpdateOutcome::NoChanges => print_info("Nothing to update."),
            UpdateOutcome::Updated { number, fields } => {
                print_success(&format!("Updated #{} ({})", number, fields.join(", ")));
            }
        }
        Ok(())
    }

    pub(super) fn process_files(&mut self) -> Flow {
        print_section_banner("Process Files to Create", BannerColor::Cyan);
        let number = self.ask_issue_number(self.session.last_created_issue)?;

        let processed = issue::process_files(self.client, number)?;
        let rows: Vec<Vec<String>> = processed
            .created
            .iter()
            .map(|i| vec![format!("#{}", i.number), i.title.clone()])
            .collect();
        print_table(&["#", "Title"], &rows, "The section lists no files.");
        for (child, reason) in &processed.link_failures {
            print_warning(&format!("Could not link #{} to #{}: {}", child, number, reason));
        }
        if !processed.created.is_empty() {
            print_success(&format!(
                "Created {} issue(s) from #{}",
                processed.created.len(),
                number
            ));
        }
        Ok(())
    }

    pub(super) fn view_issue(&mut self) -> Flow {
        let number = self.ask_issue_number(self.session.last_created_issue)?;
        let issue = self.gh("view issue", |client| client.view_issue(number))?;

        print_section_banner(&format!("Issue #{}", issue.number), BannerColor::Cyan);
        print_key_values(&[
            ("Title", issue.title.clone()),
            ("State", issue.state.to_string()),
            ("URL", issue.url.clone()),
        ]);
        if !issue.body.trim().is_empty() {
            println!();
            println!("{}", issue.body.trim_end());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Releases
    // ------------------------------------------------------------------

    pub(super) fn show_current_version(&mut self) -> Flow {
        let tag = self.git.latest_tag()?;
        let version = version_from_tag(tag.as_deref())?;
        match tag {
            Some(tag) => print_info(&format!("Current version: {} (tag {})", version, tag)),
            None => print_info(&format!("No tags yet; current version is {}", version)),
        }
        Ok(())
    }

    pub(super) fn preview_release(&mut self) -> Flow {
        print_section_banner("Preview Release", BannerColor::Yellow);
        let plan = self.new_plan()?;
        let options = self.release_options(&plan, true, false);
        execute_release(self.client, &plan, &options)?;

        print_hint("Choose \"Create release\" to publish this plan.");
        self.session.release_plan = Some(plan);
        Ok(())
    }

    pub(super) fn create_release(&mut self) -> Flow {
        print_section_banner("Create Release", BannerColor::Cyan);

        let plan = match self.session.release_plan.clone() {
            Some(plan)
                if self.confirm(&format!("Use the previewed plan for {}?", plan.tag()), true)? =>
            {
                plan
            }
            _ => self.new_plan()?,
        };

        let close_issues = !plan.resolved_issues.is_empty()
            && self.confirm(
                &format!("Close {} resolved issue(s) after release?", plan.resolved_issues.len()),
                false,
            )?;
        if !self.confirm(&format!("Create release {} now?", plan.tag()), false)? {
            return Err(GhimError::Cancelled.into());
        }

        let options = self.release_options(&plan, false, close_issues);
        let outcome = execute_release(self.client, &plan, &options)?;
        for (number, reason) in &outcome.close_failures {
            print_warning(&format!("#{} left open: {}", number, reason));
        }

        self.session.release_plan = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub(super) fn show_config(&mut self) -> Flow {
        print_section_banner("Configuration", BannerColor::Cyan);
        let mut entries = self.config.display_entries();
        let env_state = if self.env_file.exists() { "present" } else { "missing" };
        entries.push((
            "env file",
            format!("{} ({})", self.env_file.display(), env_state),
        ));
        print_key_values(&entries);
        Ok(())
    }

    pub(super) fn validate_setup(&mut self) -> Flow {
        print_section_banner("Validate Setup", BannerColor::Cyan);
        let mut problems = Vec::new();

        match self.config.validate() {
            Ok(()) => print_success("Configuration is valid"),
            Err(e) => {
                print_warning(&e.to_string());
                problems.push(e);
            }
        }

        let missing = check_dependencies();
        for tool in &missing {
            print_warning(&format!("{} is not installed", tool));
            problems.push(GhimError::DependencyMissing(tool.to_string()));
        }
        if missing.is_empty() {
            print_success("gh and git are installed");
        }

        if !missing.contains(&"gh") {
            if self.client.is_authenticated() {
                print_success("Authenticated with GitHub");
            } else {
                print_warning("Not authenticated with GitHub");
                problems.push(GhimError::NotAuthenticated);
            }
        }

        match problems.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(first.into()),
        }
    }

    pub(super) fn create_env_file(&mut self) -> Flow {
        write_env_template(&self.env_file)?;
        print_success(&format!("Created {}", self.env_file.display()));
        print_hint("Edit it, then restart the wizard to load the new settings.");
        Ok(())
    }

    pub(super) fn clear_error_log(&mut self) -> Flow {
        let total = self.errors.log().stats().total;
        if total == 0 {
            print_info("The error log is already empty.");
            return Ok(());
        }
        if !self.confirm(&format!("Clear {} recorded error(s)?", total), false)? {
            return Err(GhimError::Cancelled.into());
        }
        self.errors.log().clear().map_err(GhimError::from)?;
        print_success("Error log cleared");
        Ok(())
    }
}
