//! Interactive, menu-driven front end over the issue and release workflows.
//!
//! # Modules
//!
//! - [`menu`] - Menu tables and the actions behind each option
//! - [`navigation`] - The navigation state machine
//! - [`session`] - Per-run session bookkeeping shared by workflows
//! - `workflows` - The status, issue, release and config handlers

pub mod menu;
pub mod navigation;
pub mod session;
mod workflows;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{Config, ENV_FILE_NAME};
use crate::error::GhimError;
use crate::gh::{GitHubClient, RepoContext};
use crate::git::GitRepo;
use crate::output::{print_header, print_info};
use crate::prompt::Prompter;
use crate::recovery::{ErrorHandler, ErrorKind, ErrorLog, RecoveryEnv};
use crate::release::{DEFAULT_CHANGELOG, DEFAULT_README};
use crate::validate::{parse_menu_choice, parse_range};

pub use menu::{Menu, MenuAction, WorkflowAction, WorkflowKind};
pub use navigation::Navigator;
pub use session::{OperationResult, WizardSession};

/// Failure of a workflow step.
#[derive(Debug)]
pub(crate) enum WorkflowError {
    /// Already shown to the user and logged by the error handler.
    Reported,
    Failed(GhimError),
}

impl From<GhimError> for WorkflowError {
    fn from(e: GhimError) -> Self {
        WorkflowError::Failed(e)
    }
}

pub(crate) type Flow<T = ()> = std::result::Result<T, WorkflowError>;

pub struct Wizard<'a> {
    client: &'a dyn GitHubClient,
    git: &'a dyn GitRepo,
    config: Config,
    prompter: Prompter,
    navigator: Navigator,
    session: WizardSession,
    errors: ErrorHandler,
    env_file: PathBuf,
    changelog_path: PathBuf,
    readme_path: PathBuf,
}

impl<'a> Wizard<'a> {
    pub fn new(
        client: &'a dyn GitHubClient,
        git: &'a dyn GitRepo,
        config: Config,
        prompter: Prompter,
    ) -> Self {
        let errors = ErrorHandler::new(ErrorLog::new(&config.error_log_file));
        Self {
            client,
            git,
            config,
            prompter,
            navigator: Navigator::new(),
            session: WizardSession::new(),
            errors,
            env_file: PathBuf::from(ENV_FILE_NAME),
            changelog_path: PathBuf::from(DEFAULT_CHANGELOG),
            readme_path: PathBuf::from(DEFAULT_README),
        }
    }

    /// Use `dir` for `.env`, `CHANGELOG.md` and `README.md`.
    pub fn with_project_dir(mut self, dir: &Path) -> Self {
        self.env_file = dir.join(ENV_FILE_NAME);
        self.changelog_path = dir.join(DEFAULT_CHANGELOG);
        self.readme_path = dir.join(DEFAULT_README);
        self.errors = self.errors.with_env_file(&self.env_file);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.errors = self.errors.with_retry_delay(delay);
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn errors(&self) -> &ErrorHandler {
        &self.errors
    }

    /// Reset navigation, session and retry state. Safe to call repeatedly.
    pub fn init_wizard_core(&mut self) {
        self.navigator.reset();
        self.session = WizardSession::new();
        self.errors.reset();
        tracing::info!(session = %self.session.id, "wizard started");
    }

    pub fn cleanup_wizard_core(&mut self) {
        tracing::info!(
            session = %self.session.id,
            operations = self.session.operations,
            "wizard finished"
        );
        self.navigator.reset();
        self.session = WizardSession::new();
        self.errors.reset();
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run(&mut self) {
        self.init_wizard_core();
        print_header("gh-wizard");
        self.load_repo_context();

        while self.navigator.is_running() {
            self.step();
        }

        print_info("Goodbye.");
        self.cleanup_wizard_core();
    }

    /// Render the current menu, read one choice and act on it.
    pub fn step(&mut self) {
        let menu = self.navigator.current();
        menu.render();

        let range = menu.range_spec();
        let Some(raw) = self.prompter.read_line(&format!("Select an option [{}]:", range)) else {
            self.navigator.exit_wizard();
            return;
        };
        let Some(choice) = self.handle_user_input(&raw, &range, &format!("{} menu", menu)) else {
            return;
        };

        if let Some(action) = menu.action(choice).and_then(|a| self.navigator.apply(a)) {
            self.execute_workflow(action);
        }
    }

    /// Validate a menu choice against `range` (e.g. `1-5`).
    ///
    /// Rejections go to the input error handler; navigation is untouched.
    pub fn handle_user_input(&mut self, raw: &str, range: &str, context: &str) -> Option<u32> {
        let (min, max) = match parse_range(range) {
            Ok(bounds) => bounds,
            Err(e) => {
                self.errors.handle_error(
                    ErrorKind::Input,
                    &e.to_string(),
                    context,
                    &mut RecoveryEnv::non_interactive(),
                );
                return None;
            }
        };

        match parse_menu_choice(raw, min, max) {
            Ok(choice) => Some(choice),
            Err(violation) => {
                self.errors.handle_input_violation(&violation, context);
                None
            }
        }
    }

    /// Run one workflow with session bookkeeping around it.
    pub fn execute_workflow(&mut self, action: WorkflowAction) -> OperationResult {
        let context = format!("{} workflow", action.kind());
        self.session.begin(action, &context);
        tracing::info!(operation = action.name(), "workflow started");

        let outcome = match action {
            WorkflowAction::RepoOverview => self.show_repo_overview(),
            WorkflowAction::OpenIssues => self.show_open_issues(),
            WorkflowAction::RecentReleases => self.show_recent_releases(),
            WorkflowAction::ErrorStats => self.show_error_stats(),
            WorkflowAction::CreateIssues => self.create_issues(),
            WorkflowAction::UpdateIssue => self.update_issue(),
            WorkflowAction::ProcessFiles => self.process_files(),
            WorkflowAction::ViewIssue => self.view_issue(),
            WorkflowAction::CurrentVersion => self.show_current_version(),
            WorkflowAction::PreviewRelease => self.preview_release(),
            WorkflowAction::CreateRelease => self.create_release(),
            WorkflowAction::ShowConfig => self.show_config(),
            WorkflowAction::ValidateConfig => self.validate_setup(),
            WorkflowAction::CreateEnvFile => self.create_env_file(),
            WorkflowAction::ClearErrorLog => self.clear_error_log(),
        };

        let result = match outcome {
            Ok(()) => OperationResult::Success,
            Err(WorkflowError::Reported) => OperationResult::Error,
            Err(WorkflowError::Failed(GhimError::Cancelled)) => {
                print_info("Cancelled.");
                OperationResult::Error
            }
            Err(WorkflowError::Failed(e)) => {
                self.report(&e, action.name());
                OperationResult::Error
            }
        };

        self.errors.reset();
        self.session.finish(result);
        tracing::info!(operation = action.name(), result = %result, "workflow finished");
        result
    }

    /// Hand an error to the recovery handler. The decision is not acted on:
    /// the user re-selects the operation from the menu.
    fn report(&mut self, error: &GhimError, context: &str) {
        let mut env = RecoveryEnv::interactive(self.client, &mut self.prompter);
        self.errors
            .handle_error(error.kind(), &error.to_string(), context, &mut env);
    }

    /// Run a GitHub call under the retry policy.
    fn gh<T>(
        &mut self,
        context: &str,
        mut op: impl FnMut(&dyn GitHubClient) -> crate::error::Result<T>,
    ) -> Flow<T> {
        let client = self.client;
        let mut env = RecoveryEnv::interactive(client, &mut self.prompter);
        self.errors
            .retry(context, &mut env, || op(client))
            .map_err(|_| WorkflowError::Reported)
    }

    /// Fetch and cache the repository context; failures are reported once.
    fn load_repo_context(&mut self) {
        let git = self.git;
        match self.gh("repository context", |client| RepoContext::fetch(client, git)) {
            Ok(repo) => self.session.repo = Some(repo),
            Err(_) => tracing::warn!("continuing without repository context"),
        }
    }
}
