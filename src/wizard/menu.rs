//! Menu definitions: every menu is a fixed, ordered table of options.

use std::fmt;

use crate::output::{print_section_banner, BannerColor, BOLD, GRAY, RESET};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Menu {
    Main,
    Status,
    Release,
    Issue,
    Config,
}

/// Group of workflows a menu item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Status,
    Issue,
    Release,
    Config,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::Status => "status",
            WorkflowKind::Issue => "issue",
            WorkflowKind::Release => "release",
            WorkflowKind::Config => "config",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaf menu item that runs a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    RepoOverview,
    OpenIssues,
    RecentReleases,
    ErrorStats,
    CreateIssues,
    UpdateIssue,
    ProcessFiles,
    ViewIssue,
    CurrentVersion,
    PreviewRelease,
    CreateRelease,
    ShowConfig,
    ValidateConfig,
    CreateEnvFile,
    ClearErrorLog,
}

impl WorkflowAction {
    pub fn kind(&self) -> WorkflowKind {
        use WorkflowAction::*;
        match self {
            RepoOverview | OpenIssues | RecentReleases | ErrorStats => WorkflowKind::Status,
            CreateIssues | UpdateIssue | ProcessFiles | ViewIssue => WorkflowKind::Issue,
            CurrentVersion | PreviewRelease | CreateRelease => WorkflowKind::Release,
            ShowConfig | ValidateConfig | CreateEnvFile | ClearErrorLog => WorkflowKind::Config,
        }
    }

    /// Operation name recorded on the session and in the error log.
    pub fn name(&self) -> &'static str {
        use WorkflowAction::*;
        match self {
            RepoOverview => "repo_overview",
            OpenIssues => "list_open_issues",
            RecentReleases => "list_releases",
            ErrorStats => "error_stats",
            CreateIssues => "create_linked_issues",
            UpdateIssue => "update_issue",
            ProcessFiles => "process_files",
            ViewIssue => "view_issue",
            CurrentVersion => "current_version",
            PreviewRelease => "preview_release",
            CreateRelease => "create_release",
            ShowConfig => "show_config",
            ValidateConfig => "validate_config",
            CreateEnvFile => "create_env_file",
            ClearErrorLog => "clear_error_log",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(Menu),
    Workflow(WorkflowAction),
    Back,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub key: u32,
    pub label: &'static str,
    pub action: MenuAction,
}

const fn option(key: u32, label: &'static str, action: MenuAction) -> MenuOption {
    MenuOption { key, label, action }
}

const MAIN_OPTIONS: &[MenuOption] = &[
    option(1, "Repository status", MenuAction::Navigate(Menu::Status)),
    option(2, "Issues", MenuAction::Navigate(Menu::Issue)),
    option(3, "Releases", MenuAction::Navigate(Menu::Release)),
    option(4, "Configuration", MenuAction::Navigate(Menu::Config)),
    option(5, "Exit", MenuAction::Exit),
];

const STATUS_OPTIONS: &[MenuOption] = &[
    option(1, "Repository overview", MenuAction::Workflow(WorkflowAction::RepoOverview)),
    option(2, "Open issues", MenuAction::Workflow(WorkflowAction::OpenIssues)),
    option(3, "Recent releases", MenuAction::Workflow(WorkflowAction::RecentReleases)),
    option(4, "Error statistics", MenuAction::Workflow(WorkflowAction::ErrorStats)),
    option(5, "Back", MenuAction::Back),
];

const ISSUE_OPTIONS: &[MenuOption] = &[
    option(1, "Create parent and child issues", MenuAction::Workflow(WorkflowAction::CreateIssues)),
    option(2, "Update an issue", MenuAction::Workflow(WorkflowAction::UpdateIssue)),
    option(3, "Process \"Files to Create\"", MenuAction::Workflow(WorkflowAction::ProcessFiles)),
    option(4, "View an issue", MenuAction::Workflow(WorkflowAction::ViewIssue)),
    option(5, "Back", MenuAction::Back),
];

const RELEASE_OPTIONS: &[MenuOption] = &[
    option(1, "Show current version", MenuAction::Workflow(WorkflowAction::CurrentVersion)),
    option(2, "Preview next release (dry run)", MenuAction::Workflow(WorkflowAction::PreviewRelease)),
    option(3, "Create release", MenuAction::Workflow(WorkflowAction::CreateRelease)),
    option(4, "Back", MenuAction::Back),
];

const CONFIG_OPTIONS: &[MenuOption] = &[
    option(1, "Show configuration", MenuAction::Workflow(WorkflowAction::ShowConfig)),
    option(2, "Validate setup", MenuAction::Workflow(WorkflowAction::ValidateConfig)),
    option(3, "Create .env template", MenuAction::Workflow(WorkflowAction::CreateEnvFile)),
    option(4, "Clear error log", MenuAction::Workflow(WorkflowAction::ClearErrorLog)),
    option(5, "Back", MenuAction::Back),
];

impl Menu {
    pub fn as_str(&self) -> &'static str {
        match self {
            Menu::Main => "main",
            Menu::Status => "status",
            Menu::Release => "release",
            Menu::Issue => "issue",
            Menu::Config => "config",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Menu::Main => "Main Menu",
            Menu::Status => "Repository Status",
            Menu::Release => "Releases",
            Menu::Issue => "Issues",
            Menu::Config => "Configuration",
        }
    }

    pub fn options(&self) -> &'static [MenuOption] {
        match self {
            Menu::Main => MAIN_OPTIONS,
            Menu::Status => STATUS_OPTIONS,
            Menu::Release => RELEASE_OPTIONS,
            Menu::Issue => ISSUE_OPTIONS,
            Menu::Config => CONFIG_OPTIONS,
        }
    }

    /// Allowed input range, e.g. `1-5`.
    pub fn range_spec(&self) -> String {
        let options = self.options();
        let min = options.first().map_or(1, |o| o.key);
        let max = options.last().map_or(1, |o| o.key);
        format!("{}-{}", min, max)
    }

    pub fn action(&self, key: u32) -> Option<MenuAction> {
        self.options()
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.action)
    }

    pub fn render(&self) {
        print_section_banner(self.title(), BannerColor::Cyan);
        for option in self.options() {
            let label = match option.action {
                MenuAction::Back | MenuAction::Exit => format!("{GRAY}{}{RESET}", option.label),
                _ => option.label.to_string(),
            };
            println!("  {BOLD}{}{RESET}. {}", option.key, label);
        }
        println!();
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
