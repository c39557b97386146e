//! Error categorization and recovery.
//!
//! Every failure is classified into an [`ErrorKind`], appended to the error
//! log, and handed to exactly one recovery strategy. Strategies print
//! guidance and decide whether the caller should retry; they never fail.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::config::{write_env_template, ENV_FILE_NAME};
use crate::error::Result;
use crate::gh::GitHubClient;
use crate::output::{print_error_panel, print_hint, print_success, print_warning};
use crate::prompt::Prompter;
use crate::validate::InputViolation;

/// Maximum network retries before the error is surfaced.
pub const MAX_NETWORK_RETRIES: u32 = 3;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// Taxonomy
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    Auth,
    Network,
    Input,
    Dependency,
    GitHub,
    Config,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::Auth,
        ErrorKind::Network,
        ErrorKind::Input,
        ErrorKind::Dependency,
        ErrorKind::GitHub,
        ErrorKind::Config,
        ErrorKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Network => "network",
            ErrorKind::Input => "input",
            ErrorKind::Dependency => "dependency",
            ErrorKind::GitHub => "github",
            ErrorKind::Config => "config",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Parse a kind tag; unrecognized tags are `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "auth" => ErrorKind::Auth,
            "network" => ErrorKind::Network,
            "input" => ErrorKind::Input,
            "dependency" => ErrorKind::Dependency,
            "github" => ErrorKind::GitHub,
            "config" => ErrorKind::Config,
            _ => ErrorKind::Unknown,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "Authentication",
            ErrorKind::Network => "Network",
            ErrorKind::Input => "Input",
            ErrorKind::Dependency => "Missing dependency",
            ErrorKind::GitHub => "GitHub API",
            ErrorKind::Config => "Configuration",
            ErrorKind::Unknown => "Unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer classification of GitHub API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubErrorKind {
    RateLimit,
    Permissions,
    NotFound,
    Other,
}

impl GitHubErrorKind {
    pub fn infer(message: &str) -> Self {
        let msg = message.to_ascii_lowercase();
        if msg.contains("rate limit") {
            GitHubErrorKind::RateLimit
        } else if msg.contains("http 403")
            || msg.contains("forbidden")
            || msg.contains("permission")
            || msg.contains("not accessible")
            || msg.contains("must have")
        {
            GitHubErrorKind::Permissions
        } else if msg.contains("http 404")
            || msg.contains("not found")
            || msg.contains("could not resolve to")
        {
            GitHubErrorKind::NotFound
        } else {
            GitHubErrorKind::Other
        }
    }
}

/// Infer the error kind from `gh` / `git` error text.
pub fn classify(message: &str) -> ErrorKind {
    let msg = message.to_ascii_lowercase();

    let auth = [
        "gh auth login",
        "authentication",
        "not logged in",
        "http 401",
        "bad credentials",
    ];
    let network = [
        "could not resolve host",
        "error connecting",
        "connection refused",
        "connection reset",
        "timed out",
        "timeout",
        "network is unreachable",
        "http 502",
        "http 503",
        "http 504",
    ];
    let github = [
        "rate limit",
        "http 403",
        "http 404",
        "http 422",
        "graphql",
        "not found",
        "permission",
        "could not resolve to",
    ];
    let dependency = ["command not found", "executable file not found", "required tool not found"];
    let config = ["configuration", ".env", "log_level", "project_url"];

    if auth.iter().any(|p| msg.contains(p)) {
        ErrorKind::Auth
    } else if network.iter().any(|p| msg.contains(p)) {
        ErrorKind::Network
    } else if github.iter().any(|p| msg.contains(p)) {
        ErrorKind::GitHub
    } else if dependency.iter().any(|p| msg.contains(p)) {
        ErrorKind::Dependency
    } else if config.iter().any(|p| msg.contains(p)) {
        ErrorKind::Config
    } else {
        ErrorKind::Unknown
    }
}

// ============================================================================
// Error log
// ============================================================================

/// One categorized failure. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    pub context: String,
    pub timestamp: DateTime<Local>,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, message: &str, context: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
            context: context.to_string(),
            timestamp: Local::now(),
        }
    }

    /// Single-line form: `<rfc3339> [kind] context: message`.
    pub fn to_line(&self) -> String {
        let flatten = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        format!(
            "{} [{}] {}: {}",
            self.timestamp.to_rfc3339(),
            self.kind,
            flatten(&self.context).replace(": ", " - "),
            flatten(&self.message)
        )
    }

    pub fn parse_line(line: &str) -> Option<Self> {
        let (timestamp, rest) = line.split_once(' ')?;
        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .ok()?
            .with_timezone(&Local);
        let rest = rest.strip_prefix('[')?;
        let (kind, rest) = rest.split_once("] ")?;
        let (context, message) = rest.split_once(": ").unwrap_or((rest, ""));
        Some(Self {
            kind: ErrorKind::from_tag(kind),
            message: message.to_string(),
            context: context.to_string(),
            timestamp,
        })
    }
}

/// Counts of logged errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorStats {
    pub total: usize,
    pub by_kind: BTreeMap<ErrorKind, usize>,
    pub last: Option<ErrorRecord>,
}

/// Append-only error log file.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ErrorRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record.to_line())
    }

    pub fn records(&self) -> Vec<ErrorRecord> {
        fs::read_to_string(&self.path)
            .map(|content| content.lines().filter_map(ErrorRecord::parse_line).collect())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> ErrorStats {
        let records = self.records();
        let mut by_kind = BTreeMap::new();
        for record in &records {
            *by_kind.entry(record.kind).or_insert(0) += 1;
        }
        ErrorStats {
            total: records.len(),
            by_kind,
            last: records.last().cloned(),
        }
    }

    /// Remove every record. A missing log is already clear.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Recovery
// ============================================================================

/// What the caller should do after a failure was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Retry,
    GiveUp,
}

/// Collaborators an interactive recovery may use.
///
/// Non-interactive callers pass no prompter; handlers then only print
/// guidance.
#[derive(Default)]
pub struct RecoveryEnv<'a> {
    pub client: Option<&'a dyn GitHubClient>,
    pub prompter: Option<&'a mut Prompter>,
}

impl<'a> RecoveryEnv<'a> {
    pub fn non_interactive() -> Self {
        Self::default()
    }

    pub fn interactive(client: &'a dyn GitHubClient, prompter: &'a mut Prompter) -> Self {
        Self {
            client: Some(client),
            prompter: Some(prompter),
        }
    }
}

pub struct ErrorHandler {
    log: ErrorLog,
    retry_attempts: u32,
    max_retries: u32,
    retry_delay: Duration,
    auth_retried: bool,
    config_retried: bool,
    env_file: PathBuf,
}

impl ErrorHandler {
    pub fn new(log: ErrorLog) -> Self {
        Self {
            log,
            retry_attempts: 0,
            max_retries: MAX_NETWORK_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            auth_retried: false,
            config_retried: false,
            env_file: PathBuf::from(ENV_FILE_NAME),
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    /// Forget retry bookkeeping from earlier operations.
    pub fn reset(&mut self) {
        self.retry_attempts = 0;
        self.auth_retried = false;
        self.config_retried = false;
    }

    fn record(&self, kind: ErrorKind, message: &str, context: &str) {
        let record = ErrorRecord::new(kind, message, context);
        tracing::error!(kind = %kind, context, message, "operation failed");
        if let Err(e) = self.log.append(&record) {
            tracing::warn!(path = %self.log.path().display(), error = %e, "could not write error log");
        }
    }

    /// Log the failure and run the recovery strategy for `kind`.
    pub fn handle_error(
        &mut self,
        kind: ErrorKind,
        message: &str,
        context: &str,
        env: &mut RecoveryEnv<'_>,
    ) -> Recovery {
        self.record(kind, message, context);

        match kind {
            ErrorKind::Auth => self.handle_auth_error(message, env),
            ErrorKind::Network => self.handle_network_error(message, context),
            ErrorKind::Config => self.handle_config_error(message, env),
            ErrorKind::Input => {
                print_warning(message);
                print_hint("Check the value and try again.");
                Recovery::GiveUp
            }
            ErrorKind::Dependency | ErrorKind::GitHub | ErrorKind::Unknown => {
                self.print_panel(kind, message, context);
                Recovery::GiveUp
            }
        }
    }

    /// Log and explain a failure without attempting recovery.
    pub fn report(&self, kind: ErrorKind, message: &str, context: &str) {
        self.record(kind, message, context);
        self.print_panel(kind, message, context);
    }

    fn print_panel(&self, kind: ErrorKind, message: &str, context: &str) {
        let remedies = self.remedies(kind, message);
        if kind == ErrorKind::Unknown {
            print_error_panel(kind.title(), &format!("{}: {}", context, message), &remedies);
        } else {
            print_error_panel(kind.title(), message, &remedies);
        }
    }

    /// Remedies shown for a failure of `kind`.
    pub fn remedies(&self, kind: ErrorKind, message: &str) -> Vec<String> {
        match kind {
            ErrorKind::Auth => vec![
                "Run 'gh auth login' to authenticate with GitHub".to_string(),
                "Or export GITHUB_TOKEN with a token that has repo scope".to_string(),
            ],
            ErrorKind::Network => vec![
                "Check your internet connection".to_string(),
                "Check https://www.githubstatus.com for outages".to_string(),
            ],
            ErrorKind::Input => vec!["Check the value and try again".to_string()],
            ErrorKind::Dependency => installation_guide(missing_tool(message)),
            ErrorKind::GitHub => github_guidance(GitHubErrorKind::infer(message)),
            ErrorKind::Config => vec![format!(
                "Fix the value in {} or in your environment",
                self.env_file.display()
            )],
            ErrorKind::Unknown => vec!["Re-run with DEBUG_MODE=true for details".to_string()],
        }
    }

    /// Log a rejected input value and print guidance for the violated rule.
    pub fn handle_input_violation(&mut self, violation: &InputViolation, context: &str) {
        self.record(ErrorKind::Input, &violation.to_string(), context);
        print_warning(&format!("Invalid {}: {}", context, violation));
        print_hint(&violation.guidance());
    }

    /// Run `op`, handling each failure and retrying while the handler says so.
    pub fn retry<T>(
        &mut self,
        context: &str,
        env: &mut RecoveryEnv<'_>,
        mut op: impl FnMut() -> Result<T>,
    ) -> Result<T> {
        let result = loop {
            match op() {
                Ok(value) => break Ok(value),
                Err(e) => {
                    let message = e.to_string();
                    match self.handle_error(e.kind(), &message, context, env) {
                        Recovery::Retry => continue,
                        Recovery::GiveUp => break Err(e),
                    }
                }
            }
        };
        self.reset();
        result
    }

    fn handle_auth_error(&mut self, message: &str, env: &mut RecoveryEnv<'_>) -> Recovery {
        print_error_panel(
            ErrorKind::Auth.title(),
            message,
            &self.remedies(ErrorKind::Auth, message),
        );

        if self.auth_retried {
            return Recovery::GiveUp;
        }
        let (Some(client), Some(prompter)) = (env.client, env.prompter.as_deref_mut()) else {
            return Recovery::GiveUp;
        };
        if prompter.confirm("Run 'gh auth login' now?", true) != Some(true) {
            return Recovery::GiveUp;
        }

        self.auth_retried = true;
        if let Err(e) = client.auth_login() {
            print_warning(&format!("Login did not complete: {}", e));
        }
        if client.is_authenticated() {
            print_success("Authenticated with GitHub");
            Recovery::Retry
        } else {
            print_warning("Still not authenticated");
            Recovery::GiveUp
        }
    }

    fn handle_network_error(&mut self, message: &str, context: &str) -> Recovery {
        self.retry_attempts += 1;

        if self.retry_attempts <= self.max_retries {
            print_warning(&format!(
                "Network error during {} (retry {}/{}): {}",
                context, self.retry_attempts, self.max_retries, message
            ));
            thread::sleep(self.retry_delay * self.retry_attempts);
            return Recovery::Retry;
        }

        print_error_panel(
            ErrorKind::Network.title(),
            &format!(
                "{} failed after {} retries: {}",
                context, self.max_retries, message
            ),
            &self.remedies(ErrorKind::Network, message),
        );
        Recovery::GiveUp
    }

    fn handle_config_error(&mut self, message: &str, env: &mut RecoveryEnv<'_>) -> Recovery {
        print_error_panel(
            ErrorKind::Config.title(),
            message,
            &self.remedies(ErrorKind::Config, message),
        );

        if self.config_retried || self.env_file.exists() {
            return Recovery::GiveUp;
        }
        let Some(prompter) = env.prompter.as_deref_mut() else {
            return Recovery::GiveUp;
        };
        let question = format!("Create a template at {}?", self.env_file.display());
        if prompter.confirm(&question, true) != Some(true) {
            return Recovery::GiveUp;
        }

        self.config_retried = true;
        match write_env_template(&self.env_file) {
            Ok(()) => {
                print_success(&format!("Created {}", self.env_file.display()));
                Recovery::Retry
            }
            Err(e) => {
                print_warning(&format!("Could not create template: {}", e));
                Recovery::GiveUp
            }
        }
    }
}

/// Installation steps for a missing tool.
pub fn installation_guide(tool: &str) -> Vec<String> {
    match tool {
        "gh" => vec![
            "macOS: brew install gh".to_string(),
            "Debian/Ubuntu: sudo apt install gh".to_string(),
            "Windows: winget install --id GitHub.cli".to_string(),
            "Other platforms: https://cli.github.com".to_string(),
        ],
        "git" => vec![
            "macOS: xcode-select --install (or brew install git)".to_string(),
            "Debian/Ubuntu: sudo apt install git".to_string(),
            "Windows: winget install --id Git.Git".to_string(),
            "Other platforms: https://git-scm.com/downloads".to_string(),
        ],
        other => vec![format!("Install '{}' and make sure it is on PATH", other)],
    }
}

fn missing_tool(message: &str) -> &str {
    for &tool in crate::config::REQUIRED_TOOLS {
        if message
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word == tool)
        {
            return tool;
        }
    }
    message.rsplit(' ').next().unwrap_or(message)
}

/// Remedies for a GitHub API failure of the given sub-kind.
pub fn github_guidance(kind: GitHubErrorKind) -> Vec<String> {
    match kind {
        GitHubErrorKind::RateLimit => vec![
            "GitHub API rate limit reached; wait for it to reset".to_string(),
            "Check the reset time with 'gh api rate_limit'".to_string(),
        ],
        GitHubErrorKind::Permissions => vec![
            "Your token lacks permission for this repository or project".to_string(),
            "Refresh scopes with 'gh auth refresh -s repo,project'".to_string(),
        ],
        GitHubErrorKind::NotFound => vec![
            "Check the issue number and that it belongs to this repository".to_string(),
            "Confirm the repository with 'gh repo view'".to_string(),
        ],
        GitHubErrorKind::Other => vec!["See the gh output above for details".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GhimError;
    use crate::gh::fake::FakeGitHub;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn handler(dir: &TempDir) -> ErrorHandler {
        ErrorHandler::new(ErrorLog::new(dir.path().join("logs").join("errors.log")))
            .with_retry_delay(Duration::ZERO)
            .with_env_file(dir.path().join(".env"))
    }

    #[test]
    fn test_from_tag_falls_back_to_unknown() {
        assert_eq!(ErrorKind::from_tag("network"), ErrorKind::Network);
        assert_eq!(ErrorKind::from_tag("GitHub"), ErrorKind::GitHub);
        assert_eq!(ErrorKind::from_tag("disk"), ErrorKind::Unknown);
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_tag(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("To get started with GitHub CLI, please run:  gh auth login"),
            ErrorKind::Auth
        );
        assert_eq!(classify("HTTP 401: Bad credentials"), ErrorKind::Auth);
        assert_eq!(
            classify("error connecting to api.github.com"),
            ErrorKind::Network
        );
        assert_eq!(classify("dial tcp: i/o timeout"), ErrorKind::Network);
        assert_eq!(
            classify("HTTP 403: API rate limit exceeded"),
            ErrorKind::GitHub
        );
        assert_eq!(
            classify("GraphQL: Could not resolve to an Issue"),
            ErrorKind::GitHub
        );
        assert_eq!(classify("something odd"), ErrorKind::Unknown);
    }

    #[test]
    fn test_github_sub_kind() {
        assert_eq!(
            GitHubErrorKind::infer("HTTP 403: API rate limit exceeded for user"),
            GitHubErrorKind::RateLimit
        );
        assert_eq!(
            GitHubErrorKind::infer("HTTP 403: Resource not accessible by integration"),
            GitHubErrorKind::Permissions
        );
        assert_eq!(
            GitHubErrorKind::infer("HTTP 404: Not Found"),
            GitHubErrorKind::NotFound
        );
        assert_eq!(GitHubErrorKind::infer("HTTP 422"), GitHubErrorKind::Other);
    }

    #[test]
    fn test_record_line_round_trip() {
        let record = ErrorRecord::new(ErrorKind::Network, "timed out\nafter 30s", "issue create");
        let parsed = ErrorRecord::parse_line(&record.to_line()).unwrap();
        assert_eq!(parsed.kind, ErrorKind::Network);
        assert_eq!(parsed.context, "issue create");
        assert_eq!(parsed.message, "timed out after 30s");
    }

    #[test]
    fn test_every_handled_error_is_logged() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let mut env = RecoveryEnv::non_interactive();

        handler.handle_error(ErrorKind::GitHub, "HTTP 404: Not Found", "view issue", &mut env);
        handler.handle_error(ErrorKind::Unknown, "boom", "status", &mut env);
        handler.handle_error(ErrorKind::Dependency, "Required tool not found: gh", "startup", &mut env);

        let stats = handler.log().stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_kind.get(&ErrorKind::GitHub), Some(&1));
        assert_eq!(stats.last.unwrap().kind, ErrorKind::Dependency);
    }

    #[test]
    fn test_unwritable_log_does_not_fail() {
        let dir = TempDir::new().unwrap();
        // The log path is a directory, so appending fails
        let mut handler = ErrorHandler::new(ErrorLog::new(dir.path()))
            .with_retry_delay(Duration::ZERO);
        let recovery = handler.handle_error(
            ErrorKind::Unknown,
            "boom",
            "test",
            &mut RecoveryEnv::non_interactive(),
        );
        assert_eq!(recovery, Recovery::GiveUp);
    }

    #[test]
    fn test_clear_log() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        handler.handle_error(ErrorKind::Input, "bad", "menu", &mut RecoveryEnv::non_interactive());
        assert_eq!(handler.log().stats().total, 1);

        handler.log().clear().unwrap();
        assert_eq!(handler.log().stats().total, 0);
        // clearing twice is fine
        handler.log().clear().unwrap();
    }

    #[test]
    fn test_network_retry_is_capped() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let mut env = RecoveryEnv::non_interactive();

        for attempt in 1..=MAX_NETWORK_RETRIES {
            assert_eq!(
                handler.handle_error(ErrorKind::Network, "timeout", "list", &mut env),
                Recovery::Retry
            );
            assert_eq!(handler.retry_attempts(), attempt);
        }
        assert_eq!(
            handler.handle_error(ErrorKind::Network, "timeout", "list", &mut env),
            Recovery::GiveUp
        );
    }

    #[test]
    fn test_retry_succeeds_after_transient_network_errors() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let client = FakeGitHub::new();
        client.fail_times("list_issues", 2, "error connecting to api.github.com");

        let issues = handler
            .retry("list issues", &mut RecoveryEnv::non_interactive(), || {
                client.list_issues(crate::gh::IssueState::Open, 10)
            })
            .unwrap();

        assert!(issues.is_empty());
        assert_eq!(client.call_count("list_issues"), 3);
        assert_eq!(handler.retry_attempts(), 0);
    }

    #[test]
    fn test_retry_gives_up_after_cap() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let client = FakeGitHub::new();
        client.fail("repo", "dial tcp: i/o timeout");

        let result = handler.retry("repo", &mut RecoveryEnv::non_interactive(), || client.repo());

        assert!(result.is_err());
        assert_eq!(
            client.call_count("repo"),
            1 + MAX_NETWORK_RETRIES as usize
        );
    }

    #[test]
    fn test_retry_does_not_repeat_github_errors() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let client = FakeGitHub::new();

        let result = handler.retry("view", &mut RecoveryEnv::non_interactive(), || {
            client.view_issue(99)
        });

        assert!(matches!(result, Err(GhimError::GhCommand { .. })));
        assert_eq!(client.call_count("view_issue"), 1);
    }

    #[test]
    fn test_auth_recovery_runs_login_when_confirmed() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let client = FakeGitHub::new();
        client.set_authenticated(false);
        let mut prompter = Prompter::from_reader(Cursor::new("y\n"));

        let recovery = handler.handle_error(
            ErrorKind::Auth,
            "not logged in",
            "startup",
            &mut RecoveryEnv::interactive(&client, &mut prompter),
        );

        assert_eq!(recovery, Recovery::Retry);
        assert!(client.is_authenticated());

        // Only one login attempt per operation
        let recovery = handler.handle_error(
            ErrorKind::Auth,
            "not logged in",
            "startup",
            &mut RecoveryEnv::interactive(&client, &mut prompter),
        );
        assert_eq!(recovery, Recovery::GiveUp);
    }

    #[test]
    fn test_auth_recovery_non_interactive_gives_up() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let recovery = handler.handle_error(
            ErrorKind::Auth,
            "not logged in",
            "startup",
            &mut RecoveryEnv::non_interactive(),
        );
        assert_eq!(recovery, Recovery::GiveUp);
    }

    #[test]
    fn test_config_recovery_scaffolds_env_file() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        let client = FakeGitHub::new();
        let mut prompter = Prompter::from_reader(Cursor::new("yes\n"));

        let recovery = handler.handle_error(
            ErrorKind::Config,
            "LOG_LEVEL must be one of DEBUG, INFO, WARN, ERROR",
            "startup",
            &mut RecoveryEnv::interactive(&client, &mut prompter),
        );

        assert_eq!(recovery, Recovery::Retry);
        assert!(dir.path().join(".env").exists());
    }

    #[test]
    fn test_input_violation_is_logged() {
        let dir = TempDir::new().unwrap();
        let mut handler = handler(&dir);
        handler.handle_input_violation(&InputViolation::NotNumeric("abc".into()), "menu option");
        let stats = handler.log().stats();
        assert_eq!(stats.by_kind.get(&ErrorKind::Input), Some(&1));
    }

    #[test]
    fn test_report_logs_without_retrying() {
        let dir = TempDir::new().unwrap();
        let handler = handler(&dir);
        handler.report(ErrorKind::Network, "timed out", "issue create");
        assert_eq!(handler.retry_attempts(), 0);
        assert_eq!(handler.log().stats().by_kind.get(&ErrorKind::Network), Some(&1));
    }

    #[test]
    fn test_remedies_per_kind() {
        let dir = TempDir::new().unwrap();
        let handler = handler(&dir);
        for kind in ErrorKind::ALL {
            assert!(!handler.remedies(kind, "x").is_empty(), "{}", kind);
        }
        assert!(handler
            .remedies(ErrorKind::GitHub, "HTTP 403: API rate limit exceeded")
            .iter()
            .any(|r| r.contains("rate limit")));
        assert!(handler
            .remedies(ErrorKind::Config, "bad")
            .iter()
            .any(|r| r.contains(".env")));
    }

    #[test]
    fn test_installation_guide() {
        assert!(installation_guide("gh")
            .iter()
            .any(|line| line.contains("cli.github.com")));
        assert_eq!(missing_tool("Required tool not found: git"), "git");
        assert_eq!(missing_tool("jq missing"), "missing");
    }
}
