use crate::error::{GhimError, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Name of the dotenv file read from the working directory.
pub const ENV_FILE_NAME: &str = ".env";

const DEFAULT_LOG_FILE: &str = "./logs/gh-issue-manager.log";
const DEFAULT_ERROR_LOG_NAME: &str = "errors.log";
const DEFAULT_LOG_ROTATION_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATION_COUNT: u32 = 5;

/// Template written by `write_env_template`.
const ENV_TEMPLATE_WITH_COMMENTS: &str = r#"# gh-issue-manager configuration
# Values set in the process environment take precedence over this file.

# Logging: write a rotating log file
# - true: log to LOG_FILE at LOG_LEVEL
# - false: no log file (default)
ENABLE_LOGGING=false

# One of DEBUG, INFO, WARN, ERROR
LOG_LEVEL=INFO

# Path of the log file (rotated to .1, .2, ... when it grows too large)
LOG_FILE=./logs/gh-issue-manager.log

# Rotate once the log file exceeds this many bytes, keep this many old files
LOG_ROTATION_SIZE=10485760
LOG_ROTATION_COUNT=5

# Optional: token handed to gh (otherwise gh uses its own login)
# GITHUB_TOKEN=

# Optional: GitHub Project new issues are added to
# PROJECT_URL=https://github.com/users/<owner>/projects/<number>

# Wizard only
DEBUG_MODE=false
VERBOSE_MODE=false
PERFORMANCE_MONITORING=false
"#;

// ============================================================================
// Log level
// ============================================================================

/// Minimum severity written to the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = GhimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(GhimError::Config(format!(
                "LOG_LEVEL must be one of DEBUG, INFO, WARN, ERROR (got '{}')",
                other
            ))),
        }
    }
}

// ============================================================================
// Project reference
// ============================================================================

/// Owner scope of a GitHub Project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOwnerKind {
    User,
    Org,
}

/// A parsed `PROJECT_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub owner_kind: ProjectOwnerKind,
    pub owner: String,
    pub number: u64,
}

impl ProjectRef {
    /// Parse `https://github.com/{users|orgs}/<owner>/projects/<number>`.
    pub fn parse(url: &str) -> Result<Self> {
        let invalid = || {
            GhimError::Config(format!(
                "PROJECT_URL must look like https://github.com/orgs/<owner>/projects/<number> \
                (got '{}')",
                url
            ))
        };

        let rest = url
            .trim()
            .trim_end_matches('/')
            .strip_prefix("https://github.com/")
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = rest.split('/').collect();

        // Project URLs may carry a trailing view, e.g. .../projects/3/views/1
        if parts.len() < 4 || parts[2] != "projects" {
            return Err(invalid());
        }

        let owner_kind = match parts[0] {
            "users" => ProjectOwnerKind::User,
            "orgs" => ProjectOwnerKind::Org,
            _ => return Err(invalid()),
        };
        if parts[1].is_empty() {
            return Err(invalid());
        }
        let number = parts[3].parse::<u64>().map_err(|_| invalid())?;

        Ok(Self {
            owner_kind,
            owner: parts[1].to_string(),
            number,
        })
    }
}

// ============================================================================
// Config
// ============================================================================

/// Effective configuration assembled from `.env` and the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub enable_logging: bool,
    pub log_level: LogLevel,
    pub log_file: PathBuf,
    pub error_log_file: PathBuf,
    pub github_token: Option<String>,
    pub project_url: Option<String>,
    pub debug_mode: bool,
    pub verbose_mode: bool,
    pub performance_monitoring: bool,
    pub log_rotation_size: u64,
    pub log_rotation_count: u32,
}

impl Default for Config {
    fn default() -> Self {
        let log_file = PathBuf::from(DEFAULT_LOG_FILE);
        Self {
            error_log_file: default_error_log(&log_file),
            log_file,
            enable_logging: false,
            log_level: LogLevel::Info,
            github_token: None,
            project_url: None,
            debug_mode: false,
            verbose_mode: false,
            performance_monitoring: false,
            log_rotation_size: DEFAULT_LOG_ROTATION_SIZE,
            log_rotation_count: DEFAULT_LOG_ROTATION_COUNT,
        }
    }
}

fn default_error_log(log_file: &Path) -> PathBuf {
    log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.join(DEFAULT_ERROR_LOG_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG_NAME))
}

impl Config {
    /// Load from `.env` in the working directory and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(ENV_FILE_NAME))
    }

    /// Load using the given dotenv file. A missing file is not an error.
    pub fn load_from(env_file: &Path) -> Result<Self> {
        let file_vars = if env_file.exists() {
            read_env_file(env_file)?
        } else {
            HashMap::new()
        };

        let config = Self::from_sources(&file_vars, |key| std::env::var(key).ok())?;
        tracing::debug!(env_file = %env_file.display(), "configuration loaded");
        Ok(config)
    }

    /// Build a config from dotenv values and an environment lookup.
    ///
    /// The environment lookup wins over dotenv values.
    pub fn from_sources<F>(file_vars: &HashMap<String, String>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> Option<String> {
            env(key)
                .or_else(|| file_vars.get(key).cloned())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Config::default();

        let log_file = get("LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);
        let error_log_file = get("ERROR_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_error_log(&log_file));

        Ok(Self {
            enable_logging: parse_bool("ENABLE_LOGGING", get("ENABLE_LOGGING"), false)?,
            log_level: match get("LOG_LEVEL") {
                Some(v) => v.parse()?,
                None => defaults.log_level,
            },
            log_file,
            error_log_file,
            github_token: get("GITHUB_TOKEN"),
            project_url: get("PROJECT_URL"),
            debug_mode: parse_bool("DEBUG_MODE", get("DEBUG_MODE"), false)?,
            verbose_mode: parse_bool("VERBOSE_MODE", get("VERBOSE_MODE"), false)?,
            performance_monitoring: parse_bool(
                "PERFORMANCE_MONITORING",
                get("PERFORMANCE_MONITORING"),
                false,
            )?,
            log_rotation_size: parse_number(
                "LOG_ROTATION_SIZE",
                get("LOG_ROTATION_SIZE"),
                DEFAULT_LOG_ROTATION_SIZE,
            )?,
            log_rotation_count: parse_number(
                "LOG_ROTATION_COUNT",
                get("LOG_ROTATION_COUNT"),
                DEFAULT_LOG_ROTATION_COUNT,
            )?,
        })
    }

    /// Check settings that parse fine but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.log_rotation_size == 0 {
            return Err(GhimError::Config(
                "LOG_ROTATION_SIZE must be greater than zero".to_string(),
            ));
        }
        if let Some(url) = &self.project_url {
            ProjectRef::parse(url)?;
        }
        Ok(())
    }

    /// The parsed project reference, if `PROJECT_URL` is set.
    pub fn project(&self) -> Result<Option<ProjectRef>> {
        self.project_url.as_deref().map(ProjectRef::parse).transpose()
    }

    /// Key/value pairs for display. The token is masked.
    pub fn display_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ENABLE_LOGGING", self.enable_logging.to_string()),
            ("LOG_LEVEL", self.log_level.to_string()),
            ("LOG_FILE", self.log_file.display().to_string()),
            ("ERROR_LOG_FILE", self.error_log_file.display().to_string()),
            ("LOG_ROTATION_SIZE", self.log_rotation_size.to_string()),
            ("LOG_ROTATION_COUNT", self.log_rotation_count.to_string()),
            (
                "GITHUB_TOKEN",
                match &self.github_token {
                    Some(_) => "(set)".to_string(),
                    None => "(not set)".to_string(),
                },
            ),
            (
                "PROJECT_URL",
                self.project_url
                    .clone()
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            ("DEBUG_MODE", self.debug_mode.to_string()),
            ("VERBOSE_MODE", self.verbose_mode.to_string()),
            (
                "PERFORMANCE_MONITORING",
                self.performance_monitoring.to_string(),
            ),
        ]
    }
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(GhimError::Config(format!(
            "{} must be true or false (got '{}')",
            key, value
        ))),
    }
}

fn parse_number<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| {
            GhimError::Config(format!("{} must be a non-negative integer (got '{}')", key, v))
        }),
    }
}

/// Read a dotenv file into key/value pairs without touching the process
/// environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let config_error =
        |e: dotenvy::Error| GhimError::Config(format!("{}: {}", path.display(), e));

    dotenvy::from_path_iter(path)
        .map_err(config_error)?
        .map(|item| item.map_err(config_error))
        .collect()
}

/// Write a commented `.env` template. Refuses to overwrite an existing file.
pub fn write_env_template(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(GhimError::ConfigExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, ENV_TEMPLATE_WITH_COMMENTS)?;
    tracing::info!(path = %path.display(), "wrote configuration template");
    Ok(())
}

// ============================================================================
// Dependencies
// ============================================================================

/// External tools the commands shell out to.
pub const REQUIRED_TOOLS: &[&str] = &["gh", "git"];

fn on_path(tool: &str) -> bool {
    which::which(tool).is_ok()
}

/// Return the required tools that cannot be found on `PATH`.
pub fn check_dependencies() -> Vec<&'static str> {
    REQUIRED_TOOLS
        .iter()
        .copied()
        .filter(|tool| !on_path(tool))
        .collect()
}

/// Fail with a dependency error naming the first of `tools` not on `PATH`.
pub fn ensure_tools(tools: &[&str]) -> Result<()> {
    first_missing(tools, on_path)
}

/// [`ensure_tools`] over every required tool.
pub fn ensure_dependencies() -> Result<()> {
    ensure_tools(REQUIRED_TOOLS)
}

fn first_missing(tools: &[&str], found: impl Fn(&str) -> bool) -> Result<()> {
    match tools.iter().find(|tool| !found(tool)) {
        Some(tool) => Err(GhimError::DependencyMissing(tool.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_sources(&HashMap::new(), no_env).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.enable_logging);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_file, PathBuf::from("./logs/gh-issue-manager.log"));
        assert_eq!(config.error_log_file, PathBuf::from("./logs/errors.log"));
    }

    #[test]
    fn test_file_values_are_used() {
        let file = vars(&[
            ("ENABLE_LOGGING", "true"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FILE", "/tmp/x/app.log"),
            ("LOG_ROTATION_SIZE", "2048"),
            ("LOG_ROTATION_COUNT", "2"),
        ]);
        let config = Config::from_sources(&file, no_env).unwrap();
        assert!(config.enable_logging);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.error_log_file, PathBuf::from("/tmp/x/errors.log"));
        assert_eq!(config.log_rotation_size, 2048);
        assert_eq!(config.log_rotation_count, 2);
    }

    #[test]
    fn test_environment_wins_over_file() {
        let file = vars(&[("LOG_LEVEL", "DEBUG")]);
        let config = Config::from_sources(&file, |k| {
            (k == "LOG_LEVEL").then(|| "ERROR".to_string())
        })
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_invalid_bool_is_config_error() {
        let file = vars(&[("ENABLE_LOGGING", "maybe")]);
        let err = Config::from_sources(&file, no_env).unwrap_err();
        assert!(matches!(err, GhimError::Config(_)));
        assert!(err.to_string().contains("ENABLE_LOGGING"));
    }

    #[test]
    fn test_invalid_level_is_config_error() {
        let file = vars(&[("LOG_LEVEL", "LOUD")]);
        assert!(Config::from_sources(&file, no_env).is_err());
    }

    #[test]
    fn test_invalid_rotation_size_is_config_error() {
        let file = vars(&[("LOG_ROTATION_SIZE", "big")]);
        assert!(Config::from_sources(&file, no_env).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_rotation_size() {
        let config = Config {
            log_rotation_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_project_url() {
        let config = Config {
            project_url: Some("https://example.com/projects/1".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    fn env_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(".env");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_env_file_handles_comments_quotes_and_export() {
        let dir = TempDir::new().unwrap();
        let path = env_file(
            &dir,
            "# comment\n\
             export LOG_LEVEL=WARN\n\
             PROJECT_URL=\"https://github.com/orgs/acme/projects/7\"\n\
             LOG_FILE='./my logs/app.log'\n\
             ENABLE_LOGGING=true # inline\n",
        );

        let parsed = read_env_file(&path).unwrap();
        assert_eq!(parsed.get("LOG_LEVEL").unwrap(), "WARN");
        assert_eq!(
            parsed.get("PROJECT_URL").unwrap(),
            "https://github.com/orgs/acme/projects/7"
        );
        assert_eq!(parsed.get("LOG_FILE").unwrap(), "./my logs/app.log");
        assert_eq!(parsed.get("ENABLE_LOGGING").unwrap().trim(), "true");
        assert_eq!(parsed.len(), 4);
    }

    #[test]
    fn test_read_env_file_rejects_malformed_line() {
        let dir = TempDir::new().unwrap();
        let path = env_file(&dir, "LOG_LEVEL=WARN\nnot a pair\n");

        let err = read_env_file(&path).unwrap_err();
        assert!(matches!(err, GhimError::Config(_)));
        assert!(err.to_string().contains(".env"));
    }

    #[test]
    fn test_read_env_file_leaves_process_environment_alone() {
        let dir = TempDir::new().unwrap();
        let path = env_file(&dir, "GHIM_TEST_ONLY_KEY=1\n");

        let _lock = crate::test_utils::ENV_MUTEX.lock().unwrap();
        let parsed = read_env_file(&path).unwrap();
        assert_eq!(parsed.get("GHIM_TEST_ONLY_KEY").unwrap(), "1");
        assert!(std::env::var("GHIM_TEST_ONLY_KEY").is_err());
    }

    #[test]
    fn test_project_ref_parse() {
        let project = ProjectRef::parse("https://github.com/orgs/acme/projects/7").unwrap();
        assert_eq!(project.owner_kind, ProjectOwnerKind::Org);
        assert_eq!(project.owner, "acme");
        assert_eq!(project.number, 7);

        let project =
            ProjectRef::parse("https://github.com/users/octocat/projects/12/views/1").unwrap();
        assert_eq!(project.owner_kind, ProjectOwnerKind::User);
        assert_eq!(project.number, 12);

        assert!(ProjectRef::parse("https://github.com/acme/repo").is_err());
        assert!(ProjectRef::parse("https://github.com/orgs/acme/projects/x").is_err());
    }

    #[test]
    fn test_load_from_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "LOG_ROTATION_COUNT=9\n").unwrap();

        let _lock = crate::test_utils::ENV_MUTEX.lock().unwrap();
        let config = Config::load_from(&path).unwrap();
        // Only meaningful when the variable is not exported by the test runner
        if std::env::var("LOG_ROTATION_COUNT").is_err() {
            assert_eq!(config.log_rotation_count, 9);
        }
    }

    #[test]
    fn test_write_env_template_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");

        write_env_template(&path).unwrap();
        let parsed = read_env_file(&path).unwrap();
        assert_eq!(parsed.get("LOG_LEVEL").unwrap(), "INFO");

        let err = write_env_template(&path).unwrap_err();
        assert!(matches!(err, GhimError::ConfigExists(_)));
    }

    #[test]
    fn test_template_parses_into_default_config() {
        let dir = TempDir::new().unwrap();
        let parsed = read_env_file(&env_file(&dir, ENV_TEMPLATE_WITH_COMMENTS)).unwrap();
        let config = Config::from_sources(&parsed, no_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_display_entries_mask_token() {
        let config = Config {
            github_token: Some("ghp_secret".into()),
            ..Default::default()
        };
        let token = config
            .display_entries()
            .into_iter()
            .find(|(k, _)| *k == "GITHUB_TOKEN")
            .unwrap();
        assert_eq!(token.1, "(set)");
    }

    #[test]
    fn test_missing_tool_is_dependency_error() {
        let err = first_missing(REQUIRED_TOOLS, |tool| tool != "git").unwrap_err();
        assert!(matches!(err, GhimError::DependencyMissing(ref tool) if tool == "git"));
        assert_eq!(err.kind(), crate::recovery::ErrorKind::Dependency);
        assert_eq!(err.exit_code(), crate::error::EXIT_GENERAL);

        assert!(first_missing(REQUIRED_TOOLS, |_| true).is_ok());
    }

    #[test]
    fn test_ensure_tools_reports_unknown_binary() {
        let tool = "ghim-no-such-tool-7f3a";
        let err = ensure_tools(&[tool]).unwrap_err();
        assert!(matches!(err, GhimError::DependencyMissing(ref name) if name == tool));
        assert!(ensure_tools(&[]).is_ok());
    }
}
