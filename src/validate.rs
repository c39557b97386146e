//! Input validation shared by the wizard and the standalone commands.
//!
//! Every validator returns a distinct [`InputViolation`] on failure so the
//! caller can hand it to the input-error handler for corrective guidance.

use std::fmt;

use crate::error::{GhimError, Result};

/// Kind of value being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Integer within an inclusive range.
    MenuOption { min: u32, max: u32 },
    /// Positive integer.
    IssueNumber,
    /// `MAJOR.MINOR.PATCH`, no leading `v`.
    Version,
    /// Non-empty after trimming, at least `min_len` characters.
    Text { min_len: usize },
    /// One of y, yes, n, no (any case).
    Confirmation,
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputViolation {
    Empty,
    NotNumeric(String),
    OutOfRange { value: i64, min: u32, max: u32 },
    NotPositive(i64),
    BadVersion(String),
    TooShort { len: usize, min_len: usize },
    NotConfirmation(String),
    NotIssueState(String),
    BadPreRelease(String),
}

impl InputViolation {
    /// Corrective guidance for the user.
    pub fn guidance(&self) -> String {
        match self {
            InputViolation::Empty => "A value is required. Type your answer and press Enter.".to_string(),
            InputViolation::NotNumeric(_) => "Enter digits only, for example 1 or 42.".to_string(),
            InputViolation::OutOfRange { min, max, .. } => {
                format!("Choose a number between {} and {}.", min, max)
            }
            InputViolation::NotPositive(_) => {
                "Issue numbers start at 1. Enter the number shown after '#' on GitHub.".to_string()
            }
            InputViolation::BadVersion(_) => {
                "Use three dot-separated numbers without a 'v' prefix, for example 1.4.0.".to_string()
            }
            InputViolation::TooShort { min_len, .. } => {
                format!("Enter at least {} characters.", min_len)
            }
            InputViolation::NotConfirmation(_) => "Answer y, yes, n, or no.".to_string(),
            InputViolation::NotIssueState(_) => {
                "Type open or closed, or leave it blank to keep the current state.".to_string()
            }
            InputViolation::BadPreRelease(_) => {
                "Use dot-separated letters, digits and hyphens, for example alpha.1 or rc.2."
                    .to_string()
            }
        }
    }
}

impl fmt::Display for InputViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputViolation::Empty => write!(f, "input is empty"),
            InputViolation::NotNumeric(raw) => write!(f, "'{}' is not a number", raw),
            InputViolation::OutOfRange { value, min, max } => {
                write!(f, "{} is outside the range {}-{}", value, min, max)
            }
            InputViolation::NotPositive(value) => write!(f, "{} is not a positive number", value),
            InputViolation::BadVersion(raw) => write!(f, "'{}' is not a MAJOR.MINOR.PATCH version", raw),
            InputViolation::TooShort { len, min_len } => {
                write!(f, "input has {} characters, at least {} required", len, min_len)
            }
            InputViolation::NotConfirmation(raw) => write!(f, "'{}' is not a yes/no answer", raw),
            InputViolation::NotIssueState(raw) => write!(f, "'{}' is not an issue state", raw),
            InputViolation::BadPreRelease(raw) => {
                write!(f, "'{}' is not a valid pre-release tag", raw)
            }
        }
    }
}

/// Validate `raw` as the given kind of input.
pub fn validate_input(kind: InputKind, raw: &str) -> std::result::Result<(), InputViolation> {
    match kind {
        InputKind::MenuOption { min, max } => parse_menu_choice(raw, min, max).map(|_| ()),
        InputKind::IssueNumber => parse_issue_number(raw).map(|_| ()),
        InputKind::Version => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(InputViolation::Empty);
            }
            crate::version::parse_version(trimmed)
                .map(|_| ())
                .map_err(|_| InputViolation::BadVersion(trimmed.to_string()))
        }
        InputKind::Text { min_len } => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(InputViolation::Empty);
            }
            let len = trimmed.chars().count();
            if len < min_len {
                return Err(InputViolation::TooShort { len, min_len });
            }
            Ok(())
        }
        InputKind::Confirmation => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(InputViolation::Empty);
            }
            parse_confirmation(trimmed)
                .map(|_| ())
                .ok_or_else(|| InputViolation::NotConfirmation(trimmed.to_string()))
        }
    }
}

fn parse_integer(raw: &str) -> std::result::Result<i64, InputViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputViolation::Empty);
    }
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputViolation::NotNumeric(trimmed.to_string()));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| InputViolation::NotNumeric(trimmed.to_string()))
}

/// Parse a menu choice within the inclusive range `min..=max`.
pub fn parse_menu_choice(raw: &str, min: u32, max: u32) -> std::result::Result<u32, InputViolation> {
    let value = parse_integer(raw)?;
    if value < i64::from(min) || value > i64::from(max) {
        return Err(InputViolation::OutOfRange { value, min, max });
    }
    Ok(value as u32)
}

/// Parse a positive issue number.
pub fn parse_issue_number(raw: &str) -> std::result::Result<u64, InputViolation> {
    let value = parse_integer(raw)?;
    if value <= 0 {
        return Err(InputViolation::NotPositive(value));
    }
    Ok(value as u64)
}

/// Interpret a yes/no answer. Anything else is `None`.
pub fn parse_confirmation(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parse an inclusive range spec such as `"1-5"`.
pub fn parse_range(spec: &str) -> Result<(u32, u32)> {
    let invalid = || GhimError::InvalidInput(format!("'{}' is not a range like 1-5", spec));
    let (min, max) = spec.trim().split_once('-').ok_or_else(invalid)?;
    let min: u32 = min.trim().parse().map_err(|_| invalid())?;
    let max: u32 = max.trim().parse().map_err(|_| invalid())?;
    if min > max {
        return Err(invalid());
    }
    Ok((min, max))
}

/// Check the four positional arguments of issue creation.
///
/// Unlike the interactive prompts this is fatal: the first empty or
/// whitespace-only argument is reported as missing.
pub fn validate_issue_args(
    parent_title: &str,
    parent_body: &str,
    child_title: &str,
    child_body: &str,
) -> Result<()> {
    let args = [
        ("PARENT_TITLE", parent_title),
        ("PARENT_BODY", parent_body),
        ("CHILD_TITLE", child_title),
        ("CHILD_BODY", child_body),
    ];
    for (name, value) in args {
        if value.trim().is_empty() {
            return Err(GhimError::MissingArgument(name.to_string()));
        }
    }
    Ok(())
}
