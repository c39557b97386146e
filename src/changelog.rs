//! Keep-a-Changelog generation from conventional commits.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::Result;
use crate::git::Commit;

/// `type(scope)!: description`
static CONVENTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[A-Za-z]+)(?:\([^)]*\))?(?P<breaking>!)?:\s*(?P<desc>.+)$")
        .expect("conventional commit pattern is valid")
});

/// `fixes #12`, `Closes #3`, `resolved #7` ...
static RESOLVES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:fix(?:e[sd])?|close[sd]?|resolve[sd]?)\s+#(\d+)\b")
        .expect("issue reference pattern is valid")
});

pub const CHANGELOG_HEADER: &str = "# Changelog\n\n\
All notable changes to this project will be documented in this file.\n\n\
The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.1.0/),\n\
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).\n";

/// Changelog section a commit lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeGroup {
    Added,
    Fixed,
    Changed,
}

impl ChangeGroup {
    pub const ORDER: [ChangeGroup; 3] = [ChangeGroup::Added, ChangeGroup::Fixed, ChangeGroup::Changed];

    pub fn heading(&self) -> &'static str {
        match self {
            ChangeGroup::Added => "Added",
            ChangeGroup::Fixed => "Fixed",
            ChangeGroup::Changed => "Changed",
        }
    }
}

/// One changelog line derived from a commit subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub group: ChangeGroup,
    pub description: String,
    pub breaking: bool,
}

impl ChangeEntry {
    /// Classify a commit subject. Non-conventional subjects are kept whole
    /// under `Changed`.
    pub fn from_subject(subject: &str) -> Self {
        let subject = subject.trim();
        match CONVENTIONAL.captures(subject) {
            Some(caps) => {
                let group = match caps["type"].to_ascii_lowercase().as_str() {
                    "feat" => ChangeGroup::Added,
                    "fix" => ChangeGroup::Fixed,
                    _ => ChangeGroup::Changed,
                };
                ChangeEntry {
                    group,
                    description: caps["desc"].trim().to_string(),
                    breaking: caps.name("breaking").is_some(),
                }
            }
            None => ChangeEntry {
                group: ChangeGroup::Changed,
                description: subject.to_string(),
                breaking: false,
            },
        }
    }

    fn render(&self) -> String {
        if self.breaking {
            format!("- **BREAKING:** {}", self.description)
        } else {
            format!("- {}", self.description)
        }
    }
}

/// Entries for `commits` in commit order, skipping empty subjects.
pub fn collect_entries(commits: &[Commit]) -> Vec<ChangeEntry> {
    commits
        .iter()
        .filter(|c| !c.subject.trim().is_empty())
        .map(|c| ChangeEntry::from_subject(&c.subject))
        .collect()
}

/// Render the section for one release.
///
/// Groups appear in Added, Fixed, Changed order and empty groups are
/// omitted. A release without commits still gets a header and a note.
pub fn render_section(version_tag: &str, date: NaiveDate, entries: &[ChangeEntry]) -> String {
    let mut out = format!("## [{}] - {}\n", version_tag, date.format("%Y-%m-%d"));

    if entries.is_empty() {
        out.push_str("\n- No notable changes\n");
        return out;
    }

    for group in ChangeGroup::ORDER {
        let lines: Vec<String> = entries
            .iter()
            .filter(|e| e.group == group)
            .map(ChangeEntry::render)
            .collect();
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("\n### {}\n\n", group.heading()));
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Insert `section` above the first release section of `existing`.
///
/// Anything before the first `## [` heading (title, intro, an
/// `[Unreleased]` section is a release heading too) stays on top. A missing
/// or empty changelog gets the standard header.
pub fn prepend_section(existing: Option<&str>, section: &str) -> String {
    let section = section.trim_end();
    let existing = existing.unwrap_or("");

    if existing.trim().is_empty() {
        return format!("{}\n{}\n", CHANGELOG_HEADER, section);
    }

    let insert_at = if existing.starts_with("## [") {
        Some(0)
    } else {
        existing.find("\n## [").map(|i| i + 1)
    };

    match insert_at {
        Some(i) => {
            let (head, tail) = existing.split_at(i);
            format!("{}{}\n\n{}", head, section, tail)
        }
        None => format!("{}\n\n{}\n", existing.trim_end(), section),
    }
}

/// Replace every occurrence of `old` with `new` in README text.
///
/// Matches are whole version strings: `1.0.0` does not match inside
/// `11.0.0` or `1.0.01`.
pub fn replace_version(text: &str, old: &str, new: &str) -> String {
    if old.is_empty() || old == new {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = text[pos..].find(old) {
        let start = pos + found;
        let end = start + old.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        let bounded = !before.is_some_and(|c| c.is_ascii_digit() || c == '.')
            && !after.is_some_and(|c| c.is_ascii_digit());

        if bounded {
            out.push_str(&text[pos..start]);
            out.push_str(new);
            pos = end;
        } else {
            let step = start + text[start..].chars().next().map_or(1, char::len_utf8);
            out.push_str(&text[pos..step]);
            pos = step;
        }
    }
    out.push_str(&text[pos..]);
    out
}

/// Issue numbers referenced as resolved in commit subjects or bodies,
/// in first-seen order without duplicates.
pub fn find_resolved_issues(commits: &[Commit]) -> Vec<u64> {
    let mut found = Vec::new();
    for commit in commits {
        for text in [&commit.subject, &commit.body] {
            for caps in RESOLVES.captures_iter(text) {
                if let Ok(n) = caps[1].parse::<u64>() {
                    if n > 0 && !found.contains(&n) {
                        found.push(n);
                    }
                }
            }
        }
    }
    found
}

/// `<path>.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}

/// Copy `path` to `<path>.backup`. Returns `None` when there is nothing to
/// back up.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    tracing::debug!(file = %path.display(), backup = %backup.display(), "backed up");
    Ok(Some(backup))
}
