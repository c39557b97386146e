//! Semantic version computation for releases.
//!
//! Everything here is pure: no I/O, no external calls.

use std::fmt;
use std::str::FromStr;

use semver::{Prerelease, Version};

use crate::error::{GhimError, Result};

/// Which component of the version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpKind {
    Major,
    Minor,
    #[default]
    Patch,
}

impl BumpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpKind {
    type Err = GhimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            other => Err(GhimError::InvalidInput(format!(
                "bump kind must be major, minor, or patch (got '{}')",
                other
            ))),
        }
    }
}

/// Current and next version of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub current: Version,
    pub next: Version,
    pub bump: BumpKind,
    pub pre_release: Option<String>,
}

impl VersionInfo {
    /// Compute the next version from `current`.
    pub fn compute(current: &str, bump: BumpKind, pre_release: Option<&str>) -> Result<Self> {
        let current = parse_version(current)?;
        let next = bump_version(&current, bump, pre_release)?;
        Ok(Self {
            current,
            next,
            bump,
            pre_release: pre_release.map(str::to_string),
        })
    }

    /// Tag name of the next release, e.g. `v1.3.0`.
    pub fn next_tag(&self) -> String {
        format!("v{}", self.next)
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }
}

/// Parse exactly three dot-separated non-negative integers.
pub fn parse_version(input: &str) -> Result<Version> {
    let invalid = || GhimError::InvalidVersion(input.to_string());

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse().map_err(|_| invalid())?;
    }

    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Version of a git tag such as `v1.2.3`. A missing tag means `0.0.0`.
///
/// Pre-release tags resolve to their base version.
pub fn version_from_tag(tag: Option<&str>) -> Result<Version> {
    let Some(tag) = tag else {
        return Ok(Version::new(0, 0, 0));
    };
    let trimmed = tag.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let base = bare.split(['-', '+']).next().unwrap_or(bare);
    parse_version(base).map_err(|_| GhimError::InvalidVersion(trimmed.to_string()))
}

fn bump_version(current: &Version, bump: BumpKind, pre_release: Option<&str>) -> Result<Version> {
    let increment = |part: u64| {
        part.checked_add(1)
            .ok_or_else(|| GhimError::InvalidVersion(current.to_string()))
    };
    let mut next = match bump {
        BumpKind::Major => Version::new(increment(current.major)?, 0, 0),
        BumpKind::Minor => Version::new(current.major, increment(current.minor)?, 0),
        BumpKind::Patch => Version::new(current.major, current.minor, increment(current.patch)?),
    };

    if let Some(tag) = pre_release {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(GhimError::InvalidPreRelease(tag.to_string()));
        }
        next.pre = Prerelease::new(tag).map_err(|_| GhimError::InvalidPreRelease(tag.to_string()))?;
    }

    Ok(next)
}

/// Compute the next version string.
///
/// `pre_release` carries the optional pre-release tag (e.g. `alpha.1`),
/// appended with a hyphen.
pub fn calculate_next_version(
    current: &str,
    bump: BumpKind,
    pre_release: Option<&str>,
) -> Result<String> {
    let current = parse_version(current)?;
    Ok(bump_version(&current, bump, pre_release)?.to_string())
}

/// Build a pre-release identifier from a channel and the user's tag.
///
/// `("alpha", "1")` gives `alpha.1`; a tag that already names the channel is
/// kept as is.
pub fn pre_release_identifier(channel: &str, tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() {
        channel.to_string()
    } else if tag.starts_with(channel) {
        tag.to_string()
    } else {
        format!("{}.{}", channel, tag)
    }
}
