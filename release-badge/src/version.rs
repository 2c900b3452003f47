use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\.([0-9]+)\.([0-9]+)").expect("version pattern is valid"));

/// A `major.minor.patch` triple extracted from a release tag.
///
/// Field order matters: the derived `Ord` compares major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extract the first `<digits>.<digits>.<digits>` run from a tag.
///
/// Surrounding whitespace and a single leading `v`/`V` are stripped first.
/// Anything without such a run (including the empty string) yields `None`.
pub fn parse(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let rest = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
        .trim();

    if rest.is_empty() {
        return None;
    }

    let caps = TRIPLE.captures(rest)?;
    Some(Version {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
        patch: caps[3].parse().ok()?,
    })
}

/// Lexicographic comparison on (major, minor, patch).
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}
