//! Parsing of `git status --porcelain` output into change-sets.
//!
//! Each line is `XY PATH` (or `XY ORIG -> PATH` for renames and copies),
//! where `X` describes the index and `Y` the working tree. Parsing is
//! lenient: blank and malformed lines are skipped so new indicator kinds
//! in future `git` versions degrade gracefully.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

// =============================================================================
// Indicator codes
// =============================================================================

/// One slot of the two-letter status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// ` `
    Unmodified,
    /// `M`
    Modified,
    /// `T`
    TypeChanged,
    /// `A`
    Added,
    /// `D`
    Deleted,
    /// `R`
    Renamed,
    /// `C`
    Copied,
    /// `U`
    Unmerged,
    /// `?`
    Untracked,
    /// `!`
    Ignored,
    /// Any letter this parser does not know yet
    Other(char),
}

impl StatusCode {
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => StatusCode::Unmodified,
            'M' => StatusCode::Modified,
            'T' => StatusCode::TypeChanged,
            'A' => StatusCode::Added,
            'D' => StatusCode::Deleted,
            'R' => StatusCode::Renamed,
            'C' => StatusCode::Copied,
            'U' => StatusCode::Unmerged,
            '?' => StatusCode::Untracked,
            '!' => StatusCode::Ignored,
            other => StatusCode::Other(other),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            StatusCode::Unmodified => ' ',
            StatusCode::Modified => 'M',
            StatusCode::TypeChanged => 'T',
            StatusCode::Added => 'A',
            StatusCode::Deleted => 'D',
            StatusCode::Renamed => 'R',
            StatusCode::Copied => 'C',
            StatusCode::Unmerged => 'U',
            StatusCode::Untracked => '?',
            StatusCode::Ignored => '!',
            StatusCode::Other(c) => c,
        }
    }

    /// True for anything but a blank slot.
    pub fn is_change(self) -> bool {
        self != StatusCode::Unmodified
    }

    fn carries_original_path(self) -> bool {
        matches!(self, StatusCode::Renamed | StatusCode::Copied)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

// =============================================================================
// Entries
// =============================================================================

/// A single parsed status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub index: StatusCode,
    pub worktree: StatusCode,
    /// Path relative to the working directory (the new path for renames)
    pub path: String,
    /// Source path of a rename or copy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
}

impl StatusEntry {
    pub fn is_untracked(&self) -> bool {
        self.index == StatusCode::Untracked && self.worktree == StatusCode::Untracked
    }

    pub fn is_ignored(&self) -> bool {
        self.index == StatusCode::Ignored && self.worktree == StatusCode::Ignored
    }

    /// Unmerged paths: any `U`, or both sides added / both deleted.
    pub fn is_conflicted(&self) -> bool {
        use StatusCode::*;
        matches!(
            (self.index, self.worktree),
            (Unmerged, _) | (_, Unmerged) | (Added, Added) | (Deleted, Deleted)
        )
    }

    /// Has a change recorded in the index.
    pub fn is_staged(&self) -> bool {
        !self.is_untracked() && !self.is_ignored() && !self.is_conflicted() && self.index.is_change()
    }

    /// Has a change in the working tree that is not in the index.
    ///
    /// Untracked files and conflicts count as unstaged.
    pub fn is_unstaged(&self) -> bool {
        if self.is_ignored() {
            return false;
        }
        self.is_untracked() || self.is_conflicted() || self.worktree.is_change()
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.original_path {
            Some(original) => write!(
                f,
                "{}{} {} -> {}",
                self.index, self.worktree, original, self.path
            ),
            None => write!(f, "{}{} {}", self.index, self.worktree, self.path),
        }
    }
}

// =============================================================================
// Change-set
// =============================================================================

/// Staged and unstaged paths, each sorted and free of duplicates.
///
/// A path with both staged and unstaged modifications appears in both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub staged: Vec<String>,
    pub unstaged: Vec<String>,
}

impl ChangeSet {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a StatusEntry>) -> Self {
        let mut staged = BTreeSet::new();
        let mut unstaged = BTreeSet::new();

        for entry in entries {
            if entry.is_staged() {
                staged.insert(entry.path.clone());
            }
            if entry.is_unstaged() {
                unstaged.insert(entry.path.clone());
            }
        }

        Self {
            staged: staged.into_iter().collect(),
            unstaged: unstaged.into_iter().collect(),
        }
    }

    /// Parse porcelain text straight into a change-set.
    pub fn parse(text: &str) -> Self {
        Self::from_entries(&parse_porcelain(text))
    }

    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse porcelain v1 status text, skipping lines that do not fit the format.
pub fn parse_porcelain(text: &str) -> Vec<StatusEntry> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<StatusEntry> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    // Branch headers from `--branch`.
    if line.starts_with("##") {
        return None;
    }

    let mut chars = line.chars();
    let index = StatusCode::from_char(chars.next()?);
    let worktree = StatusCode::from_char(chars.next()?);
    if chars.next()? != ' ' {
        return None;
    }
    let rest = chars.as_str();

    let has_original = index.carries_original_path() || worktree.carries_original_path();
    let (first, remainder) = take_path(rest, has_original)?;

    let (path, original_path) = if remainder.is_empty() {
        (first, None)
    } else {
        let second = remainder.strip_prefix(" -> ")?;
        let (second, tail) = take_path(second, false)?;
        if !tail.is_empty() {
            return None;
        }
        (second, Some(first))
    };

    Some(StatusEntry {
        index,
        worktree,
        path,
        original_path,
    })
}

/// Read one path, quoted or bare, returning it with the unconsumed remainder.
fn take_path(s: &str, stop_at_arrow: bool) -> Option<(String, &str)> {
    if let Some(quoted) = s.strip_prefix('"') {
        return unquote(quoted);
    }

    let end = if stop_at_arrow {
        s.find(" -> ").unwrap_or(s.len())
    } else {
        s.len()
    };
    let path = &s[..end];
    if path.is_empty() {
        return None;
    }
    Some((path.to_string(), &s[end..]))
}

/// Decode a C-style quoted path; `s` starts just after the opening quote.
fn unquote(s: &str) -> Option<(String, &str)> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                if out.is_empty() {
                    return None;
                }
                let path = String::from_utf8_lossy(&out).into_owned();
                return Some((path, &s[i + 1..]));
            }
            b'\\' => {
                let escaped = *bytes.get(i + 1)?;
                match escaped {
                    b'0'..=b'7' => {
                        let digits = bytes.get(i + 1..i + 4)?;
                        let mut value: u32 = 0;
                        for &d in digits {
                            if !(b'0'..=b'7').contains(&d) {
                                return None;
                            }
                            value = value * 8 + u32::from(d - b'0');
                        }
                        out.push(u8::try_from(value).ok()?);
                        i += 4;
                        continue;
                    }
                    b'n' => out.push(b'\n'),
                    b't' => out.push(b'\t'),
                    b'r' => out.push(b'\r'),
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'v' => out.push(0x0b),
                    b'"' | b'\\' => out.push(escaped),
                    _ => return None,
                }
                i += 2;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    // Unterminated quote
    None
}
