//! Sort configuration and the entry comparator.
//!
//! Rules, in order: dot entries first (optional), directory placement, then
//! the primary key with a single optional secondary key as tie-break.
//! Descending order swaps the operands fed to the key comparison, so the
//! tie-break observes the same direction while the first two rules do not.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::fs::entry::DirectoryEntry;

/// A column / sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SectionType {
    /// No key; as a secondary key this disables the tie-break.
    #[default]
    Unknown,
    FileName,
    FileType,
    FileSize,
    Owner,
    Group,
    Permissions,
    Created,
    LastModified,
}

impl SectionType {
    /// Parse a key name from config or CLI input.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "unknown" => Some(SectionType::Unknown),
            "name" => Some(SectionType::FileName),
            "type" | "ext" | "extension" => Some(SectionType::FileType),
            "size" => Some(SectionType::FileSize),
            "owner" => Some(SectionType::Owner),
            "group" => Some(SectionType::Group),
            "permissions" | "perms" => Some(SectionType::Permissions),
            "created" => Some(SectionType::Created),
            "modified" | "last_modified" => Some(SectionType::LastModified),
            _ => None,
        }
    }
}

/// Where directories go relative to other entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirsType {
    First,
    Last,
    #[default]
    NoSpecify,
}

impl SortDirsType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Some(SortDirsType::First),
            "last" => Some(SortDirsType::Last),
            "none" | "mixed" => Some(SortDirsType::NoSpecify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Ascending),
            "desc" | "descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    #[default]
    Insensitive,
    Sensitive,
}

/// Complete sort configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub primary: SectionType,
    /// Tie-break key; `Unknown` disables it.
    pub secondary: SectionType,
    pub dirs: SortDirsType,
    pub dot_first: bool,
    pub order: SortOrder,
    pub case: CaseSensitivity,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            primary: SectionType::FileName,
            secondary: SectionType::Unknown,
            dirs: SortDirsType::NoSpecify,
            dot_first: true,
            order: SortOrder::Ascending,
            case: CaseSensitivity::Insensitive,
        }
    }
}

impl SortConfig {
    /// Total ordering of two entries under this configuration.
    pub fn compare(&self, l: &DirectoryEntry, r: &DirectoryEntry) -> Ordering {
        if self.dot_first {
            let order = dot_rank(l).cmp(&dot_rank(r));
            if order != Ordering::Equal {
                return order;
            }
        }

        let placement = match self.dirs {
            SortDirsType::First => r.is_dir().cmp(&l.is_dir()),
            SortDirsType::Last => l.is_dir().cmp(&r.is_dir()),
            SortDirsType::NoSpecify => Ordering::Equal,
        };
        if placement != Ordering::Equal {
            return placement;
        }

        let (a, b) = match self.order {
            SortOrder::Ascending => (l, r),
            SortOrder::Descending => (r, l),
        };
        let primary = compare_key(a, b, self.primary, self.case);
        if primary == Ordering::Equal && self.secondary != SectionType::Unknown {
            return compare_key(a, b, self.secondary, self.case);
        }
        primary
    }
}

/// `.` ranks 0, `..` ranks 1, everything else 2.
fn dot_rank(entry: &DirectoryEntry) -> u8 {
    match entry.name.as_str() {
        "." => 0,
        ".." => 1,
        _ => 2,
    }
}

fn fold(s: &str, case: CaseSensitivity) -> Cow<'_, str> {
    match case {
        CaseSensitivity::Insensitive => Cow::Owned(s.to_lowercase()),
        CaseSensitivity::Sensitive => Cow::Borrowed(s),
    }
}

/// Single-key comparison in ascending direction.
///
/// Under `FileSize` a directory orders before a file even with
/// `SortDirsType::NoSpecify`; two directories compare equal.
fn compare_key(l: &DirectoryEntry, r: &DirectoryEntry, key: SectionType, case: CaseSensitivity) -> Ordering {
    match key {
        SectionType::FileSize => match (l.is_dir(), r.is_dir()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => l.size.cmp(&r.size),
        },
        SectionType::FileType => {
            let (lt, rt) = match (l.display_type(), r.display_type()) {
                ("", "") => (l.name.as_str(), r.name.as_str()),
                pair => pair,
            };
            fold(lt, case).cmp(&fold(rt, case))
        }
        SectionType::LastModified => l.modified.cmp(&r.modified),
        SectionType::Created => l.created.cmp(&r.created),
        SectionType::Owner => fold(&l.owner, case).cmp(&fold(&r.owner, case)),
        SectionType::Group => fold(&l.group, case).cmp(&fold(&r.group, case)),
        SectionType::Permissions => l.permissions.cmp(&r.permissions),
        SectionType::FileName | SectionType::Unknown => {
            fold(l.display_name(), case).cmp(&fold(r.display_name(), case))
        }
    }
}

/// Stable full re-sort of `entries`.
pub fn sort_entries(entries: &mut [DirectoryEntry], config: &SortConfig) {
    entries.sort_by(|a, b| config.compare(a, b));
}
