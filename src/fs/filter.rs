//! Kind, visibility and name-pattern filtering of enumerated entries.

use bitflags::bitflags;
use glob::{MatchOptions, Pattern};

use crate::fs::entry::{DirectoryEntry, EntryKind, PARENT_NAME};
use crate::fs::sort::CaseSensitivity;

bitflags! {
    /// Entry-kind and visibility flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FilterFlags: u32 {
        const DIRS = 1 << 0;
        const FILES = 1 << 1;
        const DRIVES = 1 << 2;
        const ALL_ENTRIES = Self::DIRS.bits() | Self::FILES.bits() | Self::DRIVES.bits();

        const HIDDEN = 1 << 16;
        /// Platform system files (Windows only).
        const SYSTEM = 1 << 17;
    }
}

impl Default for FilterFlags {
    fn default() -> Self {
        FilterFlags::ALL_ENTRIES
    }
}

impl FilterFlags {
    /// Kind bit an entry must have enabled; `None` for the parent entry.
    fn kind_bit(kind: EntryKind) -> Option<FilterFlags> {
        match kind {
            EntryKind::File => Some(FilterFlags::FILES),
            EntryKind::Dir => Some(FilterFlags::DIRS),
            EntryKind::Drive => Some(FilterFlags::DRIVES),
            EntryKind::Parent => None,
        }
    }
}

/// Ordered list of glob name patterns.
///
/// `.` and `..` are never stored; the parent pattern is implicit and always matches.
#[derive(Debug, Clone)]
pub struct NameFilters {
    raw: Vec<String>,
    compiled: Vec<Pattern>,
}

impl Default for NameFilters {
    fn default() -> Self {
        Self::new(["*"])
    }
}

impl NameFilters {
    /// Build from user patterns. Blank entries and `.`/`..` are dropped; a
    /// pattern that is not valid glob syntax matches itself literally.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty() && p != "." && p != PARENT_NAME)
            .collect();
        let compiled = raw
            .iter()
            .filter_map(|p| Pattern::new(p).or_else(|_| Pattern::new(&Pattern::escape(p))).ok())
            .collect();
        Self { raw, compiled }
    }

    /// The user patterns, without the implicit parent pattern.
    pub fn patterns(&self) -> &[String] {
        &self.raw
    }

    /// Whether `name` matches the parent pattern or any configured pattern.
    pub fn matches(&self, name: &str, case: CaseSensitivity) -> bool {
        if name == PARENT_NAME {
            return true;
        }
        let options = MatchOptions {
            case_sensitive: case == CaseSensitivity::Sensitive,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.compiled.iter().any(|p| p.matches_with(name, options))
    }
}

/// Inclusion rules applied after enumeration.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub flags: FilterFlags,
    pub names: NameFilters,
}

impl FilterConfig {
    /// Kind and visibility check, without name patterns.
    fn passes_kind_and_visibility(&self, entry: &DirectoryEntry, kinds: FilterFlags) -> bool {
        let Some(bit) = FilterFlags::kind_bit(entry.kind) else {
            return true;
        };
        if !kinds.contains(bit) {
            return false;
        }
        if entry.is_hidden && !self.flags.contains(FilterFlags::HIDDEN) {
            return false;
        }
        if entry.is_system && !self.flags.contains(FilterFlags::SYSTEM) {
            return false;
        }
        true
    }

    /// Whether `entry` belongs in the view. The parent entry is always kept.
    pub fn accepts(&self, entry: &DirectoryEntry, case: CaseSensitivity) -> bool {
        if entry.is_parent() {
            return true;
        }
        self.passes_kind_and_visibility(entry, self.flags)
            && self.names.matches(&entry.name, case)
    }

    /// Apply the filter, keeping enumeration order.
    pub fn apply(&self, entries: &[DirectoryEntry], case: CaseSensitivity) -> Vec<DirectoryEntry> {
        entries
            .iter()
            .filter(|e| self.accepts(e, case))
            .cloned()
            .collect()
    }

    /// Count non-parent entries whose kind is enabled in both `kinds` and the
    /// configured flags and which pass the visibility flags. Name patterns are ignored.
    pub fn count(&self, entries: &[DirectoryEntry], kinds: FilterFlags) -> usize {
        let kinds = kinds & self.flags;
        entries
            .iter()
            .filter(|e| !e.is_parent())
            .filter(|e| self.passes_kind_and_visibility(e, kinds))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, kind: EntryKind) -> DirectoryEntry {
        let (base_name, suffix) = crate::fs::entry::split_name(name);
        DirectoryEntry {
            path: PathBuf::from("/tmp/x").join(name),
            name: name.to_string(),
            base_name,
            suffix,
            kind,
            size: 0,
            created: None,
            modified: None,
            owner: String::new(),
            group: String::new(),
            permissions: 0o644,
            is_hidden: name.starts_with('.') && kind != EntryKind::Parent,
            is_system: false,
            is_writable: true,
            is_symlink: false,
        }
    }

    fn sample() -> Vec<DirectoryEntry> {
        vec![
            entry("..", EntryKind::Parent),
            entry("sub", EntryKind::Dir),
            entry("a.txt", EntryKind::File),
            entry("B.TXT", EntryKind::File),
            entry("main.rs", EntryKind::File),
            entry(".env", EntryKind::File),
        ]
    }

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn default_keeps_all_visible_entries() {
        let config = FilterConfig::default();
        let kept = config.apply(&sample(), CaseSensitivity::Insensitive);
        assert_eq!(names(&kept), vec!["..", "sub", "a.txt", "B.TXT", "main.rs"]);
    }

    #[test]
    fn hidden_flag_reveals_dotfiles() {
        let config = FilterConfig {
            flags: FilterFlags::ALL_ENTRIES | FilterFlags::HIDDEN,
            ..Default::default()
        };
        let kept = config.apply(&sample(), CaseSensitivity::Insensitive);
        assert!(names(&kept).contains(&".env"));
    }

    #[test]
    fn without_dirs_only_parent_remains() {
        let config = FilterConfig {
            flags: FilterFlags::FILES,
            ..Default::default()
        };
        let kept = config.apply(&sample(), CaseSensitivity::Insensitive);
        assert!(kept.iter().filter(|e| e.is_dir()).all(|e| e.is_parent()));
        assert_eq!(kept[0].name, "..");
    }

    #[test]
    fn glob_filter_is_case_aware() {
        let config = FilterConfig {
            names: NameFilters::new(["*.txt"]),
            ..Default::default()
        };
        let insensitive = config.apply(&sample(), CaseSensitivity::Insensitive);
        assert_eq!(names(&insensitive), vec!["..", "a.txt", "B.TXT"]);

        let sensitive = config.apply(&sample(), CaseSensitivity::Sensitive);
        assert_eq!(names(&sensitive), vec!["..", "a.txt"]);
    }

    #[test]
    fn question_mark_matches_one_char() {
        let filters = NameFilters::new(["?.txt"]);
        assert!(filters.matches("a.txt", CaseSensitivity::Sensitive));
        assert!(!filters.matches("ab.txt", CaseSensitivity::Sensitive));
    }

    #[test]
    fn any_pattern_may_match() {
        let filters = NameFilters::new(["*.rs", "*.txt"]);
        assert!(filters.matches("main.rs", CaseSensitivity::Sensitive));
        assert!(filters.matches("a.txt", CaseSensitivity::Sensitive));
        assert!(!filters.matches("Cargo.toml", CaseSensitivity::Sensitive));
    }

    #[test]
    fn dot_patterns_are_dropped() {
        let filters = NameFilters::new([".", "..", " ", "*.md"]);
        assert_eq!(filters.patterns(), &["*.md".to_string()]);
        assert!(filters.matches("..", CaseSensitivity::Sensitive));
    }

    #[test]
    fn empty_pattern_list_keeps_only_parent() {
        let config = FilterConfig {
            names: NameFilters::new(Vec::<String>::new()),
            ..Default::default()
        };
        let kept = config.apply(&sample(), CaseSensitivity::Insensitive);
        assert_eq!(names(&kept), vec![".."]);
    }

    #[test]
    fn invalid_glob_matches_literally() {
        let filters = NameFilters::new(["[abc"]);
        assert!(filters.matches("[abc", CaseSensitivity::Sensitive));
        assert!(!filters.matches("a", CaseSensitivity::Sensitive));
    }

    #[test]
    fn star_matches_dotfiles() {
        let filters = NameFilters::default();
        assert!(filters.matches(".env", CaseSensitivity::Sensitive));
    }

    #[test]
    fn system_entries_need_system_flag() {
        let mut sys = entry("pagefile.sys", EntryKind::File);
        sys.is_system = true;
        let config = FilterConfig::default();
        assert!(!config.accepts(&sys, CaseSensitivity::Insensitive));

        let config = FilterConfig {
            flags: FilterFlags::ALL_ENTRIES | FilterFlags::SYSTEM,
            ..Default::default()
        };
        assert!(config.accepts(&sys, CaseSensitivity::Insensitive));
    }

    #[test]
    fn count_intersects_kind_masks_and_ignores_names() {
        let config = FilterConfig {
            flags: FilterFlags::FILES,
            names: NameFilters::new(["*.rs"]),
        };
        let entries = sample();
        // Dirs requested but not configured.
        assert_eq!(config.count(&entries, FilterFlags::DIRS), 0);
        // Names ignored, hidden excluded, parent excluded.
        assert_eq!(config.count(&entries, FilterFlags::FILES), 3);
        assert_eq!(config.count(&entries, FilterFlags::FILES | FilterFlags::DIRS), 3);
    }

    #[test]
    fn count_respects_hidden_flag() {
        let config = FilterConfig {
            flags: FilterFlags::ALL_ENTRIES | FilterFlags::HIDDEN,
            ..Default::default()
        };
        assert_eq!(config.count(&sample(), FilterFlags::FILES | FilterFlags::DIRS), 5);
    }
}
