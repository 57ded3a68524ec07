//! Role-keyed cell values.

use std::path::PathBuf;

use crate::fs::entry::{DirectoryEntry, EntryKind};
use crate::fs::sort::SectionType;
use crate::model::appearance::Font;
use crate::theme::Color;

/// Which facet of a cell is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRole {
    Display,
    /// Only populated in the name column.
    Icon,
    /// Only populated in the name column.
    FilePath,
    /// Only populated in the name column.
    FileName,
    TextColor,
    Background,
    Alignment,
    Font,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Icon lookup key plus the edge length to render it at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle {
    /// `"dir"`, `"drive"`, `"parent"`, `"symlink-dir"`, `"symlink-file"`,
    /// `"ext:<lowercase suffix>"` or `"file"`.
    pub name: String,
    pub size: u32,
}

/// Value of one (row, column, role) query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    None,
    Text(String),
    Icon(IconHandle),
    Path(PathBuf),
    Color(Color),
    Alignment(Alignment),
    Font(Font),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, CellValue::None)
    }
}

impl From<Option<Color>> for CellValue {
    fn from(color: Option<Color>) -> Self {
        color.map_or(CellValue::None, CellValue::Color)
    }
}

/// Header label of a column.
pub fn header_label(section: SectionType) -> &'static str {
    match section {
        SectionType::FileName => "Name",
        SectionType::FileType => "Type",
        SectionType::FileSize => "Size",
        SectionType::Owner => "Owner",
        SectionType::Group => "Group",
        SectionType::Permissions => "Permissions",
        SectionType::Created => "Created",
        SectionType::LastModified => "Last modified",
        SectionType::Unknown => "",
    }
}

/// Numeric columns are right-aligned.
pub fn alignment(section: SectionType) -> Alignment {
    match section {
        SectionType::FileSize | SectionType::Created | SectionType::LastModified => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// Icon lookup key for an entry.
pub fn icon_name(entry: &DirectoryEntry) -> String {
    match entry.kind {
        EntryKind::Parent => return "parent".to_string(),
        EntryKind::Drive => return "drive".to_string(),
        _ => {}
    }
    if entry.is_symlink {
        return if entry.is_dir() {
            "symlink-dir".to_string()
        } else {
            "symlink-file".to_string()
        };
    }
    if entry.is_dir() {
        return "dir".to_string();
    }
    if !entry.suffix.is_empty() {
        return format!("ext:{}", entry.suffix.to_lowercase());
    }
    "file".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::split_name;

    fn entry(name: &str, kind: EntryKind, is_symlink: bool) -> DirectoryEntry {
        let (base_name, suffix) = split_name(name);
        DirectoryEntry {
            path: PathBuf::from("/x").join(name),
            name: name.to_string(),
            base_name,
            suffix,
            kind,
            size: 0,
            created: None,
            modified: None,
            owner: String::new(),
            group: String::new(),
            permissions: 0,
            is_hidden: false,
            is_system: false,
            is_writable: true,
            is_symlink,
        }
    }

    #[test]
    fn icon_names() {
        assert_eq!(icon_name(&entry("Photo.JPG", EntryKind::File, false)), "ext:jpg");
        assert_eq!(icon_name(&entry("Makefile", EntryKind::File, false)), "file");
        assert_eq!(icon_name(&entry("src", EntryKind::Dir, false)), "dir");
        assert_eq!(icon_name(&entry("link", EntryKind::Dir, true)), "symlink-dir");
        assert_eq!(icon_name(&entry("l.txt", EntryKind::File, true)), "symlink-file");
        assert_eq!(icon_name(&entry("..", EntryKind::Parent, false)), "parent");
    }

    #[test]
    fn headers_and_alignment() {
        assert_eq!(header_label(SectionType::LastModified), "Last modified");
        assert_eq!(alignment(SectionType::FileSize), Alignment::Right);
        assert_eq!(alignment(SectionType::Created), Alignment::Right);
        assert_eq!(alignment(SectionType::FileName), Alignment::Left);
    }

    #[test]
    fn color_conversion() {
        assert!(CellValue::from(None).is_none());
        let c = Color::rgb(1, 2, 3);
        assert_eq!(CellValue::from(Some(c)), CellValue::Color(c));
        assert_eq!(CellValue::Text("a".into()).as_text(), Some("a"));
    }
}
