//! Presentation formatting: entry attributes to display strings.
//!
//! Every function here is pure and infallible; inapplicable fields render as
//! an empty string.

use std::fmt::Write;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::fs::entry::DirectoryEntry;
use crate::fs::sort::SectionType;

/// Text shown in the size column for directories.
pub const FOLDER_SIZE_TEXT: &str = "<Folder>";

/// Default pattern for [`DateFormatType::Original`].
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

const TEXT_DATE_PATTERN: &str = "%a %b %-d %H:%M:%S %Y";
const ISO_DATE_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

const SI_UNITS: [&str; 7] = ["bytes", "kB", "MB", "GB", "TB", "PB", "EB"];
const IEC_UNITS: [&str; 7] = ["bytes", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSizeFormatType {
    /// Powers of 1000.
    #[default]
    Si,
    /// Powers of 1024.
    Iec,
    /// Exact byte count.
    Detail,
}

impl FileSizeFormatType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "si" => Some(FileSizeFormatType::Si),
            "iec" => Some(FileSizeFormatType::Iec),
            "detail" | "bytes" => Some(FileSizeFormatType::Detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormatType {
    /// Textual, e.g. `Wed May 20 03:40:13 1998`.
    #[default]
    Default,
    Iso,
    /// User-supplied strftime pattern.
    Original,
}

impl DateFormatType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "text" => Some(DateFormatType::Default),
            "iso" => Some(DateFormatType::Iso),
            "original" | "custom" => Some(DateFormatType::Original),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionsFormatType {
    /// Octal, e.g. `0755`.
    Absolute,
    /// e.g. `-rwxr-xr-x`.
    #[default]
    Symbolic,
}

impl PermissionsFormatType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" | "octal" => Some(PermissionsFormatType::Absolute),
            "symbolic" => Some(PermissionsFormatType::Symbolic),
            _ => None,
        }
    }
}

/// All formatting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    pub size: FileSizeFormatType,
    /// Group exact byte counts with `,` every three digits.
    pub size_comma: bool,
    pub date: DateFormatType,
    pub date_pattern: String,
    pub permissions: PermissionsFormatType,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            size: FileSizeFormatType::Si,
            size_comma: false,
            date: DateFormatType::Default,
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            permissions: PermissionsFormatType::Symbolic,
        }
    }
}

/// Insert `,` every three digits.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a byte count.
///
/// Scaled formats print whole bytes below the first unit and two decimals above it.
pub fn format_size(bytes: u64, format: FileSizeFormatType, comma: bool) -> String {
    let (base, units, power) = match format {
        FileSizeFormatType::Detail => {
            return if comma {
                group_thousands(bytes)
            } else {
                bytes.to_string()
            };
        }
        FileSizeFormatType::Si => {
            let digits = bytes.checked_ilog10().unwrap_or(0);
            (1000f64, &SI_UNITS, (digits / 3) as usize)
        }
        FileSizeFormatType::Iec => {
            let bits = bytes.checked_ilog2().unwrap_or(0);
            (1024f64, &IEC_UNITS, (bits / 10) as usize)
        }
    };
    let power = power.min(units.len() - 1);
    if power == 0 {
        return format!("{} {}", bytes, units[0]);
    }
    let scaled = bytes as f64 / base.powi(power as i32);
    format!("{:.2} {}", scaled, units[power])
}

/// Format a timestamp in local time. Missing timestamps and invalid custom
/// patterns render as an empty string.
pub fn format_date(time: Option<SystemTime>, format: DateFormatType, pattern: &str) -> String {
    let Some(time) = time else {
        return String::new();
    };
    let local: DateTime<Local> = time.into();
    let pattern = match format {
        DateFormatType::Default => TEXT_DATE_PATTERN,
        DateFormatType::Iso => ISO_DATE_PATTERN,
        DateFormatType::Original => pattern,
    };
    let mut out = String::new();
    if write!(out, "{}", local.format(pattern)).is_err() {
        return String::new();
    }
    out
}

/// Format permission bits.
pub fn format_permissions(mode: u32, is_dir: bool, format: PermissionsFormatType) -> String {
    match format {
        PermissionsFormatType::Absolute => format!("{:04o}", mode & 0o7777),
        PermissionsFormatType::Symbolic => {
            let mut out = String::with_capacity(10);
            out.push(if is_dir { 'd' } else { '-' });
            for shift in [6, 3, 0] {
                let bits = (mode >> shift) & 0o7;
                out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
                out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
                out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
            }
            out
        }
    }
}

/// Display text of one cell.
pub fn display_text(entry: &DirectoryEntry, section: SectionType, config: &FormatConfig) -> String {
    match section {
        SectionType::FileName => entry.display_name().to_string(),
        SectionType::FileType => entry.display_type().to_string(),
        SectionType::FileSize => {
            if entry.is_dir() {
                FOLDER_SIZE_TEXT.to_string()
            } else {
                format_size(entry.size, config.size, config.size_comma)
            }
        }
        SectionType::Owner => entry.owner.clone(),
        SectionType::Group => entry.group.clone(),
        SectionType::Permissions => format_permissions(entry.permissions, entry.is_dir(), config.permissions),
        SectionType::Created => format_date(entry.created, config.date, &config.date_pattern),
        SectionType::LastModified => format_date(entry.modified, config.date, &config.date_pattern),
        SectionType::Unknown => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::{split_name, EntryKind};
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn entry(name: &str, kind: EntryKind, size: u64) -> DirectoryEntry {
        let (base_name, suffix) = split_name(name);
        DirectoryEntry {
            path: PathBuf::from("/srv").join(name),
            name: name.to_string(),
            base_name,
            suffix,
            kind,
            size,
            created: None,
            modified: None,
            owner: "alice".into(),
            group: "staff".into(),
            permissions: 0o755,
            is_hidden: false,
            is_system: false,
            is_writable: true,
            is_symlink: false,
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn detail_size() {
        assert_eq!(format_size(1234567, FileSizeFormatType::Detail, false), "1234567");
        assert_eq!(format_size(1234567, FileSizeFormatType::Detail, true), "1,234,567");
    }

    #[test]
    fn si_size() {
        assert_eq!(format_size(0, FileSizeFormatType::Si, false), "0 bytes");
        assert_eq!(format_size(999, FileSizeFormatType::Si, false), "999 bytes");
        assert_eq!(format_size(1000, FileSizeFormatType::Si, false), "1.00 kB");
        assert_eq!(format_size(1_500_000, FileSizeFormatType::Si, false), "1.50 MB");
    }

    #[test]
    fn iec_size() {
        assert_eq!(format_size(1023, FileSizeFormatType::Iec, false), "1023 bytes");
        assert_eq!(format_size(1024, FileSizeFormatType::Iec, false), "1.00 KiB");
        assert_eq!(format_size(3 * 1024 * 1024 / 2, FileSizeFormatType::Iec, false), "1.50 MiB");
    }

    #[test]
    fn huge_sizes_stay_in_range() {
        assert!(format_size(u64::MAX, FileSizeFormatType::Si, false).ends_with("EB"));
        assert!(format_size(u64::MAX, FileSizeFormatType::Iec, false).ends_with("EiB"));
    }

    #[test]
    fn permission_formats() {
        assert_eq!(format_permissions(0o755, false, PermissionsFormatType::Absolute), "0755");
        assert_eq!(format_permissions(0o4755, false, PermissionsFormatType::Absolute), "4755");
        assert_eq!(format_permissions(0o755, true, PermissionsFormatType::Symbolic), "drwxr-xr-x");
        assert_eq!(format_permissions(0o640, false, PermissionsFormatType::Symbolic), "-rw-r-----");
    }

    #[test]
    fn date_formats() {
        let local = Local.with_ymd_and_hms(1998, 5, 20, 3, 40, 13).unwrap();
        let time: SystemTime = local.into();
        assert_eq!(
            format_date(Some(time), DateFormatType::Default, ""),
            "Wed May 20 03:40:13 1998"
        );
        assert_eq!(format_date(Some(time), DateFormatType::Iso, ""), "1998-05-20T03:40:13");
        assert_eq!(
            format_date(Some(time), DateFormatType::Original, DEFAULT_DATE_PATTERN),
            "1998-05-20 03:40:13"
        );
        assert_eq!(format_date(Some(time), DateFormatType::Original, "%d/%m"), "20/05");
    }

    #[test]
    fn invalid_custom_pattern_renders_empty() {
        let time = SystemTime::now();
        assert_eq!(format_date(Some(time), DateFormatType::Original, "%Q"), "");
    }

    #[test]
    fn missing_date_renders_empty() {
        assert_eq!(format_date(None, DateFormatType::Iso, ""), "");
    }

    #[test]
    fn cell_text_for_file_and_directory() {
        let config = FormatConfig::default();
        let file = entry("song.mp3", EntryKind::File, 2048);
        let dir = entry("music.d", EntryKind::Dir, 4096);

        assert_eq!(display_text(&file, SectionType::FileName, &config), "song");
        assert_eq!(display_text(&file, SectionType::FileType, &config), "mp3");
        assert_eq!(display_text(&file, SectionType::FileSize, &config), "2.05 kB");
        assert_eq!(display_text(&file, SectionType::Owner, &config), "alice");
        assert_eq!(display_text(&file, SectionType::Group, &config), "staff");
        assert_eq!(display_text(&file, SectionType::Permissions, &config), "-rwxr-xr-x");
        assert_eq!(display_text(&file, SectionType::LastModified, &config), "");

        assert_eq!(display_text(&dir, SectionType::FileName, &config), "music.d");
        assert_eq!(display_text(&dir, SectionType::FileType, &config), "");
        assert_eq!(display_text(&dir, SectionType::FileSize, &config), FOLDER_SIZE_TEXT);
    }
}
