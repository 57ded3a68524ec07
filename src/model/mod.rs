//! The folder model: one directory's children, filtered and sorted into rows.
//!
//! Setters only record configuration; nothing changes on screen until
//! [`FolderModel::refresh`] rebuilds the row set. A rebuild is computed on
//! the side and swapped in only when it succeeds.

pub mod appearance;
pub mod cell;
pub mod format;
pub mod selection;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{AppError, Result};
use crate::event::{Event, EventSender};
use crate::fs::entry::DirectoryEntry;
use crate::fs::enumerate::{list_directory, list_drives, normalize_path};
use crate::fs::filter::{FilterConfig, FilterFlags, NameFilters};
use crate::fs::operations;
use crate::fs::platform::{self, SystemFilePredicate};
use crate::fs::sort::{sort_entries, CaseSensitivity, SectionType, SortConfig, SortDirsType, SortOrder};
use crate::theme::{Color, ColorRoleMap};

use appearance::{Appearance, Font};
use cell::{CellRole, CellValue, IconHandle};
use format::{DateFormatType, FileSizeFormatType, FormatConfig, PermissionsFormatType};
use selection::{Selection, SelectionMode};

/// Columns shown until [`FolderModel::set_columns`] is called.
pub const DEFAULT_COLUMNS: [SectionType; 4] = [
    SectionType::FileName,
    SectionType::FileType,
    SectionType::FileSize,
    SectionType::LastModified,
];

pub struct FolderModel {
    /// Empty until a root is set; an empty root lists the drives.
    root: PathBuf,
    /// Unfiltered listing from the last successful rebuild.
    listing: Vec<DirectoryEntry>,
    rows: Vec<DirectoryEntry>,
    filter: FilterConfig,
    sort: SortConfig,
    format: FormatConfig,
    columns: Vec<SectionType>,
    selection: Selection,
    appearance: Appearance,
    is_system: SystemFilePredicate,
    event_tx: Option<EventSender>,
}

impl Default for FolderModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderModel {
    pub fn new() -> Self {
        Self {
            root: PathBuf::new(),
            listing: Vec::new(),
            rows: Vec::new(),
            filter: FilterConfig::default(),
            sort: SortConfig::default(),
            format: FormatConfig::default(),
            columns: DEFAULT_COLUMNS.to_vec(),
            selection: Selection::new(),
            appearance: Appearance::default(),
            is_system: platform::is_system_file,
            event_tx: None,
        }
    }

    // ── Root path & refresh ──────────────────────────────────────────────

    /// Switch to `path` and list it.
    ///
    /// Relative paths resolve against the working directory and `.`/`..`
    /// components are removed. On failure the previous root and rows stay in place.
    pub fn set_root_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let target = normalize_path(&absolute);

        if !target.exists() {
            tracing::warn!("root path {} does not exist", target.display());
            return Err(AppError::PathNotFound(target));
        }

        let (listing, rows) = match self.build(&target) {
            Ok(built) => built,
            Err(e) => {
                tracing::warn!("keeping {}: {}", self.root.display(), e);
                return Err(e);
            }
        };

        self.root = target;
        self.listing = listing;
        self.rows = rows;
        self.selection.clear();
        tracing::debug!("root set to {} ({} rows)", self.root.display(), self.rows.len());

        if let Some(tx) = &self.event_tx {
            let _ = tx.send(Event::RootPathChanged(self.root.clone()));
        }
        Ok(())
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Register the channel that receives [`Event::RootPathChanged`].
    pub fn set_event_sender(&mut self, tx: EventSender) {
        self.event_tx = Some(tx);
    }

    /// Re-list, re-filter and re-sort the current root.
    ///
    /// Selected rows follow their paths to the new row indices; rows whose
    /// path disappeared drop out of the selection.
    pub fn refresh(&mut self) -> Result<()> {
        let (listing, rows) = self.build(&self.root)?;
        let selected = self.selected_paths();

        self.listing = listing;
        self.rows = rows;
        if !self.selection.is_empty() {
            let remapped: Vec<usize> = selected.iter().filter_map(|p| self.index_of(p)).collect();
            self.selection.replace(remapped);
        }

        tracing::debug!("refreshed {} ({} rows)", self.root.display(), self.rows.len());
        Ok(())
    }

    /// Compute (unfiltered listing, rows) for `root` without touching state.
    fn build(&self, root: &Path) -> Result<(Vec<DirectoryEntry>, Vec<DirectoryEntry>)> {
        let listing = if root.as_os_str().is_empty() {
            list_drives()
        } else {
            list_directory(root, self.is_system)?
        };
        let mut rows = self.filter.apply(&listing, self.sort.case);
        sort_entries(&mut rows, &self.sort);
        Ok((listing, rows))
    }

    // ── Filter configuration ─────────────────────────────────────────────

    pub fn set_filter_flags(&mut self, flags: FilterFlags) {
        self.filter.flags = flags;
    }

    pub fn filter_flags(&self) -> FilterFlags {
        self.filter.flags
    }

    /// Replace the glob name patterns. `.` and `..` are ignored.
    pub fn set_name_filters<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter.names = NameFilters::new(patterns);
    }

    pub fn name_filters(&self) -> &[String] {
        self.filter.names.patterns()
    }

    /// Swap the system-file predicate; takes effect on the next refresh.
    pub fn set_system_file_predicate(&mut self, predicate: SystemFilePredicate) {
        self.is_system = predicate;
    }

    // ── Sort configuration ───────────────────────────────────────────────

    pub fn set_sort_section_type(&mut self, section: SectionType) {
        self.sort.primary = section;
    }

    pub fn sort_section_type(&self) -> SectionType {
        self.sort.primary
    }

    /// Tie-break key; `SectionType::Unknown` disables it.
    pub fn set_sort_section_type_2nd(&mut self, section: SectionType) {
        self.sort.secondary = section;
    }

    pub fn sort_section_type_2nd(&self) -> SectionType {
        self.sort.secondary
    }

    pub fn set_sort_dirs_type(&mut self, dirs: SortDirsType) {
        self.sort.dirs = dirs;
    }

    pub fn sort_dirs_type(&self) -> SortDirsType {
        self.sort.dirs
    }

    pub fn set_sort_dot_first(&mut self, dot_first: bool) {
        self.sort.dot_first = dot_first;
    }

    pub fn sort_dot_first(&self) -> bool {
        self.sort.dot_first
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort.order = order;
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort.order
    }

    /// Applies to name/type comparison and to glob matching.
    pub fn set_sort_case_sensitivity(&mut self, case: CaseSensitivity) {
        self.sort.case = case;
    }

    pub fn sort_case_sensitivity(&self) -> CaseSensitivity {
        self.sort.case
    }

    pub fn sort_config(&self) -> &SortConfig {
        &self.sort
    }

    // ── Format configuration ─────────────────────────────────────────────

    pub fn set_file_size_format_type(&mut self, format: FileSizeFormatType) {
        self.format.size = format;
    }

    pub fn file_size_format_type(&self) -> FileSizeFormatType {
        self.format.size
    }

    pub fn set_file_size_comma(&mut self, comma: bool) {
        self.format.size_comma = comma;
    }

    pub fn file_size_comma(&self) -> bool {
        self.format.size_comma
    }

    pub fn set_permissions_format_type(&mut self, format: PermissionsFormatType) {
        self.format.permissions = format;
    }

    pub fn permissions_format_type(&self) -> PermissionsFormatType {
        self.format.permissions
    }

    pub fn set_date_format_type(&mut self, format: DateFormatType) {
        self.format.date = format;
    }

    pub fn date_format_type(&self) -> DateFormatType {
        self.format.date
    }

    /// strftime pattern used by [`DateFormatType::Original`].
    pub fn set_date_format_original_string(&mut self, pattern: impl Into<String>) {
        self.format.date_pattern = pattern.into();
    }

    pub fn date_format_original_string(&self) -> &str {
        &self.format.date_pattern
    }

    /// Displayed columns, left to right. `Unknown` entries are dropped.
    pub fn set_columns(&mut self, columns: impl IntoIterator<Item = SectionType>) {
        self.columns = columns
            .into_iter()
            .filter(|c| *c != SectionType::Unknown)
            .collect();
    }

    pub fn columns(&self) -> &[SectionType] {
        &self.columns
    }

    // ── Row access ───────────────────────────────────────────────────────

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &[DirectoryEntry] {
        &self.rows
    }

    /// Value of one cell. Out-of-range rows or columns yield [`CellValue::None`].
    pub fn data(&self, row: usize, column: usize, role: CellRole) -> CellValue {
        let (Some(entry), Some(&section)) = (self.rows.get(row), self.columns.get(column)) else {
            return CellValue::None;
        };
        let name_column = section == SectionType::FileName;
        match role {
            CellRole::Display => CellValue::Text(format::display_text(entry, section, &self.format)),
            CellRole::Icon if name_column => CellValue::Icon(self.icon_for(entry)),
            CellRole::FilePath if name_column => CellValue::Path(entry.path.clone()),
            CellRole::FileName if name_column => CellValue::Text(entry.name.clone()),
            CellRole::Icon | CellRole::FilePath | CellRole::FileName => CellValue::None,
            CellRole::TextColor => self.text_color(row).into(),
            CellRole::Background => self.background_color(row).into(),
            CellRole::Alignment => CellValue::Alignment(cell::alignment(section)),
            CellRole::Font => CellValue::Font(self.appearance.font.clone()),
        }
    }

    /// Header label of a column.
    pub fn header_data(&self, column: usize) -> Option<&'static str> {
        self.columns.get(column).map(|s| cell::header_label(*s))
    }

    pub fn entry(&self, row: usize) -> Option<&DirectoryEntry> {
        self.rows.get(row)
    }

    pub fn is_dir(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|e| e.is_dir())
    }

    pub fn file_path(&self, row: usize) -> Option<&Path> {
        self.rows.get(row).map(|e| e.path.as_path())
    }

    pub fn file_name(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|e| e.name.as_str())
    }

    pub fn size(&self, row: usize) -> u64 {
        self.rows.get(row).map_or(0, |e| e.size)
    }

    /// Raw suffix after the last dot; `.bashrc` yields `bashrc`.
    pub fn file_type(&self, row: usize) -> &str {
        self.rows.get(row).map_or("", |e| e.suffix.as_str())
    }

    pub fn permissions(&self, row: usize) -> u32 {
        self.rows.get(row).map_or(0, |e| e.permissions)
    }

    pub fn created(&self, row: usize) -> Option<SystemTime> {
        self.rows.get(row).and_then(|e| e.created)
    }

    pub fn last_modified(&self, row: usize) -> Option<SystemTime> {
        self.rows.get(row).and_then(|e| e.modified)
    }

    pub fn file_icon(&self, row: usize) -> Option<IconHandle> {
        self.rows.get(row).map(|e| self.icon_for(e))
    }

    fn icon_for(&self, entry: &DirectoryEntry) -> IconHandle {
        IconHandle {
            name: cell::icon_name(entry),
            size: self.appearance.icon_size,
        }
    }

    /// Row of the entry whose path equals `path`.
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.rows.iter().position(|e| e.path == path)
    }

    // ── Selection ────────────────────────────────────────────────────────

    /// Out-of-range rows are ignored.
    pub fn select(&mut self, row: usize, mode: SelectionMode) {
        if row < self.rows.len() {
            self.selection.select(row, mode);
        }
    }

    /// Select every row except the parent entry.
    pub fn select_all(&mut self) {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_parent())
            .map(|(i, _)| i);
        self.selection.replace(rows);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selection.is_selected(row)
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.selection.selected_rows()
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.selection
            .selected_rows()
            .into_iter()
            .filter_map(|row| self.rows.get(row).map(|e| e.path.clone()))
            .collect()
    }

    // ── Appearance ───────────────────────────────────────────────────────

    /// Set the font; the icon size follows its line height.
    pub fn set_font(&mut self, font: Font) {
        self.appearance.set_font(font);
    }

    pub fn font(&self) -> &Font {
        &self.appearance.font
    }

    pub fn icon_size(&self) -> u32 {
        self.appearance.icon_size
    }

    pub fn init_colors(&mut self, colors: ColorRoleMap, folder_color_top_priority: bool) {
        self.appearance.init_colors(colors, folder_color_top_priority);
    }

    pub fn text_color(&self, row: usize) -> Option<Color> {
        let entry = self.rows.get(row)?;
        self.appearance.text_color(entry, self.is_selected(row))
    }

    pub fn background_color(&self, row: usize) -> Option<Color> {
        self.rows.get(row)?;
        self.appearance.background_color(self.is_selected(row))
    }

    // ── Entry operations ─────────────────────────────────────────────────

    /// Create a directory under the root and refresh.
    ///
    /// Returns the new row, or `None` when the current filter hides it.
    pub fn mkdir(&mut self, name: &str) -> Result<Option<usize>> {
        if self.root.as_os_str().is_empty() {
            return Err(AppError::InvalidPath(name.to_string()));
        }
        let path = operations::create_dir(&self.root, name)?;
        self.refresh()?;
        Ok(self.index_of(&path))
    }

    /// Remove the empty directory at `row` and refresh.
    pub fn rmdir(&mut self, row: usize) -> Result<()> {
        let entry = self.rows.get(row).ok_or(AppError::InvalidIndex(row))?;
        if !entry.is_dir() || entry.is_parent() {
            return Err(AppError::InvalidPath(entry.name.clone()));
        }
        operations::remove_dir(&entry.path)?;
        self.refresh()
    }

    /// Remove the file or directory tree at `row` and refresh.
    pub fn remove(&mut self, row: usize) -> Result<()> {
        let entry = self.rows.get(row).ok_or(AppError::InvalidIndex(row))?;
        if entry.is_parent() {
            return Err(AppError::InvalidPath(entry.name.clone()));
        }
        operations::remove(&entry.path)?;
        self.refresh()
    }

    // ── Counts ───────────────────────────────────────────────────────────

    /// Entries of the given kinds in the last listing, ignoring name patterns.
    pub fn file_dir_num(&self, kinds: FilterFlags) -> usize {
        self.filter.count(&self.listing, kinds)
    }

    pub fn file_num(&self) -> usize {
        self.file_dir_num(FilterFlags::FILES)
    }

    pub fn dir_num(&self) -> usize {
        self.file_dir_num(FilterFlags::DIRS)
    }
}
