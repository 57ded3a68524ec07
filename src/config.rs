//! Configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--hidden`, `--sort`, `--columns`, etc.)
//! 2. Explicit `--config <file>`
//! 3. `$DIRVIEW_CONFIG` environment variable (path to config file)
//! 4. Project-local `.dirview.toml` in the current working directory
//! 5. Global `~/.config/dirview/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::fs::filter::FilterFlags;
use crate::fs::sort::{CaseSensitivity, SectionType, SortDirsType, SortOrder};
use crate::model::appearance::Font;
use crate::model::format::{
    DateFormatType, FileSizeFormatType, PermissionsFormatType, DEFAULT_DATE_PATTERN,
};
use crate::model::{FolderModel, DEFAULT_COLUMNS};
use crate::theme::resolve_theme;

// ── Section configs ──────────────────────────────────────────────────────────

/// Which entries are listed.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FilterSection {
    pub dirs: Option<bool>,
    pub files: Option<bool>,
    pub drives: Option<bool>,
    /// Show dotfiles / hidden-attribute entries.
    pub hidden: Option<bool>,
    /// Show system files (Windows only).
    pub system: Option<bool>,
    /// Glob patterns, e.g. `["*.rs", "*.toml"]`.
    pub name_filters: Option<Vec<String>>,
}

/// Row ordering.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SortSection {
    /// "name", "type", "size", "owner", "group", "permissions", "created", "modified".
    pub key: Option<String>,
    /// Tie-break key, or "none".
    pub secondary_key: Option<String>,
    /// "first", "last" or "mixed".
    pub dirs: Option<String>,
    pub dot_first: Option<bool>,
    /// "ascending" or "descending".
    pub order: Option<String>,
    pub case_sensitive: Option<bool>,
}

/// Cell text formatting.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FormatSection {
    /// "si", "iec" or "detail".
    pub size: Option<String>,
    /// Group exact byte counts with commas.
    pub size_grouping: Option<bool>,
    /// "default", "iso" or "custom".
    pub date: Option<String>,
    /// strftime pattern for `date = "custom"`.
    pub date_pattern: Option<String>,
    /// "symbolic" or "octal".
    pub permissions: Option<String>,
    /// Column keys, left to right.
    pub columns: Option<Vec<String>>,
}

/// Color settings for each colour role.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub normal: Option<String>,
    pub normal_selected: Option<String>,
    pub folder: Option<String>,
    pub folder_selected: Option<String>,
    pub read_only: Option<String>,
    pub read_only_selected: Option<String>,
    pub hidden: Option<String>,
    pub hidden_selected: Option<String>,
    pub system: Option<String>,
    pub system_selected: Option<String>,
    pub background: Option<String>,
    pub selected_background: Option<String>,
}

/// Font and colours.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    pub font_family: Option<String>,
    /// Em size in pixels.
    pub font_size: Option<u32>,
    pub folder_color_top_priority: Option<bool>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Filesystem watcher settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    /// Re-list the directory when it changes.
    pub enabled: Option<bool>,
    /// Debounce interval in milliseconds.
    pub debounce_ms: Option<u64>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub filter: FilterSection,
    pub sort: SortSection,
    pub format: FormatSection,
    pub appearance: AppearanceConfig,
    pub watcher: WatcherConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DIRVIEW_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dirview.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("dirview").join("config.toml"));
    }

    paths
}

/// Read and parse a TOML config file.
fn read_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str::<AppConfig>(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
}

/// Like [`read_file`], but a missing file is `None` and a bad one is logged and skipped.
fn load_candidate(path: &Path) -> Option<AppConfig> {
    if !path.is_file() {
        return None;
    }
    match read_file(path) {
        Ok(cfg) => {
            tracing::debug!("loaded config {}", path.display());
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!("ignoring config file: {}", e);
            None
        }
    }
}

/// Parse an enum-valued setting, warning about unknown names.
fn parse_named<T>(value: Option<&str>, parse: fn(&str) -> Option<T>, default: T, key: &str) -> T {
    match value {
        None => default,
        Some(s) => parse(s).unwrap_or_else(|| {
            tracing::warn!("unknown value {:?} for {}, using default", s, key);
            default
        }),
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            filter: FilterSection {
                dirs: other.filter.dirs.or(self.filter.dirs),
                files: other.filter.files.or(self.filter.files),
                drives: other.filter.drives.or(self.filter.drives),
                hidden: other.filter.hidden.or(self.filter.hidden),
                system: other.filter.system.or(self.filter.system),
                name_filters: other
                    .filter
                    .name_filters
                    .clone()
                    .or(self.filter.name_filters),
            },
            sort: SortSection {
                key: other.sort.key.clone().or(self.sort.key),
                secondary_key: other.sort.secondary_key.clone().or(self.sort.secondary_key),
                dirs: other.sort.dirs.clone().or(self.sort.dirs),
                dot_first: other.sort.dot_first.or(self.sort.dot_first),
                order: other.sort.order.clone().or(self.sort.order),
                case_sensitive: other.sort.case_sensitive.or(self.sort.case_sensitive),
            },
            format: FormatSection {
                size: other.format.size.clone().or(self.format.size),
                size_grouping: other.format.size_grouping.or(self.format.size_grouping),
                date: other.format.date.clone().or(self.format.date),
                date_pattern: other.format.date_pattern.clone().or(self.format.date_pattern),
                permissions: other.format.permissions.clone().or(self.format.permissions),
                columns: other.format.columns.clone().or(self.format.columns),
            },
            appearance: AppearanceConfig {
                scheme: other.appearance.scheme.clone().or(self.appearance.scheme),
                font_family: other
                    .appearance
                    .font_family
                    .clone()
                    .or(self.appearance.font_family),
                font_size: other.appearance.font_size.or(self.appearance.font_size),
                folder_color_top_priority: other
                    .appearance
                    .folder_color_top_priority
                    .or(self.appearance.folder_color_top_priority),
                custom: match (&self.appearance.custom, &other.appearance.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
            watcher: WatcherConfig {
                enabled: other.watcher.enabled.or(self.watcher.enabled),
                debounce_ms: other.watcher.debounce_ms.or(self.watcher.debounce_ms),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`; it
    /// must exist and parse. Implicit candidates that fail to parse are skipped.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_candidate(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            let file_cfg = read_file(cli_path)?;
            config = config.merge(&file_cfg);
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        Ok(config)
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Kind and visibility flags.
    pub fn filter_flags(&self) -> FilterFlags {
        let f = &self.filter;
        let mut flags = FilterFlags::empty();
        flags.set(FilterFlags::DIRS, f.dirs.unwrap_or(true));
        flags.set(FilterFlags::FILES, f.files.unwrap_or(true));
        flags.set(FilterFlags::DRIVES, f.drives.unwrap_or(true));
        flags.set(FilterFlags::HIDDEN, f.hidden.unwrap_or(false));
        flags.set(FilterFlags::SYSTEM, f.system.unwrap_or(false));
        flags
    }

    pub fn name_filters(&self) -> Vec<String> {
        self.filter
            .name_filters
            .clone()
            .unwrap_or_else(|| vec!["*".to_string()])
    }

    pub fn sort_key(&self) -> SectionType {
        parse_named(self.sort.key.as_deref(), SectionType::from_name, SectionType::FileName, "sort.key")
    }

    pub fn secondary_sort_key(&self) -> SectionType {
        parse_named(
            self.sort.secondary_key.as_deref(),
            SectionType::from_name,
            SectionType::Unknown,
            "sort.secondary_key",
        )
    }

    pub fn sort_dirs(&self) -> SortDirsType {
        parse_named(self.sort.dirs.as_deref(), SortDirsType::from_name, SortDirsType::NoSpecify, "sort.dirs")
    }

    pub fn dot_first(&self) -> bool {
        self.sort.dot_first.unwrap_or(true)
    }

    pub fn sort_order(&self) -> SortOrder {
        parse_named(self.sort.order.as_deref(), SortOrder::from_name, SortOrder::Ascending, "sort.order")
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        if self.sort.case_sensitive.unwrap_or(false) {
            CaseSensitivity::Sensitive
        } else {
            CaseSensitivity::Insensitive
        }
    }

    pub fn size_format(&self) -> FileSizeFormatType {
        parse_named(
            self.format.size.as_deref(),
            FileSizeFormatType::from_name,
            FileSizeFormatType::Si,
            "format.size",
        )
    }

    pub fn size_grouping(&self) -> bool {
        self.format.size_grouping.unwrap_or(false)
    }

    pub fn date_format(&self) -> DateFormatType {
        parse_named(
            self.format.date.as_deref(),
            DateFormatType::from_name,
            DateFormatType::Default,
            "format.date",
        )
    }

    pub fn date_pattern(&self) -> &str {
        self.format.date_pattern.as_deref().unwrap_or(DEFAULT_DATE_PATTERN)
    }

    pub fn permissions_format(&self) -> PermissionsFormatType {
        parse_named(
            self.format.permissions.as_deref(),
            PermissionsFormatType::from_name,
            PermissionsFormatType::Symbolic,
            "format.permissions",
        )
    }

    /// Displayed columns; unknown names are skipped with a warning.
    pub fn columns(&self) -> Vec<SectionType> {
        let Some(names) = &self.format.columns else {
            return DEFAULT_COLUMNS.to_vec();
        };
        names
            .iter()
            .filter_map(|name| {
                let section = SectionType::from_name(name);
                if section.is_none() {
                    tracing::warn!("unknown column {:?}", name);
                }
                section
            })
            .filter(|s| *s != SectionType::Unknown)
            .collect()
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.appearance.scheme.as_deref().unwrap_or("dark")
    }

    pub fn font(&self) -> Font {
        let default = Font::default();
        Font::new(
            self.appearance.font_family.clone().unwrap_or(default.family),
            self.appearance.font_size.unwrap_or(default.pixel_size),
        )
    }

    pub fn folder_color_top_priority(&self) -> bool {
        self.appearance.folder_color_top_priority.unwrap_or(false)
    }

    /// Whether the watcher is enabled.
    pub fn watcher_enabled(&self) -> bool {
        self.watcher.enabled.unwrap_or(false)
    }

    /// Watcher debounce interval in milliseconds.
    pub fn debounce_ms(&self) -> u64 {
        self.watcher.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    /// Push every setting into `model` through its setters. Does not refresh.
    pub fn apply(&self, model: &mut FolderModel) {
        model.set_filter_flags(self.filter_flags());
        model.set_name_filters(self.name_filters());

        model.set_sort_section_type(self.sort_key());
        model.set_sort_section_type_2nd(self.secondary_sort_key());
        model.set_sort_dirs_type(self.sort_dirs());
        model.set_sort_dot_first(self.dot_first());
        model.set_sort_order(self.sort_order());
        model.set_sort_case_sensitivity(self.case_sensitivity());

        model.set_file_size_format_type(self.size_format());
        model.set_file_size_comma(self.size_grouping());
        model.set_date_format_type(self.date_format());
        model.set_date_format_original_string(self.date_pattern());
        model.set_permissions_format_type(self.permissions_format());
        model.set_columns(self.columns());

        model.set_font(self.font());
        model.init_colors(resolve_theme(&self.appearance), self.folder_color_top_priority());
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.filter_flags(), FilterFlags::ALL_ENTRIES);
        assert_eq!(cfg.name_filters(), vec!["*".to_string()]);
        assert_eq!(cfg.sort_key(), SectionType::FileName);
        assert_eq!(cfg.secondary_sort_key(), SectionType::Unknown);
        assert_eq!(cfg.sort_dirs(), SortDirsType::NoSpecify);
        assert!(cfg.dot_first());
        assert_eq!(cfg.sort_order(), SortOrder::Ascending);
        assert_eq!(cfg.case_sensitivity(), CaseSensitivity::Insensitive);
        assert_eq!(cfg.size_format(), FileSizeFormatType::Si);
        assert!(!cfg.size_grouping());
        assert_eq!(cfg.date_format(), DateFormatType::Default);
        assert_eq!(cfg.date_pattern(), DEFAULT_DATE_PATTERN);
        assert_eq!(cfg.permissions_format(), PermissionsFormatType::Symbolic);
        assert_eq!(cfg.columns(), DEFAULT_COLUMNS.to_vec());
        assert_eq!(cfg.theme_scheme(), "dark");
        assert_eq!(cfg.font(), Font::default());
        assert!(!cfg.folder_color_top_priority());
        assert!(!cfg.watcher_enabled());
        assert_eq!(cfg.debounce_ms(), 300);
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r##"
[filter]
dirs = false
hidden = true
name_filters = ["*.rs", "*.toml"]

[sort]
key = "size"
secondary_key = "name"
dirs = "first"
dot_first = false
order = "descending"
case_sensitive = true

[format]
size = "detail"
size_grouping = true
date = "custom"
date_pattern = "%d/%m/%Y"
permissions = "octal"
columns = ["name", "size", "permissions"]

[appearance]
scheme = "light"
font_family = "Iosevka"
font_size = 14
folder_color_top_priority = true

[watcher]
enabled = true
debounce_ms = 500
"##;
        let cfg: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.filter_flags(), FilterFlags::FILES | FilterFlags::DRIVES | FilterFlags::HIDDEN);
        assert_eq!(cfg.name_filters(), vec!["*.rs".to_string(), "*.toml".to_string()]);
        assert_eq!(cfg.sort_key(), SectionType::FileSize);
        assert_eq!(cfg.secondary_sort_key(), SectionType::FileName);
        assert_eq!(cfg.sort_dirs(), SortDirsType::First);
        assert!(!cfg.dot_first());
        assert_eq!(cfg.sort_order(), SortOrder::Descending);
        assert_eq!(cfg.case_sensitivity(), CaseSensitivity::Sensitive);
        assert_eq!(cfg.size_format(), FileSizeFormatType::Detail);
        assert!(cfg.size_grouping());
        assert_eq!(cfg.date_format(), DateFormatType::Original);
        assert_eq!(cfg.date_pattern(), "%d/%m/%Y");
        assert_eq!(cfg.permissions_format(), PermissionsFormatType::Absolute);
        assert_eq!(
            cfg.columns(),
            vec![SectionType::FileName, SectionType::FileSize, SectionType::Permissions]
        );
        assert_eq!(cfg.theme_scheme(), "light");
        assert_eq!(cfg.font(), Font::new("Iosevka", 14));
        assert!(cfg.folder_color_top_priority());
        assert!(cfg.watcher_enabled());
        assert_eq!(cfg.debounce_ms(), 500);
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[sort]
key = "modified"
"#;
        let cfg: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.sort_key(), SectionType::LastModified);
        // Everything else falls back to defaults
        assert_eq!(cfg.filter_flags(), FilterFlags::ALL_ENTRIES);
        assert_eq!(cfg.sort_order(), SortOrder::Ascending);
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.sort_key(), SectionType::FileName);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let toml = r#"
[sort]
key = "colour"
order = "sideways"

[format]
columns = ["name", "bogus", "size"]
"#;
        let cfg: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.sort_key(), SectionType::FileName);
        assert_eq!(cfg.sort_order(), SortOrder::Ascending);
        assert_eq!(cfg.columns(), vec![SectionType::FileName, SectionType::FileSize]);
    }

    #[test]
    fn test_custom_theme_parsing() {
        let toml = r##"
[appearance]
scheme = "custom"

[appearance.custom]
folder = "#112233"
background = "#000000"
"##;
        let cfg: AppConfig = toml::from_str(toml).unwrap();
        let custom = cfg.appearance.custom.as_ref().unwrap();
        assert_eq!(custom.folder.as_deref(), Some("#112233"));
        assert_eq!(custom.background.as_deref(), Some("#000000"));
        assert!(custom.normal.is_none());
    }

    #[test]
    fn test_merge_override_wins() {
        let base: AppConfig = toml::from_str(
            r#"
[filter]
hidden = false
[sort]
key = "name"
order = "ascending"
"#,
        )
        .unwrap();
        let over: AppConfig = toml::from_str(
            r#"
[filter]
hidden = true
[sort]
order = "descending"
"#,
        )
        .unwrap();
        let merged = base.merge(&over);
        assert!(merged.filter_flags().contains(FilterFlags::HIDDEN));
        assert_eq!(merged.sort_order(), SortOrder::Descending);
        // Key not in override is kept from base
        assert_eq!(merged.sort_key(), SectionType::FileName);
    }

    #[test]
    fn test_merge_keeps_base_custom_colors() {
        let base: AppConfig = toml::from_str(
            r##"
[appearance.custom]
folder = "#aabbcc"
"##,
        )
        .unwrap();
        let merged = base.merge(&AppConfig::default());
        assert_eq!(
            merged.appearance.custom.and_then(|c| c.folder).as_deref(),
            Some("#aabbcc")
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[format]\nsize = \"iec\"").unwrap();

        let cfg = AppConfig::load(Some(&path), None).unwrap();
        assert_eq!(cfg.size_format(), FileSizeFormatType::Iec);
    }

    #[test]
    fn test_load_cli_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sort]\nkey = \"size\"\n").unwrap();

        let overrides = AppConfig {
            sort: SortSection {
                key: Some("type".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cfg = AppConfig::load(Some(&path), Some(&overrides)).unwrap();
        assert_eq!(cfg.sort_key(), SectionType::FileType);
    }

    #[test]
    fn test_load_explicit_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(AppConfig::load(Some(&missing), None), Err(AppError::Config(_))));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[sort\nkey = ").unwrap();
        assert!(matches!(AppConfig::load(Some(&broken), None), Err(AppError::Config(_))));
    }

    #[test]
    fn test_apply_configures_model() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.rs"), "").unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();
        std::fs::write(dir.path().join("c.rs"), "").unwrap();

        let cfg: AppConfig = toml::from_str(
            r#"
[filter]
name_filters = ["*.rs"]
[sort]
order = "descending"
[format]
columns = ["name", "permissions"]
"#,
        )
        .unwrap();

        let mut model = FolderModel::new();
        cfg.apply(&mut model);
        model.set_root_path(dir.path()).unwrap();

        let names: Vec<&str> = model.rows().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["..", "c.rs", "b.rs"]);
        assert_eq!(model.column_count(), 2);
        assert_eq!(model.sort_order(), SortOrder::Descending);
        assert!(model.text_color(1).is_some());
    }

    #[test]
    fn test_apply_huge_font_size() {
        let cfg: AppConfig = toml::from_str("[appearance]\nfont_size = 2000000000\n").unwrap();
        let mut model = FolderModel::new();
        cfg.apply(&mut model);
        assert_eq!(model.font().pixel_size, 2_000_000_000);
        assert_eq!(model.icon_size(), 2_666_666_667);
    }
}
