//! Colour roles and built-in palettes.
//!
//! Two built-in palettes (dark and light) are provided; the config file can
//! override individual roles with `#rrggbb` values.

use std::collections::HashMap;
use std::fmt;

use crate::config::{AppearanceConfig, ThemeColorsConfig};

// ── Colour values ────────────────────────────────────────────────────────────

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Semantic colour slot for an entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Normal,
    NormalSelected,
    Folder,
    FolderSelected,
    ReadOnly,
    ReadOnlySelected,
    Hidden,
    HiddenSelected,
    System,
    SystemSelected,
    Background,
    SelectedBackground,
}

impl ColorRole {
    /// The role to use when the row is selected.
    pub fn selected(self) -> Self {
        match self {
            ColorRole::Normal => ColorRole::NormalSelected,
            ColorRole::Folder => ColorRole::FolderSelected,
            ColorRole::ReadOnly => ColorRole::ReadOnlySelected,
            ColorRole::Hidden => ColorRole::HiddenSelected,
            ColorRole::System => ColorRole::SystemSelected,
            ColorRole::Background => ColorRole::SelectedBackground,
            already => already,
        }
    }
}

/// Role → colour mapping supplied by the UI layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorRoleMap {
    colors: HashMap<ColorRole, Color>,
}

impl ColorRoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: ColorRole) -> Option<Color> {
        self.colors.get(&role).copied()
    }

    pub fn set(&mut self, role: ColorRole, color: Color) {
        self.colors.insert(role, color);
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl FromIterator<(ColorRole, Color)> for ColorRoleMap {
    fn from_iter<I: IntoIterator<Item = (ColorRole, Color)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark palette (Catppuccin Mocha).
pub fn dark_theme() -> ColorRoleMap {
    [
        (ColorRole::Normal, Color::rgb(205, 214, 244)), // #cdd6f4 (text)
        (ColorRole::NormalSelected, Color::rgb(205, 214, 244)),
        (ColorRole::Folder, Color::rgb(137, 180, 250)), // #89b4fa (blue)
        (ColorRole::FolderSelected, Color::rgb(180, 190, 254)), // #b4befe (lavender)
        (ColorRole::ReadOnly, Color::rgb(250, 179, 135)), // #fab387 (peach)
        (ColorRole::ReadOnlySelected, Color::rgb(249, 226, 175)),
        (ColorRole::Hidden, Color::rgb(108, 112, 134)), // #6c7086 (overlay0)
        (ColorRole::HiddenSelected, Color::rgb(147, 153, 178)),
        (ColorRole::System, Color::rgb(243, 139, 168)), // #f38ba8 (red)
        (ColorRole::SystemSelected, Color::rgb(235, 160, 172)),
        (ColorRole::Background, Color::rgb(30, 30, 46)), // #1e1e2e (base)
        (ColorRole::SelectedBackground, Color::rgb(69, 71, 90)), // #45475a (surface1)
    ]
    .into_iter()
    .collect()
}

/// Light palette (Catppuccin Latte).
pub fn light_theme() -> ColorRoleMap {
    [
        (ColorRole::Normal, Color::rgb(76, 79, 105)), // #4c4f69 (text)
        (ColorRole::NormalSelected, Color::rgb(76, 79, 105)),
        (ColorRole::Folder, Color::rgb(30, 102, 245)), // #1e66f5 (blue)
        (ColorRole::FolderSelected, Color::rgb(114, 135, 253)),
        (ColorRole::ReadOnly, Color::rgb(254, 100, 11)), // #fe640b (peach)
        (ColorRole::ReadOnlySelected, Color::rgb(223, 142, 29)),
        (ColorRole::Hidden, Color::rgb(156, 160, 176)), // #9ca0b0 (overlay0)
        (ColorRole::HiddenSelected, Color::rgb(124, 127, 147)),
        (ColorRole::System, Color::rgb(210, 15, 57)), // #d20f39 (red)
        (ColorRole::SystemSelected, Color::rgb(230, 69, 83)),
        (ColorRole::Background, Color::rgb(239, 241, 245)), // #eff1f5 (base)
        (ColorRole::SelectedBackground, Color::rgb(204, 208, 218)), // #ccd0da (surface1)
    ]
    .into_iter()
    .collect()
}

// ── Colour parsing ───────────────────────────────────────────────────────────

/// Parse a hex colour string like `"#aabbcc"`. Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::rgb(r, g, b))
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the colour map from config.
///
/// - `"dark"` (default): dark palette
/// - `"light"`: light palette
/// - `"custom"`: dark palette with the `[appearance.custom]` overrides applied
pub fn resolve_theme(config: &AppearanceConfig) -> ColorRoleMap {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply custom hex overrides; malformed values keep the existing colour.
fn apply_custom_colors(theme: &mut ColorRoleMap, custom: &ThemeColorsConfig) {
    let overrides = [
        (ColorRole::Normal, &custom.normal),
        (ColorRole::NormalSelected, &custom.normal_selected),
        (ColorRole::Folder, &custom.folder),
        (ColorRole::FolderSelected, &custom.folder_selected),
        (ColorRole::ReadOnly, &custom.read_only),
        (ColorRole::ReadOnlySelected, &custom.read_only_selected),
        (ColorRole::Hidden, &custom.hidden),
        (ColorRole::HiddenSelected, &custom.hidden_selected),
        (ColorRole::System, &custom.system),
        (ColorRole::SystemSelected, &custom.system_selected),
        (ColorRole::Background, &custom.background),
        (ColorRole::SelectedBackground, &custom.selected_background),
    ];
    for (role, value) in overrides {
        if let Some(color) = value.as_deref().and_then(parse_hex_color) {
            theme.set(role, color);
        } else if let Some(bad) = value {
            tracing::warn!("ignoring invalid colour {:?} for {:?}", bad, role);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
