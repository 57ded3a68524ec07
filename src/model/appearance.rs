//! Font, icon size and the per-row colour decision.

use crate::fs::entry::DirectoryEntry;
use crate::theme::{Color, ColorRole, ColorRoleMap};

/// Icon edge length used until a font is set.
pub const DEFAULT_ICON_SIZE: u32 = 16;

/// Font description handed over by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub family: String,
    /// Em size in pixels.
    pub pixel_size: u32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            pixel_size: 12,
        }
    }
}

impl Font {
    pub fn new(family: impl Into<String>, pixel_size: u32) -> Self {
        Self {
            family: family.into(),
            pixel_size,
        }
    }

    /// Line height in pixels (ascent + descent), approximated as 4/3 of the em size.
    /// Saturates at `u32::MAX` for absurd sizes.
    pub fn line_height(&self) -> u32 {
        let height = (u64::from(self.pixel_size) * 4 + 2) / 3;
        u32::try_from(height).unwrap_or(u32::MAX)
    }
}

/// Appearance state owned by the model.
#[derive(Debug, Clone)]
pub struct Appearance {
    pub font: Font,
    /// Derived from the font's line height.
    pub icon_size: u32,
    pub colors: ColorRoleMap,
    /// Directories use the folder colour even when hidden, read-only or system.
    pub folder_top_priority: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            font: Font::default(),
            icon_size: DEFAULT_ICON_SIZE,
            colors: ColorRoleMap::new(),
            folder_top_priority: false,
        }
    }
}

impl Appearance {
    pub fn set_font(&mut self, font: Font) {
        self.icon_size = font.line_height();
        self.font = font;
    }

    pub fn init_colors(&mut self, colors: ColorRoleMap, folder_top_priority: bool) {
        self.colors = colors;
        self.folder_top_priority = folder_top_priority;
    }

    pub fn text_color(&self, entry: &DirectoryEntry, selected: bool) -> Option<Color> {
        self.colors.get(text_role(entry, selected, self.folder_top_priority))
    }

    pub fn background_color(&self, selected: bool) -> Option<Color> {
        self.colors.get(background_role(selected))
    }
}

/// Pick the text colour role for a row. The first matching category wins.
pub fn text_role(entry: &DirectoryEntry, selected: bool, folder_top_priority: bool) -> ColorRole {
    let parent = entry.is_parent();
    let role = if folder_top_priority && entry.is_dir() {
        ColorRole::Folder
    } else if !parent && entry.is_system {
        ColorRole::System
    } else if !parent && entry.is_hidden {
        ColorRole::Hidden
    } else if !parent && !entry.is_writable {
        ColorRole::ReadOnly
    } else if entry.is_dir() {
        ColorRole::Folder
    } else {
        ColorRole::Normal
    };
    if selected {
        role.selected()
    } else {
        role
    }
}

pub fn background_role(selected: bool) -> ColorRole {
    if selected {
        ColorRole::SelectedBackground
    } else {
        ColorRole::Background
    }
}
