use std::collections::BTreeSet;

/// How [`Selection::select`] combines a row with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Add the row.
    Select,
    Deselect,
    Toggle,
    /// Replace the whole selection with the row.
    ClearAndSelect,
}

/// Set of selected row indices, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    rows: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, row: usize, mode: SelectionMode) {
        match mode {
            SelectionMode::Select => {
                self.rows.insert(row);
            }
            SelectionMode::Deselect => {
                self.rows.remove(&row);
            }
            SelectionMode::Toggle => {
                if !self.rows.remove(&row) {
                    self.rows.insert(row);
                }
            }
            SelectionMode::ClearAndSelect => {
                self.rows.clear();
                self.rows.insert(row);
            }
        }
    }

    /// Replace the selection with `rows`.
    pub fn replace(&mut self, rows: impl IntoIterator<Item = usize>) {
        self.rows = rows.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Selected rows in ascending order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.rows.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
