use crate::app::domain::RowId;
use crate::app::domain::theme::BUILTIN_BULLETS;

#[derive(Debug, Clone, PartialEq)]
pub struct BulletRow {
    pub id: RowId,
    pub value: String,
}

/// Editable cycle of bullet glyphs for unordered lists.
///
/// The rendered list never drops below one row. Blank rows are allowed while
/// editing but are left out of [`read`](Self::read), so the effective
/// sequence can still end up empty.
pub struct BulletSequenceEditor {
    defaults: Vec<String>,
    rows: Vec<BulletRow>,
    disabled: bool,
    next_id: u64,
}

impl BulletSequenceEditor {
    pub fn new(defaults: Vec<String>) -> Self {
        let defaults = if defaults.is_empty() {
            BUILTIN_BULLETS.iter().map(|s| s.to_string()).collect()
        } else {
            defaults
        };
        let mut editor = Self {
            defaults,
            rows: Vec::new(),
            disabled: false,
            next_id: 1,
        };
        editor.render(&[]);
        editor
    }

    fn next_row_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace all rows with `values`, or with the defaults when empty.
    pub fn render(&mut self, values: &[String]) {
        let source = if values.is_empty() {
            self.defaults.clone()
        } else {
            values.to_vec()
        };
        self.rows.clear();
        for value in source {
            self.add_row(value);
        }
    }

    pub fn add_row(&mut self, value: impl Into<String>) -> RowId {
        let id = self.next_row_id();
        self.rows.push(BulletRow {
            id,
            value: value.into(),
        });
        id
    }

    /// Remove a row unless it is the last one. Returns whether it was removed.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        if !self.can_remove() {
            return false;
        }
        let Some(idx) = self.rows.iter().position(|r| r.id == id) else {
            return false;
        };
        self.rows.remove(idx);
        true
    }

    /// Whether remove controls are enabled.
    pub fn can_remove(&self) -> bool {
        !self.disabled && self.rows.len() > 1
    }

    pub fn set_value(&mut self, id: RowId, value: impl Into<String>) -> bool {
        match self.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Trimmed, non-blank values in row order.
    pub fn read(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.value.trim())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
            .collect()
    }

    /// Freeze or unfreeze the rows without touching their contents.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn rows(&self) -> &[BulletRow] {
        &self.rows
    }
}
