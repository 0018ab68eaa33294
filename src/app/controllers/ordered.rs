//! Digit table editor for custom-base ordered list markers.
//!
//! The table always holds exactly `base` rows. Changing the base re-renders
//! the table: positions still in range keep whatever the user typed (blank
//! included), new positions are filled from the default digits, and
//! positions past the new base are dropped.

pub const MIN_BASE: u8 = 2;
pub const MAX_BASE: u8 = 10;

/// Round and clamp a numeric base into `[MIN_BASE, MAX_BASE]`.
pub fn clamp_base(n: f64) -> u8 {
    n.round().clamp(MIN_BASE as f64, MAX_BASE as f64) as u8
}

/// Parse a raw base input. Anything that is not a number yields `fallback`.
pub fn sanitize_base(raw: &str, fallback: u8) -> u8 {
    match raw.trim().parse::<f64>() {
        Ok(n) if !n.is_nan() => clamp_base(n),
        _ => fallback.clamp(MIN_BASE, MAX_BASE),
    }
}

/// Base implied by a default digit table: its length, clamped.
pub fn base_for_digits(digits: &[String]) -> u8 {
    digits.len().clamp(MIN_BASE as usize, MAX_BASE as usize) as u8
}

#[derive(Debug, Clone, PartialEq)]
pub struct DigitRow {
    pub placeholder: String,
    pub value: String,
}

pub struct OrderedSequenceEditor {
    defaults: Vec<String>,
    fallback_base: u8,
    base: u8,
    rows: Vec<DigitRow>,
    focused: Option<usize>,
}

impl OrderedSequenceEditor {
    /// Build the editor from the default digit table. `initial_base` is the
    /// configured base, if any; otherwise the table length decides.
    pub fn new(defaults: Vec<String>, initial_base: Option<f64>) -> Self {
        let fallback_base = base_for_digits(&defaults);
        let base = initial_base
            .filter(|n| !n.is_nan())
            .map(clamp_base)
            .unwrap_or(fallback_base);

        let mut editor = Self {
            defaults,
            fallback_base,
            base,
            rows: Vec::new(),
            focused: None,
        };
        let seed = editor.defaults.clone();
        editor.render(base, &seed);
        editor
    }

    pub fn sanitize_base(&self, raw: &str) -> u8 {
        sanitize_base(raw, self.fallback_base)
    }

    /// Default digit at `index`, or the index itself when the table has none.
    pub fn positional_default(&self, index: usize) -> String {
        self.defaults
            .get(index)
            .filter(|d| !d.is_empty())
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }

    /// Replace every row so there are exactly `base` of them.
    pub fn render(&mut self, base: u8, values: &[String]) {
        let base = base.clamp(MIN_BASE, MAX_BASE);
        self.rows = (0..base as usize)
            .map(|i| {
                let placeholder = self.positional_default(i);
                let value = values.get(i).cloned().unwrap_or_else(|| placeholder.clone());
                DigitRow { placeholder, value }
            })
            .collect();
        self.base = base;
        if self.focused.is_some_and(|i| i >= self.rows.len()) {
            self.focused = None;
        }
    }

    /// Current row values, trimmed. Blank rows are kept.
    pub fn read(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.value.trim().to_string()).collect()
    }

    /// Repair `values` into exactly `base` non-blank digits.
    pub fn ensure_digits(&self, values: &[String], base: u8) -> Vec<String> {
        (0..base.clamp(MIN_BASE, MAX_BASE) as usize)
            .map(|i| match values.get(i).map(|v| v.trim()) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => self.positional_default(i),
            })
            .collect()
    }

    /// Live base edit: capture what is in the rows, then re-render against
    /// the sanitized base. Returns the base now in effect.
    pub fn change_base(&mut self, raw: &str) -> u8 {
        // Untrimmed, so a row being typed into is re-rendered verbatim.
        let current: Vec<String> = self.rows.iter().map(|r| r.value.clone()).collect();
        let base = self.sanitize_base(raw);
        self.render(base, &current);
        log::debug!("Ordered base changed to {} ({} rows kept)", base, current.len().min(base as usize));
        base
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn focus(&mut self, index: Option<usize>) {
        self.focused = index.filter(|i| *i < self.rows.len());
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn rows(&self) -> &[DigitRow] {
        &self.rows
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    pub fn fallback_base(&self) -> u8 {
        self.fallback_base
    }
}
