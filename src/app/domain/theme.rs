use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::controls::{ControlValue, ThemeField};

pub const PRODUCT_NAME: &str = "Markdown Styler";

/// Glyph cycle used when neither the user nor the defaults provide one.
pub const BUILTIN_BULLETS: [&str; 3] = ["•", "◦", "▪"];

/// Digit table used when the defaults do not carry `customOrderedDigits`.
pub const BUILTIN_ORDERED_DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletConfig {
    pub use_custom_bullets: bool,
    pub custom_bullet_sequence: Vec<String>,
}

impl BulletConfig {
    /// The flag only survives when there is at least one glyph to cycle through.
    pub fn new(requested: bool, sequence: Vec<String>) -> Self {
        Self {
            use_custom_bullets: requested && !sequence.is_empty(),
            custom_bullet_sequence: sequence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedConfig {
    pub use_custom_ordered: bool,
    pub custom_ordered_base: u8,
    pub custom_ordered_digits: Vec<String>,
    pub ordered_marker_prefix: String,
    pub ordered_marker_suffix: String,
}

/// Immutable snapshot of every visual parameter sent to the render service.
///
/// A new `Theme` is gathered from the controls for each preview and export;
/// nothing edits one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub title: String,
    pub font_family: String,
    pub base_font_size: f64,
    pub line_height: f64,
    pub text_color: String,
    pub background_color: String,
    pub heading_color: String,
    pub accent_color: String,
    pub blockquote_background: String,
    pub blockquote_border_color: String,
    pub blockquote_text_color: String,
    pub code_background: String,
    pub code_text_color: String,
    pub list_style: String,
    pub ordered_list_style: String,
    pub page_padding: String,
    pub card_shadow: String,
    #[serde(flatten)]
    pub bullets: BulletConfig,
    #[serde(flatten)]
    pub ordered: OrderedConfig,
}

impl Theme {
    /// Title shown in the document chrome after a successful preview.
    pub fn display_title(&self) -> String {
        let title = self.title.trim();
        let title = if title.is_empty() { "Untitled" } else { title };
        format!("{} - {}", title, PRODUCT_NAME)
    }
}

/// Defaults the page was served with, parsed leniently.
///
/// Every key is optional. Anything missing, blank or of the wrong type falls
/// back to the built-in value of its field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeDefaults {
    values: HashMap<ThemeField, ControlValue>,
    bullet_sequence: Option<Vec<String>>,
    ordered_digits: Option<Vec<String>>,
    ordered_base: Option<f64>,
}

impl ThemeDefaults {
    /// Parse the JSON-encoded default theme. Malformed input is logged and
    /// treated as an empty object.
    pub fn parse(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => Self::from_map(&map),
            Ok(other) => {
                log::warn!("Default theme is not a JSON object ({}); using built-in defaults", type_name(&other));
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to parse default theme: {}. Using built-in defaults.", e);
                Self::default()
            }
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut values = HashMap::new();
        for field in ThemeField::ALL {
            if let Some(value) = map.get(field.key()).and_then(|v| control_value(field, v)) {
                values.insert(field, value);
            }
        }

        let bullet_sequence = map
            .get("customBulletSequence")
            .map(|v| {
                string_items(v)
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|seq| !seq.is_empty());

        let ordered_digits = map
            .get("customOrderedDigits")
            .map(|v| string_items(v).into_iter().map(|s| s.trim().to_string()).collect::<Vec<_>>())
            .filter(|digits| !digits.is_empty());

        let ordered_base = map.get("customOrderedBase").and_then(number_value);

        Self {
            values,
            bullet_sequence,
            ordered_digits,
            ordered_base,
        }
    }

    /// Configured value of a control, or its built-in default.
    pub fn value(&self, field: ThemeField) -> ControlValue {
        self.values
            .get(&field)
            .cloned()
            .unwrap_or_else(|| field.builtin_default())
    }

    pub fn bullet_sequence(&self) -> Vec<String> {
        match &self.bullet_sequence {
            Some(seq) => seq.clone(),
            None => BUILTIN_BULLETS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn ordered_digits(&self) -> Vec<String> {
        match &self.ordered_digits {
            Some(digits) => digits.clone(),
            None => BUILTIN_ORDERED_DIGITS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Raw configured base, if the defaults carry one.
    pub fn ordered_base(&self) -> Option<f64> {
        self.ordered_base
    }
}

fn control_value(field: ThemeField, value: &Value) -> Option<ControlValue> {
    if field.is_toggle() {
        return value.as_bool().map(ControlValue::Checked);
    }
    let text = match value {
        Value::String(s) if !s.trim().is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let text = match field {
        ThemeField::PagePadding => text.trim().trim_end_matches("px").trim().to_string(),
        _ => text,
    };
    Some(ControlValue::Text(text))
}

fn string_items(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
