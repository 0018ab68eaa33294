//! Control bindings: the capability the theme model reads its inputs through.
//!
//! Every logical form control of the styling panel is a [`ThemeField`]. The
//! session never touches widgets directly; it goes through a
//! [`ControlBindings`] implementation, so the model and both sequence editors
//! run the same way behind a real form, a CLI, or a test.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeField {
    Title,
    FontFamily,
    BaseFontSize,
    LineHeight,
    TextColor,
    BackgroundColor,
    HeadingColor,
    AccentColor,
    BlockquoteBackground,
    BlockquoteBorderColor,
    BlockquoteTextColor,
    CodeBackground,
    CodeTextColor,
    ListStyle,
    OrderedListStyle,
    PagePadding,
    CardShadow,
    UseCustomBullets,
    UseCustomOrdered,
    CustomOrderedBase,
    OrderedMarkerPrefix,
    OrderedMarkerSuffix,
}

impl ThemeField {
    pub const ALL: [ThemeField; 22] = [
        Self::Title,
        Self::FontFamily,
        Self::BaseFontSize,
        Self::LineHeight,
        Self::TextColor,
        Self::BackgroundColor,
        Self::HeadingColor,
        Self::AccentColor,
        Self::BlockquoteBackground,
        Self::BlockquoteBorderColor,
        Self::BlockquoteTextColor,
        Self::CodeBackground,
        Self::CodeTextColor,
        Self::ListStyle,
        Self::OrderedListStyle,
        Self::PagePadding,
        Self::CardShadow,
        Self::UseCustomBullets,
        Self::UseCustomOrdered,
        Self::CustomOrderedBase,
        Self::OrderedMarkerPrefix,
        Self::OrderedMarkerSuffix,
    ];

    /// Key of this field in the theme JSON payload.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::FontFamily => "fontFamily",
            Self::BaseFontSize => "baseFontSize",
            Self::LineHeight => "lineHeight",
            Self::TextColor => "textColor",
            Self::BackgroundColor => "backgroundColor",
            Self::HeadingColor => "headingColor",
            Self::AccentColor => "accentColor",
            Self::BlockquoteBackground => "blockquoteBackground",
            Self::BlockquoteBorderColor => "blockquoteBorderColor",
            Self::BlockquoteTextColor => "blockquoteTextColor",
            Self::CodeBackground => "codeBackground",
            Self::CodeTextColor => "codeTextColor",
            Self::ListStyle => "listStyle",
            Self::OrderedListStyle => "orderedListStyle",
            Self::PagePadding => "pagePadding",
            Self::CardShadow => "cardShadow",
            Self::UseCustomBullets => "useCustomBullets",
            Self::UseCustomOrdered => "useCustomOrdered",
            Self::CustomOrderedBase => "customOrderedBase",
            Self::OrderedMarkerPrefix => "orderedMarkerPrefix",
            Self::OrderedMarkerSuffix => "orderedMarkerSuffix",
        }
    }

    /// Checkbox-style controls hold [`ControlValue::Checked`]; everything else is text.
    pub fn is_toggle(&self) -> bool {
        matches!(self, Self::UseCustomBullets | Self::UseCustomOrdered)
    }

    /// Value a control starts with when the persisted defaults do not mention it.
    pub fn builtin_default(&self) -> ControlValue {
        let text = match self {
            Self::UseCustomBullets | Self::UseCustomOrdered => {
                return ControlValue::Checked(false);
            }
            Self::Title => "Untitled",
            Self::FontFamily => "'Noto Sans KR', 'Apple SD Gothic Neo', 'Malgun Gothic', sans-serif",
            Self::BaseFontSize => "16",
            Self::LineHeight => "1.7",
            Self::TextColor => "#1f2933",
            Self::BackgroundColor => "#ffffff",
            Self::HeadingColor => "#0f172a",
            Self::AccentColor => "#2563eb",
            Self::BlockquoteBackground => "#eff6ff",
            Self::BlockquoteBorderColor => "#2563eb",
            Self::BlockquoteTextColor => "#1e293b",
            Self::CodeBackground => "#0f172a",
            Self::CodeTextColor => "#facc15",
            Self::ListStyle => "disc",
            Self::OrderedListStyle => "decimal",
            // The padding control holds the bare number; `px` is appended on gather.
            Self::PagePadding => "48",
            Self::CardShadow => "0 30px 60px -30px rgba(37, 99, 235, 0.45)",
            Self::CustomOrderedBase => "10",
            Self::OrderedMarkerPrefix => "",
            Self::OrderedMarkerSuffix => ".",
        };
        ControlValue::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Text(String),
    Checked(bool),
}

impl ControlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Checked(_) => "",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Checked(true))
    }
}

/// Read/write access to the form controls backing a theme.
///
/// Values are read lazily: the theme is re-gathered from the bindings every
/// time a preview or export is dispatched.
pub trait ControlBindings: Send {
    fn get(&self, field: ThemeField) -> ControlValue;
    fn set(&mut self, field: ThemeField, value: ControlValue);

    fn text(&self, field: ThemeField) -> String {
        self.get(field).as_text().to_string()
    }

    fn checked(&self, field: ThemeField) -> bool {
        self.get(field).is_checked()
    }
}

/// Map-backed bindings for headless sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryControls {
    values: HashMap<ThemeField, ControlValue>,
}

impl InMemoryControls {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControlBindings for InMemoryControls {
    fn get(&self, field: ThemeField) -> ControlValue {
        match self.values.get(&field) {
            Some(v) => v.clone(),
            None if field.is_toggle() => ControlValue::Checked(false),
            None => ControlValue::Text(String::new()),
        }
    }

    fn set(&mut self, field: ThemeField, value: ControlValue) {
        self.values.insert(field, value);
    }
}
