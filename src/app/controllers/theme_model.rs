use crate::app::domain::{
    BulletConfig, ControlBindings, ControlValue, OrderedConfig, Theme, ThemeDefaults, ThemeField,
};

use super::bullets::BulletSequenceEditor;
use super::ordered::{OrderedSequenceEditor, base_for_digits, clamp_base};

/// Builds theme snapshots from the controls and restores the defaults.
pub struct ThemeModel {
    defaults: ThemeDefaults,
}

impl ThemeModel {
    pub fn new(defaults: ThemeDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ThemeDefaults {
        &self.defaults
    }

    pub fn bullet_editor(&self) -> BulletSequenceEditor {
        let mut editor = BulletSequenceEditor::new(self.defaults.bullet_sequence());
        editor.set_disabled(!self.defaults.value(ThemeField::UseCustomBullets).is_checked());
        editor
    }

    pub fn ordered_editor(&self) -> OrderedSequenceEditor {
        OrderedSequenceEditor::new(self.defaults.ordered_digits(), self.defaults.ordered_base())
    }

    /// Base the digit table starts with: the configured one, else the table length.
    pub fn default_base(&self) -> u8 {
        let digits = self.defaults.ordered_digits();
        self.defaults
            .ordered_base()
            .filter(|n| !n.is_nan())
            .map(clamp_base)
            .unwrap_or_else(|| base_for_digits(&digits))
    }

    /// Write the default snapshot into the controls and both editors.
    /// Used at startup and by the reset action.
    pub fn seed(
        &self,
        controls: &mut dyn ControlBindings,
        bullets: &mut BulletSequenceEditor,
        ordered: &mut OrderedSequenceEditor,
    ) {
        let base = self.default_base();
        for field in ThemeField::ALL {
            let value = match field {
                ThemeField::CustomOrderedBase => ControlValue::Text(base.to_string()),
                _ => self.defaults.value(field),
            };
            controls.set(field, value);
        }

        bullets.render(&self.defaults.bullet_sequence());
        bullets.set_disabled(!self.defaults.value(ThemeField::UseCustomBullets).is_checked());

        ordered.focus(None);
        ordered.render(base, &self.defaults.ordered_digits());
    }

    /// Discard every edit and go back to the default snapshot.
    pub fn reset(
        &self,
        controls: &mut dyn ControlBindings,
        bullets: &mut BulletSequenceEditor,
        ordered: &mut OrderedSequenceEditor,
    ) {
        log::info!("Resetting theme to defaults");
        self.seed(controls, bullets, ordered);
    }

    /// Read every control into a fresh `Theme`.
    pub fn gather(
        &self,
        controls: &dyn ControlBindings,
        bullets: &BulletSequenceEditor,
        ordered: &OrderedSequenceEditor,
    ) -> Theme {
        let text = |field: ThemeField| controls.text(field);

        let base = ordered.sanitize_base(&text(ThemeField::CustomOrderedBase));
        let padding = self.number(controls, ThemeField::PagePadding);

        Theme {
            title: text(ThemeField::Title),
            font_family: text(ThemeField::FontFamily),
            base_font_size: self.number(controls, ThemeField::BaseFontSize),
            line_height: self.number(controls, ThemeField::LineHeight),
            text_color: text(ThemeField::TextColor),
            background_color: text(ThemeField::BackgroundColor),
            heading_color: text(ThemeField::HeadingColor),
            accent_color: text(ThemeField::AccentColor),
            blockquote_background: text(ThemeField::BlockquoteBackground),
            blockquote_border_color: text(ThemeField::BlockquoteBorderColor),
            blockquote_text_color: text(ThemeField::BlockquoteTextColor),
            code_background: text(ThemeField::CodeBackground),
            code_text_color: text(ThemeField::CodeTextColor),
            list_style: text(ThemeField::ListStyle),
            ordered_list_style: text(ThemeField::OrderedListStyle),
            page_padding: format!("{}px", padding),
            card_shadow: text(ThemeField::CardShadow),
            bullets: BulletConfig::new(controls.checked(ThemeField::UseCustomBullets), bullets.read()),
            ordered: OrderedConfig {
                use_custom_ordered: controls.checked(ThemeField::UseCustomOrdered),
                custom_ordered_base: base,
                custom_ordered_digits: ordered.ensure_digits(&ordered.read(), base),
                ordered_marker_prefix: text(ThemeField::OrderedMarkerPrefix),
                ordered_marker_suffix: text(ThemeField::OrderedMarkerSuffix),
            },
        }
    }

    /// Numeric control value; unparsable input falls back to the default.
    /// A trailing `px` unit is accepted.
    fn number(&self, controls: &dyn ControlBindings, field: ThemeField) -> f64 {
        [controls.get(field), self.defaults.value(field), field.builtin_default()]
            .iter()
            .find_map(|v| {
                let text = v.as_text();
                let text = text.trim();
                let text = text.strip_suffix("px").unwrap_or(text).trim_end();
                text.parse::<f64>().ok().filter(|n| n.is_finite())
            })
            .unwrap_or(0.0)
    }
}
