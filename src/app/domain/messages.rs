use super::controls::ThemeField;

/// Identity of one row in the bullet editor. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub u64);

/// Input events from whatever front end drives the session.
/// Each control callback sends one of these; `EditorSession::handle_message` routes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Scalar controls
    ControlChanged(ThemeField, String),
    ToggleChanged(ThemeField, bool),
    MarkdownChanged(String),

    // Ordered digit table
    BaseInput(String),
    DigitEdited(usize, String),
    DigitFocused(Option<usize>),
    CustomOrderedToggled(bool),

    // Bullet sequence
    BulletEdited(RowId, String),
    BulletAdded(Option<String>),
    BulletRemoved(RowId),
    CustomBulletsToggled(bool),

    // Actions
    Reset,
    ExportRequested,
}
