//! Keyboard shortcuts: Left/Right step, Space toggles playback.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Other(String),
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowLeft"`, `" "`, `"Space"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            " " | "Space" | "Spacebar" => Self::Space,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Previous,
    Next,
    TogglePlay,
}

/// What the host should do with the key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; suppress the host's default handling (scrolling).
    PreventDefault(KeyAction),
    Ignored,
}

impl KeyOutcome {
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        matches!(self, Self::PreventDefault(_))
    }
}

#[must_use]
pub const fn outcome_for(key: &Key) -> KeyOutcome {
    match key {
        Key::ArrowLeft => KeyOutcome::PreventDefault(KeyAction::Previous),
        Key::ArrowRight => KeyOutcome::PreventDefault(KeyAction::Next),
        Key::Space => KeyOutcome::PreventDefault(KeyAction::TogglePlay),
        Key::Other(_) => KeyOutcome::Ignored,
    }
}
