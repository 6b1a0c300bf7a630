//! Key events that can trigger a send.

/// The key part of a key event, reduced to what the chat input cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// A key event as delivered by the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Line-break modifier held (Shift in a GUI, a trailing `\` in the REPL).
    pub line_break: bool,
    /// Part of an in-progress IME composition.
    pub composing: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            line_break: false,
            composing: false,
        }
    }

    pub fn with_line_break(mut self) -> Self {
        self.line_break = true;
        self
    }

    /// Enter submits unless it confirms an IME composition or carries the
    /// line-break modifier.
    pub fn is_submit(&self) -> bool {
        self.key == Key::Enter && !self.line_break && !self.composing
    }
}
