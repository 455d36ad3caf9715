#![forbid(unsafe_code)]

//! Host input forwarded to a tree view.
//!
//! The host translates its own key events (terminal, GUI toolkit, test
//! script) into [`TreeKey`] values. Only the keys a tree view reacts to are
//! represented; everything else stays with the host.

/// A key or text input understood by tree views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TreeKey {
    /// Collapse the focused node, or move to its parent when already collapsed.
    Left,
    /// Expand the focused node.
    Right,
    /// Expand the focused node (numeric keypad `+`).
    Expand,
    /// Collapse the focused node (numeric keypad `-`).
    Collapse,
    /// Expand the focused node and all of its descendants (keypad `*`).
    ExpandAll,
    /// Revert the last type-ahead character.
    Backspace,
    /// Text input, usually a single character, fed to type-ahead search.
    Text(String),
}

impl TreeKey {
    /// Text input from a single character.
    #[must_use]
    pub fn char(c: char) -> Self {
        Self::Text(c.to_string())
    }

    /// Whether this key carries text for type-ahead search.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(s) if !s.is_empty())
    }
}
