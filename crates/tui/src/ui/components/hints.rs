use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub mod common {
    use super::KeyHint;

    pub const LIST: &[KeyHint] = &[
        KeyHint::new("↑↓", "select"),
        KeyHint::new("←→", "page"),
        KeyHint::new("n", "new"),
        KeyHint::new("e", "edit"),
        KeyHint::new("d", "delete"),
    ];

    pub const FILTERS: &[KeyHint] = &[
        KeyHint::new("/", "filters"),
        KeyHint::new("t", "type"),
        KeyHint::new("s", "status"),
        KeyHint::new("c", "clear"),
        KeyHint::new("r", "reload"),
    ];

    pub const FORM: &[KeyHint] = &[
        KeyHint::new("Tab", "next"),
        KeyHint::new("Space", "toggle"),
        KeyHint::new("Enter", "save"),
        KeyHint::new("Esc", "cancel"),
    ];

    pub const FILTER_PANEL: &[KeyHint] = &[
        KeyHint::new("Tab", "next"),
        KeyHint::new("Space", "cycle"),
        KeyHint::new("Ctrl+U", "clear field"),
        KeyHint::new("Enter", "apply"),
        KeyHint::new("Esc", "close"),
    ];

    pub const CONFIRM: &[KeyHint] = &[KeyHint::new("y", "delete"), KeyHint::new("n", "keep")];

    pub const SESSION: &[KeyHint] = &[KeyHint::new("L", "logout"), KeyHint::new("q", "quit")];
}
