use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// One labelled input row: `label  value│`. The cursor bar only shows on
/// the focused row.
pub struct InputRow<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub focused: bool,
    pub masked: bool,
    pub label_width: usize,
}

impl<'a> InputRow<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
            masked: false,
            label_width: 12,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let cursor = if self.focused { "│" } else { "" };
        let shown = if self.masked {
            mask_password(self.value)
        } else {
            self.value.to_string()
        };
        let value_style = if self.focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };

        let line = Line::from(vec![
            Span::styled(
                format!("{:<width$}", self.label, width = self.label_width),
                Style::default().fg(theme.text_muted),
            ),
            Span::styled(format!("{shown}{cursor}"), value_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Masks password with bullets, one per character
pub fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}
