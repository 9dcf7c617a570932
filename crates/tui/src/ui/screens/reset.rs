use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, ResetField, ResetStep},
    ui::{
        components::{
            card::Card,
            centered_box,
            hints::{KeyHint, hints_to_spans},
            input::InputRow,
        },
        theme::Theme,
    },
};

const EMAIL_HINTS: &[KeyHint] = &[KeyHint::new("Enter", "send code"), KeyHint::new("Esc", "back")];
const CODE_HINTS: &[KeyHint] = &[
    KeyHint::new("Tab", "next"),
    KeyHint::new("Enter", "reset"),
    KeyHint::new("Esc", "back"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let reset = &state.reset;
    let card_area = centered_box(50, 9, area);
    frame.render_widget(Clear, card_area);
    let inner = Card::new("Reset password", theme)
        .focused(true)
        .render_frame(frame, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let hints = match reset.step {
        ResetStep::Email => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Enter your registered email",
                    Style::default().fg(theme.text_muted),
                )),
                rows[0],
            );
            InputRow::new("Email", &reset.email)
                .label_width(14)
                .focused(true)
                .render(frame, rows[2], theme);
            EMAIL_HINTS
        }
        ResetStep::Code => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("Code sent to {}", reset.email),
                    Style::default().fg(theme.text_muted),
                )),
                rows[0],
            );
            InputRow::new("Code", &reset.otp)
                .label_width(14)
                .focused(reset.focus == ResetField::Otp)
                .render(frame, rows[1], theme);
            InputRow::new("New password", &reset.new_password)
                .label_width(14)
                .masked(true)
                .focused(reset.focus == ResetField::Password)
                .render(frame, rows[2], theme);
            CODE_HINTS
        }
    };

    let status = if reset.busy {
        Span::styled("Please wait…", Style::default().fg(theme.dim))
    } else if let Some(message) = &reset.message {
        Span::styled(message.as_str(), Style::default().fg(theme.error))
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(status), rows[3]);
    frame.render_widget(
        Paragraph::new(Line::from(hints_to_spans(hints, theme))).alignment(Alignment::Center),
        rows[4],
    );
}
