use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, OTP_LEN},
    ui::{
        components::{
            card::Card,
            centered_box,
            hints::{KeyHint, hints_to_spans},
        },
        theme::Theme,
    },
};

const HINTS: &[KeyHint] = &[
    KeyHint::new("Ctrl+S", "send code"),
    KeyHint::new("Enter", "verify"),
    KeyHint::new("Ctrl+L", "logout"),
];

/// Six boxes, filled left to right: `[1][2][_][_][_][_]`.
fn otp_slots(otp: &str) -> String {
    let mut digits = otp.chars();
    (0..OTP_LEN)
        .map(|_| format!("[{}]", digits.next().unwrap_or('_')))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let verify = &state.verify;
    let card_area = centered_box(50, 10, area);
    frame.render_widget(Clear, card_area);
    let inner = Card::new("Verify your email", theme)
        .focused(true)
        .render_frame(frame, card_area);

    let email = state
        .session
        .profile()
        .map(|p| p.email.as_str())
        .unwrap_or("your inbox");

    let status = if verify.busy {
        Span::styled("Verifying…", Style::default().fg(theme.dim))
    } else if verify.sending {
        Span::styled("Sending code…", Style::default().fg(theme.dim))
    } else if let Some(message) = &verify.message {
        Span::styled(message.as_str(), Style::default().fg(theme.error))
    } else {
        Span::raw("")
    };

    let lines = vec![
        Line::from(Span::styled(
            "Enter the 6-digit code sent to",
            Style::default().fg(theme.text_muted),
        )),
        Line::from(Span::styled(email, Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(
            otp_slots(&verify.otp),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(status),
        Line::from(hints_to_spans(HINTS, theme)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
