use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, AuthMode, LoginField},
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

const LOGIN_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "login"),
    KeyHint::new("Ctrl+R", "sign up"),
    KeyHint::new("Ctrl+F", "forgot password"),
];

const REGISTER_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "sign up"),
    KeyHint::new("Ctrl+R", "back to login"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let login = &state.login;
    let fields = login.fields();

    let box_height = fields.len() as u16 * 2 + 3;
    let card_area = centered_box(46, box_height, area);
    frame.render_widget(Clear, card_area);

    let title = match login.mode {
        AuthMode::Login => "Login",
        AuthMode::Register => "Create Account",
    };
    let inner = Card::new(title, theme).focused(true).render_frame(frame, card_area);

    let mut constraints = Vec::new();
    for _ in fields {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (i, field) in fields.iter().enumerate() {
        let (label, value, masked) = match field {
            LoginField::Name => ("Name", login.name.as_str(), false),
            LoginField::Email => ("Email", login.email.as_str(), false),
            LoginField::Password => ("Password", login.password.as_str(), true),
        };
        InputRow::new(label, value)
            .label_width(10)
            .masked(masked)
            .focused(login.focus == *field)
            .render(frame, rows[i * 2], theme);
    }

    // Status line below the box
    let below = Rect {
        x: card_area.x,
        y: card_area.y.saturating_add(card_area.height),
        width: card_area.width,
        height: 2,
    }
    .intersection(area);

    let status = if login.busy {
        Line::from(Span::styled("Please wait…", Style::default().fg(theme.dim)))
    } else if let Some(message) = &login.message {
        Line::from(Span::styled(message.as_str(), Style::default().fg(theme.error)))
    } else {
        Line::from("")
    };
    let hints = match login.mode {
        AuthMode::Login => LOGIN_HINTS,
        AuthMode::Register => REGISTER_HINTS,
    };
    frame.render_widget(
        Paragraph::new(vec![status, Line::from(hints_to_spans(hints, theme))])
            .alignment(Alignment::Center),
        below,
    );
}
