use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    shipments::{FormField, FormPhase, ShipmentForm},
    ui::{
        components::{
            card::Card,
            centered_box,
            hints::{common, hints_to_spans},
            input::InputRow,
        },
        theme::Theme,
    },
};

/// Create/edit dialog. Each field gets a value row and an error row.
pub fn render(frame: &mut Frame<'_>, area: Rect, form: &ShipmentForm, theme: &Theme) {
    let field_rows = FormField::ALL.len() as u16 * 2;
    let popup = centered_box(56, field_rows + 6, area);
    frame.render_widget(Clear, popup);
    let inner = Card::new(form.title_text(), theme)
        .focused(true)
        .render_frame(frame, popup);

    let mut constraints = vec![Constraint::Length(1); FormField::ALL.len() * 2];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    for (i, field) in FormField::ALL.iter().enumerate() {
        let value = form.value(*field);
        let shown = if field.is_selector() {
            format!("‹ {value} ›")
        } else {
            value
        };
        InputRow::new(field.label(), &shown)
            .focused(form.focus == *field)
            .render(frame, layout[i * 2], theme);

        if let Some(err) = form.errors.get(*field) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{:12}{err}", ""),
                    Style::default().fg(theme.error),
                )),
                layout[i * 2 + 1],
            );
        }
    }

    let footer = FormField::ALL.len() * 2;
    let status = match form.phase() {
        FormPhase::Submitting => Some(Span::styled("Saving…", Style::default().fg(theme.dim))),
        _ => form
            .server_error
            .as_deref()
            .map(|msg| Span::styled(msg.to_string(), Style::default().fg(theme.error))),
    };
    if let Some(status) = status {
        frame.render_widget(Paragraph::new(Line::from(status)), layout[footer]);
    }
    frame.render_widget(
        Paragraph::new(Line::from(hints_to_spans(common::FORM, theme))),
        layout[footer + 1],
    );
}
