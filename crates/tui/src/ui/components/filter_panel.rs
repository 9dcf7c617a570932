use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::FilterEditor,
    shipments::{FilterField, filters::status_label},
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

pub fn render(frame: &mut Frame<'_>, area: Rect, editor: &FilterEditor, theme: &Theme) {
    let rows = FilterField::ALL.len() as u16;
    let popup = centered_box(52, rows + 6, area);
    frame.render_widget(Clear, popup);
    let inner = Card::new("Filters", theme)
        .focused(true)
        .render_frame(frame, popup);

    let mut constraints = vec![Constraint::Length(1); FilterField::ALL.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    let focused = editor.focused();
    for (i, field) in FilterField::ALL.iter().enumerate() {
        let raw = editor.draft.get(*field);
        let shown = match field {
            FilterField::IsDelivered => status_label(raw).to_string(),
            FilterField::ShipmentType if raw.is_empty() => "All".to_string(),
            FilterField::StartDate | FilterField::EndDate if raw.is_empty() && *field != focused => {
                "YYYY-MM-DD".to_string()
            }
            _ => raw.to_string(),
        };
        InputRow::new(field.label(), &shown)
            .focused(*field == focused)
            .render(frame, layout[i], theme);
    }

    let footer = FilterField::ALL.len() + 1;
    if let Some(err) = &editor.error {
        frame.render_widget(
            Paragraph::new(Span::styled(err.as_str(), Style::default().fg(theme.error))),
            layout[footer],
        );
    }
    frame.render_widget(
        Paragraph::new(Line::from(hints_to_spans(common::FILTER_PANEL, theme))),
        layout[footer + 1],
    );
}
