use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::ui::{
    components::{
        card::Card,
        centered_box,
        hints::{common, hints_to_spans},
    },
    theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, title: &str, theme: &Theme) {
    let popup = centered_box(48, 7, area);
    frame.render_widget(Clear, popup);
    let inner = Card::new("Delete shipment", theme)
        .focused(true)
        .render_frame(frame, popup);

    let lines = vec![
        Line::from("Are you sure you want to delete"),
        Line::from(Span::styled(
            format!("\"{title}\"?"),
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(hints_to_spans(common::CONFIRM, theme)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
