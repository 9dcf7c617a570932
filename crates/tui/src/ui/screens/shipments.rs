use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use api_types::shipment::{Shipment, ShipmentFilter};

use crate::{
    app::{AppState, Overlay},
    shipments::{ListController, filters::DATE_FORMAT},
    ui::{
        components::{
            card::{Card, StatCard},
            hints::{common, hint_separator, hints_to_spans},
            money::{format_usd, inline_progress_bar},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(4), // Stats
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    render_stats(frame, layout[1], &state.list, theme);
    render_table(frame, layout[2], state, theme);
    render_pagination(frame, layout[3], &state.list, theme);
    render_hints(frame, layout[4], theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .session
        .profile()
        .map(|p| p.name.as_str())
        .unwrap_or("-");

    let mut line = vec![
        Span::styled(
            "Shipsy",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
    ];
    if let Some(filter) = state.list.active_filter() {
        line.push(Span::styled("Filter", Style::default().fg(theme.text_muted)));
        line.push(Span::styled(
            format!(": {}", filter_summary(filter)),
            Style::default().fg(theme.warning),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

/// Short description of the active criteria, e.g. `type=SEA cost>=10`.
fn filter_summary(filter: &ShipmentFilter) -> String {
    let mut parts = Vec::new();
    if let Some(keyword) = &filter.keyword {
        parts.push(format!("\"{keyword}\""));
    }
    if let Some(kind) = filter.shipment_type {
        parts.push(format!("type={kind}"));
    }
    if let Some(delivered) = filter.is_delivered {
        parts.push(if delivered { "delivered" } else { "in transit" }.to_string());
    }
    if let Some(date) = filter.start_date {
        parts.push(format!("from {}", date.format(DATE_FORMAT)));
    }
    if let Some(date) = filter.end_date {
        parts.push(format!("to {}", date.format(DATE_FORMAT)));
    }
    if let Some(cost) = filter.min_cost {
        parts.push(format!("cost>={cost}"));
    }
    if let Some(cost) = filter.max_cost {
        parts.push(format!("cost<={cost}"));
    }
    parts.join(" ")
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, list: &ListController, theme: &Theme) {
    let stats = list.stats();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let breakdown = stats
        .by_type
        .iter()
        .map(|(kind, count)| format!("{kind} {count}"))
        .collect::<Vec<_>>()
        .join(" · ");

    StatCard::new("Total Shipments", stats.total_shipments.to_string(), theme)
        .subtitle(breakdown)
        .render(frame, cols[0]);
    StatCard::new("Delivered", stats.delivered.to_string(), theme)
        .subtitle(inline_progress_bar(stats.delivery_rate(), 10))
        .render(frame, cols[1]);
    StatCard::new("Total Cost", format_usd(stats.total_cost, 0), theme)
        .subtitle(format!("{} in transit", stats.in_transit()))
        .render(frame, cols[2]);
    StatCard::new("Average Cost", format_usd(stats.avg_cost, 0), theme)
        .subtitle("per shipment")
        .render(frame, cols[3]);
}

fn shipment_row(shipment: &Shipment, theme: &Theme) -> Row<'static> {
    let (status, status_color) = if shipment.is_delivered {
        ("Delivered", theme.positive)
    } else {
        ("In Transit", theme.warning)
    };
    Row::new(vec![
        Cell::from(shipment.shipment_title.clone()),
        Cell::from(shipment.shipment_type.to_string()),
        Cell::from(format_usd(shipment.cost, 2)),
        Cell::from(shipment.shipment_date.format("%b %d, %Y").to_string()),
        Cell::from(Span::styled(status, Style::default().fg(status_color))),
        Cell::from(
            shipment
                .shipment_description
                .clone()
                .unwrap_or_default(),
        )
        .style(Style::default().fg(theme.dim)),
    ])
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let list = &state.list;
    let title = if list.is_loading() {
        "Shipments · loading…"
    } else {
        "Shipments"
    };
    let card = Card::new(title, theme).focused(matches!(state.overlay, Overlay::None));
    let inner = card.render_frame(frame, area);

    if list.shipments().is_empty() {
        let message = if list.is_loading() {
            "Loading shipments…"
        } else if list.is_filtering() {
            "No shipments match your filters. Press c to clear them."
        } else if list.all_shipments().is_empty() {
            "No shipments yet. Press n to add your first one."
        } else {
            "Nothing on this page."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.text_muted)))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header = Row::new(["Title", "Type", "Cost", "Date", "Status", "Description"])
        .style(
            Style::default()
                .fg(theme.text_muted)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);
    let rows = list
        .shipments()
        .iter()
        .map(|shipment| shipment_row(shipment, theme))
        .collect::<Vec<_>>();
    let widths = [
        Constraint::Percentage(22),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(13),
        Constraint::Length(11),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .style(Style::default().fg(theme.text))
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    let mut table_state = TableState::default().with_selected(Some(list.selected()));
    frame.render_stateful_widget(table, inner, &mut table_state);
}

fn render_pagination(frame: &mut Frame<'_>, area: Rect, list: &ListController, theme: &Theme) {
    let page = list.page();
    let Some((first, last)) = page.showing_range() else {
        return;
    };

    let arrow = |enabled: bool, glyph: &'static str| {
        let color = if enabled { theme.accent } else { theme.dim };
        Span::styled(glyph, Style::default().fg(color))
    };
    let line = Line::from(vec![
        Span::styled(
            format!("Showing {first} to {last} of {} shipments", page.total_elements),
            Style::default().fg(theme.text_muted),
        ),
        Span::raw("   "),
        arrow(page.has_prev(), "‹ "),
        Span::raw(format!(
            "Page {} of {}",
            page.current_page + 1,
            page.total_pages
        )),
        arrow(page.has_next(), " ›"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_hints(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let mut parts = hints_to_spans(common::LIST, theme);
    parts.push(hint_separator(theme));
    parts.extend(hints_to_spans(common::FILTERS, theme));
    parts.push(hint_separator(theme));
    parts.extend(hints_to_spans(common::SESSION, theme));
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
