pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Overlay, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    if state.restoring {
        render_splash(frame, area, &theme);
    } else {
        match state.screen {
            Screen::Login => screens::login::render(frame, area, state, &theme),
            Screen::VerifyEmail => screens::verify::render(frame, area, state, &theme),
            Screen::ResetPassword => screens::reset::render(frame, area, state, &theme),
            Screen::Shipments => render_shipments(frame, area, state, &theme),
        }
    }

    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_shipments(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    screens::shipments::render(frame, area, state, theme);

    match &state.overlay {
        Overlay::None => {}
        Overlay::Form(form) => components::form_modal::render(frame, area, form, theme),
        Overlay::Filters(editor) => components::filter_panel::render(frame, area, editor, theme),
        Overlay::ConfirmDelete { title } => components::confirm::render(frame, area, title, theme),
    }
}

fn render_splash(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let rect = components::centered_box(30, 1, area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Checking session…",
            Style::default().fg(theme.text_muted),
        ))
        .alignment(Alignment::Center),
        rect,
    );
}
