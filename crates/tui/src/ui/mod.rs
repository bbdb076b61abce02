pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // info bar
            Constraint::Length(2), // tabs
            Constraint::Min(0),    // content
            Constraint::Length(1), // key hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Search => screens::search::render(frame, layout[2], state),
        Section::Wishlists => screens::wishlists::render(frame, layout[2], state),
        Section::Itinerary => screens::itinerary::render(frame, layout[2], state),
    }
    if state.section != Section::Wishlists {
        screens::wishlists::render_overlay(frame, layout[2], state);
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::confirm::render(frame, area, state.confirm.as_ref());
    components::help_overlay::render(frame, area, state);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![
        Span::styled(
            "Triply",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("API", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
    ];
    if let Some(last) = state.local.last_wishlist.as_deref() {
        spans.push(Span::styled("Last wishlist", Style::default().fg(theme.text_muted)));
        spans.push(Span::raw(format!(": {last}  ")));
    }
    if let Some(busy) = state.busy {
        spans.push(Span::styled(busy, Style::default().fg(theme.warning)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let hints = components::hints::context_hints(state);
    if !hints.is_empty() {
        parts.push(components::hints::hint_separator(theme));
        parts.extend(components::hints::hints_to_spans(&hints, theme));
    }

    parts.push(components::hints::hint_separator(theme));
    parts.push(Span::styled("?", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" help  "));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
