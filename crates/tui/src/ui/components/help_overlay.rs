use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, Section},
    ui::{
        components::{card::Card, centered_rect, hints::KeyHint},
        theme::Theme,
    },
};

const GLOBAL: &[KeyHint] = &[
    KeyHint::new("Tab", "next section"),
    KeyHint::new("?", "help"),
    KeyHint::new("Esc", "close / back"),
    KeyHint::new("q", "quit (outside text fields)"),
    KeyHint::new("Ctrl+C", "quit"),
];

const SEARCH: &[KeyHint] = &[
    KeyHint::new("/", "edit path or URL"),
    KeyHint::new("Enter", "run search"),
    KeyHint::new("↑↓", "recent searches"),
    KeyHint::new("a", "add result to a wishlist"),
    KeyHint::new("r", "register an unknown image"),
];

const WISHLISTS: &[KeyHint] = &[
    KeyHint::new("Enter", "open / add here"),
    KeyHint::new("n", "new wishlist"),
    KeyHint::new("d", "delete wishlist"),
    KeyHint::new("x", "remove place (detail)"),
    KeyHint::new("i", "plan itinerary (detail)"),
    KeyHint::new("b", "back to list (detail)"),
];

const ITINERARY: &[KeyHint] = &[
    KeyHint::new("↑↓", "pick a duration"),
    KeyHint::new("1-6", "duration shortcut"),
    KeyHint::new("Enter", "next / done"),
    KeyHint::new("Esc", "previous question"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if !state.help {
        return;
    }

    let theme = Theme::default();
    let popup = centered_rect(60, 70, area);
    let section = match state.section {
        Section::Search => ("Search", SEARCH),
        Section::Wishlists => ("Wishlists", WISHLISTS),
        Section::Itinerary => ("Itinerary", ITINERARY),
    };

    let mut lines = group("Global", GLOBAL, &theme);
    lines.push(Line::from(""));
    lines.extend(group(section.0, section.1, &theme));
    if state.section != Section::Wishlists {
        lines.push(Line::from(""));
        lines.extend(group("Wishlists", WISHLISTS, &theme));
    }

    frame.render_widget(Clear, popup);
    Card::new("Help  (Esc to close)", &theme)
        .focused(true)
        .render_with(frame, popup, Paragraph::new(lines));
}

fn group(title: &'static str, hints: &[KeyHint], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.extend(hints.iter().map(|hint| {
        Line::from(vec![
            Span::styled(format!("  {:<8}", hint.key), Style::default().fg(theme.accent)),
            Span::styled(hint.action, Style::default().fg(theme.text_muted)),
        ])
    }));
    lines
}
