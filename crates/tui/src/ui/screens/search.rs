use api_types::image::RecognitionStatus;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(5),
        ])
        .split(area);

    render_input(frame, layout[0], state, &theme);
    render_result(frame, layout[1], state, &theme);
    render_recent(frame, layout[2], state, &theme);
}

fn render_input(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let search = &state.search;
    let (label, value, focused) = match search.register_input.as_deref() {
        Some(place) => ("Place name", place, true),
        None => ("Image path or URL", search.input.as_str(), search.editing),
    };
    let cursor = if focused { "▏" } else { "" };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(theme.text_muted)),
        Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text)),
    ])];
    if let Some(message) = search.message.as_deref() {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.warning),
        )));
    }

    let title = if search.register_input.is_some() {
        "Register image"
    } else {
        "Find a place"
    };
    Card::new(title, theme)
        .focused(focused)
        .render_with(frame, area, Paragraph::new(lines));
}

fn render_result(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let search = &state.search;
    let Some(result) = search.result.as_ref() else {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Type an image file path or an http(s) URL and press Enter.",
            Style::default().fg(theme.dim),
        )));
        Card::new("Result", theme).render_with(frame, area, hint);
        return;
    };

    let mut lines = Vec::new();
    match result.status {
        RecognitionStatus::Found => {
            lines.push(Line::from(vec![
                Span::styled("Place  ", Style::default().fg(theme.text_muted)),
                Span::styled(
                    result.place_name.clone().unwrap_or_else(|| "?".to_string()),
                    Style::default()
                        .fg(theme.positive)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            if let Some(url) = result.url.as_deref() {
                lines.push(field_line("Source ", url, theme));
            }
            match search.image.as_ref() {
                Some(image) => {
                    let size = image
                        .byte_len()
                        .map(|len| format!(", {len} bytes"))
                        .unwrap_or_default();
                    lines.push(field_line(
                        "Image  ",
                        &format!("{} from {}{size}", image.mime, image.source.label()),
                        theme,
                    ));
                }
                None => lines.push(field_line("Image  ", "none available", theme)),
            }
            if let Some(description) = result.description.as_deref() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    description.to_string(),
                    Style::default().fg(theme.text),
                )));
            }
        }
        RecognitionStatus::NotFound => {
            lines.push(Line::from(Span::styled(
                result
                    .message
                    .clone()
                    .unwrap_or_else(|| "No matching place found.".to_string()),
                Style::default().fg(theme.warning),
            )));
            if search.can_register() {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::raw("Press "),
                    Span::styled("r", Style::default().fg(theme.accent)),
                    Span::raw(" to register this image under a place name."),
                ]));
            }
        }
    }

    Card::new("Result", theme).render_with(
        frame,
        area,
        Paragraph::new(lines).wrap(Wrap { trim: false }),
    );
}

fn render_recent(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lines: Vec<Line<'_>> = state
        .local
        .recent_searches
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| Line::from(Span::styled(entry.as_str(), Style::default().fg(theme.dim))))
        .collect();
    Card::new("Recent", theme).render_with(frame, area, Paragraph::new(lines));
}

fn field_line(label: &'static str, value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(theme.text_muted)),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ])
}
