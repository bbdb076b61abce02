use api_types::card::{CardKind, RecommendationCard};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{AppState, ItineraryState},
    itinerary::{CardPanel, DURATION_OPTIONS, Step, city_suggestions},
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let itinerary = &state.itinerary;
    let Some(wishlist) = itinerary.wishlist.as_deref() else {
        let msg = Paragraph::new(Line::from(vec![
            Span::styled("Open a wishlist and press ", Style::default().fg(theme.dim)),
            Span::styled("i", Style::default().fg(theme.accent)),
            Span::styled(" to plan an itinerary.", Style::default().fg(theme.dim)),
        ]))
        .alignment(Alignment::Center);
        Card::new("Itinerary", &theme).render_with(frame, area, msg);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[0]);

    render_question(frame, top[0], itinerary, &theme);
    render_places(frame, top[1], wishlist, itinerary, &theme);

    match itinerary.cards.as_ref() {
        Some(cards) => {
            let panels = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3); 3])
                .split(layout[1]);
            for (kind, area) in CardKind::ALL.into_iter().zip(panels.iter()) {
                render_panel(frame, *area, kind, cards.panel(kind), &theme);
            }
        }
        None => {
            let msg = Paragraph::new(Line::from(Span::styled(
                "Answer the questions to see recommendations.",
                Style::default().fg(theme.dim),
            )))
            .alignment(Alignment::Center);
            Card::new("Recommendations", &theme).render_with(frame, layout[1], msg);
        }
    }
}

fn render_question(frame: &mut Frame<'_>, area: Rect, itinerary: &ItineraryState, theme: &Theme) {
    let form = &itinerary.form;
    let mut lines = vec![Line::from(Span::styled(
        form.step.question(),
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD),
    ))];

    match form.step {
        Step::Duration => {
            for (idx, option) in DURATION_OPTIONS.iter().enumerate() {
                let selected = idx == itinerary.duration_cursor;
                let marker = if selected { "› " } else { "  " };
                let style = if selected {
                    Style::default().fg(theme.accent)
                } else {
                    Style::default().fg(theme.text_muted)
                };
                lines.push(Line::from(Span::styled(
                    format!("{marker}{} {option}", idx + 1),
                    style,
                )));
            }
        }
        Step::City => {
            lines.push(input_line(&itinerary.city_input, theme));
            let suggestions = city_suggestions(&itinerary.city_input).join(", ");
            lines.push(Line::from(Span::styled(
                suggestions,
                Style::default().fg(theme.dim),
            )));
        }
        Step::Date => {
            lines.push(input_line(&itinerary.date_input, theme));
            lines.push(Line::from(Span::styled(
                "YYYY-MM-DD",
                Style::default().fg(theme.dim),
            )));
        }
    }

    if let Some(error) = form.error.as_deref() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    }

    let mut answers = Vec::new();
    if let Some(duration) = form.duration_label() {
        answers.push(duration.to_string());
    }
    if !form.city.is_empty() {
        answers.push(format!("from {}", form.city));
    }
    if let Some(date) = form.departure {
        answers.push(format!("on {date}"));
    }
    if !answers.is_empty() {
        lines.push(Line::from(Span::styled(
            answers.join(" · "),
            Style::default().fg(theme.positive),
        )));
    }

    let title = format!("Step {} of 3", form.step.number());
    Card::new(&title, theme)
        .focused(true)
        .render_with(frame, area, Paragraph::new(lines));
}

fn input_line(value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.accent)),
        Span::styled(format!("{value}▏"), Style::default().fg(theme.text)),
    ])
}

fn render_places(
    frame: &mut Frame<'_>,
    area: Rect,
    wishlist: &str,
    itinerary: &ItineraryState,
    theme: &Theme,
) {
    let visible = itinerary.visible_items();
    let lines: Vec<Line<'_>> = if visible.is_empty() {
        vec![Line::from(Span::styled(
            "No places match.",
            Style::default().fg(theme.dim),
        ))]
    } else {
        visible
            .into_iter()
            .map(|item| Line::from(format!("• {}", item.place_name)))
            .collect()
    };
    Card::new(wishlist, theme).render_with(frame, area, Paragraph::new(lines));
}

fn render_panel(frame: &mut Frame<'_>, area: Rect, kind: CardKind, panel: &CardPanel, theme: &Theme) {
    let lines = match panel {
        CardPanel::Failed(reason) => vec![
            empty_line(kind, theme),
            Line::from(Span::styled(reason.clone(), Style::default().fg(theme.error))),
        ],
        CardPanel::Loaded(cards) if cards.is_empty() => vec![empty_line(kind, theme)],
        CardPanel::Loaded(cards) => cards.iter().flat_map(|card| card_lines(card, theme)).collect(),
    };
    Card::new(kind.label(), theme).render_with(
        frame,
        area,
        Paragraph::new(lines).wrap(Wrap { trim: true }),
    );
}

fn empty_line(kind: CardKind, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        kind.empty_message(),
        Style::default().fg(theme.dim),
    ))
}

fn card_lines(card: &RecommendationCard, theme: &Theme) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        card.title.clone(),
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(days) = card.duration_days.as_deref() {
        title.push(Span::styled(
            format!("  {days}"),
            Style::default().fg(theme.accent),
        ));
    }
    if card.thumbnail_image.is_some() {
        title.push(Span::styled("  [img]", Style::default().fg(theme.dim)));
    }

    let mut lines = vec![Line::from(title)];
    if let Some(description) = card.short_description.as_deref() {
        lines.push(Line::from(Span::styled(
            description.to_string(),
            Style::default().fg(theme.text_muted),
        )));
    }
    lines.push(Line::from(""));
    lines
}
