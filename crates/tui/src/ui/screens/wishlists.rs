use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
    app::{AppState, PickerPurpose, WishlistDialog},
    ui::{
        components::{card::Card, centered_rect},
        theme::Theme,
    },
};

/// Full-height view used by the Wishlists section.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    if !state.wishlists.is_open() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Press Enter to load your wishlists.",
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Center);
        Card::new("Wishlists", &theme).render_with(frame, area, msg);
        return;
    }
    render_dialog(frame, area, state, &theme);
}

/// Picker shown on top of another section.
pub fn render_overlay(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if !state.wishlists.is_open() {
        return;
    }
    let theme = Theme::default();
    let popup = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup);
    render_dialog(frame, popup, state, &theme);
}

fn render_dialog(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    match state.wishlists.dialog {
        WishlistDialog::Detail => render_detail(frame, area, state, theme),
        _ => render_list(frame, area, state, theme),
    }
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let wishlists = &state.wishlists;
    let (list_area, form_area) = if wishlists.new_name.is_some() {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);
        (layout[0], Some(layout[1]))
    } else {
        (area, None)
    };

    let title = match &wishlists.purpose {
        PickerPurpose::AddPlace(place) => format!("Add \"{}\" to...", place.place_name),
        PickerPurpose::Browse => "Wishlists".to_string(),
    };
    let card = Card::new(&title, theme).focused(wishlists.new_name.is_none());

    if wishlists.names.is_empty() {
        let msg = Paragraph::new(Line::from(vec![
            Span::styled("No wishlists yet. Press ", Style::default().fg(theme.dim)),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::styled(" to create one.", Style::default().fg(theme.dim)),
        ]))
        .alignment(Alignment::Center);
        card.render_with(frame, list_area, msg);
    } else {
        let items: Vec<ListItem<'_>> = wishlists
            .names
            .iter()
            .map(|name| {
                let count = wishlists
                    .places
                    .get(name)
                    .map(|places| format!("  ({})", places.len()))
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(name.as_str(), Style::default().fg(theme.text)),
                    Span::styled(count, Style::default().fg(theme.dim)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(card.block())
            .highlight_style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("› ");
        let mut list_state = ListState::default().with_selected(Some(wishlists.selected));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    if let (Some(form_area), Some(name)) = (form_area, wishlists.new_name.as_deref()) {
        let line = Line::from(vec![
            Span::styled("Name: ", Style::default().fg(theme.text_muted)),
            Span::styled(format!("{name}▏"), Style::default().fg(theme.text)),
        ]);
        Card::new("New wishlist", theme)
            .focused(true)
            .render_with(frame, form_area, Paragraph::new(line));
    }
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(detail) = state.wishlists.detail.as_ref() else {
        return;
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let title = format!("{} ({} places)", detail.name, detail.items.len());
    let card = Card::new(&title, theme).focused(true);
    if detail.items.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "This wishlist is empty.",
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Center);
        card.render_with(frame, columns[0], msg);
    } else {
        let items: Vec<ListItem<'_>> = detail
            .items
            .iter()
            .map(|item| ListItem::new(item.place_name.as_str()))
            .collect();
        let list = List::new(items)
            .block(card.block())
            .highlight_style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("› ");
        let mut list_state = ListState::default().with_selected(Some(detail.selected));
        frame.render_stateful_widget(list, columns[0], &mut list_state);
    }

    let mut lines = Vec::new();
    if let Some(item) = detail.selected_item() {
        lines.push(Line::from(Span::styled(
            item.place_name.clone(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )));
        if let Some(url) = item.image_url.as_deref() {
            lines.push(Line::from(Span::styled(
                url.to_string(),
                Style::default().fg(theme.dim),
            )));
        }
        let image = match (item.image_type.as_deref(), item.image_base64.as_ref()) {
            (Some(mime), Some(_)) => format!("Image: {mime}"),
            (None, Some(_)) => "Image: stored".to_string(),
            _ => "Image: none".to_string(),
        };
        lines.push(Line::from(Span::styled(image, Style::default().fg(theme.text_muted))));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            item.description
                .clone()
                .unwrap_or_else(|| "No description.".to_string()),
            Style::default().fg(theme.text),
        )));
    }
    Card::new("Details", theme).render_with(
        frame,
        columns[1],
        Paragraph::new(lines).wrap(Wrap { trim: true }),
    );
}
