use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::{
    app::ConfirmAction,
    ui::{
        components::{card::Card, centered_fixed},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, confirm: Option<&ConfirmAction>) {
    let Some(confirm) = confirm else {
        return;
    };
    let theme = Theme::default();
    let popup = centered_fixed(56, 7, area);

    let lines = vec![
        Line::from(Span::styled(confirm.prompt(), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.error)),
            Span::raw(" confirm    "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" cancel"),
        ]),
    ];

    frame.render_widget(Clear, popup);
    Card::new("Confirm", &theme).focused(true).render_with(
        frame,
        popup,
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
    );
}
