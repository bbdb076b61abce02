use ratatui::{style::Style, text::Span};

use crate::{
    app::{AppState, PickerPurpose, Section, WishlistDialog},
    itinerary::Step,
    ui::theme::Theme,
};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }
    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hints for whatever currently has the keyboard.
pub fn context_hints(state: &AppState) -> Vec<KeyHint> {
    if state.confirm.is_some() {
        return vec![KeyHint::new("y", "confirm"), KeyHint::new("n", "cancel")];
    }
    if state.wishlists.new_name.is_some() {
        return vec![KeyHint::new("Enter", "create"), KeyHint::new("Esc", "cancel")];
    }
    if state.wishlists.is_open() {
        return wishlist_hints(state);
    }

    match state.section {
        Section::Search => {
            let search = &state.search;
            if search.register_input.is_some() {
                vec![KeyHint::new("Enter", "register"), KeyHint::new("Esc", "cancel")]
            } else if search.editing {
                vec![
                    KeyHint::new("Enter", "search"),
                    KeyHint::new("↑↓", "recent"),
                    KeyHint::new("Esc", "done"),
                ]
            } else {
                let mut hints = vec![KeyHint::new("/", "edit")];
                if search.found_place().is_some() {
                    hints.push(KeyHint::new("a", "add to wishlist"));
                }
                if search.can_register() {
                    hints.push(KeyHint::new("r", "register"));
                }
                hints
            }
        }
        Section::Wishlists => vec![KeyHint::new("Enter", "reload")],
        Section::Itinerary => {
            if state.itinerary.wishlist.is_none() {
                return Vec::new();
            }
            match state.itinerary.form.step {
                Step::Duration => vec![
                    KeyHint::new("↑↓", "select"),
                    KeyHint::new("Enter", "choose"),
                    KeyHint::new("1-6", "pick"),
                ],
                Step::City => vec![KeyHint::new("Enter", "next"), KeyHint::new("Esc", "back")],
                Step::Date => vec![KeyHint::new("Enter", "done"), KeyHint::new("Esc", "back")],
            }
        }
    }
}

fn wishlist_hints(state: &AppState) -> Vec<KeyHint> {
    match state.wishlists.dialog {
        WishlistDialog::Detail => vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("x", "remove"),
            KeyHint::new("d", "delete"),
            KeyHint::new("i", "itinerary"),
            KeyHint::new("b", "back"),
        ],
        _ => {
            let enter = match state.wishlists.purpose {
                PickerPurpose::AddPlace(_) => "add here",
                PickerPurpose::Browse => "open",
            };
            vec![
                KeyHint::new("↑↓", "select"),
                KeyHint::new("Enter", enter),
                KeyHint::new("n", "new"),
                KeyHint::new("d", "delete"),
                KeyHint::new("Esc", "close"),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::ConfirmAction, local_state::LocalState};

    #[test]
    fn confirm_hints_take_priority() {
        let mut state = AppState::new("http://localhost/api/", LocalState::default());
        state.confirm = Some(ConfirmAction::DeleteWishlist("Asia".to_string()));
        assert_eq!(context_hints(&state)[0], KeyHint::new("y", "confirm"));
    }

    #[test]
    fn search_hints_follow_editing_mode() {
        let mut state = AppState::new("http://localhost/api/", LocalState::default());
        assert_eq!(context_hints(&state)[0], KeyHint::new("Enter", "search"));
        state.search.editing = false;
        assert_eq!(context_hints(&state), vec![KeyHint::new("/", "edit")]);
    }
}
