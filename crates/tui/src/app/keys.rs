use crossterm::event::KeyEvent;

use super::{Action, App, PickerPurpose, Section, WishlistDialog};
use crate::{
    client::Backend,
    itinerary::{DURATION_OPTIONS, Step},
    ui::keymap::{KeyInput, map_key},
};

/// Edits `field` in place; returns true when the key was consumed.
fn edit(field: &mut String, input: KeyInput) -> bool {
    match input {
        KeyInput::Char(ch) => {
            field.push(ch);
            true
        }
        KeyInput::Backspace => {
            field.pop();
            true
        }
        _ => false,
    }
}

impl<B: Backend> App<B> {
    /// Maps a key press to an action, editing text fields directly.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let input = map_key(key);
        if input == KeyInput::ForceQuit {
            self.should_quit = true;
            return None;
        }
        if self.state.help {
            if matches!(input, KeyInput::Cancel | KeyInput::Char('?')) {
                self.state.help = false;
            }
            return None;
        }
        if self.state.confirm.is_some() {
            return match input {
                KeyInput::Char('y' | 'Y') | KeyInput::Submit => Some(Action::Confirm),
                KeyInput::Char('n' | 'N') | KeyInput::Cancel => Some(Action::CancelConfirm),
                _ => None,
            };
        }
        if let Some(action) = self.text_entry_key(input) {
            return action;
        }

        match input {
            KeyInput::NextSection => return Some(Action::SwitchSection(self.state.section.next())),
            KeyInput::Char('q') => {
                self.should_quit = true;
                return None;
            }
            KeyInput::Char('?') => {
                self.state.help = true;
                return None;
            }
            _ => {}
        }

        if self.state.wishlists.is_open() {
            return self.wishlist_key(input);
        }
        match self.state.section {
            Section::Search => self.search_key(input),
            Section::Wishlists => match input {
                KeyInput::Submit | KeyInput::Char('r') => Some(Action::OpenWishlists),
                _ => None,
            },
            Section::Itinerary => self.itinerary_key(input),
        }
    }

    /// Keys for whichever text field has focus.
    ///
    /// `None` means no field is focused; `Some(None)` means the key was
    /// consumed without producing an action.
    fn text_entry_key(&mut self, input: KeyInput) -> Option<Option<Action>> {
        if let Some(name) = self.state.wishlists.new_name.as_mut() {
            return Some(match input {
                KeyInput::Submit => Some(Action::CreateWishlist(name.clone())),
                KeyInput::Cancel => {
                    self.state.wishlists.new_name = None;
                    None
                }
                other => {
                    edit(name, other);
                    None
                }
            });
        }
        if self.state.wishlists.is_open() {
            return None;
        }

        match self.state.section {
            Section::Search => {
                let search = &mut self.state.search;
                if let Some(place) = search.register_input.as_mut() {
                    return Some(match input {
                        KeyInput::Submit => Some(Action::RegisterImage(place.clone())),
                        KeyInput::Cancel => {
                            search.register_input = None;
                            None
                        }
                        other => {
                            edit(place, other);
                            None
                        }
                    });
                }
                if !search.editing {
                    return None;
                }
                Some(match input {
                    KeyInput::Submit => Some(Action::Search(search.input.clone())),
                    KeyInput::Cancel => {
                        search.editing = false;
                        None
                    }
                    KeyInput::Up | KeyInput::Down => {
                        search.recall(&self.state.local.recent_searches, input == KeyInput::Up);
                        None
                    }
                    KeyInput::NextSection => Some(Action::SwitchSection(Section::Wishlists)),
                    other => {
                        if edit(&mut search.input, other) {
                            search.message = None;
                            search.history_cursor = None;
                        }
                        None
                    }
                })
            }
            Section::Itinerary if self.state.itinerary.wishlist.is_some() => {
                let itinerary = &mut self.state.itinerary;
                let field = match itinerary.form.step {
                    Step::Duration => return None,
                    Step::City => &mut itinerary.city_input,
                    Step::Date => &mut itinerary.date_input,
                };
                Some(match input {
                    KeyInput::Submit => Some(match itinerary.form.step {
                        Step::City => Action::SetCity(field.clone()),
                        _ => Action::SetDepartureDate(field.clone()),
                    }),
                    KeyInput::Cancel => Some(Action::StepBack),
                    KeyInput::NextSection => Some(Action::SwitchSection(Section::Search)),
                    other => {
                        edit(field, other);
                        None
                    }
                })
            }
            _ => None,
        }
    }

    fn wishlist_key(&mut self, input: KeyInput) -> Option<Action> {
        let wishlists = &mut self.state.wishlists;
        if wishlists.dialog == WishlistDialog::Detail {
            let detail = wishlists.detail.as_ref()?;
            return match input {
                KeyInput::Up => {
                    wishlists.select_prev();
                    None
                }
                KeyInput::Down => {
                    wishlists.select_next();
                    None
                }
                KeyInput::Char('x') => detail.selected_item().map(|item| Action::RequestRemovePlace {
                    wishlist: detail.name.clone(),
                    place: item.place_name.clone(),
                }),
                KeyInput::Char('d') => Some(Action::RequestDeleteWishlist(detail.name.clone())),
                KeyInput::Char('i') => Some(Action::PlanItinerary(detail.name.clone())),
                KeyInput::Char('b') | KeyInput::Cancel => Some(Action::BackToList),
                _ => None,
            };
        }

        match input {
            KeyInput::Up => {
                wishlists.select_prev();
                None
            }
            KeyInput::Down => {
                wishlists.select_next();
                None
            }
            KeyInput::Submit => {
                let name = wishlists.selected_name()?.to_string();
                Some(match wishlists.purpose {
                    PickerPurpose::AddPlace(_) => Action::PickWishlist(name),
                    PickerPurpose::Browse => Action::OpenWishlistDetail(name),
                })
            }
            KeyInput::Char('n') => {
                wishlists.new_name = Some(String::new());
                None
            }
            KeyInput::Char('d') => wishlists
                .selected_name()
                .map(|name| Action::RequestDeleteWishlist(name.to_string())),
            KeyInput::Cancel => Some(Action::CloseWishlists),
            _ => None,
        }
    }

    fn search_key(&mut self, input: KeyInput) -> Option<Action> {
        let search = &mut self.state.search;
        match input {
            KeyInput::Char('a') => Some(Action::OpenPicker),
            KeyInput::Char('r') if search.can_register() => {
                search.register_input = Some(String::new());
                None
            }
            KeyInput::Char('/') | KeyInput::Char('e') | KeyInput::Submit => {
                search.editing = true;
                None
            }
            _ => None,
        }
    }

    fn itinerary_key(&mut self, input: KeyInput) -> Option<Action> {
        let itinerary = &mut self.state.itinerary;
        itinerary.wishlist.as_ref()?;
        match (itinerary.form.step, input) {
            (Step::Duration, KeyInput::Up) => {
                itinerary.move_duration(false);
                None
            }
            (Step::Duration, KeyInput::Down) => {
                itinerary.move_duration(true);
                None
            }
            (Step::Duration, KeyInput::Submit) => {
                Some(Action::ChooseDuration(itinerary.duration_cursor))
            }
            (Step::Duration, KeyInput::Char(ch)) => ch
                .to_digit(10)
                .map(|digit| digit as usize)
                .filter(|digit| (1..=DURATION_OPTIONS.len()).contains(digit))
                .map(|digit| Action::ChooseDuration(digit - 1)),
            _ => None,
        }
    }
}
