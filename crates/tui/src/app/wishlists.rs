use std::collections::HashMap;

use api_types::wishlist::{PlaceNew, WishlistItemDetail};

use super::{App, ItineraryState, Section, ToastLevel, message_for_error};
use crate::{
    client::{Backend, ClientError},
    wishlist::{self, contains_place, same_place},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistDialog {
    Closed,
    List,
    Detail,
}

/// Why the wishlist list is open.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerPurpose {
    Browse,
    AddPlace(PlaceNew),
}

/// Destructive actions waiting for a yes/no.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    DeleteWishlist(String),
    RemovePlace { wishlist: String, place: String },
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            Self::DeleteWishlist(name) => {
                format!("Delete wishlist \"{name}\"? This cannot be undone.")
            }
            Self::RemovePlace { wishlist, place } => {
                format!("Remove \"{place}\" from \"{wishlist}\"?")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    pub name: String,
    pub items: Vec<WishlistItemDetail>,
    pub places: Vec<String>,
    pub selected: usize,
}

impl DetailState {
    pub fn selected_item(&self) -> Option<&WishlistItemDetail> {
        self.items.get(self.selected)
    }
}

/// Cached copy of the backend wishlists, valid while the dialog is open.
#[derive(Debug)]
pub struct WishlistsState {
    pub dialog: WishlistDialog,
    pub purpose: PickerPurpose,
    pub names: Vec<String>,
    pub places: HashMap<String, Vec<String>>,
    pub selected: usize,
    /// Name being typed for a new wishlist.
    pub new_name: Option<String>,
    pub detail: Option<DetailState>,
}

impl Default for WishlistsState {
    fn default() -> Self {
        Self {
            dialog: WishlistDialog::Closed,
            purpose: PickerPurpose::Browse,
            names: Vec::new(),
            places: HashMap::new(),
            selected: 0,
            new_name: None,
            detail: None,
        }
    }
}

impl WishlistsState {
    pub fn is_open(&self) -> bool {
        self.dialog != WishlistDialog::Closed
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.names.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        match (&mut self.detail, self.dialog) {
            (Some(detail), WishlistDialog::Detail) => {
                if !detail.items.is_empty() {
                    detail.selected = (detail.selected + 1).min(detail.items.len() - 1);
                }
            }
            _ => {
                if !self.names.is_empty() {
                    self.selected = (self.selected + 1).min(self.names.len() - 1);
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match (&mut self.detail, self.dialog) {
            (Some(detail), WishlistDialog::Detail) => {
                detail.selected = detail.selected.saturating_sub(1);
            }
            _ => self.selected = self.selected.saturating_sub(1),
        }
    }

    pub fn back_to_list(&mut self) {
        if self.dialog == WishlistDialog::Detail {
            self.dialog = WishlistDialog::List;
            self.detail = None;
        }
    }

    pub fn close(&mut self) {
        self.dialog = WishlistDialog::Closed;
        self.purpose = PickerPurpose::Browse;
        self.detail = None;
        self.new_name = None;
    }

    /// Places of `wishlist` as last seen, detail view first.
    fn known_places(&self, wishlist: &str) -> Option<&Vec<String>> {
        self.detail
            .as_ref()
            .filter(|detail| detail.name == wishlist)
            .map(|detail| &detail.places)
            .or_else(|| self.places.get(wishlist))
    }

    fn forget_place(&mut self, wishlist: &str, place: &str) {
        if let Some(places) = self.places.get_mut(wishlist) {
            places.retain(|existing| !same_place(existing, place));
        }
        if let Some(detail) = self.detail.as_mut().filter(|d| d.name == wishlist) {
            detail.places.retain(|existing| !same_place(existing, place));
            detail.items.retain(|item| !same_place(&item.place_name, place));
            detail.selected = detail.selected.min(detail.items.len().saturating_sub(1));
        }
    }

    fn forget_wishlist(&mut self, name: &str) {
        self.names.retain(|existing| existing != name);
        self.places.remove(name);
        self.selected = self.selected.min(self.names.len().saturating_sub(1));
        if self.detail.as_ref().is_some_and(|d| d.name == name) {
            self.detail = None;
            self.dialog = WishlistDialog::List;
        }
    }
}

impl<B: Backend> App<B> {
    pub(super) async fn switch_section(&mut self, section: Section) {
        if section == self.state.section {
            return;
        }
        if section == Section::Wishlists {
            self.open_wishlists(PickerPurpose::Browse).await;
            return;
        }
        self.state.wishlists.close();
        self.state.section = section;
    }

    /// Loads every wishlist name, then each list's places.
    ///
    /// Place lists that fail to load are fetched again on demand.
    pub(super) async fn open_wishlists(&mut self, purpose: PickerPurpose) {
        let names = match self.backend.wishlists().await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(%err, "listing wishlists failed");
                self.toast(ToastLevel::Error, "Failed to load wishlists. Please try again.");
                return;
            }
        };

        let mut places = HashMap::new();
        for name in &names {
            match self.backend.wishlist_places(name).await {
                Ok(list) => {
                    places.insert(name.clone(), list);
                }
                Err(err) => tracing::debug!(wishlist = %name, %err, "place list unavailable"),
            }
        }

        let wishlists = &mut self.state.wishlists;
        wishlists.selected = self.state.local.preferred_index(&names).unwrap_or(0);
        wishlists.names = names;
        wishlists.places = places;
        wishlists.detail = None;
        wishlists.new_name = None;
        wishlists.dialog = WishlistDialog::List;
        if purpose == PickerPurpose::Browse {
            self.state.section = Section::Wishlists;
        }
        wishlists.purpose = purpose;
    }

    pub(super) async fn open_picker(&mut self) {
        let search = &self.state.search;
        let place = search.result.as_ref().and_then(|result| {
            let place_name = result.place_name.clone().filter(|_| result.is_found())?;
            Some(PlaceNew {
                place_name,
                image_url: result.url.clone(),
                description: result.description.clone(),
                image_base64: search.image.as_ref().map(|img| img.base64.clone()),
                image_type: search.image.as_ref().map(|img| img.mime.clone()),
            })
        });

        match place {
            Some(place) => self.open_wishlists(PickerPurpose::AddPlace(place)).await,
            None => self.toast(ToastLevel::Info, "Search for a place first."),
        }
    }

    pub(super) async fn pick_wishlist(&mut self, name: &str) {
        let PickerPurpose::AddPlace(place) = self.state.wishlists.purpose.clone() else {
            self.open_wishlist_detail(name).await;
            return;
        };

        let places = match self.state.wishlists.places.get(name) {
            Some(places) => places.clone(),
            None => match self.backend.wishlist_places(name).await {
                Ok(places) => places,
                Err(err) => {
                    tracing::warn!(wishlist = %name, %err, "place list unavailable");
                    self.toast(ToastLevel::Error, format!("Failed to load \"{name}\"."));
                    return;
                }
            },
        };

        if contains_place(&places, &place.place_name) {
            self.state.wishlists.places.insert(name.to_string(), places);
            self.toast(
                ToastLevel::Error,
                format!("\"{}\" is already in \"{name}\".", place.place_name),
            );
            return;
        }

        match self.backend.add_place(name, &place).await {
            Ok(()) => {
                tracing::info!(wishlist = %name, place = %place.place_name, "place added");
                let mut places = places;
                places.push(place.place_name.clone());
                self.state.wishlists.places.insert(name.to_string(), places);
                self.state.wishlists.close();
                self.state.local.remember_wishlist(name);
                self.save_local_state();
                self.toast(
                    ToastLevel::Success,
                    format!("Added \"{}\" to \"{name}\".", place.place_name),
                );
            }
            Err(err) => {
                tracing::warn!(wishlist = %name, %err, "adding place failed");
                let message = format!("Failed to add place: {}", message_for_error(&err));
                self.toast(ToastLevel::Error, message);
            }
        }
    }

    pub(super) async fn open_wishlist_detail(&mut self, name: &str) {
        match wishlist::load_reconciled(&self.backend, name).await {
            Ok(reconciled) => {
                let wishlists = &mut self.state.wishlists;
                wishlists
                    .places
                    .insert(name.to_string(), reconciled.places.clone());
                wishlists.detail = Some(DetailState {
                    name: name.to_string(),
                    items: reconciled.items,
                    places: reconciled.places,
                    selected: 0,
                });
                wishlists.dialog = WishlistDialog::Detail;
            }
            Err(err) => {
                tracing::warn!(wishlist = %name, %err, "loading wishlist failed");
                self.toast(ToastLevel::Error, format!("Failed to load \"{name}\"."));
            }
        }
    }

    pub(super) async fn create_wishlist(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.toast(ToastLevel::Info, "Enter a wishlist name.");
            return;
        }
        if self.state.wishlists.names.iter().any(|existing| existing == name) {
            self.toast(
                ToastLevel::Error,
                format!("A wishlist named \"{name}\" already exists."),
            );
            return;
        }

        if let Err(err) = self.backend.create_wishlist(name).await {
            tracing::warn!(wishlist = %name, %err, "creating wishlist failed");
            let message = format!("Failed to create wishlist: {}", message_for_error(&err));
            self.toast(ToastLevel::Error, message);
            return;
        }
        tracing::info!(wishlist = %name, "wishlist created");

        let names = match self.backend.wishlists().await {
            Ok(names) => names,
            Err(err) => {
                tracing::debug!(%err, "refreshing wishlists failed, keeping cache");
                self.state.wishlists.names.clone()
            }
        };

        let wishlists = &mut self.state.wishlists;
        wishlists.names = names;
        if !wishlists.names.iter().any(|existing| existing == name) {
            wishlists.names.push(name.to_string());
        }
        wishlists.places.insert(name.to_string(), Vec::new());
        wishlists.selected = wishlists
            .names
            .iter()
            .position(|existing| existing == name)
            .unwrap_or(0);
        wishlists.new_name = None;
        self.toast(ToastLevel::Success, format!("Created wishlist \"{name}\"."));
    }

    pub(super) async fn confirm(&mut self) {
        let Some(action) = self.state.confirm.take() else {
            return;
        };
        match action {
            ConfirmAction::DeleteWishlist(name) => self.delete_wishlist(&name).await,
            ConfirmAction::RemovePlace { wishlist, place } => {
                self.remove_place(&wishlist, &place).await;
            }
        }
    }

    async fn delete_wishlist(&mut self, name: &str) {
        match self.backend.delete_wishlist(name).await {
            Ok(()) | Err(ClientError::NotFound) => {
                tracing::info!(wishlist = %name, "wishlist deleted");
                self.state.wishlists.forget_wishlist(name);
                self.state.local.forget_wishlist(name);
                self.save_local_state();
                if self.state.itinerary.wishlist.as_deref() == Some(name) {
                    self.state.itinerary = ItineraryState::default();
                }
                self.toast(ToastLevel::Success, format!("Deleted wishlist \"{name}\"."));
            }
            Err(err) => {
                tracing::warn!(wishlist = %name, %err, "deleting wishlist failed");
                self.toast(ToastLevel::Error, "Failed to delete wishlist. Please try again.");
            }
        }
    }

    async fn remove_place(&mut self, wishlist: &str, place: &str) {
        let known = self.state.wishlists.known_places(wishlist);
        if known.is_some_and(|places| !contains_place(places, place)) {
            tracing::debug!(%wishlist, %place, "place already absent");
            return;
        }

        match self.backend.remove_place(wishlist, place).await {
            Ok(()) | Err(ClientError::NotFound) => {
                tracing::info!(%wishlist, %place, "place removed");
                self.state.wishlists.forget_place(wishlist, place);
                self.toast(
                    ToastLevel::Success,
                    format!("Removed \"{place}\" from \"{wishlist}\""),
                );
            }
            Err(err) => {
                tracing::warn!(%wishlist, %place, %err, "removing place failed");
                self.toast(
                    ToastLevel::Error,
                    format!("Failed to remove \"{place}\" from \"{wishlist}\""),
                );
            }
        }
    }
}
