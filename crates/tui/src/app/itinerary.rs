use std::collections::HashSet;

use api_types::wishlist::WishlistItemDetail;

use super::{App, Section, ToastLevel};
use crate::{
    client::Backend,
    itinerary::{CardCollections, DURATION_OPTIONS, GuidedForm, fetch_cards},
    wishlist::{self, exclude_saved_elsewhere, filter_by_term},
};

/// Planning view for one wishlist.
#[derive(Debug, Default)]
pub struct ItineraryState {
    pub wishlist: Option<String>,
    pub form: GuidedForm,
    pub duration_cursor: usize,
    pub city_input: String,
    pub date_input: String,
    pub items: Vec<WishlistItemDetail>,
    /// Normalized names saved in the other wishlists.
    pub excluded: HashSet<String>,
    pub cards: Option<CardCollections>,
}

impl ItineraryState {
    pub fn set_city(&mut self, city: &str) {
        self.city_input = city.to_string();
        self.form.set_city(city);
    }

    pub fn move_duration(&mut self, down: bool) {
        self.duration_cursor = if down {
            (self.duration_cursor + 1).min(DURATION_OPTIONS.len() - 1)
        } else {
            self.duration_cursor.saturating_sub(1)
        };
    }

    /// Places of the wishlist not saved elsewhere, narrowed by the typed city.
    pub fn visible_items(&self) -> Vec<WishlistItemDetail> {
        let kept = exclude_saved_elsewhere(self.items.clone(), &self.excluded);
        filter_by_term(&kept, &self.city_input)
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<B: Backend> App<B> {
    pub(super) async fn plan_itinerary(&mut self, name: &str) {
        let names = match self.backend.wishlists().await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(%err, "listing wishlists failed");
                self.toast(ToastLevel::Error, "Failed to load wishlists. Please try again.");
                return;
            }
        };
        let reconciled = match wishlist::load_reconciled(&self.backend, name).await {
            Ok(reconciled) => reconciled,
            Err(err) => {
                tracing::warn!(wishlist = %name, %err, "loading wishlist failed");
                self.toast(ToastLevel::Error, format!("Failed to load \"{name}\"."));
                return;
            }
        };
        let excluded = wishlist::places_in_other_wishlists(&self.backend, name, &names).await;
        tracing::info!(
            wishlist = %name,
            places = reconciled.items.len(),
            excluded = excluded.len(),
            "planning itinerary"
        );

        self.state.itinerary = ItineraryState {
            wishlist: Some(name.to_string()),
            items: reconciled.items,
            excluded,
            ..ItineraryState::default()
        };
        self.state.wishlists.close();
        self.state.section = Section::Itinerary;
    }

    pub(super) async fn set_departure_date(&mut self, raw: &str) {
        let itinerary = &mut self.state.itinerary;
        itinerary.date_input = raw.to_string();
        itinerary.form.set_departure(raw);
        if itinerary.form.is_complete() {
            self.show_cards().await;
        }
    }

    pub(super) async fn show_cards(&mut self) {
        if !self.state.itinerary.form.is_complete() {
            self.state.itinerary.form.error = Some("Answer every question first.".to_string());
            return;
        }

        let cards = fetch_cards(&self.backend).await;
        let failed = cards.failed();
        if !failed.is_empty() {
            let labels: Vec<&str> = failed.iter().map(|kind| kind.label()).collect();
            self.toast(
                ToastLevel::Error,
                format!("Failed to load {}", labels.join(", ")),
            );
        }
        self.state.itinerary.cards = Some(cards);
    }
}
