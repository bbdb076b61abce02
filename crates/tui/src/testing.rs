//! In-memory backend used by unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use api_types::{
    card::{CardKind, RecommendationCard},
    image::{ImageByUrl, RecognitionResult, RecognitionStatus, StoredImage},
    wishlist::{PlaceNew, WishlistItemDetail},
};

use crate::{
    client::{Backend, ClientError, ImageUpload},
    image::data_url,
};

#[derive(Default)]
struct FakeState {
    wishlists: Vec<(String, Vec<PlaceNew>)>,
    stored: HashMap<String, ImageByUrl>,
    raw: HashMap<String, (String, Vec<u8>)>,
    recognitions: HashMap<String, RecognitionResult>,
    cards: HashMap<CardKind, Vec<RecommendationCard>>,
    failing: HashSet<String>,
    omitted_details: HashSet<String>,
    calls: Vec<String>,
}

/// Behaves like the real API for the happy paths and records every call.
#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_wishlists(wishlists: &[(&str, &[&str])]) -> Self {
        let backend = Self::default();
        for (name, places) in wishlists {
            backend.add_wishlist(name, places);
        }
        backend
    }

    pub fn add_wishlist(&self, name: &str, places: &[&str]) {
        let places = places
            .iter()
            .map(|place| PlaceNew {
                place_name: place.to_string(),
                ..PlaceNew::default()
            })
            .collect();
        self.inner
            .lock()
            .unwrap()
            .wishlists
            .push((name.to_string(), places));
    }

    pub fn add_stored_image(&self, url: &str, place: &str, mime: &str, base64: &str) {
        self.inner.lock().unwrap().stored.insert(
            url.to_string(),
            ImageByUrl {
                place_name: place.to_string(),
                description: Some(format!("{place} description")),
                file_type: mime.to_string(),
                size: 0,
                image_base64: base64.to_string(),
                icon_base64: None,
            },
        );
    }

    pub fn add_raw_image(&self, id: &str, mime: &str, bytes: &[u8]) {
        self.inner
            .lock()
            .unwrap()
            .raw
            .insert(id.to_string(), (mime.to_string(), bytes.to_vec()));
    }

    /// Makes `check_image` recognize uploads named `file_name` as `place`.
    pub fn recognize(&self, file_name: &str, place: &str) {
        self.inner.lock().unwrap().recognitions.insert(
            file_name.to_string(),
            found_result(place, &format!("img::{file_name}")),
        );
    }

    pub fn set_cards(&self, kind: CardKind, titles: &[&str]) {
        let cards = titles
            .iter()
            .map(|title| RecommendationCard {
                title: title.to_string(),
                ..RecommendationCard::default()
            })
            .collect();
        self.inner.lock().unwrap().cards.insert(kind, cards);
    }

    /// Every later call to `method` fails with a server error.
    pub fn fail(&self, method: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing
            .insert(method.to_string());
    }

    pub fn omit_from_details(&self, place: &str) {
        self.inner
            .lock()
            .unwrap()
            .omitted_details
            .insert(place.to_string());
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.as_str() == method)
            .count()
    }

    pub fn places(&self, wishlist: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .wishlists
            .iter()
            .find(|(name, _)| name == wishlist)
            .map(|(_, places)| places.iter().map(|p| p.place_name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn wishlist_names(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .wishlists
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn enter(&self, method: &str) -> Result<std::sync::MutexGuard<'_, FakeState>, ClientError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(method.to_string());
        if state.failing.contains(method) {
            return Err(ClientError::Server("injected failure".to_string()));
        }
        Ok(state)
    }
}

fn found_result(place: &str, image_id: &str) -> RecognitionResult {
    RecognitionResult {
        status: RecognitionStatus::Found,
        place_name: Some(place.to_string()),
        image_id: Some(image_id.to_string()),
        url: None,
        description: None,
        message: None,
        file_type: None,
        icon_base64: None,
    }
}

impl Backend for FakeBackend {
    async fn check_image(&self, upload: &ImageUpload) -> Result<RecognitionResult, ClientError> {
        let state = self.enter("check_image")?;
        Ok(state
            .recognitions
            .get(&upload.file_name)
            .cloned()
            .unwrap_or(RecognitionResult {
                status: RecognitionStatus::NotFound,
                place_name: None,
                image_id: None,
                url: None,
                description: None,
                message: Some("No matching image found in the database".to_string()),
                file_type: None,
                icon_base64: None,
            }))
    }

    async fn register_image(
        &self,
        upload: &ImageUpload,
        place_name: &str,
    ) -> Result<StoredImage, ClientError> {
        let mut state = self.enter("register_image")?;
        let id = format!("img::{}", upload.file_name);
        state
            .recognitions
            .insert(upload.file_name.clone(), found_result(place_name, &id));
        Ok(StoredImage {
            id: Some(id),
            file_name: Some(upload.file_name.clone()),
            file_type: Some(upload.mime.clone()),
            size: upload.bytes.len() as u64,
            place_name: Some(place_name.to_string()),
            url: None,
        })
    }

    async fn image_by_url(&self, url: &str) -> Result<ImageByUrl, ClientError> {
        let state = self.enter("image_by_url")?;
        state.stored.get(url).cloned().ok_or(ClientError::NotFound)
    }

    async fn image_data_url(&self, id: &str) -> Result<String, ClientError> {
        let state = self.enter("image_data_url")?;
        state
            .raw
            .get(id)
            .map(|(mime, bytes)| data_url(mime, bytes))
            .ok_or(ClientError::NotFound)
    }

    async fn create_wishlist(&self, name: &str) -> Result<(), ClientError> {
        let mut state = self.enter("create_wishlist")?;
        if state.wishlists.iter().any(|(existing, _)| existing == name) {
            return Err(ClientError::Conflict(
                "Wishlist with this name already exists".to_string(),
            ));
        }
        state.wishlists.push((name.to_string(), Vec::new()));
        Ok(())
    }

    async fn wishlists(&self) -> Result<Vec<String>, ClientError> {
        let state = self.enter("wishlists")?;
        Ok(state.wishlists.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn wishlist_places(&self, name: &str) -> Result<Vec<String>, ClientError> {
        let state = self.enter("wishlist_places")?;
        state
            .wishlists
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, places)| places.iter().map(|p| p.place_name.clone()).collect())
            .ok_or(ClientError::NotFound)
    }

    async fn wishlist_details(&self, name: &str) -> Result<Vec<WishlistItemDetail>, ClientError> {
        let state = self.enter("wishlist_details")?;
        let (_, places) = state
            .wishlists
            .iter()
            .find(|(existing, _)| existing == name)
            .ok_or(ClientError::NotFound)?;
        Ok(places
            .iter()
            .filter(|p| !state.omitted_details.contains(&p.place_name))
            .map(|p| WishlistItemDetail {
                place_name: p.place_name.clone(),
                image_url: p.image_url.clone(),
                description: p.description.clone(),
                image_base64: p.image_base64.clone(),
                image_type: p.image_type.clone(),
            })
            .collect())
    }

    async fn add_place(&self, wishlist: &str, place: &PlaceNew) -> Result<(), ClientError> {
        let mut state = self.enter("add_place")?;
        let (_, places) = state
            .wishlists
            .iter_mut()
            .find(|(existing, _)| existing == wishlist)
            .ok_or(ClientError::NotFound)?;
        if !places.iter().any(|p| p.place_name == place.place_name) {
            places.push(place.clone());
        }
        Ok(())
    }

    async fn remove_place(&self, wishlist: &str, place_name: &str) -> Result<(), ClientError> {
        let mut state = self.enter("remove_place")?;
        let (_, places) = state
            .wishlists
            .iter_mut()
            .find(|(existing, _)| existing == wishlist)
            .ok_or(ClientError::NotFound)?;
        places.retain(|p| p.place_name != place_name);
        Ok(())
    }

    async fn delete_wishlist(&self, name: &str) -> Result<(), ClientError> {
        let mut state = self.enter("delete_wishlist")?;
        let before = state.wishlists.len();
        state.wishlists.retain(|(existing, _)| existing != name);
        if state.wishlists.len() == before {
            return Err(ClientError::NotFound);
        }
        Ok(())
    }

    async fn cards(&self, kind: CardKind) -> Result<Vec<RecommendationCard>, ClientError> {
        let state = self.enter(&format!("cards:{}", kind.path()))?;
        Ok(state.cards.get(&kind).cloned().unwrap_or_default())
    }
}
