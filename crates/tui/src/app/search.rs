use std::path::Path;

use api_types::image::{RecognitionResult, RecognitionStatus};

use super::{App, ToastLevel, message_for_error};
use crate::{
    client::{Backend, ClientError, ImageUpload},
    image::{self, DEFAULT_STRATEGIES, ImageStrategy, ResolvedImage},
};

const PROCESS_FAILED: &str = "Failed to process image. Please try again.";

#[derive(Debug)]
pub struct SearchState {
    /// File path or `http(s)://` URL being typed.
    pub input: String,
    pub editing: bool,
    pub result: Option<RecognitionResult>,
    pub image: Option<ResolvedImage>,
    /// Last upload that matched nothing, kept for registration.
    pub upload: Option<ImageUpload>,
    /// Place name being typed for registration.
    pub register_input: Option<String>,
    pub message: Option<String>,
    pub history_cursor: Option<usize>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            input: String::new(),
            editing: true,
            result: None,
            image: None,
            upload: None,
            register_input: None,
            message: None,
            history_cursor: None,
        }
    }
}

impl SearchState {
    pub fn found_place(&self) -> Option<&str> {
        self.result
            .as_ref()
            .filter(|result| result.is_found())
            .and_then(|result| result.place_name.as_deref())
    }

    pub fn can_register(&self) -> bool {
        self.upload.is_some()
            && self
                .result
                .as_ref()
                .is_some_and(|result| result.status == RecognitionStatus::NotFound)
    }

    /// Walks back through `history` (most recent first) into the input.
    pub fn recall(&mut self, history: &[String], older: bool) {
        if history.is_empty() {
            return;
        }
        let next = match (self.history_cursor, older) {
            (None, true) => Some(0),
            (None, false) => None,
            (Some(idx), true) => Some((idx + 1).min(history.len() - 1)),
            (Some(0), false) => None,
            (Some(idx), false) => Some(idx - 1),
        };
        self.history_cursor = next;
        self.input = next
            .and_then(|idx| history.get(idx).cloned())
            .unwrap_or_default();
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

impl<B: Backend> App<B> {
    pub(super) async fn search(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            self.state.search.message = Some("Please select an image file".to_string());
            return;
        }

        let outcome = if is_url(input) {
            self.lookup_url(input).await
        } else {
            self.upload_file(input).await
        };
        let Some((result, image, upload)) = outcome else {
            return;
        };

        tracing::info!(
            %input,
            status = ?result.status,
            place = result.place_name.as_deref().unwrap_or(""),
            image = image.as_ref().map(|img| img.source.label()).unwrap_or("none"),
            "search finished"
        );

        let search = &mut self.state.search;
        search.result = Some(result);
        search.image = image;
        search.upload = upload;
        search.register_input = None;
        search.message = None;
        search.editing = false;
        search.history_cursor = None;

        self.state.local.remember_search(input);
        self.save_local_state();
    }

    async fn lookup_url(
        &mut self,
        url: &str,
    ) -> Option<(RecognitionResult, Option<ResolvedImage>, Option<ImageUpload>)> {
        match self.backend.image_by_url(url).await {
            Ok(found) => {
                let (result, image) = image::result_from_lookup(url, &found);
                Some((result, image, None))
            }
            Err(ClientError::NotFound) => Some((
                RecognitionResult {
                    status: RecognitionStatus::NotFound,
                    place_name: None,
                    image_id: None,
                    url: Some(url.to_string()),
                    description: None,
                    message: Some("No image stored for this URL.".to_string()),
                    file_type: None,
                    icon_base64: None,
                },
                None,
                None,
            )),
            Err(err) => {
                tracing::warn!(%url, %err, "by-url lookup failed");
                self.toast(ToastLevel::Error, PROCESS_FAILED);
                None
            }
        }
    }

    async fn upload_file(
        &mut self,
        path: &str,
    ) -> Option<(RecognitionResult, Option<ResolvedImage>, Option<ImageUpload>)> {
        let upload = match ImageUpload::from_path(Path::new(path)).await {
            Ok(upload) => upload,
            Err(err) => {
                self.state.search.message = Some(format!("Cannot read {path}: {err}"));
                return None;
            }
        };

        let mut result = match self.backend.check_image(&upload).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%path, %err, "image check failed");
                self.toast(ToastLevel::Error, PROCESS_FAILED);
                return None;
            }
        };

        let resolution = image::resolve(&self.backend, &result, &DEFAULT_STRATEGIES).await;
        if result.description.is_none() {
            result.description = resolution.description;
        }
        let keep_upload = (!result.is_found()).then_some(upload);
        Some((result, resolution.image, keep_upload))
    }

    pub(super) async fn register_image(&mut self, place: &str) {
        let place = place.trim();
        if place.is_empty() {
            self.state.search.message = Some("Enter a place name.".to_string());
            return;
        }
        let Some(upload) = self.state.search.upload.clone() else {
            self.toast(ToastLevel::Info, "Upload an image first.");
            return;
        };

        match self.backend.register_image(&upload, place).await {
            Ok(stored) => {
                tracing::info!(%place, id = stored.id.as_deref().unwrap_or(""), "image registered");
                let search = &mut self.state.search;
                search.result = Some(RecognitionResult {
                    status: RecognitionStatus::Found,
                    place_name: Some(place.to_string()),
                    image_id: stored.id,
                    url: stored.url,
                    description: None,
                    message: None,
                    file_type: Some(upload.mime.clone()),
                    icon_base64: None,
                });
                search.image = Some(ResolvedImage::from_bytes(
                    ImageStrategy::RawImage,
                    &upload.mime,
                    &upload.bytes,
                ));
                search.upload = None;
                search.register_input = None;
                search.message = None;
                self.toast(ToastLevel::Success, format!("Registered image as \"{place}\"."));
            }
            Err(err) => {
                tracing::warn!(%place, %err, "image registration failed");
                let message = format!("Failed to register image: {}", message_for_error(&err));
                self.toast(ToastLevel::Error, message);
            }
        }
    }
}
