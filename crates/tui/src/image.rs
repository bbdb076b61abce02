//! Picking an image to show (and save) alongside a recognized place.
//!
//! The recognition answer may point at several image sources. They are
//! tried in a fixed order and the first one that yields bytes wins.

use api_types::image::{ImageByUrl, RecognitionResult, RecognitionStatus};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::client::Backend;

const FALLBACK_MIME: &str = "image/png";

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Splits `data:<mime>;base64,<payload>` into its mime type and payload.
pub fn parse_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    Some((mime, payload))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStrategy {
    /// Stored image looked up by the result's source URL.
    Enrichment,
    /// Icon embedded in the recognition answer.
    Icon,
    /// Raw bytes fetched by image id.
    RawImage,
}

impl ImageStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Enrichment => "stored image",
            Self::Icon => "icon",
            Self::RawImage => "raw image",
        }
    }
}

pub const DEFAULT_STRATEGIES: [ImageStrategy; 3] = [
    ImageStrategy::Enrichment,
    ImageStrategy::Icon,
    ImageStrategy::RawImage,
];

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedImage {
    pub source: ImageStrategy,
    pub mime: String,
    pub base64: String,
}

impl ResolvedImage {
    pub fn from_bytes(source: ImageStrategy, mime: &str, bytes: &[u8]) -> Self {
        Self {
            source,
            mime: mime.to_string(),
            base64: STANDARD.encode(bytes),
        }
    }

    /// Size of the decoded image, `None` if the payload is not valid base64.
    pub fn byte_len(&self) -> Option<usize> {
        STANDARD.decode(self.base64.as_bytes()).ok().map(|b| b.len())
    }
}

/// What the strategies produced for one recognition result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub image: Option<ResolvedImage>,
    /// Description found while enriching, if the result had none.
    pub description: Option<String>,
}

/// Runs `strategies` in order and stops at the first image found.
///
/// Failures are logged and the next strategy is tried; running out of
/// strategies leaves the image empty.
pub async fn resolve<B: Backend>(
    backend: &B,
    result: &RecognitionResult,
    strategies: &[ImageStrategy],
) -> Resolution {
    let mut resolution = Resolution::default();
    if result.status != RecognitionStatus::Found {
        return resolution;
    }

    for strategy in strategies {
        let image = match strategy {
            ImageStrategy::Enrichment => {
                let Some(url) = result.url.as_deref() else {
                    continue;
                };
                match backend.image_by_url(url).await {
                    Ok(found) => {
                        if result.description.is_none() {
                            resolution.description = found.description.clone();
                        }
                        image_from_lookup(&found)
                    }
                    Err(err) => {
                        tracing::debug!(%url, %err, "enrichment lookup failed");
                        None
                    }
                }
            }
            ImageStrategy::Icon => result.icon_base64.as_ref().map(|icon| ResolvedImage {
                source: ImageStrategy::Icon,
                mime: result
                    .file_type
                    .clone()
                    .unwrap_or_else(|| FALLBACK_MIME.to_string()),
                base64: icon.clone(),
            }),
            ImageStrategy::RawImage => {
                let Some(id) = result.image_id.as_deref() else {
                    continue;
                };
                match backend.image_data_url(id).await {
                    Ok(url) => parse_data_url(&url).map(|(mime, payload)| ResolvedImage {
                        source: ImageStrategy::RawImage,
                        mime: mime.to_string(),
                        base64: payload.to_string(),
                    }),
                    Err(err) => {
                        tracing::debug!(%id, %err, "raw image fetch failed");
                        None
                    }
                }
            }
        };

        if let Some(image) = image {
            tracing::debug!(source = image.source.label(), "image resolved");
            resolution.image = Some(image);
            break;
        }
    }

    resolution
}

fn image_from_lookup(found: &ImageByUrl) -> Option<ResolvedImage> {
    if !found.image_base64.is_empty() {
        return Some(ResolvedImage {
            source: ImageStrategy::Enrichment,
            mime: found.file_type.clone(),
            base64: found.image_base64.clone(),
        });
    }
    found.icon_base64.as_ref().map(|icon| ResolvedImage {
        source: ImageStrategy::Enrichment,
        mime: found.file_type.clone(),
        base64: icon.clone(),
    })
}

/// Turns a by-url lookup into the same shape as an upload check.
pub fn result_from_lookup(url: &str, found: &ImageByUrl) -> (RecognitionResult, Option<ResolvedImage>) {
    let result = RecognitionResult {
        status: RecognitionStatus::Found,
        place_name: Some(found.place_name.clone()),
        image_id: None,
        url: Some(url.to_string()),
        description: found.description.clone(),
        message: None,
        file_type: Some(found.file_type.clone()),
        icon_base64: found.icon_base64.clone(),
    };
    (result, image_from_lookup(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    fn found(place: &str) -> RecognitionResult {
        RecognitionResult {
            status: RecognitionStatus::Found,
            place_name: Some(place.to_string()),
            image_id: None,
            url: None,
            description: None,
            message: None,
            file_type: None,
            icon_base64: None,
        }
    }

    #[test]
    fn data_url_round_trips_through_parse() {
        let url = data_url("image/jpeg", &[1, 2, 3]);
        assert_eq!(parse_data_url(&url), Some(("image/jpeg", "AQID")));
        assert_eq!(parse_data_url("https://example.com/x.png"), None);
        assert_eq!(parse_data_url("data:image/png,plain"), None);
    }

    #[tokio::test]
    async fn enrichment_wins_when_url_resolves() {
        let backend = FakeBackend::default();
        backend.add_stored_image("https://img/eiffel", "Eiffel Tower", "image/jpeg", "AQID");
        let mut result = found("Eiffel Tower");
        result.url = Some("https://img/eiffel".to_string());
        result.icon_base64 = Some("BAUG".to_string());

        let resolution = resolve(&backend, &result, &DEFAULT_STRATEGIES).await;
        let image = resolution.image.unwrap();
        assert_eq!(image.source, ImageStrategy::Enrichment);
        assert_eq!(image.base64, "AQID");
        assert_eq!(image.byte_len(), Some(3));
        assert_eq!(resolution.description.as_deref(), Some("Eiffel Tower description"));
    }

    #[tokio::test]
    async fn failed_enrichment_falls_back_to_icon() {
        let backend = FakeBackend::default();
        let mut result = found("Eiffel Tower");
        result.url = Some("https://img/unknown".to_string());
        result.icon_base64 = Some("BAUG".to_string());
        result.file_type = Some("image/webp".to_string());

        let image = resolve(&backend, &result, &DEFAULT_STRATEGIES)
            .await
            .image
            .unwrap();
        assert_eq!(image.source, ImageStrategy::Icon);
        assert_eq!(image.mime, "image/webp");
        assert_eq!(backend.calls_to("image_by_url"), 1);
    }

    #[tokio::test]
    async fn raw_image_is_last_resort() {
        let backend = FakeBackend::default();
        backend.add_raw_image("img::1", "image/png", &[9, 9]);
        let mut result = found("Eiffel Tower");
        result.image_id = Some("img::1".to_string());

        let image = resolve(&backend, &result, &DEFAULT_STRATEGIES)
            .await
            .image
            .unwrap();
        assert_eq!(image.source, ImageStrategy::RawImage);
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.byte_len(), Some(2));
    }

    #[tokio::test]
    async fn nothing_resolves_to_no_image() {
        let backend = FakeBackend::default();
        let mut result = found("Eiffel Tower");
        result.image_id = Some("missing".to_string());

        let resolution = resolve(&backend, &result, &DEFAULT_STRATEGIES).await;
        assert_eq!(resolution, Resolution::default());
    }

    #[tokio::test]
    async fn strategy_order_is_respected() {
        let backend = FakeBackend::default();
        backend.add_raw_image("img::1", "image/png", &[9, 9]);
        let mut result = found("Eiffel Tower");
        result.image_id = Some("img::1".to_string());
        result.icon_base64 = Some("BAUG".to_string());

        let image = resolve(
            &backend,
            &result,
            &[ImageStrategy::RawImage, ImageStrategy::Icon],
        )
        .await
        .image
        .unwrap();
        assert_eq!(image.source, ImageStrategy::RawImage);
    }

    #[tokio::test]
    async fn not_found_results_are_never_resolved() {
        let backend = FakeBackend::default();
        let mut result = found("x");
        result.status = RecognitionStatus::NotFound;
        result.icon_base64 = Some("BAUG".to_string());

        assert_eq!(
            resolve(&backend, &result, &DEFAULT_STRATEGIES).await,
            Resolution::default()
        );
    }
}
