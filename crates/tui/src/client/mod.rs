use std::path::Path;

use api_types::{
    ErrorBody,
    card::{CardKind, RecommendationCard},
    image::{ImageByUrl, RecognitionResult, RecognitionStatus, StoredImage},
    wishlist::{PlaceNew, WishlistItemDetail, WishlistNew},
};
use reqwest::{RequestBuilder, Response, StatusCode, Url, header::CONTENT_TYPE, multipart};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, Result},
    image::data_url,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("server: {0}")]
    Server(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

/// An image file ready to be sent as multipart.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            mime: mime_for_path(path).to_string(),
            file_name,
            bytes,
        })
    }

    fn part(&self) -> std::result::Result<multipart::Part, ClientError> {
        multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)
            .map_err(ClientError::Transport)
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Every call the client makes against the place-recognition API.
///
/// One method, one HTTP request; no retries and no timeouts.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn check_image(
        &self,
        upload: &ImageUpload,
    ) -> std::result::Result<RecognitionResult, ClientError>;
    async fn register_image(
        &self,
        upload: &ImageUpload,
        place_name: &str,
    ) -> std::result::Result<StoredImage, ClientError>;
    async fn image_by_url(&self, url: &str) -> std::result::Result<ImageByUrl, ClientError>;
    /// Raw image bytes as a `data:` URL.
    async fn image_data_url(&self, id: &str) -> std::result::Result<String, ClientError>;
    async fn create_wishlist(&self, name: &str) -> std::result::Result<(), ClientError>;
    async fn wishlists(&self) -> std::result::Result<Vec<String>, ClientError>;
    async fn wishlist_places(&self, name: &str) -> std::result::Result<Vec<String>, ClientError>;
    async fn wishlist_details(
        &self,
        name: &str,
    ) -> std::result::Result<Vec<WishlistItemDetail>, ClientError>;
    async fn add_place(
        &self,
        wishlist: &str,
        place: &PlaceNew,
    ) -> std::result::Result<(), ClientError>;
    async fn remove_place(
        &self,
        wishlist: &str,
        place_name: &str,
    ) -> std::result::Result<(), ClientError>;
    async fn delete_wishlist(&self, name: &str) -> std::result::Result<(), ClientError>;
    async fn cards(
        &self,
        kind: CardKind,
    ) -> std::result::Result<Vec<RecommendationCard>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidBaseUrl(format!(
                "{base_url} cannot be a base"
            )));
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Server(format!("invalid base_url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, ClientError> {
        tracing::debug!(%url, "GET");
        let res = self.http.get(url).send().await?;
        if res.status().is_success() {
            return decode_body(res).await;
        }
        Err(error_from_response(res).await)
    }

    async fn send_unit(&self, req: RequestBuilder) -> std::result::Result<(), ClientError> {
        let res = req.send().await?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(error_from_response(res).await)
    }
}

async fn decode_body<T: DeserializeOwned>(res: Response) -> std::result::Result<T, ClientError> {
    let text = res.text().await?;
    serde_json::from_str(&text).map_err(|err| ClientError::Decode(err.to_string()))
}

async fn error_from_response(res: Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorBody>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    tracing::warn!(%status, %body, "request failed");
    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        400 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}

impl Backend for Client {
    async fn check_image(
        &self,
        upload: &ImageUpload,
    ) -> std::result::Result<RecognitionResult, ClientError> {
        let endpoint = self.endpoint(&["images", "check"])?;
        tracing::debug!(url = %endpoint, file = %upload.file_name, "POST check");
        let form = multipart::Form::new().part("file", upload.part()?);
        let res = self.http.post(endpoint).multipart(form).send().await?;

        let status = res.status();
        if status.is_success() {
            return decode_body(res).await;
        }
        // "No match" is reported as a 404 that still carries a result body.
        if status == StatusCode::NOT_FOUND {
            let text = res.text().await?;
            return match serde_json::from_str::<RecognitionResult>(&text) {
                Ok(result) if result.status == RecognitionStatus::NotFound => Ok(result),
                _ => Err(ClientError::NotFound),
            };
        }
        Err(error_from_response(res).await)
    }

    async fn register_image(
        &self,
        upload: &ImageUpload,
        place_name: &str,
    ) -> std::result::Result<StoredImage, ClientError> {
        let endpoint = self.endpoint(&["images", "upload"])?;
        tracing::debug!(url = %endpoint, %place_name, "POST upload");
        let form = multipart::Form::new()
            .part("file", upload.part()?)
            .text("placeName", place_name.to_string());
        let res = self.http.post(endpoint).multipart(form).send().await?;
        if res.status().is_success() {
            return decode_body(res).await;
        }
        Err(error_from_response(res).await)
    }

    async fn image_by_url(&self, url: &str) -> std::result::Result<ImageByUrl, ClientError> {
        let mut endpoint = self.endpoint(&["images", "by-url"])?;
        endpoint.query_pairs_mut().append_pair("url", url);
        self.get_json(endpoint).await
    }

    async fn image_data_url(&self, id: &str) -> std::result::Result<String, ClientError> {
        let endpoint = self.endpoint(&["images", id])?;
        tracing::debug!(url = %endpoint, "GET image bytes");
        let res = self.http.get(endpoint).send().await?;
        if !res.status().is_success() {
            return Err(error_from_response(res).await);
        }
        let mime = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = res.bytes().await?;
        Ok(data_url(&mime, &bytes))
    }

    async fn create_wishlist(&self, name: &str) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint(&["wishlists"])?;
        tracing::debug!(url = %endpoint, %name, "POST wishlist");
        let payload = WishlistNew {
            name: name.to_string(),
        };
        self.send_unit(self.http.post(endpoint).json(&payload)).await
    }

    async fn wishlists(&self) -> std::result::Result<Vec<String>, ClientError> {
        self.get_json(self.endpoint(&["wishlists"])?).await
    }

    async fn wishlist_places(&self, name: &str) -> std::result::Result<Vec<String>, ClientError> {
        self.get_json(self.endpoint(&["wishlists", name])?).await
    }

    async fn wishlist_details(
        &self,
        name: &str,
    ) -> std::result::Result<Vec<WishlistItemDetail>, ClientError> {
        self.get_json(self.endpoint(&["wishlists", name, "details"])?)
            .await
    }

    async fn add_place(
        &self,
        wishlist: &str,
        place: &PlaceNew,
    ) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint(&["wishlists", wishlist, "places"])?;
        tracing::debug!(url = %endpoint, place = %place.place_name, "POST place");
        self.send_unit(self.http.post(endpoint).json(place)).await
    }

    async fn remove_place(
        &self,
        wishlist: &str,
        place_name: &str,
    ) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint(&["wishlists", wishlist, "places", place_name])?;
        tracing::debug!(url = %endpoint, "DELETE place");
        self.send_unit(self.http.delete(endpoint)).await
    }

    async fn delete_wishlist(&self, name: &str) -> std::result::Result<(), ClientError> {
        let endpoint = self.endpoint(&["wishlists", name])?;
        tracing::debug!(url = %endpoint, "DELETE wishlist");
        self.send_unit(self.http.delete(endpoint)).await
    }

    async fn cards(
        &self,
        kind: CardKind,
    ) -> std::result::Result<Vec<RecommendationCard>, ClientError> {
        self.get_json(self.endpoint(&[kind.path()])?).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        body::Bytes,
        extract::{Path, Query},
        http::{StatusCode, header},
        response::IntoResponse,
        routing::{delete, get, post},
    };
    use serde_json::{Value, json};

    use super::*;

    async fn serve(router: Router) -> Client {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Client::new(&format!("http://{addr}/api/")).unwrap()
    }

    fn upload() -> ImageUpload {
        ImageUpload {
            file_name: "tower.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        }
    }

    #[tokio::test]
    async fn check_image_sends_file_part_and_reads_found() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/images/check",
            post(move |body: Bytes| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = String::from_utf8_lossy(&body).into_owned();
                    Json(json!({"status": "found", "placeName": "Eiffel Tower", "imageId": "img::1"}))
                }
            }),
        );
        let client = serve(router).await;

        let result = client.check_image(&upload()).await.unwrap();
        assert!(result.is_found());
        assert_eq!(result.place_name.as_deref(), Some("Eiffel Tower"));
        let body = seen.lock().unwrap().clone();
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"tower.jpg\""));
    }

    #[tokio::test]
    async fn check_image_maps_404_body_to_not_found_result() {
        let router = Router::new().route(
            "/api/images/check",
            post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"status": "not_found", "message": "No matching image found in the database"})),
                )
            }),
        );
        let client = serve(router).await;

        let result = client.check_image(&upload()).await.unwrap();
        assert_eq!(result.status, RecognitionStatus::NotFound);
    }

    #[tokio::test]
    async fn path_segments_are_percent_encoded() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/wishlists/{name}/places/{place}",
            delete(move |Path((name, place)): Path<(String, String)>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some((name, place));
                    StatusCode::NO_CONTENT
                }
            }),
        );
        let client = serve(router).await;

        client
            .remove_place("Europe Trip", "Notre-Dame / Paris")
            .await
            .unwrap();
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(("Europe Trip".to_string(), "Notre-Dame / Paris".to_string()))
        );
    }

    #[tokio::test]
    async fn register_image_sends_file_and_place_name() {
        let seen = Arc::new(Mutex::new(String::new()));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/images/upload",
            post(move |body: Bytes| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = String::from_utf8_lossy(&body).into_owned();
                    Json(json!({
                        "id": "img::9",
                        "fileName": "tower.jpg",
                        "fileType": "image/jpeg",
                        "size": 3,
                        "placeName": "Eiffel Tower",
                    }))
                }
            }),
        );
        let client = serve(router).await;

        let stored = client.register_image(&upload(), "Eiffel Tower").await.unwrap();
        assert_eq!(stored.id.as_deref(), Some("img::9"));
        assert_eq!(stored.place_name.as_deref(), Some("Eiffel Tower"));
        assert_eq!(stored.size, 3);

        let body = seen.lock().unwrap().clone();
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"tower.jpg\""));
        assert!(body.contains("name=\"placeName\""));
        assert!(body.contains("Eiffel Tower"));
        assert!(!body.contains("name=\"url\""));
    }

    #[tokio::test]
    async fn create_wishlist_posts_name() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/wishlists",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(body);
                    StatusCode::CREATED
                }
            }),
        );
        let client = serve(router).await;

        client.create_wishlist("Europe Trip").await.unwrap();
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(json!({"name": "Europe Trip"}))
        );
    }

    #[tokio::test]
    async fn wishlist_places_are_decoded_in_order() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/wishlists/{name}",
            get(move |Path(name): Path<String>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(name);
                    Json(json!(["Eiffel Tower", "Louvre", "Colosseum"]))
                }
            }),
        );
        let client = serve(router).await;

        let places = client.wishlist_places("Europe Trip").await.unwrap();
        assert_eq!(places, vec!["Eiffel Tower", "Louvre", "Colosseum"]);
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Europe Trip"));
    }

    #[tokio::test]
    async fn wishlist_details_are_decoded() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/wishlists/{name}/details",
            get(move |Path(name): Path<String>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(name);
                    Json(json!([
                        {
                            "placeName": "Eiffel Tower",
                            "imageUrl": "https://img/eiffel",
                            "description": "Iron lattice tower",
                            "imageBase64": "AQID",
                            "imageType": "image/jpeg",
                        },
                        {"placeName": "Louvre", "imageUrl": "", "description": null},
                    ]))
                }
            }),
        );
        let client = serve(router).await;

        let details = client.wishlist_details("Europe Trip").await.unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Europe Trip"));
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].image_url.as_deref(), Some("https://img/eiffel"));
        assert_eq!(details[0].image_type.as_deref(), Some("image/jpeg"));
        assert_eq!(details[1], WishlistItemDetail::bare("Louvre"));
    }

    #[tokio::test]
    async fn add_place_posts_camel_case_body_without_empty_fields() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/wishlists/{name}/places",
            post(move |Path(name): Path<String>, Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some((name, body));
                    StatusCode::CREATED
                }
            }),
        );
        let client = serve(router).await;

        let place = PlaceNew {
            place_name: "Eiffel Tower".to_string(),
            image_url: None,
            description: Some("Iron lattice tower".to_string()),
            image_base64: Some("AQID".to_string()),
            image_type: Some("image/jpeg".to_string()),
        };
        client.add_place("Europe Trip", &place).await.unwrap();
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some((
                "Europe Trip".to_string(),
                json!({
                    "placeName": "Eiffel Tower",
                    "description": "Iron lattice tower",
                    "imageBase64": "AQID",
                    "imageType": "image/jpeg",
                })
            ))
        );
    }

    #[tokio::test]
    async fn delete_wishlist_targets_named_resource() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/wishlists/{name}",
            delete(move |Path(name): Path<String>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(name);
                    StatusCode::NO_CONTENT
                }
            }),
        );
        let client = serve(router).await;

        client.delete_wishlist("Europe Trip").await.unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Europe Trip"));
    }

    #[tokio::test]
    async fn image_bytes_become_data_url() {
        let router = Router::new().route(
            "/api/images/{id}",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![1u8, 2, 3]) }),
        );
        let client = serve(router).await;

        let url = client.image_data_url("img::1").await.unwrap();
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn by_url_passes_query_parameter() {
        #[derive(serde::Deserialize)]
        struct Params {
            url: String,
        }
        let router = Router::new().route(
            "/api/images/by-url",
            get(|Query(params): Query<Params>| async move {
                Json(json!({
                    "placeName": "Colosseum",
                    "fileType": "image/jpeg",
                    "size": 3,
                    "imageBase64": "AQID",
                    "description": params.url,
                }))
            }),
        );
        let client = serve(router).await;

        let found = client
            .image_by_url("https://example.com/a b.jpg")
            .await
            .unwrap();
        assert_eq!(found.place_name, "Colosseum");
        assert_eq!(
            found.description.as_deref(),
            Some("https://example.com/a b.jpg")
        );
    }

    #[tokio::test]
    async fn server_errors_carry_backend_message() {
        let router = Router::new().route(
            "/api/wishlists",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Failed to fetch wishlists: boom"})),
                )
                    .into_response()
            }),
        );
        let client = serve(router).await;

        let err = client.wishlists().await.unwrap_err();
        assert!(
            matches!(err, ClientError::Server(ref msg) if msg == "Failed to fetch wishlists: boom")
        );
    }

    #[tokio::test]
    async fn conflict_without_body_uses_fallback_message() {
        let router = Router::new().route("/api/wishlists", post(|| async { StatusCode::CONFLICT }));
        let client = serve(router).await;

        let err = client.create_wishlist("Europe Trip").await.unwrap_err();
        assert!(matches!(err, ClientError::Conflict(ref msg) if msg == "unknown error"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let router = Router::new().route("/api/wishlists", get(|| async { "not json" }));
        let client = serve(router).await;

        let err = client.wishlists().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn cards_use_kind_path() {
        let router = Router::new().route(
            "/api/micro-itinerary-cards",
            get(|| async { Json(json!([{"title": "Old Town walk", "durationDays": "1"}])) }),
        );
        let client = serve(router).await;

        let cards = client.cards(CardKind::MicroItinerary).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Old Town walk");
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(std::path::Path::new("a/b/Tower.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(std::path::Path::new("x.png")), "image/png");
        assert_eq!(
            mime_for_path(std::path::Path::new("noext")),
            "application/octet-stream"
        );
    }

    #[test]
    fn endpoint_ignores_trailing_slash_on_base() {
        for base in ["http://localhost:8080/api/", "http://localhost:8080/api"] {
            let client = Client::new(base).unwrap();
            assert_eq!(
                client.endpoint(&["wishlists", "Europe Trip"]).unwrap().as_str(),
                "http://localhost:8080/api/wishlists/Europe%20Trip"
            );
        }
    }

    #[test]
    fn base_url_must_be_absolute() {
        assert!(matches!(
            Client::new("localhost:8080"),
            Err(AppError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            Client::new("/api/"),
            Err(AppError::InvalidBaseUrl(_))
        ));
        assert!(Client::new("http://localhost:8080/api/").is_ok());
    }
}
