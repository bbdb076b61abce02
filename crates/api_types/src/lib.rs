use serde::{Deserialize, Deserializer, Serialize};

/// Failure body returned by the backend (`{"error": "..."}`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Treats a missing field, `null` and `""` the same way.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

pub mod image {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RecognitionStatus {
        Found,
        NotFound,
    }

    /// Answer of `POST /images/check`.
    ///
    /// Only `status` is guaranteed; a `not_found` answer usually carries
    /// just a `message`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecognitionResult {
        pub status: RecognitionStatus,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub place_name: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub image_id: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub url: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub description: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub message: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub file_type: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub icon_base64: Option<String>,
    }

    impl RecognitionResult {
        pub fn is_found(&self) -> bool {
            self.status == RecognitionStatus::Found
        }
    }

    /// Answer of `GET /images/by-url`: place metadata plus the stored image.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ImageByUrl {
        pub place_name: String,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub description: Option<String>,
        pub file_type: String,
        #[serde(default)]
        pub size: u64,
        pub image_base64: String,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub icon_base64: Option<String>,
    }

    /// Metadata returned by `POST /images/upload`.
    ///
    /// The raw bytes are not echoed back to the client.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StoredImage {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub file_name: Option<String>,
        #[serde(default)]
        pub file_type: Option<String>,
        #[serde(default)]
        pub size: u64,
        #[serde(default)]
        pub place_name: Option<String>,
        #[serde(default)]
        pub url: Option<String>,
    }
}

pub mod wishlist {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistNew {
        pub name: String,
    }

    /// Body of `POST /wishlists/{name}/places`; absent optionals are omitted.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlaceNew {
        pub place_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub image_base64: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub image_type: Option<String>,
    }

    /// Enriched record of a place saved in a wishlist.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WishlistItemDetail {
        pub place_name: String,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub image_url: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub description: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub image_base64: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub image_type: Option<String>,
    }

    impl WishlistItemDetail {
        /// A detail record carrying nothing but the place name.
        pub fn bare(place_name: impl Into<String>) -> Self {
            Self {
                place_name: place_name.into(),
                ..Self::default()
            }
        }
    }
}

pub mod card {
    use super::*;

    /// The three recommendation collections shown while planning an itinerary.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum CardKind {
        Personalized,
        Influencer,
        MicroItinerary,
    }

    impl CardKind {
        pub const ALL: [CardKind; 3] = [
            CardKind::Personalized,
            CardKind::Influencer,
            CardKind::MicroItinerary,
        ];

        /// Path relative to the API base.
        pub fn path(self) -> &'static str {
            match self {
                Self::Personalized => "personalized-cards",
                Self::Influencer => "influencer-cards",
                Self::MicroItinerary => "micro-itinerary-cards",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Personalized => "Personalized Cards",
                Self::Influencer => "Influencer Cards",
                Self::MicroItinerary => "Micro Itinerary Cards",
            }
        }

        pub fn empty_message(self) -> &'static str {
            match self {
                Self::Personalized => "No personalized cards.",
                Self::Influencer => "No influencer cards.",
                Self::MicroItinerary => "No micro-itinerary cards.",
            }
        }
    }

    /// Read-only recommendation card.
    ///
    /// `duration_days` is free-form text (e.g. `"3"`, `"1 week"`).
    /// `thumbnail_image` is a `data:` URL when present.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecommendationCard {
        pub title: String,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub short_description: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub duration_days: Option<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        pub thumbnail_image: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        card::RecommendationCard,
        image::{RecognitionResult, RecognitionStatus},
        wishlist::{PlaceNew, WishlistItemDetail},
    };

    #[test]
    fn not_found_result_only_needs_status() {
        let parsed: RecognitionResult = serde_json::from_str(
            r#"{"status":"not_found","message":"No matching image found in the database"}"#,
        )
        .unwrap();
        assert_eq!(parsed.status, RecognitionStatus::NotFound);
        assert!(!parsed.is_found());
        assert_eq!(parsed.place_name, None);
        assert!(parsed.message.is_some());
    }

    #[test]
    fn found_result_reads_camel_case_fields() {
        let parsed: RecognitionResult = serde_json::from_str(
            r#"{"status":"found","placeName":"Eiffel Tower","imageId":"img::1","iconBase64":""}"#,
        )
        .unwrap();
        assert!(parsed.is_found());
        assert_eq!(parsed.place_name.as_deref(), Some("Eiffel Tower"));
        assert_eq!(parsed.image_id.as_deref(), Some("img::1"));
        assert_eq!(parsed.icon_base64, None);
    }

    #[test]
    fn place_new_omits_absent_optionals() {
        let body = PlaceNew {
            place_name: "Colosseum".to_string(),
            description: Some("Rome".to_string()),
            ..PlaceNew::default()
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"placeName": "Colosseum", "description": "Rome"})
        );
    }

    #[test]
    fn empty_thumbnail_is_treated_as_missing() {
        let card: RecommendationCard = serde_json::from_str(
            r#"{"title":"Paris in 3 days","shortDescription":null,"durationDays":"3","thumbnailImage":""}"#,
        )
        .unwrap();
        assert_eq!(card.thumbnail_image, None);
        assert_eq!(card.short_description, None);
        assert_eq!(card.duration_days.as_deref(), Some("3"));
    }

    #[test]
    fn detail_without_optionals_parses() {
        let detail: WishlistItemDetail =
            serde_json::from_str(r#"{"placeName":"Louvre"}"#).unwrap();
        assert_eq!(detail, WishlistItemDetail::bare("Louvre"));
    }
}
