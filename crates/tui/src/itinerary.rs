//! Guided itinerary questions and the recommendation panels they unlock.

use api_types::card::{CardKind, RecommendationCard};
use chrono::NaiveDate;

use crate::client::Backend;

pub const DURATION_OPTIONS: [&str; 6] = [
    "3 - 4 days",
    "6 - 9 days",
    "10 - 12 days",
    "13 - 15 days",
    "15 - 20 days",
    "20+ days",
];

pub const ORIGIN_CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bengaluru", "Hyderabad", "Ahmedabad", "Chennai", "Kolkata", "Surat",
    "Pune", "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal",
    "Visakhapatnam", "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra", "Nashik",
    "Faridabad", "Meerut", "Rajkot", "Varanasi", "Srinagar", "Aurangabad", "Dhanbad",
    "Amritsar", "Navi Mumbai", "Prayagraj", "Howrah", "Ranchi", "Gwalior", "Jabalpur",
    "Coimbatore", "Vijayawada", "Jodhpur", "Madurai", "Raipur", "Kota", "Guwahati",
    "Chandigarh", "Solapur", "Hubballi", "Mysuru", "Tiruchirappalli", "Bareilly", "Aligarh",
    "Tiruppur", "Gurugram", "Noida", "Dehradun", "Kochi", "Kozhikode", "Thiruvananthapuram",
    "Panaji", "Udaipur", "Shimla", "Ooty",
];

const MAX_SUGGESTIONS: usize = 5;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Duration,
    City,
    Date,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Self::Duration => 1,
            Self::City => 2,
            Self::Date => 3,
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            Self::Duration => "What is the duration of your holiday?",
            Self::City => "Where are you travelling from?",
            Self::Date => "When is your departure date?",
        }
    }
}

/// Duration, then origin city, then departure date. Each step only
/// advances once its own answer is valid.
#[derive(Debug, Clone)]
pub struct GuidedForm {
    pub step: Step,
    pub duration: Option<usize>,
    pub city: String,
    pub departure: Option<NaiveDate>,
    pub error: Option<String>,
}

impl Default for GuidedForm {
    fn default() -> Self {
        Self {
            step: Step::Duration,
            duration: None,
            city: String::new(),
            departure: None,
            error: None,
        }
    }
}

impl GuidedForm {
    pub fn choose_duration(&mut self, index: usize) {
        if index >= DURATION_OPTIONS.len() {
            self.error = Some("Unknown duration.".to_string());
            return;
        }
        self.duration = Some(index);
        self.error = None;
        self.step = Step::City;
    }

    pub fn duration_label(&self) -> Option<&'static str> {
        self.duration.and_then(|idx| DURATION_OPTIONS.get(idx).copied())
    }

    pub fn set_city(&mut self, city: &str) {
        if self.step != Step::City {
            return;
        }
        if city.trim().is_empty() {
            self.error = Some("Enter a starting city.".to_string());
            return;
        }
        self.city = city.trim().to_string();
        self.error = None;
        self.step = Step::Date;
    }

    pub fn set_departure(&mut self, raw: &str) {
        if self.step != Step::Date {
            return;
        }
        match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
            Ok(date) => {
                self.departure = Some(date);
                self.error = None;
            }
            Err(_) => {
                self.departure = None;
                self.error = Some("Use the YYYY-MM-DD format.".to_string());
            }
        }
    }

    pub fn back(&mut self) {
        self.error = None;
        self.step = match self.step {
            Step::Duration | Step::City => Step::Duration,
            Step::Date => Step::City,
        };
    }

    /// Every answer given; the cards may be fetched.
    pub fn is_complete(&self) -> bool {
        self.step == Step::Date
            && self.duration.is_some()
            && !self.city.trim().is_empty()
            && self.departure.is_some()
    }
}

/// Known cities matching what was typed so far, prefix matches first.
pub fn city_suggestions(typed: &str) -> Vec<&'static str> {
    let term = typed.trim().to_lowercase();
    if term.is_empty() {
        return ORIGIN_CITIES.iter().take(MAX_SUGGESTIONS).copied().collect();
    }
    let (mut prefix, contains): (Vec<&'static str>, Vec<&'static str>) = ORIGIN_CITIES
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().contains(&term))
        .partition(|city| city.to_lowercase().starts_with(&term));
    prefix.extend(contains);
    prefix.truncate(MAX_SUGGESTIONS);
    prefix
}

/// One recommendation panel.
#[derive(Debug, Clone, PartialEq)]
pub enum CardPanel {
    Loaded(Vec<RecommendationCard>),
    Failed(String),
}

impl CardPanel {
    pub fn cards(&self) -> &[RecommendationCard] {
        match self {
            Self::Loaded(cards) => cards,
            Self::Failed(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardCollections {
    pub personalized: CardPanel,
    pub influencer: CardPanel,
    pub micro: CardPanel,
}

impl CardCollections {
    pub fn panel(&self, kind: CardKind) -> &CardPanel {
        match kind {
            CardKind::Personalized => &self.personalized,
            CardKind::Influencer => &self.influencer,
            CardKind::MicroItinerary => &self.micro,
        }
    }

    pub fn failed(&self) -> Vec<CardKind> {
        CardKind::ALL
            .into_iter()
            .filter(|kind| matches!(self.panel(*kind), CardPanel::Failed(_)))
            .collect()
    }
}

/// Fetches the three collections concurrently; each settles on its own.
pub async fn fetch_cards<B: Backend>(backend: &B) -> CardCollections {
    let (personalized, influencer, micro) = tokio::join!(
        fetch_panel(backend, CardKind::Personalized),
        fetch_panel(backend, CardKind::Influencer),
        fetch_panel(backend, CardKind::MicroItinerary),
    );
    tracing::info!(
        personalized = personalized.cards().len(),
        influencer = influencer.cards().len(),
        micro = micro.cards().len(),
        "fetched recommendation cards"
    );
    CardCollections {
        personalized,
        influencer,
        micro,
    }
}

async fn fetch_panel<B: Backend>(backend: &B, kind: CardKind) -> CardPanel {
    match backend.cards(kind).await {
        Ok(cards) => CardPanel::Loaded(cards),
        Err(err) => {
            tracing::warn!(kind = kind.path(), %err, "card fetch failed");
            CardPanel::Failed(err.to_string())
        }
    }
}
