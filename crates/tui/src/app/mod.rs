mod itinerary;
mod keys;
mod search;
mod toast;
mod wishlists;

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::time::Instant;

use crate::{
    client::{Backend, Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    local_state::LocalState,
    ui,
};

pub use itinerary::ItineraryState;
pub use search::SearchState;
pub use toast::{TOAST_TTL, ToastLevel, ToastState};
pub use wishlists::{ConfirmAction, DetailState, PickerPurpose, WishlistDialog, WishlistsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Search,
    Wishlists,
    Itinerary,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Search, Section::Wishlists, Section::Itinerary];

    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Wishlists => "Wishlists",
            Self::Itinerary => "Itinerary",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Search => Self::Wishlists,
            Self::Wishlists => Self::Itinerary,
            Self::Itinerary => Self::Search,
        }
    }
}

/// Everything the user can ask for. Each variant is handled by exactly one
/// method reached through [`App::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A file path to upload, or an `http(s)://` URL to look up.
    Search(String),
    /// Store the last unrecognized upload under a place name.
    RegisterImage(String),
    SwitchSection(Section),
    OpenWishlists,
    /// Open the wishlist picker to save the current result.
    OpenPicker,
    PickWishlist(String),
    OpenWishlistDetail(String),
    CreateWishlist(String),
    RequestDeleteWishlist(String),
    RequestRemovePlace { wishlist: String, place: String },
    Confirm,
    CancelConfirm,
    BackToList,
    CloseWishlists,
    PlanItinerary(String),
    ChooseDuration(usize),
    SetCity(String),
    SetDepartureDate(String),
    StepBack,
    ShowCards,
    Tick,
}

impl Action {
    /// Label shown while the action waits on the network.
    pub fn busy_label(&self) -> Option<&'static str> {
        match self {
            Self::Search(_) => Some("Detecting the place..."),
            Self::RegisterImage(_) => Some("Registering image..."),
            Self::OpenWishlists
            | Self::OpenPicker
            | Self::PlanItinerary(_)
            | Self::SwitchSection(Section::Wishlists) => Some("Loading wishlists..."),
            Self::OpenWishlistDetail(_) => Some("Loading wishlist..."),
            Self::PickWishlist(_) | Self::CreateWishlist(_) | Self::Confirm => Some("Saving..."),
            Self::ShowCards | Self::SetDepartureDate(_) => Some("Loading cards..."),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub search: SearchState,
    pub wishlists: WishlistsState,
    pub confirm: Option<ConfirmAction>,
    pub itinerary: ItineraryState,
    pub toast: Option<ToastState>,
    pub help: bool,
    pub busy: Option<&'static str>,
    pub base_url: String,
    pub local: LocalState,
}

impl AppState {
    pub fn new(base_url: &str, local: LocalState) -> Self {
        Self {
            section: Section::Search,
            search: SearchState::default(),
            wishlists: WishlistsState::default(),
            confirm: None,
            itinerary: ItineraryState::default(),
            toast: None,
            help: false,
            busy: None,
            base_url: base_url.to_string(),
            local,
        }
    }
}

pub struct App<B: Backend = Client> {
    config: AppConfig,
    backend: B,
    pub state: AppState,
    should_quit: bool,
}

impl App<Client> {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let local = LocalState::load(&config.state_file).unwrap_or_else(|err| {
            tracing::warn!(path = %config.state_file, %err, "ignoring unreadable local state");
            LocalState::default()
        });
        Ok(Self::with_backend(config, client, local))
    }
}

impl<B: Backend> App<B> {
    pub fn with_backend(config: AppConfig, backend: B, local: LocalState) -> Self {
        let state = AppState::new(&config.base_url, local);
        Self {
            config,
            backend,
            state,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.apply(Action::Tick).await;
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if !event::poll(tick_rate)? {
                continue;
            }

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(action) = self.handle_key(key) else {
                continue;
            };

            if let Some(label) = action.busy_label() {
                self.state.busy = Some(label);
                terminal
                    .draw(|frame| ui::render(frame, &self.state))
                    .map_err(|err| AppError::Terminal(err.to_string()))?;
                self.apply(action).await;
                self.state.busy = None;
                // Input typed while the request was in flight is dropped,
                // like clicks on a disabled button.
                while event::poll(Duration::ZERO)? {
                    let _ = event::read()?;
                }
            } else {
                self.apply(action).await;
            }
        }

        Ok(())
    }

    /// Single update entry point.
    ///
    /// Network failures never escape: they become a toast and leave the
    /// state as it was before the action.
    pub async fn apply(&mut self, action: Action) {
        if action != Action::Tick {
            tracing::debug!(?action, "apply");
        }
        match action {
            Action::Search(input) => self.search(&input).await,
            Action::RegisterImage(place) => self.register_image(&place).await,
            Action::SwitchSection(section) => self.switch_section(section).await,
            Action::OpenWishlists => self.open_wishlists(PickerPurpose::Browse).await,
            Action::OpenPicker => self.open_picker().await,
            Action::PickWishlist(name) => self.pick_wishlist(&name).await,
            Action::OpenWishlistDetail(name) => self.open_wishlist_detail(&name).await,
            Action::CreateWishlist(name) => self.create_wishlist(&name).await,
            Action::RequestDeleteWishlist(name) => {
                self.state.confirm = Some(ConfirmAction::DeleteWishlist(name));
            }
            Action::RequestRemovePlace { wishlist, place } => {
                self.state.confirm = Some(ConfirmAction::RemovePlace { wishlist, place });
            }
            Action::Confirm => self.confirm().await,
            Action::CancelConfirm => self.state.confirm = None,
            Action::BackToList => self.state.wishlists.back_to_list(),
            Action::CloseWishlists => {
                self.state.wishlists.close();
                if self.state.section == Section::Wishlists {
                    self.state.section = Section::Search;
                }
            }
            Action::PlanItinerary(name) => self.plan_itinerary(&name).await,
            Action::ChooseDuration(index) => self.state.itinerary.form.choose_duration(index),
            Action::SetCity(city) => self.state.itinerary.set_city(&city),
            Action::SetDepartureDate(raw) => self.set_departure_date(&raw).await,
            Action::StepBack => self.state.itinerary.form.back(),
            Action::ShowCards => self.show_cards().await,
            Action::Tick => self.on_frame(Instant::now()),
        }
    }

    /// Housekeeping done before every draw, whether or not input arrived.
    pub(crate) fn on_frame(&mut self, now: Instant) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| toast.is_expired(now))
        {
            self.state.toast = None;
        }
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState::new(level, message));
    }

    fn save_local_state(&self) {
        if let Err(err) = self.state.local.save(&self.config.state_file) {
            tracing::warn!(path = %self.config.state_file, %err, "failed to save local state");
        }
    }
}

pub(crate) fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => "Access denied.".to_string(),
        ClientError::NotFound => "Not found.".to_string(),
        ClientError::Conflict(message) => format!("Conflict: {message}"),
        ClientError::Validation(message) => format!("Invalid request: {message}"),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Decode(message) => format!("Unexpected response: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
    }
}
