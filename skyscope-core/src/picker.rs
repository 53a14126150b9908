//! Location picking: map taps, text search and query suggestions.
//!
//! `MapLoading -> Interactive -> LocationChosen -> Confirmed`. The mode
//! chosen at construction decides what confirming does: create a favorite,
//! or store the coordinate as the one-time location.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    error::SkyError,
    model::{Coordinate, FavoriteId},
    view::{Collaborators, Destination, Notice, ViewScope},
};

pub const INITIAL_CENTER: Coordinate = Coordinate {
    lat: 30.0,
    lon: 30.0,
};
pub const WORLD_ZOOM: f32 = 1.0;
pub const PLACE_ZOOM: f32 = 10.0;
pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Favorite,
    OneTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    MapLoading,
    Interactive,
    LocationChosen,
    Confirmed(Destination),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Coordinate,
    pub zoom: f32,
}

#[derive(Debug)]
pub struct LocationPicker {
    deps: Collaborators,
    mode: PickerMode,
    scope: ViewScope,
    state: PickerState,
    candidate: Coordinate,
    marker: Option<Coordinate>,
    camera: Camera,
    suggestions: Vec<String>,
    created: Option<FavoriteId>,
    notices: Vec<Notice>,
}

impl LocationPicker {
    pub fn new(deps: Collaborators, mode: PickerMode, scope: ViewScope) -> Self {
        Self {
            deps,
            mode,
            scope,
            state: PickerState::MapLoading,
            candidate: INITIAL_CENTER,
            marker: None,
            camera: Camera {
                center: INITIAL_CENTER,
                zoom: WORLD_ZOOM,
            },
            suggestions: Vec::new(),
            created: None,
            notices: Vec::new(),
        }
    }

    pub fn mode(&self) -> PickerMode {
        self.mode
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn candidate(&self) -> Coordinate {
        self.candidate
    }

    pub fn marker(&self) -> Option<Coordinate> {
        self.marker
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn confirm_visible(&self) -> bool {
        self.state == PickerState::LocationChosen
    }

    /// Id of the favorite created on confirmation, if any.
    pub fn created_favorite(&self) -> Option<FavoriteId> {
        self.created
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn back(&self) -> Destination {
        match self.mode {
            PickerMode::Favorite => Destination::Favorites,
            PickerMode::OneTime => Destination::Home,
        }
    }

    pub fn map_ready(&mut self) {
        if self.state != PickerState::MapLoading {
            return;
        }
        self.camera = Camera {
            center: self.candidate,
            zoom: WORLD_ZOOM,
        };
        self.state = PickerState::Interactive;
        debug!(mode = ?self.mode, "map ready");
    }

    fn accepts_input(&self, what: &str) -> bool {
        match self.state {
            PickerState::Interactive | PickerState::LocationChosen => true,
            state => {
                warn!(?state, "ignoring {what}");
                false
            }
        }
    }

    fn choose(&mut self, coord: Coordinate) {
        self.candidate = coord;
        self.marker = Some(coord);
        self.camera = Camera {
            center: coord,
            zoom: PLACE_ZOOM,
        };
        self.state = PickerState::LocationChosen;
        debug!(%coord, "location chosen");
    }

    /// A tap on the map.
    pub fn tap(&mut self, coord: Coordinate) -> Result<(), SkyError> {
        let coord = Coordinate::validated(coord.lat, coord.lon)?;
        if self.accepts_input("map tap") {
            self.choose(coord);
        }
        Ok(())
    }

    /// Full-text search submission; the first match wins.
    pub async fn submit_query(&mut self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() || !self.accepts_input("search") {
            return Ok(());
        }
        self.resolve_first(query).await
    }

    /// Query-as-you-type: refresh up to three suggestions.
    pub async fn query_changed(&mut self, text: &str) -> Result<&[String]> {
        let text = text.trim();
        if text.is_empty() || !self.accepts_input("query change") {
            return Ok(&self.suggestions);
        }

        let language = self.deps.preferences.language()?;
        let places = self
            .deps
            .geocoder
            .forward_geocode(text, language, MAX_SUGGESTIONS)
            .await?;
        if !self.scope.is_live() {
            debug!("picker closed, discarding suggestions");
            return Ok(&self.suggestions);
        }

        self.suggestions = places
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|p| p.address_line)
            .collect();
        Ok(&self.suggestions)
    }

    /// Re-resolve a suggestion's address line into a single coordinate.
    pub async fn select_suggestion(&mut self, index: usize) -> Result<()> {
        let Some(address) = self.suggestions.get(index).cloned() else {
            warn!(index, available = self.suggestions.len(), "no such suggestion");
            return Ok(());
        };
        if !self.accepts_input("suggestion") {
            return Ok(());
        }

        self.resolve_first(&address).await?;
        self.suggestions.clear();
        Ok(())
    }

    async fn resolve_first(&mut self, query: &str) -> Result<()> {
        let language = self.deps.preferences.language()?;
        let places = self
            .deps
            .geocoder
            .forward_geocode(query, language, 1)
            .await?;
        if !self.scope.is_live() {
            debug!(query, "picker closed, discarding geocoding result");
            return Ok(());
        }

        match places.into_iter().next() {
            Some(place) => self.choose(place.coordinate),
            None => {
                debug!(query, "no geocoding results");
                self.notices.push(Notice::NoResults);
            }
        }
        Ok(())
    }

    /// Confirm the chosen location. Returns where to navigate, or `None`
    /// when the favorite couldn't be created.
    pub async fn confirm(&mut self) -> Result<Option<Destination>> {
        match self.state {
            PickerState::LocationChosen => {}
            PickerState::Confirmed(_) => {
                warn!("picker already confirmed");
                return Ok(None);
            }
            PickerState::MapLoading | PickerState::Interactive => {
                return Err(SkyError::NoLocationChosen.into());
            }
        }

        let coord = self.candidate;
        let destination = match self.mode {
            PickerMode::Favorite => {
                let language = self.deps.preferences.language()?;
                let unit_system = self.deps.preferences.unit_system()?;

                let created = self
                    .deps
                    .repository
                    .create_favorite(coord, language, unit_system)
                    .await;
                match created {
                    Ok(id) => {
                        info!(%id, %coord, "favorite saved");
                        self.created = Some(id);
                        Destination::Favorites
                    }
                    Err(e) => {
                        warn!(%coord, "failed to create favorite: {e:#}");
                        if self.scope.is_live() {
                            self.notices.push(Notice::FavoriteFailed(e.to_string()));
                        }
                        return Ok(None);
                    }
                }
            }
            PickerMode::OneTime => {
                self.deps.preferences.set_coordinate(coord)?;
                info!(%coord, "one-time location saved");
                Destination::Home
            }
        };

        if !self.scope.is_live() {
            debug!("picker closed before navigation");
            return Ok(None);
        }

        self.state = PickerState::Confirmed(destination);
        Ok(Some(destination))
    }
}
