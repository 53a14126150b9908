use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Parser, Subcommand};
use inquire::{Confirm, Select, Text};

use skyscope_core::{
    Config, Coordinate, FavoriteArgs, FavoriteId, FavoriteViewState, FavoriteWeatherView, Language,
    LocationPicker, PickerMode, SkyError, UnitSystem, ViewScope,
};

use crate::{app, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyscope", version, about = "SkyScope weather CLI")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key, units and language interactively.
    Configure,

    /// Show or change unit system and language.
    Settings {
        /// metric, imperial or standard.
        #[arg(long)]
        units: Option<UnitSystem>,

        /// en or ar.
        #[arg(long)]
        lang: Option<Language>,
    },

    /// Pick a location, either as a new favorite or as the one-time location.
    #[command(group(ArgGroup::new("input").required(true).args(["at", "search", "suggest"])))]
    Pick {
        /// Save the location as a favorite instead of the one-time location.
        #[arg(long)]
        favorite: bool,

        /// Coordinate as "LAT,LON".
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        at: Option<Coordinate>,

        /// Place name; the first match is used.
        #[arg(long)]
        search: Option<String>,

        /// Partial place name; choose among up to three suggestions.
        #[arg(long)]
        suggest: Option<String>,

        /// Confirm without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// List saved favorites.
    Favorites,

    /// Show weather for a saved favorite.
    Show {
        id: u32,

        /// Skip the network and use cached weather.
        #[arg(long)]
        offline: bool,
    },

    /// Delete a saved favorite.
    Remove { id: u32 },
}

fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude '{lon}': {e}"))?;
    Coordinate::validated(lat, lon).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Settings { units, lang } => settings(units, lang),
            Command::Pick { favorite, at, search, suggest, yes } => {
                let mode = if favorite {
                    PickerMode::Favorite
                } else {
                    PickerMode::OneTime
                };
                let input = match (at, search, suggest) {
                    (Some(coord), _, _) => PickInput::At(coord),
                    (_, Some(query), _) => PickInput::Search(query),
                    (_, _, Some(text)) => PickInput::Suggest(text),
                    (None, None, None) => {
                        unreachable!("clap requires one of --at/--search/--suggest")
                    }
                };
                pick(mode, input, yes).await
            }
            Command::Favorites => {
                let deps = app::collaborators(true)?;
                render::favorites(&deps.repository.favorites().await?);
                Ok(())
            }
            Command::Show { id, offline } => show(FavoriteId(id), offline).await,
            Command::Remove { id } => {
                let deps = app::collaborators(true)?;
                let id = FavoriteId(id);
                if !deps.repository.delete_favorite(id).await? {
                    return Err(SkyError::UnknownFavorite(id).into());
                }
                println!("Removed favorite {id}.");
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_default(config.api_key().unwrap_or_default())
        .prompt()
        .context("Configuration cancelled")?;
    config.set_api_key(api_key.trim().to_string());

    let prefs = app::preferences()?;
    let current_units = prefs.unit_system().unwrap_or_default();
    let current_language = prefs.language().unwrap_or_default();

    let units = Select::new("Unit system:", UnitSystem::all().to_vec())
        .with_starting_cursor(position(UnitSystem::all(), current_units))
        .prompt()
        .context("Configuration cancelled")?;
    let language = Select::new("Language:", Language::all().to_vec())
        .with_starting_cursor(position(Language::all(), current_language))
        .prompt()
        .context("Configuration cancelled")?;

    config.save()?;
    prefs.set_unit_system(units)?;
    prefs.set_language(language)?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn position<T: PartialEq>(options: &[T], current: T) -> usize {
    options.iter().position(|o| *o == current).unwrap_or(0)
}

fn settings(units: Option<UnitSystem>, lang: Option<Language>) -> anyhow::Result<()> {
    let prefs = app::preferences()?;
    if let Some(units) = units {
        prefs.set_unit_system(units)?;
    }
    if let Some(lang) = lang {
        prefs.set_language(lang)?;
    }

    println!("units:    {}", prefs.unit_system()?);
    println!("language: {}", prefs.language()?);
    match prefs.last_location() {
        Some(coord) => println!("location: {coord}"),
        None => println!("location: not set"),
    }
    Ok(())
}

enum PickInput {
    At(Coordinate),
    Search(String),
    Suggest(String),
}

async fn pick(mode: PickerMode, input: PickInput, yes: bool) -> anyhow::Result<()> {
    let deps = app::collaborators(false)?;
    let (scope, _guard) = ViewScope::open();
    let mut picker = LocationPicker::new(deps, mode, scope);
    picker.map_ready();

    match input {
        PickInput::At(coord) => picker.tap(coord)?,
        PickInput::Search(query) => picker.submit_query(&query).await?,
        PickInput::Suggest(text) => {
            let suggestions = picker.query_changed(&text).await?.to_vec();
            if suggestions.is_empty() {
                println!("No suggestions for '{text}'.");
                return Ok(());
            }
            let chosen = Select::new("Did you mean:", suggestions)
                .raw_prompt()
                .context("Selection cancelled")?;
            picker.select_suggestion(chosen.index).await?;
        }
    }
    render::notices(&picker.take_notices());

    if !picker.confirm_visible() {
        return Ok(());
    }

    let coord = picker.candidate();
    if !yes {
        let ok = Confirm::new(&format!("Use {coord}?"))
            .with_default(true)
            .prompt()
            .context("Confirmation cancelled")?;
        if !ok {
            return Ok(());
        }
    }

    let destination = picker.confirm().await?;
    render::notices(&picker.take_notices());
    if let Some(destination) = destination {
        if let Some(id) = picker.created_favorite() {
            println!("Favorite {id} at {coord}.");
        }
        render::destination(destination);
    }
    Ok(())
}

async fn show(id: FavoriteId, offline: bool) -> anyhow::Result<()> {
    let deps = app::collaborators(offline)?;
    let favorite = deps
        .repository
        .favorite(id)
        .await?
        .ok_or(SkyError::UnknownFavorite(id))?;

    let (scope, _guard) = ViewScope::open();
    let mut view = FavoriteWeatherView::new(deps, scope);
    let args = FavoriteArgs {
        id,
        coordinate: Some(favorite.coordinate),
    };
    let state = view.load(args, Utc::now()).await?.clone();
    render::notices(&view.take_notices());

    if let FavoriteViewState::Displayed(display) = state {
        render::weather(&display);
    }
    Ok(())
}
