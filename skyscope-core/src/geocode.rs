//! Forward and reverse geocoding.
//! The bundled implementation talks to Nominatim (OpenStreetMap).

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{
    model::{Coordinate, LocationCoordinate},
    units::Language,
};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skyscope/", env!("CARGO_PKG_VERSION"));

/// Label used when a coordinate can't be named.
pub const UNKNOWN_PLACE: &str = "Unknown";

/// A forward-geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub coordinate: Coordinate,
    pub address_line: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Human-readable name for a coordinate, `None` if nothing matched.
    async fn reverse_geocode(
        &self,
        coord: Coordinate,
        language: Language,
    ) -> Result<Option<String>>;

    /// Best matches first, at most `max_results`.
    async fn forward_geocode(
        &self,
        query: &str,
        language: Language,
        max_results: usize,
    ) -> Result<Vec<GeocodedPlace>>;
}

/// Reverse geocode, swallowing failures into [`UNKNOWN_PLACE`].
pub async fn place_label(geocoder: &dyn Geocoder, coord: Coordinate, language: Language) -> String {
    match geocoder.reverse_geocode(coord, language).await {
        Ok(Some(name)) => name,
        Ok(None) => {
            debug!(%coord, "reverse geocode found nothing");
            UNKNOWN_PLACE.to_string()
        }
        Err(e) => {
            debug!(%coord, "reverse geocode failed: {e:#}");
            UNKNOWN_PLACE.to_string()
        }
    }
}

/// Pair a coordinate with its place label.
pub async fn locate(
    geocoder: &dyn Geocoder,
    coordinate: Coordinate,
    language: Language,
) -> LocationCoordinate {
    LocationCoordinate {
        coordinate,
        name: place_label(geocoder, coordinate, language).await,
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create geocoding client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    state: Option<String>,
    county: Option<String>,
    city: Option<String>,
    town: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimAddress {
    /// "<admin area>, <country>", degrading to whichever part exists.
    fn label(self) -> Option<String> {
        let area = self.state.or(self.county).or(self.city).or(self.town);
        match (area, self.country) {
            (Some(area), Some(country)) => Some(format!("{area}, {country}")),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        }
    }
}

impl TryFrom<NominatimPlace> for GeocodedPlace {
    type Error = anyhow::Error;

    fn try_from(place: NominatimPlace) -> Result<Self> {
        let lat = place
            .lat
            .parse()
            .with_context(|| format!("Invalid latitude in geocoding result: {}", place.lat))?;
        let lon = place
            .lon
            .parse()
            .with_context(|| format!("Invalid longitude in geocoding result: {}", place.lon))?;

        Ok(GeocodedPlace {
            coordinate: Coordinate::new(lat, lon),
            address_line: place.display_name,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse_geocode(
        &self,
        coord: Coordinate,
        language: Language,
    ) -> Result<Option<String>> {
        let url = format!("{}/reverse", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coord.lat.to_string().as_str()),
                ("lon", coord.lon.to_string().as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("zoom", "10"),
                ("accept-language", language.as_str()),
            ])
            .send()
            .await
            .context("Failed to send reverse geocoding request")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("Reverse geocoding failed with status {status}"));
        }

        let body: NominatimReverse = res
            .json()
            .await
            .context("Failed to parse reverse geocoding JSON")?;

        Ok(body.address.and_then(NominatimAddress::label))
    }

    async fn forward_geocode(
        &self,
        query: &str,
        language: Language,
        max_results: usize,
    ) -> Result<Vec<GeocodedPlace>> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", max_results.to_string().as_str()),
                ("accept-language", language.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send geocoding request for '{query}'"))?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("Geocoding '{query}' failed with status {status}"));
        }

        let places: Vec<NominatimPlace> =
            res.json().await.context("Failed to parse geocoding JSON")?;

        debug!(query, matches = places.len(), "forward geocoded");

        places
            .into_iter()
            .take(max_results)
            .map(GeocodedPlace::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    #[tokio::test]
    async fn forward_geocode_parses_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Cairo"))
            .and(query_param("limit", "3"))
            .and(query_param("accept-language", "ar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "lat": "30.0444", "lon": "31.2357", "display_name": "Cairo, Egypt" },
                { "lat": "37.0", "lon": "-89.17", "display_name": "Cairo, Illinois" }
            ])))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri()).unwrap();
        let places = geocoder.forward_geocode("Cairo", Language::Ar, 3).await.unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].coordinate, Coordinate::new(30.0444, 31.2357));
        assert_eq!(places[0].address_line, "Cairo, Egypt");
    }

    #[tokio::test]
    async fn forward_geocode_caps_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "lat": "1", "lon": "1", "display_name": "a" },
                { "lat": "2", "lon": "2", "display_name": "b" }
            ])))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri()).unwrap();
        let places = geocoder.forward_geocode("x", Language::En, 1).await.unwrap();
        assert_eq!(places.len(), 1);
    }

    #[tokio::test]
    async fn reverse_geocode_builds_area_country_label() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": { "state": "Cairo Governorate", "country": "Egypt", "city": "Cairo" }
            })))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri()).unwrap();
        let label = geocoder
            .reverse_geocode(Coordinate::new(30.04, 31.23), Language::En)
            .await
            .unwrap();
        assert_eq!(label.as_deref(), Some("Cairo Governorate, Egypt"));
    }

    #[tokio::test]
    async fn place_label_falls_back_on_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri()).unwrap();
        let label = place_label(&geocoder, Coordinate::new(0.0, 0.0), Language::En).await;
        assert_eq!(label, UNKNOWN_PLACE);
    }

    #[tokio::test]
    async fn place_label_falls_back_on_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })),
            )
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri()).unwrap();
        let label = place_label(&geocoder, Coordinate::new(0.0, -150.0), Language::En).await;
        assert_eq!(label, UNKNOWN_PLACE);
    }
}
