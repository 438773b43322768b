//! Location resolution through IP geolocation with a static fallback.
//!
//! A single lookup is made against ip-api.com. Whatever goes wrong
//! (transport, status, body, fields) is captured as a [`LookupError`] and the
//! configured coordinates are used instead, so resolution itself never fails.

use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::common::constants::{GEOLOCATION_TIMEOUT_SECS, GEOLOCATION_URL};
use crate::config::Config;

/// Coordinates and timezone the schedule is computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
    pub city: Option<String>,
}

impl Location {
    /// Human-readable label, e.g. `New York (40.7128°, -74.0060°)`.
    pub fn label(&self) -> String {
        let coords = format!("{:.4}°, {:.4}°", self.latitude, self.longitude);
        match &self.city {
            Some(city) => format!("{city} ({coords})"),
            None => coords,
        }
    }
}

/// Why a live lookup did not produce a location.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("service reported failure: {0}")]
    Failed(String),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
    #[error("coordinates out of range: {0}, {1}")]
    InvalidCoordinates(f64, f64),
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
}

/// Where the resolved location came from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Live,
    Fallback { reason: LookupError },
    /// Lookup disabled in the configuration
    Configured,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub location: Location,
    pub source: LocationSource,
}

/// Raw ip-api.com response body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeoResponse {
    pub status: String,
    pub message: Option<String>,
    pub query: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl GeoResponse {
    /// Validate the response into a [`Location`].
    pub fn into_location(self) -> Result<Location, LookupError> {
        if self.status != "success" {
            return Err(LookupError::Failed(
                self.message.unwrap_or_else(|| format!("status `{}`", self.status)),
            ));
        }

        let latitude = self.lat.ok_or(LookupError::MissingField("lat"))?;
        let longitude = self.lon.ok_or(LookupError::MissingField("lon"))?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LookupError::InvalidCoordinates(latitude, longitude));
        }

        let tz_name = self.timezone.ok_or(LookupError::MissingField("timezone"))?;
        let timezone = tz_name
            .parse::<Tz>()
            .map_err(|_| LookupError::UnknownTimezone(tz_name.clone()))?;

        Ok(Location {
            latitude,
            longitude,
            timezone,
            city: self.city.filter(|c| !c.trim().is_empty()),
        })
    }
}

/// Parse an ip-api.com body.
pub fn parse_response(body: &str) -> Result<GeoResponse, LookupError> {
    serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))
}

/// Seam over the geolocation service.
#[cfg_attr(test, mockall::automock)]
pub trait GeoLookup {
    fn lookup(&self) -> Result<GeoResponse, LookupError>;
}

/// Blocking client for ip-api.com.
pub struct IpApiClient {
    agent: ureq::Agent,
    url: String,
}

impl IpApiClient {
    pub fn new() -> Self {
        Self::with_url(GEOLOCATION_URL)
    }

    pub fn with_url(url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(GEOLOCATION_TIMEOUT_SECS))
            .build();
        Self {
            agent,
            url: url.to_string(),
        }
    }
}

impl Default for IpApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoLookup for IpApiClient {
    fn lookup(&self) -> Result<GeoResponse, LookupError> {
        let response = self.agent.get(&self.url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => LookupError::Status(code),
            ureq::Error::Transport(transport) => LookupError::Transport(transport.to_string()),
        })?;

        let body = response
            .into_string()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        parse_response(&body)
    }
}

/// Resolve the location to compute prayer times for.
///
/// With lookup disabled the configured location is used as is. Otherwise
/// one lookup is attempted and any failure falls back to the configuration.
pub fn resolve_location(config: &Config, lookup: &dyn GeoLookup) -> ResolvedLocation {
    let configured = config.static_location();

    if !config.location_lookup_enabled() {
        return ResolvedLocation {
            location: configured,
            source: LocationSource::Configured,
        };
    }

    match lookup.lookup().and_then(GeoResponse::into_location) {
        Ok(location) => {
            log_block_start!("Location detected: {}", location.label());
            log_indented!("Timezone: {}", location.timezone);
            ResolvedLocation {
                location,
                source: LocationSource::Live,
            }
        }
        Err(reason) => {
            log_pipe!();
            log_warning!("Geolocation unavailable: {reason}");
            log_indented!("Using configured location: {}", configured.label());
            ResolvedLocation {
                location: configured,
                source: LocationSource::Fallback { reason },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_BODY: &str = r#"{
        "status": "success",
        "country": "United States",
        "city": "New York",
        "lat": 40.7128,
        "lon": -74.006,
        "timezone": "America/New_York",
        "query": "203.0.113.7"
    }"#;

    #[test]
    fn test_parse_success() {
        let location = parse_response(SUCCESS_BODY)
            .and_then(GeoResponse::into_location)
            .unwrap();
        assert_eq!(location.latitude, 40.7128);
        assert_eq!(location.longitude, -74.006);
        assert_eq!(location.timezone, chrono_tz::America::New_York);
        assert_eq!(location.city.as_deref(), Some("New York"));
    }

    #[test]
    fn test_parse_fail_status() {
        let result = parse_response(r#"{"status":"fail","message":"reserved range"}"#)
            .and_then(GeoResponse::into_location);
        assert_eq!(result, Err(LookupError::Failed("reserved range".to_string())));

        let bare = parse_response(r#"{"status":"fail"}"#).and_then(GeoResponse::into_location);
        assert!(matches!(bare, Err(LookupError::Failed(_))));
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(parse_response("<html>"), Err(LookupError::Malformed(_))));
        assert!(matches!(parse_response("{}"), Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let missing = parse_response(r#"{"status":"success","lat":1.0,"timezone":"UTC"}"#)
            .and_then(GeoResponse::into_location);
        assert_eq!(missing, Err(LookupError::MissingField("lon")));

        let bad_tz = parse_response(
            r#"{"status":"success","lat":1.0,"lon":2.0,"timezone":"Mars/Olympus"}"#,
        )
        .and_then(GeoResponse::into_location);
        assert_eq!(bad_tz, Err(LookupError::UnknownTimezone("Mars/Olympus".to_string())));

        let out_of_range = parse_response(
            r#"{"status":"success","lat":91.0,"lon":2.0,"timezone":"UTC"}"#,
        )
        .and_then(GeoResponse::into_location);
        assert_eq!(out_of_range, Err(LookupError::InvalidCoordinates(91.0, 2.0)));
    }

    #[test]
    fn test_resolve_uses_live_result() {
        let mut lookup = MockGeoLookup::new();
        lookup
            .expect_lookup()
            .times(1)
            .returning(|| parse_response(SUCCESS_BODY));

        let resolved = resolve_location(&Config::default(), &lookup);
        assert_eq!(resolved.source, LocationSource::Live);
        assert_eq!(resolved.location.city.as_deref(), Some("New York"));
    }

    #[test]
    fn test_resolve_falls_back_on_failure() {
        let mut lookup = MockGeoLookup::new();
        lookup
            .expect_lookup()
            .times(1)
            .returning(|| Err(LookupError::Transport("connection refused".to_string())));

        let config = Config {
            latitude: Some(21.4225),
            longitude: Some(39.8262),
            timezone: Some("Asia/Riyadh".to_string()),
            ..Config::default()
        };
        let resolved = resolve_location(&config, &lookup);

        assert!(matches!(resolved.source, LocationSource::Fallback { .. }));
        assert_eq!(resolved.location.latitude, 21.4225);
        assert_eq!(resolved.location.timezone, chrono_tz::Asia::Riyadh);
        assert_eq!(resolved.location.city, None);
    }

    #[test]
    fn test_resolve_skips_lookup_when_disabled() {
        let mut lookup = MockGeoLookup::new();
        lookup.expect_lookup().never();

        let config = Config {
            location_lookup: Some(false),
            ..Config::default()
        };
        let resolved = resolve_location(&config, &lookup);
        assert_eq!(resolved.source, LocationSource::Configured);
    }
}
