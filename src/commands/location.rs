//! Implementation of the location command.
//!
//! Shows what the geolocation service reports for this machine and which
//! location the monitor would end up using.

use anyhow::Result;

use crate::config::Config;
use crate::geo::location::{GeoLookup, GeoResponse, IpApiClient, LocationSource, resolve_location};

/// Rows describing a raw lookup response.
pub fn describe_response(response: &GeoResponse) -> Vec<String> {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let coords = match (response.lat, response.lon) {
        (Some(lat), Some(lon)) => format!("{lat:.4}°, {lon:.4}°"),
        _ => "-".to_string(),
    };

    let mut rows = vec![
        format!("Status:      {}", response.status),
        format!("Public IP:   {}", field(&response.query)),
        format!("Coordinates: {coords}"),
        format!("Timezone:    {}", field(&response.timezone)),
        format!("City:        {}", field(&response.city)),
        format!("Country:     {}", field(&response.country)),
    ];
    if let Some(message) = &response.message {
        rows.push(format!("Message:     {message}"));
    }
    rows
}

/// Handle the location command.
pub fn handle_location_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let client = IpApiClient::new();

    log_block_start!("Geolocation lookup");
    match client.lookup() {
        Ok(response) => {
            for row in describe_response(&response) {
                log_indented!("{}", row);
            }
        }
        Err(e) => {
            log_pipe!();
            log_warning!("Lookup failed: {e}");
        }
    }

    // Resolution with lookup forced on, to show the fallback decision
    let forced = Config {
        location_lookup: Some(true),
        ..config.clone()
    };
    let resolved = resolve_location(&forced, &client);

    log_block_start!("Location in use: {}", resolved.location.label());
    match &resolved.source {
        LocationSource::Live => log_indented!("Source: geolocation"),
        LocationSource::Fallback { reason } => {
            log_indented!("Source: configuration fallback ({reason})");
        }
        LocationSource::Configured => log_indented!("Source: configuration"),
    }
    log_indented!("Timezone: {}", resolved.location.timezone);
    if !config.location_lookup_enabled() {
        log_pipe!();
        log_info!("location_lookup is off, the monitor uses the configured location");
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Configured fallback: {}", config.static_location().label());
    }

    log_end!();
    Ok(())
}

/// Display detailed help for the location command (help subcommand)
pub fn display_help() {
    log_version!();
    log_block_start!("location - Show the detected location");
    log_block_start!("Usage: adhan-clock location");
    log_block_start!("Description:");
    log_indented!("Queries ip-api.com once and prints the public IP, coordinates,");
    log_indented!("timezone, city and country it reports. When the lookup fails the");
    log_indented!("configured latitude, longitude and timezone are used instead.");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::location::parse_response;

    #[test]
    fn test_describe_success() {
        let response = parse_response(
            r#"{"status":"success","query":"203.0.113.7","lat":21.4225,"lon":39.8262,
                "timezone":"Asia/Riyadh","city":"Mecca","country":"Saudi Arabia"}"#,
        )
        .unwrap();
        let rows = describe_response(&response);
        assert_eq!(rows[1], "Public IP:   203.0.113.7");
        assert_eq!(rows[2], "Coordinates: 21.4225°, 39.8262°");
        assert_eq!(rows[4], "City:        Mecca");
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_describe_failure() {
        let response = parse_response(r#"{"status":"fail","message":"private range"}"#).unwrap();
        let rows = describe_response(&response);
        assert_eq!(rows[0], "Status:      fail");
        assert_eq!(rows[2], "Coordinates: -");
        assert_eq!(rows.last().unwrap(), "Message:     private range");
    }
}
