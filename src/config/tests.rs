use super::builder::{default_config, update_config_file};
use super::loading::parse_config;
use super::validation::validate_config;
use super::watcher::affects_config;
use super::*;
use crate::common::constants::test_constants::*;
use crate::common::constants::{MAXIMUM_ANGLE, MINIMUM_POLL_INTERVAL_SECS};
use crate::prayer::method::{CalculationMethod, Madhab};
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn create_test_config(fajr_angle: Option<f64>, isha_angle: Option<f64>) -> Config {
    Config {
        latitude: Some(TEST_LATITUDE),
        longitude: Some(TEST_LONGITUDE),
        timezone: Some(TEST_TIMEZONE.to_string()),
        method: Some(CalculationMethod::NorthAmerica),
        fajr_angle,
        isha_angle,
        ..Config::default()
    }
}

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, body).unwrap();
    path
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("adhan-clock").join("config.json");

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let result = Config::load();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    let config = result.unwrap();
    assert!(config_path.exists());
    assert_eq!(config.method, Some(CalculationMethod::NorthAmerica));
    assert_eq!(config.tolerance_secs, Some(30));
    assert_eq!(config.cooldown_secs, Some(120));
    assert_eq!(config.poll_interval_secs, Some(10));
}

#[test]
fn test_config_validation_basic() {
    let config = create_test_config(Some(TEST_FAJR_ANGLE), Some(TEST_ISHA_ANGLE));
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_config_validation_rejects_negative_angle() {
    let config = create_test_config(Some(-1.0), Some(TEST_ISHA_ANGLE));
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("fajr_angle"), "{err}");

    let config = create_test_config(Some(TEST_FAJR_ANGLE), Some(MAXIMUM_ANGLE + 0.5));
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_config_validation_angle_bounds_inclusive() {
    let config = create_test_config(Some(0.0), Some(MAXIMUM_ANGLE));
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_config_validation_coordinates() {
    let mut config = create_test_config(None, None);
    config.latitude = Some(90.5);
    assert!(validate_config(&config).is_err());

    let mut config = create_test_config(None, None);
    config.longitude = Some(-180.1);
    assert!(validate_config(&config).is_err());

    let mut config = create_test_config(None, None);
    config.latitude = Some(-90.0);
    config.longitude = Some(180.0);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_config_validation_timezone() {
    let mut config = create_test_config(None, None);
    config.timezone = Some("Mars/Olympus_Mons".to_string());
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("timezone"), "{err}");
}

#[test]
fn test_config_validation_cooldown_shorter_than_tolerance() {
    let mut config = create_test_config(None, None);
    config.tolerance_secs = Some(60);
    config.cooldown_secs = Some(59);
    assert!(validate_config(&config).is_err());

    config.cooldown_secs = Some(60);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_config_validation_poll_interval() {
    let mut config = create_test_config(None, None);
    config.poll_interval_secs = Some(MINIMUM_POLL_INTERVAL_SECS - 1);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_parse_rejects_unknown_fields_and_bad_json() {
    assert!(parse_config(r#"{"latitude": 1.0, "colour": "red"}"#).is_err());
    assert!(parse_config(r#"{"latitude": "north"}"#).is_err());
    assert!(parse_config("{ not json").is_err());
    assert_eq!(parse_config("   ").unwrap(), Config::default());
}

#[test]
fn test_load_from_path_applies_defaults() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        r#"{"latitude": 21.4225, "longitude": 39.8262, "timezone": "Asia/Riyadh"}"#,
    );

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.latitude, Some(21.4225));
    assert_eq!(config.madhab, Some(Madhab::Shafi));
    assert_eq!(config.location_lookup, Some(true));
    // Angles stay with the method
    assert_eq!(config.fajr_angle, None);
    assert_eq!(config.calculation_params().fajr_angle, 15.0);
}

#[test]
fn test_load_from_path_rejects_invalid_values() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), r#"{"isha_angle": -3}"#);
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_load_from_missing_path_fails() {
    let temp_dir = tempdir().unwrap();
    assert!(load_from_path(&temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_method_angles_with_explicit_override() {
    let mut config = create_test_config(Some(16.5), None);
    config.method = Some(CalculationMethod::MuslimWorldLeague);
    let params = config.calculation_params();
    assert_eq!(params.fajr_angle, 16.5);
    assert_eq!(params.isha_angle, 17.0);
}

#[test]
fn test_set_round_trips_through_load() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    save_config(&path, &default_config()).unwrap();

    let changes = vec![
        ("method".to_string(), "umm_al_qura".to_string()),
        ("latitude".to_string(), "21.4225".to_string()),
        ("longitude".to_string(), "39.8262".to_string()),
        ("timezone".to_string(), "Asia/Riyadh".to_string()),
        ("madhab".to_string(), "hanafi".to_string()),
        ("sound".to_string(), "off".to_string()),
    ];
    update_config_file(&path, &changes).unwrap();

    let loaded = load_from_path(&path).unwrap();
    assert_eq!(loaded.method, Some(CalculationMethod::UmmAlQura));
    assert_eq!(loaded.latitude, Some(21.4225));
    assert_eq!(loaded.timezone.as_deref(), Some("Asia/Riyadh"));
    assert_eq!(loaded.madhab, Some(Madhab::Hanafi));
    assert!(!loaded.sound_enabled());
    assert_eq!(loaded.calculation_params().isha_interval, Some(90));
}

#[test]
fn test_set_invalid_value_leaves_file_untouched() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    save_config(&path, &default_config()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let bad_range = vec![("fajr_angle".to_string(), "45".to_string())];
    assert!(update_config_file(&path, &bad_range).is_err());

    let bad_field = vec![("colour".to_string(), "red".to_string())];
    assert!(update_config_file(&path, &bad_field).is_err());

    let bad_type = vec![("tolerance_secs".to_string(), "soon".to_string())];
    assert!(update_config_file(&path, &bad_type).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_saved_file_is_plain_json_object() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");
    save_config(&path, &default_config()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["method"], "NORTH_AMERICA");
    assert_eq!(value["madhab"], "shafi");
    assert_eq!(value["high_latitude_rule"], "middle_of_the_night");
    assert!(value.get("sound_player").is_none());
}

#[test]
fn test_static_location_uses_configured_timezone() {
    let config = create_test_config(None, None);
    let location = config.static_location();
    assert_eq!(location.latitude, TEST_LATITUDE);
    assert_eq!(location.timezone, chrono_tz::America::New_York);
    assert_eq!(location.city, None);
}

#[test]
fn test_watcher_matches_editor_temp_files() {
    let config = std::path::Path::new("/home/u/.config/adhan-clock/config.json");
    assert!(affects_config(config, config));
    assert!(affects_config(
        std::path::Path::new("/home/u/.config/adhan-clock/config.json.swp"),
        config
    ));
    assert!(!affects_config(
        std::path::Path::new("/home/u/.config/adhan-clock/makkah_adhan.mp3"),
        config
    ));
    assert!(!affects_config(
        std::path::Path::new("/tmp/config.json"),
        config
    ));
}
