//! Calculation methods and the parameter set they resolve to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named convention for the twilight angles that define Fajr and Isha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMethod {
    /// Used by ISNA in older publications. Fajr 15°, Isha 15°.
    NorthAmerica,
    /// Muslim World League. Fajr 18°, Isha 17°.
    MuslimWorldLeague,
    /// Islamic Society of North America. Fajr 15°, Isha 15°.
    Isna,
    /// Umm al-Qura University, Makkah. Fajr 18.5°, Isha 90 minutes after Maghrib.
    UmmAlQura,
    /// Egyptian General Authority of Survey. Fajr 19.5°, Isha 17.5°.
    Egyptian,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 5] = [
        CalculationMethod::NorthAmerica,
        CalculationMethod::MuslimWorldLeague,
        CalculationMethod::Isna,
        CalculationMethod::UmmAlQura,
        CalculationMethod::Egyptian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMethod::NorthAmerica => "NORTH_AMERICA",
            CalculationMethod::MuslimWorldLeague => "MUSLIM_WORLD_LEAGUE",
            CalculationMethod::Isna => "ISNA",
            CalculationMethod::UmmAlQura => "UMM_AL_QURA",
            CalculationMethod::Egyptian => "EGYPTIAN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn fajr_angle(&self) -> f64 {
        match self {
            CalculationMethod::NorthAmerica | CalculationMethod::Isna => 15.0,
            CalculationMethod::MuslimWorldLeague => 18.0,
            CalculationMethod::UmmAlQura => 18.5,
            CalculationMethod::Egyptian => 19.5,
        }
    }

    pub fn isha_angle(&self) -> f64 {
        match self {
            CalculationMethod::NorthAmerica | CalculationMethod::Isna => 15.0,
            CalculationMethod::MuslimWorldLeague => 17.0,
            CalculationMethod::UmmAlQura => 0.0,
            CalculationMethod::Egyptian => 17.5,
        }
    }

    /// Fixed Isha offset after Maghrib in minutes, for methods that use one.
    pub fn isha_interval(&self) -> Option<u32> {
        match self {
            CalculationMethod::UmmAlQura => Some(90),
            _ => None,
        }
    }

    /// Per-prayer minute adjustments published with the method.
    pub fn adjustments(&self) -> Adjustments {
        match self {
            CalculationMethod::NorthAmerica
            | CalculationMethod::Isna
            | CalculationMethod::MuslimWorldLeague
            | CalculationMethod::Egyptian => Adjustments {
                dhuhr: 1,
                ..Adjustments::default()
            },
            CalculationMethod::UmmAlQura => Adjustments::default(),
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// School of jurisprudence, which sets the Asr shadow length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Madhab {
    Shafi,
    Hanafi,
}

impl Madhab {
    /// Shadow length as a multiple of object height at which Asr begins.
    pub fn shadow_factor(&self) -> f64 {
        match self {
            Madhab::Shafi => 1.0,
            Madhab::Hanafi => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Madhab::Shafi => "shafi",
            Madhab::Hanafi => "hanafi",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shafi" => Some(Madhab::Shafi),
            "hanafi" => Some(Madhab::Hanafi),
            _ => None,
        }
    }
}

/// Bound applied to Fajr and Isha when twilight is too short or never ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighLatitudeRule {
    /// Fajr no earlier than the middle of the night, Isha no later.
    MiddleOfTheNight,
    /// Fajr within the last seventh of the night, Isha within the first.
    SeventhOfTheNight,
    /// Night portion proportional to the twilight angle (angle / 60).
    TwilightAngle,
}

impl HighLatitudeRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighLatitudeRule::MiddleOfTheNight => "middle_of_the_night",
            HighLatitudeRule::SeventhOfTheNight => "seventh_of_the_night",
            HighLatitudeRule::TwilightAngle => "twilight_angle",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "middle_of_the_night" => Some(HighLatitudeRule::MiddleOfTheNight),
            "seventh_of_the_night" => Some(HighLatitudeRule::SeventhOfTheNight),
            "twilight_angle" => Some(HighLatitudeRule::TwilightAngle),
            _ => None,
        }
    }

    /// Fraction of the night allowed between Fajr and sunrise (or Maghrib and Isha).
    pub fn night_portion(&self, angle: f64) -> f64 {
        match self {
            HighLatitudeRule::MiddleOfTheNight => 1.0 / 2.0,
            HighLatitudeRule::SeventhOfTheNight => 1.0 / 7.0,
            HighLatitudeRule::TwilightAngle => angle / 60.0,
        }
    }
}

/// Minute offsets added to each computed time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    #[serde(default)]
    pub fajr: i32,
    #[serde(default)]
    pub dhuhr: i32,
    #[serde(default)]
    pub asr: i32,
    #[serde(default)]
    pub maghrib: i32,
    #[serde(default)]
    pub isha: i32,
}

/// Fully resolved calculation parameters handed to the time provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationParams {
    pub method: CalculationMethod,
    pub fajr_angle: f64,
    pub isha_angle: f64,
    pub isha_interval: Option<u32>,
    pub madhab: Madhab,
    pub high_latitude_rule: HighLatitudeRule,
    pub adjustments: Adjustments,
}

impl CalculationParams {
    /// Parameters of a method with its published angles.
    pub fn for_method(method: CalculationMethod) -> Self {
        Self {
            method,
            fajr_angle: method.fajr_angle(),
            isha_angle: method.isha_angle(),
            isha_interval: method.isha_interval(),
            madhab: Madhab::Shafi,
            high_latitude_rule: HighLatitudeRule::MiddleOfTheNight,
            adjustments: method.adjustments(),
        }
    }

    /// Override the method's twilight angles.
    ///
    /// An explicit Isha angle replaces a fixed Isha interval.
    pub fn with_angles(mut self, fajr_angle: Option<f64>, isha_angle: Option<f64>) -> Self {
        if let Some(angle) = fajr_angle {
            self.fajr_angle = angle;
        }
        if let Some(angle) = isha_angle {
            self.isha_angle = angle;
            self.isha_interval = None;
        }
        self
    }

    pub fn with_madhab(mut self, madhab: Madhab) -> Self {
        self.madhab = madhab;
        self
    }

    pub fn with_high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self {
        self.high_latitude_rule = rule;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_round_trip() {
        for method in CalculationMethod::ALL {
            assert_eq!(CalculationMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(
            CalculationMethod::parse("muslim_world_league"),
            Some(CalculationMethod::MuslimWorldLeague)
        );
        assert_eq!(CalculationMethod::parse("KARACHI"), None);
    }

    #[test]
    fn test_method_serde_uses_config_spelling() {
        let json = serde_json::to_string(&CalculationMethod::UmmAlQura).unwrap();
        assert_eq!(json, "\"UMM_AL_QURA\"");
        let parsed: CalculationMethod = serde_json::from_str("\"NORTH_AMERICA\"").unwrap();
        assert_eq!(parsed, CalculationMethod::NorthAmerica);
    }

    #[test]
    fn test_explicit_angles_override_method() {
        let params = CalculationParams::for_method(CalculationMethod::MuslimWorldLeague)
            .with_angles(Some(16.0), None);
        assert_eq!(params.fajr_angle, 16.0);
        assert_eq!(params.isha_angle, 17.0);
    }

    #[test]
    fn test_isha_angle_replaces_interval() {
        let base = CalculationParams::for_method(CalculationMethod::UmmAlQura);
        assert_eq!(base.isha_interval, Some(90));

        let overridden = base.with_angles(None, Some(18.0));
        assert_eq!(overridden.isha_interval, None);
        assert_eq!(overridden.isha_angle, 18.0);
    }

    #[test]
    fn test_night_portions() {
        assert_eq!(HighLatitudeRule::MiddleOfTheNight.night_portion(18.0), 0.5);
        assert_eq!(HighLatitudeRule::SeventhOfTheNight.night_portion(18.0), 1.0 / 7.0);
        assert_eq!(HighLatitudeRule::TwilightAngle.night_portion(18.0), 0.3);
    }
}
