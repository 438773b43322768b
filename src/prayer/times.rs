//! Astronomical prayer time provider.
//!
//! Sun positions come from the `sunrise` crate. Each schedule is a pure
//! function of the location, the calculation parameters and the date.
//! Fajr and Isha are twilight depressions, Maghrib is sunset, Dhuhr is the
//! solar transit and Asr is the elevation at which a shadow reaches the
//! madhab's multiple of its noon length.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::method::CalculationParams;
use super::{DailySchedule, PrayerTimeProvider};
use crate::geo::location::Location;

/// Depression of the sun's centre at sunrise and sunset used by `sunrise`.
const SUNRISE_DEPRESSION: f64 = 5.0 / 6.0;

/// Bisection steps when searching the sun's culmination.
const CULMINATION_STEPS: usize = 40;

/// Default [`PrayerTimeProvider`] computing times from the sun's position.
#[derive(Debug, Clone)]
pub struct SolarPrayerTimes {
    location: Location,
    params: CalculationParams,
}

/// Instants of one day's solar events, before rounding and adjustments.
#[derive(Debug, Clone, Copy)]
struct SolarEvents {
    fajr: Option<DateTime<Utc>>,
    sunrise: DateTime<Utc>,
    dhuhr: DateTime<Utc>,
    asr: DateTime<Utc>,
    sunset: DateTime<Utc>,
    isha: Option<DateTime<Utc>>,
}

/// Asr elevation in degrees for a noon zenith distance and a shadow factor.
pub fn asr_elevation(noon_zenith: f64, shadow_factor: f64) -> f64 {
    (1.0 / (shadow_factor + noon_zenith.to_radians().tan()))
        .atan()
        .to_degrees()
}

impl SolarPrayerTimes {
    pub fn new(location: Location, params: CalculationParams) -> Self {
        Self { location, params }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn params(&self) -> &CalculationParams {
        &self.params
    }

    /// Local mean noon of `date` in UTC, used to tell real events from unreachable ones.
    fn mean_noon(&self, date: NaiveDate) -> DateTime<Utc> {
        let noon = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)) + Duration::hours(12);
        noon - Duration::seconds((self.location.longitude * 240.0).round() as i64)
    }

    /// Time at which the sun's elevation is `elevation` degrees, if it gets there.
    fn crossing(&self, day: &SolarDay, date: NaiveDate, elevation: f64, morning: bool) -> Option<DateTime<Utc>> {
        // `sunrise` measures the angle below the horizon; unreachable
        // elevations come back as the Unix epoch
        let time = day.event_time(SolarEvent::Elevation {
            elevation: (-elevation).to_radians(),
            morning,
        });
        ((time - self.mean_noon(date)).num_hours().abs() <= 24).then_some(time)
    }

    /// Highest elevation reached on the day, in degrees.
    ///
    /// The sun is known to reach `low`.
    fn culmination(&self, day: &SolarDay, date: NaiveDate, low: f64) -> f64 {
        let (mut low, mut high) = (low, 90.0);
        for _ in 0..CULMINATION_STEPS {
            let mid = (low + high) / 2.0;
            if self.crossing(day, date, mid, false).is_some() {
                low = mid;
            } else {
                high = mid;
            }
        }
        low
    }

    fn solar_events(&self, date: NaiveDate) -> Result<SolarEvents> {
        let coord = Coordinates::new(self.location.latitude, self.location.longitude)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid coordinates {:.4}°, {:.4}°",
                    self.location.latitude,
                    self.location.longitude
                )
            })?;
        let day = SolarDay::new(coord, date);
        let p = &self.params;

        let sunrise = self.crossing(&day, date, -SUNRISE_DEPRESSION, true);
        let sunset = self.crossing(&day, date, -SUNRISE_DEPRESSION, false);
        let (Some(sunrise), Some(sunset)) = (sunrise, sunset) else {
            anyhow::bail!(
                "The sun does not rise and set at latitude {:.4}° on {date}; prayer times cannot be computed",
                self.location.latitude
            );
        };

        let noon_zenith = 90.0 - self.culmination(&day, date, -SUNRISE_DEPRESSION);
        let asr = self
            .crossing(&day, date, asr_elevation(noon_zenith, p.madhab.shadow_factor()), false)
            .ok_or_else(|| anyhow::anyhow!("The sun never reaches Asr elevation on {date}"))?;

        let isha = match p.isha_interval {
            Some(minutes) => Some(sunset + Duration::minutes(minutes as i64)),
            None => self.crossing(&day, date, -p.isha_angle, false),
        };

        Ok(SolarEvents {
            fajr: self.crossing(&day, date, -p.fajr_angle, true),
            sunrise,
            dhuhr: sunrise + (sunset - sunrise) / 2,
            asr,
            sunset,
            isha,
        })
    }

    /// Clamp Fajr and Isha into the configured portion of the night.
    ///
    /// Also supplies them when the twilight angle is never reached.
    fn bound_high_latitude(&self, events: &SolarEvents) -> (DateTime<Utc>, DateTime<Utc>) {
        let p = &self.params;
        let night = Duration::hours(24) - (events.sunset - events.sunrise);
        let portion = |angle: f64| {
            Duration::seconds((p.high_latitude_rule.night_portion(angle) * night.num_seconds() as f64) as i64)
        };

        let fajr_portion = portion(p.fajr_angle);
        let fajr = match events.fajr {
            Some(t) if events.sunrise - t <= fajr_portion => t,
            _ => events.sunrise - fajr_portion,
        };

        let isha = match (p.isha_interval, events.isha) {
            (Some(_), Some(t)) => t,
            _ => {
                let isha_portion = portion(p.isha_angle);
                match events.isha {
                    Some(t) if t - events.sunset <= isha_portion => t,
                    _ => events.sunset + isha_portion,
                }
            }
        };

        (fajr, isha)
    }

    /// Round to the nearest minute, apply the adjustment and convert to local time.
    fn to_local(&self, time: DateTime<Utc>, adjustment_minutes: i32) -> DateTime<Tz> {
        let seconds = time.timestamp();
        let rounded = (seconds + 30).div_euclid(60) * 60;
        let minute = DateTime::from_timestamp(rounded, 0).unwrap_or(time);
        (minute + Duration::minutes(adjustment_minutes as i64)).with_timezone(&self.location.timezone)
    }
}

impl PrayerTimeProvider for SolarPrayerTimes {
    fn schedule_for(&self, date: NaiveDate) -> Result<DailySchedule> {
        let events = self.solar_events(date)?;
        let (fajr, isha) = self.bound_high_latitude(&events);

        let adj = self.params.adjustments;
        Ok(DailySchedule {
            date,
            fajr: self.to_local(fajr, adj.fajr),
            sunrise: self.to_local(events.sunrise, 0),
            dhuhr: self.to_local(events.dhuhr, adj.dhuhr),
            asr: self.to_local(events.asr, adj.asr),
            maghrib: self.to_local(events.sunset, adj.maghrib),
            isha: self.to_local(isha, adj.isha),
        })
    }

    fn timezone(&self) -> Tz {
        self.location.timezone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::*;
    use crate::prayer::method::{CalculationMethod, HighLatitudeRule, Madhab};
    use chrono::Timelike;

    fn new_york() -> Location {
        Location {
            latitude: TEST_LATITUDE,
            longitude: TEST_LONGITUDE,
            timezone: TEST_TIMEZONE.parse().unwrap(),
            city: Some("New York".to_string()),
        }
    }

    fn provider(method: CalculationMethod) -> SolarPrayerTimes {
        SolarPrayerTimes::new(new_york(), CalculationParams::for_method(method))
    }

    fn hm(time: DateTime<Tz>) -> (u32, u32) {
        (time.hour(), time.minute())
    }

    fn minutes_between(a: DateTime<Tz>, b: DateTime<Tz>) -> i64 {
        (b - a).num_minutes().abs()
    }

    #[test]
    fn test_new_york_winter_schedule() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let s = provider(CalculationMethod::Isna).schedule_for(date).unwrap();
        let tz: Tz = TEST_TIMEZONE.parse().unwrap();
        let at = |h, m| tz.with_ymd_and_hms(2025, 1, 15, h, m, 0).unwrap();

        // Published ISNA times for New York on this date, within a few minutes
        assert!(minutes_between(s.fajr, at(5, 58)) <= 3, "fajr {:?}", hm(s.fajr));
        assert!(minutes_between(s.sunrise, at(7, 18)) <= 3, "sunrise {:?}", hm(s.sunrise));
        assert!(minutes_between(s.dhuhr, at(12, 6)) <= 3, "dhuhr {:?}", hm(s.dhuhr));
        assert!(minutes_between(s.asr, at(14, 34)) <= 3, "asr {:?}", hm(s.asr));
        assert!(minutes_between(s.maghrib, at(16, 54)) <= 3, "maghrib {:?}", hm(s.maghrib));
        assert!(minutes_between(s.isha, at(18, 13)) <= 3, "isha {:?}", hm(s.isha));
    }

    #[test]
    fn test_times_are_whole_minutes() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let s = provider(CalculationMethod::MuslimWorldLeague).schedule_for(date).unwrap();
        for (_, time) in s.times() {
            assert_eq!(time.second(), 0);
            assert_eq!(time.nanosecond(), 0);
        }
    }

    #[test]
    fn test_umm_al_qura_isha_follows_maghrib_by_ninety_minutes() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let s = provider(CalculationMethod::UmmAlQura).schedule_for(date).unwrap();
        assert_eq!((s.isha - s.maghrib).num_minutes(), 90);
    }

    #[test]
    fn test_hanafi_asr_is_later() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let shafi = provider(CalculationMethod::Isna).schedule_for(date).unwrap();
        let hanafi = SolarPrayerTimes::new(
            new_york(),
            CalculationParams::for_method(CalculationMethod::Isna).with_madhab(Madhab::Hanafi),
        )
        .schedule_for(date)
        .unwrap();

        assert!(hanafi.asr > shafi.asr);
        assert_eq!(hanafi.dhuhr, shafi.dhuhr);
    }

    #[test]
    fn test_high_latitude_summer_is_bounded() {
        // Stockholm in midsummer never reaches 18° of depression
        let location = Location {
            latitude: 59.3293,
            longitude: 18.0686,
            timezone: "Europe/Stockholm".parse().unwrap(),
            city: None,
        };
        let params = CalculationParams::for_method(CalculationMethod::MuslimWorldLeague)
            .with_high_latitude_rule(HighLatitudeRule::SeventhOfTheNight);
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let s = SolarPrayerTimes::new(location, params).schedule_for(date).unwrap();

        assert!(s.fajr < s.sunrise);
        assert!(s.maghrib < s.isha);

        let night = Duration::hours(24) - (s.maghrib - s.sunrise);
        let allowed = night.num_minutes() / 7;
        assert!((s.sunrise - s.fajr).num_minutes() <= allowed + 1);
        assert!((s.isha - s.maghrib).num_minutes() <= allowed + 1);
    }

    #[test]
    fn test_polar_night_is_an_error() {
        let location = Location {
            latitude: 78.2232,
            longitude: 15.6267,
            timezone: "Arctic/Longyearbyen".parse().unwrap(),
            city: None,
        };
        let date = NaiveDate::from_ymd_opt(2025, 12, 21).unwrap();
        let result = SolarPrayerTimes::new(location, CalculationParams::for_method(CalculationMethod::Isna))
            .schedule_for(date);
        assert!(result.is_err());
    }

    #[test]
    fn test_schedule_date_is_kept() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        let s = provider(CalculationMethod::Egyptian).schedule_for(date).unwrap();
        assert_eq!(s.date, date);
        assert_eq!(s.fajr.date_naive(), date);
        assert_eq!(s.isha.date_naive(), date);
    }

    #[test]
    fn test_asr_elevation() {
        // With the sun overhead a shadow of one length falls at 45°
        assert!((asr_elevation(0.0, 1.0) - 45.0).abs() < 1e-9);
        assert!((asr_elevation(0.0, 2.0) - 26.565).abs() < 1e-3);
        assert!(asr_elevation(40.0, 2.0) < asr_elevation(40.0, 1.0));
    }

    #[test]
    fn test_culmination_near_equinox() {
        let p = provider(CalculationMethod::Isna);
        let date = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let coord = Coordinates::new(TEST_LATITUDE, TEST_LONGITUDE).unwrap();
        let day = SolarDay::new(coord, date);
        let noon = p.culmination(&day, date, -SUNRISE_DEPRESSION);
        assert!((noon - (90.0 - TEST_LATITUDE)).abs() < 0.5, "got {noon}");
    }

    #[test]
    fn test_unreachable_depression_is_none() {
        // Midsummer in Stockholm the sun stays within about 7° of the horizon
        let p = SolarPrayerTimes::new(
            Location {
                latitude: 59.3293,
                longitude: 18.0686,
                timezone: "Europe/Stockholm".parse().unwrap(),
                city: None,
            },
            CalculationParams::for_method(CalculationMethod::MuslimWorldLeague),
        );
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let day = SolarDay::new(Coordinates::new(59.3293, 18.0686).unwrap(), date);
        assert!(p.crossing(&day, date, -18.0, true).is_none());
        assert!(p.crossing(&day, date, -SUNRISE_DEPRESSION, true).is_some());
    }

    #[test]
    fn test_london_midsummer_isha_falls_after_midnight() {
        let location = Location {
            latitude: 51.5072,
            longitude: -0.1276,
            timezone: "Europe/London".parse().unwrap(),
            city: None,
        };
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let s = SolarPrayerTimes::new(location, CalculationParams::for_method(CalculationMethod::MuslimWorldLeague))
            .schedule_for(date)
            .unwrap();

        assert_eq!(s.isha.date_naive(), date.succ_opt().unwrap());
        assert!(s.maghrib < s.isha);
    }
}
