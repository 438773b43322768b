//! Debug output for the astronomical side of a schedule.
//!
//! Shows the solar day a schedule was built from, so wrong coordinates or a
//! wrong timezone stand out (sunrise at 13:00, a six-hour day in June).

use chrono::{Duration, NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::common::utils::format_duration_words;
use crate::geo::location::Location;
use crate::prayer::DailySchedule;

/// `+03:00` style offset of `tz` at noon on `date`.
pub fn format_utc_offset(tz: Tz, date: NaiveDate) -> String {
    let noon = date.and_time(NaiveTime::MIN) + chrono::Duration::hours(12);
    let offset_secs = tz.from_utc_datetime(&noon).offset().fix().local_minus_utc();
    let hours = offset_secs / 3600;
    let minutes = (offset_secs % 3600).abs() / 60;
    let sign = if offset_secs < 0 { '-' } else { '+' };
    format!("{sign}{:02}:{minutes:02}", hours.abs())
}

/// Daylight (sunrise to Maghrib) and the remaining night.
pub fn day_and_night(schedule: &DailySchedule) -> (Duration, Duration) {
    let day = schedule.maghrib - schedule.sunrise;
    (day, Duration::hours(24) - day)
}

/// Whether Fajr or Isha left the schedule's own calendar date.
pub fn crosses_midnight(schedule: &DailySchedule) -> bool {
    schedule.fajr.date_naive() != schedule.date || schedule.isha.date_naive() != schedule.date
}

/// Log solar details for the schedule when debugging.
pub fn log_solar_debug_info(location: &Location, schedule: &DailySchedule) {
    let tz = location.timezone;
    let (day, night) = day_and_night(schedule);

    log_pipe!();
    log_debug!("Solar calculation details:");
    log_indented!(
        "        Raw coordinates: {:.4}°, {:.4}°",
        location.latitude,
        location.longitude
    );
    log_indented!(
        "    Coordinate Timezone: {tz} ({})",
        format_utc_offset(tz, schedule.date)
    );
    log_indented!("                Sunrise: {}", schedule.sunrise.format("%H:%M"));
    log_indented!("          Solar transit: {}", schedule.dhuhr.format("%H:%M"));
    log_indented!("                 Sunset: {}", schedule.maghrib.format("%H:%M"));
    log_indented!("             Day length: {}", format_duration_words(day));
    log_indented!("           Night length: {}", format_duration_words(night));

    if crosses_midnight(schedule) {
        log_indented!(
            "Fajr {} and Isha {} span midnight",
            schedule.fajr.format("%Y-%m-%d %H:%M"),
            schedule.isha.format("%Y-%m-%d %H:%M")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer::{CalculationMethod, CalculationParams, PrayerTimeProvider, SolarPrayerTimes};

    fn schedule(latitude: f64, longitude: f64, timezone: Tz, date: NaiveDate) -> DailySchedule {
        let location = Location {
            latitude,
            longitude,
            timezone,
            city: None,
        };
        SolarPrayerTimes::new(
            location,
            CalculationParams::for_method(CalculationMethod::MuslimWorldLeague),
        )
        .schedule_for(date)
        .unwrap()
    }

    #[test]
    fn test_format_utc_offset() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(format_utc_offset(chrono_tz::Asia::Riyadh, date), "+03:00");
        assert_eq!(format_utc_offset(chrono_tz::America::New_York, date), "-05:00");
        assert_eq!(format_utc_offset(chrono_tz::Asia::Kolkata, date), "+05:30");
        assert_eq!(format_utc_offset(chrono_tz::America::St_Johns, date), "-03:30");
        assert_eq!(format_utc_offset(chrono_tz::UTC, date), "+00:00");
    }

    #[test]
    fn test_equinox_day_is_about_twelve_hours() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let (day, night) = day_and_night(&schedule(0.0, 0.0, chrono_tz::UTC, date));
        assert!((day.num_minutes() - 727).abs() <= 5, "day {day}");
        assert_eq!(day + night, Duration::hours(24));
    }

    #[test]
    fn test_crosses_midnight() {
        let june = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        assert!(crosses_midnight(&schedule(51.5072, -0.1276, chrono_tz::Europe::London, june)));

        let january = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert!(!crosses_midnight(&schedule(21.4225, 39.8262, chrono_tz::Asia::Riyadh, january)));
    }
}
