use adhan_clock::geo::location::Location;
use adhan_clock::prayer::{
    CalculationMethod, CalculationParams, Madhab, PrayerTimeProvider, SolarPrayerTimes,
};
use chrono::NaiveDate;
use proptest::prelude::*;

/// Latitudes where the sun rises and sets every day of the year
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -50.0..50.0
}

fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..180.0
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=366).prop_filter_map("valid ordinal", |(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal)
    })
}

fn method_strategy() -> impl Strategy<Value = CalculationMethod> {
    proptest::sample::select(CalculationMethod::ALL.to_vec())
}

fn madhab_strategy() -> impl Strategy<Value = Madhab> {
    prop_oneof![Just(Madhab::Shafi), Just(Madhab::Hanafi)]
}

fn provider(lat: f64, lon: f64, method: CalculationMethod, madhab: Madhab) -> SolarPrayerTimes {
    SolarPrayerTimes::new(
        Location {
            latitude: lat,
            longitude: lon,
            timezone: chrono_tz::UTC,
            city: None,
        },
        CalculationParams::for_method(method).with_madhab(madhab),
    )
}

proptest! {
    /// Fajr < Sunrise < Dhuhr < Asr < Maghrib < Isha everywhere outside polar latitudes
    #[test]
    fn test_schedule_is_strictly_ordered(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
        method in method_strategy(),
        madhab in madhab_strategy(),
    ) {
        let s = provider(lat, lon, method, madhab).schedule_for(date).unwrap();

        prop_assert!(s.fajr < s.sunrise, "fajr {} sunrise {}", s.fajr, s.sunrise);
        prop_assert!(s.sunrise < s.dhuhr, "sunrise {} dhuhr {}", s.sunrise, s.dhuhr);
        prop_assert!(s.dhuhr < s.asr, "dhuhr {} asr {}", s.dhuhr, s.asr);
        prop_assert!(s.asr < s.maghrib, "asr {} maghrib {}", s.asr, s.maghrib);
        prop_assert!(s.maghrib < s.isha, "maghrib {} isha {}", s.maghrib, s.isha);
        prop_assert_eq!(s.date, date);
    }

    /// Same inputs, same schedule
    #[test]
    fn test_schedule_is_deterministic(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
        method in method_strategy(),
    ) {
        let first = provider(lat, lon, method, Madhab::Shafi).schedule_for(date).unwrap();
        let second = provider(lat, lon, method, Madhab::Shafi).schedule_for(date).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Hanafi Asr (shadow factor 2) never comes before Shafi Asr
    #[test]
    fn test_hanafi_asr_is_later(
        lat in latitude_strategy(),
        lon in longitude_strategy(),
        date in date_strategy(),
    ) {
        let shafi = provider(lat, lon, CalculationMethod::MuslimWorldLeague, Madhab::Shafi)
            .schedule_for(date)
            .unwrap();
        let hanafi = provider(lat, lon, CalculationMethod::MuslimWorldLeague, Madhab::Hanafi)
            .schedule_for(date)
            .unwrap();
        prop_assert!(hanafi.asr > shafi.asr);
        prop_assert_eq!(hanafi.dhuhr, shafi.dhuhr);
    }
}
