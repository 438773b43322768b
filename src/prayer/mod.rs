//! Prayer schedule types and the provider seam used by the monitor.
//!
//! - [`method`]: calculation conventions and resolved parameters
//! - [`times`]: the astronomical [`SolarPrayerTimes`] provider

pub mod method;
pub mod times;

pub use method::{CalculationMethod, CalculationParams, HighLatitudeRule, Madhab};
pub use times::SolarPrayerTimes;

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use std::fmt;

/// The five daily prayers in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prayer times for one calendar date in the location's timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub fajr: DateTime<Tz>,
    /// Shown alongside the prayers, never alerted
    pub sunrise: DateTime<Tz>,
    pub dhuhr: DateTime<Tz>,
    pub asr: DateTime<Tz>,
    pub maghrib: DateTime<Tz>,
    pub isha: DateTime<Tz>,
}

impl DailySchedule {
    pub fn get(&self, prayer: Prayer) -> DateTime<Tz> {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// The five prayers and their times in canonical order.
    pub fn times(&self) -> [(Prayer, DateTime<Tz>); 5] {
        Prayer::ALL.map(|prayer| (prayer, self.get(prayer)))
    }

    /// First prayer strictly after `now`, if any remains today.
    pub fn next_after(&self, now: DateTime<Tz>) -> Option<(Prayer, DateTime<Tz>)> {
        self.times().into_iter().find(|(_, time)| *time > now)
    }
}

/// Source of daily schedules.
///
/// The monitor and the display only depend on this trait, so tests can feed
/// hand-built schedules through it.
pub trait PrayerTimeProvider {
    fn schedule_for(&self, date: NaiveDate) -> Result<DailySchedule>;

    /// Timezone the schedules are expressed in.
    fn timezone(&self) -> Tz;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn schedule() -> DailySchedule {
        let tz = chrono_tz::UTC;
        let at = |h, m| tz.with_ymd_and_hms(2025, 1, 15, h, m, 0).unwrap();
        DailySchedule {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            fajr: at(5, 30),
            sunrise: at(7, 0),
            dhuhr: at(12, 5),
            asr: at(14, 45),
            maghrib: at(17, 10),
            isha: at(18, 40),
        }
    }

    #[test]
    fn test_times_are_in_canonical_order() {
        let names: Vec<_> = schedule().times().iter().map(|(p, _)| p.name()).collect();
        assert_eq!(names, ["Fajr", "Dhuhr", "Asr", "Maghrib", "Isha"]);
    }

    #[test]
    fn test_next_after() {
        let s = schedule();
        let noon = chrono_tz::UTC.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(s.next_after(noon).map(|(p, _)| p), Some(Prayer::Dhuhr));

        // Exactly at Dhuhr the next one is Asr
        assert_eq!(s.next_after(s.dhuhr).map(|(p, _)| p), Some(Prayer::Asr));

        assert_eq!(s.next_after(s.isha), None);
    }
}
