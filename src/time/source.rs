//! Time source abstraction for supporting both real-time and simulated time.
//!
//! The polling loop never reads the system clock directly: it asks a
//! [`TimeSource`] for the current instant and sleeps through it. Real runs use
//! [`RealTimeSource`]; `--simulate` and the tests use [`SimulatedTimeSource`],
//! which either accelerates time by a multiplier or jumps through every sleep
//! instantly (fast-forward).

use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration as StdDuration, Instant};

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current instant
    fn now(&self) -> DateTime<Utc>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Simulated time source for testing and time-accelerated execution.
///
/// - Linear acceleration: each sleep takes `duration / multiplier` real time.
/// - Fast-forward (multiplier 0.0): each sleep advances the clock at once.
///
/// The clock never moves past `end_time`.
pub struct SimulatedTimeSource {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    time_multiplier: f64,
    /// Simulated time elapsed through completed sleeps
    elapsed: Mutex<StdDuration>,
    /// Sleep in progress: (real start instant, simulated duration being slept)
    sleep_in_progress: Mutex<Option<(Instant, StdDuration)>>,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source.
    ///
    /// A negative multiplier selects the default acceleration of one hour per
    /// second; `0.0` selects fast-forward.
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, multiplier: f64) -> Self {
        let time_multiplier = if multiplier == 0.0 {
            0.0
        } else if multiplier < 0.0 {
            3600.0
        } else {
            multiplier
        };

        Self {
            start_time,
            end_time,
            time_multiplier,
            elapsed: Mutex::new(StdDuration::ZERO),
            sleep_in_progress: Mutex::new(None),
        }
    }

    /// Fast-forward source, the form used by tests.
    pub fn fast_forward(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self::new(start_time, end_time, 0.0)
    }

    pub fn is_fast_forward(&self) -> bool {
        self.time_multiplier == 0.0
    }

    fn current_time(&self) -> DateTime<Utc> {
        let mut total = *lock(&self.elapsed);

        if let Some((started, simulated)) = *lock(&self.sleep_in_progress) {
            let progressed = started.elapsed().as_secs_f64() * self.time_multiplier;
            total += StdDuration::from_secs_f64(progressed.min(simulated.as_secs_f64()));
        }

        let simulated = self.start_time
            + ChronoDuration::from_std(total).unwrap_or_else(|_| ChronoDuration::zero());
        simulated.min(self.end_time)
    }

    fn remaining(&self) -> StdDuration {
        let now = self.current_time();
        (self.end_time - now).to_std().unwrap_or(StdDuration::ZERO)
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let step = duration.min(self.remaining());
        if step.is_zero() {
            return;
        }

        if self.is_fast_forward() {
            *lock(&self.elapsed) += step;
            // Yield so the signal thread and log output keep up
            std::thread::sleep(StdDuration::from_millis(1));
            return;
        }

        *lock(&self.sleep_in_progress) = Some((Instant::now(), step));
        std::thread::sleep(StdDuration::from_secs_f64(
            step.as_secs_f64() / self.time_multiplier,
        ));
        *lock(&self.sleep_in_progress) = None;
        *lock(&self.elapsed) += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Handle to the global time source.
pub fn handle() -> Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).clone()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Utc> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" in a specific timezone
pub fn parse_datetime_in_tz(s: &str, tz: Tz) -> Result<DateTime<Tz>, String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;

    tz.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| format!("Ambiguous or invalid time in timezone {tz}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, s).unwrap()
    }

    #[test]
    fn test_fast_forward_advances_by_sleep() {
        let source = SimulatedTimeSource::fast_forward(at(12, 0, 0), at(13, 0, 0));
        assert_eq!(source.now(), at(12, 0, 0));

        source.sleep(StdDuration::from_secs(10));
        assert_eq!(source.now(), at(12, 0, 10));

        source.sleep(StdDuration::from_secs(120));
        assert_eq!(source.now(), at(12, 2, 10));
    }

    #[test]
    fn test_fast_forward_caps_at_end() {
        let source = SimulatedTimeSource::fast_forward(at(12, 0, 0), at(12, 0, 30));
        source.sleep(StdDuration::from_secs(3600));
        assert_eq!(source.now(), at(12, 0, 30));
        assert!(source.is_ended());
    }

    #[test]
    fn test_negative_multiplier_uses_default_acceleration() {
        let source = SimulatedTimeSource::new(at(12, 0, 0), at(13, 0, 0), -1.0);
        assert!(!source.is_fast_forward());
        assert!(source.is_simulated());
    }

    #[test]
    fn test_parse_datetime_in_tz() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let parsed = parse_datetime_in_tz("2025-03-10 05:30:00", tz).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), at(9, 30, 0));

        assert!(parse_datetime_in_tz("2025-03-10 05:30", tz).is_err());
        // 02:30 does not exist on the spring-forward date
        assert!(parse_datetime_in_tz("2025-03-09 02:30:00", tz).is_err());
    }
}
