//! Prayer-time matching state machine.
//!
//! [`Monitor::tick`] is a pure step: given the current instant it reports
//! what happened (a new day started, a prayer became due) and updates the
//! alert state. The driver in [`crate::core`] does the sleeping, printing
//! and alerting.
//!
//! States: `Idle` waits for a prayer inside the tolerance window. A match is
//! fired at once and moves to `Cooldown`, during which nothing is matched.
//! Cooldown ends by itself once `fired_at + cooldown` has passed. A prayer
//! whose time came up during the cooldown fires as soon as it ends. Within
//! one schedule date a prayer fires at most once.
//!
//! Yesterday's and tomorrow's schedules are matched too: at high latitudes
//! Isha can fall after midnight and Fajr before it.

use anyhow::Result;
use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;

use crate::prayer::{DailySchedule, Prayer, PrayerTimeProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Idle,
    Cooldown {
        prayer: Prayer,
        until: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The location's calendar date advanced and a new schedule was computed.
    Rollover { date: NaiveDate },
    /// The date advanced but no schedule exists for it (polar day or night).
    Unavailable { date: NaiveDate, reason: String },
    /// A prayer became due.
    Fired { prayer: Prayer, time: DateTime<Tz> },
}

/// Timing knobs of the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow {
    pub tolerance: Duration,
    pub cooldown: Duration,
}

pub struct Monitor {
    provider: Box<dyn PrayerTimeProvider>,
    window: MatchWindow,
    /// Schedules of yesterday, today and tomorrow that could be computed
    schedules: Vec<DailySchedule>,
    last_date: NaiveDate,
    state: AlertState,
    /// Start of the cooldown that just ended, consumed by the next tick
    catch_up_from: Option<DateTime<Utc>>,
    fired: BTreeSet<(NaiveDate, Prayer)>,
}

/// First prayer in canonical order within `tolerance` of `now`, boundaries included.
pub fn find_due(
    schedule: &DailySchedule,
    now: DateTime<Utc>,
    tolerance: Duration,
) -> Option<(Prayer, DateTime<Tz>)> {
    schedule
        .times()
        .into_iter()
        .find(|(_, time)| (time.with_timezone(&Utc) - now).abs() <= tolerance)
}

/// Yesterday, today and tomorrow around `today`.
fn neighbourhood(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    [
        today.checked_sub_days(Days::new(1)),
        Some(today),
        today.checked_add_days(Days::new(1)),
    ]
    .into_iter()
    .flatten()
}

impl Monitor {
    pub fn new(
        provider: Box<dyn PrayerTimeProvider>,
        window: MatchWindow,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let today = now.with_timezone(&provider.timezone()).date_naive();
        let schedules = Self::load(provider.as_ref(), today)?;
        Ok(Self {
            provider,
            window,
            schedules,
            last_date: today,
            state: AlertState::Idle,
            catch_up_from: None,
            fired: BTreeSet::new(),
        })
    }

    /// Schedules around `today`; fails only when today itself cannot be computed.
    fn load(provider: &dyn PrayerTimeProvider, today: NaiveDate) -> Result<Vec<DailySchedule>> {
        let mut schedules = Vec::with_capacity(3);
        for date in neighbourhood(today) {
            match provider.schedule_for(date) {
                Ok(schedule) => schedules.push(schedule),
                Err(e) if date == today => return Err(e),
                Err(_) => {}
            }
        }
        Ok(schedules)
    }

    /// Today's schedule, if one could be computed.
    pub fn schedule(&self) -> Option<&DailySchedule> {
        self.schedules.iter().find(|s| s.date == self.last_date)
    }

    /// The location date observed by the last tick.
    pub fn date(&self) -> NaiveDate {
        self.last_date
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn provider(&self) -> &dyn PrayerTimeProvider {
        self.provider.as_ref()
    }

    pub fn window(&self) -> MatchWindow {
        self.window
    }

    /// Swap in a rebuilt provider after a reload. Alert state is kept.
    pub fn replace_provider(
        &mut self,
        provider: Box<dyn PrayerTimeProvider>,
        window: MatchWindow,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let today = now.with_timezone(&provider.timezone()).date_naive();
        let schedules = Self::load(provider.as_ref(), today)?;
        self.provider = provider;
        self.window = window;
        self.schedules = schedules;
        self.last_date = today;
        Ok(())
    }

    fn is_due(&self, time: DateTime<Tz>, now: DateTime<Utc>) -> bool {
        let time = time.with_timezone(&Utc);
        if (time - now).abs() <= self.window.tolerance {
            return true;
        }
        self.catch_up_from
            .is_some_and(|from| time >= from && time <= now)
    }

    /// Next unfired prayer that is due, in chronological then canonical order.
    fn next_due(&self, now: DateTime<Utc>) -> Option<(NaiveDate, Prayer, DateTime<Tz>)> {
        self.schedules.iter().find_map(|schedule| {
            schedule
                .times()
                .into_iter()
                .find(|(prayer, time)| {
                    !self.fired.contains(&(schedule.date, *prayer)) && self.is_due(*time, now)
                })
                .map(|(prayer, time)| (schedule.date, prayer, time))
        })
    }

    /// Advance the state machine to `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<MonitorEvent> {
        let mut events = Vec::new();

        let today = now.with_timezone(&self.provider.timezone()).date_naive();
        if today != self.last_date {
            match Self::load(self.provider.as_ref(), today) {
                Ok(schedules) => {
                    self.schedules = schedules;
                    // A clock moved backwards only recomputes
                    if today > self.last_date {
                        events.push(MonitorEvent::Rollover { date: today });
                    }
                }
                Err(e) => {
                    // Keep whatever is left of the neighbouring days
                    self.schedules.retain(|s| s.date.abs_diff(today) <= Days::new(1));
                    events.push(MonitorEvent::Unavailable {
                        date: today,
                        reason: format!("{e:#}"),
                    });
                }
            }
            self.last_date = today;
            if let Some(yesterday) = today.checked_sub_days(Days::new(1)) {
                self.fired.retain(|(date, _)| *date >= yesterday);
            }
        }

        if let AlertState::Cooldown { until, .. } = self.state {
            if now < until {
                return events;
            }
            self.state = AlertState::Idle;
        }

        if let Some((date, prayer, time)) = self.next_due(now) {
            self.state = AlertState::Cooldown {
                prayer,
                until: now + self.window.cooldown,
            };
            self.catch_up_from = Some(now - self.window.tolerance);
            self.fired.insert((date, prayer));
            events.push(MonitorEvent::Fired { prayer, time });
        } else {
            self.catch_up_from = None;
        }

        events
    }
}
