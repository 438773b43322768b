//! Live terminal dashboard: clock, today's times and a countdown to the next prayer.
//!
//! Redraws once per second. The countdown target is the earliest of today's
//! prayers still in the future, or tomorrow's Fajr once Isha has passed.

use anyhow::{Context, Result};
use chrono::{DateTime, Days, NaiveDate};
use chrono_tz::Tz;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, ClearType},
};
use std::io::{Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::common::constants::DASHBOARD_REFRESH_MS;
use crate::common::utils::format_countdown;
use crate::geo::location::Location;
use crate::prayer::{DailySchedule, Prayer, PrayerTimeProvider};

/// Puts the terminal in raw mode on the alternate screen and restores it on drop.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        let mut stdout = std::io::stdout();
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// The prayer the countdown points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upcoming {
    pub prayer: Prayer,
    pub time: DateTime<Tz>,
    pub remaining: chrono::Duration,
}

/// Minimum positive difference between `now` and today's prayers, else tomorrow's Fajr.
pub fn next_prayer(today: &DailySchedule, tomorrow: &DailySchedule, now: DateTime<Tz>) -> Upcoming {
    let (prayer, time) = today
        .next_after(now)
        .unwrap_or((Prayer::Fajr, tomorrow.fajr));
    Upcoming {
        prayer,
        time,
        remaining: time - now,
    }
}

/// Text rows of one frame.
pub fn render_frame(
    location: &Location,
    schedule: &DailySchedule,
    now: DateTime<Tz>,
    upcoming: &Upcoming,
) -> Vec<String> {
    let mut rows = vec![
        format!("Adhan Clock  {}", now.format("%A, %d %B %Y")),
        format!(
            "{}  ({})",
            location.city.as_deref().unwrap_or("Unknown city"),
            location.timezone
        ),
        String::new(),
        format!("  {}", now.format("%H:%M:%S")),
        String::new(),
    ];

    for (prayer, time) in schedule.times() {
        let marker = if prayer == upcoming.prayer && time == upcoming.time {
            ">"
        } else {
            " "
        };
        rows.push(format!(
            "{marker} {:<8} {}",
            format!("{prayer}:"),
            time.format("%H:%M")
        ));
    }

    rows.push(String::new());
    rows.push(format!(
        "Next: {} at {} (in {})",
        upcoming.prayer,
        upcoming.time.format("%H:%M"),
        format_countdown(upcoming.remaining)
    ));
    rows.push(String::new());
    rows.push("Press q or Esc to quit".to_string());
    rows
}

fn draw(stdout: &mut Stdout, rows: &[String]) -> Result<()> {
    queue!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    for (i, row) in rows.iter().enumerate() {
        queue!(stdout, cursor::MoveTo(0, i as u16))?;
        if i == 0 || row.starts_with("Next:") {
            queue!(
                stdout,
                SetAttribute(Attribute::Bold),
                Print(row),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(stdout, Print(row))?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Today's and tomorrow's schedules for `date`.
fn load_days(provider: &dyn PrayerTimeProvider, date: NaiveDate) -> Result<(DailySchedule, DailySchedule)> {
    let tomorrow = date
        .checked_add_days(Days::new(1))
        .context("Date out of range")?;
    Ok((provider.schedule_for(date)?, provider.schedule_for(tomorrow)?))
}

/// Run the dashboard until a quit key is pressed or `running` is cleared.
pub fn run(provider: &dyn PrayerTimeProvider, location: &Location, running: &AtomicBool) -> Result<()> {
    let tz = provider.timezone();
    let mut date = crate::time::source::now().with_timezone(&tz).date_naive();
    let (mut today, mut tomorrow) = load_days(provider, date)?;

    let mut guard = TerminalGuard::new()?;

    while running.load(Ordering::SeqCst) {
        let now = crate::time::source::now().with_timezone(&tz);
        if now.date_naive() != date {
            date = now.date_naive();
            (today, tomorrow) = load_days(provider, date)?;
        }

        let upcoming = next_prayer(&today, &tomorrow, now);
        draw(&mut guard.stdout, &render_frame(location, &today, now, &upcoming))?;

        if event::poll(Duration::from_millis(DASHBOARD_REFRESH_MS))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && is_quit_key(key.code, key.modifiers)
        {
            break;
        }
    }

    Ok(())
}
