//! Console rendering of the three-day schedule block and alert lines.

use anyhow::Result;
use chrono::{Days, NaiveDate};

use crate::prayer::{DailySchedule, Prayer, PrayerTimeProvider};

/// Row labels, padded so the weekday column lines up.
const DAY_LABELS: [&str; 3] = ["YESTERDAY", "TODAY    ", "TOMORROW "];

/// Schedules for the day before, the day itself and the day after.
pub fn three_days(provider: &dyn PrayerTimeProvider, today: NaiveDate) -> Result<[DailySchedule; 3]> {
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    Ok([
        provider.schedule_for(yesterday)?,
        provider.schedule_for(today)?,
        provider.schedule_for(tomorrow)?,
    ])
}

/// Heading line plus the rows of each day, without box decoration.
pub fn format_schedule_block(today: NaiveDate, days: &[DailySchedule; 3]) -> Vec<String> {
    let mut lines = vec![format!("PRAYER SCHEDULE FOR {}", today.format("%Y-%m-%d"))];
    for (label, schedule) in DAY_LABELS.iter().zip(days) {
        lines.push(format!("{label} ({}):", schedule.date.format("%A")));
        lines.extend(format_day(schedule));
    }
    lines
}

/// `Fajr:    05:58` style rows for one day.
pub fn format_day(schedule: &DailySchedule) -> Vec<String> {
    schedule
        .times()
        .iter()
        .map(|(prayer, time)| format!("{:<8} {}", format!("{prayer}:"), time.format("%H:%M")))
        .collect()
}

/// Print the block for `today` through the logger.
pub fn print_schedule_block(provider: &dyn PrayerTimeProvider, today: NaiveDate) -> Result<()> {
    let days = three_days(provider, today)?;
    let mut lines = format_schedule_block(today, &days).into_iter();

    if let Some(heading) = lines.next() {
        log_block_start!("{}", heading);
    }
    for line in lines {
        if line.ends_with("):") {
            log_pipe!();
            log_decorated!("{}", line);
        } else {
            log_indented!("{}", line);
        }
    }
    Ok(())
}

pub fn alert_line(prayer: Prayer) -> String {
    format!("Time for {prayer}!")
}
