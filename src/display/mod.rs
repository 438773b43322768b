//! Presentation: console schedule output and the terminal dashboard.

pub mod dashboard;
pub mod schedule;

pub use schedule::{alert_line, print_schedule_block};
