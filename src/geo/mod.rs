//! Geographic inputs to the prayer calculation.
//!
//! ## Module Structure
//!
//! - [`location`]: IP geolocation lookup with fallback to configured coordinates
//! - [`display`]: Debug output of the solar day behind a schedule

pub mod display;
pub mod location;
