//! # Adhan Clock Library
//!
//! Internal library for the adhan-clock binary.
//!
//! This library exists to enable testing of the internals and to keep CLI
//! dispatch (main.rs) apart from application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: [`AdhanClock`] acquires resources and starts the monitor
//! - **Core Logic**: [`core`] holds the polling loop and its state machine
//! - **Prayer Times**: [`prayer`] computes daily schedules from solar position
//! - **Location**: [`geo`] resolves coordinates through IP geolocation with fallback
//! - **Alerts**: [`alert`] plays the adhan and sends desktop notifications
//! - **Presentation**: [`display`] prints schedules and runs the dashboard
//! - **Configuration**: [`config`] for JSON settings with hot-reload
//! - **Commands**: [`commands`] for CLI subcommands
//! - **Infrastructure**: signals, lock file, logging, time source

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod alert;
pub mod args;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod geo;
pub mod io;
pub mod prayer;
pub mod time;

mod adhan_clock;

pub use adhan_clock::AdhanClock;
