//! Time handling: the real/simulated time source used by every loop.

pub mod source;
