//! Personal work-hours tracker. Shifts are recorded as clock-in/clock-out pairs
//! per date, and from them and an hourly rate it works out the hours worked,
//! the amount owed and what is still outstanding after payments.
//!
//! Everything is saved locally, see [`state::KeyValueStore`].

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod payment;
pub mod state;
