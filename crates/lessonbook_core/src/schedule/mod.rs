//! Weekday/time ordering of holders.
//!
//! # Responsibility
//! - Map weekdays and `HH:MM` times to comparable offsets from "now".
//! - Order the roster and pick the holder whose lesson is soonest.
//!
//! # Invariants
//! - Every function takes "now" as an explicit parameter; nothing here reads
//!   a clock.
//! - All functions are pure and synchronous.

pub mod clock;
pub mod navigation;
pub mod nearest;
pub mod roster;
pub mod sorting;
