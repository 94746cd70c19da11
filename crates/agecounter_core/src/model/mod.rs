//! Domain values for age display.
//!
//! # Invariants
//! - A birthdate is a calendar date only; time-of-day is always midnight.
//! - Age values are derived on demand and never persisted.

pub mod age;
pub mod birthdate;
