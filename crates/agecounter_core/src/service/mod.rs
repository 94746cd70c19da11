//! Core use-case services.
//!
//! # Responsibility
//! - Own the persisted birthdate and broadcast its changes.
//! - Turn the birthdate into display strings for the presentation layer.
//!
//! # Invariants
//! - Presentation code reads only through `AgeCalculator`'s formatting
//!   operations and writes only through `BirthdayStore::set`.

pub mod age_calculator;
pub mod birthday_store;
