//! Repository layer for durable settings.
//!
//! # Responsibility
//! - Define the key-value contract the birthday store persists through.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Values are JSON documents; decoding failures surface as
//!   `RepoError::InvalidData` instead of being masked.

pub mod settings_repo;
