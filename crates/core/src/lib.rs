//! Core business logic for agora.
//!
//! Services enforce the integrity rules (no duplicate registrations, likes or
//! subscriptions), run the ownership gate before every mutation and shape the
//! read projections returned to clients.

pub mod services;

pub use services::*;
