//! Domain layer for the Volunteer Hub backend.
//!
//! This crate contains:
//! - Domain models (users, campaigns, shifts, applications, donations)
//! - Business logic services (access policy, Monobank webhook handling)

pub mod models;
pub mod services;
