//! Business logic services.

pub mod monobank;
pub mod policy;
