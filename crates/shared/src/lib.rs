//! Shared utilities and common types for the Volunteer Hub backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Webhook signature verification and reference generation
//! - Slug generation with Cyrillic transliteration
//! - JWT access-token helpers
//! - Pagination types

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod slug;
