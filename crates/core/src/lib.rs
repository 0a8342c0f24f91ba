//! Quartier Core - Shared types library.
//!
//! This crate provides common types used across all Quartier Nord components:
//! - `server` - Public company directory and role-gated dashboard
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the
//!   slug derivation used for company page URLs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
