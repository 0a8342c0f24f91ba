//! Core types for Quartier Nord.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod slug;

pub use email::{Email, EmailError};
pub use id::*;
pub use slug::slugify;
