//! Quartier Nord server library.
//!
//! Everything the binary wires together lives here so the HTTP surface can
//! be exercised in-process by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validate;
