//! Error handling
//!
//! Defines error types and handling for the custom database scripts.

pub mod handlers;
pub mod types;

pub use types::*;
