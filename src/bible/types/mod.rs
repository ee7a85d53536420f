//! Foundational data structures, error types, and engine configuration.

pub mod config;
pub mod error;
pub mod models;
