//! Shared building blocks for the gapscan engine: domain types, the error
//! taxonomy, vector math and configuration loading.

pub mod config;
pub mod error;
pub mod types;
pub mod vector;

pub use error::{Error, Result};
