//! # Territory Injector Common Library
//!
//! Shared code for the territory injector:
//! - Error type and result alias
//! - Configuration loading and directory layout
//! - Session log setup (console + log file)
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
