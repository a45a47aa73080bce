//! territory-injector library interface
//!
//! Merges per-faction territory zones from secondary XML files into a
//! master map configuration file without duplicating zones.

pub mod models;
pub mod services;
pub mod workflow;
pub mod xml;

pub use models::{InjectionReport, TerritoryRecord, Zone};
pub use workflow::{run, RunSummary};
