//! Injector services
//!
//! Leaves first: color generation and zone signatures feed the parser and
//! the merge engine.

pub mod color_generator;
pub mod master_file;
pub mod merge_engine;
pub mod territory_parser;
pub mod zone_signature;

pub use color_generator::{generate_color, name_to_color};
pub use merge_engine::{inject, MergeEngine};
pub use territory_parser::{parse_territory_file, parse_territory_files};
pub use zone_signature::ZoneSignature;
