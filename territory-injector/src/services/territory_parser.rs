//! Territory file parser
//!
//! Reads secondary XML files and turns every `<territory>` element (at any
//! depth) into a [`TerritoryRecord`]. Files are independent: one that fails
//! to load is logged and skipped.

use crate::models::{TerritoryRecord, Zone};
use crate::services::color_generator::generate_color;
use crate::xml::Document;
use std::path::{Path, PathBuf};
use territory_common::Result;
use tracing::{error, info};

/// Type forced for every file whose name mentions "zombie"
pub const ZOMBIE_TYPE: &str = "zombie_territories";

const TERRITORY: &str = "territory";
const ZONE: &str = "zone";

/// Parse all files in order, skipping those that fail
pub fn parse_territory_files(paths: &[PathBuf]) -> Vec<TerritoryRecord> {
    let mut records = Vec::new();
    for path in paths {
        let file_name = display_name(path);
        match parse_territory_file(path) {
            Ok(mut parsed) => {
                info!("Parsed {} blocks from {}", parsed.len(), file_name);
                records.append(&mut parsed);
            }
            Err(e) => {
                error!("Error parsing {}: {}", file_name, e);
            }
        }
    }
    records
}

/// Parse one file into records
pub fn parse_territory_file(path: &Path) -> Result<Vec<TerritoryRecord>> {
    let doc = Document::load(path)?;
    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_territory_document(&doc, &base))
}

/// Extract records from a loaded document; `filename_base` is the file name
/// without extension
pub fn parse_territory_document(doc: &Document, filename_base: &str) -> Vec<TerritoryRecord> {
    let is_zombie = filename_base.to_lowercase().contains("zombie");
    let type_name = if is_zombie {
        ZOMBIE_TYPE.to_string()
    } else {
        filename_base.to_string()
    };

    let mut records = Vec::new();
    for territory in doc.descendants(doc.root(), TERRITORY) {
        let zones: Vec<Zone> = doc
            .child_elements(territory, ZONE)
            .filter_map(|zone| Zone::from_attributes(doc.attributes(zone).to_vec()))
            .collect();
        if zones.is_empty() {
            continue;
        }

        let name = non_empty(doc.attr(territory, "name"))
            .map(str::to_string)
            .or_else(|| (!is_zombie).then(|| filename_base.to_string()));

        let color = match non_empty(doc.attr(territory, "color")) {
            Some(color) => color.to_string(),
            None => {
                let seed = name.as_deref().unwrap_or(filename_base);
                generate_color::<&str>(seed, &[]).to_string()
            }
        };

        records.push(TerritoryRecord {
            type_name: type_name.clone(),
            name,
            color,
            zones,
        });
    }
    records
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
