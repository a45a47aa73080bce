//! One injection run: backup → parse inputs → merge → write
//!
//! Per-file parse failures are absorbed by the parser. Anything failing
//! while loading, merging or writing the master aborts the run.

use crate::models::{InjectionReport, TerritoryRecord};
use crate::services::{master_file, merge_engine, territory_parser};
use crate::xml::Document;
use std::path::{Path, PathBuf};
use territory_common::config::DirectoryLayout;
use territory_common::Result;
use tracing::info;

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub backup_path: PathBuf,
    pub output_path: PathBuf,
    pub input_files: usize,
    pub parsed_records: usize,
    pub report: InjectionReport,
}

/// Run the full pipeline for `master` inside `layout`
pub fn run(layout: &DirectoryLayout, master: &Path) -> Result<RunSummary> {
    let backup_path = master_file::backup_master(master, &layout.backup_dir)?;

    let files = layout.input_files()?;
    info!("Found {} territory files in {}", files.len(), layout.input_dir.display());
    let records = territory_parser::parse_territory_files(&files);

    let output_path = master_file::output_path_for(master, &layout.output_dir)?;
    let report = inject_into_master(master, &records, &output_path)?;

    Ok(RunSummary {
        backup_path,
        output_path,
        input_files: files.len(),
        parsed_records: records.len(),
        report,
    })
}

/// Load the master, merge `records` and write the result to `output_path`
///
/// The master file itself is only read.
pub fn inject_into_master(
    master: &Path,
    records: &[TerritoryRecord],
    output_path: &Path,
) -> Result<InjectionReport> {
    let mut doc = Document::load(master)?;
    let report = merge_engine::inject(&mut doc, records);

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    doc.save(output_path)?;

    info!("Injection complete. {} new blocks added.", report.injected_blocks);
    if report.skipped_zones > 0 {
        info!("{} zones skipped (already exist).", report.skipped_zones);
    }
    info!("Output saved to: {}", output_path.display());

    Ok(report)
}
