//! Merge engine
//!
//! Appends parsed territories to the master document under
//! `territory-type-list/territory-type`, never touching what is already
//! there. Zones are deduplicated per territory type: a zone whose signature
//! already exists anywhere in the type (pre-existing or injected earlier in
//! the run) is skipped.
//!
//! **Algorithm:**
//! 1. Index existing territory types by lower-cased name and collect the
//!    signatures of all their zones (once per run)
//! 2. For each record: resolve or create the type, append a territory,
//!    attach the zones whose signatures are new
//! 3. Drop the territory again when no zone was attached

use crate::models::{InjectionReport, TerritoryRecord};
use crate::services::zone_signature::ZoneSignature;
use crate::xml::{Document, NodeId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

pub const TYPE_LIST: &str = "territory-type-list";
pub const TERRITORY_TYPE: &str = "territory-type";
pub const TERRITORY: &str = "territory";
pub const ZONE: &str = "zone";

/// Display name used when neither the record nor its first zone has one
pub const UNNAMED: &str = "unnamed";

struct TypeGroup {
    node: NodeId,
    signatures: HashSet<ZoneSignature>,
}

/// Injection state over one master document
pub struct MergeEngine<'d> {
    doc: &'d mut Document,
    type_list: NodeId,
    groups: HashMap<String, TypeGroup>,
    report: InjectionReport,
}

impl<'d> MergeEngine<'d> {
    /// Index the document's existing territory types
    ///
    /// Creates `territory-type-list` under the root when it is missing. When
    /// two types share a name case-insensitively, the later one is used.
    pub fn new(doc: &'d mut Document) -> Self {
        let root = doc.root();
        let type_list = match doc.find_child(root, TYPE_LIST) {
            Some(list) => list,
            None => {
                debug!("No {} in master, creating it", TYPE_LIST);
                doc.append_element(root, TYPE_LIST, Vec::new())
            }
        };

        let groups = index_groups(doc, type_list);
        debug!("Indexed {} existing territory types", groups.len());

        Self {
            doc,
            type_list,
            groups,
            report: InjectionReport::default(),
        }
    }

    /// Merge one record into the document
    pub fn inject(&mut self, record: &TerritoryRecord) {
        let Some(first_zone) = record.zones.first() else {
            return;
        };

        let key = record.type_name.to_lowercase();
        if !self.groups.contains_key(&key) {
            let node = self.doc.append_element(
                self.type_list,
                TERRITORY_TYPE,
                vec![("name".to_string(), record.type_name.clone())],
            );
            self.groups.insert(
                key.clone(),
                TypeGroup {
                    node,
                    signatures: HashSet::new(),
                },
            );
            self.report.new_groups += 1;
            debug!("Created territory type {}", record.type_name);
        }
        let Some(group) = self.groups.get_mut(&key) else {
            return;
        };

        let territory_name = record
            .name
            .as_deref()
            .or_else(|| first_zone.name())
            .unwrap_or(UNNAMED)
            .to_string();

        let territory = self.doc.append_element(
            group.node,
            TERRITORY,
            vec![
                ("visible".to_string(), "1".to_string()),
                ("color".to_string(), record.color.clone()),
                ("name".to_string(), territory_name.clone()),
            ],
        );

        let mut attached = 0;
        for zone in &record.zones {
            if !group.signatures.insert(ZoneSignature::of(zone)) {
                self.report.skipped_zones += 1;
                continue;
            }
            self.doc
                .append_element(territory, ZONE, zone.attributes().to_vec());
            attached += 1;
        }

        if attached == 0 {
            self.doc.detach(territory);
            self.report.skipped_blocks += 1;
            info!(
                "Skipped block (all zones already exist) for: {} in {}",
                territory_name, record.type_name
            );
        } else {
            self.report.injected_blocks += 1;
            self.report.injected_zones += attached;
            info!(
                "Injected {} zones into {} ({})",
                attached, record.type_name, territory_name
            );
        }
    }

    pub fn report(&self) -> InjectionReport {
        self.report
    }
}

fn index_groups(doc: &Document, type_list: NodeId) -> HashMap<String, TypeGroup> {
    let mut groups = HashMap::new();
    for node in doc.child_elements(type_list, TERRITORY_TYPE) {
        let key = doc.attr(node, "name").unwrap_or("").to_lowercase();
        let signatures = doc
            .child_elements(node, TERRITORY)
            .flat_map(|territory| doc.child_elements(territory, ZONE))
            .map(|zone| ZoneSignature::from_attributes(doc.attributes(zone)))
            .collect();
        groups.insert(key, TypeGroup { node, signatures });
    }
    groups
}

/// Merge all records in order and return the counters
pub fn inject(doc: &mut Document, records: &[TerritoryRecord]) -> InjectionReport {
    let mut engine = MergeEngine::new(doc);
    for record in records {
        engine.inject(record);
    }
    engine.report()
}
