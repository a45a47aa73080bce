//! Territory data model shared by the parser and the merge engine

/// A single spatial area: the attributes of one `<zone>` element.
///
/// Always carries `x` and `z`; attribute order is kept so injected zones
/// are written back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    attributes: Vec<(String, String)>,
}

impl Zone {
    /// Build a zone, or `None` when `x` or `z` is missing
    pub fn from_attributes(attributes: Vec<(String, String)>) -> Option<Self> {
        let has = |key: &str| attributes.iter().any(|(k, _)| k == key);
        if has("x") && has("z") {
            Some(Self { attributes })
        } else {
            None
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

/// One territory block read from a secondary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryRecord {
    /// Territory type (group) name: file stem, or `zombie_territories`
    pub type_name: String,
    /// Display name; `None` lets the merge engine fall back to the first zone's name
    pub name: Option<String>,
    /// ARGB color as decimal text, copied from the source or generated
    pub color: String,
    /// Zones in source order, never empty
    pub zones: Vec<Zone>,
}

/// Outcome counters of one injection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionReport {
    /// Territories appended with at least one zone
    pub injected_blocks: usize,
    /// Territories dropped because every zone already existed
    pub skipped_blocks: usize,
    /// Zones dropped as duplicates
    pub skipped_zones: usize,
    /// Zones appended
    pub injected_zones: usize,
    /// Territory types created because no existing one matched
    pub new_groups: usize,
}
