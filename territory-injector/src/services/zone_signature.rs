//! Zone identity for duplicate detection
//!
//! Two zones are the same zone iff their signatures are equal. Comparison is
//! plain string equality after trimming: `"10"` and `"10.0"` differ.

use crate::models::Zone;

/// Dimension assumed when a zone has no `d` attribute
pub const DEFAULT_DIMENSION: &str = "2";

/// Normalized `(name, x, z, r, d)` of a zone
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneSignature {
    pub name: String,
    pub x: String,
    pub z: String,
    pub r: String,
    pub d: String,
}

impl ZoneSignature {
    /// Signature of any attribute set (zones already in the master may lack `x`/`z`)
    pub fn from_attributes(attributes: &[(String, String)]) -> Self {
        let get = |key: &str| {
            attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        let trimmed = |key: &str| get(key).unwrap_or("").trim().to_string();

        Self {
            name: get("name").unwrap_or("").trim().to_lowercase(),
            x: trimmed("x"),
            z: trimmed("z"),
            r: trimmed("r"),
            d: get("d").unwrap_or(DEFAULT_DIMENSION).trim().to_string(),
        }
    }

    pub fn of(zone: &Zone) -> Self {
        Self::from_attributes(zone.attributes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sig(pairs: &[(&str, &str)]) -> ZoneSignature {
        ZoneSignature::from_attributes(&attrs(pairs))
    }

    #[test]
    fn test_bare_zone_signature() {
        let s = sig(&[("x", "100"), ("z", "200")]);
        assert_eq!(
            s,
            ZoneSignature {
                name: String::new(),
                x: "100".to_string(),
                z: "200".to_string(),
                r: String::new(),
                d: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_default_dimension_matches_explicit() {
        assert_eq!(
            sig(&[("x", "100"), ("z", "200")]),
            sig(&[("x", "100"), ("z", "200"), ("d", "2")])
        );
    }

    #[test]
    fn test_name_case_and_whitespace_ignored() {
        assert_eq!(
            sig(&[("name", "  Barn "), ("x", " 1"), ("z", "2 "), ("r", " 50 ")]),
            sig(&[("name", "barn"), ("x", "1"), ("z", "2"), ("r", "50")])
        );
    }

    #[test]
    fn test_numeric_text_not_normalized() {
        assert_ne!(
            sig(&[("x", "10"), ("z", "2")]),
            sig(&[("x", "10.0"), ("z", "2")])
        );
    }

    #[test]
    fn test_coordinate_case_preserved() {
        assert_ne!(sig(&[("x", "1e3"), ("z", "2")]), sig(&[("x", "1E3"), ("z", "2")]));
    }

    #[test]
    fn test_signature_of_zone() {
        let zone = Zone::from_attributes(attrs(&[("x", "5"), ("z", "6"), ("d", "3")])).unwrap();
        assert_eq!(ZoneSignature::of(&zone).d, "3");
    }
}
