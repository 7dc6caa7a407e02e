//! Regional soil reference records and city coordinates
//!
//! Embedded reference tables keyed by (state, district), compiled from
//! government soil-health averages. Loaded nowhere, mutated never: the
//! records are `static` and read through accessor functions only.

use serde::{Serialize, Serializer};

use crate::profiles::SoilType;

// ============================================================================
// Keys and Tags
// ============================================================================

/// Composite (state, district) key with value equality and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionKey<'a> {
    pub state: &'a str,
    pub district: &'a str,
}

impl<'a> RegionKey<'a> {
    pub fn new(state: &'a str, district: &'a str) -> Self {
        Self { state, district }
    }
}

/// Soil classification tag carried by a regional record.
///
/// Either one of the enumerated visual soil types or a reserved sentinel:
/// `mixed` for region-level averages spanning several types, `unknown` when
/// no classification is on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilTag {
    Type(SoilType),
    Mixed,
    Unknown,
}

impl SoilTag {
    /// Wire identifier ("black_sticky", "mixed", "unknown", ...).
    pub fn id(&self) -> &'static str {
        match self {
            SoilTag::Type(t) => t.id(),
            SoilTag::Mixed => "mixed",
            SoilTag::Unknown => "unknown",
        }
    }
}

impl Serialize for SoilTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

// ============================================================================
// Regional Soil Records
// ============================================================================

/// Average soil characteristics for one district.
#[derive(Debug)]
pub struct RegionalSoilRecord {
    pub state: &'static str,
    pub district: &'static str,
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ph: f64,
    pub tag: SoilTag,
}

impl RegionalSoilRecord {
    pub fn key(&self) -> RegionKey<'static> {
        RegionKey::new(self.state, self.district)
    }
}

// Shorthand constructors keep the table readable.
const fn rec(
    state: &'static str,
    district: &'static str,
    n: f64,
    p: f64,
    k: f64,
    ph: f64,
    tag: SoilTag,
) -> RegionalSoilRecord {
    RegionalSoilRecord { state, district, n, p, k, ph, tag }
}

const BLACK: SoilTag = SoilTag::Type(SoilType::BlackSticky);
const RED: SoilTag = SoilTag::Type(SoilType::RedSandy);
const LOAMY: SoilTag = SoilTag::Type(SoilType::BrownLoamy);
const LATERITE: SoilTag = SoilTag::Type(SoilType::YellowClay);
const ALLUVIAL: SoilTag = SoilTag::Type(SoilType::Alluvial);

/// District-level soil averages, grouped by state in display order.
pub static REGIONAL_RECORDS: &[RegionalSoilRecord] = &[
    // Telangana
    rec("Telangana", "Hyderabad", 42.0, 35.0, 45.0, 7.2, BLACK),
    rec("Telangana", "Warangal", 45.0, 38.0, 48.0, 7.0, BLACK),
    rec("Telangana", "Karimnagar", 40.0, 32.0, 42.0, 7.5, BLACK),
    rec("Telangana", "Nizamabad", 48.0, 40.0, 50.0, 6.8, BLACK),
    rec("Telangana", "Khammam", 38.0, 35.0, 40.0, 6.5, LOAMY),
    rec("Telangana", "Nalgonda", 35.0, 30.0, 38.0, 7.8, BLACK),
    rec("Telangana", "Medak", 44.0, 36.0, 46.0, 7.1, BLACK),
    rec("Telangana", "Rangareddy", 40.0, 34.0, 44.0, 7.3, RED),
    // Andhra Pradesh
    rec("Andhra Pradesh", "Visakhapatnam", 35.0, 28.0, 38.0, 6.2, RED),
    rec("Andhra Pradesh", "Vijayawada", 50.0, 42.0, 52.0, 7.0, ALLUVIAL),
    rec("Andhra Pradesh", "Guntur", 48.0, 40.0, 50.0, 7.2, BLACK),
    rec("Andhra Pradesh", "Tirupati", 32.0, 25.0, 35.0, 6.0, RED),
    rec("Andhra Pradesh", "Kurnool", 38.0, 32.0, 40.0, 7.5, BLACK),
    rec("Andhra Pradesh", "Anantapur", 30.0, 25.0, 32.0, 7.8, RED),
    rec("Andhra Pradesh", "Nellore", 45.0, 38.0, 48.0, 6.8, ALLUVIAL),
    rec("Andhra Pradesh", "Kadapa", 35.0, 30.0, 38.0, 7.2, RED),
    // Maharashtra
    rec("Maharashtra", "Pune", 50.0, 40.0, 50.0, 6.8, BLACK),
    rec("Maharashtra", "Nagpur", 55.0, 45.0, 55.0, 7.2, BLACK),
    rec("Maharashtra", "Nashik", 45.0, 38.0, 48.0, 6.5, BLACK),
    rec("Maharashtra", "Aurangabad", 48.0, 40.0, 50.0, 7.5, BLACK),
    rec("Maharashtra", "Kolhapur", 52.0, 42.0, 52.0, 6.2, LATERITE),
    rec("Maharashtra", "Solapur", 40.0, 35.0, 42.0, 8.0, BLACK),
    rec("Maharashtra", "Amravati", 50.0, 42.0, 52.0, 7.0, BLACK),
    rec("Maharashtra", "Latur", 45.0, 38.0, 48.0, 7.8, BLACK),
    // Karnataka
    rec("Karnataka", "Bangalore", 35.0, 30.0, 38.0, 6.0, RED),
    rec("Karnataka", "Mysore", 40.0, 35.0, 42.0, 6.2, LOAMY),
    rec("Karnataka", "Belgaum", 48.0, 40.0, 50.0, 7.0, BLACK),
    rec("Karnataka", "Hubli", 45.0, 38.0, 48.0, 7.2, BLACK),
    rec("Karnataka", "Mangalore", 38.0, 32.0, 40.0, 5.5, LATERITE),
    rec("Karnataka", "Gulbarga", 42.0, 35.0, 45.0, 8.0, BLACK),
    rec("Karnataka", "Davangere", 40.0, 34.0, 42.0, 7.5, BLACK),
    rec("Karnataka", "Shimoga", 45.0, 38.0, 48.0, 5.8, LATERITE),
    // Tamil Nadu
    rec("Tamil Nadu", "Chennai", 30.0, 25.0, 32.0, 7.5, ALLUVIAL),
    rec("Tamil Nadu", "Coimbatore", 38.0, 32.0, 40.0, 7.0, LOAMY),
    rec("Tamil Nadu", "Madurai", 35.0, 30.0, 38.0, 7.8, BLACK),
    rec("Tamil Nadu", "Trichy", 40.0, 35.0, 42.0, 7.2, ALLUVIAL),
    rec("Tamil Nadu", "Salem", 32.0, 28.0, 35.0, 6.5, RED),
    rec("Tamil Nadu", "Tirunelveli", 38.0, 32.0, 40.0, 7.5, LOAMY),
    rec("Tamil Nadu", "Thanjavur", 55.0, 45.0, 55.0, 6.8, ALLUVIAL),
    rec("Tamil Nadu", "Erode", 35.0, 30.0, 38.0, 7.0, LOAMY),
    // Punjab
    rec("Punjab", "Ludhiana", 55.0, 45.0, 55.0, 7.5, ALLUVIAL),
    rec("Punjab", "Amritsar", 52.0, 42.0, 52.0, 7.8, ALLUVIAL),
    rec("Punjab", "Jalandhar", 50.0, 40.0, 50.0, 7.2, ALLUVIAL),
    rec("Punjab", "Patiala", 48.0, 40.0, 50.0, 7.5, ALLUVIAL),
    // Haryana
    rec("Haryana", "Gurgaon", 42.0, 35.0, 45.0, 8.0, ALLUVIAL),
    rec("Haryana", "Karnal", 50.0, 42.0, 52.0, 7.5, ALLUVIAL),
    rec("Haryana", "Hisar", 38.0, 32.0, 40.0, 8.2, ALLUVIAL),
    // Uttar Pradesh
    rec("Uttar Pradesh", "Lucknow", 48.0, 40.0, 50.0, 7.5, ALLUVIAL),
    rec("Uttar Pradesh", "Varanasi", 52.0, 42.0, 52.0, 7.2, ALLUVIAL),
    rec("Uttar Pradesh", "Agra", 45.0, 38.0, 48.0, 8.0, ALLUVIAL),
    rec("Uttar Pradesh", "Kanpur", 50.0, 40.0, 50.0, 7.5, ALLUVIAL),
    rec("Uttar Pradesh", "Meerut", 48.0, 40.0, 50.0, 7.8, ALLUVIAL),
    // Madhya Pradesh
    rec("Madhya Pradesh", "Bhopal", 45.0, 38.0, 48.0, 7.5, BLACK),
    rec("Madhya Pradesh", "Indore", 50.0, 42.0, 52.0, 7.0, BLACK),
    rec("Madhya Pradesh", "Jabalpur", 48.0, 40.0, 50.0, 6.8, ALLUVIAL),
    rec("Madhya Pradesh", "Gwalior", 42.0, 35.0, 45.0, 8.0, ALLUVIAL),
    // Rajasthan
    rec("Rajasthan", "Jaipur", 30.0, 25.0, 32.0, 8.5, RED),
    rec("Rajasthan", "Jodhpur", 25.0, 20.0, 28.0, 8.8, RED),
    rec("Rajasthan", "Udaipur", 35.0, 30.0, 38.0, 7.5, BLACK),
    rec("Rajasthan", "Kota", 40.0, 35.0, 42.0, 7.8, ALLUVIAL),
    // Gujarat
    rec("Gujarat", "Ahmedabad", 38.0, 32.0, 40.0, 8.0, ALLUVIAL),
    rec("Gujarat", "Surat", 45.0, 38.0, 48.0, 7.5, BLACK),
    rec("Gujarat", "Vadodara", 48.0, 40.0, 50.0, 7.2, BLACK),
    rec("Gujarat", "Rajkot", 35.0, 30.0, 38.0, 8.2, BLACK),
    // West Bengal
    rec("West Bengal", "Kolkata", 45.0, 38.0, 48.0, 6.5, ALLUVIAL),
    rec("West Bengal", "Howrah", 48.0, 40.0, 50.0, 6.8, ALLUVIAL),
    rec("West Bengal", "Darjeeling", 35.0, 30.0, 38.0, 5.5, SoilTag::Unknown),
    // Bihar
    rec("Bihar", "Patna", 50.0, 42.0, 52.0, 7.2, ALLUVIAL),
    rec("Bihar", "Gaya", 45.0, 38.0, 48.0, 7.5, ALLUVIAL),
    rec("Bihar", "Muzaffarpur", 52.0, 45.0, 55.0, 7.0, ALLUVIAL),
    // Odisha
    rec("Odisha", "Bhubaneswar", 38.0, 32.0, 40.0, 6.2, LATERITE),
    rec("Odisha", "Cuttack", 45.0, 38.0, 48.0, 6.5, ALLUVIAL),
    // Kerala
    rec("Kerala", "Thiruvananthapuram", 35.0, 30.0, 38.0, 5.5, LATERITE),
    rec("Kerala", "Kochi", 38.0, 32.0, 40.0, 5.8, LATERITE),
    rec("Kerala", "Kozhikode", 40.0, 35.0, 42.0, 5.5, LATERITE),
];

/// Exact record for a (state, district) pair, if one exists.
pub fn record(state: &str, district: &str) -> Option<&'static RegionalSoilRecord> {
    let key = RegionKey::new(state, district);
    REGIONAL_RECORDS.iter().find(|r| r.key() == key)
}

/// All records under a state, in table order.
pub fn state_records(state: &str) -> impl Iterator<Item = &'static RegionalSoilRecord> + '_ {
    REGIONAL_RECORDS.iter().filter(move |r| r.state == state)
}

/// Known states, in table order.
pub fn states() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for record in REGIONAL_RECORDS {
        if out.last() != Some(&record.state) {
            out.push(record.state);
        }
    }
    out
}

/// Known districts under a state, in table order. Empty for unknown states.
pub fn districts(state: &str) -> Vec<&'static str> {
    state_records(state).map(|r| r.district).collect()
}

// ============================================================================
// City Coordinates
// ============================================================================

/// Fixed fallback coordinate: geographic centroid of the covered area.
pub const FALLBACK_COORDINATE: (f64, f64) = (20.0, 78.0);

// Sparse: only major cities have entries. Everything else resolves to the
// centroid fallback.
static CITY_COORDINATES: &[(&str, &str, f64, f64)] = &[
    ("Telangana", "Hyderabad", 17.385, 78.4867),
    ("Maharashtra", "Pune", 18.5204, 73.8567),
    ("Karnataka", "Bangalore", 12.9716, 77.5946),
    ("Tamil Nadu", "Chennai", 13.0827, 80.2707),
    ("Andhra Pradesh", "Vijayawada", 16.5062, 80.648),
];

/// Coordinates for a (state, district) pair, if on record.
pub fn coordinates(state: &str, district: &str) -> Option<(f64, f64)> {
    CITY_COORDINATES
        .iter()
        .find(|(s, d, _, _)| *s == state && *d == district)
        .map(|(_, _, lat, lon)| (*lat, *lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_key_equality_and_hashing() {
        let a = RegionKey::new("Telangana", "Hyderabad");
        let b = RegionKey::new("Telangana", "Hyderabad");
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&RegionKey::new("Telangana", "Warangal")));
    }

    #[test]
    fn test_exact_record_lookup() {
        let record = record("Telangana", "Hyderabad").unwrap();
        assert_eq!(record.n, 42.0);
        assert_eq!(record.p, 35.0);
        assert_eq!(record.k, 45.0);
        assert_eq!(record.ph, 7.2);
        assert_eq!(record.tag, SoilTag::Type(SoilType::BlackSticky));

        assert!(super::record("Telangana", "Atlantis").is_none());
        assert!(super::record("Atlantis", "Hyderabad").is_none());
    }

    #[test]
    fn test_every_tag_is_enumerated_or_sentinel() {
        // The tag type makes this structural, but keep the invariant visible:
        // no record carries a Mixed tag (that sentinel is reserved for
        // region-level averages).
        for record in REGIONAL_RECORDS {
            assert_ne!(record.tag, SoilTag::Mixed, "{}/{}", record.state, record.district);
        }
    }

    #[test]
    fn test_record_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for record in REGIONAL_RECORDS {
            assert!(seen.insert(record.key()), "duplicate {}/{}", record.state, record.district);
        }
    }

    #[test]
    fn test_states_and_districts_enumeration() {
        let states = states();
        assert_eq!(states.len(), 15);
        assert_eq!(states[0], "Telangana");
        assert!(states.contains(&"Kerala"));

        let districts = districts("Punjab");
        assert_eq!(districts, vec!["Ludhiana", "Amritsar", "Jalandhar", "Patiala"]);
        assert!(super::districts("Atlantis").is_empty());
    }

    #[test]
    fn test_coordinates_sparse_with_fallback() {
        assert_eq!(coordinates("Telangana", "Hyderabad"), Some((17.385, 78.4867)));
        // Districts without an entry get no coordinate; callers substitute
        // the centroid.
        assert_eq!(coordinates("Telangana", "Warangal"), None);
        assert_eq!(FALLBACK_COORDINATE, (20.0, 78.0));
    }

    #[test]
    fn test_soil_tag_ids() {
        assert_eq!(SoilTag::Type(SoilType::BlackSticky).id(), "black_sticky");
        assert_eq!(SoilTag::Mixed.id(), "mixed");
        assert_eq!(SoilTag::Unknown.id(), "unknown");
    }
}
