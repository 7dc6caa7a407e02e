//! Soil-type and water-availability profile tables
//!
//! Static mappings from the farmer-facing categorical selectors (visual soil
//! type, qualitative water availability) to partial feature estimates. The
//! numbers are deliberately coarse regional averages, not lab measurements.

use serde::Serialize;

// ============================================================================
// Soil Types
// ============================================================================

/// Visual soil type the farmer can pick from a gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    /// Black cotton soil: dark, sticky when wet, cracks when dry
    BlackSticky,

    /// Red sandy soil: reddish, drains quickly
    RedSandy,

    /// Brown loamy soil: soft texture, holds water well
    BrownLoamy,

    /// Yellow/laterite soil: hard when dry, acidic
    YellowClay,

    /// Alluvial soil: river deposits, very fertile
    Alluvial,
}

impl SoilType {
    /// Parse a wire identifier (e.g. "black_sticky") into a soil type.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "black_sticky" => Some(SoilType::BlackSticky),
            "red_sandy" => Some(SoilType::RedSandy),
            "brown_loamy" => Some(SoilType::BrownLoamy),
            "yellow_clay" => Some(SoilType::YellowClay),
            "alluvial" => Some(SoilType::Alluvial),
            _ => None,
        }
    }

    /// Wire identifier for this soil type.
    pub fn id(&self) -> &'static str {
        match self {
            SoilType::BlackSticky => "black_sticky",
            SoilType::RedSandy => "red_sandy",
            SoilType::BrownLoamy => "brown_loamy",
            SoilType::YellowClay => "yellow_clay",
            SoilType::Alluvial => "alluvial",
        }
    }

    /// Profile entry for this soil type.
    pub fn profile(&self) -> &'static SoilTypeProfile {
        &SOIL_TYPES[*self as usize]
    }

    /// All soil types, in display order.
    pub fn all() -> &'static [SoilType] {
        &[
            SoilType::BlackSticky,
            SoilType::RedSandy,
            SoilType::BrownLoamy,
            SoilType::YellowClay,
            SoilType::Alluvial,
        ]
    }
}

/// Static profile for one visual soil type.
#[derive(Debug)]
pub struct SoilTypeProfile {
    pub soil_type: SoilType,

    /// Display name (e.g. "Black Cotton Soil")
    pub name: &'static str,

    /// Localized names, keyed by language code
    pub local_names: &'static [(&'static str, &'static str)],

    // Partial feature estimate supplied by this profile
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ph: f64,

    /// One-line visual description shown in the picker
    pub description: &'static str,

    /// Crops commonly grown on this soil
    pub crops: &'static [&'static str],
}

// Order must match the SoilType discriminants (SoilType::profile indexes in).
static SOIL_TYPES: &[SoilTypeProfile] = &[
    SoilTypeProfile {
        soil_type: SoilType::BlackSticky,
        name: "Black Cotton Soil",
        local_names: &[("en", "Black Soil"), ("hi", "काली मिट्टी"), ("te", "నల్ల మట్టి")],
        n: 45.0,
        p: 35.0,
        k: 40.0,
        ph: 7.5,
        description: "Dark colored, sticky when wet, cracks when dry",
        crops: &["Cotton", "Wheat", "Jowar", "Sunflower"],
    },
    SoilTypeProfile {
        soil_type: SoilType::RedSandy,
        name: "Red Sandy Soil",
        local_names: &[("en", "Red Soil"), ("hi", "लाल मिट्टी"), ("te", "ఎర్ర మట్టి")],
        n: 30.0,
        p: 25.0,
        k: 35.0,
        ph: 6.0,
        description: "Reddish color, sandy texture, drains water quickly",
        crops: &["Groundnut", "Millets", "Pulses", "Tobacco"],
    },
    SoilTypeProfile {
        soil_type: SoilType::BrownLoamy,
        name: "Loamy Soil",
        local_names: &[("en", "Brown Soil"), ("hi", "दोमट मिट्टी"), ("te", "గోధుమ మట్టి")],
        n: 50.0,
        p: 45.0,
        k: 50.0,
        ph: 6.5,
        description: "Brown colored, soft texture, holds water well",
        crops: &["Rice", "Vegetables", "Fruits", "Sugarcane"],
    },
    SoilTypeProfile {
        soil_type: SoilType::YellowClay,
        name: "Laterite Soil",
        local_names: &[("en", "Yellow/Laterite"), ("hi", "पीली मिट्टी"), ("te", "పసుపు మట్టి")],
        n: 35.0,
        p: 30.0,
        k: 38.0,
        ph: 5.5,
        description: "Yellowish color, hard when dry, acidic nature",
        crops: &["Tea", "Coffee", "Cashew", "Rubber"],
    },
    SoilTypeProfile {
        soil_type: SoilType::Alluvial,
        name: "Alluvial Soil",
        local_names: &[("en", "River Soil"), ("hi", "जलोढ़ मिट्टी"), ("te", "ఒండ్రు మట్టి")],
        n: 55.0,
        p: 45.0,
        k: 55.0,
        ph: 7.0,
        description: "Near rivers, very fertile, grayish color",
        crops: &["Rice", "Wheat", "Sugarcane", "Vegetables"],
    },
];

/// Look up a soil type profile by wire identifier.
///
/// Returns None for unrecognized ids; the caller decides whether that is a
/// user error (direct lookup route) or simply a field to leave unfilled
/// (assembler).
pub fn lookup_soil_type(id: &str) -> Option<&'static SoilTypeProfile> {
    SoilType::from_id(id).map(|t| t.profile())
}

// ============================================================================
// Water Availability Levels
// ============================================================================

/// Qualitative water availability, ordered driest to wettest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterLevel {
    VeryLess,
    Less,
    Normal,
    Good,
    Heavy,
}

impl WaterLevel {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "very_less" => Some(WaterLevel::VeryLess),
            "less" => Some(WaterLevel::Less),
            "normal" => Some(WaterLevel::Normal),
            "good" => Some(WaterLevel::Good),
            "heavy" => Some(WaterLevel::Heavy),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            WaterLevel::VeryLess => "very_less",
            WaterLevel::Less => "less",
            WaterLevel::Normal => "normal",
            WaterLevel::Good => "good",
            WaterLevel::Heavy => "heavy",
        }
    }

    pub fn profile(&self) -> &'static WaterLevelProfile {
        &WATER_LEVELS[*self as usize]
    }

    /// All water levels, driest first.
    pub fn all() -> &'static [WaterLevel] {
        &[
            WaterLevel::VeryLess,
            WaterLevel::Less,
            WaterLevel::Normal,
            WaterLevel::Good,
            WaterLevel::Heavy,
        ]
    }
}

/// Static profile for one qualitative water level.
#[derive(Debug)]
pub struct WaterLevelProfile {
    pub level: WaterLevel,

    /// Rainfall estimate this selection stands in for
    pub rainfall_mm: f64,

    /// Localized labels, keyed by language code
    pub labels: &'static [(&'static str, &'static str)],
}

// Order must match the WaterLevel discriminants.
static WATER_LEVELS: &[WaterLevelProfile] = &[
    WaterLevelProfile {
        level: WaterLevel::VeryLess,
        rainfall_mm: 50.0,
        labels: &[("en", "Very Less"), ("hi", "बहुत कम"), ("te", "చాలా తక్కువ")],
    },
    WaterLevelProfile {
        level: WaterLevel::Less,
        rainfall_mm: 100.0,
        labels: &[("en", "Less"), ("hi", "कम"), ("te", "తక్కువ")],
    },
    WaterLevelProfile {
        level: WaterLevel::Normal,
        rainfall_mm: 150.0,
        labels: &[("en", "Normal"), ("hi", "सामान्य"), ("te", "సాధారణ")],
    },
    WaterLevelProfile {
        level: WaterLevel::Good,
        rainfall_mm: 250.0,
        labels: &[("en", "Good"), ("hi", "अच्छा"), ("te", "మంచి")],
    },
    WaterLevelProfile {
        level: WaterLevel::Heavy,
        rainfall_mm: 400.0,
        labels: &[("en", "Heavy"), ("hi", "भारी"), ("te", "భారీ")],
    },
];

/// Look up a water level profile by wire identifier.
///
/// Unrecognized ids fall back to the "normal" profile. An unset selector is
/// treated as "typical conditions" in the caller-facing UX, so this is a
/// deliberate default, not an error.
pub fn lookup_water_level(id: &str) -> &'static WaterLevelProfile {
    WaterLevel::from_id(id)
        .unwrap_or(WaterLevel::Normal)
        .profile()
}
