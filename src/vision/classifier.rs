//! Color-heuristic soil classification
//!
//! Classifies the mean color of a soil photo into a fixed set of soil
//! classes using an ordered threshold chain, and estimates surface moisture
//! from brightness. The whole pipeline is an explicit heuristic: useful as
//! a qualitative hint, not measured ground truth.

use serde::Serialize;

use super::color::{self, HsvColorSample, ScanError};

// ============================================================================
// Soil Classes
// ============================================================================

/// Soil class detected from a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilClass {
    Red,
    Black,
    SandyLoamy,
    Alluvial,
    Loamy,
}

impl SoilClass {
    /// Display name used in API responses.
    pub fn display_name(&self) -> &'static str {
        match self {
            SoilClass::Red => "Red Soil",
            SoilClass::Black => "Black Soil",
            SoilClass::SandyLoamy => "Sandy/Loamy Soil",
            SoilClass::Alluvial => "Alluvial Soil",
            SoilClass::Loamy => "Loamy Soil",
        }
    }

    /// Fixed qualitative nutrient estimate for this class.
    pub fn nutrient_estimate(&self) -> NutrientEstimate {
        match self {
            SoilClass::Red => NutrientEstimate {
                n: NutrientLevel::Low,
                p: NutrientLevel::Low,
                k: NutrientLevel::Medium,
                ph: 6.5,
            },
            SoilClass::Black => NutrientEstimate {
                n: NutrientLevel::High,
                p: NutrientLevel::Low,
                k: NutrientLevel::High,
                ph: 7.5,
            },
            SoilClass::SandyLoamy => NutrientEstimate {
                n: NutrientLevel::Low,
                p: NutrientLevel::Medium,
                k: NutrientLevel::Medium,
                ph: 7.0,
            },
            SoilClass::Alluvial => NutrientEstimate {
                n: NutrientLevel::Medium,
                p: NutrientLevel::Medium,
                k: NutrientLevel::High,
                ph: 7.2,
            },
            SoilClass::Loamy => NutrientEstimate {
                n: NutrientLevel::Medium,
                p: NutrientLevel::Medium,
                k: NutrientLevel::Medium,
                ph: 7.0,
            },
        }
    }

    /// One-line agronomic note for this class.
    pub fn note(&self) -> &'static str {
        match self {
            SoilClass::Red => "Rich in iron, suitable for cotton, wheat, pulses.",
            SoilClass::Black => "Excellent moisture retention. Good for cotton, sugarcane.",
            SoilClass::SandyLoamy => "Well-drained. Good for groundnut, potato.",
            SoilClass::Alluvial => "Very fertile. Suitable for rice, wheat, sugarcane.",
            SoilClass::Loamy => "Balanced texture. Good for most crops.",
        }
    }
}

/// Qualitative nutrient band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
}

/// Qualitative NPK estimate plus a pH guess.
///
/// Categorical, not on the numeric scale the feature assembler works in;
/// never merged into the feature vector.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NutrientEstimate {
    #[serde(rename = "N")]
    pub n: NutrientLevel,
    #[serde(rename = "P")]
    pub p: NutrientLevel,
    #[serde(rename = "K")]
    pub k: NutrientLevel,
    #[serde(rename = "pH")]
    pub ph: f64,
}

/// Full result of analyzing one soil photo.
#[derive(Debug, Clone, Serialize)]
pub struct SoilScan {
    pub soil_class: SoilClass,
    pub confidence: f64,
    pub nutrients: NutrientEstimate,
    pub moisture_percent: f64,
    pub mean_color: HsvColorSample,
}

// ============================================================================
// Classification Rules
// ============================================================================

/// Classify a mean color into a soil class with a fixed confidence.
///
/// Ordered rule chain; the first match wins and later rules never override
/// an earlier one. Low brightness dominates hue: a dark photo is black soil
/// whatever its hue says.
pub fn classify_color(sample: &HsvColorSample) -> (SoilClass, f64) {
    let HsvColorSample { hue: h, saturation: s, value: v } = *sample;

    // 1. Saturated red hues (wrapping around the hue circle)
    if (h <= 20.0 || h >= 160.0) && s > 50.0 {
        return (SoilClass::Red, 0.85);
    }

    // 2. Dark regardless of hue
    if v < 60.0 {
        return (SoilClass::Black, 0.90);
    }

    // 3. Yellow/orange band
    if (20.0..=40.0).contains(&h) {
        return (SoilClass::SandyLoamy, 0.80);
    }

    // 4. Mid-brightness brown
    if (10.0..=25.0).contains(&h) && (60.0..=150.0).contains(&v) {
        return (SoilClass::Alluvial, 0.75);
    }

    // 5. Fallback
    (SoilClass::Loamy, 0.60)
}

/// Estimate surface moisture from mean brightness.
///
/// Linear map of V from [40, 200] onto [90, 10], clamped at the edges;
/// darker reads as wetter. A crude proxy, kept because it needs nothing
/// but the photo.
pub fn moisture_from_value(v: f64) -> f64 {
    const V_DARK: f64 = 40.0;
    const V_BRIGHT: f64 = 200.0;
    const MOISTURE_WET: f64 = 90.0;
    const MOISTURE_DRY: f64 = 10.0;

    if v <= V_DARK {
        return MOISTURE_WET;
    }
    if v >= V_BRIGHT {
        return MOISTURE_DRY;
    }
    MOISTURE_WET + (v - V_DARK) * (MOISTURE_DRY - MOISTURE_WET) / (V_BRIGHT - V_DARK)
}

/// Analyze a soil photo: decode, downscale, average, classify.
pub fn classify(bytes: &[u8]) -> Result<SoilScan, ScanError> {
    let img = color::decode_and_downscale(bytes)?;
    let sample = color::mean_hsv(&img);
    let (soil_class, confidence) = classify_color(&sample);

    Ok(SoilScan {
        soil_class,
        confidence,
        nutrients: soil_class.nutrient_estimate(),
        moisture_percent: moisture_from_value(sample.value),
        mean_color: sample,
    })
}
