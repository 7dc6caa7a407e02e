//! Soil photo analysis
//!
//! - `color` - decoding, canonical downscaling, HSV math, mean color
//! - `classifier` - ordered threshold rules and the moisture heuristic

pub mod classifier;
pub mod color;

pub use classifier::{
    classify, classify_color, moisture_from_value, NutrientEstimate, NutrientLevel, SoilClass,
    SoilScan,
};
pub use color::{decode_and_downscale, mean_hsv, HsvColorSample, ScanError, CANONICAL_SIZE};
