//! Agronomic feature inference
//!
//! Turns heterogeneous, partially-overlapping farmer inputs - a soil photo,
//! coarse categorical selections, a (state, district) location - into one
//! canonical numeric feature vector {N, P, K, pH, temperature, humidity,
//! rainfall} with per-field provenance.
//!
//! - `profiles`: static soil-type and water-availability tables
//! - `regional`: three-tier soil fallback + weather with seasonal degradation
//! - `vision`: color-heuristic soil photo classification
//! - `assembler`: precedence merge into the canonical vector
//! - `api_server`: JSON HTTP surface over all of the above

pub mod api_server;
pub mod assembler;
pub mod profiles;
pub mod regional;
pub mod vision;

// Re-export the common entry points
pub use api_server::{create_router, AppState};
pub use assembler::{
    assemble, AssembledVector, FeatureVector, FieldSource, Provenance, SimpleInputs,
    DEFAULT_FEATURES,
};
pub use profiles::{lookup_soil_type, lookup_water_level, SoilType, WaterLevel};
pub use regional::{
    resolve_soil, OpenWeatherClient, RegionalSoilEstimate, Season, SoilTag, SourceTier,
    WeatherProvider, WeatherService, WeatherSource,
};
pub use vision::{classify, ScanError, SoilClass, SoilScan};
