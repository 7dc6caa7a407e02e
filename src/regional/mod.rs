//! Geographic resolution
//!
//! Turns a (state, district) pair into soil and weather estimates:
//! - `records` - embedded reference tables and the composite region key
//! - `soil` - three-tier soil fallback (exact / region-average / default)
//! - `weather` - live weather with deterministic seasonal degradation

pub mod records;
pub mod soil;
pub mod weather;

pub use records::{RegionKey, RegionalSoilRecord, SoilTag, FALLBACK_COORDINATE};
pub use soil::{resolve_soil, RegionalSoilEstimate, SourceTier, DEFAULT_SOIL};
pub use weather::{
    OpenWeatherClient, Season, WeatherEstimate, WeatherProvider, WeatherService, WeatherSource,
};
