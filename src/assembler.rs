//! Feature vector assembly
//!
//! Merges the categorical tables, the regional resolver and optional
//! caller-supplied numeric values into one canonical feature vector
//! {N, P, K, pH, temperature, humidity, rainfall}, recording per-field
//! provenance. Assembly is total: worst case is the all-default vector.

use serde::{Deserialize, Serialize};

use crate::profiles;
use crate::regional::{self, WeatherService, WeatherSource};
use crate::vision::{self, SoilScan};

// ============================================================================
// Output Types
// ============================================================================

/// Canonical 7-element feature vector consumed by downstream
/// recommendation logic. Constructed fresh per request, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub ph: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

/// Global defaults filling any field no other source supplied.
pub const DEFAULT_FEATURES: FeatureVector = FeatureVector {
    n: 40.0,
    p: 35.0,
    k: 40.0,
    ph: 6.5,
    temperature: 25.0,
    humidity: 70.0,
    rainfall: 100.0,
};

/// Which source supplied a feature vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Raw numeric value passed by the caller
    Override,
    /// Soil-type profile table
    SoilType,
    /// Water-availability profile table
    WaterLevel,
    /// Regional soil record or weather resolution
    Region,
    /// Global default
    Default,
}

/// Per-field provenance for one assembled vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Provenance {
    #[serde(rename = "N")]
    pub n: FieldSource,
    #[serde(rename = "P")]
    pub p: FieldSource,
    #[serde(rename = "K")]
    pub k: FieldSource,
    pub ph: FieldSource,
    pub temperature: FieldSource,
    pub humidity: FieldSource,
    pub rainfall: FieldSource,
}

/// Assembled vector plus everything needed to explain it.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledVector {
    pub features: FeatureVector,
    pub provenance: Provenance,

    /// Present when a region weather lookup ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_source: Option<WeatherSource>,

    /// Advisory photo analysis, surfaced alongside the numeric vector.
    /// Its nutrient estimate is categorical and is never merged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<SoilScan>,
}

// ============================================================================
// Inputs
// ============================================================================

/// Sparse farmer-friendly inputs. Any combination may be present.
///
/// Doubles as the `/convert-simple` request body; the raw numeric fields
/// are the explicit overrides that outrank every table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimpleInputs {
    pub state: Option<String>,
    pub district: Option<String>,
    pub soil_type: Option<String>,
    pub water: Option<String>,

    #[serde(rename = "N")]
    pub n: Option<f64>,
    #[serde(rename = "P")]
    pub p: Option<f64>,
    #[serde(rename = "K")]
    pub k: Option<f64>,
    pub ph: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: Option<f64>,

    /// Soil photo bytes, attached programmatically (not part of the JSON
    /// body).
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
}

impl SimpleInputs {
    fn has_location(&self) -> bool {
        self.state.is_some() && self.district.is_some()
    }
}

// ============================================================================
// Assembly
// ============================================================================

// A field is written by the highest-precedence source that has a value;
// later (lower) tiers only fill still-empty slots.
#[derive(Default)]
struct MergeState {
    n: Option<(f64, FieldSource)>,
    p: Option<(f64, FieldSource)>,
    k: Option<(f64, FieldSource)>,
    ph: Option<(f64, FieldSource)>,
    temperature: Option<(f64, FieldSource)>,
    humidity: Option<(f64, FieldSource)>,
    rainfall: Option<(f64, FieldSource)>,
}

fn fill(slot: &mut Option<(f64, FieldSource)>, value: f64, source: FieldSource) {
    if slot.is_none() {
        *slot = Some((value, source));
    }
}

fn finish(slot: Option<(f64, FieldSource)>, default: f64) -> (f64, FieldSource) {
    slot.unwrap_or((default, FieldSource::Default))
}

/// Merge all available sources into one feature vector.
///
/// Precedence per field, highest first: explicit numeric override,
/// soil-type profile (N/P/K/pH), water-level profile (rainfall), regional
/// resolution (anything still empty), global defaults. Only the components
/// needed for the inputs present are invoked; in particular no weather
/// call happens when temperature, humidity and rainfall are already
/// covered or no location was given.
pub async fn assemble(inputs: &SimpleInputs, weather: &WeatherService) -> AssembledVector {
    let mut merge = MergeState::default();

    // Tier 1: explicit numeric overrides.
    for (slot, value) in [
        (&mut merge.n, inputs.n),
        (&mut merge.p, inputs.p),
        (&mut merge.k, inputs.k),
        (&mut merge.ph, inputs.ph),
        (&mut merge.temperature, inputs.temperature),
        (&mut merge.humidity, inputs.humidity),
        (&mut merge.rainfall, inputs.rainfall),
    ] {
        if let Some(value) = value {
            fill(slot, value, FieldSource::Override);
        }
    }

    // Tier 2: soil-type profile. Unknown ids leave the fields for the
    // tiers below.
    if let Some(id) = &inputs.soil_type {
        match profiles::lookup_soil_type(id) {
            Some(profile) => {
                fill(&mut merge.n, profile.n, FieldSource::SoilType);
                fill(&mut merge.p, profile.p, FieldSource::SoilType);
                fill(&mut merge.k, profile.k, FieldSource::SoilType);
                fill(&mut merge.ph, profile.ph, FieldSource::SoilType);
            }
            None => tracing::debug!("ignoring unknown soil type {:?}", id),
        }
    }

    // Tier 3: water level. The lookup itself defaults unknown ids to
    // "normal".
    if let Some(id) = &inputs.water {
        let profile = profiles::lookup_water_level(id);
        fill(&mut merge.rainfall, profile.rainfall_mm, FieldSource::WaterLevel);
    }

    // Tier 4: regional resolution, only for fields still empty.
    let mut weather_source = None;
    if inputs.has_location() {
        let (state, district) = (
            inputs.state.as_deref().unwrap_or_default(),
            inputs.district.as_deref().unwrap_or_default(),
        );

        let needs_weather = merge.temperature.is_none()
            || merge.humidity.is_none()
            || merge.rainfall.is_none();
        if needs_weather {
            let (estimate, source) = weather.resolve_by_location(state, district).await;
            weather_source = Some(source);
            fill(&mut merge.temperature, estimate.temperature, FieldSource::Region);
            fill(&mut merge.humidity, estimate.humidity, FieldSource::Region);
            fill(&mut merge.rainfall, estimate.rainfall, FieldSource::Region);
        }

        let needs_soil = merge.n.is_none()
            || merge.p.is_none()
            || merge.k.is_none()
            || merge.ph.is_none();
        if needs_soil {
            let estimate = regional::resolve_soil(state, district);
            fill(&mut merge.n, estimate.n, FieldSource::Region);
            fill(&mut merge.p, estimate.p, FieldSource::Region);
            fill(&mut merge.k, estimate.k, FieldSource::Region);
            fill(&mut merge.ph, estimate.ph, FieldSource::Region);
        }
    }

    // Tier 5: global defaults.
    let (n, n_src) = finish(merge.n, DEFAULT_FEATURES.n);
    let (p, p_src) = finish(merge.p, DEFAULT_FEATURES.p);
    let (k, k_src) = finish(merge.k, DEFAULT_FEATURES.k);
    let (ph, ph_src) = finish(merge.ph, DEFAULT_FEATURES.ph);
    let (temperature, temperature_src) = finish(merge.temperature, DEFAULT_FEATURES.temperature);
    let (humidity, humidity_src) = finish(merge.humidity, DEFAULT_FEATURES.humidity);
    let (rainfall, rainfall_src) = finish(merge.rainfall, DEFAULT_FEATURES.rainfall);

    // Advisory photo analysis. A decode failure must not fail the
    // assembly; the numeric vector stands on its own.
    let scan = match &inputs.image {
        Some(bytes) => match vision::classify(bytes) {
            Ok(scan) => Some(scan),
            Err(e) => {
                tracing::warn!("ignoring unreadable soil photo: {}", e);
                None
            }
        },
        None => None,
    };

    AssembledVector {
        features: FeatureVector { n, p, k, ph, temperature, humidity, rainfall },
        provenance: Provenance {
            n: n_src,
            p: p_src,
            k: k_src,
            ph: ph_src,
            temperature: temperature_src,
            humidity: humidity_src,
            rainfall: rainfall_src,
        },
        weather_source,
        scan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::regional::Season;

    fn offline_weather() -> WeatherService {
        WeatherService::new(None)
    }

    fn inputs() -> SimpleInputs {
        SimpleInputs::default()
    }

    #[tokio::test]
    async fn test_soil_type_only() {
        let result = assemble(
            &SimpleInputs { soil_type: Some("alluvial".into()), ..inputs() },
            &offline_weather(),
        )
        .await;

        assert_eq!(result.features.n, 55.0);
        assert_eq!(result.features.p, 45.0);
        assert_eq!(result.features.k, 55.0);
        assert_relative_eq!(result.features.ph, 7.0);
        // No region given: climate fields stay at global defaults.
        assert_eq!(result.features.temperature, 25.0);
        assert_eq!(result.features.humidity, 70.0);
        assert_eq!(result.features.rainfall, 100.0);

        assert_eq!(result.provenance.n, FieldSource::SoilType);
        assert_eq!(result.provenance.ph, FieldSource::SoilType);
        assert_eq!(result.provenance.temperature, FieldSource::Default);
        assert_eq!(result.provenance.rainfall, FieldSource::Default);
        assert!(result.weather_source.is_none());
        assert!(result.scan.is_none());
    }

    #[tokio::test]
    async fn test_empty_inputs_yield_all_defaults() {
        let result = assemble(&inputs(), &offline_weather()).await;
        assert_eq!(result.features, DEFAULT_FEATURES);
        for source in [
            result.provenance.n,
            result.provenance.p,
            result.provenance.k,
            result.provenance.ph,
            result.provenance.temperature,
            result.provenance.humidity,
            result.provenance.rainfall,
        ] {
            assert_eq!(source, FieldSource::Default);
        }
    }

    #[tokio::test]
    async fn test_soil_type_beats_region() {
        // Hyderabad's record says N=42; the black_sticky profile says N=45.
        // The profile wins for soil fields, the region still supplies
        // climate.
        let result = assemble(
            &SimpleInputs {
                state: Some("Telangana".into()),
                district: Some("Hyderabad".into()),
                soil_type: Some("black_sticky".into()),
                ..inputs()
            },
            &offline_weather(),
        )
        .await;

        assert_eq!(result.features.n, 45.0);
        assert_relative_eq!(result.features.ph, 7.5);
        assert_eq!(result.provenance.n, FieldSource::SoilType);
        assert_eq!(result.provenance.temperature, FieldSource::Region);
        assert_eq!(result.provenance.humidity, FieldSource::Region);
        assert_eq!(result.weather_source, Some(WeatherSource::SeasonalFallback));
    }

    #[tokio::test]
    async fn test_overrides_beat_everything() {
        let result = assemble(
            &SimpleInputs {
                state: Some("Telangana".into()),
                district: Some("Hyderabad".into()),
                soil_type: Some("black_sticky".into()),
                n: Some(90.0),
                temperature: Some(31.0),
                ..inputs()
            },
            &offline_weather(),
        )
        .await;

        assert_eq!(result.features.n, 90.0);
        assert_eq!(result.provenance.n, FieldSource::Override);
        assert_eq!(result.features.temperature, 31.0);
        assert_eq!(result.provenance.temperature, FieldSource::Override);
        // Non-overridden soil fields still come from the profile.
        assert_eq!(result.features.p, 35.0);
        assert_eq!(result.provenance.p, FieldSource::SoilType);
    }

    #[tokio::test]
    async fn test_water_level_supplies_rainfall_over_region() {
        let result = assemble(
            &SimpleInputs {
                state: Some("Telangana".into()),
                district: Some("Hyderabad".into()),
                water: Some("heavy".into()),
                ..inputs()
            },
            &offline_weather(),
        )
        .await;

        assert_eq!(result.features.rainfall, 400.0);
        assert_eq!(result.provenance.rainfall, FieldSource::WaterLevel);
        // Soil fields come from the exact regional record.
        assert_eq!(result.features.n, 42.0);
        assert_eq!(result.provenance.n, FieldSource::Region);
    }

    #[tokio::test]
    async fn test_unknown_water_level_reads_as_normal() {
        let result = assemble(
            &SimpleInputs { water: Some("deluge".into()), ..inputs() },
            &offline_weather(),
        )
        .await;
        assert_eq!(result.features.rainfall, 150.0);
        assert_eq!(result.provenance.rainfall, FieldSource::WaterLevel);
    }

    #[tokio::test]
    async fn test_unknown_soil_type_falls_through_to_region() {
        let result = assemble(
            &SimpleInputs {
                state: Some("Punjab".into()),
                district: Some("Ludhiana".into()),
                soil_type: Some("moon_dust".into()),
                ..inputs()
            },
            &offline_weather(),
        )
        .await;

        // Unknown id contributes nothing; the exact record fills in.
        assert_eq!(result.features.n, 55.0);
        assert_eq!(result.provenance.n, FieldSource::Region);
    }

    #[tokio::test]
    async fn test_region_only_uses_seasonal_weather() {
        let result = assemble(
            &SimpleInputs {
                state: Some("Kerala".into()),
                district: Some("Kochi".into()),
                ..inputs()
            },
            &offline_weather(),
        )
        .await;

        let seasonal = Season::current().estimate();
        assert_eq!(result.features.temperature, seasonal.temperature);
        assert_eq!(result.features.humidity, seasonal.humidity);
        assert_eq!(result.features.rainfall, seasonal.rainfall);
        assert_eq!(result.weather_source, Some(WeatherSource::SeasonalFallback));
    }

    #[tokio::test]
    async fn test_weather_lookup_skipped_when_climate_fully_overridden() {
        // All three climate fields supplied: no weather resolution runs,
        // so no weather source is reported.
        let result = assemble(
            &SimpleInputs {
                state: Some("Telangana".into()),
                district: Some("Hyderabad".into()),
                temperature: Some(30.0),
                humidity: Some(55.0),
                rainfall: Some(120.0),
                ..inputs()
            },
            &offline_weather(),
        )
        .await;

        assert!(result.weather_source.is_none());
        assert_eq!(result.features.temperature, 30.0);
        // Soil fields still resolve from the record.
        assert_eq!(result.provenance.n, FieldSource::Region);
    }

    #[tokio::test]
    async fn test_advisory_image_never_merges_into_vector() {
        let img = image::RgbImage::from_pixel(32, 32, image::Rgb([40, 40, 40]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .unwrap();

        let result = assemble(
            &SimpleInputs { image: Some(bytes.into_inner()), ..inputs() },
            &offline_weather(),
        )
        .await;

        // The scan is surfaced, the numeric vector stays at defaults.
        let scan = result.scan.expect("scan should be present");
        assert_eq!(scan.soil_class, crate::vision::SoilClass::Black);
        assert_eq!(result.features, DEFAULT_FEATURES);
        assert_eq!(result.provenance.n, FieldSource::Default);
    }

    #[tokio::test]
    async fn test_unreadable_advisory_image_does_not_fail_assembly() {
        let result = assemble(
            &SimpleInputs { image: Some(b"garbage".to_vec()), ..inputs() },
            &offline_weather(),
        )
        .await;
        assert!(result.scan.is_none());
        assert_eq!(result.features, DEFAULT_FEATURES);
    }
}
