//! Three-tier regional soil resolution
//!
//! Exact district record → state-level average → global default. The
//! resolver is total: every (state, district) pair produces an estimate,
//! and the tier tells the caller how good it is.

use serde::Serialize;

use super::records::{self, SoilTag};

/// Which fallback tier produced a regional soil estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTier {
    /// A record exists for the literal (state, district) pair
    Exact,

    /// No exact record; arithmetic mean over the state's records
    RegionAverage,

    /// Nothing on record for the state at all
    Default,
}

impl SourceTier {
    /// Human-readable data-source description for API responses.
    pub fn description(&self) -> &'static str {
        match self {
            SourceTier::Exact => "Regional average data",
            SourceTier::RegionAverage => "State average data",
            SourceTier::Default => "Default values",
        }
    }
}

/// Soil estimate for a region, with provenance tier.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RegionalSoilEstimate {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub ph: f64,
    pub tag: SoilTag,
    pub tier: SourceTier,
}

/// Global default soil estimate, used when a state has no records at all.
pub const DEFAULT_SOIL: RegionalSoilEstimate = RegionalSoilEstimate {
    n: 40.0,
    p: 35.0,
    k: 40.0,
    ph: 7.0,
    tag: SoilTag::Unknown,
    tier: SourceTier::Default,
};

/// Resolve soil characteristics for a (state, district) pair.
///
/// Evaluated in order, first success wins:
/// 1. exact district record, returned verbatim;
/// 2. state average: mean N/P/K rounded to the nearest integer, pH rounded
///    to one decimal, tag `mixed`;
/// 3. the global default.
pub fn resolve_soil(state: &str, district: &str) -> RegionalSoilEstimate {
    if let Some(record) = records::record(state, district) {
        return RegionalSoilEstimate {
            n: record.n,
            p: record.p,
            k: record.k,
            ph: record.ph,
            tag: record.tag,
            tier: SourceTier::Exact,
        };
    }

    let state_records: Vec<_> = records::state_records(state).collect();
    if !state_records.is_empty() {
        let count = state_records.len() as f64;
        let mean = |f: fn(&records::RegionalSoilRecord) -> f64| {
            state_records.iter().map(|r| f(r)).sum::<f64>() / count
        };
        return RegionalSoilEstimate {
            n: mean(|r| r.n).round(),
            p: mean(|r| r.p).round(),
            k: mean(|r| r.k).round(),
            ph: (mean(|r| r.ph) * 10.0).round() / 10.0,
            tag: SoilTag::Mixed,
            tier: SourceTier::RegionAverage,
        };
    }

    DEFAULT_SOIL
}
