//! Distribution-engine outputs
//!
//! `DistributionReport` is the structured results mapping rendered into
//! report tables; the two Lorenz tables are flat row sets written as CSV for
//! external plotting. All types serialize with serde so the CLI can emit them
//! without reshaping.

use serde::Serialize;

use super::panel::EducationTier;

/// Population-share thresholds (percent) read off the Lorenz curves
pub const LORENZ_THRESHOLDS: [f64; 4] = [20.0, 40.0, 60.0, 80.0];

/// One row of a Lorenz table: a household's position on the cumulative
/// population/wealth curve. Field names double as the CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LorenzPoint {
    pub household_id: u32,
    pub education_tier: u8,
    /// Running population share, percent, inclusive of this household
    pub cum_population_share: f64,
    /// Running wealth share, percent, inclusive of this household
    pub cum_wealth_share: f64,
}

/// Weighted moments of log initial income for one education tier, measured
/// over households at the minimum eligible age
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InitialIncomeMoments {
    /// Exponentiated weighted mean of log quarterly permanent income (level)
    pub mean_level: f64,
    /// The level rescaled to thousands, as shown in report tables
    pub mean_level_thousands: f64,
    /// Weighted standard deviation of log quarterly permanent income
    pub log_std: f64,
}

/// Statistics for one education tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierReport {
    pub tier: EducationTier,
    /// Share of the population in this tier, percent
    pub population_pct: f64,
    /// Share of total weighted liquid wealth held by this tier, percent
    pub wealth_pct: f64,
    /// `None` when the tier has no household at the minimum eligible age
    pub initial_income: Option<InitialIncomeMoments>,
    /// Weighted median of liquid wealth over annual permanent income
    pub median_wealth_to_income: f64,
    /// The median ratio in annual percent (x100)
    pub median_wealth_to_income_annual_pct: f64,
    /// The median ratio in quarterly percent (x400)
    pub median_wealth_to_income_quarterly_pct: f64,
    /// Tier-relative Lorenz readouts at the standard thresholds; `None` when
    /// no household in the tier sits at or below a threshold
    pub lorenz_pct: [Option<f64>; 4],
}

/// The full battery of distribution statistics for one panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    /// Per-tier statistics, ordered by tier, only tiers that are populated
    pub tiers: Vec<TierReport>,
    /// Population-wide Lorenz readouts at the standard thresholds
    pub lorenz_pct: [Option<f64>; 4],
    /// Share of total weighted wealth held by each wealth quartile
    /// (quartile 1 = poorest), percent
    pub quartile_wealth_pct: [f64; 4],
}

/// Report plus the Lorenz tables it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionOutput {
    pub report: DistributionReport,
    /// Population-wide Lorenz curve, ascending in wealth
    pub lorenz_all: Vec<LorenzPoint>,
    /// Tier-relative Lorenz curves, ascending in (tier, wealth)
    pub lorenz_tier: Vec<LorenzPoint>,
}
