//! Distribution Engine: the fixed battery of weighted statistics computed
//! over the final household panel.
//!
//! Purely functional over an immutable panel; every statistic is computed
//! independently. All sorts that feed cumulative sums order by the primary
//! key with household id as the tie-break so repeated runs over identical
//! input produce bit-identical coordinates.

use crate::aggregate::MIN_AGE;
use crate::error::{PipelineError, Result};
use crate::model::{
    DistributionOutput, DistributionReport, EducationTier, Household, InitialIncomeMoments,
    LORENZ_THRESHOLDS, LorenzPoint, TierReport,
};
use crate::weighted::{weighted_mean, weighted_median_sorted, weighted_std};

/// Quarters per year, for converting annual permanent income
const QUARTERS_PER_YEAR: f64 = 4.0;
/// Slack for threshold comparisons on accumulated shares
const READOUT_EPS: f64 = 1e-9;

/// Compute the full report and both Lorenz tables.
pub fn compute(panel: &[Household]) -> Result<DistributionOutput> {
    if panel.is_empty() {
        return Err(PipelineError::EmptyPopulation {
            stage: "distribution",
        });
    }

    let total_wealth: f64 = panel.iter().map(|h| h.norm_weight * h.liquid_wealth).sum();

    // Population-wide Lorenz curve, ascending in wealth
    let mut by_wealth: Vec<&Household> = panel.iter().collect();
    sort_by_wealth(&mut by_wealth);
    let lorenz_all = lorenz_points(&by_wealth, |h| h.norm_weight);
    let lorenz_pct = LORENZ_THRESHOLDS.map(|t| lorenz_share_at(&lorenz_all, t));

    // Tier-relative Lorenz curves, concatenated in tier order
    let mut lorenz_tier = Vec::with_capacity(panel.len());
    let mut tiers = Vec::new();
    for tier in EducationTier::ALL {
        let mut members: Vec<&Household> = panel.iter().filter(|h| h.tier == tier).collect();
        if members.is_empty() {
            continue;
        }
        sort_by_wealth(&mut members);
        let segment = lorenz_points(&members, |h| h.ed_weight);
        let tier_lorenz_pct = LORENZ_THRESHOLDS.map(|t| lorenz_share_at(&segment, t));
        lorenz_tier.extend_from_slice(&segment);

        let population_pct: f64 = members.iter().map(|h| h.norm_weight).sum::<f64>() * 100.0;
        let tier_wealth: f64 = members
            .iter()
            .map(|h| h.norm_weight * h.liquid_wealth)
            .sum();
        let wealth_pct = tier_wealth / total_wealth * 100.0;

        let median = median_wealth_to_income(&members);
        tiers.push(TierReport {
            tier,
            population_pct,
            wealth_pct,
            initial_income: initial_income_moments(&members),
            median_wealth_to_income: median,
            median_wealth_to_income_annual_pct: median * 100.0,
            median_wealth_to_income_quarterly_pct: median * 100.0 * QUARTERS_PER_YEAR,
            lorenz_pct: tier_lorenz_pct,
        });
    }

    Ok(DistributionOutput {
        report: DistributionReport {
            tiers,
            lorenz_pct,
            quartile_wealth_pct: quartile_shares(panel),
        },
        lorenz_all,
        lorenz_tier,
    })
}

/// Stable wealth ordering: liquid wealth ascending, household id tie-break.
fn sort_by_wealth(members: &mut [&Household]) {
    members.sort_by(|a, b| {
        f64::total_cmp(&a.liquid_wealth, &b.liquid_wealth).then(a.household_id.cmp(&b.household_id))
    });
}

/// Build cumulative (population, wealth) coordinates over pre-sorted
/// members. `weight_of` selects the population- or tier-relative weight.
fn lorenz_points(members: &[&Household], weight_of: impl Fn(&Household) -> f64) -> Vec<LorenzPoint> {
    let total_wealth: f64 = members
        .iter()
        .map(|&h| weight_of(h) * h.liquid_wealth)
        .sum();
    let mut cum_population = 0.0;
    let mut cum_wealth = 0.0;
    members
        .iter()
        .map(|&h| {
            cum_population += weight_of(h);
            cum_wealth += weight_of(h) * h.liquid_wealth / total_wealth;
            LorenzPoint {
                household_id: h.household_id.0,
                education_tier: h.tier.code(),
                cum_population_share: cum_population * 100.0,
                cum_wealth_share: cum_wealth * 100.0,
            }
        })
        .collect()
}

/// Step-function readout: the wealth share of the last household whose
/// cumulative population share is at or below the threshold. No
/// interpolation. `None` when no household has reached the threshold.
#[must_use]
pub fn lorenz_share_at(points: &[LorenzPoint], threshold_pct: f64) -> Option<f64> {
    points
        .iter()
        .take_while(|p| p.cum_population_share <= threshold_pct + READOUT_EPS)
        .last()
        .map(|p| p.cum_wealth_share)
}

/// Weighted mean and standard deviation of log quarterly permanent income
/// over the tier's households at the minimum eligible age.
fn initial_income_moments(members: &[&Household]) -> Option<InitialIncomeMoments> {
    let at_entry_age: Vec<&Household> = members
        .iter()
        .copied()
        .filter(|h| (h.age - MIN_AGE).abs() < READOUT_EPS)
        .collect();
    if at_entry_age.is_empty() {
        return None;
    }
    let log_income: Vec<f64> = at_entry_age
        .iter()
        .map(|h| (h.perm_inc / QUARTERS_PER_YEAR).ln())
        .collect();
    let weights: Vec<f64> = at_entry_age.iter().map(|h| h.ed_weight).collect();

    let mean_log = weighted_mean(&log_income, &weights)?;
    let log_std = weighted_std(&log_income, &weights)?;
    let mean_level = mean_log.exp();
    Some(InitialIncomeMoments {
        mean_level,
        mean_level_thousands: mean_level / 1000.0,
        log_std,
    })
}

/// Weighted median of the wealth-to-income ratio over a tier.
fn median_wealth_to_income(members: &[&Household]) -> f64 {
    let mut by_ratio: Vec<&Household> = members.iter().copied().collect();
    by_ratio.sort_by(|a, b| {
        f64::total_cmp(&a.wealth_to_income(), &b.wealth_to_income())
            .then(a.household_id.cmp(&b.household_id))
    });
    let ratios: Vec<f64> = by_ratio.iter().map(|h| h.wealth_to_income()).collect();
    let weights: Vec<f64> = by_ratio.iter().map(|h| h.ed_weight).collect();
    weighted_median_sorted(&ratios, &weights).unwrap_or(0.0)
}

/// Share of total weighted wealth held by each of four equal-population
/// bins, ordered by the household's weighted wealth contribution.
fn quartile_shares(panel: &[Household]) -> [f64; 4] {
    let mut by_contribution: Vec<&Household> = panel.iter().collect();
    by_contribution.sort_by(|a, b| {
        let ca = a.weight * a.liquid_wealth;
        let cb = b.weight * b.liquid_wealth;
        f64::total_cmp(&ca, &cb).then(a.household_id.cmp(&b.household_id))
    });

    let total_contribution: f64 = panel.iter().map(|h| h.weight * h.liquid_wealth).sum();
    let mut shares = [0.0_f64; 4];
    let mut cum = 0.0;
    for household in by_contribution {
        // A household is binned by the midpoint of the weight interval it
        // spans, so bins hold equal population weight without splitting
        // households.
        let midpoint = cum + household.norm_weight / 2.0;
        cum += household.norm_weight;
        let bin = ((midpoint * 4.0).floor() as usize).min(3);
        shares[bin] += household.weight * household.liquid_wealth;
    }
    shares.map(|s| s / total_contribution * 100.0)
}
