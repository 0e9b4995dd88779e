//! Wealth Constructor: liquid-wealth measures, education tiering, the
//! collapse to one row per household, lower-tail income trimming and weight
//! normalization.
//!
//! Stages run strictly in this order: collapse, income trim, measure
//! selection, negative-wealth filter, re-normalization. The trim operates on
//! the income distribution and therefore has to precede the wealth-measure
//! filters.

use rustc_hash::FxHashMap;

use crate::error::{PipelineError, Result};
use crate::model::{EducationTier, Household, HouseholdId, HouseholdObservation, WealthMeasure};

/// Scale applied to transaction accounts, compensating for systematic
/// underreporting of checking/savings balances in the survey
pub const LIQ_SCALE: f64 = 1.05;
/// Implicates per household in the survey's imputation design
pub const IMPLICATE_COUNT: f64 = 5.0;
/// Share of the weighted income distribution trimmed from the bottom
pub const TRIM_SHARE: f64 = 0.05;

/// Slack for boundary comparisons on accumulated weights. A household whose
/// cumulative share lands exactly on the trim threshold is dropped.
const BOUNDARY_EPS: f64 = 1e-9;

/// Liquid wealth under the Kaplan definition: scaled transaction accounts
/// plus CDs, funds, stocks and bonds, net of the revolving balance.
#[must_use]
pub fn kaplan_wealth(obs: &HouseholdObservation) -> f64 {
    obs.liq * LIQ_SCALE + obs.cds + obs.nmmf + obs.stocks + obs.bond - obs.ccbal
}

/// The Kaplan measure additionally net of non-vehicle installment debt.
#[must_use]
pub fn net_installment_wealth(obs: &HouseholdObservation) -> f64 {
    kaplan_wealth(obs) - (obs.install - obs.veh_inst)
}

#[derive(Default)]
struct HouseholdAccumulator {
    kaplan_sum: f64,
    net_installment_sum: f64,
    income_sum: f64,
    weight_sum: f64,
    count: u32,
}

/// Collapse implicates to households, trim the bottom of the weighted income
/// distribution, select the operative wealth measure and normalize weights.
pub fn build_panel(
    observations: Vec<HouseholdObservation>,
    measure: WealthMeasure,
) -> Result<Vec<Household>> {
    // Per-household means over the surviving implicates
    let mut accumulators: FxHashMap<HouseholdId, HouseholdAccumulator> = FxHashMap::default();
    for obs in &observations {
        let acc = accumulators.entry(obs.household_id).or_default();
        acc.kaplan_sum += kaplan_wealth(obs);
        acc.net_installment_sum += net_installment_wealth(obs);
        acc.income_sum += obs.perm_inc;
        acc.weight_sum += obs.weight;
        acc.count += 1;
    }

    // One representative row per household: the first implicate under the
    // extract's `yy1 * 10 + k` id convention.
    let mut panel: Vec<Household> = observations
        .iter()
        .filter(|obs| obs.implicate % 5 == 1)
        .map(|obs| {
            let acc = &accumulators[&obs.household_id];
            let n = f64::from(acc.count);
            Household {
                household_id: obs.household_id,
                age: obs.age,
                tier: EducationTier::from_edcl(obs.edcl),
                wealth_kaplan: acc.kaplan_sum / n,
                wealth_net_installment: acc.net_installment_sum / n,
                perm_inc: acc.income_sum / n,
                weight: acc.weight_sum / n * IMPLICATE_COUNT,
                norm_weight: 0.0,
                ed_weight: 0.0,
                liquid_wealth: 0.0,
            }
        })
        .collect();
    if panel.is_empty() {
        return Err(PipelineError::EmptyPopulation {
            stage: "household collapse",
        });
    }

    trim_income_tail(&mut panel)?;

    // Select the operative measure, then drop invalid households
    for household in &mut panel {
        household.liquid_wealth = match measure {
            WealthMeasure::Kaplan => household.wealth_kaplan,
            WealthMeasure::NetInstallment => household.wealth_net_installment,
        };
    }
    panel.retain(|h| h.liquid_wealth >= 0.0);
    if panel.is_empty() {
        return Err(PipelineError::EmptyPopulation {
            stage: "negative-wealth filter",
        });
    }

    normalize_weights(&mut panel);
    panel.sort_by_key(|h| h.household_id);
    Ok(panel)
}

/// Drop every household in the bottom `TRIM_SHARE` of the weighted permanent
/// income distribution.
///
/// Households are walked in ascending income order (household id as the
/// tie-break); each is dropped until the running share of normalized weight
/// clears the threshold, so the household straddling the boundary is dropped
/// and 100 equal-weight households lose exactly their five poorest.
fn trim_income_tail(panel: &mut Vec<Household>) -> Result<()> {
    panel.sort_by(|a, b| {
        f64::total_cmp(&a.perm_inc, &b.perm_inc).then(a.household_id.cmp(&b.household_id))
    });
    let total: f64 = panel.iter().map(|h| h.weight).sum();

    let mut cum = 0.0;
    let mut kept = Vec::with_capacity(panel.len());
    for household in panel.drain(..) {
        cum += household.weight / total;
        if cum > TRIM_SHARE + BOUNDARY_EPS {
            kept.push(household);
        }
    }
    *panel = kept;

    if panel.is_empty() {
        return Err(PipelineError::EmptyPopulation {
            stage: "income trim",
        });
    }
    Ok(())
}

/// Recompute population- and tier-relative weights over the survivors.
fn normalize_weights(panel: &mut [Household]) {
    let total: f64 = panel.iter().map(|h| h.weight).sum();
    for household in panel.iter_mut() {
        household.norm_weight = household.weight / total;
    }

    let mut tier_totals = [0.0_f64; 3];
    for household in panel.iter() {
        tier_totals[household.tier.idx()] += household.norm_weight;
    }
    for household in panel.iter_mut() {
        household.ed_weight = household.norm_weight / tier_totals[household.tier.idx()];
    }
}
