//! Household Aggregator: answer-table correction, age smoothing and sample
//! selection over the raw implicate rows.
//!
//! The output is still one row per implicate; collapsing to one row per
//! household happens in the wealth constructor, after the wealth measures
//! have been computed on every implicate.

use rustc_hash::FxHashMap;

use crate::error::{PipelineError, Result};
use crate::model::{BalanceAnswer, HouseholdId, HouseholdObservation, RawRecord};

/// Youngest household head retained by the sample selection
pub const MIN_AGE: f64 = 25.0;
/// Oldest household head retained by the sample selection
pub const MAX_AGE: f64 = 62.0;

/// Merge the answer table, smooth ages and apply the sample selection.
///
/// The merge is a left join on the implicate id: rows without an answer keep
/// their reported balance, rows whose answer says no revolving balance was
/// carried get `ccbal` forced to zero. Each implicate's age is replaced by
/// the household's mean age so age is constant within a household, and the
/// selection retains households with mean age in `[MIN_AGE, MAX_AGE]` and
/// non-negative permanent income.
pub fn build_observations(
    records: Vec<RawRecord>,
    answers: &[BalanceAnswer],
) -> Result<Vec<HouseholdObservation>> {
    let no_balance: FxHashMap<u32, bool> = answers
        .iter()
        .map(|a| (a.y1, a.x432 == 1))
        .collect();

    // Household mean age across implicates
    let mut age_sums: FxHashMap<u32, (f64, u32)> = FxHashMap::default();
    for record in &records {
        let entry = age_sums.entry(record.yy1).or_insert((0.0, 0));
        entry.0 += record.age;
        entry.1 += 1;
    }

    let observations: Vec<HouseholdObservation> = records
        .into_iter()
        .filter_map(|record| {
            let (age_sum, count) = age_sums[&record.yy1];
            let age = age_sum / f64::from(count);
            if !(MIN_AGE..=MAX_AGE).contains(&age) || record.norminc < 0.0 {
                return None;
            }
            let ccbal = if no_balance.get(&record.y1).copied().unwrap_or(false) {
                0.0
            } else {
                record.ccbal
            };
            Some(HouseholdObservation {
                household_id: HouseholdId(record.yy1),
                implicate: record.y1,
                weight: record.wgt,
                age,
                edcl: record.edcl,
                perm_inc: record.norminc,
                liq: record.liq,
                cds: record.cds,
                nmmf: record.nmmf,
                stocks: record.stocks,
                bond: record.bond,
                ccbal,
                install: record.install,
                veh_inst: record.veh_inst,
            })
        })
        .collect();

    if observations.is_empty() {
        return Err(PipelineError::EmptyPopulation {
            stage: "sample selection",
        });
    }
    Ok(observations)
}
