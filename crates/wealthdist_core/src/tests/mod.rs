//! Integration tests for the household statistics pipeline
//!
//! Tests are organized by topic:
//! - `aggregate` - answer-table correction, age smoothing, sample selection
//! - `wealth` - wealth measures, collapse, trimming, weight normalization
//! - `distribution` - shares, moments, medians, Lorenz curves, quartiles
//! - `loading` - CSV loading, header validation, answer-table derivation
//! - `reconcile` - vintage rescaling and cross-vintage comparison

mod aggregate;

use crate::model::{EducationTier, Household, HouseholdId, RawRecord};

pub(crate) const TOL: f64 = 1e-9;

/// One implicate row with zeroed asset fields; tests override what they need.
pub(crate) fn record(
    yy1: u32,
    implicate: u32,
    wgt: f64,
    age: f64,
    edcl: i32,
    norminc: f64,
) -> RawRecord {
    RawRecord {
        yy1,
        y1: yy1 * 10 + implicate,
        wgt,
        age,
        educ: 0,
        edcl,
        norminc,
        liq: 0.0,
        cds: 0.0,
        nmmf: 0.0,
        stocks: 0.0,
        bond: 0.0,
        ccbal: 0.0,
        install: 0.0,
        veh_inst: 0.0,
    }
}

/// Five identical implicates for one household.
pub(crate) fn implicates(yy1: u32, wgt: f64, age: f64, edcl: i32, norminc: f64) -> Vec<RawRecord> {
    (1..=5).map(|k| record(yy1, k, wgt, age, edcl, norminc)).collect()
}

/// A panel household with placeholder weights; pair with [`normalize`].
pub(crate) fn hh(id: u32, tier: EducationTier, wealth: f64, weight: f64) -> Household {
    Household {
        household_id: HouseholdId(id),
        age: 40.0,
        tier,
        wealth_kaplan: wealth,
        wealth_net_installment: wealth,
        perm_inc: 50_000.0,
        weight,
        norm_weight: 0.0,
        ed_weight: 0.0,
        liquid_wealth: wealth,
    }
}

/// Write records as a survey CSV with the standard header.
pub(crate) fn write_survey_csv(path: &std::path::Path, rows: &[RawRecord]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(crate::model::SURVEY_COLUMNS).unwrap();
    for r in rows {
        writer
            .write_record([
                r.yy1.to_string(),
                r.y1.to_string(),
                r.wgt.to_string(),
                r.age.to_string(),
                r.educ.to_string(),
                r.edcl.to_string(),
                r.norminc.to_string(),
                r.liq.to_string(),
                r.cds.to_string(),
                r.nmmf.to_string(),
                r.stocks.to_string(),
                r.bond.to_string(),
                r.ccbal.to_string(),
                r.install.to_string(),
                r.veh_inst.to_string(),
            ])
            .unwrap();
    }
    writer.flush().unwrap();
}

/// Fill in population- and tier-relative weights the way the wealth
/// constructor does, so panels can drive the distribution engine directly.
pub(crate) fn normalize(mut panel: Vec<Household>) -> Vec<Household> {
    let total: f64 = panel.iter().map(|h| h.weight).sum();
    for household in &mut panel {
        household.norm_weight = household.weight / total;
    }
    let mut tier_totals = [0.0_f64; 3];
    for household in &panel {
        tier_totals[household.tier.code() as usize - 1] += household.norm_weight;
    }
    for household in &mut panel {
        household.ed_weight = household.norm_weight / tier_totals[household.tier.code() as usize - 1];
    }
    panel
}
