//! Household-level panel types derived from the raw survey rows
//!
//! The pipeline narrows the data in two steps: `HouseholdObservation` is an
//! implicate-level row after merge/correction/selection, and `Household` is
//! the collapsed one-row-per-household panel the distribution statistics are
//! computed over.

use serde::{Deserialize, Serialize};

/// Unique identifier for a household (the survey's `yy1` code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub u32);

/// Three-tier education classification derived from the `edcl` class code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EducationTier {
    #[serde(rename = "No high school")]
    NoHighSchool,
    #[serde(rename = "High school/some college")]
    HighSchool,
    #[serde(rename = "College")]
    College,
}

impl EducationTier {
    pub const ALL: [EducationTier; 3] = [
        EducationTier::NoHighSchool,
        EducationTier::HighSchool,
        EducationTier::College,
    ];

    /// Map the survey's four-class education code onto the three tiers.
    ///
    /// Class 1 (and any out-of-range code) is "no high school", classes 2 and
    /// 3 are the middle tier, class 4 is college. The mapping is fixed, not
    /// configurable.
    #[must_use]
    pub fn from_edcl(edcl: i32) -> Self {
        match edcl {
            2 | 3 => EducationTier::HighSchool,
            4 => EducationTier::College,
            _ => EducationTier::NoHighSchool,
        }
    }

    /// Ordinal code used in the flat Lorenz output tables
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            EducationTier::NoHighSchool => 1,
            EducationTier::HighSchool => 2,
            EducationTier::College => 3,
        }
    }

    /// Display label for report tables
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EducationTier::NoHighSchool => "No high school",
            EducationTier::HighSchool => "High school/some college",
            EducationTier::College => "College",
        }
    }

    /// Dense index for per-tier accumulator arrays
    #[must_use]
    pub(crate) fn idx(self) -> usize {
        self.code() as usize - 1
    }
}

/// Which liquid-wealth definition drives the published statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WealthMeasure {
    /// Scaled transaction accounts plus CDs, funds, stocks and bonds, net of
    /// the revolving credit-card balance. The definition used for published
    /// results.
    #[default]
    Kaplan,
    /// The Kaplan measure additionally net of non-vehicle installment debt
    NetInstallment,
}

/// One implicate row after answer-table correction, age smoothing and sample
/// selection. Intermediate: consumed by the wealth constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdObservation {
    pub household_id: HouseholdId,
    /// Survey implicate identifier (`yy1 * 10 + k`)
    pub implicate: u32,
    pub weight: f64,
    /// Household-mean age, constant across a household's implicates
    pub age: f64,
    pub edcl: i32,
    pub perm_inc: f64,
    pub liq: f64,
    pub cds: f64,
    pub nmmf: f64,
    pub stocks: f64,
    pub bond: f64,
    pub ccbal: f64,
    pub install: f64,
    pub veh_inst: f64,
}

/// One household of the final weighted panel.
///
/// Invariants over a panel: household ids are unique, `norm_weight` sums to
/// 1.0 across the panel, and `ed_weight` sums to 1.0 within each tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Household {
    pub household_id: HouseholdId,
    pub age: f64,
    pub tier: EducationTier,
    /// Household-mean liquid wealth under the Kaplan definition
    pub wealth_kaplan: f64,
    /// Household-mean liquid wealth net of non-vehicle installment debt
    pub wealth_net_installment: f64,
    /// Household-mean permanent income (annual)
    pub perm_inc: f64,
    /// Representative weight: mean implicate weight x implicate count
    pub weight: f64,
    /// Weight as a share of the retained population
    pub norm_weight: f64,
    /// Weight as a share of the household's education tier
    pub ed_weight: f64,
    /// The operative wealth measure selected for this run
    pub liquid_wealth: f64,
}

impl Household {
    /// Liquid wealth relative to annual permanent income
    #[must_use]
    pub fn wealth_to_income(&self) -> f64 {
        self.liquid_wealth / self.perm_inc
    }
}
