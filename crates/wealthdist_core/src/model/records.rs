//! Raw survey rows as they appear in the input extracts
//!
//! Field names follow the survey extract's column codes so the CSV loader can
//! deserialize rows directly. One `RawRecord` is one household-implicate pair;
//! five implicates share a household id.

use serde::Deserialize;

/// Columns the pipeline requires from the summary extract, in header order.
///
/// The loader validates the header against this list before deserializing so
/// a malformed file fails with the name of the missing column rather than a
/// row-level parse error.
pub const SURVEY_COLUMNS: [&str; 15] = [
    "yy1", "y1", "wgt", "age", "educ", "edcl", "norminc", "liq", "cds", "nmmf", "stocks", "bond",
    "ccbal", "install", "veh_inst",
];

/// One row of the survey summary extract: a single implicate of a household.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    /// Household identifier, shared by the household's five implicates
    pub yy1: u32,
    /// Implicate identifier (`yy1 * 10 + k` for implicate k = 1..=5)
    pub y1: u32,
    /// Sampling weight for this implicate
    pub wgt: f64,
    /// Age of the household head (may differ across implicates)
    pub age: f64,
    /// Fine-grained education code (carried through, unused by the core)
    pub educ: i32,
    /// Education class code 1-4, source of the three-tier classification
    pub edcl: i32,
    /// Normal ("permanent") annual income
    pub norminc: f64,
    /// Transaction accounts (checking, savings, call accounts)
    pub liq: f64,
    /// Certificates of deposit
    pub cds: f64,
    /// Directly held mutual funds
    pub nmmf: f64,
    /// Directly held stocks
    pub stocks: f64,
    /// Directly held bonds
    pub bond: f64,
    /// Revolving credit-card balance
    pub ccbal: f64,
    /// Installment loan balance
    pub install: f64,
    /// Vehicle installment loan balance
    pub veh_inst: f64,
}

/// One row of the auxiliary interview answer table.
///
/// `x432 == 1` means the respondent answered that no revolving credit-card
/// balance was carried, in which case the summary extract's `ccbal` is an
/// imputation artifact and must be forced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BalanceAnswer {
    /// Implicate identifier, join key against `RawRecord::y1`
    pub y1: u32,
    /// Interview answer to the revolving-balance question
    pub x432: i32,
}
