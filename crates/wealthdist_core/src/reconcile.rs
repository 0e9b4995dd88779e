//! Vintage Reconciler: aligns a freshly downloaded extract with the archived
//! currency-year convention and checks that the two vintages tell the same
//! story.
//!
//! The rescaling factor was determined offline by comparing the archived and
//! current vintages of the same survey year; it is exact across every
//! dollar-denominated column, so rescaling is a plain division rather than a
//! price-index lookup.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Writer};

use crate::aggregate::build_observations;
use crate::error::{LoadError, PipelineError, Result};
use crate::loader::parse_number;
use crate::model::{BalanceAnswer, EducationTier, RawRecord};
use crate::wealth::kaplan_wealth;
use crate::weighted::{median, quantile, weighted_mean};

/// Ratio between the current-download and archived currency years
/// (new dollars / archived dollars)
pub const VINTAGE_FACTOR: f64 = 1.1587;

/// Dollar-denominated columns of the survey summary extract. Only these are
/// rescaled; codes, weights and ages pass through untouched.
pub const DOLLAR_COLUMNS: [&str; 35] = [
    "income",
    "wageinc",
    "bussefarminc",
    "intdivinc",
    "kginc",
    "ssretinc",
    "transfothinc",
    "norminc",
    "networth",
    "asset",
    "fin",
    "nfin",
    "debt",
    "mrthel",
    "resdbt",
    "othloc",
    "ccbal",
    "install",
    "odebt",
    "liq",
    "cds",
    "nmmf",
    "stocks",
    "bond",
    "savbnd",
    "cashli",
    "othma",
    "othfin",
    "vehic",
    "houses",
    "oresre",
    "nnresre",
    "bus",
    "othnfin",
    "veh_inst",
];

/// Wealth percentiles reported by the comparison battery
const WEALTH_PERCENTILES: [u8; 5] = [10, 25, 50, 75, 90];

/// Verdict tiers for the vintage comparison. `Flagged` is an outcome, not an
/// error: the comparison still reports every statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceVerdict {
    /// All monetary statistics within 0.05%
    Excellent,
    /// All monetary statistics within 0.1%
    Acceptable,
    /// At least one monetary statistic beyond 0.1%; flagged for review
    Flagged,
}

impl ToleranceVerdict {
    const EXCELLENT_PCT: f64 = 0.05;
    const ACCEPTABLE_PCT: f64 = 0.1;

    #[must_use]
    pub fn from_max_dollar_diff(max_pct: f64) -> Self {
        if max_pct < Self::EXCELLENT_PCT {
            ToleranceVerdict::Excellent
        } else if max_pct < Self::ACCEPTABLE_PCT {
            ToleranceVerdict::Acceptable
        } else {
            ToleranceVerdict::Flagged
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ToleranceVerdict::Excellent => "excellent match",
            ToleranceVerdict::Acceptable => "acceptable match",
            ToleranceVerdict::Flagged => "flagged for review",
        }
    }
}

/// What a rescaling run touched
#[derive(Debug, Clone, Default)]
pub struct RescaleSummary {
    pub rows: usize,
    /// Columns divided by the factor
    pub adjusted: Vec<String>,
    /// Columns present but entirely zero, left untouched
    pub skipped_zero: Vec<String>,
    /// Expected dollar columns absent from this file
    pub missing: Vec<String>,
}

/// Divide every dollar column of `input` by [`VINTAGE_FACTOR`] and write the
/// result to `output`.
///
/// A column whose maximum absolute value is zero is skipped rather than
/// divided, and expected columns absent from the file are counted, not
/// errors: the extract's column set varies by download vintage.
pub fn rescale_table(input: &Path, output: &Path) -> std::result::Result<RescaleSummary, LoadError> {
    if !input.exists() {
        return Err(LoadError::MissingInput {
            path: input.to_path_buf(),
            hint: crate::loader::SURVEY_SOURCE_HINT,
        });
    }
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(input)?;
    let headers = reader.headers()?.clone();

    let mut rows: Vec<StringRecord> = Vec::new();
    for row in reader.records() {
        rows.push(row?);
    }

    let mut summary = RescaleSummary {
        rows: rows.len(),
        ..RescaleSummary::default()
    };
    let mut table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.iter().map(str::to_string).collect())
        .collect();

    for column in DOLLAR_COLUMNS {
        let Some(idx) = headers.iter().position(|h| h == column) else {
            summary.missing.push(column.to_string());
            continue;
        };
        let mut values = Vec::with_capacity(rows.len());
        let mut max_abs = 0.0_f64;
        for row in &rows {
            let line = row.position().map_or(0, csv::Position::line);
            let value = parse_number(row, idx, column, line, input)?;
            max_abs = max_abs.max(value.abs());
            values.push(value);
        }
        if max_abs == 0.0 {
            summary.skipped_zero.push(column.to_string());
            continue;
        }
        for (out_row, value) in table.iter_mut().zip(&values) {
            out_row[idx] = format!("{}", value / VINTAGE_FACTOR);
        }
        summary.adjusted.push(column.to_string());
    }

    let mut writer = Writer::from_path(output)?;
    writer.write_record(&headers)?;
    for out_row in &table {
        writer.write_record(out_row)?;
    }
    writer.flush().map_err(LoadError::Io)?;

    Ok(summary)
}

/// The fixed summary battery computed over each vintage
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Implicate rows surviving merge and selection
    pub observations: usize,
    /// Distinct households among them
    pub households: usize,
    pub median_income: f64,
    /// Weighted mean of permanent income
    pub mean_income: f64,
    pub min_income: f64,
    pub median_wealth: f64,
    /// Weighted mean liquid wealth (Kaplan definition)
    pub mean_wealth: f64,
    /// Unweighted wealth percentiles at p10/p25/p50/p75/p90
    pub wealth_percentiles: [(u8, f64); 5],
    pub median_wealth_to_income: f64,
    /// Weighted share of households with negative liquid wealth
    pub negative_wealth_share: f64,
    pub mean_age: f64,
    /// Weighted education-tier population shares
    pub tier_shares: [f64; 3],
}

/// Run merge/correction/selection on one vintage and compute the summary
/// battery over first-implicate households.
///
/// Statistics here are intentionally computed on a single implicate
/// (`y1 % 10 == 1`) rather than the implicate means used by the main
/// pipeline: the comparison wants raw rows from both files treated the same
/// way, not modeling choices.
pub fn summarize(records: Vec<RawRecord>, answers: &[BalanceAnswer]) -> Result<SummaryStats> {
    let observations = build_observations(records, answers)?;

    let mut first_implicates: Vec<_> = observations
        .iter()
        .filter(|o| o.implicate % 10 == 1)
        .collect();
    first_implicates.sort_by_key(|o| o.household_id);
    if first_implicates.is_empty() {
        return Err(PipelineError::EmptyPopulation {
            stage: "first-implicate filter",
        });
    }

    let income: Vec<f64> = first_implicates.iter().map(|o| o.perm_inc).collect();
    let wealth: Vec<f64> = first_implicates.iter().map(|&o| kaplan_wealth(o)).collect();
    let weights: Vec<f64> = first_implicates.iter().map(|o| o.weight).collect();
    let ages: Vec<f64> = first_implicates.iter().map(|o| o.age).collect();
    let ratios: Vec<f64> = income
        .iter()
        .zip(&wealth)
        .map(|(inc, w)| w / inc)
        .collect();
    let negative: Vec<f64> = wealth
        .iter()
        .map(|w| if *w < 0.0 { 1.0 } else { 0.0 })
        .collect();

    let tier_shares = std::array::from_fn(|idx| {
        let indicator: Vec<f64> = first_implicates
            .iter()
            .map(|o| {
                if EducationTier::from_edcl(o.edcl).idx() == idx {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        weighted_mean(&indicator, &weights).unwrap_or(0.0)
    });

    Ok(SummaryStats {
        observations: observations.len(),
        households: first_implicates.len(),
        median_income: median(&income).unwrap_or(0.0),
        mean_income: weighted_mean(&income, &weights).unwrap_or(0.0),
        min_income: income.iter().copied().fold(f64::INFINITY, f64::min),
        median_wealth: median(&wealth).unwrap_or(0.0),
        mean_wealth: weighted_mean(&wealth, &weights).unwrap_or(0.0),
        wealth_percentiles: WEALTH_PERCENTILES
            .map(|p| (p, quantile(&wealth, f64::from(p) / 100.0).unwrap_or(0.0))),
        median_wealth_to_income: median(&ratios).unwrap_or(0.0),
        negative_wealth_share: weighted_mean(&negative, &weights).unwrap_or(0.0),
        mean_age: weighted_mean(&ages, &weights).unwrap_or(0.0),
        tier_shares,
    })
}

/// One compared statistic
#[derive(Debug, Clone, PartialEq)]
pub struct StatDiff {
    pub label: &'static str,
    pub reference: f64,
    pub candidate: f64,
    /// Absolute percent difference relative to the reference
    pub pct_diff: f64,
    /// Whether the statistic is dollar-denominated (drives the verdict)
    pub monetary: bool,
}

/// Full comparison between two vintages
#[derive(Debug, Clone, PartialEq)]
pub struct VintageComparison {
    pub rows: Vec<StatDiff>,
    pub max_dollar_pct: f64,
    pub max_other_pct: f64,
    pub verdict: ToleranceVerdict,
}

fn pct_diff(reference: f64, candidate: f64) -> f64 {
    if reference == 0.0 {
        0.0
    } else {
        ((candidate - reference) / reference).abs() * 100.0
    }
}

/// Compare the summary batteries of two vintages and attach a verdict.
#[must_use]
pub fn compare(reference: &SummaryStats, candidate: &SummaryStats) -> VintageComparison {
    let mut rows = Vec::new();
    let mut push = |label: &'static str, r: f64, c: f64, monetary: bool| {
        rows.push(StatDiff {
            label,
            reference: r,
            candidate: c,
            pct_diff: pct_diff(r, c),
            monetary,
        });
    };

    push(
        "median income",
        reference.median_income,
        candidate.median_income,
        true,
    );
    push(
        "mean income",
        reference.mean_income,
        candidate.mean_income,
        true,
    );
    push(
        "minimum income",
        reference.min_income,
        candidate.min_income,
        true,
    );
    push(
        "median liquid wealth",
        reference.median_wealth,
        candidate.median_wealth,
        true,
    );
    push(
        "mean liquid wealth",
        reference.mean_wealth,
        candidate.mean_wealth,
        true,
    );
    for (&(p, r), &(_, c)) in reference
        .wealth_percentiles
        .iter()
        .zip(&candidate.wealth_percentiles)
    {
        let label: &'static str = match p {
            10 => "p10 liquid wealth",
            25 => "p25 liquid wealth",
            50 => "p50 liquid wealth",
            75 => "p75 liquid wealth",
            _ => "p90 liquid wealth",
        };
        push(label, r, c, true);
    }
    push(
        "median wealth/income",
        reference.median_wealth_to_income,
        candidate.median_wealth_to_income,
        false,
    );
    push(
        "negative-wealth share",
        reference.negative_wealth_share,
        candidate.negative_wealth_share,
        false,
    );
    push("mean age", reference.mean_age, candidate.mean_age, false);
    for (idx, tier) in EducationTier::ALL.iter().enumerate() {
        let label: &'static str = match tier {
            EducationTier::NoHighSchool => "share without high school",
            EducationTier::HighSchool => "share with high school/some college",
            EducationTier::College => "share with college",
        };
        push(
            label,
            reference.tier_shares[idx],
            candidate.tier_shares[idx],
            false,
        );
    }

    let max_dollar_pct = rows
        .iter()
        .filter(|row| row.monetary)
        .map(|row| row.pct_diff)
        .fold(0.0, f64::max);
    let max_other_pct = rows
        .iter()
        .filter(|row| !row.monetary)
        .map(|row| row.pct_diff)
        .fold(0.0, f64::max);

    VintageComparison {
        rows,
        max_dollar_pct,
        max_other_pct,
        verdict: ToleranceVerdict::from_max_dollar_diff(max_dollar_pct),
    }
}
