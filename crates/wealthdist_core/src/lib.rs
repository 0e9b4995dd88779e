//! Wealth-distribution statistics over household survey microdata
//!
//! This crate turns the raw multiply-imputed rows of a household survey
//! extract into population-representative wealth statistics:
//! - answer-table correction, age smoothing and sample selection
//!   (`aggregate`)
//! - liquid-wealth construction, the collapse to one row per household,
//!   income-tail trimming and weight normalization (`wealth`)
//! - group shares, initial-income moments, weighted medians, Lorenz curves
//!   and wealth-quartile shares (`distribution`)
//! - rescaling and cross-checking of data vintages (`reconcile`)
//!
//! The stages are plain functions over immutable panels; each consumes the
//! previous stage's output by value and returns a new panel:
//!
//! ```ignore
//! use wealthdist_core::{aggregate, distribution, loader, wealth};
//! use wealthdist_core::model::WealthMeasure;
//!
//! let records = loader::load_survey(&survey_path)?;
//! let answers = loader::load_answers(&answer_path)?;
//! let observations = aggregate::build_observations(records, &answers)?;
//! let panel = wealth::build_panel(observations, WealthMeasure::Kaplan)?;
//! let output = distribution::compute(&panel)?;
//! ```

#![warn(clippy::all)]

pub mod aggregate;
pub mod distribution;
pub mod error;
pub mod loader;
pub mod model;
pub mod reconcile;
pub mod wealth;
pub mod weighted;

#[cfg(test)]
mod tests;

pub use error::{LoadError, PipelineError};
pub use model::{
    DistributionOutput, DistributionReport, EducationTier, Household, HouseholdId, WealthMeasure,
};
