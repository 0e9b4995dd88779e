//! Report rendering: the flat Lorenz tables, the JSON results mapping and
//! the printed summary tables.

use std::fs::File;
use std::path::Path;

use color_eyre::Result;

use wealthdist_core::model::{DistributionReport, LORENZ_THRESHOLDS, LorenzPoint};
use wealthdist_core::reconcile::{RescaleSummary, SummaryStats, VintageComparison};

/// Write a Lorenz table as CSV; the header comes from the point's fields.
pub fn write_lorenz(path: &Path, points: &[LorenzPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the structured results mapping as pretty-printed JSON.
pub fn write_results(path: &Path, report: &DistributionReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

/// Print the report tables to stdout.
pub fn print_report(report: &DistributionReport) {
    println!("Population and liquid wealth by education");
    for tier in &report.tiers {
        println!(
            "  {:<26} population {:>5.1}%   wealth {:>5.1}%",
            tier.tier.label(),
            tier.population_pct,
            tier.wealth_pct
        );
    }

    println!();
    println!("Initial quarterly income at age 25");
    for tier in &report.tiers {
        match &tier.initial_income {
            Some(moments) => println!(
                "  {:<26} mean ${:>6.1}k   sd of log {:>5.2}",
                tier.tier.label(),
                moments.mean_level_thousands,
                moments.log_std
            ),
            None => println!("  {:<26} no households at age 25", tier.tier.label()),
        }
    }

    println!();
    println!("Median liquid wealth / permanent income");
    for tier in &report.tiers {
        println!(
            "  {:<26} annual {:>7.2}%   quarterly {:>7.2}%",
            tier.tier.label(),
            tier.median_wealth_to_income_annual_pct,
            tier.median_wealth_to_income_quarterly_pct
        );
    }

    println!();
    println!("Lorenz curve, all households");
    print_lorenz_buckets(&report.lorenz_pct, "  ");

    println!();
    println!("Lorenz curves by education");
    for tier in &report.tiers {
        println!("  {}:", tier.tier.label());
        print_lorenz_buckets(&tier.lorenz_pct, "    ");
    }

    println!();
    println!("Share of liquid wealth by wealth quartile");
    for (quartile, pct) in report.quartile_wealth_pct.iter().enumerate() {
        println!("  quartile {}: {:>6.2}%", quartile + 1, pct);
    }
}

fn print_lorenz_buckets(buckets: &[Option<f64>; 4], indent: &str) {
    for (threshold, share) in LORENZ_THRESHOLDS.iter().zip(buckets) {
        match share {
            Some(pct) => {
                println!("{indent}bottom {threshold:.0}% holds {pct:.2}% of wealth");
            }
            None => {
                println!("{indent}bottom {threshold:.0}%: no household at or below this share");
            }
        }
    }
}

/// Print the cross-vintage comparison table and verdict to stdout.
pub fn print_comparison(
    reference: &SummaryStats,
    candidate: &SummaryStats,
    comparison: &VintageComparison,
) {
    println!(
        "  {:<36} {:>16} {:>16} {:>9}",
        "statistic", "reference", "candidate", "diff"
    );
    println!(
        "  {:<36} {:>16} {:>16}",
        "implicate rows", reference.observations, candidate.observations
    );
    println!(
        "  {:<36} {:>16} {:>16}",
        "households", reference.households, candidate.households
    );
    for row in &comparison.rows {
        println!(
            "  {:<36} {:>16.4} {:>16.4} {:>8.3}%",
            row.label, row.reference, row.candidate, row.pct_diff
        );
    }
    println!();
    println!(
        "Largest difference: {:.4}% (dollar statistics), {:.4}% (other)",
        comparison.max_dollar_pct, comparison.max_other_pct
    );
    println!("Verdict: {}", comparison.verdict.label());
}

/// Print what a rescaling run touched.
pub fn print_rescale(summary: &RescaleSummary, output: &Path) {
    println!("Rescaled {} rows into {}", summary.rows, output.display());
    println!("  adjusted columns: {}", summary.adjusted.join(", "));
    if !summary.skipped_zero.is_empty() {
        println!(
            "  all-zero columns left untouched: {}",
            summary.skipped_zero.join(", ")
        );
    }
    if !summary.missing.is_empty() {
        println!(
            "  expected columns not in this file: {}",
            summary.missing.join(", ")
        );
    }
}
