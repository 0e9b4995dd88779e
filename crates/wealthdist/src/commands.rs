//! Subcommand implementations: each loads its inputs, drives the core
//! stages and hands the results to the report writers.
//!
//! Output files are only written after every stage has finished, so a failed
//! run leaves no partial artifacts behind.

use std::fs;
use std::path::Path;

use color_eyre::Result;
use tracing::{info, warn};

use wealthdist_core::model::WealthMeasure;
use wealthdist_core::reconcile::{self, ToleranceVerdict};
use wealthdist_core::{aggregate, distribution, loader, wealth};

use crate::report;

/// File name of the population-wide Lorenz table
pub const LORENZ_ALL_FILE: &str = "LorenzAll.csv";
/// File name of the education-tier Lorenz table
pub const LORENZ_ED_FILE: &str = "LorenzEd.csv";
/// File name of the structured results mapping
pub const RESULTS_FILE: &str = "results.json";

/// Run the full pipeline and write the Lorenz tables and results mapping.
pub fn analyze(
    survey: &Path,
    answers: &Path,
    interview: Option<&Path>,
    out_dir: &Path,
    include_installment: bool,
) -> Result<()> {
    let measure = if include_installment {
        WealthMeasure::NetInstallment
    } else {
        WealthMeasure::Kaplan
    };

    info!("loading survey extract from {}", survey.display());
    let records = loader::load_survey(survey)?;
    let answer_rows = loader::load_or_derive_answers(answers, interview)?;
    info!(
        "loaded {} implicate rows and {} interview answers",
        records.len(),
        answer_rows.len()
    );

    let observations = aggregate::build_observations(records, &answer_rows)?;
    info!("{} implicate rows after sample selection", observations.len());

    let panel = wealth::build_panel(observations, measure)?;
    info!("final panel holds {} households", panel.len());

    let output = distribution::compute(&panel)?;

    fs::create_dir_all(out_dir)?;
    report::write_lorenz(&out_dir.join(LORENZ_ALL_FILE), &output.lorenz_all)?;
    report::write_lorenz(&out_dir.join(LORENZ_ED_FILE), &output.lorenz_tier)?;
    report::write_results(&out_dir.join(RESULTS_FILE), &output.report)?;
    info!(
        "wrote {LORENZ_ALL_FILE}, {LORENZ_ED_FILE} and {RESULTS_FILE} to {}",
        out_dir.display()
    );

    report::print_report(&output.report);
    Ok(())
}

/// Rescale an extract into the archived currency-year convention.
pub fn rescale(input: &Path, output: &Path) -> Result<()> {
    let summary = reconcile::rescale_table(input, output)?;
    info!(
        "rescaled {} rows: {} columns adjusted, {} all-zero columns skipped, {} expected columns absent",
        summary.rows,
        summary.adjusted.len(),
        summary.skipped_zero.len(),
        summary.missing.len()
    );
    report::print_rescale(&summary, output);
    Ok(())
}

/// Compare summary statistics across two vintages and print the verdict.
pub fn compare(reference: &Path, candidate: &Path, answers: &Path) -> Result<()> {
    let answer_rows = loader::load_answers(answers)?;

    info!("summarizing reference vintage {}", reference.display());
    let reference_stats =
        reconcile::summarize(loader::load_survey(reference)?, &answer_rows)?;
    info!("summarizing candidate vintage {}", candidate.display());
    let candidate_stats =
        reconcile::summarize(loader::load_survey(candidate)?, &answer_rows)?;

    let comparison = reconcile::compare(&reference_stats, &candidate_stats);
    if comparison.verdict == ToleranceVerdict::Flagged {
        warn!(
            "vintages disagree beyond tolerance: max dollar difference {:.4}%",
            comparison.max_dollar_pct
        );
    }
    report::print_comparison(&reference_stats, &candidate_stats, &comparison);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_survey(path: &Path, rows: &[[&str; 15]]) {
        let mut file = fs::File::create(path).unwrap();
        writeln!(
            file,
            "yy1,y1,wgt,age,educ,edcl,norminc,liq,cds,nmmf,stocks,bond,ccbal,install,veh_inst"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{}", row.join(",")).unwrap();
        }
    }

    #[test]
    fn test_analyze_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let survey = dir.path().join("survey.csv");
        let answers = dir.path().join("ccbal_answer.csv");
        let out_dir = dir.path().join("out");

        let owned: Vec<[String; 15]> = (1..=20u32)
            .map(|id| {
                [
                    id.to_string(),
                    (id * 10 + 1).to_string(),
                    "1.0".into(),
                    "40".into(),
                    "0".into(),
                    "2".into(),
                    (10_000 * id).to_string(),
                    (500 * id).to_string(),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                ]
            })
            .collect();
        let rows: Vec<[&str; 15]> = owned
            .iter()
            .map(|row| std::array::from_fn(|i| row[i].as_str()))
            .collect();
        write_survey(&survey, &rows);
        fs::write(&answers, "y1,x432\n11,1\n").unwrap();

        analyze(&survey, &answers, None, &out_dir, false).unwrap();

        assert!(out_dir.join(LORENZ_ALL_FILE).exists());
        assert!(out_dir.join(LORENZ_ED_FILE).exists());
        assert!(out_dir.join(RESULTS_FILE).exists());

        let results = fs::read_to_string(out_dir.join(RESULTS_FILE)).unwrap();
        assert!(results.contains("quartile_wealth_pct"));
    }

    #[test]
    fn test_analyze_missing_survey_fails_without_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let missing = dir.path().join("absent.csv");
        let answers = dir.path().join("ccbal_answer.csv");

        let err = analyze(&missing, &answers, None, &out_dir, false).unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_rescale_roundtrips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        write_survey(
            &input,
            &[[
                "1", "11", "1.0", "40", "0", "2", "11587", "0", "0", "0", "0", "0", "0", "0", "0",
            ]],
        );

        rescale(&input, &output).unwrap();
        let adjusted = fs::read_to_string(&output).unwrap();
        let norminc: f64 = adjusted
            .lines()
            .nth(1)
            .and_then(|line| line.split(',').nth(6))
            .and_then(|cell| cell.parse().ok())
            .unwrap();
        assert!((norminc - 10_000.0).abs() < 1e-6);
    }
}
