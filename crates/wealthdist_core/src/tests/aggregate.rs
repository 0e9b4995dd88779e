//! Tests for answer-table correction, age smoothing and sample selection

use crate::aggregate::build_observations;
use crate::error::PipelineError;
use crate::model::BalanceAnswer;

use super::{implicates, record};

#[test]
fn test_no_balance_answer_forces_zero_balance() {
    // Raw balance of 500 must be overwritten when the interview says no
    // revolving balance was carried.
    let mut records = implicates(1, 1000.0, 40.0, 2, 30_000.0);
    for r in &mut records {
        r.ccbal = 500.0;
    }
    let answers: Vec<BalanceAnswer> = records
        .iter()
        .map(|r| BalanceAnswer { y1: r.y1, x432: 1 })
        .collect();

    let observations = build_observations(records, &answers).unwrap();
    assert_eq!(observations.len(), 5);
    assert!(observations.iter().all(|o| o.ccbal == 0.0));
}

#[test]
fn test_other_answer_keeps_reported_balance() {
    let mut records = implicates(1, 1000.0, 40.0, 2, 30_000.0);
    for r in &mut records {
        r.ccbal = 500.0;
    }
    let answers: Vec<BalanceAnswer> = records
        .iter()
        .map(|r| BalanceAnswer { y1: r.y1, x432: 5 })
        .collect();

    let observations = build_observations(records, &answers).unwrap();
    assert!(observations.iter().all(|o| o.ccbal == 500.0));
}

#[test]
fn test_merge_is_left_join() {
    // A household absent from the answer table must survive with its
    // reported balance intact.
    let mut records = implicates(7, 800.0, 35.0, 3, 25_000.0);
    for r in &mut records {
        r.ccbal = 250.0;
    }
    let observations = build_observations(records, &[]).unwrap();
    assert_eq!(observations.len(), 5);
    assert!(observations.iter().all(|o| o.ccbal == 250.0));
}

#[test]
fn test_age_smoothing_uses_household_mean() {
    let ages = [24.0, 25.0, 26.0, 25.0, 25.0];
    let records: Vec<_> = ages
        .iter()
        .enumerate()
        .map(|(i, age)| record(3, i as u32 + 1, 500.0, *age, 2, 20_000.0))
        .collect();

    let observations = build_observations(records, &[]).unwrap();
    assert!(observations.iter().all(|o| o.age == 25.0));
}

#[test]
fn test_selection_interval_is_closed() {
    let mut records = Vec::new();
    records.extend(implicates(1, 100.0, 24.0, 2, 10_000.0)); // too young
    records.extend(implicates(2, 100.0, 25.0, 2, 10_000.0)); // boundary, kept
    records.extend(implicates(3, 100.0, 62.0, 2, 10_000.0)); // boundary, kept
    records.extend(implicates(4, 100.0, 63.0, 2, 10_000.0)); // too old

    let observations = build_observations(records, &[]).unwrap();
    let mut ids: Vec<u32> = observations.iter().map(|o| o.household_id.0).collect();
    ids.dedup();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_negative_income_dropped_zero_kept() {
    let mut records = implicates(1, 100.0, 40.0, 2, 0.0);
    records.extend(implicates(2, 100.0, 40.0, 2, -1.0));

    let observations = build_observations(records, &[]).unwrap();
    assert!(observations.iter().all(|o| o.household_id.0 == 1));
}

#[test]
fn test_empty_selection_is_an_error() {
    let records = implicates(1, 100.0, 80.0, 2, 10_000.0);
    let err = build_observations(records, &[]).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::EmptyPopulation { stage: "sample selection" }
    ));
}
