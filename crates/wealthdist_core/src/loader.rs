//! Record Loader: reads the survey summary extract and the auxiliary
//! interview answer table into memory.
//!
//! Pure I/O with header validation; every column the pipeline depends on is
//! checked against the file header up front so missing columns fail with
//! their name instead of a row-level deserialization error. A missing file
//! fails with the expected path and its public source.

use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Writer};

use crate::error::LoadError;
use crate::model::{BalanceAnswer, RawRecord, SURVEY_COLUMNS};

/// Where the survey files can be obtained when absent
pub const SURVEY_SOURCE_HINT: &str =
    "download the 2004 Survey of Consumer Finances extract from \
     https://www.federalreserve.gov/econres/scf_2004.htm";

const ANSWER_COLUMNS: [&str; 2] = ["y1", "x432"];

fn open_csv(path: &Path) -> Result<Reader<std::fs::File>, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingInput {
            path: path.to_path_buf(),
            hint: SURVEY_SOURCE_HINT,
        });
    }
    Ok(ReaderBuilder::new().has_headers(true).from_path(path)?)
}

fn require_columns(
    headers: &StringRecord,
    path: &Path,
    columns: &[&str],
) -> Result<(), LoadError> {
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::Schema {
                path: path.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Load the survey summary extract.
///
/// Rows are deserialized by header name, so column order does not matter and
/// columns beyond [`SURVEY_COLUMNS`] are ignored.
pub fn load_survey(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = open_csv(path)?;
    require_columns(&reader.headers()?.clone(), path, &SURVEY_COLUMNS)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Load the interview answer table (`y1`, `x432`).
pub fn load_answers(path: &Path) -> Result<Vec<BalanceAnswer>, LoadError> {
    let mut reader = open_csv(path)?;
    require_columns(&reader.headers()?.clone(), path, &ANSWER_COLUMNS)?;

    let mut answers = Vec::new();
    for row in reader.deserialize() {
        answers.push(row?);
    }
    Ok(answers)
}

/// Load the answer table, deriving it from the full interview file when the
/// table itself is absent.
///
/// The derived table is written to `answer_path` so subsequent runs load it
/// directly. When neither file exists the error names the answer table.
pub fn load_or_derive_answers(
    answer_path: &Path,
    interview_path: Option<&Path>,
) -> Result<Vec<BalanceAnswer>, LoadError> {
    if answer_path.exists() {
        return load_answers(answer_path);
    }
    match interview_path {
        Some(interview) => derive_answers(interview, answer_path),
        None => Err(LoadError::MissingInput {
            path: answer_path.to_path_buf(),
            hint: SURVEY_SOURCE_HINT,
        }),
    }
}

/// Extract the `Y1`/`X432` columns from the full interview file and write
/// them as the answer table.
///
/// The interview file ships with uppercase column codes, so the header match
/// is case-insensitive. Returns the derived rows.
pub fn derive_answers(
    interview_path: &Path,
    out_path: &Path,
) -> Result<Vec<BalanceAnswer>, LoadError> {
    let mut reader = open_csv(interview_path)?;
    let headers = reader.headers()?.clone();

    let position = |column: &str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .ok_or_else(|| LoadError::Schema {
                path: interview_path.to_path_buf(),
                column: column.to_string(),
            })
    };
    let y1_idx = position("y1")?;
    let x432_idx = position("x432")?;

    let mut answers = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);
        let y1 = parse_number(&row, y1_idx, "y1", line, interview_path)? as u32;
        let x432 = parse_number(&row, x432_idx, "x432", line, interview_path)? as i32;
        answers.push(BalanceAnswer { y1, x432 });
    }

    let mut writer = Writer::from_path(out_path)?;
    writer.write_record(ANSWER_COLUMNS)?;
    for answer in &answers {
        writer.write_record([answer.y1.to_string(), answer.x432.to_string()])?;
    }
    writer.flush().map_err(LoadError::Io)?;

    Ok(answers)
}

/// Parse one cell as a number, tolerating float formatting of integer codes.
pub(crate) fn parse_number(
    row: &StringRecord,
    idx: usize,
    column: &str,
    line: u64,
    path: &Path,
) -> Result<f64, LoadError> {
    row.get(idx)
        .and_then(|cell| cell.trim().parse::<f64>().ok())
        .ok_or_else(|| LoadError::Value {
            path: path.to_path_buf(),
            column: column.to_string(),
            line,
        })
}
