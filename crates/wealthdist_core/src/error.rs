use std::fmt;
use std::path::PathBuf;

/// Errors raised while loading tabular survey inputs
#[derive(Debug)]
pub enum LoadError {
    /// A required input file does not exist. Carries an acquisition hint so
    /// the operator knows where the file can be obtained.
    MissingInput { path: PathBuf, hint: &'static str },
    /// A column the pipeline depends on is absent from the file header.
    Schema { path: PathBuf, column: String },
    /// A cell that must hold a number could not be parsed as one.
    Value {
        path: PathBuf,
        column: String,
        line: u64,
    },
    Csv(csv::Error),
    Io(std::io::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::MissingInput { path, hint } => {
                write!(
                    f,
                    "required input file not found: {} ({hint})",
                    path.display()
                )
            }
            LoadError::Schema { path, column } => {
                write!(
                    f,
                    "expected column '{column}' is missing from {}",
                    path.display()
                )
            }
            LoadError::Value { path, column, line } => {
                write!(
                    f,
                    "column '{column}' holds a non-numeric value at line {line} of {}",
                    path.display()
                )
            }
            LoadError::Csv(e) => write!(f, "{e}"),
            LoadError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Csv(e) => Some(e),
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// Errors raised by the aggregation/statistics stages
#[derive(Debug)]
pub enum PipelineError {
    /// A filter stage left zero households behind. Weighted statistics are
    /// undefined on an empty population, so this is fatal.
    EmptyPopulation { stage: &'static str },
    Load(LoadError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::EmptyPopulation { stage } => {
                write!(f, "no households remain after the '{stage}' stage")
            }
            PipelineError::Load(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Load(e) => Some(e),
            PipelineError::EmptyPopulation { .. } => None,
        }
    }
}

impl From<LoadError> for PipelineError {
    fn from(e: LoadError) -> Self {
        PipelineError::Load(e)
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
