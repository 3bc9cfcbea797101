use thiserror::Error;

use super::model::Variable;

/// Precondition failures raised while validating observations or running
/// an aggregation. None of them are retryable; the UI shows the message in
/// place of the chart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("the dataset contains no observations")]
    EmptyDataset,

    #[error("invalid year range: start year {start} is after end year {end}")]
    InvalidRange { start: i32, end: i32 },

    #[error("unknown air-quality category '{0}'")]
    UnknownCategory(String),

    /// `row` counts data rows from 1, header excluded.
    #[error("data row {row}: missing value for {variable}")]
    MissingValue { row: usize, variable: Variable },
}
