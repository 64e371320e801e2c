//! Error types for visit loading and validation
//!
//! The solver itself never fails; only the edges that parse input do.

use thiserror::Error;

use crate::visit::VisitIssue;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Row {row}: invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}: invalid {field} '{value}'")]
    InvalidFee {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("{} visit(s) failed validation", .0.len())]
    InvalidVisits(Vec<VisitIssue>),

    #[error("No dated visits to plan against")]
    NoDatedVisits,
}

pub type PlannerResult<T> = Result<T, PlannerError>;
