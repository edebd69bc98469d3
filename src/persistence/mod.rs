use crate::goal_validation::GoalValidationError;
use crate::tracker::TrackerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<GoalValidationError> for PersistenceError {
    fn from(value: GoalValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

impl From<TrackerError> for PersistenceError {
    fn from(value: TrackerError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub mod file;

pub use file::{
    load_completions_from_csv, load_goals_from_csv, load_tracker_from_json,
    save_completions_to_csv, save_goals_to_csv, save_tracker_to_json,
};
