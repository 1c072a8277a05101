//! Error types for tasks and task collections

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Everything that can go wrong when building tasks or accessing a task collection.
///
/// "No next occurrence" is not an error: [`Task::next_time_after`](crate::Task::next_time_after) returns `None` for that.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("The task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid repeat interval {0}: it must be a positive, whole number of seconds")]
    InvalidInterval(Duration),

    #[error("The end time ({end}) is before the start time ({start})")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Index {index} is out of range for a list of {size} task(s)")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("The capacity of a task list cannot be negative (got {0})")]
    NegativeCapacity(i64),

    #[error("There is no current task to remove")]
    NoCurrentElement,

    #[error("Unknown task list kind: {0:?}")]
    UnknownCollectionKind(String),
}
