//! Utilities to compare custom types
//!
//! These can be used to sort results, e.g. the (unordered) groups of a [`Timeline`](crate::timeline::Timeline)

use crate::Task;

/// Compare tasks alphabetically, ignoring case
pub fn compare_tasks_alpha(left: &&Task, right: &&Task) -> std::cmp::Ordering {
    Ord::cmp(&left.title().to_lowercase(), &right.title().to_lowercase())
}
