//! Filter tasks by time window, and lay their occurrences out on a timeline
//!
//! These functions accept any iterable of `&Task`: a [`TaskCollection`](crate::traits::TaskCollection) (of any kind),
//! a `Vec`, a slice, or the result of a previous query.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::Task;

/// The tasks that occur at each point in time, in chronological order
pub type Timeline<'a> = BTreeMap<DateTime<Utc>, HashSet<&'a Task>>;

/// Whether `task` occurs at least once in `(start, end]`
pub(crate) fn occurs_in(task: &Task, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    match task.next_time_after(start) {
        Some(next) => next <= end,
        None => false,
    }
}

/// Returns the tasks that occur at least once after `start` and no later than `end`.
///
/// Tasks are currently returned in input order, but callers should not rely on that.
pub fn incoming<'a, I>(tasks: I, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter()
        .filter(|task| occurs_in(task, start, end))
        .collect()
}

/// Returns every occurrence in `(start, end]` of the given tasks, grouped by time
pub fn calendar<'a, I>(tasks: I, start: DateTime<Utc>, end: DateTime<Utc>) -> Timeline<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut timeline = Timeline::new();

    for task in incoming(tasks, start, end) {
        let mut cursor = task.next_time_after(start);
        while let Some(date) = cursor {
            if date > end {
                break;
            }
            timeline.entry(date).or_insert_with(HashSet::new).insert(task);
            cursor = task.next_time_after(date);
        }
    }

    log::debug!("Built a timeline of {} date(s) between {} and {}", timeline.len(), start, end);
    timeline
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, day, hour, 0, 0).unwrap()
    }

    fn active(mut task: Task) -> Task {
        task.set_active(true);
        task
    }

    #[test]
    fn empty_input() {
        let tasks: Vec<Task> = Vec::new();
        assert!(calendar(&tasks, at(1, 0), at(31, 0)).is_empty());
        assert!(incoming(&tasks, at(1, 0), at(31, 0)).is_empty());
    }

    #[test]
    fn inactive_tasks_are_excluded() {
        let tasks = vec![Task::new("inactive", at(10, 17)).unwrap()];
        assert!(incoming(&tasks, at(1, 0), at(31, 0)).is_empty());
        assert!(incoming(&tasks, at(10, 16), at(10, 17)).is_empty());
    }

    #[test]
    fn incoming_window_bounds() {
        let tasks = vec![active(Task::new("deadline", at(10, 17)).unwrap())];
        // `end` is included...
        assert_eq!(incoming(&tasks, at(10, 0), at(10, 17)).len(), 1);
        // ...but `start` is not
        assert!(incoming(&tasks, at(10, 17), at(11, 0)).is_empty());
        assert!(incoming(&tasks, at(9, 0), at(10, 16)).is_empty());
    }

    #[test]
    fn calendar_groups_by_date() {
        let standup = active(Task::new_repeating("standup", at(4, 9), at(8, 9), Duration::days(1)).unwrap());
        let review = active(Task::new("review", at(6, 9)).unwrap());
        let late = active(Task::new("late", at(20, 9)).unwrap());
        let tasks = vec![standup.clone(), review.clone(), late];

        let timeline = calendar(&tasks, at(4, 9), at(8, 9));

        let dates: Vec<_> = timeline.keys().cloned().collect();
        assert_eq!(dates, vec![at(5, 9), at(6, 9), at(7, 9), at(8, 9)]);
        assert_eq!(timeline[&at(5, 9)].len(), 1);
        assert!(timeline[&at(6, 9)].contains(&standup));
        assert!(timeline[&at(6, 9)].contains(&review));
        assert_eq!(timeline[&at(6, 9)].len(), 2);
    }

    #[test]
    fn duplicates_collapse_in_a_group() {
        let deadline = active(Task::new("deadline", at(10, 17)).unwrap());
        let tasks = vec![deadline.clone(), deadline.clone()];
        assert_eq!(incoming(&tasks, at(1, 0), at(31, 0)).len(), 2);

        let timeline = calendar(&tasks, at(1, 0), at(31, 0));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[&at(10, 17)].len(), 1);
    }

    #[test]
    fn calendar_matches_repeated_next_time_after() {
        let tasks = vec![
            active(Task::new_repeating("a", at(1, 0), at(20, 0), Duration::hours(7)).unwrap()),
            active(Task::new_repeating("b", at(3, 5), at(9, 0), Duration::hours(13)).unwrap()),
            active(Task::new("c", at(5, 5)).unwrap()),
        ];
        let (start, end) = (at(2, 3), at(8, 0));
        let timeline = calendar(&tasks, start, end);

        let mut expected = 0;
        for task in &tasks {
            let mut current = start;
            while let Some(next) = task.next_time_after(current) {
                if next > end {
                    break;
                }
                assert!(timeline[&next].contains(task));
                expected += 1;
                current = next;
            }
        }
        let found: usize = timeline.values().map(|group| group.len()).sum();
        assert_eq!(found, expected);
        assert!(timeline.keys().all(|date| *date > start && *date <= end));
    }
}
