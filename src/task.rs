//! One-off and recurring tasks

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};

use crate::error::TaskError;

/// When a task runs.
///
/// A task is either run once, or repeated every `interval` from `start` until `end` (both included).
/// Because this is an enum, only one of these representations can be "live" at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[serde(try_from = "UncheckedSchedule")]
pub enum Schedule {
    Once {
        time: DateTime<Utc>,
    },
    Repeating {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        #[serde(with = "interval_seconds")]
        interval: Duration,
    },
}

impl Schedule {
    /// Build a repeating schedule, checking that `end` is not before `start` and that `interval` is a positive number of seconds
    pub fn repeating(start: DateTime<Utc>, end: DateTime<Utc>, interval: Duration) -> Result<Self, TaskError> {
        if interval <= Duration::zero() || interval != Duration::seconds(interval.num_seconds()) {
            return Err(TaskError::InvalidInterval(interval));
        }
        if end < start {
            return Err(TaskError::EndBeforeStart{ start, end });
        }
        Ok(Schedule::Repeating{ start, end, interval })
    }
}


/// A task
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTask")]
pub struct Task {
    /// The display name of the task. Never empty, but not necessarily unique
    title: String,
    /// Inactive tasks never occur
    active: bool,
    schedule: Schedule,
}

impl Task {
    /// Create a task that runs once, at `time`.
    /// Like every new task, it is inactive until [`Task::set_active`] is called.
    pub fn new(title: impl Into<String>, time: DateTime<Utc>) -> Result<Self, TaskError> {
        Ok(Self {
            title: checked_title(title.into())?,
            active: false,
            schedule: Schedule::Once{ time },
        })
    }

    /// Create a task that runs every `interval`, from `start` to `end` (both included).
    /// Like every new task, it is inactive until [`Task::set_active`] is called.
    pub fn new_repeating(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>, interval: Duration) -> Result<Self, TaskError> {
        Ok(Self {
            title: checked_title(title.into())?,
            active: false,
            schedule: Schedule::repeating(start, end, interval)?,
        })
    }

    pub fn title(&self) -> &str           { &self.title    }
    pub fn is_active(&self) -> bool       { self.active    }
    pub fn schedule(&self) -> &Schedule   { &self.schedule }
    pub fn is_repeated(&self) -> bool     { matches!(self.schedule, Schedule::Repeating{..}) }

    /// The time of a one-off task, or the start time of a repeating task
    pub fn time(&self) -> DateTime<Utc> {
        self.start_time()
    }

    /// The start time of a repeating task, or the time of a one-off task
    pub fn start_time(&self) -> DateTime<Utc> {
        match self.schedule {
            Schedule::Once{ time } => time,
            Schedule::Repeating{ start, .. } => start,
        }
    }

    /// The end time of a repeating task, or the time of a one-off task
    pub fn end_time(&self) -> DateTime<Utc> {
        match self.schedule {
            Schedule::Once{ time } => time,
            Schedule::Repeating{ end, .. } => end,
        }
    }

    /// The recurrence interval, if this task is repeated
    pub fn repeat_interval(&self) -> Option<Duration> {
        match self.schedule {
            Schedule::Once{ .. } => None,
            Schedule::Repeating{ interval, .. } => Some(interval),
        }
    }

    /// Rename a task
    pub fn set_title(&mut self, new_title: impl Into<String>) -> Result<(), TaskError> {
        self.title = checked_title(new_title.into())?;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Make this task a one-off task, that runs at `time`
    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.schedule = Schedule::Once{ time };
    }

    /// Make this task a repeating task.
    /// In case of an error, the task is left unchanged.
    pub fn set_schedule(&mut self, start: DateTime<Utc>, end: DateTime<Utc>, interval: Duration) -> Result<(), TaskError> {
        self.schedule = Schedule::repeating(start, end, interval)?;
        Ok(())
    }

    /// Returns the first occurrence of this task strictly after `current`, or `None` if there is none.
    ///
    /// Occurrences of a repeating task are `start + k * interval` for every `k >= 0` that does not go past `end`.
    pub fn next_time_after(&self, current: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.active == false {
            return None;
        }

        match self.schedule {
            Schedule::Once{ time } => {
                if current < time { Some(time) } else { None }
            },
            Schedule::Repeating{ start, end, interval } => {
                if current < start {
                    return Some(start);
                }
                if current > end {
                    return None;
                }

                // `current - start` is non-negative here, so truncating to whole seconds is a floor
                let step = interval.num_seconds();
                let elapsed = (current - start).num_seconds();
                let offset = (elapsed / step + 1).checked_mul(step)?;
                let next = start.checked_add_signed(Duration::try_seconds(offset)?)?;

                if next > end { None } else { Some(next) }
            },
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let format = crate::config::date_format();
        let state = if self.active { "active" } else { "inactive" };
        match self.schedule {
            Schedule::Once{ time } => {
                write!(f, "{} at {} ({})", self.title, time.format(&format), state)
            },
            Schedule::Repeating{ start, end, interval } => {
                write!(f, "{} every {}s from {} to {} ({})",
                    self.title, interval.num_seconds(), start.format(&format), end.format(&format), state)
            },
        }
    }
}

fn checked_title(title: String) -> Result<String, TaskError> {
    if title.trim().is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(title)
}


/// What is actually read from a serialized schedule, before it is checked
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum UncheckedSchedule {
    Once {
        time: DateTime<Utc>,
    },
    Repeating {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        #[serde(with = "interval_seconds")]
        interval: Duration,
    },
}

impl TryFrom<UncheckedSchedule> for Schedule {
    type Error = TaskError;

    fn try_from(raw: UncheckedSchedule) -> Result<Self, Self::Error> {
        match raw {
            UncheckedSchedule::Once{ time } => Ok(Schedule::Once{ time }),
            UncheckedSchedule::Repeating{ start, end, interval } => Schedule::repeating(start, end, interval),
        }
    }
}

/// What is actually read from a serialized task, before it is checked
#[derive(Deserialize)]
struct UncheckedTask {
    title: String,
    active: bool,
    schedule: Schedule,
}

impl TryFrom<UncheckedTask> for Task {
    type Error = TaskError;

    fn try_from(raw: UncheckedTask) -> Result<Self, Self::Error> {
        // The schedule has already been checked while it was deserialized
        Ok(Task {
            title: checked_title(raw.title)?,
            active: raw.active,
            schedule: raw.schedule,
        })
    }
}

/// Intervals are stored as a number of seconds
mod interval_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(interval.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("interval out of range: {}s", secs)))
    }
}
