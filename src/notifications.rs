//! Periodically look for tasks that are due, and tell the user about them

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;

use crate::Task;
use crate::traits::TaskCollection;
use crate::timeline::{calendar, Timeline};
use crate::utils::comparison::compare_tasks_alpha;

/// A task list that is shared between the app and a [`NotificationManager`]
pub type SharedTasks = Arc<Mutex<Box<dyn TaskCollection>>>;

/// Something that is told when tasks are due
pub trait Notifier: Send + Sync {
    /// Called once for every point in time at which some tasks occur
    fn notify(&self, at: DateTime<Utc>, tasks: &HashSet<&Task>);
}

/// A [`Notifier`] that writes to the log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, at: DateTime<Utc>, tasks: &HashSet<&Task>) {
        for task in tasks {
            log::info!("Task due at {}: {}", at, task.title());
        }
    }
}

/// A [`Notifier`] that prints to stdout
pub struct ScreenNotifier;

impl Notifier for ScreenNotifier {
    fn notify(&self, at: DateTime<Utc>, tasks: &HashSet<&Task>) {
        let format = crate::config::date_format();
        let mut tasks: Vec<&Task> = tasks.iter().copied().collect();
        tasks.sort_by(compare_tasks_alpha);
        println!();
        for task in tasks {
            println!("{}: time to do - {}", at.format(&format), task.title());
        }
    }
}


/// Returns the occurrences of `tasks` after `since` and up to (including) `now`
pub fn due_tasks<'a, I>(tasks: I, since: DateTime<Utc>, now: DateTime<Utc>) -> Timeline<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    calendar(tasks, since, now)
}


/// Checks a task list at regular intervals, and hands the tasks that have become due to its notifiers
pub struct NotificationManager {
    tasks: SharedTasks,
    notifiers: Vec<Box<dyn Notifier>>,
    period: std::time::Duration,
    /// The end of the last checked window
    last_check: Option<DateTime<Utc>>,
}

impl NotificationManager {
    /// Create a manager that checks `tasks` every [`config::NOTIFICATION_PERIOD`](crate::config::NOTIFICATION_PERIOD)
    pub fn new(tasks: SharedTasks, notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self {
            tasks,
            notifiers,
            period: crate::config::notification_period(),
            last_check: None,
        }
    }

    /// Use a custom check period
    pub fn with_period(mut self, period: std::time::Duration) -> Self {
        self.period = period;
        self
    }

    pub fn period(&self) -> std::time::Duration {
        self.period
    }

    /// Notify about every occurrence since the previous check (or, for the first check, during the last period) up to `now`.
    ///
    /// Returns how many (time, task) occurrences have been notified.
    /// The task list stays locked while notifiers run.
    pub fn tick(&mut self, now: DateTime<Utc>) -> usize {
        let since = match self.last_check {
            Some(last) => last,
            None => match Duration::from_std(self.period) {
                Ok(period) => now - period,
                Err(_) => {
                    log::warn!("Notification period {:?} is too large, only checking {}", self.period, now);
                    now
                },
            },
        };
        self.last_check = Some(now);
        if now <= since {
            return 0;
        }

        let tasks = match self.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => {
                log::warn!("The task list lock is poisoned, checking it anyway");
                poisoned.into_inner()
            },
        };

        let timeline = due_tasks(&**tasks, since, now);
        let mut notified = 0;
        for (at, group) in &timeline {
            log::debug!("{} task(s) due at {}", group.len(), at);
            for notifier in &self.notifiers {
                notifier.notify(*at, group);
            }
            notified += group.len();
        }
        notified
    }

    /// Check the task list forever, once per period
    pub async fn run(mut self) {
        if self.period.is_zero() {
            log::warn!("A zero notification period is not supported, checking every second instead");
            self.period = std::time::Duration::from_secs(1);
        }
        log::info!("Starting notifications, every {:?}", self.period);
        let mut interval = tokio::time::interval(self.period);
        loop {
            interval.tick().await;
            self.tick(Utc::now());
        }
    }

    /// Start [`NotificationManager::run`] in the background. Abort the returned handle to stop it
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::collection::{create_collection, CollectionKind};

    /// Remembers every notification it gets
    #[derive(Clone, Default)]
    struct RecordingNotifier {
        received: Arc<Mutex<Vec<(DateTime<Utc>, Vec<String>)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, at: DateTime<Utc>, tasks: &HashSet<&Task>) {
            let mut titles: Vec<String> = tasks.iter().map(|t| t.title().to_string()).collect();
            titles.sort();
            self.received.lock().unwrap().push((at, titles));
        }
    }

    fn boxed(recorder: &RecordingNotifier) -> Box<dyn Notifier> {
        Box::new(recorder.clone())
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 4, hour, minute, 0).unwrap()
    }

    fn shared(tasks: Vec<Task>) -> SharedTasks {
        let mut list = create_collection(CollectionKind::Array);
        for mut task in tasks {
            task.set_active(true);
            list.add(task);
        }
        Arc::new(Mutex::new(list))
    }

    #[test]
    fn ticks_cover_consecutive_windows() {
        let tasks = shared(vec![
            Task::new_repeating("stretch", at(9, 0), at(10, 0), Duration::minutes(30)).unwrap(),
            Task::new("call", at(9, 30)).unwrap(),
        ]);
        let recorder = RecordingNotifier::default();
        let mut manager = NotificationManager::new(tasks, vec![boxed(&recorder), Box::new(LogNotifier) as Box<dyn Notifier>])
            .with_period(std::time::Duration::from_secs(60));

        // The first window is (8:59, 9:00]
        assert_eq!(manager.tick(at(9, 0)), 1);
        assert_eq!(manager.tick(at(9, 1)), 0);
        // (9:01, 9:45]
        assert_eq!(manager.tick(at(9, 45)), 2);
        assert_eq!(manager.tick(at(9, 45)), 0);
        assert_eq!(manager.tick(at(11, 0)), 1);

        let received = recorder.received.lock().unwrap();
        assert_eq!(*received, vec![
            (at(9, 0), vec!["stretch".to_string()]),
            (at(9, 30), vec!["call".to_string(), "stretch".to_string()]),
            (at(10, 0), vec!["stretch".to_string()]),
        ]);
    }

    #[test]
    fn inactive_tasks_are_not_notified() {
        let tasks = shared(vec![Task::new("call", at(9, 30)).unwrap()]);
        if let Ok(mut list) = tasks.lock() {
            list.get_mut(0).unwrap().set_active(false);
        }
        let recorder = RecordingNotifier::default();
        let mut manager = NotificationManager::new(tasks, vec![boxed(&recorder)]);
        manager.tick(at(9, 0));
        assert_eq!(manager.tick(at(10, 0)), 0);
        assert!(recorder.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn background_notifications() {
        let _ = env_logger::builder().is_test(true).try_init();

        let tasks = shared(Vec::new());
        let recorder = RecordingNotifier::default();
        let mut manager = NotificationManager::new(tasks.clone(), vec![boxed(&recorder)])
            .with_period(std::time::Duration::from_millis(10));
        // Every later window starts where this one ends, so the task added next cannot be missed
        manager.tick(Utc::now());

        let mut soon = Task::new("soon", Utc::now() + Duration::milliseconds(50)).unwrap();
        soon.set_active(true);
        tasks.lock().unwrap().add(soon);

        let handle = manager.spawn();
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        handle.abort();

        let received = recorder.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].1, vec!["soon".to_string()]);
    }
}
