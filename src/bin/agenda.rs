//! Prints the tasks of the coming week.
//!
//! Usage: `agenda [array|linked] [TASK_FILE] [--watch]`
//!
//! Without a task file, a sample week is used. With `--watch`, due tasks are then printed as they come.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Timelike, Utc};

use kitchen_timer::{CollectionKind, Task};
use kitchen_timer::collection::create_collection;
use kitchen_timer::notifications::{LogNotifier, NotificationManager, Notifier, ScreenNotifier};
use kitchen_timer::storage::{JsonFileStorage, Storage};
use kitchen_timer::traits::TaskCollection;
use kitchen_timer::timeline::calendar;


#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let watch = args.iter().any(|arg| arg == "--watch");
    let mut positional = args.iter().filter(|arg| arg.starts_with("--") == false);

    let kind = match positional.next().map(|arg| arg.parse::<CollectionKind>()) {
        None => kitchen_timer::config::default_collection_kind(),
        Some(Ok(kind)) => kind,
        Some(Err(err)) => {
            log::error!("{}", err);
            std::process::exit(2);
        },
    };

    let mut tasks = create_collection(kind);
    match positional.next() {
        Some(path) => {
            if let Err(err) = JsonFileStorage::new(Path::new(path)).load(&mut *tasks) {
                log::error!("Unable to load tasks: {}", err);
                std::process::exit(1);
            }
        },
        None => add_sample_week(&mut *tasks),
    }

    println!("---- Tasks -----");
    kitchen_timer::utils::print_task_list(&*tasks);

    let now = Utc::now();
    println!("---- Next seven days -----");
    kitchen_timer::utils::print_timeline(&calendar(&*tasks, now, now + Duration::days(7)));

    if watch {
        let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(ScreenNotifier), Box::new(LogNotifier)];
        NotificationManager::new(Arc::new(Mutex::new(tasks)), notifiers)
            .run()
            .await;
    }
}

fn add_sample_week(tasks: &mut dyn TaskCollection) {
    let now = Utc::now();
    let today = now
        .with_minute(0).and_then(|t| t.with_second(0)).and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    let samples = vec![
        Task::new_repeating("standup", today + Duration::hours(1), today + Duration::days(5), Duration::days(1)),
        Task::new_repeating("stretch", today, today + Duration::days(2), Duration::hours(4)),
        Task::new("deadline", today + Duration::days(3)),
        Task::new("someday", today + Duration::days(30)),
    ];

    for sample in samples {
        match sample {
            Ok(mut task) => {
                task.set_active(true);
                tasks.add(task);
            },
            Err(err) => log::warn!("Invalid sample task: {}", err),
        }
    }
}
