//! Some utility functions

pub mod comparison;

use crate::Task;
use crate::traits::TaskCollection;
use crate::timeline::Timeline;
use comparison::compare_tasks_alpha;

/// A debug utility that pretty-prints a task list
pub fn print_task_list(tasks: &dyn TaskCollection) {
    println!("LIST ({}, {} task(s))", tasks.kind(), tasks.size());
    for (index, task) in tasks.iter().enumerate() {
        println!("    {:>3} {}", index, task);
    }
}

/// A debug utility that pretty-prints a timeline
pub fn print_timeline(timeline: &Timeline) {
    let format = crate::config::date_format();
    for (date, group) in timeline {
        println!("{}", date.format(&format));
        let mut group: Vec<&Task> = group.iter().copied().collect();
        group.sort_by(compare_tasks_alpha);
        for task in group {
            print_task(task);
        }
    }
}

pub fn print_task(task: &Task) {
    let activity = if task.is_active() { "✓" } else { " " };
    let repetition = if task.is_repeated() { "↻" } else { "." };
    println!("    {}{} {}", activity, repetition, task.title());
}
