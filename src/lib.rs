//! This crate manages tasks that run once, or that repeat at a fixed interval within a time window.
//!
//! A [`Task`] knows when it next runs after a given time (see [`Task::next_time_after`]).
//!
//! Tasks are kept in task lists, that implement the [`TaskCollection`](traits::TaskCollection) trait.
//! Two backing strategies are provided: [`ArrayTaskCollection`] and [`LinkedTaskCollection`].
//! They behave the same, and [`collection::create_collection`] lets you pick one at runtime.
//!
//! The [`timeline`] module answers "which tasks occur within a time window?" and "when exactly?",
//! for any list (or any iterable) of tasks.
//!
//! On top of that, this crate also provides a JSON file [`storage`], and a [`notifications`] loop that regularly
//! checks a task list and reports tasks as they become due.

pub mod traits;
pub mod error;
pub use error::TaskError;

mod task;
pub use task::{Task, Schedule};
pub mod collection;
pub use collection::array::ArrayTaskCollection;
pub use collection::linked::LinkedTaskCollection;
pub use collection::CollectionKind;
pub mod timeline;

pub mod storage;
pub mod notifications;

pub mod config;
pub mod utils;
