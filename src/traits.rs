use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::Task;
use crate::error::TaskError;
use crate::collection::CollectionKind;

/// An ordered list of tasks.
///
/// Tasks are kept in insertion order, and duplicates are allowed.
/// This is implemented by [`ArrayTaskCollection`](crate::ArrayTaskCollection) and [`LinkedTaskCollection`](crate::LinkedTaskCollection),
/// which behave the same but have different performance characteristics.
pub trait TaskCollection: Debug + Send {
    /// Returns the backing strategy of this list
    fn kind(&self) -> CollectionKind;

    /// Returns the number of tasks in this list
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the task at position `index`
    fn get(&self, index: usize) -> Result<&Task, TaskError>;
    /// Returns the task at position `index`
    fn get_mut(&mut self, index: usize) -> Result<&mut Task, TaskError>;

    /// Append a task to the end of this list
    fn add(&mut self, task: Task);

    /// Remove the first task that is equal to `task`.
    /// Returns whether a task has been removed
    fn remove(&mut self, task: &Task) -> bool;

    /// Iterate over the tasks of this list, in order
    fn iter(&self) -> Box<dyn Iterator<Item = &Task> + '_>;

    /// Returns a cursor over this list, which is able to remove tasks while iterating
    fn cursor(&mut self) -> Box<dyn TaskCursor + '_>;

    /// Returns a new list of the same kind, that contains (in order) every task that occurs at least once in `(start, end]`
    fn incoming(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Box<dyn TaskCollection>;

    /// Returns a deep copy of this list
    fn clone_boxed(&self) -> Box<dyn TaskCollection>;

    /// Whether both lists contain equal tasks, in the same order.
    ///
    /// Unlike `==`, this can compare lists of different kinds
    fn same_tasks_as(&self, other: &dyn TaskCollection) -> bool {
        self.size() == other.size() && self.iter().eq(other.iter())
    }
}

impl<'a, 'b> IntoIterator for &'a (dyn TaskCollection + 'b) {
    type Item = &'a Task;
    type IntoIter = Box<dyn Iterator<Item = &'a Task> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Clone for Box<dyn TaskCollection> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}


/// A cursor over a [`TaskCollection`].
///
/// Unlike a regular iterator, it can remove the task it has just visited, and carry on from the following one.
pub trait TaskCursor {
    /// Move to the next task, and return it
    fn next(&mut self) -> Option<&Task>;

    /// Remove the task that the last call to [`TaskCursor::next`] has returned.
    ///
    /// Fails if `next` has not been called yet, if it has returned `None`, or if the current task has already been removed.
    fn remove(&mut self) -> Result<Task, TaskError>;
}
