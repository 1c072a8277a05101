//! A task list backed by a contiguous buffer

use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use chrono::{DateTime, Utc};

use crate::Task;
use crate::error::TaskError;
use crate::traits::{TaskCollection, TaskCursor};
use crate::collection::CollectionKind;
use crate::timeline::occurs_in;

/// The capacity of a list created by [`ArrayTaskCollection::new`]
pub const DEFAULT_CAPACITY: usize = 10;

/// A task list that stores its tasks in a buffer it manages itself.
///
/// The buffer grows by about 1.5x when it is full, and is shrunk back when more than half of it is unused.
/// Index access is O(1); removal is O(n) because the following tasks are shifted.
#[derive(Clone)]
pub struct ArrayTaskCollection {
    /// Slots `0..size` are always `Some`, the remaining ones are always `None`
    buffer: Vec<Option<Task>>,
    size: usize,
}

impl ArrayTaskCollection {
    /// Create an empty list, with a [`DEFAULT_CAPACITY`]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty list, that can hold `capacity` tasks before it needs to grow
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: empty_buffer(capacity),
            size: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// How many tasks this list can hold before it needs to grow
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn get(&self, index: usize) -> Result<&Task, TaskError> {
        if index >= self.size {
            return Err(TaskError::IndexOutOfRange{ index, size: self.size });
        }
        self.buffer[index].as_ref().ok_or(TaskError::IndexOutOfRange{ index, size: self.size })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Task, TaskError> {
        let size = self.size;
        if index >= size {
            return Err(TaskError::IndexOutOfRange{ index, size });
        }
        self.buffer[index].as_mut().ok_or(TaskError::IndexOutOfRange{ index, size })
    }

    /// Append a task to the end of this list
    pub fn add(&mut self, task: Task) {
        if self.size == self.buffer.len() {
            self.grow(self.size + 1);
        }
        self.buffer[self.size] = Some(task);
        self.size += 1;
    }

    /// Remove the first task that is equal to `task`.
    /// Returns whether a task has been removed
    pub fn remove(&mut self, task: &Task) -> bool {
        match self.index_of(task) {
            None => false,
            Some(index) => {
                self.remove_at(index);
                true
            }
        }
    }

    /// Returns the position of the first task equal to `task`
    pub fn index_of(&self, task: &Task) -> Option<usize> {
        self.iter().position(|t| t == task)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.buffer[..self.size].iter() }
    }

    pub fn cursor_mut(&mut self) -> ArrayCursor<'_> {
        ArrayCursor { list: self, next: 0, current: None }
    }

    /// Returns the tasks that occur at least once in `(start, end]`
    pub fn incoming(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.iter()
            .filter(|task| occurs_in(task, start, end))
            .cloned()
            .collect()
    }

    fn remove_at(&mut self, index: usize) -> Option<Task> {
        if index >= self.size {
            return None;
        }
        // Shift the following tasks to the left. The emptied slot ends up at `size - 1`
        let removed = self.buffer[index].take();
        self.buffer[index..self.size].rotate_left(1);
        self.size -= 1;

        let capacity = self.buffer.len();
        if capacity > DEFAULT_CAPACITY && capacity - self.size > self.size {
            self.shrink();
        }
        removed
    }

    fn grow(&mut self, min_capacity: usize) {
        let new_capacity = min_capacity + min_capacity / 2;
        log::debug!("Growing a task list from {} to {} slots", self.buffer.len(), new_capacity);
        self.buffer.resize_with(new_capacity, || None);
    }

    fn shrink(&mut self) {
        let new_capacity = std::cmp::max(self.size + self.size / 2, DEFAULT_CAPACITY);
        log::debug!("Shrinking a task list from {} to {} slots", self.buffer.len(), new_capacity);
        self.buffer.truncate(new_capacity);
        self.buffer.shrink_to_fit();
    }
}

fn empty_buffer(capacity: usize) -> Vec<Option<Task>> {
    let mut buffer = Vec::with_capacity(capacity);
    buffer.resize_with(capacity, || None);
    buffer
}

impl Default for ArrayTaskCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskCollection for ArrayTaskCollection {
    fn kind(&self) -> CollectionKind { CollectionKind::Array }
    fn size(&self) -> usize { self.size }

    fn get(&self, index: usize) -> Result<&Task, TaskError> {
        ArrayTaskCollection::get(self, index)
    }
    fn get_mut(&mut self, index: usize) -> Result<&mut Task, TaskError> {
        ArrayTaskCollection::get_mut(self, index)
    }

    fn add(&mut self, task: Task) {
        ArrayTaskCollection::add(self, task)
    }
    fn remove(&mut self, task: &Task) -> bool {
        ArrayTaskCollection::remove(self, task)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Task> + '_> {
        Box::new(ArrayTaskCollection::iter(self))
    }
    fn cursor(&mut self) -> Box<dyn TaskCursor + '_> {
        Box::new(self.cursor_mut())
    }

    fn incoming(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Box<dyn TaskCollection> {
        Box::new(ArrayTaskCollection::incoming(self, start, end))
    }
    fn clone_boxed(&self) -> Box<dyn TaskCollection> {
        Box::new(self.clone())
    }
}

impl PartialEq for ArrayTaskCollection {
    /// Lists are equal when they hold equal tasks in the same order, whatever their capacities
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}
impl Eq for ArrayTaskCollection {}

impl Hash for ArrayTaskCollection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        for task in self.iter() {
            task.hash(state);
        }
    }
}

impl Debug for ArrayTaskCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Task> for ArrayTaskCollection {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl Extend<Task> for ArrayTaskCollection {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        for task in iter {
            self.add(task);
        }
    }
}

impl<'a> IntoIterator for &'a ArrayTaskCollection {
    type Item = &'a Task;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


/// An iterator over the tasks of an [`ArrayTaskCollection`]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, Option<Task>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().and_then(|slot| slot.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}


/// A cursor over an [`ArrayTaskCollection`], see [`TaskCursor`]
pub struct ArrayCursor<'a> {
    list: &'a mut ArrayTaskCollection,
    /// Index of the task the next call to `next` will return
    next: usize,
    /// Index of the task the last call to `next` has returned, unless it has been removed since
    current: Option<usize>,
}

impl<'a> TaskCursor for ArrayCursor<'a> {
    fn next(&mut self) -> Option<&Task> {
        if self.next >= self.list.size {
            self.current = None;
            return None;
        }
        let index = self.next;
        self.current = Some(index);
        self.next += 1;
        self.list.buffer[index].as_ref()
    }

    fn remove(&mut self) -> Result<Task, TaskError> {
        let index = self.current.take().ok_or(TaskError::NoCurrentElement)?;
        let removed = self.list.remove_at(index).ok_or(TaskError::NoCurrentElement)?;
        // The following tasks have been shifted left by one
        self.next = index;
        Ok(removed)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use chrono::{Duration, TimeZone};

    fn task(title: &str) -> Task {
        let mut task = Task::new(title, Utc.with_ymd_and_hms(2021, 1, 10, 17, 0, 0).unwrap()).unwrap();
        task.set_active(true);
        task
    }

    fn hash_of(list: &ArrayTaskCollection) -> u64 {
        let mut hasher = DefaultHasher::new();
        list.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn grows_past_default_capacity() {
        let mut list = ArrayTaskCollection::new();
        assert_eq!(list.capacity(), DEFAULT_CAPACITY);

        for i in 0..100 {
            list.add(task(&format!("task {}", i)));
        }
        assert_eq!(list.size(), 100);
        assert!(list.capacity() >= 100);
        for i in 0..100 {
            assert_eq!(list.get(i).unwrap().title(), format!("task {}", i));
        }
        assert_eq!(list.get(100), Err(TaskError::IndexOutOfRange{ index: 100, size: 100 }));
    }

    #[test]
    fn zero_capacity() {
        let mut list = ArrayTaskCollection::with_capacity(0);
        assert_eq!(list.capacity(), 0);
        list.add(task("a"));
        assert_eq!(list.size(), 1);
        assert!(list.capacity() >= 1);
    }

    #[test]
    fn remove_shifts_and_shrinks() {
        let mut list: ArrayTaskCollection = (0..100).map(|i| task(&format!("task {}", i))).collect();
        let grown = list.capacity();

        assert!(list.remove(&task("task 0")));
        assert_eq!(list.get(0).unwrap().title(), "task 1");
        assert_eq!(list.remove(&task("task 0")), false);

        for i in 1..90 {
            assert!(list.remove(&task(&format!("task {}", i))));
        }
        assert_eq!(list.size(), 10);
        assert!(list.capacity() < grown);
        assert!(list.capacity() >= list.size());
        let titles: Vec<_> = list.iter().map(|t| t.title().to_string()).collect();
        let expected: Vec<_> = (90..100).map(|i| format!("task {}", i)).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn remove_uses_equality() {
        let mut list = ArrayTaskCollection::new();
        list.add(task("a"));
        list.add(task("b"));
        list.add(task("a"));

        let mut other_a = task("a");
        other_a.set_active(false);
        assert_eq!(list.remove(&other_a), false);

        assert!(list.remove(&task("a")));
        let titles: Vec<_> = list.iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn cursor_removal() {
        let mut list: ArrayTaskCollection = vec![task("A"), task("B"), task("C")].into_iter().collect();
        {
            let mut cursor = list.cursor_mut();
            assert_eq!(cursor.remove(), Err(TaskError::NoCurrentElement));
            assert_eq!(cursor.next().unwrap().title(), "A");
            assert_eq!(cursor.next().unwrap().title(), "B");
            assert_eq!(cursor.remove().unwrap().title(), "B");
            assert_eq!(cursor.remove(), Err(TaskError::NoCurrentElement));
            assert_eq!(cursor.next().unwrap().title(), "C");
            assert!(cursor.next().is_none());
            assert_eq!(cursor.remove(), Err(TaskError::NoCurrentElement));
        }
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn cursor_removes_everything() {
        let mut list: ArrayTaskCollection = (0..20).map(|i| task(&format!("task {}", i))).collect();
        {
            let mut cursor = list.cursor_mut();
            let mut seen = 0;
            while cursor.next().is_some() {
                cursor.remove().unwrap();
                seen += 1;
            }
            assert_eq!(seen, 20);
        }
        assert_eq!(list.size(), 0);
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn incoming_keeps_the_kind_and_order() {
        let start = Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap();
        let mut list = ArrayTaskCollection::new();
        list.add(task("deadline"));
        let mut weekly = Task::new_repeating("weekly", start, start + Duration::weeks(4), Duration::weeks(1)).unwrap();
        weekly.set_active(true);
        list.add(weekly.clone());
        list.add(Task::new("inactive", start + Duration::hours(1)).unwrap());

        let incoming = list.incoming(start, start + Duration::days(3));
        assert_eq!(incoming.size(), 0);

        let incoming = list.incoming(start, start + Duration::days(7));
        assert_eq!(incoming.iter().collect::<Vec<_>>(), vec![&task("deadline"), &weekly]);
    }

    #[test]
    fn equality_ignores_capacity() {
        let mut small = ArrayTaskCollection::with_capacity(1);
        let mut large = ArrayTaskCollection::with_capacity(50);
        for name in &["a", "b", "c"] {
            small.add(task(name));
            large.add(task(name));
        }
        assert_eq!(small, large);
        assert_eq!(hash_of(&small), hash_of(&large));
        large.add(task("d"));
        assert_ne!(small, large);

        let reversed: ArrayTaskCollection = vec![task("c"), task("b"), task("a")].into_iter().collect();
        assert_ne!(small, reversed);
        assert_ne!(hash_of(&small), hash_of(&reversed));
    }

    #[test]
    fn clones_are_independent() {
        let mut list: ArrayTaskCollection = vec![task("a"), task("b")].into_iter().collect();
        let snapshot = list.clone();
        list.get_mut(0).unwrap().set_title("renamed").unwrap();
        list.remove(&task("b"));
        assert_eq!(snapshot.get(0).unwrap().title(), "a");
        assert_eq!(snapshot.size(), 2);
    }
}
