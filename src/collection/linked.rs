//! A task list backed by doubly-linked nodes

use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use chrono::{DateTime, Utc};

use crate::Task;
use crate::error::TaskError;
use crate::traits::{TaskCollection, TaskCursor};
use crate::collection::CollectionKind;
use crate::timeline::occurs_in;

/// Nodes live in an arena, and link to each other by their slot number
#[derive(Clone)]
struct Node {
    task: Task,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A task list made of a chain of nodes.
///
/// Appending is O(1), finding the task to remove is O(n) but unlinking it is O(1).
/// Index access walks the chain from whichever end is closer.
/// Freed slots are reused, and the arena is compacted once more than half of it is free.
#[derive(Clone, Default)]
pub struct LinkedTaskCollection {
    slots: Vec<Option<Node>>,
    /// Empty slots, reused before the arena grows
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    size: usize,
}

impl LinkedTaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, index: usize) -> Result<&Task, TaskError> {
        let slot = self.slot_at(index)?;
        Ok(&self.node(slot).task)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Task, TaskError> {
        let size = self.size;
        let slot = self.slot_at(index)?;
        match self.slots[slot].as_mut() {
            Some(node) => Ok(&mut node.task),
            None => Err(TaskError::IndexOutOfRange{ index, size }),
        }
    }

    /// Append a task to the end of this list
    pub fn add(&mut self, task: Task) {
        let node = Node { task, prev: self.tail, next: None };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            },
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            },
        };

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.size += 1;
    }

    /// Remove the first task that is equal to `task`.
    /// Returns whether a task has been removed
    pub fn remove(&mut self, task: &Task) -> bool {
        let mut current = self.head;
        while let Some(slot) = current {
            let node = self.node(slot);
            if &node.task == task {
                self.unlink(slot);
                self.compact_if_sparse();
                return true;
            }
            current = node.next;
        }
        false
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { list: self, next: self.head, remaining: self.size }
    }

    pub fn cursor_mut(&mut self) -> LinkedCursor<'_> {
        let next = self.head;
        LinkedCursor { list: self, next, current: None }
    }

    /// Returns the tasks that occur at least once in `(start, end]`
    pub fn incoming(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.iter()
            .filter(|task| occurs_in(task, start, end))
            .cloned()
            .collect()
    }

    /// Returns the arena slot of the `index`-th task, walking from the closest end of the chain
    fn slot_at(&self, index: usize) -> Result<usize, TaskError> {
        let out_of_range = TaskError::IndexOutOfRange{ index, size: self.size };
        if index >= self.size {
            return Err(out_of_range);
        }

        let found = if index < self.size / 2 {
            let mut current = self.head;
            for _ in 0..index {
                current = current.and_then(|slot| self.node(slot).next);
            }
            current
        } else {
            let mut current = self.tail;
            for _ in 0..(self.size - 1 - index) {
                current = current.and_then(|slot| self.node(slot).prev);
            }
            current
        };
        found.ok_or(out_of_range)
    }

    /// Detach the node at `slot` from its neighbours, and free its slot
    fn unlink(&mut self, slot: usize) -> Option<Task> {
        let node = self.slots.get_mut(slot)?.take()?;

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }

        self.free.push(slot);
        self.size -= 1;
        if self.size == 0 {
            // Nothing is linked anymore, the arena can be dropped altogether
            self.slots.clear();
            self.free.clear();
        }
        Some(node.task)
    }

    /// Rebuild the arena in chain order when it has more free slots than linked ones.
    ///
    /// This moves nodes to other slots, so it must not run while a cursor holds slot numbers.
    fn compact_if_sparse(&mut self) {
        if self.free.len() <= self.size {
            return;
        }
        log::debug!("Compacting a linked list of {} task(s) ({} free slots)", self.size, self.free.len());

        let mut old = std::mem::take(self);
        let mut current = old.head;
        while let Some(slot) = current {
            let node = match old.slots[slot].take() {
                Some(node) => node,
                None => unreachable!("slot {} is linked but empty", slot),
            };
            current = node.next;
            self.add(node.task);
        }
    }

    // Slots reachable from `head`, `tail` or another linked node are always occupied
    fn node(&self, slot: usize) -> &Node {
        match &self.slots[slot] {
            Some(node) => node,
            None => unreachable!("slot {} is linked but empty", slot),
        }
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node {
        match &mut self.slots[slot] {
            Some(node) => node,
            None => unreachable!("slot {} is linked but empty", slot),
        }
    }
}

impl TaskCollection for LinkedTaskCollection {
    fn kind(&self) -> CollectionKind { CollectionKind::Linked }
    fn size(&self) -> usize { self.size }

    fn get(&self, index: usize) -> Result<&Task, TaskError> {
        LinkedTaskCollection::get(self, index)
    }
    fn get_mut(&mut self, index: usize) -> Result<&mut Task, TaskError> {
        LinkedTaskCollection::get_mut(self, index)
    }

    fn add(&mut self, task: Task) {
        LinkedTaskCollection::add(self, task)
    }
    fn remove(&mut self, task: &Task) -> bool {
        LinkedTaskCollection::remove(self, task)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Task> + '_> {
        Box::new(LinkedTaskCollection::iter(self))
    }
    fn cursor(&mut self) -> Box<dyn TaskCursor + '_> {
        Box::new(self.cursor_mut())
    }

    fn incoming(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Box<dyn TaskCollection> {
        Box::new(LinkedTaskCollection::incoming(self, start, end))
    }
    fn clone_boxed(&self) -> Box<dyn TaskCollection> {
        Box::new(self.clone())
    }
}

impl PartialEq for LinkedTaskCollection {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}
impl Eq for LinkedTaskCollection {}

impl Hash for LinkedTaskCollection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        for task in self.iter() {
            task.hash(state);
        }
    }
}

impl Debug for LinkedTaskCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Task> for LinkedTaskCollection {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl Extend<Task> for LinkedTaskCollection {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        for task in iter {
            self.add(task);
        }
    }
}

impl<'a> IntoIterator for &'a LinkedTaskCollection {
    type Item = &'a Task;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


/// An iterator over the tasks of a [`LinkedTaskCollection`]
pub struct Iter<'a> {
    list: &'a LinkedTaskCollection,
    next: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let node = list.node(self.next?);
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.task)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}


/// A cursor over a [`LinkedTaskCollection`], see [`TaskCursor`]
pub struct LinkedCursor<'a> {
    list: &'a mut LinkedTaskCollection,
    /// Slot of the node the next call to `next` will return
    next: Option<usize>,
    /// Slot of the node the last call to `next` has returned, unless it has been removed since
    current: Option<usize>,
}

impl<'a> TaskCursor for LinkedCursor<'a> {
    fn next(&mut self) -> Option<&Task> {
        self.current = self.next;
        let slot = self.current?;
        let node = self.list.node(slot);
        self.next = node.next;
        Some(&node.task)
    }

    fn remove(&mut self) -> Result<Task, TaskError> {
        let slot = self.current.take().ok_or(TaskError::NoCurrentElement)?;
        // `self.next` already points past the removed node, and its slot is not reused while this cursor lives
        self.list.unlink(slot).ok_or(TaskError::NoCurrentElement)
    }
}

impl<'a> Drop for LinkedCursor<'a> {
    fn drop(&mut self) {
        self.list.compact_if_sparse();
    }
}
