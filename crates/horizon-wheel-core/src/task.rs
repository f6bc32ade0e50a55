//! Deferred task queue for next-tick processing.
//!
//! Work that must wait until the current event has been fully handled (for
//! example re-centring a lane after its items were replaced) is posted here
//! and drained by the owner on its next frame.
//!
//! Tasks are plain values rather than closures: the owner decides how to
//! execute them, which lets a task borrow the owner mutably when it runs.

use std::collections::VecDeque;

/// A FIFO queue of deferred tasks.
#[derive(Debug)]
pub struct TaskQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> TaskQueue<T> {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Post a task to run on the next tick.
    pub fn post(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Post a task unless an equal one is already pending.
    ///
    /// Returns `true` if the task was queued.
    pub fn post_unique(&mut self, task: T) -> bool
    where
        T: PartialEq,
    {
        if self.tasks.contains(&task) {
            return false;
        }
        self.post(task);
        true
    }

    /// Cancel every pending task matching `predicate`.
    ///
    /// Returns the number of cancelled tasks.
    pub fn cancel_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.tasks.len();
        self.tasks.retain(|t| !predicate(t));
        let cancelled = before - self.tasks.len();
        if cancelled > 0 {
            crate::wheel_trace!(cancelled, "cancelled deferred tasks");
        }
        cancelled
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Remove and return all pending tasks in posting order.
    ///
    /// Tasks posted while the returned ones run belong to the next tick.
    pub fn take_all(&mut self) -> Vec<T> {
        self.tasks.drain(..).collect()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
