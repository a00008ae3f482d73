//! Post-commit deferral queue.
//!
//! Semantics:
//! - Work deferred before a commit runs after that commit, in FIFO order.
//! - At most one task per key is pending. Deferring under a pending key is coalesced
//!   and the new task is dropped.
//! - Work deferred while due tasks are being run waits for the next commit.

use std::collections::VecDeque;
use std::fmt::Debug;

#[derive(Debug)]
pub struct RenderScheduler<K, T> {
    pending: VecDeque<(K, T)>,
    coalesced: usize,
}

impl<K, T> Default for RenderScheduler<K, T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            coalesced: 0,
        }
    }
}

impl<K: Copy + Eq + Debug, T> RenderScheduler<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run after the next render commit.
    ///
    /// Returns `false` when a task under `key` is already pending.
    pub fn defer(&mut self, key: K, task: T) -> bool {
        if self.is_pending(key) {
            self.coalesced += 1;
            log::trace!("deferred task {key:?} coalesced");
            return false;
        }
        self.pending.push_back((key, task));
        true
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == key)
    }

    pub fn cancel(&mut self, key: K) -> Option<T> {
        let index = self.pending.iter().position(|(pending, _)| *pending == key)?;
        self.pending.remove(index).map(|(_, task)| task)
    }

    /// Remove and return everything due after the commit that just happened.
    pub fn take_due(&mut self) -> Vec<(K, T)> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of deferrals that were dropped because their key was already pending.
    pub fn coalesced(&self) -> usize {
        self.coalesced
    }
}
