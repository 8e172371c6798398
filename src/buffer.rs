//! The two per-process message containers: the BSS buffer (arrival, pre-causal-check) and the
//! application queue (causal-delivery candidates).
//!
//! Both are unordered bags guarded by a mutex; a linear scan picks the minimum by `sent_at` when
//! one is needed. For the small process counts this simulator targets that's simpler than keeping
//! a balanced tree, and equivalent in behavior to the keyed-multiset the original source used.

use tokio::sync::{Mutex, Notify};

use crate::message::Message;

/// Messages that have arrived at a process but not yet been matched by a `recv_B`.
///
/// Peers write into a process's buffer (on `send`); only the owning process reads from it (via
/// `take_matching`). `insert` signals `notify` so a waiting `take_matching` retries promptly
/// instead of on a fixed poll interval.
pub struct BssBuffer {
    messages: Mutex<Vec<Message>>,
    notify: Notify,
}

impl BssBuffer {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            notify: Notify::new(),
        }
    }

    /// Inserts a message and wakes anyone blocked in `wait_for_insert`.
    pub async fn insert(&self, msg: Message) {
        self.messages.lock().await.push(msg);
        self.notify.notify_waiters();
    }

    /// Removes and returns the lex-smallest-clocked message matching `(sender, payload)`, or
    /// `None` if no such message is currently buffered.
    ///
    /// A consequence of picking the lex-smallest on ties: if two in-flight messages from the same
    /// sender carry identical payloads, this always resolves the earlier one first.
    pub async fn take_matching(&self, sender: usize, payload: &str) -> Option<Message> {
        let mut messages = self.messages.lock().await;
        let best_idx = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.sender == sender && m.payload == payload)
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(idx, _)| idx);
        best_idx.map(|idx| messages.remove(idx))
    }

    pub async fn size(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Suspends until the next `insert`. Used by `Process::recv_b` as the back-off between polls.
    pub async fn wait_for_insert(&self) {
        self.notify.notified().await;
    }
}

impl Default for BssBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Messages promoted out of a `BssBuffer` by `recv_B`, waiting on the causal-delivery predicate
/// before release to the application. Touched only by the owning process.
pub struct ApplicationQueue {
    messages: Mutex<Vec<Message>>,
}

impl ApplicationQueue {
    pub fn new() -> Self {
        Self { messages: Mutex::new(Vec::new()) }
    }

    pub async fn insert(&self, msg: Message) {
        self.messages.lock().await.push(msg);
    }

    /// Returns a clone of the lex-smallest-clocked message without removing it.
    pub async fn peek_smallest(&self) -> Option<Message> {
        self.messages.lock().await.iter().min().cloned()
    }

    /// Removes and returns the lex-smallest-clocked message.
    pub async fn pop_smallest(&self) -> Option<Message> {
        let mut messages = self.messages.lock().await;
        let best_idx = messages
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(idx, _)| idx);
        best_idx.map(|idx| messages.remove(idx))
    }
}

impl Default for ApplicationQueue {
    fn default() -> Self {
        Self::new()
    }
}
