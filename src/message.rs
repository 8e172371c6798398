//! The wire-level unit of causal broadcast, and the scripted operations that produce/consume it.

use std::cmp::Ordering;

use crate::vector_clock::VectorClock;

/// An immutable broadcast message.
///
/// Constructed by the sender's `send` after it has incremented its own clock slot, then cloned
/// into every peer's BSS buffer. Never mutated once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Opaque alphanumeric token, preserved verbatim.
    pub payload: String,
    /// Index of the sending process, `0..N-1`.
    pub sender: usize,
    /// The sender's vector clock snapshot taken immediately after incrementing its own slot.
    pub sent_at: VectorClock,
}

impl Message {
    pub fn new(payload: String, sender: usize, sent_at: VectorClock) -> Self {
        Self { payload, sender, sent_at }
    }
}

/// Buffers order messages by `sent_at` (lexicographic); ties break on sender then payload so the
/// ordering is total and deterministic even for duplicate payloads from the same sender.
impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Message {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sent_at
            .cmp(&other.sent_at)
            .then_with(|| self.sender.cmp(&other.sender))
            .then_with(|| self.payload.cmp(&other.payload))
    }
}

/// A single scripted instruction for one process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Broadcast `payload` to every peer.
    Send { payload: String },
    /// Block until a message matching `(from, payload)` arrives in the local BSS buffer.
    RecvB { from: usize, payload: String },
}
