//! A single simulated process: identity, clock, scripted operations, and the two message queues.
//!
//! Each `Process` runs as its own async task (see `simulation::run`). Only the owning task ever
//! touches `clock` and `app_queue`; `buffers[self.id]`, the process's BSS buffer, is the one piece
//! of state peers write into directly (the broadcaster in `send` embeds exactly that write).

use std::sync::Arc;

use tracing::info;

use crate::buffer::{ApplicationQueue, BssBuffer};
use crate::error::SimError;
use crate::message::{Message, Operation};
use crate::simulation::SimConfig;
use crate::vector_clock::{causal_delivery_allowed, VectorClock};

pub struct Process {
    pub id: usize,
    clock: VectorClock,
    script: Vec<Operation>,
    app_queue: ApplicationQueue,
    /// Every process's BSS buffer, indexed by process id. Peers write via `buffers[peer_id]`;
    /// this process only ever reads/removes from `buffers[self.id]`.
    buffers: Arc<Vec<Arc<BssBuffer>>>,
    config: SimConfig,
    trace: Vec<String>,
}

impl Process {
    pub fn new(id: usize, n: usize, script: Vec<Operation>, buffers: Arc<Vec<Arc<BssBuffer>>>, config: SimConfig) -> Self {
        Self {
            id,
            clock: VectorClock::zero(n),
            script,
            app_queue: ApplicationQueue::new(),
            buffers,
            config,
            trace: Vec::new(),
        }
    }

    /// Executes the scripted operations in order, returning the accumulated trace lines, or the
    /// first `Livelock` a `recv_B` trips over.
    pub async fn run(mut self) -> Result<Vec<String>, SimError> {
        let script = std::mem::take(&mut self.script);
        for op in script {
            match op {
                Operation::Send { payload } => self.send(&payload).await,
                Operation::RecvB { from, payload } => {
                    self.recv_b(from, &payload).await?;
                    self.drain_app_queue().await;
                }
            }
        }
        Ok(self.trace)
    }

    /// Increments the own clock slot, logs the `send` event, then broadcasts to every peer's BSS
    /// buffer. By the time this returns, the message is already enqueued everywhere; there is no
    /// sender-side acknowledgment or retry.
    async fn send(&mut self, payload: &str) {
        self.clock.increment(self.id);
        let line = format!("p{} send {} {}", self.id + 1, payload, self.clock);
        info!(process = self.id + 1, payload, clock = %self.clock, "send");
        self.trace.push(line);

        let msg = Message::new(payload.to_string(), self.id, self.clock.clone());
        for (peer_id, buffer) in self.buffers.iter().enumerate() {
            if peer_id != self.id {
                buffer.insert(msg.clone()).await;
            }
        }
    }

    /// Blocks until a message from `from` matching `payload` appears in the local BSS buffer,
    /// logging the unchanged receiver clock (arrival is local bookkeeping, not causal progress).
    /// Trips the livelock guard after `config.poll_limit` empty polls.
    async fn recv_b(&mut self, from: usize, payload: &str) -> Result<(), SimError> {
        let own_buffer = &self.buffers[self.id];
        let mut polls: u32 = 0;
        loop {
            if let Some(msg) = own_buffer.take_matching(from, payload).await {
                let line = format!("p{} recv_B p{} {} {}", self.id + 1, from + 1, payload, self.clock);
                info!(process = self.id + 1, from = from + 1, payload, clock = %self.clock, "recv_B");
                self.trace.push(line);
                self.app_queue.insert(msg).await;
                return Ok(());
            }

            polls += 1;
            if polls > self.config.poll_limit {
                return Err(SimError::Livelock);
            }

            // Whichever fires first: a fresh insert to re-check immediately, or the backoff so we
            // still make progress if we raced the notify before this task started waiting.
            tokio::select! {
                _ = own_buffer.wait_for_insert() => {}
                _ = tokio::time::sleep(self.config.poll_backoff) => {}
            }
        }
    }

    /// Repeatedly promotes the smallest-clocked application-queue message while the causal
    /// predicate holds. By lex order, once the smallest is undeliverable none of the rest are,
    /// so the first failure ends the drain.
    async fn drain_app_queue(&mut self) {
        loop {
            let Some(candidate) = self.app_queue.peek_smallest().await else { break };
            if !causal_delivery_allowed(&self.clock, &candidate.sent_at, candidate.sender) {
                break;
            }

            let delivered = self.app_queue.pop_smallest().await.expect("peek found a candidate");
            self.clock.merge(&delivered.sent_at);
            let line = format!("p{} recv_A p{} {} {}", self.id + 1, delivered.sender + 1, delivered.payload, self.clock);
            info!(
                process = self.id + 1,
                from = delivered.sender + 1,
                payload = %delivered.payload,
                clock = %self.clock,
                "recv_A"
            );
            self.trace.push(line);
        }
    }
}

