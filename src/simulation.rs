//! The simulator driver (C7): builds the per-process buffers, spawns one task per process, joins
//! them all, and collects the trace.
//!
//! Termination: each task finishes when its scripted operations run out. Global termination
//! requires every `recv_B` to eventually find its message, which holds iff the script is causally
//! consistent; an inconsistent script trips the livelock guard in some process's `recv_B` instead.

use std::sync::Arc;
use std::time::Duration;

use crate::buffer::BssBuffer;
use crate::error::SimError;
use crate::message::Operation;
use crate::process::Process;

/// Runtime knobs generalizing the hard-coded constants of the original simulator.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Number of empty `recv_B` polls tolerated before declaring a livelock. Defaults to `2*N`.
    pub poll_limit: u32,
    /// Back-off between `recv_B` polls.
    pub poll_backoff: Duration,
}

impl SimConfig {
    /// The spec's default: `poll_limit = 2*N`, `poll_backoff = 500ms`.
    pub fn for_process_count(n: usize) -> Self {
        Self {
            poll_limit: (2 * n) as u32,
            poll_backoff: Duration::from_millis(500),
        }
    }
}

/// Runs every process's script concurrently and returns each process's trace, in process-index
/// order, or the first `Livelock` any process's `recv_B` trips.
pub async fn run_simulation(operations: Vec<Vec<Operation>>, config: SimConfig) -> Result<Vec<Vec<String>>, SimError> {
    let n = operations.len();
    let buffers: Arc<Vec<Arc<BssBuffer>>> = Arc::new((0..n).map(|_| Arc::new(BssBuffer::new())).collect());

    let handles: Vec<_> = operations
        .into_iter()
        .enumerate()
        .map(|(id, script)| {
            let process = Process::new(id, n, script, buffers.clone(), config);
            tokio::spawn(process.run())
        })
        .collect();

    let mut traces = Vec::with_capacity(n);
    let mut first_error = None;
    for handle in handles {
        match handle.await.expect("process task panicked") {
            Ok(trace) => traces.push(trace),
            Err(err) => {
                first_error.get_or_insert(err);
                traces.push(Vec::new());
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(traces),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    async fn run(script: &str) -> Result<Vec<Vec<String>>, SimError> {
        let operations = parse_script(script).expect("valid script");
        let config = SimConfig::for_process_count(operations.len());
        run_simulation(operations, config).await
    }

    #[tokio::test]
    async fn two_process_ping() {
        let script = "\
begin process p1
send A
end process p1
begin process p2
recv_B p1 A
end process p2
";
        let traces = run(script).await.unwrap();
        assert_eq!(traces[0], vec!["p1 send A (1,0)"]);
        assert_eq!(traces[1], vec!["p2 recv_B p1 A (0,0)", "p2 recv_A p1 A (1,0)"]);
    }

    #[tokio::test]
    async fn causal_reorder_three_processes() {
        let script = "\
begin process p1
send X
end process p1
begin process p2
recv_B p1 X
send Y
end process p2
begin process p3
recv_B p2 Y
recv_B p1 X
end process p3
";
        let traces = run(script).await.unwrap();
        let p3 = &traces[2];
        let recv_a_y = p3.iter().position(|l| l.starts_with("p3 recv_A p2 Y")).unwrap();
        let recv_a_x = p3.iter().position(|l| l.starts_with("p3 recv_A p1 X")).unwrap();
        assert!(recv_a_x < recv_a_y, "recv_A of X must precede recv_A of Y despite script order");
        assert!(p3.last().unwrap().ends_with("(1,1,0)"));
    }

    #[tokio::test]
    async fn concurrent_sends_both_delivered() {
        let script = "\
begin process p1
send A
end process p1
begin process p2
send B
end process p2
begin process p3
recv_B p1 A
recv_B p2 B
end process p3
";
        let traces = run(script).await.unwrap();
        let p3 = &traces[2];
        assert!(p3.iter().any(|l| l.starts_with("p3 recv_A p1 A")));
        assert!(p3.iter().any(|l| l.starts_with("p3 recv_A p2 B")));
        assert!(p3.last().unwrap().ends_with("(1,1,0)"));
    }

    #[tokio::test]
    async fn livelock_when_expected_message_never_sent() {
        let script = "\
begin process p1
recv_B p2 Z
end process p1
begin process p2
end process p2
";
        let operations = parse_script(script).unwrap();
        let config = SimConfig {
            poll_limit: 3,
            poll_backoff: Duration::from_millis(1),
        };
        let result = run_simulation(operations, config).await;
        assert!(matches!(result, Err(SimError::Livelock)));
    }
}
