//! The simulator's error hierarchy.
//!
//! Every failure mode is fatal and global (see the design note on validation being all-or-nothing
//! before any process is spawned), so there's no need for per-variant recovery, just a faithful
//! mapping from variant to the message/exit-code pair the CLI is contractually required to produce.

use std::path::PathBuf;

use thiserror::Error;

/// Why a script failed syntactic validation.
///
/// Each variant corresponds to one of the checks the original line-by-line scanner performed;
/// splitting them out lets callers (and tests) match on the specific failure instead of scraping a
/// formatted string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed 'send' instruction. Message must be alphanumeric: {line:?}")]
    MalformedSend { line: String },

    #[error("Malformed 'recv_B' instruction. Must have two arguments: {line:?}")]
    MalformedRecvB { line: String },

    #[error("'end process {label}' without matching 'begin process'")]
    UnmatchedEnd { label: String },

    #[error("Unmatched 'begin process' for process(es): {}", labels.join(" "))]
    UnmatchedBegin { labels: Vec<String> },

    #[error("Unrecognized instruction: {line:?}")]
    Unrecognized { line: String },
}

/// Top-level simulator error.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A `recv_B` polled past the configured limit without finding its expected message.
    #[error("Inconsistent Input Detected")]
    Livelock,
}

impl SimError {
    /// The process exit code for this failure. Every current variant is fatal with exit code 1;
    /// this method exists so callers never hard-code the constant.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Whether this error's message belongs on stdout rather than stderr.
    ///
    /// Only the livelock heuristic prints to stdout (the original source's `cout <<
    /// "Inconsistent Input Detected"`); IO and validation failures are stderr diagnostics.
    pub fn is_stdout_message(&self) -> bool {
        matches!(self, SimError::Livelock)
    }
}
