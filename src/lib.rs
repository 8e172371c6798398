//! Library surface for the BSS causal-broadcast simulator.
//!
//! `vector_clock` and `buffer` are the algebra and containers the rest of the crate builds on;
//! `process` is where the protocol itself lives; `simulation` is the driver that wires processes
//! together and runs them concurrently; `script` and `trace` are the mechanical script-parsing and
//! trace-writing collaborators; `error` is the shared error hierarchy.

pub mod buffer;
pub mod error;
pub mod message;
pub mod process;
pub mod script;
pub mod simulation;
pub mod trace;
pub mod vector_clock;
