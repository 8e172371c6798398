//! Plain-text trace writer (mechanical surface concern).
//!
//! Renders each process's event lines into the block format the wire spec defines and writes the
//! result to disk. Has no opinion on protocol semantics (it only ever sees strings already
//! formatted by `Process`).

use std::io;
use std::path::Path;

/// Renders per-process trace blocks, in ascending process-index order:
/// ```text
/// begin process pN
/// <event line>
/// end process pN
///
/// ```
pub fn format_trace(traces: &[Vec<String>]) -> String {
    let mut out = String::new();
    for (idx, events) in traces.iter().enumerate() {
        out.push_str(&format!("begin process p{}\n", idx + 1));
        for line in events {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("end process p{}\n\n", idx + 1));
    }
    out
}

/// Writes the formatted trace to `path`.
pub fn write_trace(path: &Path, traces: &[Vec<String>]) -> io::Result<()> {
    std::fs::write(path, format_trace(traces))
}
