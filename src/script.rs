//! Script parsing and validation (external collaborator C8).
//!
//! Mechanical surface concern: turns the line-oriented script grammar into a `Vec<Operation>` per
//! process. Validation is all-or-nothing and happens before any process is constructed, so a
//! rejected script never leaves partial state behind.

use crate::error::ValidationError;
use crate::message::Operation;

/// Parses and validates `text`, returning one operation list per process (indexed `0..N-1`, where
/// `N` is the number of `begin process` blocks) or the first validation error encountered.
pub fn parse_script(text: &str) -> Result<Vec<Vec<Operation>>, ValidationError> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let process_count = lines.iter().filter(|l| l.starts_with("begin process")).count();
    let mut operations: Vec<Vec<Operation>> = vec![Vec::new(); process_count];
    let mut active: Option<(usize, String)> = None;
    let mut unmatched_begins: Vec<String> = Vec::new();

    for line in lines {
        if let Some(rest) = line.strip_prefix("begin process") {
            let label = rest.trim();
            if active.is_some() {
                return Err(ValidationError::Unrecognized { line: line.to_string() });
            }
            let idx = parse_process_label(label)
                .ok_or_else(|| ValidationError::Unrecognized { line: line.to_string() })?;
            active = Some((idx, label.to_string()));
            unmatched_begins.push(label.to_string());
        } else if let Some(rest) = line.strip_prefix("end process") {
            let label = rest.trim();
            match &active {
                Some((_, active_label)) if active_label == label => {
                    unmatched_begins.retain(|l| l != label);
                    active = None;
                }
                _ => return Err(ValidationError::UnmatchedEnd { label: label.to_string() }),
            }
        } else if let Some(rest) = line.strip_prefix("send") {
            let payload = rest.trim();
            if !is_alphanumeric_token(payload) {
                return Err(ValidationError::MalformedSend { line: line.to_string() });
            }
            if let Some((idx, _)) = active {
                operations[idx].push(Operation::Send { payload: payload.to_string() });
            }
        } else if let Some(rest) = line.strip_prefix("recv_B") {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            let [from_label, payload] = parts.as_slice() else {
                return Err(ValidationError::MalformedRecvB { line: line.to_string() });
            };
            let from = parse_process_label(from_label)
                .ok_or_else(|| ValidationError::MalformedRecvB { line: line.to_string() })?;
            if let Some((idx, _)) = active {
                operations[idx].push(Operation::RecvB { from, payload: payload.to_string() });
            }
        } else {
            return Err(ValidationError::Unrecognized { line: line.to_string() });
        }
    }

    if let Some((_, label)) = active {
        unmatched_begins.retain(|l| l != &label);
        unmatched_begins.push(label);
    }
    if !unmatched_begins.is_empty() {
        unmatched_begins.sort();
        return Err(ValidationError::UnmatchedBegin { labels: unmatched_begins });
    }

    Ok(operations)
}

/// Parses a 1-indexed process label (`"p1"`, `"p12"`, ...) into a 0-indexed process number.
fn parse_process_label(label: &str) -> Option<usize> {
    let digits = label.strip_prefix('p')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = digits.parse().ok()?;
    n.checked_sub(1)
}

/// Messages must match `[A-Za-z0-9_]+`.
fn is_alphanumeric_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
