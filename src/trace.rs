//! Debug trace buffer.
//!
//! Every intermediate step of a URL rewrite is recorded as a `label: value`
//! line. The buffer is owned by the per-call context in
//! [`crate::pipeline::walk`], so two calls never share or accumulate lines.
//! Each line is mirrored as a `tracing` event at TRACE level.

use tracing::trace;

/// One `label: value` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub label: &'static str,
    pub value: String,
}

/// Append-only log of transformation steps.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `label: value` and hand `value` back to the caller.
    pub fn record(&mut self, label: &'static str, value: String) -> String {
        trace!(label, value = %value, "rewrite step");
        self.entries.push(TraceEntry {
            label,
            value: value.clone(),
        });
        value
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as text, one `label: value` line per entry, each ending in `\n`.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(entry.label);
            text.push_str(": ");
            text.push_str(&entry.value);
            text.push('\n');
        }
        text
    }
}
