//! Append-only store of received lines.
//!
//! Every line read from the connection is appended here before it is
//! parsed, so malformed input is kept for later inspection too. Entries are
//! never removed or modified.

use chrono::{DateTime, Utc};

/// A protocol line exactly as received, stamped on arrival.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLine {
    seq: u64,
    text: String,
    received_at: DateTime<Utc>,
}

impl RawLine {
    /// Position of this line in the buffer it was appended to.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The line text, without its terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the line was received.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

/// Ordered, append-only message history.
#[derive(Debug, Default)]
pub struct History {
    lines: Vec<RawLine>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line at the tail, stamped with the current time.
    pub fn append(&mut self, text: impl Into<String>) -> &RawLine {
        self.append_at(text, Utc::now())
    }

    /// Append a line with an explicit capture time.
    pub fn append_at(&mut self, text: impl Into<String>, received_at: DateTime<Utc>) -> &RawLine {
        let seq = self.lines.len() as u64;
        self.lines.push(RawLine {
            seq,
            text: text.into(),
            received_at,
        });
        &self.lines[self.lines.len() - 1]
    }

    /// Every line, oldest first.
    pub fn all(&self) -> &[RawLine] {
        &self.lines
    }

    /// The most recently appended line.
    pub fn last(&self) -> Option<&RawLine> {
        self.lines.last()
    }

    /// Lines appended after `marker`.
    ///
    /// A marker that is not in this buffer returns the whole buffer, so a
    /// caller that lost its place still sees everything instead of nothing.
    pub fn since(&self, marker: &RawLine) -> &[RawLine] {
        match self.lines.iter().rposition(|line| line == marker) {
            Some(pos) => &self.lines[pos + 1..],
            None => &self.lines,
        }
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
