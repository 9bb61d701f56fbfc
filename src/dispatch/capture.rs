//! In-memory [`Output`].

use std::io::Write;

use crate::outbound::OutboundLine;

use super::{DispatchError, Output};

/// Records everything reactions write, for tests and offline replays.
#[derive(Clone, Debug, Default)]
pub struct Capture {
    sent: Vec<OutboundLine>,
    console: Vec<u8>,
    diagnostics: Vec<u8>,
    closed: bool,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capture whose outbound queue is already closed.
    pub fn closed() -> Self {
        Capture {
            closed: true,
            ..Self::default()
        }
    }

    /// Lines sent so far, CRLF included.
    pub fn sent_lines(&self) -> Vec<&str> {
        self.sent.iter().map(OutboundLine::as_str).collect()
    }

    pub fn console_text(&self) -> String {
        String::from_utf8_lossy(&self.console).into_owned()
    }

    pub fn diagnostics_text(&self) -> String {
        String::from_utf8_lossy(&self.diagnostics).into_owned()
    }
}

impl Output for Capture {
    fn send(&mut self, line: OutboundLine) -> Result<(), DispatchError> {
        if self.closed {
            return Err(DispatchError::Closed);
        }
        self.sent.push(line);
        Ok(())
    }

    fn console(&mut self) -> &mut dyn Write {
        &mut self.console
    }

    fn diagnostics(&mut self) -> &mut dyn Write {
        &mut self.diagnostics
    }
}
