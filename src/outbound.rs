//! Lines queued for the server.
//!
//! Every write to the connection goes through [`OutboundLine`], which holds
//! exactly one protocol line terminated by exactly one CRLF. Writers submit
//! whole lines, so output from the relay and from reactions can interleave
//! without splitting a line.

use std::fmt;

use crate::error::{MessageParseError, ProtocolError};

/// Characters that may never appear on the wire inside a line.
pub(crate) fn is_illegal_control_char(ch: char) -> bool {
    ch == '\0'
}

/// One sanitized, CRLF-terminated outgoing line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundLine(String);

impl OutboundLine {
    /// Build an outgoing line.
    ///
    /// - Truncates at the first line ending, so one call is one line
    /// - Rejects NUL
    /// - Appends the single CRLF terminator
    pub fn new(line: impl Into<String>) -> Result<Self, ProtocolError> {
        let mut data = line.into();
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }

        let illegal = data.chars().find(|&ch| is_illegal_control_char(ch));
        if let Some(ch) = illegal {
            return Err(ProtocolError::InvalidMessage {
                string: data,
                cause: MessageParseError::IllegalControlChar(ch),
            });
        }

        if data.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage {
                string: data,
                cause: MessageParseError::EmptyMessage,
            });
        }

        data.push_str("\r\n");
        Ok(Self(data))
    }

    /// The reply to a server `PING`.
    pub fn pong(server: &str) -> Result<Self, ProtocolError> {
        Self::new(format!("PONG :{}", server))
    }

    /// The full line including its CRLF.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The line without its terminator.
    pub fn text(&self) -> &str {
        &self.0[..self.0.len() - 2]
    }
}

impl fmt::Display for OutboundLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
