//! One pass per received line: record, parse, classify, dispatch.

use tracing::{debug, warn};

use crate::classify::{classify, Kind};
use crate::dispatch::{DiagnosticRecord, Output, Registry};
use crate::error::MessageParseError;
use crate::history::{History, RawLine};
use crate::message::Message;

/// What happened to one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The line was classified and its reaction ran.
    Dispatched(Kind),
    /// The line did not parse. It is still in the history.
    Malformed(MessageParseError),
    /// The reaction for this kind returned an error.
    ReactionFailed(Kind),
}

/// The ingestion pipeline for one connection.
///
/// # Example
///
/// ```
/// use ircpipe::{Capture, Outcome, Pipeline, Kind};
///
/// let mut pipeline = Pipeline::standard();
/// let mut out = Capture::new();
///
/// assert_eq!(pipeline.ingest("PING :irc.example.com\r\n", &mut out), Outcome::Dispatched(Kind::Ping));
/// assert_eq!(out.sent_lines(), vec!["PONG :irc.example.com\r\n"]);
/// assert_eq!(pipeline.history().len(), 1);
/// ```
#[derive(Debug)]
pub struct Pipeline {
    history: History,
    registry: Registry,
}

impl Pipeline {
    pub fn new(registry: Registry) -> Self {
        Pipeline {
            history: History::new(),
            registry,
        }
    }

    /// A pipeline running [`Registry::standard`].
    pub fn standard() -> Self {
        Self::new(Registry::standard())
    }

    /// Every line seen so far, malformed ones included.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Process one received line.
    ///
    /// The line is appended to the history first and the rest of the pass
    /// works from that stored entry. A line that fails to parse is logged and
    /// written to the diagnostic sink; it never stops the pipeline.
    pub fn ingest(&mut self, line: &str, out: &mut dyn Output) -> Outcome {
        let raw = self.history.append(line.trim_end_matches(['\r', '\n']));

        let message = match Message::from_raw(raw) {
            Ok(message) => message,
            Err(error) => return malformed(raw, error, out),
        };

        let event = classify(message);
        debug!(seq = raw.seq(), kind = %event.kind, "dispatching");

        match self.registry.dispatch(&event, out) {
            Ok(()) => Outcome::Dispatched(event.kind),
            Err(error) => {
                warn!(kind = %event.kind, %error, "reaction failed");
                Outcome::ReactionFailed(event.kind)
            }
        }
    }

    /// Record a line the transport could only deliver in part.
    ///
    /// `line` is what survived (the head of an over-long line). It goes into
    /// the history and the diagnostic sink like any malformed line, and is
    /// never parsed.
    pub fn reject(
        &mut self,
        line: &str,
        error: MessageParseError,
        out: &mut dyn Output,
    ) -> Outcome {
        let raw = self.history.append(line.trim_end_matches(['\r', '\n']));
        malformed(raw, error, out)
    }
}

fn malformed(raw: &RawLine, error: MessageParseError, out: &mut dyn Output) -> Outcome {
    warn!(seq = raw.seq(), raw = %raw.text(), %error, "malformed line");
    let record = DiagnosticRecord::malformed(raw.text(), &error);
    if let Err(e) = write!(out.diagnostics(), "{}", record) {
        warn!(error = %e, "failed to write diagnostic record");
    }
    Outcome::Malformed(error)
}
