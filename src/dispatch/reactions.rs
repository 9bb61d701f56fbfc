//! The standard reactions.

use crate::classify::{Event, Kind};
use crate::outbound::OutboundLine;

use super::record::DiagnosticRecord;
use super::{DispatchError, Output, Reaction};

fn require<'e>(event: &'e Event, field: &'static str) -> Result<&'e str, DispatchError> {
    event.field(field).ok_or(DispatchError::MissingField {
        kind: event.kind,
        field,
    })
}

/// Answers a server `PING` with `PONG :<server>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pong;

impl Reaction for Pong {
    fn react(&self, event: &Event, out: &mut dyn Output) -> Result<(), DispatchError> {
        let server = require(event, "server")?;
        out.send(OutboundLine::pong(server)?)
    }
}

/// Writes `<source>\t<text>` to the console.
///
/// The source is the sending nick when the prefix is a user, the channel for
/// topic replies, then the raw prefix, then `*`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Render;

impl Render {
    fn text_field(kind: Kind) -> &'static str {
        match kind {
            Kind::Welcome => "message",
            Kind::TopicReply => "topic",
            Kind::Mode => "modes",
            _ => "text",
        }
    }

    fn source(event: &Event) -> &str {
        if let Some(nick) = event.message.source_nickname() {
            return nick;
        }
        if event.kind == Kind::TopicReply {
            if let Some(channel) = event.field("channel") {
                return channel;
            }
        }
        event.message.prefix.as_deref().unwrap_or("*")
    }
}

impl Reaction for Render {
    fn react(&self, event: &Event, out: &mut dyn Output) -> Result<(), DispatchError> {
        let text = require(event, Self::text_field(event.kind))?;
        writeln!(out.console(), "{}\t{}", Self::source(event), text)?;
        Ok(())
    }
}

/// Appends a diagnostic record to the diagnostic log.
#[derive(Clone, Copy, Debug, Default)]
pub struct Record;

impl Reaction for Record {
    fn react(&self, event: &Event, out: &mut dyn Output) -> Result<(), DispatchError> {
        write!(out.diagnostics(), "{}", DiagnosticRecord::event(event))?;
        Ok(())
    }
}

/// Writes a diagnostic record to the console.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inspect;

impl Reaction for Inspect {
    fn react(&self, event: &Event, out: &mut dyn Output) -> Result<(), DispatchError> {
        write!(out.console(), "{}", DiagnosticRecord::event(event))?;
        Ok(())
    }
}
