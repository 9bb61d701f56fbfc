//! Diagnostic records for lines the client could not make sense of.

use std::fmt;

use crate::classify::{Event, Fields};
use crate::error::MessageParseError;

/// A tab-separated, multi-line description of one received line.
///
/// ```text
/// Raw:	:irc.example.com 433 * amy :Nickname is already in use.
/// Type:	Unclassified
/// Prefix:	irc.example.com
/// Command:	433
/// Param 0:	*
/// Param 1:	amy
/// Param 2:	:Nickname is already in use.
///
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticRecord<'a> {
    raw: &'a str,
    body: Body<'a>,
}

#[derive(Clone, Copy, Debug)]
enum Body<'a> {
    Event(&'a Event),
    Malformed(&'a MessageParseError),
}

impl<'a> DiagnosticRecord<'a> {
    /// Describe a classified event.
    pub fn event(event: &'a Event) -> Self {
        DiagnosticRecord {
            raw: &event.message.raw,
            body: Body::Event(event),
        }
    }

    /// Describe a line that failed to parse.
    pub fn malformed(raw: &'a str, error: &'a MessageParseError) -> Self {
        DiagnosticRecord {
            raw,
            body: Body::Malformed(error),
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &Fields) -> fmt::Result {
    for (name, value) in fields.iter() {
        writeln!(f, "Field {}:\t{}", name, value)?;
    }
    Ok(())
}

impl fmt::Display for DiagnosticRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raw:\t{}", self.raw)?;
        match self.body {
            Body::Event(event) => {
                let message = &event.message;
                writeln!(f, "Type:\t{}", event.kind)?;
                if let Some(prefix) = &message.prefix {
                    writeln!(f, "Prefix:\t{}", prefix)?;
                }
                writeln!(f, "Command:\t{}", message.command)?;
                for (i, param) in message.params.iter().enumerate() {
                    writeln!(f, "Param {}:\t{}", i, param)?;
                }
                write_fields(f, &event.fields)?;
            }
            Body::Malformed(error) => {
                writeln!(f, "Type:\tMalformed")?;
                writeln!(f, "Error:\t{}", error)?;
            }
        }
        writeln!(f)
    }
}
