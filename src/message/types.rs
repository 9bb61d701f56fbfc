use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{MessageParseError, ProtocolError};
use crate::history::RawLine;

use super::nom_parser::ParsedMessage;

/// A tokenized IRC line.
///
/// Produced by the syntactic parser; carries the raw text and the time the
/// line was received so later stages can report on it.
///
/// # Example
///
/// ```
/// use ircpipe::Message;
///
/// let msg = Message::parse(":nick!user@host PRIVMSG #channel :Hello there").unwrap();
/// assert_eq!(msg.prefix.as_deref(), Some("nick!user@host"));
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.params, vec!["#channel", ":Hello there"]);
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    /// Undecoded IRCv3 tag segment (without the leading `@`).
    pub tags: Option<String>,
    /// Message prefix/source (without the leading `:`).
    pub prefix: Option<String>,
    /// Verb or three digit numeric. Never empty.
    pub command: String,
    /// Parameters in order. A trailing parameter is last and keeps its `:`.
    pub params: Vec<String>,
    /// The line as received, without its terminator.
    pub raw: String,
    /// When the line was received.
    pub received_at: DateTime<Utc>,
}

impl Message {
    /// Parse a single IRC line, stamping it with the current time.
    pub fn parse(line: &str) -> Result<Message, MessageParseError> {
        Self::parse_at(line, Utc::now())
    }

    /// Parse a line taken from the history buffer, keeping its capture time.
    pub fn from_raw(line: &RawLine) -> Result<Message, MessageParseError> {
        Self::parse_at(line.text(), line.received_at())
    }

    fn parse_at(line: &str, received_at: DateTime<Utc>) -> Result<Message, MessageParseError> {
        let parsed = ParsedMessage::parse(line)?;
        Ok(Message {
            tags: parsed.tags.map(str::to_owned),
            prefix: parsed.prefix.map(str::to_owned),
            command: parsed.command.to_owned(),
            params: parsed.params.iter().map(|p| (*p).to_owned()).collect(),
            raw: line.trim_end_matches(['\r', '\n']).to_owned(),
            received_at,
        })
    }

    /// Serialize back to protocol form, terminated by exactly one CRLF.
    pub fn to_wire(&self) -> String {
        let mut out = self.to_string();
        out.push_str("\r\n");
        out
    }

    /// Get a parameter by index.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The trailing parameter, if the last parameter is one (colon included).
    pub fn trailing(&self) -> Option<&str> {
        self.params
            .last()
            .map(String::as_str)
            .filter(|p| p.starts_with(':'))
    }

    /// Get the nickname from the message prefix, if present.
    pub fn source_nickname(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        let end = prefix.find(['!', '@']).unwrap_or(prefix.len());
        let nick = &prefix[..end];
        if nick.is_empty() || (end == prefix.len() && nick.contains('.')) {
            None
        } else {
            Some(nick)
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tags) = &self.tags {
            write!(f, "@{} ", tags)?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        Message::parse(s).map_err(|cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_welcome_line() {
        let msg = Message::parse(
            ":bar.example.com 001 amy :Welcome to the Internet Relay Network borja!borja@polaris.cs.uchicago.edu",
        )
        .unwrap();
        assert_eq!(msg.prefix.as_deref(), Some("bar.example.com"));
        assert_eq!(msg.command, "001");
        assert_eq!(
            msg.params,
            vec![
                "amy",
                ":Welcome to the Internet Relay Network borja!borja@polaris.cs.uchicago.edu"
            ]
        );
    }

    #[test]
    fn test_raw_drops_terminator() {
        let msg = Message::parse("PING :irc.example.com\r\n").unwrap();
        assert_eq!(msg.raw, "PING :irc.example.com");
    }

    #[test]
    fn test_display_reserializes() {
        let line = "@a=b :nick!u@h PRIVMSG #c :hi there";
        let msg = Message::parse(line).unwrap();
        assert_eq!(msg.to_string(), line);
        assert_eq!(msg.to_wire(), format!("{line}\r\n"));
    }

    #[test]
    fn test_trailing_accessor() {
        let msg = Message::parse("NOTICE AUTH :*** Looking up your hostname").unwrap();
        assert_eq!(msg.trailing(), Some(":*** Looking up your hostname"));

        let msg = Message::parse("MODE amy +i").unwrap();
        assert_eq!(msg.trailing(), None);
        assert_eq!(msg.param(1), Some("+i"));
    }

    #[test]
    fn test_source_nickname() {
        let msg = Message::parse(":dan!d@localhost PRIVMSG #chan :hey").unwrap();
        assert_eq!(msg.source_nickname(), Some("dan"));

        let msg = Message::parse(":irc.example.com NOTICE * :hello").unwrap();
        assert_eq!(msg.source_nickname(), None);
    }

    #[test]
    fn test_from_str_wraps_error() {
        let err = "***".parse::<Message>().unwrap_err();
        match err {
            ProtocolError::InvalidMessage { string, cause } => {
                assert_eq!(string, "***");
                assert_eq!(cause, MessageParseError::InvalidCommand("***".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
