//! Semantic classification of parsed messages.
//!
//! [`classify`] turns a [`Message`] into an [`Event`]: a closed [`Kind`] plus
//! the named [`Fields`] that kind guarantees. Numerics are resolved through
//! [`Response`], verbs by exact match. A message whose shape does not fit the
//! rules for its command is downgraded to [`Kind::Unclassified`].
//!
//! # Example
//!
//! ```
//! use ircpipe::{classify, Kind, Message};
//!
//! let msg = Message::parse(":irc.example.com NOTICE * :*** Looking up your hostname").unwrap();
//! let event = classify(msg);
//! assert_eq!(event.kind, Kind::Notice);
//! assert_eq!(event.field("target"), Some("*"));
//! assert_eq!(event.field("text"), Some("*** Looking up your hostname"));
//! ```

mod grammar;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::message::Message;
use crate::prefix::UserMask;
use crate::response::Response;

pub use self::grammar::GrammarError;
use self::grammar::{join_text, strip_colon};

/// Semantic message kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// 001
    Welcome,
    /// 002 to 005
    ServerInfo,
    /// 250 to 255, 265, 266
    LuserStats,
    /// 372, 375, 376
    Motd,
    Notice,
    Ping,
    PrivateMessage,
    /// 332
    TopicReply,
    Mode,
    /// Anything without a rule, or whose shape did not match its rule.
    Unclassified,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 10] = [
        Kind::Welcome,
        Kind::ServerInfo,
        Kind::LuserStats,
        Kind::Motd,
        Kind::Notice,
        Kind::Ping,
        Kind::PrivateMessage,
        Kind::TopicReply,
        Kind::Mode,
        Kind::Unclassified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Welcome => "Welcome",
            Kind::ServerInfo => "ServerInfo",
            Kind::LuserStats => "LuserStats",
            Kind::Motd => "Motd",
            Kind::Notice => "Notice",
            Kind::Ping => "Ping",
            Kind::PrivateMessage => "PrivateMessage",
            Kind::TopicReply => "TopicReply",
            Kind::Mode => "Mode",
            Kind::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named fields extracted from a message, ordered by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<&'static str, String>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(name, value)| (*name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.insert(name, value.into());
    }
}

/// A classified message.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: Kind,
    pub fields: Fields,
    /// The message this event was built from, unchanged.
    pub message: Message,
}

impl Event {
    /// An event carrying no fields.
    pub fn unclassified(message: Message) -> Self {
        Event {
            kind: Kind::Unclassified,
            fields: Fields::new(),
            message,
        }
    }

    /// Shorthand for `self.fields.get(name)`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }
}

/// Why a message did not fit the rule for its command.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
enum Mismatch {
    #[error("expected {expected} parameters, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("expected at least {min} parameters, got {got}")]
    TooFew { min: usize, got: usize },

    #[error("no server to answer")]
    NoServer,

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

type Extractor = fn(&Message) -> Result<Fields, Mismatch>;

/// Classify a parsed message. Never fails.
pub fn classify(message: Message) -> Event {
    let Some((kind, extract)) = rule(&message.command) else {
        return Event::unclassified(message);
    };

    match extract(&message) {
        Ok(fields) => Event {
            kind,
            fields,
            message,
        },
        Err(reason) => {
            debug!(
                command = %message.command,
                %kind,
                %reason,
                "message shape mismatch, downgraded to unclassified"
            );
            Event::unclassified(message)
        }
    }
}

fn rule(command: &str) -> Option<(Kind, Extractor)> {
    if let Ok(response) = command.parse::<Response>() {
        return match response {
            Response::RPL_WELCOME => Some((Kind::Welcome, welcome as Extractor)),
            Response::RPL_YOURHOST
            | Response::RPL_CREATED
            | Response::RPL_MYINFO
            | Response::RPL_ISUPPORT => Some((Kind::ServerInfo, numeric_text as Extractor)),
            r if r.is_luser() => Some((Kind::LuserStats, numeric_text as Extractor)),
            r if r.is_motd() => Some((Kind::Motd, numeric_text as Extractor)),
            Response::RPL_TOPIC => Some((Kind::TopicReply, topic as Extractor)),
            _ => None,
        };
    }

    match command {
        "NOTICE" => Some((Kind::Notice, text_message as Extractor)),
        "PRIVMSG" => Some((Kind::PrivateMessage, text_message as Extractor)),
        "PING" => Some((Kind::Ping, ping as Extractor)),
        "MODE" => Some((Kind::Mode, mode as Extractor)),
        _ => None,
    }
}

fn exactly(message: &Message, expected: usize) -> Result<(), Mismatch> {
    let got = message.params.len();
    if got == expected {
        Ok(())
    } else {
        Err(Mismatch::Arity { expected, got })
    }
}

fn at_least(message: &Message, min: usize) -> Result<(), Mismatch> {
    let got = message.params.len();
    if got >= min {
        Ok(())
    } else {
        Err(Mismatch::TooFew { min, got })
    }
}

/// Fields every kind starts from: `server` when a prefix was sent.
fn base(message: &Message) -> Fields {
    let mut fields = Fields::new();
    if let Some(prefix) = &message.prefix {
        fields.insert("server", prefix.as_str());
    }
    fields
}

fn welcome(message: &Message) -> Result<Fields, Mismatch> {
    exactly(message, 2)?;
    let parsed = grammar::welcome(&message.params[1])?;

    let mut fields = base(message);
    fields.insert("client", message.params[0].as_str());
    fields.insert("message", parsed.message);
    fields.insert("nick", parsed.nick);
    if let Some(user) = parsed.user {
        fields.insert("user", user);
    }
    if let Some(host) = parsed.host {
        fields.insert("host", host);
    }
    Ok(fields)
}

fn numeric_text(message: &Message) -> Result<Fields, Mismatch> {
    at_least(message, 2)?;
    let mut fields = base(message);
    fields.insert("client", message.params[0].as_str());
    fields.insert("text", join_text(&message.params[1..]));
    Ok(fields)
}

fn text_message(message: &Message) -> Result<Fields, Mismatch> {
    exactly(message, 2)?;
    let mut fields = base(message);
    fields.insert("target", message.params[0].as_str());
    fields.insert("text", strip_colon(&message.params[1]));

    if let Some(mask) = message.prefix.as_deref().and_then(UserMask::parse) {
        fields.insert("nick", mask.nick);
        fields.insert("user", mask.user);
        fields.insert("host", mask.host);
    }
    Ok(fields)
}

fn ping(message: &Message) -> Result<Fields, Mismatch> {
    let server = message
        .params
        .first()
        .map(|p| strip_colon(p))
        .filter(|s| !s.is_empty())
        .or(message.prefix.as_deref())
        .ok_or(Mismatch::NoServer)?;

    let mut fields = Fields::new();
    fields.insert("server", server);
    Ok(fields)
}

fn topic(message: &Message) -> Result<Fields, Mismatch> {
    exactly(message, 3)?;
    let mut fields = base(message);
    fields.insert("client", message.params[0].as_str());
    fields.insert("channel", message.params[1].as_str());
    fields.insert("topic", strip_colon(&message.params[2]));
    Ok(fields)
}

fn mode(message: &Message) -> Result<Fields, Mismatch> {
    at_least(message, 2)?;
    let mut fields = base(message);
    fields.insert("target", message.params[0].as_str());
    fields.insert("modes", join_text(&message.params[1..]));
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(line: &str) -> Event {
        classify(Message::parse(line).unwrap())
    }

    fn names(event: &Event) -> Vec<&'static str> {
        event.fields.iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn test_welcome_long() {
        let e = event(
            ":bar.example.com 001 amy :Welcome to the Internet Relay Network borja!borja@polaris.cs.uchicago.edu",
        );
        assert_eq!(e.kind, Kind::Welcome);
        assert_eq!(e.field("server"), Some("bar.example.com"));
        assert_eq!(e.field("client"), Some("amy"));
        assert_eq!(e.field("message"), Some("Welcome to the Internet Relay Network"));
        assert_eq!(e.field("nick"), Some("borja"));
        assert_eq!(e.field("user"), Some("borja"));
        assert_eq!(e.field("host"), Some("polaris.cs.uchicago.edu"));
        assert_eq!(e.fields.len(), 6);
    }

    #[test]
    fn test_welcome_short() {
        let e = event(":irc.example.net 001 terminaltest :Welcome to ExampleNet terminaltest");
        assert_eq!(e.kind, Kind::Welcome);
        assert_eq!(e.field("nick"), Some("terminaltest"));
        assert_eq!(names(&e), vec!["client", "message", "nick", "server"]);
    }

    #[test]
    fn test_welcome_without_prefix_has_no_server() {
        let e = event("001 amy :Welcome amy");
        assert_eq!(e.kind, Kind::Welcome);
        assert!(!e.fields.contains("server"));
    }

    #[test]
    fn test_malformed_welcome_downgrades() {
        let e = event(":irc.example.net 001 amy Welcome");
        assert_eq!(e.kind, Kind::Unclassified);
        assert!(e.fields.is_empty());

        let e = event(":irc.example.net 001 amy :Welcome");
        assert_eq!(e.kind, Kind::Unclassified);

        let e = event(":irc.example.net 001 amy :Welcome to x extra-param y");
        assert_eq!(e.kind, Kind::Welcome);
        assert_eq!(e.field("nick"), Some("y"));
    }

    #[test]
    fn test_unknown_numeric_is_unclassified() {
        let line = ":irc.example.com 433 * terminaltest :Nickname is already in use.";
        let e = event(line);
        assert_eq!(e.kind, Kind::Unclassified);
        assert!(e.fields.is_empty());
        assert_eq!(e.message.raw, line);
        assert_eq!(e.message.params.len(), 3);
    }

    #[test]
    fn test_unknown_verb_is_unclassified() {
        let e = event(":dan!d@localhost JOIN #rust");
        assert_eq!(e.kind, Kind::Unclassified);
    }

    #[test]
    fn test_server_info_and_luser_text() {
        let e = event(":srv 005 amy CHANTYPES=# PREFIX=(ov)@+ :are supported by this server");
        assert_eq!(e.kind, Kind::ServerInfo);
        assert_eq!(e.field("client"), Some("amy"));
        assert_eq!(
            e.field("text"),
            Some("CHANTYPES=# PREFIX=(ov)@+ are supported by this server")
        );

        let e = event(":srv 251 amy :There are 3 users and 0 invisible on 1 servers");
        assert_eq!(e.kind, Kind::LuserStats);
        assert_eq!(e.field("text"), Some("There are 3 users and 0 invisible on 1 servers"));

        let e = event(":srv 266 amy 4 9 :Current global users 4, max 9");
        assert_eq!(e.kind, Kind::LuserStats);
    }

    #[test]
    fn test_numeric_text_needs_two_params() {
        let e = event(":srv 002 amy");
        assert_eq!(e.kind, Kind::Unclassified);
    }

    #[test]
    fn test_motd() {
        for code in ["372", "375", "376"] {
            let e = event(&format!(":srv {code} amy :- hello"));
            assert_eq!(e.kind, Kind::Motd, "code {code}");
            assert_eq!(e.field("text"), Some("- hello"));
        }
    }

    #[test]
    fn test_notice_from_server() {
        let e = event(":irc.example.com NOTICE * :*** Looking up your hostname...");
        assert_eq!(e.kind, Kind::Notice);
        assert_eq!(names(&e), vec!["server", "target", "text"]);
    }

    #[test]
    fn test_privmsg_from_user() {
        let e = event(":dan!d@localhost PRIVMSG #rust :hello there");
        assert_eq!(e.kind, Kind::PrivateMessage);
        assert_eq!(e.field("nick"), Some("dan"));
        assert_eq!(e.field("user"), Some("d"));
        assert_eq!(e.field("host"), Some("localhost"));
        assert_eq!(e.field("target"), Some("#rust"));
        assert_eq!(e.field("text"), Some("hello there"));
    }

    #[test]
    fn test_privmsg_arity() {
        assert_eq!(event("PRIVMSG #rust").kind, Kind::Unclassified);
        assert_eq!(event("PRIVMSG #a #b :hi").kind, Kind::Unclassified);
    }

    #[test]
    fn test_ping() {
        let e = event("PING :irc.example.com");
        assert_eq!(e.kind, Kind::Ping);
        assert_eq!(e.field("server"), Some("irc.example.com"));
        assert_eq!(e.fields.len(), 1);

        let e = event(":irc.example.com PING");
        assert_eq!(e.field("server"), Some("irc.example.com"));

        assert_eq!(event("PING").kind, Kind::Unclassified);
        assert_eq!(event("PING :").kind, Kind::Unclassified);
    }

    #[test]
    fn test_topic_reply() {
        let e = event(":srv 332 amy #rust :Rust programming | be nice");
        assert_eq!(e.kind, Kind::TopicReply);
        assert_eq!(e.field("channel"), Some("#rust"));
        assert_eq!(e.field("topic"), Some("Rust programming | be nice"));

        assert_eq!(event(":srv 332 amy #rust").kind, Kind::Unclassified);
    }

    #[test]
    fn test_mode() {
        let e = event(":amy MODE amy :+i");
        assert_eq!(e.kind, Kind::Mode);
        assert_eq!(e.field("target"), Some("amy"));
        assert_eq!(e.field("modes"), Some("+i"));

        let e = event(":srv MODE #rust +o dan");
        assert_eq!(e.field("modes"), Some("+o dan"));

        assert_eq!(event("MODE amy").kind, Kind::Unclassified);
    }

    #[test]
    fn test_commands_match_exactly() {
        assert_eq!(event("ping :x").kind, Kind::Unclassified);
    }

    #[test]
    fn test_kind_names() {
        for kind in Kind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert_eq!(Kind::PrivateMessage.to_string(), "PrivateMessage");
    }
}
