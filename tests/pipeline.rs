//! End-to-end behavior of the ingestion pipeline against an in-memory output.

use std::sync::{Arc, Mutex};

use ircpipe::{
    classify, Capture, DispatchError, Event, History, Kind, Message, MessageParseError, Output,
    Outcome, Pipeline, Registry,
};

const WELCOME: &str = ":bar.example.com 001 amy :Welcome to the Internet Relay Network borja!borja@polaris.cs.uchicago.edu";
const NICK_IN_USE: &str = ":irc.example.com 433 * terminaltest :Nickname is already in use.";

/// A registry that records every event it sees, whatever the kind.
fn recording() -> (Registry, Arc<Mutex<Vec<Event>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let registry = Registry::builder()
        .fallback(move |event: &Event, _: &mut dyn Output| -> Result<(), DispatchError> {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        })
        .build();
    (registry, seen)
}

#[test]
fn test_welcome_fields() {
    let (registry, seen) = recording();
    let mut pipeline = Pipeline::new(registry);
    let mut out = Capture::new();

    assert_eq!(pipeline.ingest(WELCOME, &mut out), Outcome::Dispatched(Kind::Welcome));

    let seen = seen.lock().unwrap();
    let fields: Vec<(&str, &str)> = seen[0].fields.iter().collect();
    assert_eq!(
        fields,
        vec![
            ("client", "amy"),
            ("host", "polaris.cs.uchicago.edu"),
            ("message", "Welcome to the Internet Relay Network"),
            ("nick", "borja"),
            ("server", "bar.example.com"),
            ("user", "borja"),
        ]
    );
}

#[test]
fn test_graceful_degradation() {
    let mut pipeline = Pipeline::standard();
    let mut out = Capture::new();

    assert_eq!(
        pipeline.ingest(NICK_IN_USE, &mut out),
        Outcome::Dispatched(Kind::Unclassified)
    );
    let diagnostics = out.diagnostics_text();
    assert_eq!(diagnostics.matches("Raw:\t").count(), 1);
    assert!(diagnostics.contains(&format!("Raw:\t{}\n", NICK_IN_USE)));
    assert!(diagnostics.contains("Type:\tUnclassified\n"));
    assert!(out.console_text().is_empty());
    assert!(out.sent_lines().is_empty());
}

#[test]
fn test_ping_pong() {
    let mut pipeline = Pipeline::standard();
    let mut out = Capture::new();

    assert_eq!(
        pipeline.ingest("PING :irc.example.com", &mut out),
        Outcome::Dispatched(Kind::Ping)
    );
    assert_eq!(out.sent_lines(), vec!["PONG :irc.example.com\r\n"]);
    assert!(out.console_text().is_empty());
    assert!(out.diagnostics_text().is_empty());
}

#[test]
fn test_history_ordering() {
    let mut history = History::new();
    let l1 = history.append("L1").clone();
    history.append("L2");
    history.append("L3");

    assert_eq!(history.last().map(|l| l.text()), Some("L3"));
    let after: Vec<&str> = history.since(&l1).iter().map(|l| l.text()).collect();
    assert_eq!(after, vec!["L2", "L3"]);

    let mut elsewhere = History::new();
    elsewhere.append("L0");
    let unknown = elsewhere.append("L9").clone();
    let all: Vec<&str> = history.since(&unknown).iter().map(|l| l.text()).collect();
    assert_eq!(all, vec!["L1", "L2", "L3"]);
}

#[test]
fn test_malformed_input_containment() {
    let mut pipeline = Pipeline::standard();
    let mut out = Capture::new();

    let outcome = pipeline.ingest("#$%^&*", &mut out);
    assert!(matches!(
        outcome,
        Outcome::Malformed(MessageParseError::InvalidCommand(_))
    ));
    assert!(out.diagnostics_text().contains("Type:\tMalformed\n"));

    assert_eq!(
        pipeline.ingest("PING :irc.example.com", &mut out),
        Outcome::Dispatched(Kind::Ping)
    );
    assert_eq!(out.sent_lines(), vec!["PONG :irc.example.com\r\n"]);
    assert_eq!(pipeline.history().len(), 2);
    assert_eq!(pipeline.history().all()[0].text(), "#$%^&*");
}

#[test]
fn test_determinism() {
    for line in [WELCOME, NICK_IN_USE, "PING :x", ":dan!d@h PRIVMSG #rust :hi"] {
        let a = classify(Message::parse(line).unwrap());
        let b = classify(Message::parse(line).unwrap());
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.fields, b.fields);
    }
}

#[test]
fn test_registration_burst_renders() {
    let burst = [
        ":irc.example.com NOTICE * :*** Looking up your hostname...",
        WELCOME,
        ":irc.example.com 002 amy :Your host is irc.example.com, running version x-1.0",
        ":irc.example.com 003 amy :This server was created today",
        ":irc.example.com 004 amy irc.example.com x-1.0 iow ovb",
        ":irc.example.com 005 amy CHANTYPES=# :are supported by this server",
        ":irc.example.com 251 amy :There are 3 users and 0 invisible on 1 servers",
        ":irc.example.com 375 amy :- irc.example.com Message of the day -",
        ":irc.example.com 372 amy :- be nice",
        ":irc.example.com 376 amy :End of /MOTD command.",
        ":amy MODE amy :+i",
    ];

    let mut pipeline = Pipeline::standard();
    let mut out = Capture::new();
    for line in burst {
        let outcome = pipeline.ingest(line, &mut out);
        assert!(matches!(outcome, Outcome::Dispatched(kind) if kind != Kind::Unclassified), "{line}");
    }

    let console = out.console_text();
    assert_eq!(console.lines().count(), burst.len());
    assert!(console.starts_with("irc.example.com\t*** Looking up your hostname...\n"));
    assert!(console.ends_with("amy\t+i\n"));
    assert!(out.diagnostics_text().is_empty());
}
