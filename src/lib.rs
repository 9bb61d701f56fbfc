//! # ircpipe
//!
//! An IRC client ingestion pipeline: every line received from the server is
//! recorded, tokenized, classified into a typed event and handed to exactly
//! one reaction.
//!
//! ## Features
//!
//! - Left-to-right line parser (tags, prefix, command, parameters)
//! - Semantic classification into a closed set of message kinds with named fields
//! - Registry-based dispatch with a fallback reaction
//! - Append-only history of raw lines
//! - Optional Tokio integration: line codec, connection, local relay and session driver

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing and classifying
//!
//! ```rust
//! use ircpipe::{classify, Kind, Message};
//!
//! let line = ":bar.example.com 001 amy :Welcome to the Internet Relay Network borja!borja@polaris.cs.uchicago.edu";
//! let event = classify(line.parse::<Message>().expect("valid IRC line"));
//!
//! assert_eq!(event.kind, Kind::Welcome);
//! assert_eq!(event.field("nick"), Some("borja"));
//! assert_eq!(event.field("host"), Some("polaris.cs.uchicago.edu"));
//! ```
//!
//! ### Running the pipeline
//!
//! ```rust
//! use ircpipe::{Capture, Pipeline};
//!
//! let mut pipeline = Pipeline::standard();
//! let mut out = Capture::new();
//! pipeline.ingest(":irc.example.com 433 * amy :Nickname is already in use.", &mut out);
//!
//! assert!(out.diagnostics_text().starts_with("Raw:\t"));
//! ```

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod message;
pub mod outbound;
pub mod pipeline;
pub mod prefix;
pub mod response;

pub use self::classify::{classify, Event, Fields, Kind};
pub use self::config::{Config, ConfigError};
pub use self::dispatch::{
    Capture, DiagnosticRecord, DispatchError, Output, Reaction, Registry, RegistryBuilder,
};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::history::{History, RawLine};
pub use self::message::Message;
pub use self::outbound::OutboundLine;
pub use self::pipeline::{Outcome, Pipeline};
pub use self::prefix::UserMask;
pub use self::response::Response;

#[cfg(feature = "tokio")]
pub mod relay;
#[cfg(feature = "tokio")]
pub mod session;
#[cfg(feature = "tokio")]
pub mod transport;
#[cfg(feature = "tokio")]
pub use self::session::{Session, SessionOutput};
#[cfg(feature = "tokio")]
pub use self::transport::{Connection, Frame, LineCodec, Outbound, MAX_IRC_LINE_LEN};
