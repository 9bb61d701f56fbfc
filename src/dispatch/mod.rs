//! Reaction registry and dispatch.
//!
//! A [`Registry`] maps each [`Kind`] to one [`Reaction`], with an optional
//! fallback for kinds nobody registered. It is assembled once through
//! [`RegistryBuilder`] and never changes afterwards. Reactions see the
//! classified [`Event`] and an [`Output`] handle; they hold no state of their
//! own between calls.

mod capture;
mod reactions;
mod record;

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use thiserror::Error;
use tracing::{debug, error, span, Level};

use crate::classify::{Event, Kind};
use crate::error::ProtocolError;
use crate::outbound::OutboundLine;

pub use self::capture::Capture;
pub use self::reactions::{Inspect, Pong, Record, Render};
pub use self::record::DiagnosticRecord;

/// Errors raised while running a reaction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// Writing to the console or the diagnostic sink failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The outbound queue is gone; the connection writer has stopped.
    #[error("outbound queue closed")]
    Closed,

    /// A reaction tried to build a line the wire would not accept.
    #[error("invalid outbound line: {0}")]
    InvalidLine(#[from] ProtocolError),

    /// No reaction is registered for this kind and there is no fallback.
    #[error("no reaction registered for {0}")]
    Unroutable(Kind),

    /// The event lacks a field the reaction depends on.
    #[error("{kind} event has no {field:?} field")]
    MissingField {
        kind: Kind,
        field: &'static str,
    },
}

/// Where reactions write.
///
/// The session implements this over the connection, stdout and the
/// diagnostic log file. Tests use [`Capture`].
pub trait Output {
    /// Queue one line for the server.
    fn send(&mut self, line: OutboundLine) -> Result<(), DispatchError>;

    /// Human-readable console output.
    fn console(&mut self) -> &mut dyn Write;

    /// The append-only diagnostic log.
    fn diagnostics(&mut self) -> &mut dyn Write;
}

/// Something to do with a classified event.
pub trait Reaction: Send + Sync {
    fn react(&self, event: &Event, out: &mut dyn Output) -> Result<(), DispatchError>;
}

impl<F> Reaction for F
where
    F: Fn(&Event, &mut dyn Output) -> Result<(), DispatchError> + Send + Sync,
{
    fn react(&self, event: &Event, out: &mut dyn Output) -> Result<(), DispatchError> {
        self(event, out)
    }
}

/// Immutable kind-to-reaction table.
pub struct Registry {
    reactions: HashMap<Kind, Box<dyn Reaction>>,
    fallback: Option<Box<dyn Reaction>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The reactions a terminal client runs.
    ///
    /// - Ping: [`Pong`]
    /// - Unclassified: [`Record`]
    /// - every other kind: [`Render`]
    /// - fallback: [`Inspect`]
    pub fn standard() -> Self {
        let mut builder = Registry::builder()
            .on(Kind::Ping, Pong)
            .on(Kind::Unclassified, Record)
            .fallback(Inspect);

        for kind in Kind::ALL {
            if !matches!(kind, Kind::Ping | Kind::Unclassified) {
                builder = builder.on(kind, Render);
            }
        }
        builder.build()
    }

    /// Whether `kind` reaches a reaction, its own or the fallback.
    pub fn handles(&self, kind: Kind) -> bool {
        self.reactions.contains_key(&kind) || self.fallback.is_some()
    }

    /// Run the reaction registered for the event's kind.
    ///
    /// Exactly one reaction runs per call. Kinds without an entry go to the
    /// fallback; with no fallback either, the event is [`DispatchError::Unroutable`].
    pub fn dispatch(&self, event: &Event, out: &mut dyn Output) -> Result<(), DispatchError> {
        let reaction = match self.reactions.get(&event.kind) {
            Some(reaction) => reaction,
            None => match &self.fallback {
                Some(fallback) => fallback,
                None => {
                    error!(kind = %event.kind, raw = %event.message.raw, "no reaction for event");
                    debug_assert!(false, "no reaction registered for {}", event.kind);
                    return Err(DispatchError::Unroutable(event.kind));
                }
            },
        };

        let _span = span!(
            Level::DEBUG,
            "irc.dispatch",
            kind = %event.kind,
            command = %event.message.command,
        )
        .entered();

        let result = reaction.react(event, out);
        if let Err(ref e) = result {
            debug!(error = %e, "reaction failed");
        }
        result
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.reactions.keys().collect();
        kinds.sort();
        f.debug_struct("Registry")
            .field("kinds", &kinds)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Assembles a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    reactions: HashMap<Kind, Box<dyn Reaction>>,
    fallback: Option<Box<dyn Reaction>>,
}

impl RegistryBuilder {
    /// Register `reaction` for `kind`, replacing any earlier one.
    pub fn on(mut self, kind: Kind, reaction: impl Reaction + 'static) -> Self {
        self.reactions.insert(kind, Box::new(reaction));
        self
    }

    /// Reaction for kinds with no entry of their own.
    pub fn fallback(mut self, reaction: impl Reaction + 'static) -> Self {
        self.fallback = Some(Box::new(reaction));
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            reactions: self.reactions,
            fallback: self.fallback,
        }
    }
}
