//! Error types for the ingestion pipeline.
//!
//! This module defines transport-level errors, which end a session, and
//! message parsing failures, which only affect the offending line.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Transport and framing errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured character encoding label is not known.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The raw message string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing a single IRC line.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty after removing the terminator.
    #[error("empty message")]
    EmptyMessage,

    /// A `:` was found where the prefix starts, but no prefix followed it.
    #[error("empty prefix")]
    EmptyPrefix,

    /// The line ended before a command was found.
    #[error("missing command")]
    MissingCommand,

    /// The command token is neither letters nor a three digit numeric.
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    /// Line exceeded the maximum allowed length and was cut short.
    #[error("message too long: {actual} bytes (limit {limit})")]
    MessageTooLong {
        /// Length of the offending line.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// Parsing error with position information.
    #[error("parsing failed at position {position}: {context}")]
    ParseContext {
        /// Byte position where parsing failed.
        position: usize,
        /// Description of what was being parsed.
        context: &'static str,
    },
}
