//! Socket plumbing: line framing and the connection to the server.

mod codec;
mod connection;

pub use self::codec::{Frame, LineCodec};
pub use self::connection::{Connection, Outbound};

/// Longest line accepted from the server by default, terminator included.
pub const MAX_IRC_LINE_LEN: usize = 8191;
