//! IRC message prefix (source) masks.
//!
//! A user prefix has the form `nick!user@host`. Server prefixes and partial
//! masks are left as plain text by the parser.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

/// Borrowed components of a `nick!user@host` mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserMask<'a> {
    /// Nickname.
    pub nick: &'a str,
    /// Username (ident).
    pub user: &'a str,
    /// Hostname, possibly empty.
    pub host: &'a str,
}

impl<'a> UserMask<'a> {
    /// Parse a strict `nick!user@host` mask.
    ///
    /// Nick and user must be non-empty; the host may be empty. Anything else,
    /// including a bare server name, yields `None`.
    pub fn parse(s: &'a str) -> Option<Self> {
        let (nick, rest) = s.split_once('!')?;
        let (user, host) = rest.split_once('@')?;
        if nick.is_empty() || user.is_empty() {
            return None;
        }
        Some(UserMask { nick, user, host })
    }
}
