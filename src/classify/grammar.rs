//! Small hand-written sub-grammars used during field extraction.

use thiserror::Error;

use crate::prefix::UserMask;

/// Failures of the sub-grammars, reported when a message is downgraded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GrammarError {
    /// Trailing text was expected to start with `:`.
    #[error("trailing parameter does not start with ':'")]
    MissingColon,

    /// The welcome text has no `<nick>` word after the message.
    #[error("welcome text has no nick after the message")]
    MissingNick,
}

/// Drop the `:` that marks a trailing parameter, if present.
pub(crate) fn strip_colon(param: &str) -> &str {
    param.strip_prefix(':').unwrap_or(param)
}

/// Join parameters into display text, dropping the trailing marker.
pub(crate) fn join_text(params: &[String]) -> String {
    params
        .iter()
        .map(|p| strip_colon(p))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pieces of an `RPL_WELCOME` text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Welcome<'a> {
    pub message: &'a str,
    pub nick: &'a str,
    pub user: Option<&'a str>,
    pub host: Option<&'a str>,
}

/// Parse `:<message> <nick>!<user>@<host>` or `:<message> <nick>`.
///
/// The message is everything up to the last space. The last word is read as
/// a full user mask when it is one, otherwise as a bare nick.
pub(crate) fn welcome(param: &str) -> Result<Welcome<'_>, GrammarError> {
    let body = param.strip_prefix(':').ok_or(GrammarError::MissingColon)?;
    let (message, last) = body.rsplit_once(' ').ok_or(GrammarError::MissingNick)?;
    if last.is_empty() {
        return Err(GrammarError::MissingNick);
    }

    Ok(match UserMask::parse(last) {
        Some(mask) => Welcome {
            message,
            nick: mask.nick,
            user: Some(mask.user),
            host: Some(mask.host),
        },
        None => Welcome {
            message,
            nick: last,
            user: None,
            host: None,
        },
    })
}
