//! Helper methods and trait implementations for IRC response codes.
//!
//! This module provides utility methods for the Response enum including:
//! - Code conversion (from_code, code)
//! - Grouping (is_luser, is_motd)
//! - Display/parsing traits

use super::Response;
use std::str::FromStr;

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        use Response::*;
        let resp = match code {
            1 => RPL_WELCOME,
            2 => RPL_YOURHOST,
            3 => RPL_CREATED,
            4 => RPL_MYINFO,
            5 => RPL_ISUPPORT,
            250 => RPL_STATSCONN,
            251 => RPL_LUSERCLIENT,
            252 => RPL_LUSEROP,
            253 => RPL_LUSERUNKNOWN,
            254 => RPL_LUSERCHANNELS,
            255 => RPL_LUSERME,
            265 => RPL_LOCALUSERS,
            266 => RPL_GLOBALUSERS,
            332 => RPL_TOPIC,
            372 => RPL_MOTD,
            375 => RPL_MOTDSTART,
            376 => RPL_ENDOFMOTD,
            _ => return None,
        };
        Some(resp)
    }

    /// Check if this is part of the message of the day
    #[inline]
    pub fn is_motd(&self) -> bool {
        matches!(
            self,
            Response::RPL_MOTD | Response::RPL_MOTDSTART | Response::RPL_ENDOFMOTD
        )
    }

    /// Check if this is a user/channel count reply sent after registration
    #[inline]
    pub fn is_luser(&self) -> bool {
        matches!(
            self,
            Response::RPL_STATSCONN
                | Response::RPL_LUSERCLIENT
                | Response::RPL_LUSEROP
                | Response::RPL_LUSERUNKNOWN
                | Response::RPL_LUSERCHANNELS
                | Response::RPL_LUSERME
                | Response::RPL_LOCALUSERS
                | Response::RPL_GLOBALUSERS
        )
    }
}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseResponseError::InvalidFormat);
        }
        let code: u16 = s.parse().map_err(|_| ParseResponseError::InvalidFormat)?;
        Response::from_code(code).ok_or(ParseResponseError::UnknownCode(code))
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error when parsing a response code
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseResponseError {
    /// The string was not a three digit number
    InvalidFormat,
    /// The numeric code is not a known response
    UnknownCode(u16),
}

impl std::fmt::Display for ParseResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid response code format"),
            Self::UnknownCode(code) => write!(f, "unknown response code: {}", code),
        }
    }
}

impl std::error::Error for ParseResponseError {}
