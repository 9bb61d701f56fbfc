//! IRC numeric reply codes seen by a client.
//!
//! Numeric replies are three-digit commands sent by servers. Only codes the
//! classifier routes to a kind are listed; any other numeric fails to parse
//! as a [`Response`] and classifies as unknown.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

mod helpers;

pub use self::helpers::ParseResponseError;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    // === Connection Registration (001-099) ===
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server info (name, version, user modes, channel modes)
    RPL_MYINFO = 4,
    /// 005 - Server supported features (ISUPPORT)
    RPL_ISUPPORT = 5,

    // === Luser replies (250-266) ===
    /// 250 - Highest connection count
    RPL_STATSCONN = 250,
    /// 251 - Luser client count
    RPL_LUSERCLIENT = 251,
    /// 252 - Luser operator count
    RPL_LUSEROP = 252,
    /// 253 - Luser unknown connections
    RPL_LUSERUNKNOWN = 253,
    /// 254 - Luser channel count
    RPL_LUSERCHANNELS = 254,
    /// 255 - Luser local info
    RPL_LUSERME = 255,
    /// 265 - Local user count
    RPL_LOCALUSERS = 265,
    /// 266 - Global user count
    RPL_GLOBALUSERS = 266,

    // === Channel replies ===
    /// 332 - Channel topic
    RPL_TOPIC = 332,

    // === MOTD ===
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,
}
