//! Nom-based IRC line tokenizer.
//!
//! The head of the line (tags, prefix, command) is matched with nom
//! combinators; parameters are then collected with a plain cursor so that a
//! `:`-led token is recognized wherever it starts.

use nom::{
    bytes::complete::{take_till, take_till1, take_while},
    character::complete::char,
    combinator::{cut, opt, verify},
    error::{context, VerboseError, VerboseErrorKind},
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::MessageParseError;
use crate::outbound::is_illegal_control_char;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

const TAGS_CONTEXT: &str = "parsing message tags";
const PREFIX_CONTEXT: &str = "parsing message prefix";
const COMMAND_CONTEXT: &str = "parsing command";

/// Returns true for one or more ASCII letters, or exactly three ASCII digits.
pub(crate) fn is_valid_command(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    if bytes.len() == 3 && bytes.iter().all(u8::is_ascii_digit) {
        return true;
    }
    bytes.iter().all(u8::is_ascii_alphabetic)
}

fn spaces(input: &str) -> ParseResult<&str, &str> {
    take_while(|c: char| c == ' ')(input)
}

/// Skip the IRCv3 tag segment (the part after `@` and before the first space).
fn parse_tags(input: &str) -> ParseResult<&str, &str> {
    context(TAGS_CONTEXT, preceded(char('@'), take_till(|c: char| c == ' ')))(input)
}

/// Parse message prefix (the part after `:` and before the first space).
///
/// Once the `:` is seen the prefix is mandatory, so an empty one is a hard
/// failure rather than a fallback to command parsing.
fn parse_prefix(input: &str) -> ParseResult<&str, &str> {
    context(
        PREFIX_CONTEXT,
        preceded(char(':'), cut(take_till1(|c: char| c == ' '))),
    )(input)
}

/// Parse the command token: a verb or a three digit numeric.
fn parse_command(input: &str) -> ParseResult<&str, &str> {
    context(
        COMMAND_CONTEXT,
        verify(take_till1(|c: char| c == ' '), |token: &str| is_valid_command(token)),
    )(input)
}

/// Collect parameters after the command.
///
/// Runs of spaces collapse. A token whose first character is `:` swallows
/// the rest of the line, spaces included, and keeps its colon.
fn collect_params(mut rest: &str) -> Vec<&str> {
    let mut params = Vec::new();
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }
        if rest.starts_with(':') {
            params.push(rest);
            break;
        }
        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }
    params
}

/// Parse a complete IRC line into its components.
///
/// IRC message format:
/// ```text
/// [@tags SP] [:prefix SP] <command> [params...] [:trailing]
/// ```
pub fn parse_message(input: &str) -> ParseResult<&str, ParsedMessage<'_>> {
    let (input, _) = spaces(input)?;
    let (input, tags) = opt(terminated(parse_tags, spaces))(input)?;
    let (input, prefix) = opt(terminated(parse_prefix, spaces))(input)?;
    let (input, command) = parse_command(input)?;
    let params = collect_params(input);

    Ok((
        "",
        ParsedMessage {
            tags,
            prefix,
            command,
            params,
        },
    ))
}

/// A tokenized IRC line with borrowed string slices.
///
/// This is the intermediate representation produced by the nom parser.
/// It holds references into the original input string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMessage<'a> {
    /// Raw tags string (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command name.
    pub command: &'a str,
    /// Command parameters; a trailing parameter keeps its leading `:`.
    pub params: Vec<&'a str>,
}

impl<'a> ParsedMessage<'a> {
    /// Parse an IRC line into a `ParsedMessage`.
    ///
    /// The line terminator, if any, is ignored.
    pub fn parse(input: &'a str) -> Result<Self, MessageParseError> {
        let line = input.trim_end_matches(['\r', '\n']);
        if line.trim_start_matches(' ').is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }
        if let Some(ch) = line.chars().find(|&ch| is_illegal_control_char(ch)) {
            return Err(MessageParseError::IllegalControlChar(ch));
        }

        match parse_message(line) {
            Ok((_remaining, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(describe(line, &e)),
            Err(nom::Err::Incomplete(_)) => Err(MessageParseError::ParseContext {
                position: line.len(),
                context: "incomplete input",
            }),
        }
    }
}

/// Turn the innermost nom error into a [`MessageParseError`].
fn describe(line: &str, err: &VerboseError<&str>) -> MessageParseError {
    let remaining = err.errors.first().map(|(rest, _)| *rest).unwrap_or(line);
    let position = line.len() - remaining.len();
    let ctx = err.errors.iter().find_map(|(_, kind)| match kind {
        VerboseErrorKind::Context(ctx) => Some(*ctx),
        _ => None,
    });

    match ctx {
        Some(PREFIX_CONTEXT) => MessageParseError::EmptyPrefix,
        Some(COMMAND_CONTEXT) if remaining.is_empty() => MessageParseError::MissingCommand,
        Some(COMMAND_CONTEXT) => {
            let token = remaining.split(' ').next().unwrap_or(remaining);
            MessageParseError::InvalidCommand(token.to_owned())
        }
        Some(ctx) => MessageParseError::ParseContext {
            position,
            context: ctx,
        },
        None => MessageParseError::ParseContext {
            position,
            context: "parsing message",
        },
    }
}
