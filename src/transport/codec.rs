//! Line codec for tokio.
//!
//! Reads LF-terminated lines in the configured character encoding and writes
//! [`OutboundLine`]s back in the same encoding. A line over the length limit
//! is skipped up to its LF and reported as a [`Frame::Oversized`] item, so
//! the stream carries on with the next line.

use std::borrow::Cow;

use bytes::BytesMut;
use encoding::Encoding;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};
use crate::outbound::OutboundLine;

/// One line read from the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// A complete line, terminator removed.
    Line(String),
    /// A line longer than the limit. Only its first `limit` bytes are kept.
    Oversized {
        head: String,
        /// Length of the whole line, terminator included.
        length: usize,
        limit: usize,
    },
}

/// Line-based codec with a length limit.
#[derive(Debug)]
pub struct LineCodec {
    encoding: &'static Encoding,
    /// Index of the next byte to check for a newline
    next_index: usize,
    max_len: usize,
    /// Head and length so far of a line being discarded.
    discarding: Option<(String, usize)>,
}

impl LineCodec {
    /// Create a codec for an encoding label such as `"utf-8"` or `"latin1"`.
    pub fn new(label: &str, max_len: usize) -> error::Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ProtocolError::UnknownEncoding(label.to_owned()))?;
        Ok(Self {
            encoding,
            next_index: 0,
            max_len,
            discarding: None,
        })
    }

    fn text(&self, bytes: &[u8]) -> String {
        let (text, _enc, _had_errors) = self.encoding.decode(bytes);
        text.trim_end_matches(['\r', '\n']).to_owned()
    }

    fn frame(&self, line: &[u8]) -> Frame {
        if line.len() > self.max_len {
            Frame::Oversized {
                head: self.text(&line[..self.max_len]),
                length: line.len(),
                limit: self.max_len,
            }
        } else {
            Frame::Line(self.text(line))
        }
    }
}

impl Decoder for LineCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Frame>> {
        let newline = src[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        match (self.discarding.take(), newline) {
            (Some((head, length)), Some(end)) => {
                let _ = src.split_to(end + 1);
                self.next_index = 0;
                Ok(Some(Frame::Oversized {
                    head,
                    length: length + end + 1,
                    limit: self.max_len,
                }))
            }
            (Some((head, length)), None) => {
                self.discarding = Some((head, length + src.len()));
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
            (None, Some(end)) => {
                let line = src.split_to(end + 1);
                self.next_index = 0;
                Ok(Some(self.frame(&line)))
            }
            (None, None) if src.len() > self.max_len => {
                // Keep the head for the report and drop the rest as it arrives.
                let head = self.text(&src[..self.max_len]);
                self.discarding = Some((head, src.len()));
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
            (None, None) => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Frame>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if let Some((head, length)) = self.discarding.take() {
            return Ok(Some(Frame::Oversized {
                head,
                length,
                limit: self.max_len,
            }));
        }
        if src.is_empty() {
            return Ok(None);
        }

        // Unterminated final line.
        let line = src.split_to(src.len());
        self.next_index = 0;
        Ok(Some(self.frame(&line)))
    }
}

impl Encoder<OutboundLine> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: OutboundLine, dst: &mut BytesMut) -> error::Result<()> {
        let (bytes, _enc, _had_errors) = self.encoding.encode(line.as_str());
        match bytes {
            Cow::Borrowed(b) => dst.extend_from_slice(b),
            Cow::Owned(v) => dst.extend_from_slice(&v),
        }
        Ok(())
    }
}
