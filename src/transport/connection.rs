//! TCP connection with a framed reader and a queued writer.

use std::io;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, trace, warn};

use crate::error::{self, ProtocolError};
use crate::outbound::OutboundLine;

use super::codec::{Frame, LineCodec};

/// Handle for queueing lines to the server.
///
/// Cloneable; every clone feeds the same writer task, which writes each
/// queued line in one piece.
#[derive(Clone, Debug)]
pub struct Outbound(mpsc::UnboundedSender<OutboundLine>);

impl Outbound {
    /// A queue not tied to any socket, with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundLine>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Outbound(tx), rx)
    }

    pub fn send(&self, line: OutboundLine) -> error::Result<()> {
        self.0
            .send(line)
            .map_err(|_| ProtocolError::ConnectionClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// An established connection to the IRC server.
pub struct Connection {
    reader: FramedRead<OwnedReadHalf, LineCodec>,
    outbound: Outbound,
    writer: JoinHandle<error::Result<()>>,
    writer_done: bool,
}

impl Connection {
    /// Connect to `host:port`.
    pub async fn connect(
        host: &str,
        port: u16,
        encoding: &str,
        max_len: usize,
    ) -> error::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        debug!(host, port, "connected");
        Self::from_stream(stream, encoding, max_len)
    }

    /// Wrap an already connected stream.
    pub fn from_stream(stream: TcpStream, encoding: &str, max_len: usize) -> error::Result<Self> {
        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        let read_codec = LineCodec::new(encoding, max_len)?;
        let write_codec = LineCodec::new(encoding, max_len)?;
        let (read_half, write_half) = stream.into_split();

        let (outbound, rx) = Outbound::channel();
        let writer = tokio::spawn(write_loop(FramedWrite::new(write_half, write_codec), rx));

        Ok(Connection {
            reader: FramedRead::new(read_half, read_codec),
            outbound,
            writer,
            writer_done: false,
        })
    }

    pub fn outbound(&self) -> Outbound {
        self.outbound.clone()
    }

    /// Wait for the next line from the server.
    ///
    /// Over-long lines arrive as [`Frame::Oversized`] and do not end the
    /// stream. End of stream is [`ProtocolError::ConnectionClosed`]. A failed
    /// writer also ends the connection, with the writer's error.
    pub async fn next_line(&mut self) -> error::Result<Frame> {
        tokio::select! {
            item = self.reader.next() => match item {
                Some(line) => line,
                None => Err(ProtocolError::ConnectionClosed),
            },
            joined = &mut self.writer, if !self.writer_done => {
                self.writer_done = true;
                match joined {
                    Ok(Ok(())) => Err(ProtocolError::ConnectionClosed),
                    Ok(Err(e)) => Err(e),
                    Err(e) => Err(ProtocolError::Io(io::Error::new(io::ErrorKind::Other, e))),
                }
            }
        }
    }

    /// Stop accepting lines and let the writer drain what is queued.
    ///
    /// Other [`Outbound`] clones keep the writer alive; after `grace` it is
    /// aborted regardless.
    pub async fn close(self, grace: Duration) {
        let Connection {
            outbound,
            mut writer,
            writer_done,
            ..
        } = self;
        drop(outbound);
        if writer_done {
            return;
        }

        match tokio::time::timeout(grace, &mut writer).await {
            Ok(Ok(Err(e))) => debug!(error = %e, "writer stopped with error"),
            Ok(_) => {}
            Err(_) => {
                warn!("outbound queue still open, aborting writer");
                writer.abort();
            }
        }
    }
}

async fn write_loop(
    mut sink: FramedWrite<OwnedWriteHalf, LineCodec>,
    mut rx: mpsc::UnboundedReceiver<OutboundLine>,
) -> error::Result<()> {
    while let Some(line) = rx.recv().await {
        trace!(line = %line, "send");
        sink.send(line).await?;
    }
    sink.close().await
}

fn enable_keepalive(stream: &TcpStream) -> io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}
