//! One client session: connect, log in, run the pipeline until the link drops.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch::{DispatchError, Output};
use crate::error::{MessageParseError, ProtocolError};
use crate::outbound::OutboundLine;
use crate::pipeline::Pipeline;
use crate::relay;
use crate::transport::{Connection, Frame, Outbound};

/// How long queued lines get to reach the socket on shutdown.
const WRITER_GRACE: Duration = Duration::from_secs(2);

/// The [`Output`] a live session writes to.
pub struct SessionOutput {
    outbound: Outbound,
    console: Box<dyn Write + Send>,
    diagnostics: Box<dyn Write + Send>,
}

impl SessionOutput {
    pub fn new(
        outbound: Outbound,
        console: Box<dyn Write + Send>,
        diagnostics: Box<dyn Write + Send>,
    ) -> Self {
        SessionOutput {
            outbound,
            console,
            diagnostics,
        }
    }
}

impl Output for SessionOutput {
    fn send(&mut self, line: OutboundLine) -> Result<(), DispatchError> {
        self.outbound.send(line).map_err(|_| DispatchError::Closed)
    }

    fn console(&mut self) -> &mut dyn Write {
        &mut self.console
    }

    fn diagnostics(&mut self) -> &mut dyn Write {
        &mut self.diagnostics
    }
}

/// A configured client session.
#[derive(Debug)]
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session { config }
    }

    /// Run until the connection ends.
    ///
    /// Always returns an error: a session only stops when the transport
    /// does, and that is reported to the caller.
    pub async fn run(self) -> Result<()> {
        let server = &self.config.server;
        info!(host = %server.host, port = server.port, "connecting");
        let mut conn = Connection::connect(
            &server.host,
            server.port,
            &server.encoding,
            server.max_line_len,
        )
        .await
        .with_context(|| format!("failed to connect to {}:{}", server.host, server.port))?;

        let (stop, shutdown) = watch::channel(false);
        let relay = if self.config.relay.enabled {
            let listener = TcpListener::bind(self.config.relay.listen)
                .await
                .with_context(|| format!("failed to bind relay on {}", self.config.relay.listen))?;
            Some(relay::spawn(listener, conn.outbound(), shutdown))
        } else {
            None
        };

        let path = &self.config.log.diagnostics;
        let diagnostics = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open diagnostic log {}", path.display()))?;
        let mut out = SessionOutput::new(
            conn.outbound(),
            Box::new(io::stdout()),
            Box::new(diagnostics),
        );

        let outbound = conn.outbound();
        for line in self.config.identity.login_lines() {
            outbound.send(OutboundLine::new(line)?)?;
        }
        drop(outbound);
        info!(nick = %self.config.identity.nick, "login sent");

        let mut pipeline = Pipeline::standard();
        let err = drive(&mut conn, &mut pipeline, &mut out).await;
        info!(lines = pipeline.history().len(), error = %err, "session ended");

        let _ = stop.send(true);
        if let Some(relay) = relay {
            if let Err(e) = relay.await {
                warn!(error = %e, "relay task failed");
            }
        }
        drop(out);
        conn.close(WRITER_GRACE).await;

        Err(err).context("connection lost")
    }
}

/// Feed every line from `conn` through `pipeline` until the transport fails.
///
/// Bad lines, over-long ones included, are recorded and skipped.
pub async fn drive(
    conn: &mut Connection,
    pipeline: &mut Pipeline,
    out: &mut (dyn Output + Send),
) -> ProtocolError {
    loop {
        match conn.next_line().await {
            Ok(Frame::Line(line)) => {
                pipeline.ingest(&line, out);
            }
            Ok(Frame::Oversized {
                head,
                length,
                limit,
            }) => {
                let error = MessageParseError::MessageTooLong {
                    actual: length,
                    limit,
                };
                pipeline.reject(&head, error, out);
            }
            Err(e) => return e,
        }
    }
}
