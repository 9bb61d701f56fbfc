//! Local line relay.
//!
//! Accepts one local client at a time and forwards every non-empty line it
//! types to the server, unchanged apart from line framing.

use std::ops::ControlFlow;

use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, warn};

use crate::outbound::OutboundLine;
use crate::transport::{Outbound, MAX_IRC_LINE_LEN};

/// Run the relay on `listener` until `shutdown` changes or is dropped.
pub fn spawn(
    listener: TcpListener,
    outbound: Outbound,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(serve(listener, outbound, shutdown))
}

async fn serve(listener: TcpListener, outbound: Outbound, mut shutdown: watch::Receiver<bool>) {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "relay listening");
    }

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!(%peer, "relay client connected");
                    if forward(stream, &outbound, &mut shutdown).await.is_break() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "relay accept failed"),
            }
        }
    }
    debug!("relay stopped");
}

/// Forward one client's lines. `Break` stops the whole relay.
async fn forward(
    stream: TcpStream,
    outbound: &Outbound,
    shutdown: &mut watch::Receiver<bool>,
) -> ControlFlow<()> {
    let mut lines = FramedRead::new(stream, LinesCodec::new_with_max_length(MAX_IRC_LINE_LEN));
    loop {
        tokio::select! {
            _ = shutdown.changed() => return ControlFlow::Break(()),
            next = lines.next() => match next {
                Some(Ok(line)) if line.trim().is_empty() => {}
                Some(Ok(line)) => match OutboundLine::new(line) {
                    Ok(line) => {
                        if outbound.send(line).is_err() {
                            warn!("connection closed, stopping relay");
                            return ControlFlow::Break(());
                        }
                    }
                    Err(e) => warn!(error = %e, "relay line rejected"),
                },
                Some(Err(e)) => {
                    warn!(error = %e, "relay client read failed");
                    return ControlFlow::Continue(());
                }
                None => {
                    debug!("relay client disconnected");
                    return ControlFlow::Continue(());
                }
            }
        }
    }
}
