//! WebSocket transport to a browser-hosted preview surface.
//!
//! # Architecture
//!
//! ```text
//! WsServer (acceptor thread)
//!     │  accept + handshake, record `Origin`
//!     ▼
//! WsTransport ──► channel.set_target(..)     host → surface: post()
//!     │
//!     └── reader thread ──► channel.receive(text, origin)   surface → host
//! ```
//!
//! The preview has one surface at a time: a new connection replaces the
//! channel's target.

mod server;

pub use server::WsServer;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::{Transport, target_matches};
use crate::debug;
use crate::error::TransportError;

/// Origin used for peers that did not send an `Origin` header.
pub const OPAQUE_ORIGIN: &str = "null";

/// Sending half of one surface connection. Clones share the socket.
#[derive(Clone)]
pub struct WsTransport {
    socket: Arc<Mutex<WebSocket<TcpStream>>>,
    peer_origin: Arc<str>,
}

impl WsTransport {
    pub(crate) fn new(socket: WebSocket<TcpStream>, peer_origin: &str) -> Self {
        Self {
            socket: Arc::new(Mutex::new(socket)),
            peer_origin: peer_origin.into(),
        }
    }

    /// Origin announced by the peer during the handshake.
    pub fn peer_origin(&self) -> &str {
        &self.peer_origin
    }

    /// Read one frame without blocking. `Ok(None)` when nothing is pending.
    pub(crate) fn poll_read(&self) -> Result<Option<Message>, tungstenite::Error> {
        let mut socket = self.socket.lock();
        // Pushes out frames a previous non-blocking send left queued.
        match socket.flush() {
            Ok(()) => {}
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(e),
        }
        match socket.read() {
            Ok(message) => Ok(Some(message)),
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub(crate) fn close(&self) {
        let mut socket = self.socket.lock();
        let _ = socket.close(None);
        let _ = socket.flush();
    }
}

impl Transport for WsTransport {
    fn post(&self, text: &str, target_origin: &str) -> Result<(), TransportError> {
        if !target_matches(target_origin, &self.peer_origin) {
            debug!("ws"; "peer {} is not {}, dropped outgoing message", self.peer_origin, target_origin);
            return Ok(());
        }
        match self.socket.lock().send(Message::Text(text.to_owned().into())) {
            Ok(()) => Ok(()),
            // Frame is queued; the reader loop flushes it.
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(()),
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Err(TransportError::Closed)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport")
            .field("peer_origin", &self.peer_origin)
            .finish_non_exhaustive()
    }
}
