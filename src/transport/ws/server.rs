//! WebSocket acceptor for preview surfaces.
//!
//! Binds on localhost, retrying neighbouring ports when the requested one
//! is taken. Each accepted connection becomes the channel's target and gets
//! a reader thread feeding incoming frames into the channel.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::protocol::Message;

use super::{OPAQUE_ORIGIN, WsTransport};
use crate::channel::MessageChannel;
use crate::{debug, log};

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Sleep between polls of the listener and of idle sockets
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A peer that stays silent this long during the handshake is dropped.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Running acceptor. Stops accepting and closes its connections on
/// [`shutdown`](Self::shutdown) or drop.
pub struct WsServer {
    port: u16,
    shutdown: Arc<AtomicBool>,
    acceptor: Option<JoinHandle<()>>,
}

impl WsServer {
    /// Start accepting surfaces on `127.0.0.1:base_port` (or the next free
    /// port), delivering their messages to `channel`.
    pub fn start(base_port: u16, channel: Arc<MessageChannel>) -> Result<Self> {
        let (listener, port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);
        let acceptor = std::thread::spawn(move || accept_loop(&listener, &channel, &stop));

        debug!("ws"; "listening on 127.0.0.1:{}", port);
        Ok(Self {
            port,
            shutdown,
            acceptor: Some(acceptor),
        })
    }

    /// Port actually bound.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.acceptor.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WsServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn accept_loop(listener: &TcpListener, channel: &Arc<MessageChannel>, shutdown: &Arc<AtomicBool>) {
    while !shutdown.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, addr)) => {
                debug!("ws"; "surface connected: {}", addr);
                // Off the accept thread: one stalled peer must not block the next.
                let channel = Arc::clone(channel);
                let shutdown = Arc::clone(shutdown);
                std::thread::spawn(move || {
                    if let Some(transport) = handshake(stream) {
                        attach(transport, &channel, &shutdown);
                    }
                });
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                log!("ws"; "accept error: {}", e);
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

/// Complete the WebSocket handshake, recording the peer's `Origin`.
fn handshake(stream: TcpStream) -> Option<WsTransport> {
    // Blocking with a deadline during the handshake, non-blocking afterwards.
    let _ = stream.set_nonblocking(false);
    if let Err(e) = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT)) {
        log!("ws"; "cannot set handshake timeout: {}", e);
        return None;
    }

    let mut origin: Option<String> = None;
    let record_origin = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        origin = request
            .headers()
            .get("origin")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(response)
    };

    let socket = match tungstenite::accept_hdr(stream, record_origin) {
        Ok(socket) => socket,
        Err(e) => {
            log!("ws"; "handshake failed: {}", e);
            return None;
        }
    };
    let _ = socket.get_ref().set_read_timeout(None);
    let _ = socket.get_ref().set_nonblocking(true);

    let origin = origin.unwrap_or_else(|| OPAQUE_ORIGIN.to_string());
    Some(WsTransport::new(socket, &origin))
}

fn attach(transport: WsTransport, channel: &Arc<MessageChannel>, shutdown: &Arc<AtomicBool>) {
    debug!("ws"; "surface origin: {}", transport.peer_origin());
    channel.set_target(Some(Box::new(transport.clone())));

    let channel = Arc::clone(channel);
    let shutdown = Arc::clone(shutdown);
    std::thread::spawn(move || reader_loop(&transport, &channel, &shutdown));
}

/// Feed frames from one surface into the channel until it disconnects.
fn reader_loop(transport: &WsTransport, channel: &MessageChannel, shutdown: &AtomicBool) {
    loop {
        if shutdown.load(Ordering::SeqCst) || channel.is_closed() {
            transport.close();
            return;
        }
        match transport.poll_read() {
            Ok(Some(Message::Text(text))) => {
                channel.receive(text.as_str(), transport.peer_origin());
            }
            Ok(Some(Message::Close(_))) => {
                debug!("ws"; "surface {} closed the connection", transport.peer_origin());
                return;
            }
            Ok(Some(_)) => {}
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                debug!("ws"; "surface disconnected: {}", e);
                return;
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(("127.0.0.1", port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind preview socket after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
