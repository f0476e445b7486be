//! Transports carrying envelope JSON between host and preview surface.
//!
//! | Transport         | Peer                               | Origin source            |
//! |-------------------|------------------------------------|--------------------------|
//! | `MemoryTransport` | same process (tests, embedded UIs) | set on each port         |
//! | `WsTransport`     | browser page via WebSocket         | handshake `Origin` header |
//!
//! A transport only moves text. Decoding, origin checks on receipt and
//! dispatch belong to [`MessageChannel`](crate::channel::MessageChannel).

pub mod memory;
pub mod ws;

pub use memory::{MemoryPort, MemoryTransport, Posted};
pub use ws::{WsServer, WsTransport};

use crate::error::TransportError;

/// Outgoing half of a connection to the other side.
///
/// `target_origin` follows `postMessage` semantics: `"*"` delivers to any
/// peer, anything else only to a peer with exactly that origin. A message
/// whose target does not match is dropped, not an error.
pub trait Transport: Send {
    fn post(&self, text: &str, target_origin: &str) -> Result<(), TransportError>;
}

/// Whether a peer at `peer_origin` may see a message addressed to `target_origin`.
pub(crate) fn target_matches(target_origin: &str, peer_origin: &str) -> bool {
    target_origin == "*" || crate::channel::same_origin(target_origin, peer_origin)
}
