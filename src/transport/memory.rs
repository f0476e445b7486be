//! In-process transport.
//!
//! [`MemoryTransport::pair`] returns two connected ports, one per side.
//! Each port knows its own origin; a received message is tagged with the
//! sender's origin so the receiving channel can apply its policy.
//!
//! ```text
//!   host port                          surface port
//!   transport().post(..) ──────────►   try_recv() / pump(&channel)
//!   try_recv() / pump(&channel) ◄───── transport().post(..)
//! ```

use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};

use super::{Transport, target_matches};
use crate::channel::MessageChannel;
use crate::debug;
use crate::error::TransportError;

/// One message in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub text: String,
    pub target_origin: String,
    /// Origin of the sending port.
    pub origin: String,
}

/// Sending handle for one side. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    origin: String,
    tx: Sender<Posted>,
}

impl MemoryTransport {
    /// Two connected ports with the given origins.
    pub fn pair(first_origin: &str, second_origin: &str) -> (MemoryPort, MemoryPort) {
        let (to_second, second_rx) = unbounded();
        let (to_first, first_rx) = unbounded();
        let first = MemoryPort {
            origin: first_origin.to_string(),
            tx: to_second,
            rx: first_rx,
        };
        let second = MemoryPort {
            origin: second_origin.to_string(),
            tx: to_first,
            rx: second_rx,
        };
        (first, second)
    }
}

impl Transport for MemoryTransport {
    fn post(&self, text: &str, target_origin: &str) -> Result<(), TransportError> {
        self.tx
            .send(Posted {
                text: text.to_string(),
                target_origin: target_origin.to_string(),
                origin: self.origin.clone(),
            })
            .map_err(|_| TransportError::Closed)
    }
}

/// One end of a [`MemoryTransport::pair`].
#[derive(Debug)]
pub struct MemoryPort {
    origin: String,
    tx: Sender<Posted>,
    rx: Receiver<Posted>,
}

impl MemoryPort {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Sending handle, for [`MessageChannel::set_target`].
    pub fn transport(&self) -> MemoryTransport {
        MemoryTransport {
            origin: self.origin.clone(),
            tx: self.tx.clone(),
        }
    }

    /// Next message addressed to this port, skipping mis-targeted ones.
    pub fn try_recv(&self) -> Option<Posted> {
        loop {
            match self.rx.try_recv() {
                Ok(posted) if self.accepts(&posted) => return Some(posted),
                Ok(_) => continue,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Like [`try_recv`](Self::try_recv), waiting up to `timeout` in total.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Posted> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(posted) if self.accepts(&posted) => return Some(posted),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Feed every pending message into `channel`. Returns how many were fed.
    pub fn pump(&self, channel: &MessageChannel) -> usize {
        let mut count = 0;
        while let Some(posted) = self.try_recv() {
            channel.receive(&posted.text, &posted.origin);
            count += 1;
        }
        count
    }

    fn accepts(&self, posted: &Posted) -> bool {
        let matches = target_matches(&posted.target_origin, &self.origin);
        if !matches {
            debug!("channel"; "{} dropped message targeted at {}", self.origin, posted.target_origin);
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Message, MessageKind, OriginPolicy};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HOST: &str = "https://admin.test";
    const SURFACE: &str = "https://shop.test";

    #[test]
    fn test_pair_is_bidirectional() {
        let (host, surface) = MemoryTransport::pair(HOST, SURFACE);
        host.transport().post("to surface", "*").unwrap();
        surface.transport().post("to host", HOST).unwrap();

        let got = surface.try_recv().unwrap();
        assert_eq!(got.text, "to surface");
        assert_eq!(got.origin, HOST);
        assert_eq!(host.try_recv().unwrap().text, "to host");
        assert!(host.try_recv().is_none());
    }

    #[test]
    fn test_mistargeted_message_is_dropped() {
        let (host, surface) = MemoryTransport::pair(HOST, SURFACE);
        let transport = host.transport();
        transport.post("wrong", "https://elsewhere.test").unwrap();
        transport.post("right", SURFACE).unwrap();

        assert_eq!(surface.try_recv().unwrap().text, "right");
        assert!(surface.try_recv().is_none());
    }

    #[test]
    fn test_post_after_peer_dropped() {
        let (host, surface) = MemoryTransport::pair(HOST, SURFACE);
        let transport = host.transport();
        drop(surface);
        assert!(matches!(transport.post("x", "*"), Err(TransportError::Closed)));
    }

    #[test]
    fn test_recv_timeout_when_idle() {
        let (_host, surface) = MemoryTransport::pair(HOST, SURFACE);
        assert!(surface.recv_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_pump_into_channel() {
        let (host, surface) = MemoryTransport::pair(HOST, SURFACE);
        let channel = MessageChannel::new(OriginPolicy::Exact(SURFACE.into()));
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        channel
            .on(MessageKind::PreviewReady, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .detach();

        let to_host = surface.transport();
        to_host.post(&Message::PreviewReady.to_json(), HOST).unwrap();
        to_host.post(&Message::PreviewReady.to_json(), "*").unwrap();

        assert_eq!(host.pump(&channel), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
