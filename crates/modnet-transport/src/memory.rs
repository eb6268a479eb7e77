//! In-process transport that records packets instead of sending them.

use crate::{Route, Transport, TransportError};

/// One packet handed to a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub bytes: Vec<u8>,
    pub route: Route,
}

/// A [`Transport`] that queues every packet in memory.
///
/// Useful for wiring several peers together inside one process: drain the
/// queue of one side and feed the bytes to the receive entry point of the
/// other.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    queue: Vec<Outgoing>,
    closed: bool,
    max_packet_size: Option<usize>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects packets larger than `limit` bytes.
    pub fn with_max_packet_size(limit: usize) -> Self {
        Self {
            max_packet_size: Some(limit),
            ..Self::default()
        }
    }

    /// Packets sent so far, oldest first.
    pub fn sent(&self) -> &[Outgoing] {
        &self.queue
    }

    /// Removes and returns every queued packet.
    pub fn drain(&mut self) -> Vec<Outgoing> {
        std::mem::take(&mut self.queue)
    }

    /// Makes every later send fail with [`TransportError::Closed`].
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, packet: &[u8], route: Route) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed("memory transport closed".into()));
        }
        if let Some(limit) = self.max_packet_size {
            if packet.len() > limit {
                return Err(TransportError::TooLarge {
                    size: packet.len(),
                    limit,
                });
            }
        }

        tracing::trace!(len = packet.len(), %route, "queued packet");
        self.queue.push(Outgoing {
            bytes: packet.to_vec(),
            route,
        });
        Ok(())
    }
}
