//! Transport abstraction layer for modnet.
//!
//! The byte channel between a server and its clients is owned by the host
//! platform. This crate only describes the two things the rest of the
//! workspace needs from it:
//!
//! - **Addressing** ([`PeerId`], [`Route`]): which peers a packet goes to.
//! - **Sending** ([`Transport`]): hand a finished buffer to the channel.
//!
//! # Feature Flags
//!
//! - `memory` (default): [`MemoryTransport`], an in-process transport that
//!   records outgoing packets instead of writing them to a socket.

mod error;
#[cfg(feature = "memory")]
mod memory;

pub use error::TransportError;
#[cfg(feature = "memory")]
pub use memory::{MemoryTransport, Outgoing};

use std::fmt;

/// Index of one participant in the session (the server or a client).
///
/// Peer indices are a single byte on the wire. The value 255 doubles as the
/// "wildcard" selector (broadcast / no exclusion), so it cannot be used to
/// address a specific peer in a [`Route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u8);

impl PeerId {
    /// The byte reserved for "any peer" in relay selectors.
    pub const WILDCARD: u8 = 255;

    /// Converts a host-side peer index into a `PeerId`, clamping it into
    /// the single-byte range.
    pub fn clamped(index: i32) -> Self {
        Self(index.clamp(0, 255) as u8)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Where a packet should go.
///
/// `to: None` means every peer; `except: None` means nobody is skipped.
/// Hosts with a client/server split ignore the route on the client side,
/// since a client can only ever talk to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Route {
    /// Deliver only to this peer.
    pub to: Option<PeerId>,
    /// Deliver to everyone selected by `to` except this peer.
    pub except: Option<PeerId>,
}

impl Route {
    /// Every peer.
    pub fn all() -> Self {
        Self::default()
    }

    /// A single peer.
    pub fn to(peer: PeerId) -> Self {
        Self {
            to: Some(peer),
            except: None,
        }
    }

    /// Every peer except one.
    pub fn all_except(peer: PeerId) -> Self {
        Self {
            to: None,
            except: Some(peer),
        }
    }

    /// Returns `true` if a packet sent along this route reaches `peer`.
    pub fn includes(&self, peer: PeerId) -> bool {
        if self.except == Some(peer) {
            return false;
        }
        match self.to {
            Some(target) => target == peer,
            None => true,
        }
    }

    /// Encodes a selector as its wire byte (`255` for the wildcard).
    pub fn selector_byte(selector: Option<PeerId>) -> u8 {
        match selector {
            Some(peer) => peer.0,
            None => PeerId::WILDCARD,
        }
    }

    /// Decodes a selector from its wire byte.
    pub fn selector_from_byte(byte: u8) -> Option<PeerId> {
        if byte == PeerId::WILDCARD {
            None
        } else {
            Some(PeerId(byte))
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.to, self.except) {
            (None, None) => write!(f, "all"),
            (Some(to), None) => write!(f, "{to}"),
            (None, Some(except)) => write!(f, "all except {except}"),
            (Some(to), Some(except)) => write!(f, "{to} except {except}"),
        }
    }
}

/// The outbound half of the host's byte channel.
///
/// Delivery is assumed reliable and ordered per connection; the transport
/// does no retransmission on behalf of modnet.
pub trait Transport {
    /// Submits one finished packet for delivery along `route`.
    fn send(&mut self, packet: &[u8], route: Route) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, packet: &[u8], route: Route) -> Result<(), TransportError> {
        (**self).send(packet, route)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, packet: &[u8], route: Route) -> Result<(), TransportError> {
        (**self).send(packet, route)
    }
}
