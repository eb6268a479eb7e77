//! Core protocol types for modnet's wire format.
//!
//! Every packet starts with the same small header:
//!
//! ```text
//! ┌───────────┬────────────┬───────┬──────────────────┬─────────────┐
//! │ module id │ message id │ flags │ relay addressing │ payload ... │
//! │  1 or 2   │   1 or 2   │   1   │   0, 1 or 2      │  variable   │
//! └───────────┴────────────┴───────┴──────────────────┴─────────────┘
//! ```
//!
//! The types in this module describe each of those fields. The actual
//! reading and writing lives in the `envelope` module.

use std::fmt;

use modnet_transport::{PeerId, Route};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of a loaded module, supplied by the host platform.
///
/// modnet never assigns these. The host guarantees that the same module
/// has the same id on every peer in the session.
///
/// This is a newtype over `u16` so a module id can't be passed where a
/// [`MessageId`] is expected, even though both are small integers on the
/// wire. `#[serde(transparent)]` keeps it a plain number in config files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ModuleId(pub u16);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mod-{}", self.0)
    }
}

/// Identifier of a registered message type.
///
/// Assigned by the registry, sequentially from 0, in a deterministic order
/// that every peer reproduces on its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(pub u16);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// What the local process is in the session.
///
/// The role decides which relay-addressing layout is read and written, and
/// whether anything may be sent at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Single process, no other peers. Nothing can be sent or received.
    Offline,
    /// Connected to a server.
    Client,
    /// Hosting clients.
    Server,
}

impl Role {
    /// Returns `true` if there is anyone to talk to.
    pub fn is_online(self) -> bool {
        !matches!(self, Self::Offline)
    }

    pub fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }

    pub fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "offline"),
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
        }
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// The flags byte of the header.
///
/// - bit 0 (`RELAY`): the server should pass this message on to other
///   clients. Relay-addressing fields follow the flags byte.
/// - bit 1 (`EXPECTED`): the owning module is required on both sides. A
///   client that lacks a module whose packet arrives *without* this bit
///   drops the packet quietly instead of failing.
///
/// Unknown bits are kept as-is so that decoding and re-encoding a header
/// never changes its flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    pub const RELAY: u8 = 1 << 0;
    pub const EXPECTED: u8 = 1 << 1;

    pub fn new(relay: bool, expected: bool) -> Self {
        let mut bits = 0;
        if relay {
            bits |= Self::RELAY;
        }
        if expected {
            bits |= Self::EXPECTED;
        }
        Self(bits)
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn relay(self) -> bool {
        self.0 & Self::RELAY != 0
    }

    pub fn expected(self) -> bool {
        self.0 & Self::EXPECTED != 0
    }

    /// Returns a copy with the relay bit set or cleared.
    pub fn with_relay(self, relay: bool) -> Self {
        if relay {
            Self(self.0 | Self::RELAY)
        } else {
            Self(self.0 & !Self::RELAY)
        }
    }
}

// ---------------------------------------------------------------------------
// Field widths
// ---------------------------------------------------------------------------

/// Byte order of multi-byte fields, fixed by the host for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// Width of an id field in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// One byte.
    Narrow,
    /// Two bytes.
    Wide,
}

impl Width {
    /// Number of ids that still fit a narrow field.
    pub const NARROW_LIMIT: usize = 256;

    /// Picks the width for a field whose ids range over `count` values.
    ///
    /// Both peers must compute this from the same count, which holds as
    /// long as they loaded the same modules and message types. Nothing on
    /// the wire checks it.
    pub fn for_count(count: usize) -> Self {
        if count < Self::NARROW_LIMIT {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::Narrow => 1,
            Self::Wide => 2,
        }
    }
}

/// The widths of both id fields for one session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireLayout {
    pub module_width: Width,
    pub message_width: Width,
}

impl WireLayout {
    /// Computes the layout from the host's module count and the registry's
    /// message count.
    pub fn new(module_count: usize, message_count: usize) -> Self {
        Self {
            module_width: Width::for_count(module_count),
            message_width: Width::for_count(message_count),
        }
    }
}

// ---------------------------------------------------------------------------
// Relay addressing
// ---------------------------------------------------------------------------

/// Relay-addressing fields that follow the flags byte when the relay bit
/// is set. Which variant is on the wire depends on who wrote the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayFields {
    /// Written by a client: who the server should pass the message on to.
    Forward {
        to: Option<PeerId>,
        except: Option<PeerId>,
    },
    /// Written by the server on the relay leg: who originally sent it.
    Origin(PeerId),
}

impl RelayFields {
    /// Relay request for the given route.
    pub fn forward(route: Route) -> Self {
        Self::Forward {
            to: route.to,
            except: route.except,
        }
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Forward { .. } => 2,
            Self::Origin(_) => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Everything in a packet before the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub module: ModuleId,
    pub message: MessageId,
    pub flags: Flags,
    /// Present exactly when `flags.relay()` is set.
    pub relay: Option<RelayFields>,
}

impl Header {
    /// A header with no relay addressing.
    pub fn new(module: ModuleId, message: MessageId, expected: bool) -> Self {
        Self {
            module,
            message,
            flags: Flags::new(false, expected),
            relay: None,
        }
    }

    /// Attaches relay fields and sets the relay bit.
    pub fn with_relay(mut self, relay: RelayFields) -> Self {
        self.flags = self.flags.with_relay(true);
        self.relay = Some(relay);
        self
    }

    /// Size of the encoded header under `layout`.
    pub fn encoded_len(&self, layout: &WireLayout) -> usize {
        layout.module_width.bytes()
            + layout.message_width.bytes()
            + 1
            + self.relay.as_ref().map_or(0, RelayFields::encoded_len)
    }
}

// ---------------------------------------------------------------------------
// SenderInfo
// ---------------------------------------------------------------------------

/// Who sent the packet being received, built fresh for every inbound
/// message and handed to the message's deserialize and receive hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderInfo {
    /// The module that owns the message type.
    pub module: ModuleId,
    /// The peer the message came from. On a client receiving a relayed
    /// message this is the original sender, not the server.
    pub peer: PeerId,
    /// Raw flags byte from the header.
    pub flags: Flags,
    /// Relay target requested by the sending client (server side only).
    pub to: Option<PeerId>,
    /// Relay exclusion requested by the sending client (server side only).
    pub except: Option<PeerId>,
}

impl SenderInfo {
    /// Returns `true` if the message travels through the server to other
    /// clients.
    pub fn forwarded(&self) -> bool {
        self.flags.relay()
    }

    /// The route the server relays along.
    pub fn relay_route(&self) -> Route {
        Route {
            to: self.to,
            except: self.except,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
