//! Wire protocol for modnet.
//!
//! This crate defines how one message looks on the shared channel:
//!
//! - **Types** ([`Header`], [`Flags`], [`ModuleId`], [`MessageId`],
//!   [`SenderInfo`], etc.): the fields every packet carries.
//! - **Cursors** ([`PacketWriter`], [`PacketReader`]): positional byte
//!   reading and writing for headers and payloads.
//! - **Envelope** ([`encode_header`], [`decode_header`]): the header
//!   layout, including the width rule and relay addressing.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): serde values inside a
//!   payload.
//! - **Errors** ([`ProtocolError`]): what can go wrong with the bytes.
//!
//! # Architecture
//!
//! The protocol layer sits between the host's byte channel and the
//! registry/dispatch layer. It doesn't know which message types exist,
//! only how their ids and flags are framed.
//!
//! ```text
//! Transport (bytes) → Protocol (Header + payload cursor) → Dispatch (typed message)
//! ```

mod buffer;
mod codec;
mod envelope;
mod error;
mod types;

pub use buffer::{PacketReader, PacketWriter};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use envelope::{HeaderPrefix, decode_header, decode_prefix, decode_relay, encode_header};
pub use error::ProtocolError;
pub use types::{
    ByteOrder, Flags, Header, MessageId, ModuleId, RelayFields, Role, SenderInfo, Width,
    WireLayout,
};

pub use modnet_transport::{PeerId, Route};
