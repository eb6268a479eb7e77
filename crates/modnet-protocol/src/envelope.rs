//! Reading and writing the packet header.
//!
//! The header is positional: there are no tags or lengths, so both peers
//! must agree on the [`WireLayout`] (derived from their module and message
//! counts) and on who wrote the relay-addressing fields. Decoding is split
//! into two steps so the dispatcher can resolve the module and message
//! before it commits to reading relay fields:
//!
//! ```text
//! decode_prefix → (resolve module, resolve message) → decode_relay → payload
//! ```

use modnet_transport::{PeerId, Route};

use crate::{
    Flags, Header, MessageId, ModuleId, PacketReader, PacketWriter, ProtocolError,
    RelayFields, Role, Width, WireLayout,
};

/// The always-present part of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPrefix {
    pub module: ModuleId,
    pub message: MessageId,
    pub flags: Flags,
}

/// Writes `header` at the writer's current position.
///
/// # Errors
/// - [`ProtocolError::IdOutOfRange`] if an id does not fit the width the
///   layout picked for it.
/// - [`ProtocolError::RelayMismatch`] if the relay bit and the relay fields
///   disagree.
pub fn encode_header(
    header: &Header,
    layout: &WireLayout,
    writer: &mut PacketWriter,
) -> Result<(), ProtocolError> {
    if header.flags.relay() != header.relay.is_some() {
        return Err(ProtocolError::RelayMismatch);
    }

    write_id(writer, layout.module_width, header.module.0, "module id")?;
    write_id(writer, layout.message_width, header.message.0, "message id")?;
    writer.write_u8(header.flags.bits());

    match header.relay {
        Some(RelayFields::Forward { to, except }) => {
            writer.write_u8(Route::selector_byte(to));
            writer.write_u8(Route::selector_byte(except));
        }
        Some(RelayFields::Origin(peer)) => writer.write_u8(peer.0),
        None => {}
    }
    Ok(())
}

/// Reads module id, message id and flags.
pub fn decode_prefix(
    reader: &mut PacketReader<'_>,
    layout: &WireLayout,
) -> Result<HeaderPrefix, ProtocolError> {
    let module = ModuleId(read_id(reader, layout.module_width)?);
    let message = MessageId(read_id(reader, layout.message_width)?);
    let flags = Flags::from_bits(reader.read_u8()?);
    Ok(HeaderPrefix {
        module,
        message,
        flags,
    })
}

/// Reads the relay-addressing fields, if the flags say there are any.
///
/// The layout depends on the receiving side: a server reads the client's
/// forward request, a client reads the origin byte written by the server.
pub fn decode_relay(
    reader: &mut PacketReader<'_>,
    flags: Flags,
    receiver: Role,
) -> Result<Option<RelayFields>, ProtocolError> {
    if !flags.relay() {
        return Ok(None);
    }

    match receiver {
        Role::Server => {
            let to = Route::selector_from_byte(reader.read_u8()?);
            let except = Route::selector_from_byte(reader.read_u8()?);
            Ok(Some(RelayFields::Forward { to, except }))
        }
        Role::Client => Ok(Some(RelayFields::Origin(PeerId(reader.read_u8()?)))),
        Role::Offline => Err(ProtocolError::InvalidMessage(
            "relayed packet received while offline".into(),
        )),
    }
}

/// Reads a complete header, leaving the reader at the first payload byte.
pub fn decode_header(
    reader: &mut PacketReader<'_>,
    layout: &WireLayout,
    receiver: Role,
) -> Result<Header, ProtocolError> {
    let prefix = decode_prefix(reader, layout)?;
    let relay = decode_relay(reader, prefix.flags, receiver)?;
    Ok(Header {
        module: prefix.module,
        message: prefix.message,
        flags: prefix.flags,
        relay,
    })
}

fn write_id(
    writer: &mut PacketWriter,
    width: Width,
    value: u16,
    field: &'static str,
) -> Result<(), ProtocolError> {
    match width {
        Width::Narrow => {
            let byte =
                u8::try_from(value).map_err(|_| ProtocolError::IdOutOfRange { field, value })?;
            writer.write_u8(byte);
        }
        Width::Wide => writer.write_u16(value),
    }
    Ok(())
}

fn read_id(reader: &mut PacketReader<'_>, width: Width) -> Result<u16, ProtocolError> {
    match width {
        Width::Narrow => Ok(u16::from(reader.read_u8()?)),
        Width::Wide => reader.read_u16(),
    }
}
