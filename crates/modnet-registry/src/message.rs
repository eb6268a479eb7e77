//! The `NetMessage` trait: the extension point for module authors.
//!
//! A module declares each of its message types by implementing
//! [`NetMessage`] and listing it in its manifest through a [`MessageKind`].
//! modnet never inspects the payload; it only frames it and calls these
//! three hooks at the right time. Once a message id is resolved the
//! dispatcher holds the message as a `Box<dyn NetMessage>`.

use std::any::TypeId;
use std::fmt;

use modnet_protocol::{PacketReader, PacketWriter, ProtocolError, SenderInfo};

/// A typed message that modules exchange over the shared channel.
///
/// # Example
///
/// ```rust
/// use modnet_protocol::{PacketReader, PacketWriter, ProtocolError, SenderInfo};
/// use modnet_registry::NetMessage;
///
/// #[derive(Default)]
/// struct Ping {
///     nonce: u32,
/// }
///
/// impl NetMessage for Ping {
///     fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
///         writer.write_u32(self.nonce);
///         Ok(())
///     }
///
///     fn deserialize(
///         &mut self,
///         reader: &mut PacketReader<'_>,
///         _sender: &SenderInfo,
///     ) -> Result<(), ProtocolError> {
///         self.nonce = reader.read_u32()?;
///         Ok(())
///     }
///
///     fn receive(&self, _sender: &SenderInfo) -> bool {
///         true
///     }
/// }
/// ```
pub trait NetMessage {
    /// Writes the payload. The header has already been written.
    fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError>;

    /// Fills `self` from the payload. `self` starts as a default value.
    fn deserialize(
        &mut self,
        reader: &mut PacketReader<'_>,
        sender: &SenderInfo,
    ) -> Result<(), ProtocolError>;

    /// Reacts to an arrived message.
    ///
    /// Returns `true` if the message was handled. Returning `false` is
    /// logged as a warning but does not interrupt processing; it usually
    /// means the author forgot to report the message as handled.
    fn receive(&self, sender: &SenderInfo) -> bool;
}

/// Reads a message embedded in another message's payload.
///
/// The outer message writes the inner one with
/// [`NetMessage::serialize`]; this is the matching read.
pub fn read_nested<T: NetMessage + Default>(
    reader: &mut PacketReader<'_>,
    sender: &SenderInfo,
) -> Result<T, ProtocolError> {
    let mut message = T::default();
    message.deserialize(reader, sender)?;
    Ok(message)
}

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// A registrable message type: its identity, its sort name, and a way to
/// build a blank instance to deserialize into.
///
/// The name is what the registry sorts by, so it must be the same string
/// on every peer. [`MessageKind::of`] uses the fully-qualified Rust path;
/// [`MessageKind::named`] pins an explicit name that survives renames and
/// module moves.
#[derive(Clone, Copy)]
pub struct MessageKind {
    type_id: TypeId,
    name: &'static str,
    make: fn() -> Box<dyn NetMessage>,
}

impl MessageKind {
    /// The kind for `T`, named by its fully-qualified type path.
    pub fn of<T: NetMessage + Default + 'static>() -> Self {
        Self::named::<T>(std::any::type_name::<T>())
    }

    /// The kind for `T` with an explicit sort name.
    pub fn named<T: NetMessage + Default + 'static>(name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name,
            make: make_default::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a default instance to deserialize into.
    pub fn instantiate(&self) -> Box<dyn NetMessage> {
        (self.make)()
    }
}

impl fmt::Debug for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageKind")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn make_default<T: NetMessage + Default + 'static>() -> Box<dyn NetMessage> {
    Box::new(T::default())
}
