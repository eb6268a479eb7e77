//! Codec trait and implementations for structured payload values.
//!
//! Most messages write their fields one by one through [`PacketWriter`].
//! Some payloads are easier to describe as a serde type; a "codec" converts
//! such a value to bytes and back. The protocol doesn't care HOW the value
//! is serialized, only that it gets a byte blob it can length-prefix. This
//! is the strategy pattern: one trait, swappable implementations.
//!
//! Currently we provide [`JsonCodec`] (human-readable, easy to debug).

use serde::{Serialize, de::DeserializeOwned};

use crate::{PacketReader, PacketWriter, ProtocolError};

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → a codec can be stored next to the registry in a host
///   that moves its network state between threads between turns.
/// - `'static` → the codec owns everything it needs.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value
/// doesn't borrow from the packet buffer, which is gone once the receive
/// call returns.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

impl PacketWriter {
    /// Appends `value` encoded by `codec`, prefixed with its byte length.
    pub fn write_encoded<C: Codec, T: Serialize>(
        &mut self,
        codec: &C,
        value: &T,
    ) -> Result<(), ProtocolError> {
        let bytes = codec.encode(value)?;
        let len = u32::try_from(bytes.len()).map_err(|_| {
            ProtocolError::InvalidMessage(format!(
                "encoded value of {} bytes is too long",
                bytes.len()
            ))
        })?;
        self.write_var_u32(len);
        self.write_bytes(&bytes);
        Ok(())
    }
}

impl PacketReader<'_> {
    /// Reads a length-prefixed value written by [`PacketWriter::write_encoded`].
    pub fn read_encoded<C: Codec, T: DeserializeOwned>(
        &mut self,
        codec: &C,
    ) -> Result<T, ProtocolError> {
        let len = self.read_var_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        codec.decode(bytes)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON is larger than a hand-written field layout, but it is the quickest
/// way to ship a nested structure inside a message while a module is still
/// changing shape.
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use modnet_protocol::{ByteOrder, JsonCodec, PacketReader, PacketWriter};
///
/// let mut writer = PacketWriter::new(ByteOrder::Little);
/// writer.write_encoded(&JsonCodec, &vec![1u32, 2, 3]).unwrap();
///
/// let bytes = writer.into_bytes();
/// let mut reader = PacketReader::new(&bytes, ByteOrder::Little);
/// let decoded: Vec<u32> = reader.read_encoded(&JsonCodec).unwrap();
/// assert_eq!(decoded, vec![1, 2, 3]);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
