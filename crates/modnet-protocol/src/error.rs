//! Error types for the protocol layer.
//!
//! Each crate in modnet defines its own error enum. A `ProtocolError`
//! always means the bytes themselves were wrong: too short, out of range,
//! or not decodable. It never means a lookup failed; that belongs to the
//! registry and dispatch layers.

/// Errors that can occur while reading or writing packet bytes.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a payload value through a [`Codec`](crate::Codec) failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserializing a payload value through a [`Codec`](crate::Codec) failed.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The packet ended before a field could be read.
    ///
    /// Framing is positional, so once this happens the rest of the packet
    /// cannot be trusted.
    #[error("packet truncated: wanted {wanted} bytes, {remaining} left")]
    Truncated { wanted: usize, remaining: usize },

    /// An id does not fit the width chosen for its header field.
    #[error("{field} {value} does not fit a one-byte field")]
    IdOutOfRange { field: &'static str, value: u16 },

    /// The relay bit and the presence of relay-addressing fields disagree.
    #[error("relay flag does not match relay fields")]
    RelayMismatch,

    /// A variable-length integer ran past five bytes.
    #[error("variable-length integer is too long")]
    VarIntOverflow,

    /// A length-prefixed string was not valid UTF-8.
    #[error("invalid utf-8 in string field: {0}")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    /// The packet is well formed but violates protocol rules.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
