//! Hub configuration.

use modnet_protocol::ByteOrder;
use serde::{Deserialize, Serialize};

/// Settings shared by every packet a hub sends or receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Byte order of two-byte ids and payload numbers. Must be identical
    /// on every peer.
    pub byte_order: ByteOrder,

    /// Log how many payload bytes each received message consumed and how
    /// many were left in the packet.
    pub byte_accounting: bool,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            byte_accounting: true,
        }
    }
}

#[cfg(feature = "json")]
impl NetConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::NetError> {
        serde_json::from_str(json).map_err(crate::NetError::Config)
    }
}
