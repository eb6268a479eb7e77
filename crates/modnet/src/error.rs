//! Unified error type for modnet.

use modnet_protocol::{MessageId, ModuleId, ProtocolError};
use modnet_registry::RegistryError;
use modnet_transport::TransportError;

use crate::DispatchStage;

/// Top-level error for sending and receiving.
///
/// Every variant aborts the current message only. Nothing here is retried:
/// framing is positional, so a packet that fails halfway cannot be resumed.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// There is no other peer in the session.
    #[error("cannot send or receive packets while offline")]
    Offline,

    /// The message type was never registered.
    #[error("message type {name} is not registered")]
    UnregisteredMessage { name: &'static str },

    /// The sending module doesn't take part in traffic under the current
    /// role.
    #[error("module {0} is not synced in this session")]
    ModuleNotSynced(ModuleId),

    /// The module id doesn't name the module that declared the message.
    #[error("message {message} belongs to module {owner}, not {claimed}")]
    ModuleMismatch {
        message: MessageId,
        owner: ModuleId,
        claimed: ModuleId,
    },

    /// An incoming packet names a module that is missing or not synced
    /// here.
    #[error("received packet for unknown or unsynced module {0}")]
    ModuleResolution(ModuleId),

    /// An incoming packet names a message id nobody registered.
    #[error("received packet with unknown message id {0}")]
    UnknownMessage(MessageId),

    /// An incoming packet's bytes could not be read.
    #[error("malformed packet while {stage}: {source}")]
    Malformed {
        stage: DispatchStage,
        #[source]
        source: ProtocolError,
    },

    /// Building an outgoing packet failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Module registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The host's channel refused the packet.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A config file could not be parsed.
    #[cfg(feature = "json")]
    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),
}
