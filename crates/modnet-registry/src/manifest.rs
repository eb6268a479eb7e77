//! Module manifests: what the host knows about a loaded module.

use modnet_protocol::ModuleId;
use serde::{Deserialize, Serialize};

use crate::{MessageKind, NetMessage};

/// Which sides of the session a module must be present on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// Required on the server and on every client. Only these modules take
    /// part in bulk registration.
    #[default]
    Both,
    /// May be missing on the other side. A client only talks for such a
    /// module if the server has it too; otherwise its sends are skipped.
    ServerOptional,
    /// Only ever loaded on clients.
    ClientOnly,
    /// Only ever loaded on the server.
    ServerOnly,
}

impl SyncPolicy {
    /// Returns `true` if every peer is expected to have the module. This is
    /// the value of the header's "expected" flag.
    pub fn is_required(self) -> bool {
        matches!(self, Self::Both)
    }
}

/// A loaded module and the message types it declares.
///
/// The host builds one manifest per module. The order of `messages` does
/// not matter: the registry sorts them by name before assigning ids.
#[derive(Debug, Clone)]
pub struct ModuleManifest {
    pub id: ModuleId,
    pub name: String,
    pub policy: SyncPolicy,
    pub messages: Vec<MessageKind>,
}

impl ModuleManifest {
    pub fn new(id: ModuleId, name: impl Into<String>, policy: SyncPolicy) -> Self {
        Self {
            id,
            name: name.into(),
            policy,
            messages: Vec::new(),
        }
    }

    /// Adds message type `T`, named by its type path.
    pub fn with<T: NetMessage + Default + 'static>(mut self) -> Self {
        self.messages.push(MessageKind::of::<T>());
        self
    }

    /// Adds an already-built kind.
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.messages.push(kind);
        self
    }
}
