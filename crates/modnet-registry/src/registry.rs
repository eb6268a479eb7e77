//! The message registry: assigns and looks up message ids.
//!
//! This is the piece every peer has to get exactly right on its own. Peers
//! never tell each other which id belongs to which type; each one walks the
//! same modules in the same order, sorts each module's message types by
//! name, and numbers them from 0. If two peers see the same modules and the
//! same types, they end up with the same table.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──→ register()/register_loaded() ──→ [traffic] ──→ clear()
//!                   ↑                                         │
//!                   └─────────────── next load ───────────────┘
//! ```
//!
//! Ids mean nothing outside the load session that produced them, so the
//! registry must be cleared when the module set is unloaded.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use modnet_protocol::{MessageId, ModuleId};

use crate::{MessageKind, ModuleManifest, NetMessage, RegistryError, SyncPolicy};

/// Largest number of message types a session can hold: ids are at most two
/// bytes on the wire.
pub const MAX_MESSAGES: usize = u16::MAX as usize + 1;

/// One registered message type.
#[derive(Debug, Clone, Copy)]
pub struct MessageDescriptor {
    module: ModuleId,
    id: MessageId,
    kind: MessageKind,
}

impl MessageDescriptor {
    /// The module that declared the type.
    pub fn module(&self) -> ModuleId {
        self.module
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn type_id(&self) -> TypeId {
        self.kind.type_id()
    }

    /// Builds a default instance to deserialize an incoming payload into.
    pub fn instantiate(&self) -> Box<dyn NetMessage> {
        self.kind.instantiate()
    }
}

/// Maps message types to ids and back for one load session.
///
/// Not thread-safe by itself: it is owned by whatever runs the host's
/// network turn and only touched from there.
#[derive(Debug, Default)]
pub struct MessageRegistry {
    /// Descriptors indexed by id. Ids are handed out contiguously from 0,
    /// so the length doubles as the next id to assign.
    descriptors: Vec<MessageDescriptor>,

    /// Type → id, kept in sync with `descriptors`.
    ids: HashMap<TypeId, MessageId>,

    /// Modules already processed, so registering twice is a no-op.
    modules: HashSet<ModuleId>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the message types of one module.
    ///
    /// The module's types are sorted by name (plain byte order, the same on
    /// every platform and locale) and given the next ids in that order.
    /// Returns how many ids were assigned; `0` if the module was already
    /// registered.
    ///
    /// # Errors
    /// - [`RegistryError::DuplicateName`] if two types in the module share a
    ///   name.
    /// - [`RegistryError::AlreadyRegistered`] if a type already has an id.
    /// - [`RegistryError::Exhausted`] if the ids would not fit two bytes.
    pub fn register(&mut self, module: &ModuleManifest) -> Result<usize, RegistryError> {
        if self.modules.contains(&module.id) {
            tracing::debug!(module = %module.id, name = %module.name, "module already registered");
            return Ok(0);
        }

        let mut kinds = module.messages.clone();
        kinds.sort_by(|a, b| a.name().cmp(b.name()));
        self.validate(module.id, &kinds)?;

        self.modules.insert(module.id);
        for kind in &kinds {
            let id = MessageId(self.descriptors.len() as u16);
            self.ids.insert(kind.type_id(), id);
            self.descriptors.push(MessageDescriptor {
                module: module.id,
                id,
                kind: *kind,
            });
            tracing::debug!(
                module = %module.id,
                message_id = %id,
                name = kind.name(),
                "registered message type"
            );
        }

        tracing::info!(
            module = %module.id,
            name = %module.name,
            count = kinds.len(),
            total = self.descriptors.len(),
            "registered module"
        );
        Ok(kinds.len())
    }

    /// Registers every module that must be present on all peers, in module
    /// name order.
    ///
    /// This is what each peer runs at load time. Modules with any other
    /// sync policy are skipped; they may be absent on some peers and would
    /// shift everyone else's ids.
    pub fn register_loaded(&mut self, modules: &[ModuleManifest]) -> Result<usize, RegistryError> {
        let mut synced: Vec<&ModuleManifest> = modules
            .iter()
            .filter(|m| m.policy == SyncPolicy::Both)
            .collect();
        synced.sort_by(|a, b| a.name.cmp(&b.name));

        let mut assigned = 0;
        for module in synced {
            assigned += self.register(module)?;
        }
        Ok(assigned)
    }

    /// Checks a sorted kind list before any id is handed out.
    fn validate(&self, module: ModuleId, kinds: &[MessageKind]) -> Result<(), RegistryError> {
        let capacity = MAX_MESSAGES - self.descriptors.len();
        if kinds.len() > capacity {
            return Err(RegistryError::Exhausted {
                requested: kinds.len(),
                capacity,
            });
        }

        let mut seen = HashSet::with_capacity(kinds.len());
        for (i, kind) in kinds.iter().enumerate() {
            if self.ids.contains_key(&kind.type_id()) || !seen.insert(kind.type_id()) {
                return Err(RegistryError::AlreadyRegistered { name: kind.name() });
            }
            if i > 0 && kinds[i - 1].name() == kind.name() {
                return Err(RegistryError::DuplicateName {
                    module,
                    name: kind.name(),
                });
            }
        }
        Ok(())
    }

    /// The id assigned to `T`, if any.
    pub fn id_of<T: 'static>(&self) -> Option<MessageId> {
        self.id_of_type(TypeId::of::<T>())
    }

    pub fn id_of_type(&self, type_id: TypeId) -> Option<MessageId> {
        self.ids.get(&type_id).copied()
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.ids.contains_key(&TypeId::of::<T>())
    }

    /// The descriptor for an incoming message id.
    pub fn descriptor(&self, id: MessageId) -> Option<&MessageDescriptor> {
        self.descriptors.get(usize::from(id.0))
    }

    pub fn is_module_registered(&self, module: ModuleId) -> bool {
        self.modules.contains(&module)
    }

    /// Total number of registered message types. Decides the width of the
    /// message id field.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageDescriptor> {
        self.descriptors.iter()
    }

    /// Forgets every module and type and restarts ids at 0.
    pub fn clear(&mut self) {
        let count = self.descriptors.len();
        self.descriptors.clear();
        self.ids.clear();
        self.modules.clear();
        tracing::info!(count, "message registry cleared");
    }
}
