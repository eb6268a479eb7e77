//! The host platform: what modnet needs to know about the running session.
//!
//! modnet doesn't load modules or open connections itself. The game or
//! engine hosting the modules does, and answers these questions through
//! the [`Platform`] trait.

use std::collections::BTreeMap;

use modnet_protocol::{ModuleId, PeerId, Role};
use modnet_registry::{ModuleManifest, SyncPolicy};

/// How the host sees one loaded module right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub policy: SyncPolicy,
    /// Whether the module takes part in network traffic this session.
    ///
    /// On a server this is true for `Both` and `ServerOptional` modules. On
    /// a client it is true for `Both` modules, and for `ServerOptional`
    /// modules only if the server has them loaded as well.
    pub net_synced: bool,
}

/// Session facts supplied by the host.
pub trait Platform {
    /// The local process's role.
    fn role(&self) -> Role;

    /// The local process's peer index.
    fn local_peer(&self) -> PeerId;

    /// Number of modules the host knows about. Decides the width of the
    /// module id field, so it must match on every peer.
    fn module_count(&self) -> usize;

    /// Looks up a module by the id the host assigned it.
    fn module(&self, id: ModuleId) -> Option<ModuleInfo>;
}

/// A [`Platform`] backed by plain data.
///
/// Suitable for hosts that settle their module list at load time and for
/// wiring peers together in tests.
#[derive(Debug, Clone)]
pub struct StaticPlatform {
    role: Role,
    local_peer: PeerId,
    modules: BTreeMap<ModuleId, ModuleInfo>,
}

impl StaticPlatform {
    pub fn new(role: Role, local_peer: PeerId) -> Self {
        Self {
            role,
            local_peer,
            modules: BTreeMap::new(),
        }
    }

    /// Adds or replaces a module.
    pub fn with_module(mut self, info: ModuleInfo) -> Self {
        self.insert_module(info);
        self
    }

    /// Adds a module from its manifest, marking it net-synced.
    pub fn with_manifest(self, manifest: &ModuleManifest) -> Self {
        self.with_module(ModuleInfo {
            id: manifest.id,
            policy: manifest.policy,
            net_synced: true,
        })
    }

    pub fn insert_module(&mut self, info: ModuleInfo) {
        self.modules.insert(info.id, info);
    }

    pub fn remove_module(&mut self, id: ModuleId) -> Option<ModuleInfo> {
        self.modules.remove(&id)
    }

    /// Flips a module's sync state, e.g. after learning what the server has.
    pub fn set_synced(&mut self, id: ModuleId, synced: bool) {
        if let Some(info) = self.modules.get_mut(&id) {
            info.net_synced = synced;
        }
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

impl Platform for StaticPlatform {
    fn role(&self) -> Role {
        self.role
    }

    fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    fn module_count(&self) -> usize {
        self.modules.len()
    }

    fn module(&self, id: ModuleId) -> Option<ModuleInfo> {
        self.modules.get(&id).copied()
    }
}
