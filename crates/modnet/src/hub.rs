//! `PacketHub`: the per-process owner of the message table, and the send
//! path.
//!
//! A hub ties the layers together:
//!
//! ```text
//! host (Platform) → registry → protocol (header + payload) → transport
//! ```
//!
//! The host drives it from one thread: register or load modules, send
//! messages during the session, hand every inbound packet to
//! [`PacketHub::handle_packet`], and [`PacketHub::unload`] when the
//! session ends.

use std::any::type_name;

use modnet_protocol::{
    Header, MessageId, ModuleId, PacketWriter, PeerId, RelayFields, Route, WireLayout,
    encode_header,
};
use modnet_registry::{MessageRegistry, ModuleManifest, NetMessage, SyncPolicy};
use modnet_transport::Transport;

use crate::{NetConfig, NetError, Platform};

/// What a send call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The packet went to the transport.
    Sent,
    /// Nothing was sent because the server doesn't have the module. Only
    /// happens to clients sending for a `ServerOptional` module.
    Skipped,
}

/// Message registration, sending, and dispatch for one process.
pub struct PacketHub<P: Platform, T: Transport> {
    pub(crate) registry: MessageRegistry,
    pub(crate) platform: P,
    pub(crate) transport: T,
    pub(crate) config: NetConfig,
}

impl<P: Platform, T: Transport> PacketHub<P, T> {
    /// Creates a hub with default settings and an empty message table.
    pub fn new(platform: P, transport: T) -> Self {
        Self::with_config(platform, transport, NetConfig::default())
    }

    pub fn with_config(platform: P, transport: T, config: NetConfig) -> Self {
        Self {
            registry: MessageRegistry::new(),
            platform,
            transport,
            config,
        }
    }

    // ---- Lifecycle ----

    /// Registers one module's message types. A module registered twice is
    /// left as it was.
    ///
    /// Every peer must register the same modules in the same order.
    pub fn register_module(&mut self, module: &ModuleManifest) -> Result<usize, NetError> {
        Ok(self.registry.register(module)?)
    }

    /// Registers every loaded module that syncs on both sides, in module
    /// name order. Returns how many message types were added.
    pub fn load(&mut self, modules: &[ModuleManifest]) -> Result<usize, NetError> {
        let added = self.registry.register_loaded(modules)?;
        tracing::info!(
            modules = modules.len(),
            messages = self.registry.len(),
            layout = ?self.layout(),
            "message table loaded"
        );
        Ok(added)
    }

    /// Forgets every registered message type.
    pub fn unload(&mut self) {
        self.registry.clear();
        tracing::info!("message table unloaded");
    }

    /// Id-field widths for the current module and message counts.
    pub fn layout(&self) -> WireLayout {
        WireLayout::new(self.platform.module_count(), self.registry.len())
    }

    // ---- Accessors ----

    pub fn registry(&self) -> &MessageRegistry {
        &self.registry
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    // ---- Sending ----

    /// Sends `message` on behalf of `module`.
    ///
    /// `route` selects recipients. `forward` asks the server to pass the
    /// message on to other clients along the same route; it only has an
    /// effect when the local role is client and is ignored otherwise.
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`NetError::Offline`] if there is no session.
    /// - [`NetError::UnregisteredMessage`] if `M` was never registered.
    /// - [`NetError::ModuleMismatch`] if `M` was registered by a module
    ///   other than `module`.
    /// - [`NetError::ModuleNotSynced`] if `module` isn't part of the
    ///   session. A client sending for a `ServerOptional` module the server
    ///   lacks gets `Ok(SendOutcome::Skipped)` instead.
    pub fn send<M: NetMessage + 'static>(
        &mut self,
        module: ModuleId,
        message: &M,
        route: Route,
        forward: bool,
    ) -> Result<SendOutcome, NetError> {
        let role = self.platform.role();
        if !role.is_online() {
            return Err(NetError::Offline);
        }

        let id = self.registry.id_of::<M>().ok_or(NetError::UnregisteredMessage {
            name: type_name::<M>(),
        })?;
        let owner = self.registry.descriptor(id).map(|d| d.module());
        if let Some(owner) = owner.filter(|&owner| owner != module) {
            return Err(NetError::ModuleMismatch {
                message: id,
                owner,
                claimed: module,
            });
        }

        let origin = self.platform.local_peer();
        self.send_as(module, id, message, origin, route, forward && role.is_client())
    }

    /// Writes and hands off one packet. Shared by [`send`](Self::send) and
    /// the server's relay leg, which sends on behalf of `origin`.
    pub(crate) fn send_as(
        &mut self,
        module: ModuleId,
        id: MessageId,
        message: &dyn NetMessage,
        origin: PeerId,
        route: Route,
        forward: bool,
    ) -> Result<SendOutcome, NetError> {
        let role = self.platform.role();

        let info = match self.platform.module(module) {
            Some(info) if info.net_synced => info,
            other => {
                let optional = other.is_some_and(|m| m.policy == SyncPolicy::ServerOptional);
                if role.is_client() && optional {
                    tracing::debug!(
                        %module,
                        message_id = %id,
                        "server lacks module, send skipped"
                    );
                    return Ok(SendOutcome::Skipped);
                }
                return Err(NetError::ModuleNotSynced(module));
            }
        };

        let mut header = Header::new(module, id, info.policy.is_required());
        if forward {
            let relay = if role.is_client() {
                RelayFields::forward(route)
            } else {
                RelayFields::Origin(origin)
            };
            header = header.with_relay(relay);
        }

        let layout = self.layout();
        let mut writer =
            PacketWriter::with_capacity(self.config.byte_order, header.encoded_len(&layout));
        encode_header(&header, &layout, &mut writer)?;
        message.serialize(&mut writer)?;

        self.transport.send(writer.as_bytes(), route)?;
        tracing::trace!(
            %module,
            message_id = %id,
            %route,
            forward,
            size = writer.len(),
            "packet sent"
        );
        Ok(SendOutcome::Sent)
    }
}

impl<P: Platform + std::fmt::Debug, T: Transport + std::fmt::Debug> std::fmt::Debug
    for PacketHub<P, T>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketHub")
            .field("registry", &self.registry)
            .field("platform", &self.platform)
            .field("transport", &self.transport)
            .field("config", &self.config)
            .finish()
    }
}
