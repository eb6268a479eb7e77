//! The receive path: one inbound message through a fixed sequence of stages.
//!
//! ```text
//! AwaitingHeader → ResolvingModule → ResolvingMessage → Deserializing
//!     → Relaying (server, relay bit set) → Receiving → Done
//! ```
//!
//! Any stage can end the message early. A client that receives traffic for
//! a module it doesn't have drops it quietly unless the sender marked it as
//! expected; every other early exit is an error. Framing is positional, so
//! an error means the rest of that packet is lost, but the hub itself is
//! unaffected and the next packet parses normally.

use std::fmt;

use modnet_protocol::{
    MessageId, ModuleId, PacketReader, PeerId, ProtocolError, RelayFields, SenderInfo,
    decode_prefix, decode_relay,
};
use modnet_transport::Transport;

use crate::{NetError, PacketHub, Platform};

/// Where a message was in its processing when something happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    AwaitingHeader,
    ResolvingModule,
    ResolvingMessage,
    Deserializing,
    Relaying,
    Receiving,
    Done,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::AwaitingHeader => "reading the header",
            Self::ResolvingModule => "resolving the module",
            Self::ResolvingMessage => "resolving the message",
            Self::Deserializing => "reading the payload",
            Self::Relaying => "relaying",
            Self::Receiving => "delivering",
            Self::Done => "done",
        };
        f.write_str(stage)
    }
}

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A client got a message for a module it lacks, and the sender didn't
    /// mark it as expected. Nothing past the flags byte was read.
    Dropped { module: ModuleId },
    /// The message was decoded and delivered.
    Received(Receipt),
}

/// Details of a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub module: ModuleId,
    pub message: MessageId,
    /// The peer the message is attributed to.
    pub sender: PeerId,
    /// What the message's receive hook returned.
    pub handled: bool,
    /// Whether this server passed the message on to other clients.
    pub relayed: bool,
    /// Payload bytes the message read.
    pub consumed: usize,
    /// Bytes left in the packet after the message.
    pub remaining: usize,
}

fn malformed(stage: DispatchStage) -> impl FnOnce(ProtocolError) -> NetError {
    move |source| NetError::Malformed { stage, source }
}

impl<P: Platform, T: Transport> PacketHub<P, T> {
    /// Processes one inbound packet.
    ///
    /// `from` is the host's index of the peer the bytes arrived from,
    /// clamped into the one-byte peer range. On a server, a message with
    /// the relay bit set is passed on to the requested clients before it
    /// is delivered locally.
    pub fn handle_packet(&mut self, data: &[u8], from: i32) -> Result<Delivery, NetError> {
        let mut reader = PacketReader::new(data, self.config.byte_order);
        self.handle_message(&mut reader, from)
    }

    /// Processes the message at the reader's position, leaving the reader
    /// just past it.
    pub fn handle_message(
        &mut self,
        reader: &mut PacketReader<'_>,
        from: i32,
    ) -> Result<Delivery, NetError> {
        let role = self.platform.role();
        if !role.is_online() {
            return Err(NetError::Offline);
        }
        let mut sender_peer = PeerId::clamped(from);

        let mut stage = DispatchStage::AwaitingHeader;
        let prefix = decode_prefix(reader, &self.layout()).map_err(malformed(stage))?;

        stage = DispatchStage::ResolvingModule;
        let module = prefix.module;
        match self.platform.module(module) {
            Some(info) if info.net_synced => {}
            _ if role.is_client() && !prefix.flags.expected() => {
                tracing::debug!(
                    %stage,
                    %module,
                    message_id = %prefix.message,
                    "module not present, packet dropped"
                );
                return Ok(Delivery::Dropped { module });
            }
            _ => return Err(NetError::ModuleResolution(module)),
        }

        stage = DispatchStage::ResolvingMessage;
        let descriptor = *self
            .registry
            .descriptor(prefix.message)
            .ok_or(NetError::UnknownMessage(prefix.message))?;
        if descriptor.module() != module {
            return Err(NetError::ModuleMismatch {
                message: descriptor.id(),
                owner: descriptor.module(),
                claimed: module,
            });
        }
        tracing::trace!(%stage, name = descriptor.name(), "message resolved");

        stage = DispatchStage::Deserializing;
        let (mut to, mut except) = (None, None);
        match decode_relay(reader, prefix.flags, role).map_err(malformed(stage))? {
            Some(RelayFields::Forward { to: t, except: e }) => {
                to = t;
                except = e;
            }
            Some(RelayFields::Origin(peer)) => sender_peer = peer,
            None => {}
        }
        let sender = SenderInfo {
            module,
            peer: sender_peer,
            flags: prefix.flags,
            to,
            except,
        };

        let start = reader.position();
        let mut message = descriptor.instantiate();
        message.deserialize(reader, &sender).map_err(malformed(stage))?;
        let consumed = reader.position() - start;

        let relayed = role.is_server() && sender.forwarded();
        if relayed {
            stage = DispatchStage::Relaying;
            tracing::trace!(
                %stage,
                route = %sender.relay_route(),
                origin = %sender.peer,
                "relaying"
            );
            self.send_as(
                module,
                descriptor.id(),
                message.as_ref(),
                sender.peer,
                sender.relay_route(),
                true,
            )?;
        }

        stage = DispatchStage::Receiving;
        let handled = message.receive(&sender);
        if !handled {
            tracing::warn!(
                name = descriptor.name(),
                message_id = %descriptor.id(),
                %module,
                "message arrived but its receive hook reported it unhandled"
            );
        }
        if self.config.byte_accounting {
            tracing::debug!(
                %stage,
                name = descriptor.name(),
                from = %sender.peer,
                consumed,
                remaining = reader.remaining(),
                "message payload read"
            );
        }

        stage = DispatchStage::Done;
        tracing::trace!(%stage, message_id = %descriptor.id(), "dispatch finished");

        Ok(Delivery::Received(Receipt {
            module,
            message: descriptor.id(),
            sender: sender.peer,
            handled,
            relayed,
            consumed,
            remaining: reader.remaining(),
        }))
    }
}
