//! Shared fixtures: message types, module manifests, and an in-process
//! session that wires one server hub to several client hubs.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;

use modnet::prelude::*;
use modnet::protocol::JsonCodec;
use serde::{Deserialize, Serialize};

pub type Hub = PacketHub<StaticPlatform, MemoryTransport>;

pub const GAMEPLAY: ModuleId = ModuleId(0);
pub const HUD: ModuleId = ModuleId(1);

/// Peer index the server uses for itself and that clients see it as.
pub const SERVER_INDEX: i32 = 255;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =========================================================================
// Receive log
// =========================================================================

/// One message as seen by a receive hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub kind: &'static str,
    pub from: PeerId,
    pub detail: String,
}

thread_local! {
    static SEEN: RefCell<Vec<Seen>> = const { RefCell::new(Vec::new()) };
}

fn record(kind: &'static str, sender: &SenderInfo, detail: String) {
    SEEN.with(|seen| {
        seen.borrow_mut().push(Seen {
            kind,
            from: sender.peer,
            detail,
        })
    });
}

/// Removes and returns everything receive hooks logged on this thread.
pub fn take_seen() -> Vec<Seen> {
    SEEN.with(|seen| std::mem::take(&mut *seen.borrow_mut()))
}

// =========================================================================
// Message types
// =========================================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Chat {
    pub text: String,
}

impl Chat {
    pub fn new(text: &str) -> Self {
        Self { text: text.into() }
    }
}

impl NetMessage for Chat {
    fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        writer.write_str(&self.text)
    }

    fn deserialize(
        &mut self,
        reader: &mut PacketReader<'_>,
        _sender: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        self.text = reader.read_str()?.to_owned();
        Ok(())
    }

    fn receive(&self, sender: &SenderInfo) -> bool {
        record("chat", sender, self.text.clone());
        true
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl NetMessage for Position {
    fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        writer.write_i32(self.x);
        writer.write_i32(self.y);
        Ok(())
    }

    fn deserialize(
        &mut self,
        reader: &mut PacketReader<'_>,
        _sender: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        self.x = reader.read_i32()?;
        self.y = reader.read_i32()?;
        Ok(())
    }

    fn receive(&self, sender: &SenderInfo) -> bool {
        record("position", sender, format!("{},{}", self.x, self.y));
        true
    }
}

/// Logs on arrival but reports itself unhandled.
#[derive(Debug, Default)]
pub struct Silent;

impl NetMessage for Silent {
    fn serialize(&self, _writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn deserialize(
        &mut self,
        _reader: &mut PacketReader<'_>,
        _sender: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn receive(&self, sender: &SenderInfo) -> bool {
        record("silent", sender, String::new());
        false
    }
}

/// A structured payload carried as length-prefixed JSON.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub owner: String,
    pub items: Vec<String>,
}

impl NetMessage for Inventory {
    fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        writer.write_encoded(&JsonCodec, self)
    }

    fn deserialize(
        &mut self,
        reader: &mut PacketReader<'_>,
        _sender: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        *self = reader.read_encoded(&JsonCodec)?;
        Ok(())
    }

    fn receive(&self, sender: &SenderInfo) -> bool {
        record("inventory", sender, self.items.join("+"));
        true
    }
}

#[derive(Debug, Default)]
pub struct HudPing(pub u8);

impl NetMessage for HudPing {
    fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.0);
        Ok(())
    }

    fn deserialize(
        &mut self,
        reader: &mut PacketReader<'_>,
        _sender: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        self.0 = reader.read_u8()?;
        Ok(())
    }

    fn receive(&self, sender: &SenderInfo) -> bool {
        record("hud.ping", sender, self.0.to_string());
        true
    }
}

/// Never registered anywhere.
#[derive(Debug, Default)]
pub struct Unlisted;

impl NetMessage for Unlisted {
    fn serialize(&self, _writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn deserialize(
        &mut self,
        _reader: &mut PacketReader<'_>,
        _sender: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn receive(&self, _sender: &SenderInfo) -> bool {
        true
    }
}

// =========================================================================
// Modules
// =========================================================================

/// Ids after sorting: chat 0, inventory 1, position 2, silent 3.
pub fn gameplay() -> ModuleManifest {
    ModuleManifest::new(GAMEPLAY, "gameplay", SyncPolicy::Both)
        .with_kind(MessageKind::named::<Silent>("gameplay.silent"))
        .with_kind(MessageKind::named::<Position>("gameplay.position"))
        .with_kind(MessageKind::named::<Chat>("gameplay.chat"))
        .with_kind(MessageKind::named::<Inventory>("gameplay.inventory"))
}

/// Registered after `gameplay`, so `hud.ping` gets id 4.
pub fn hud() -> ModuleManifest {
    ModuleManifest::new(HUD, "hud", SyncPolicy::ServerOptional)
        .with_kind(MessageKind::named::<HudPing>("hud.ping"))
}

pub fn server_hub(with_hud: bool) -> Hub {
    let gameplay = gameplay();
    let hud = hud();

    let mut platform = StaticPlatform::new(Role::Server, PeerId::clamped(SERVER_INDEX))
        .with_manifest(&gameplay);
    if with_hud {
        platform = platform.with_manifest(&hud);
    }

    let mut hub = PacketHub::new(platform, MemoryTransport::new());
    hub.load(&[gameplay]).unwrap();
    if with_hud {
        hub.register_module(&hud).unwrap();
    }
    hub
}

/// A client that has the HUD module installed; `server_has_hud` decides
/// whether it is net-synced.
pub fn client_hub(peer: u8, server_has_hud: bool) -> Hub {
    let gameplay = gameplay();
    let hud = hud();

    let platform = StaticPlatform::new(Role::Client, PeerId(peer))
        .with_manifest(&gameplay)
        .with_module(ModuleInfo {
            id: HUD,
            policy: SyncPolicy::ServerOptional,
            net_synced: server_has_hud,
        });

    let mut hub = PacketHub::new(platform, MemoryTransport::new());
    hub.load(&[gameplay]).unwrap();
    hub.register_module(&hud).unwrap();
    hub
}

// =========================================================================
// Session
// =========================================================================

/// One server and several clients exchanging packets in memory.
pub struct Session {
    pub server: Hub,
    pub clients: Vec<(PeerId, Hub)>,
    pub server_seen: Vec<Seen>,
    pub client_seen: BTreeMap<PeerId, Vec<Seen>>,
}

impl Session {
    pub fn new(clients: &[u8]) -> Self {
        Self {
            server: server_hub(true),
            clients: clients
                .iter()
                .map(|&peer| (PeerId(peer), client_hub(peer, true)))
                .collect(),
            server_seen: Vec::new(),
            client_seen: BTreeMap::new(),
        }
    }

    pub fn client(&mut self, peer: u8) -> &mut Hub {
        self.clients
            .iter_mut()
            .find(|(id, _)| id.0 == peer)
            .map(|(_, hub)| hub)
            .unwrap()
    }

    pub fn seen_by(&self, peer: u8) -> &[Seen] {
        self.client_seen
            .get(&PeerId(peer))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Delivers queued packets until every transport is empty. Client
    /// packets always go to the server; server packets go to each client
    /// the route includes. Returns how many deliveries happened.
    pub fn pump(&mut self) -> Result<usize, NetError> {
        let mut delivered = 0;
        loop {
            let mut moved = false;

            for (peer, client) in &mut self.clients {
                for packet in client.transport_mut().drain() {
                    moved = true;
                    self.server.handle_packet(&packet.bytes, i32::from(peer.0))?;
                    self.server_seen.extend(take_seen());
                    delivered += 1;
                }
            }

            for packet in self.server.transport_mut().drain() {
                for (peer, client) in &mut self.clients {
                    if packet.route.includes(*peer) {
                        moved = true;
                        client.handle_packet(&packet.bytes, SERVER_INDEX)?;
                        self.client_seen.entry(*peer).or_default().extend(take_seen());
                        delivered += 1;
                    }
                }
            }

            if !moved {
                return Ok(delivered);
            }
        }
    }
}

// =========================================================================
// Bulk message types
// =========================================================================

/// A family of distinct message types, one per `<H, T, O>` digit triple.
#[derive(Debug, Default)]
pub struct Numbered<const H: u8, const T: u8, const O: u8>(pub u16);

impl<const H: u8, const T: u8, const O: u8> NetMessage for Numbered<H, T, O> {
    fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        writer.write_u16(self.0);
        Ok(())
    }

    fn deserialize(
        &mut self,
        reader: &mut PacketReader<'_>,
        _sender: &SenderInfo,
    ) -> Result<(), ProtocolError> {
        self.0 = reader.read_u16()?;
        Ok(())
    }

    fn receive(&self, sender: &SenderInfo) -> bool {
        record("numbered", sender, format!("{}{}{}:{}", H, T, O, self.0));
        true
    }
}

macro_rules! hundreds {
    ($kinds:ident; $($h:literal)*) => {
        $( tens!($kinds; $h; 0 1 2 3 4 5 6 7 8 9); )*
    };
}

macro_rules! tens {
    ($kinds:ident; $h:literal; $($t:literal)*) => {
        $( ones!($kinds; $h; $t; 0 1 2 3 4 5 6 7 8 9); )*
    };
}

macro_rules! ones {
    ($kinds:ident; $h:literal; $t:literal; $($o:literal)*) => {
        $(
            $kinds.push(MessageKind::named::<Numbered<$h, $t, $o>>(
                concat!("numbered.", $h, $t, $o),
            ));
        )*
    };
}

/// A `Both` module with 300 message types named `numbered.000` through
/// `numbered.299`, which pushes message ids past one byte.
pub fn bulk(id: ModuleId) -> ModuleManifest {
    let mut manifest = ModuleManifest::new(id, "bulk", SyncPolicy::Both);
    let kinds = &mut manifest.messages;
    hundreds!(kinds; 0 1 2);
    manifest
}
