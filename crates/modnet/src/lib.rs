//! # modnet
//!
//! Typed message registration, dispatch, and relay for modular multiplayer
//! hosts.
//!
//! Modules declare message types; every peer registers the same modules in
//! the same order and ends up with the same numeric ids without ever
//! exchanging a table. A [`PacketHub`] then frames outgoing messages behind
//! a compact header and runs each inbound message through decoding, optional
//! server relay, and delivery.
//!
//! ## Quick Start
//!
//! ```rust
//! use modnet::prelude::*;
//!
//! #[derive(Default)]
//! struct Chat(String);
//!
//! impl NetMessage for Chat {
//!     fn serialize(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
//!         writer.write_str(&self.0)
//!     }
//!
//!     fn deserialize(
//!         &mut self,
//!         reader: &mut PacketReader<'_>,
//!         _sender: &SenderInfo,
//!     ) -> Result<(), ProtocolError> {
//!         self.0 = reader.read_str()?.to_owned();
//!         Ok(())
//!     }
//!
//!     fn receive(&self, _sender: &SenderInfo) -> bool {
//!         true
//!     }
//! }
//!
//! # fn main() -> Result<(), NetError> {
//! let chat = ModuleManifest::new(ModuleId(0), "chat", SyncPolicy::Both).with::<Chat>();
//! let platform = StaticPlatform::new(Role::Client, PeerId(1)).with_manifest(&chat);
//!
//! let mut hub = PacketHub::new(platform, MemoryTransport::new());
//! hub.load(&[chat])?;
//! hub.send(ModuleId(0), &Chat("hello".into()), Route::all(), true)?;
//!
//! assert_eq!(hub.transport().sent().len(), 1);
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatch;
mod error;
mod host;
mod hub;

pub use config::NetConfig;
pub use dispatch::{Delivery, DispatchStage, Receipt};
pub use error::NetError;
pub use host::{ModuleInfo, Platform, StaticPlatform};
pub use hub::{PacketHub, SendOutcome};

pub use modnet_protocol as protocol;
pub use modnet_registry as registry;
pub use modnet_transport as transport;

/// The types most hosts and module authors need.
pub mod prelude {
    pub use crate::{
        Delivery, ModuleInfo, NetConfig, NetError, PacketHub, Platform, Receipt, SendOutcome,
        StaticPlatform,
    };
    pub use modnet_protocol::{
        ByteOrder, MessageId, ModuleId, PacketReader, PacketWriter, PeerId, ProtocolError, Role,
        Route, SenderInfo,
    };
    pub use modnet_registry::{MessageKind, ModuleManifest, NetMessage, SyncPolicy};
    pub use modnet_transport::{MemoryTransport, Transport};
}
