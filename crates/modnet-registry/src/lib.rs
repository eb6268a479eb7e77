//! Message type registration for modnet.
//!
//! This crate turns "the message types each module declares" into "the
//! numeric ids on the wire", without any peer ever telling another peer
//! what it assigned:
//!
//! 1. **Declaration**: module authors implement [`NetMessage`] and list
//!    their types in a [`ModuleManifest`] as [`MessageKind`]s.
//! 2. **Assignment**: [`MessageRegistry`] sorts each module's types by name
//!    and numbers them in registration order.
//! 3. **Lookup**: type → id when sending, id → [`MessageDescriptor`] when
//!    receiving.
//!
//! # How it fits in the stack
//!
//! ```text
//! Dispatch layer (above)  ← resolves incoming ids, stamps outgoing ids
//!     ↕
//! Registry layer (this crate)  ← owns the id table for one load session
//!     ↕
//! Protocol layer (below)  ← provides MessageId, ModuleId, byte cursors
//! ```

mod error;
mod manifest;
mod message;
mod registry;

pub use error::RegistryError;
pub use manifest::{ModuleManifest, SyncPolicy};
pub use message::{MessageKind, NetMessage, read_nested};
pub use registry::{MAX_MESSAGES, MessageDescriptor, MessageRegistry};
