//! Error types for the registry layer.

use modnet_protocol::ModuleId;

/// Errors that can occur while registering message types.
///
/// A failed registration leaves the registry exactly as it was; no ids are
/// handed out for a module that fails validation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The type already has an id, either from another module or because a
    /// manifest listed it twice.
    #[error("message type {name} is already registered")]
    AlreadyRegistered { name: &'static str },

    /// Two message types in one module share a sort name, so their order
    /// (and therefore their ids) would not be well defined.
    #[error("module {module} lists two message types named {name}")]
    DuplicateName { module: ModuleId, name: &'static str },

    /// Message ids are two bytes on the wire at most.
    #[error("registering {requested} more message types would exceed the limit of {capacity}")]
    Exhausted { requested: usize, capacity: usize },
}
