/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The channel to the remote side was closed.
    #[error("channel closed: {0}")]
    Closed(String),

    /// The packet is larger than the channel accepts.
    #[error("packet of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}
