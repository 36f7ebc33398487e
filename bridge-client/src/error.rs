//! Error types for the bridge client

use thiserror::Error;

/// Errors that can occur while talking to the Max bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Socket-level failure (bind, send, receive)
    #[error("Network error: {0}")]
    Network(String),

    /// A datagram could not be encoded or decoded as OSC
    #[error("OSC codec error: {0}")]
    Codec(String),

    /// The receive loop has stopped, so no reply can ever arrive
    #[error("Bridge connection closed")]
    Closed,
}

impl From<std::io::Error> for BridgeError {
    fn from(error: std::io::Error) -> Self {
        BridgeError::Network(error.to_string())
    }
}
