/// Error types for the mutation runtime
use thiserror::Error;

/// Transport-level failures surfaced by the RPC seam.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// Server rejected the operation.
    #[error("{code}: {message}")]
    Rpc { code: String, message: String },

    /// Request never reached the server or the connection dropped.
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    pub fn rpc(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rpc {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

/// Failures of a primary mutation. None are fatal; each is contained to the
/// interaction that produced it.
#[derive(Error, Debug)]
pub enum MutationError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
