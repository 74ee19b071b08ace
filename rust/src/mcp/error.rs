use std::fmt;

use serde_json::Value;

/// Failures raised by the transport adapter before any SDK-level classification.
#[derive(Debug)]
pub enum TransportError {
    InvalidEndpoint(String),
    Http {
        status: u16,
        body: String,
        retry_after: Option<u64>,
    },
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },
    Protocol(String),
    Transport(String),
}

/// JSON-RPC "invalid params", the protocol-level counterpart of HTTP 400.
pub const RPC_INVALID_PARAMS: i64 = -32602;

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the underlying link can no longer be trusted and must be re-opened.
    pub fn is_connection_loss(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Protocol(_))
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoint(msg) => write!(f, "Invalid endpoint: {msg}"),
            Self::Http { status, body, .. } => {
                if body.is_empty() {
                    write!(f, "HTTP {status}")
                } else {
                    write!(f, "HTTP {status}: {body}")
                }
            }
            Self::Rpc { code, message, .. } => write!(f, "RPC error {code}: {message}"),
            Self::Protocol(msg) => write!(f, "Protocol error: {msg}"),
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}
