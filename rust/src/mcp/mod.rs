//! Remote tool invocation over MCP.
//!
//! The core talks to the remote side only through [`Connector`] and
//! [`Connection`]. [`RemoteConnector`] is the shipped adapter (SSE or
//! streamable HTTP); tests and embedders can supply their own.

mod client;
mod content;
pub(crate) mod error;
mod session;
mod transport;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use client::{ConnectionState, McpClient};
pub use content::{ContentPart, EmbeddedResource, ToolResult, HTML_MIME, JSON_MIME};
pub use error::TransportError;
pub use session::RemoteConnector;
pub use transport::Transport;

pub(crate) use transport::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Establishes an authenticated, initialized link to the tool server.
pub trait Connector: Send + Sync {
    fn connect<'a>(
        &'a self,
        api_key: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn Connection>, TransportError>>;
}

/// A live link that can invoke named tools.
pub trait Connection: Send {
    fn call_tool<'a>(
        &'a mut self,
        name: &'a str,
        arguments: Value,
    ) -> BoxFuture<'a, Result<ToolResult, TransportError>>;

    fn list_tools(&mut self) -> BoxFuture<'_, Result<Vec<ToolDescriptor>, TransportError>>;

    /// False once the link is known to be dead, e.g. its event stream ended.
    fn is_open(&self) -> bool {
        true
    }
}
