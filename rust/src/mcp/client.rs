//! Connection lifecycle and tool invocation on top of a [`Connector`].
//!
//! # Design
//! The client moves through `Disconnected -> Connecting -> Connected`. The
//! live connection sits in a single async slot; every call holds the slot
//! while it runs, so calls on one client never interleave on the wire.
//!
//! Credential rotation is synchronous. It swaps the key and bumps a
//! generation counter; a connection opened under an older generation is
//! discarded on its next use and a fresh one is opened with the new key.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::sync::{watch, Mutex};

use crate::credential::ApiKey;
use crate::error::{ErrorKind, SecureLendError};
use crate::mcp::content::ToolResult;
use crate::mcp::{Connection, Connector, ToolDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

struct LiveConnection {
    generation: u64,
    connection: Box<dyn Connection>,
}

pub struct McpClient {
    connector: Box<dyn Connector>,
    endpoint: String,
    api_key: ArcSwap<ApiKey>,
    generation: AtomicU64,
    debug: AtomicBool,
    state: watch::Sender<ConnectionState>,
    slot: Mutex<Option<LiveConnection>>,
}

macro_rules! sdk_log {
    ($client:expr, $($arg:tt)+) => {
        if $client.debug_enabled() {
            tracing::info!(target: "securelend", $($arg)+);
        } else {
            tracing::debug!(target: "securelend", $($arg)+);
        }
    };
}

impl McpClient {
    pub(crate) fn new(
        connector: Box<dyn Connector>,
        endpoint: impl Into<String>,
        api_key: ApiKey,
        debug: bool,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            connector,
            endpoint: endpoint.into(),
            api_key: ArcSwap::from_pointee(api_key),
            generation: AtomicU64::new(0),
            debug: AtomicBool::new(debug),
            state,
            slot: Mutex::new(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn api_key(&self) -> Arc<ApiKey> {
        self.api_key.load_full()
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    pub(crate) fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    /// Replace the credential; the next call opens a new connection with it.
    pub(crate) fn rotate_api_key(&self, api_key: ApiKey) {
        sdk_log!(self, "Rotating API key to {api_key}; connection will be re-established");
        self.api_key.store(Arc::new(api_key));
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(ConnectionState::Disconnected);
    }

    /// Open the connection now instead of on the first tool call.
    pub async fn connect(&self) -> Result<(), SecureLendError> {
        let mut slot = self.slot.lock().await;
        self.ensure_connected(&mut slot).await.map(|_| ())
    }

    /// Drop the live connection, if any.
    pub async fn disconnect(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            sdk_log!(self, "MCP client disconnected from {}", self.endpoint);
        }
        self.state.send_replace(ConnectionState::Disconnected);
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, SecureLendError> {
        let mut slot = self.slot.lock().await;
        let live = self.ensure_connected(&mut slot).await?;

        sdk_log!(self, "Calling tool: {name} with args: {arguments}");
        let outcome = live.connection.call_tool(name, arguments).await;

        match outcome {
            Ok(result) if result.is_error => {
                sdk_log!(self, "Tool {name} reported an error");
                let message = result
                    .first_text()
                    .map(|text| format!("Tool call failed: {text}"))
                    .unwrap_or_else(|| format!("Tool call failed: {name} reported an error"));
                Err(SecureLendError::new(ErrorKind::ToolCall, message).with_details(result.to_value()))
            }
            Ok(result) => {
                sdk_log!(self, "Tool result for {name}: {} content part(s)", result.content.len());
                Ok(result)
            }
            Err(err) => {
                sdk_log!(self, "Tool call {name} failed: {err}");
                if err.is_connection_loss() {
                    slot.take();
                    self.state.send_replace(ConnectionState::Disconnected);
                }
                Err(SecureLendError::from_invoke_failure(err))
            }
        }
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, SecureLendError> {
        let mut slot = self.slot.lock().await;
        let live = self.ensure_connected(&mut slot).await?;

        match live.connection.list_tools().await {
            Ok(tools) => Ok(tools),
            Err(err) => {
                if err.is_connection_loss() {
                    slot.take();
                    self.state.send_replace(ConnectionState::Disconnected);
                }
                Err(SecureLendError::from_invoke_failure(err))
            }
        }
    }

    async fn ensure_connected<'s>(
        &self,
        slot: &'s mut Option<LiveConnection>,
    ) -> Result<&'s mut LiveConnection, SecureLendError> {
        // Read the generation before the key: a rotation in between leaves this
        // connection tagged stale rather than tagging an old key as current.
        let generation = self.generation.load(Ordering::SeqCst);
        let stale = slot
            .as_ref()
            .is_some_and(|live| live.generation != generation);
        if stale {
            sdk_log!(self, "Discarding connection opened with a previous API key");
            *slot = None;
        }
        if slot.as_ref().is_some_and(|live| !live.connection.is_open()) {
            sdk_log!(self, "MCP connection was closed by the server, reconnecting");
            *slot = None;
        }

        if slot.is_none() {
            let api_key = self.api_key.load_full();
            sdk_log!(self, "Connecting to MCP server at {}", self.endpoint);
            self.state.send_replace(ConnectionState::Connecting);

            let connection = match self.connector.connect(api_key.expose()).await {
                Ok(connection) => connection,
                Err(err) => {
                    sdk_log!(self, "MCP connection failed: {err}");
                    self.state.send_replace(ConnectionState::Disconnected);
                    return Err(SecureLendError::from_connect_failure(err));
                }
            };

            let current = self.generation.load(Ordering::SeqCst) == generation;
            self.state.send_replace(if current {
                ConnectionState::Connected
            } else {
                ConnectionState::Disconnected
            });
            sdk_log!(self, "MCP client connected ({} key)", api_key.environment().as_str());
            *slot = Some(LiveConnection {
                generation,
                connection,
            });
        }

        slot.as_mut().ok_or_else(|| {
            SecureLendError::new(ErrorKind::Network, "MCP connection is not available")
        })
    }
}
