use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::{json, Value};

use crate::mcp::content::ToolResult;
use crate::mcp::error::TransportError;
use crate::mcp::transport::{Transport, TransportClient, TransportOptions};
use crate::mcp::{Connection, Connector, ToolDescriptor};

pub(crate) const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";
const CLIENT_NAME: &str = "securelend-rust";

/// Opens authenticated MCP sessions against a remote endpoint.
#[derive(Debug, Clone)]
pub struct RemoteConnector {
    endpoint: String,
    transport: Transport,
    protocol_version: String,
    connect_timeout: Duration,
    request_timeout: Option<Duration>,
}

impl RemoteConnector {
    pub(crate) fn new(
        endpoint: String,
        transport: Transport,
        connect_timeout: Duration,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            endpoint,
            transport,
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            connect_timeout,
            request_timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn open(&self, api_key: &str) -> Result<Box<dyn Connection>, TransportError> {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {api_key}"));
        headers.insert(
            "User-Agent".to_string(),
            format!("{CLIENT_NAME}/{}", env!("CARGO_PKG_VERSION")),
        );

        let transport = TransportClient::new(
            self.transport,
            TransportOptions {
                endpoint: self.endpoint.clone(),
                headers,
                connect_timeout: self.connect_timeout,
                request_timeout: self.request_timeout,
            },
        )?;

        let mut session = McpSession {
            transport,
            protocol_version: self.protocol_version.clone(),
            request_seq: 0,
        };
        session.initialize().await?;
        Ok(Box::new(session))
    }
}

impl Connector for RemoteConnector {
    fn connect<'a>(
        &'a self,
        api_key: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn Connection>, TransportError>> {
        Box::pin(self.open(api_key))
    }
}

pub(crate) struct McpSession {
    transport: TransportClient,
    protocol_version: String,
    request_seq: u64,
}

impl McpSession {
    async fn initialize(&mut self) -> Result<(), TransportError> {
        let params = json!({
            "protocolVersion": self.protocol_version,
            "capabilities": {
                "tools": {},
                "widgets": { "supportsHtml": true }
            },
            "clientInfo": {
                "name": CLIENT_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        });
        self.send_jsonrpc_request("initialize", params).await?;

        let initialized_notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        });
        self.transport
            .send_notification(&initialized_notification)
            .await
    }

    async fn call(&mut self, name: &str, arguments: Value) -> Result<ToolResult, TransportError> {
        let response = self
            .send_jsonrpc_request(
                "tools/call",
                json!({
                    "name": name,
                    "arguments": arguments,
                }),
            )
            .await?;
        parse_tool_call_response(response)
    }

    async fn list(&mut self) -> Result<Vec<ToolDescriptor>, TransportError> {
        let response = self.send_jsonrpc_request("tools/list", json!({})).await?;
        parse_tools_list_response(&response)
    }

    async fn send_jsonrpc_request(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<Value, TransportError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": self.next_request_id(),
            "method": method,
            "params": params,
        });

        let response = self.transport.send_request(&request).await?;
        ensure_no_rpc_error(&response)?;
        Ok(response)
    }

    fn next_request_id(&mut self) -> String {
        self.request_seq = self.request_seq.saturating_add(1);
        format!("securelend-{}", self.request_seq)
    }
}

impl Connection for McpSession {
    fn call_tool<'a>(
        &'a mut self,
        name: &'a str,
        arguments: Value,
    ) -> BoxFuture<'a, Result<ToolResult, TransportError>> {
        Box::pin(self.call(name, arguments))
    }

    fn list_tools(&mut self) -> BoxFuture<'_, Result<Vec<ToolDescriptor>, TransportError>> {
        Box::pin(self.list())
    }

    fn is_open(&self) -> bool {
        self.transport.is_open()
    }
}

fn ensure_no_rpc_error(response: &Value) -> Result<(), TransportError> {
    let Some(error) = response.get("error") else {
        return Ok(());
    };

    Err(TransportError::Rpc {
        code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
        message: error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string(),
        data: error.get("data").cloned(),
    })
}

fn parse_tool_call_response(response: Value) -> Result<ToolResult, TransportError> {
    let Some(result) = response.get("result").cloned() else {
        return Err(TransportError::Protocol(
            "tools/call response missing result".to_string(),
        ));
    };
    serde_json::from_value(result).map_err(|err| {
        TransportError::Protocol(format!("tools/call result was malformed: {err}"))
    })
}

fn parse_tools_list_response(response: &Value) -> Result<Vec<ToolDescriptor>, TransportError> {
    let tools = response
        .pointer("/result/tools")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            TransportError::Protocol("tools/list result missing tools array".to_string())
        })?;

    let mut parsed = Vec::with_capacity(tools.len());
    for tool in tools {
        let Some(obj) = tool.as_object() else {
            return Err(TransportError::Protocol(
                "tools/list item was not an object".to_string(),
            ));
        };

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                TransportError::Protocol("tool entry missing non-empty name".to_string())
            })?
            .to_string();

        parsed.push(ToolDescriptor {
            name,
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            input_schema: obj
                .get("inputSchema")
                .cloned()
                .unwrap_or_else(|| json!({"type": "object"})),
        });
    }

    Ok(parsed)
}
