//! Error taxonomy surfaced to SDK callers.
//!
//! Every failure is a single `SecureLendError` carrying a closed `ErrorKind`.
//! Callers branch on `kind()`, never on message text. Transport failures are
//! classified here, once, depending on whether they happened while opening
//! the connection or while invoking a tool.

use std::fmt;

use serde_json::{json, Value};

use crate::mcp::error::{TransportError, RPC_INVALID_PARAMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The API key does not match `sk_(test|live)_...`; no client is built.
    CredentialFormat,
    Authentication,
    /// A local precondition failed, or the server rejected the arguments.
    Validation,
    RateLimit,
    NotFound,
    Network,
    Server,
    /// The tool result envelope had no usable JSON content.
    Mcp,
    /// Catch-all for unclassified failures during a tool call.
    ToolCall,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CredentialFormat => "credential_format_error",
            Self::Authentication => "authentication_error",
            Self::Validation => "validation_error",
            Self::RateLimit => "rate_limit_error",
            Self::NotFound => "not_found",
            Self::Network => "network_error",
            Self::Server => "server_error",
            Self::Mcp => "mcp_error",
            Self::ToolCall => "mcp_tool_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SecureLendError {
    kind: ErrorKind,
    message: String,
    details: Option<Value>,
    retry_after: Option<u64>,
}

impl SecureLendError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            retry_after: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn credential_format() -> Self {
        Self::new(
            ErrorKind::CredentialFormat,
            "Invalid API key format. Expected: sk_test_... or sk_live_...",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn rate_limited(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self {
            retry_after,
            ..Self::new(ErrorKind::RateLimit, message)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Seconds the server asked us to wait, when it said so.
    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }

    /// Classify a failure raised while establishing the connection.
    pub(crate) fn from_connect_failure(err: TransportError) -> Self {
        match err.status() {
            Some(401) | Some(403) => Self::new(
                ErrorKind::Authentication,
                "MCP connection failed: Invalid API key.",
            ),
            _ => Self::new(ErrorKind::Network, format!("MCP connection failed: {err}")),
        }
    }

    /// Classify a failure raised by an established connection during a tool call.
    pub(crate) fn from_invoke_failure(err: TransportError) -> Self {
        match &err {
            TransportError::Http {
                status,
                body,
                retry_after,
            } => {
                let status = *status;
                let details = body_details(body);
                match status {
                    400 => {
                        let err = Self::validation("Invalid tool arguments");
                        match details {
                            Some(details) => err.with_details(details),
                            None => err,
                        }
                    }
                    401 | 403 => Self::new(ErrorKind::Authentication, "Authentication failed."),
                    404 => Self::new(ErrorKind::NotFound, format!("Not found: {err}")),
                    429 => Self::rate_limited(format!("Rate limited: {err}"), *retry_after),
                    500..=599 => Self::new(ErrorKind::Server, format!("Server error: {err}")),
                    _ => Self::tool_call_failed(&err),
                }
            }
            TransportError::Rpc { code, data, .. } if *code == RPC_INVALID_PARAMS => {
                let validation = Self::validation("Invalid tool arguments");
                match data {
                    Some(data) => validation.with_details(data.clone()),
                    None => validation,
                }
            }
            _ => Self::tool_call_failed(&err),
        }
    }

    fn tool_call_failed(err: &TransportError) -> Self {
        let mut details = json!({ "error": err.to_string() });
        if let TransportError::Rpc {
            code,
            data: Some(data),
            ..
        } = err
        {
            details["code"] = json!(code);
            details["data"] = data.clone();
        }
        Self::new(ErrorKind::ToolCall, format!("Tool call failed: {err}")).with_details(details)
    }
}

fn body_details(body: &str) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

impl fmt::Display for SecureLendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SecureLendError {}
