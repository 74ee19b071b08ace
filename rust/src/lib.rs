//! Typed client for the SecureLend comparison tools.
//!
//! Requests are validated locally, sent as a single MCP `tools/call`, and the
//! returned content envelope is decoded into typed responses (plus the optional
//! HTML widget). Failures surface as [`SecureLendError`] with a stable
//! [`ErrorKind`].

pub mod client;
pub mod credential;
pub mod error;
pub mod mcp;
pub mod resources;
pub mod types;

pub use client::{SecureLend, SecureLendBuilder, DEFAULT_MCP_URL};
pub use credential::{ApiKey, KeyEnvironment};
pub use error::{ErrorKind, SecureLendError};
pub use mcp::{ConnectionState, Transport};
