//! Comparison resources exposed on the facade.
//!
//! Each resource validates its request locally, invokes one fixed tool with
//! the request as arguments, and decodes the tool result. Validation failures
//! never reach the connection.

mod banking;
mod credit_cards;
mod loans;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SecureLendError;
use crate::mcp::McpClient;
use crate::types::WithWidget;

pub use banking::Banking;
pub use credit_cards::CreditCards;
pub use loans::Loans;

pub const FIND_BUSINESS_LOAN_OPTIONS: &str = "find_business_loan_options";
pub const CALCULATE_LOAN_PAYMENT: &str = "calculate_loan_payment";
pub const FIND_BANKING_ACCOUNTS: &str = "find_banking_accounts";
pub const FIND_CREDIT_CARDS: &str = "find_credit_cards";

pub(crate) const MIN_CREDIT_SCORE: u16 = 300;
pub(crate) const MAX_CREDIT_SCORE: u16 = 850;

#[derive(Clone)]
pub(crate) struct ResourceClient {
    mcp: Arc<McpClient>,
}

impl ResourceClient {
    pub(crate) fn new(mcp: Arc<McpClient>) -> Self {
        Self { mcp }
    }

    /// Invoke `tool` and merge the JSON body with the widget, if one came back.
    async fn compare<Req, Resp>(&self, tool: &str, request: &Req) -> Result<Resp, SecureLendError>
    where
        Req: Serialize,
        Resp: DeserializeOwned + WithWidget,
    {
        let arguments = encode_arguments(tool, request)?;
        let result = self.mcp.call_tool(tool, arguments).await?;
        let mut response: Resp = result.parse_json()?;
        response.set_widget(result.widget());
        Ok(response)
    }

    async fn call<Req, Resp>(&self, tool: &str, request: &Req) -> Result<Resp, SecureLendError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let arguments = encode_arguments(tool, request)?;
        let result = self.mcp.call_tool(tool, arguments).await?;
        result.parse_json()
    }
}

fn encode_arguments<Req: Serialize>(
    tool: &str,
    request: &Req,
) -> Result<serde_json::Value, SecureLendError> {
    serde_json::to_value(request).map_err(|err| {
        SecureLendError::validation(format!(
            "Failed to encode arguments for tool '{tool}': {err}"
        ))
    })
}

pub(crate) fn credit_score_in_range(score: u16) -> bool {
    (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score)
}
