use crate::error::SecureLendError;
use crate::resources::{ResourceClient, FIND_BANKING_ACCOUNTS};
use crate::types::{AccountType, BankingComparisonRequest, BankingComparisonResponse};

/// Business bank account comparison.
#[derive(Clone)]
pub struct Banking {
    client: ResourceClient,
}

impl Banking {
    pub(crate) fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    pub async fn compare(
        &self,
        request: &BankingComparisonRequest,
    ) -> Result<BankingComparisonResponse, SecureLendError> {
        validate_banking_request(request)?;
        self.client.compare(FIND_BANKING_ACCOUNTS, request).await
    }
}

fn validate_banking_request(request: &BankingComparisonRequest) -> Result<(), SecureLendError> {
    if request.account_type.is_empty() {
        return Err(SecureLendError::validation("Account type is required"));
    }

    if AccountType::parse(&request.account_type).is_none() {
        let valid: Vec<&str> = AccountType::ALL.iter().map(|kind| kind.as_str()).collect();
        return Err(SecureLendError::validation(format!(
            "Invalid account type. Must be one of: {}",
            valid.join(", ")
        )));
    }

    Ok(())
}
