use crate::error::SecureLendError;
use crate::resources::{credit_score_in_range, ResourceClient, FIND_CREDIT_CARDS};
use crate::types::{CreditCardComparisonRequest, CreditCardComparisonResponse};

/// Business credit card comparison.
#[derive(Clone)]
pub struct CreditCards {
    client: ResourceClient,
}

impl CreditCards {
    pub(crate) fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    pub async fn compare(
        &self,
        request: &CreditCardComparisonRequest,
    ) -> Result<CreditCardComparisonResponse, SecureLendError> {
        validate_card_request(request)?;
        self.client.compare(FIND_CREDIT_CARDS, request).await
    }
}

fn validate_card_request(request: &CreditCardComparisonRequest) -> Result<(), SecureLendError> {
    if !credit_score_in_range(request.credit_score) {
        return Err(SecureLendError::validation(
            "Valid credit score (300-850) is required",
        ));
    }

    if !(request.monthly_spend.is_finite() && request.monthly_spend >= 0.0) {
        return Err(SecureLendError::validation(
            "Monthly spend must be a positive number",
        ));
    }

    Ok(())
}
