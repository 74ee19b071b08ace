use crate::error::SecureLendError;
use crate::resources::{
    credit_score_in_range, ResourceClient, CALCULATE_LOAN_PAYMENT, FIND_BUSINESS_LOAN_OPTIONS,
};
use crate::types::{
    LoanCalculation, LoanCalculationResult, LoanComparisonRequest, LoanComparisonResponse,
};

const MIN_LOAN_AMOUNT: f64 = 5_000.0;

/// Business loan comparison and payment calculation.
#[derive(Clone)]
pub struct Loans {
    client: ResourceClient,
}

impl Loans {
    pub(crate) fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    pub async fn compare(
        &self,
        request: &LoanComparisonRequest,
    ) -> Result<LoanComparisonResponse, SecureLendError> {
        validate_comparison_request(request)?;
        self.client
            .compare(FIND_BUSINESS_LOAN_OPTIONS, request)
            .await
    }

    pub async fn calculate(
        &self,
        params: &LoanCalculation,
    ) -> Result<LoanCalculationResult, SecureLendError> {
        self.client.call(CALCULATE_LOAN_PAYMENT, params).await
    }
}

fn validate_comparison_request(request: &LoanComparisonRequest) -> Result<(), SecureLendError> {
    if !(request.amount.is_finite() && request.amount >= MIN_LOAN_AMOUNT) {
        return Err(SecureLendError::validation(
            "Loan amount must be at least $5,000",
        ));
    }

    if request.purpose.trim().is_empty() {
        return Err(SecureLendError::validation("Loan purpose is required"));
    }

    let Some(business) = request.business.as_ref() else {
        return Err(SecureLendError::validation(
            "Business information is required",
        ));
    };

    match business.revenue {
        Some(revenue) if revenue.is_finite() && revenue >= 0.0 => {}
        _ => {
            return Err(SecureLendError::validation(
                "Valid business revenue is required",
            ))
        }
    }

    if !credit_score_in_range(business.credit_score) {
        return Err(SecureLendError::validation(
            "Credit score must be between 300 and 850",
        ));
    }

    Ok(())
}
