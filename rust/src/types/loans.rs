use serde::{Deserialize, Serialize};

use crate::types::common::Money;
use crate::types::WithWidget;

/// Request for `find_business_loan_options`.
///
/// `purpose` is free-form on the wire; the server understands `working_capital`,
/// `equipment_purchase`, `real_estate`, `business_acquisition`, `inventory`,
/// `expansion`, `debt_consolidation`, `payroll` and `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoanComparisonRequest {
    pub amount: f64,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<LoanBusiness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_preference_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoanBusiness {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    pub credit_score: u16,
    /// Months in operation.
    pub time_in_business: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LoanBusinessLocation>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoanBusinessLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl LoanComparisonRequest {
    pub fn new(amount: f64, purpose: impl Into<String>, business: LoanBusiness) -> Self {
        Self {
            amount,
            purpose: purpose.into(),
            business: Some(business),
            term_preference_months: None,
            collateral_available: None,
            max_results: None,
        }
    }
}

impl LoanBusiness {
    pub fn new(revenue: f64, credit_score: u16, time_in_business: u32) -> Self {
        Self {
            revenue: Some(revenue),
            credit_score,
            time_in_business,
            industry: None,
            entity_type: None,
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanComparisonResponse {
    #[serde(default)]
    pub offers: Vec<LoanOffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<LoanSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<QueryMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl WithWidget for LoanComparisonResponse {
    fn set_widget(&mut self, widget: Option<String>) {
        self.widget = widget;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanOffer {
    pub offer_id: String,
    pub lender: Institution,
    pub product: Product,
    pub terms: LoanTerms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<LoanFees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching: Option<OfferMatching>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<ApplicationProcess>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub amount: Money,
    pub interest_rate: InterestRate,
    pub term_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    Fixed,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    #[serde(rename = "type")]
    pub kind: RateType,
    /// Percent.
    pub rate: f64,
    pub apr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Money,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoanFees {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origination: Option<OriginationFee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OriginationFee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferMatching {
    #[serde(default)]
    pub approval_probability: f64,
    #[serde(default)]
    pub match_score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProcess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_speed: Option<FundingSpeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingSpeed {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    #[serde(default)]
    pub total_offers: u32,
    #[serde(default)]
    pub best_rate: f64,
    #[serde(default)]
    pub best_approval_probability: f64,
    #[serde(default)]
    pub fastest_funding: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub query_id: String,
    pub timestamp: String,
}

/// Parameters for `calculate_loan_payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoanCalculation {
    pub amount: f64,
    /// Annual rate, percent.
    pub rate: f64,
    pub term_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<CalculationFees>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculationFees {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origination: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanCalculationResult {
    pub monthly_payment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_interest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amortization_schedule: Option<Vec<AmortizationEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}
