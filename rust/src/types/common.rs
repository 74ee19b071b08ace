use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    /// ISO 4217, `USD` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Money {
    pub fn usd(amount: f64) -> Self {
        Self {
            amount,
            currency: Some("USD".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geography {
    /// ISO 3166-1 alpha-2.
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScore {
    pub score: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bureau: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    SoleProprietorship,
    Partnership,
    Llc,
    SCorp,
    CCorp,
    NonProfit,
}

/// Optional business details some tools use to refine matching.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<BusinessBasics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<BusinessLocations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financials: Option<BusinessFinancials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<BusinessCredit>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessBasics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dba: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ein: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorporation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naics_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLocations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<Geography>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_states: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_locations: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFinancials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueFigures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_debt: Option<ExistingDebt>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueFigures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_average: Option<Money>,
    #[serde(
        default,
        rename = "trailing12Months",
        skip_serializing_if = "Option::is_none"
    )]
    pub trailing_12_months: Option<Money>,
    /// Percent, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingDebt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_debt: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_debt_service: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCredit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_credit_score: Option<CreditScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bankruptcy_history: Option<bool>,
}
