use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::common::Money;
use crate::types::WithWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Checking,
    Savings,
    Both,
}

impl AccountType {
    pub const ALL: [AccountType; 3] = [Self::Checking, Self::Savings, Self::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Both => "both",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountingSoftware {
    Quickbooks,
    Xero,
    Freshbooks,
    None,
}

/// Request for `find_banking_accounts`.
///
/// `account_type` stays a plain string so requests decoded from JSON reach
/// validation intact; build it from [`AccountType`] when constructing in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BankingComparisonRequest {
    #[serde(default)]
    pub account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_transactions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features_needed: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounting_software: Option<AccountingSoftware>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl BankingComparisonRequest {
    pub fn new(account_type: AccountType) -> Self {
        Self {
            account_type: account_type.as_str().to_string(),
            monthly_revenue: None,
            monthly_transactions: None,
            average_balance: None,
            features_needed: None,
            accounting_software: None,
            max_results: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingComparisonResponse {
    #[serde(default)]
    pub accounts: Vec<BankingAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<BankingSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl WithWidget for BankingComparisonResponse {
    fn set_widget(&mut self, widget: Option<String>) {
        self.widget = widget;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingAccount {
    pub account_id: String,
    pub bank: Bank,
    pub account: AccountProduct,
    #[serde(default)]
    pub rates_and_fees: RatesAndFees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<AccountFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching: Option<AccountMatching>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesAndFees {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Apy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<Money>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fee_waiver_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_balance: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Apy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_banking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_app: Option<MobileApp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounting_integrations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileApp {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMatching {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pros: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankingSummary {
    #[serde(default)]
    pub lowest_monthly_cost: f64,
    #[serde(default)]
    pub highest_apy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_for_high_transactions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_for_interest: Option<String>,
}
