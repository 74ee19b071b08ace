use serde::{Deserialize, Serialize};

use crate::types::common::{BusinessProfile, Money};
use crate::types::WithWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardsType {
    Cashback,
    Points,
    Miles,
}

/// Request for `find_credit_cards`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreditCardComparisonRequest {
    pub credit_score: u16,
    pub monthly_spend: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_categories: Option<Vec<SpendCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<CardPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl CreditCardComparisonRequest {
    pub fn new(credit_score: u16, monthly_spend: f64) -> Self {
        Self {
            credit_score,
            monthly_spend,
            spend_categories: None,
            preferences: None,
            business: None,
            max_results: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpendCategory {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards_type: Option<RewardsType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_fee_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_apr: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreditCardComparisonResponse {
    #[serde(default)]
    pub cards: Vec<CreditCardOffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl WithWidget for CreditCardComparisonResponse {
    fn set_widget(&mut self, widget: Option<String>) {
        self.widget = widget;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardOffer {
    pub card_id: String,
    pub card_name: String,
    pub issuer: String,
    pub rewards: Rewards,
    pub fees: CardFees,
    pub apr: CardApr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_annual_rewards: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_probability: Option<f64>,
    pub apply_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewards {
    #[serde(rename = "type")]
    pub kind: RewardsType,
    pub base_rate: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonus_categories: Vec<BonusCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusCategory {
    pub category: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFees {
    pub annual_fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_transaction_fee: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardApr {
    pub purchase_apr: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_apr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_period_months: Option<u32>,
}
