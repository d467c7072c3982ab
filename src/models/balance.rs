use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wallet balance, owned by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Balance {
    pub available: Decimal,
    pub reserved: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAmountRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub balance: Option<Balance>,
}
