use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PageRequest;

/// Ledger row: deposits, stakes, payouts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    pub activity_id: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesRequest {
    pub user_id: String,
    pub page_request: PageRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesResponse {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub total_count: Option<u64>,
}
