use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PageRequest;

// ---------------------------------------------------------------------------
// Status / filter enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionStatus {
    #[serde(rename = "PREDICTION_STATUS_PENDING")]
    Pending,
    #[serde(rename = "PREDICTION_STATUS_ACTIVE")]
    Active,
    #[serde(rename = "PREDICTION_STATUS_WON")]
    Won,
    #[serde(rename = "PREDICTION_STATUS_LOST")]
    Lost,
    #[serde(rename = "PREDICTION_STATUS_EXITED")]
    Exited,
    #[serde(rename = "PREDICTION_STATUS_CANCELLED")]
    Cancelled,
    #[serde(rename = "PREDICTION_STATUS_SETTLED")]
    Settled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PredictionStatus::Pending => "Pending",
            PredictionStatus::Active => "Active",
            PredictionStatus::Won => "Won",
            PredictionStatus::Lost => "Lost",
            PredictionStatus::Exited => "Exited",
            PredictionStatus::Cancelled => "Cancelled",
            PredictionStatus::Settled => "Settled",
            PredictionStatus::Unknown => "Unknown",
        }
    }

    /// Open predictions can still be exited or cancelled.
    pub fn is_open(&self) -> bool {
        matches!(self, PredictionStatus::Pending | PredictionStatus::Active)
    }

    /// Settled one way or another; nothing left to exit or cancel.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            PredictionStatus::Won
                | PredictionStatus::Lost
                | PredictionStatus::Exited
                | PredictionStatus::Cancelled
                | PredictionStatus::Settled
        )
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which temporal bucket of predictions to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    #[serde(rename = "PREDICTIONTIMEINFORCE_LIVE")]
    Live,
    #[serde(rename = "PREDICTIONTIMEINFORCE_COMPLETED_TODAY")]
    CompletedToday,
    #[serde(rename = "PREDICTIONTIMEINFORCE_COMPLETED")]
    Completed,
    #[serde(rename = "PREDICTIONTIMEINFORCE_CANCELLED")]
    Cancelled,
    #[serde(rename = "PREDICTIONTIMEINFORCE_EXITED")]
    Exited,
    #[serde(rename = "PREDICTIONTIMEINFORCE_ALL")]
    All,
    #[serde(other)]
    Unknown,
}

impl TimeInForce {
    pub fn label(&self) -> &'static str {
        match self {
            TimeInForce::Live => "Live",
            TimeInForce::CompletedToday => "Completed Today",
            TimeInForce::Completed => "Completed",
            TimeInForce::Cancelled => "Cancelled",
            TimeInForce::Exited => "Exited",
            TimeInForce::All => "All",
            TimeInForce::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PnlType {
    #[serde(rename = "PNLTYPE_REALIZED")]
    Realized,
    #[serde(rename = "PNLTYPE_UNREALIZED")]
    Unrealized,
    #[serde(other)]
    Unknown,
}

impl PnlType {
    pub fn label(&self) -> &'static str {
        match self {
            PnlType::Realized => "Realized",
            PnlType::Unrealized => "Unrealized",
            PnlType::Unknown => "Unknown",
        }
    }
}

/// Time window of the portfolio performance chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartWindow {
    #[serde(rename = "TIMEWINDOW_DAY")]
    Day,
    #[default]
    #[serde(rename = "TIMEWINDOW_WEEK")]
    Week,
    #[serde(rename = "TIMEWINDOW_MONTH")]
    Month,
    #[serde(rename = "TIMEWINDOW_YEAR")]
    Year,
    #[serde(rename = "TIMEWINDOW_ALL")]
    All,
}

impl ChartWindow {
    pub fn label(&self) -> &'static str {
        match self {
            ChartWindow::Day => "1D",
            ChartWindow::Week => "1W",
            ChartWindow::Month => "1M",
            ChartWindow::Year => "1Y",
            ChartWindow::All => "All",
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub prediction_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub question_name: Option<String>,
    #[serde(default)]
    pub selected_outcome: String,
    /// Confidence the prediction was placed with, in percent.
    #[serde(default)]
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub investment_amt: Decimal,
    #[serde(default)]
    pub potential_returns: Decimal,
    #[serde(default)]
    pub status: PredictionStatus,
}

impl Prediction {
    /// Cache key: prediction id, falling back to the order id.
    pub fn key(&self) -> Option<&str> {
        self.prediction_id.as_deref().or(self.order_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePoint {
    pub timestamp: i64,
    pub value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Performance {
    pub total_predictions: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: Decimal,
    pub roi: Decimal,
    pub total_invested: Decimal,
    pub total_returns: Decimal,
    pub history: Vec<PerformancePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PnlEntry {
    pub prediction_id: Option<String>,
    pub question_name: Option<String>,
    pub pnl: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PnlSummary {
    pub pnl_type: Option<PnlType>,
    pub total_pnl: Decimal,
    pub entries: Vec<PnlEntry>,
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPredictionsRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    pub page_request: PageRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPredictionByIdRequest {
    pub prediction_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPredictionsByQuestionRequest {
    pub user_id: String,
    pub question_id: String,
    pub page_request: PageRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window: Option<ChartWindow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlRequest {
    pub user_id: String,
    pub pnl_type: PnlType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    #[serde(default)]
    pub prediction: Option<Prediction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    #[serde(default)]
    pub performance: Option<Performance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlResponse {
    #[serde(default)]
    pub pnl: Option<PnlSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_strings_map_to_closed_enum() {
        let p: Prediction = serde_json::from_value(json!({
            "predictionId": "p1",
            "eventId": "e1",
            "questionId": "q1",
            "selectedOutcome": "Over 2.5",
            "percentage": "58",
            "investmentAmt": 100,
            "potentialReturns": "58.00",
            "status": "PREDICTION_STATUS_EXITED"
        }))
        .unwrap();

        assert_eq!(p.status, PredictionStatus::Exited);
        assert_eq!(p.status.to_string(), "Exited");
        assert_eq!(p.percentage, Some(Decimal::from(58)));
        assert_eq!(p.key(), Some("p1"));
    }

    #[test]
    fn unrecognised_status_decodes_to_unknown() {
        let status: PredictionStatus =
            serde_json::from_value(json!("PREDICTION_STATUS_VOIDED")).unwrap();
        assert_eq!(status, PredictionStatus::Unknown);
        assert!(!status.is_open());
    }

    #[test]
    fn time_in_force_wire_format() {
        let value = serde_json::to_value(TimeInForce::CompletedToday).unwrap();
        assert_eq!(value, json!("PREDICTIONTIMEINFORCE_COMPLETED_TODAY"));
        assert_eq!(TimeInForce::CompletedToday.label(), "Completed Today");
    }
}
