use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::{de, PageRequest};

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub team_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: String,
    pub name: String,
    /// Unix seconds.
    #[serde(default, deserialize_with = "de::opt_unix_seconds")]
    pub start_date: Option<i64>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub stats: StatsField,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Event {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// Win probabilities from the decoded stats. Missing or malformed stats
    /// are reported instead of being replaced with even odds.
    pub fn odds(&self) -> Result<&EventStats, StatsError> {
        match &self.stats {
            StatsField::Parsed(stats) => Ok(stats),
            StatsField::Missing => Err(StatsError::Missing),
            StatsField::Malformed { reason, .. } => Err(StatsError::Malformed(reason.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Stats: JSON-in-string field, decoded once when the event is deserialized
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("event has no stats")]
    Missing,

    #[error("malformed event stats: {0}")]
    Malformed(String),
}

/// Outcome label → probability in percent, e.g. `{"Arsenal": 58, "Chelsea": 42}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventStats {
    pub probabilities: BTreeMap<String, Decimal>,
}

impl EventStats {
    pub fn decode(raw: &str) -> Result<Self, StatsError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| StatsError::Malformed(e.to_string()))?;
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Result<Self, StatsError> {
        let obj = value
            .as_object()
            .ok_or_else(|| StatsError::Malformed("stats must be a JSON object".into()))?;

        let mut probabilities = BTreeMap::new();
        for (label, v) in obj {
            let p = match v {
                Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
                Value::String(s) => s.trim().parse::<Decimal>().ok(),
                _ => None,
            }
            .ok_or_else(|| StatsError::Malformed(format!("probability for '{label}' is not numeric")))?;

            if p < Decimal::ZERO || p > Decimal::ONE_HUNDRED {
                return Err(StatsError::Malformed(format!(
                    "probability for '{label}' out of range: {p}"
                )));
            }
            probabilities.insert(label.clone(), p);
        }

        if probabilities.is_empty() {
            return Err(StatsError::Malformed("stats object is empty".into()));
        }

        Ok(Self { probabilities })
    }

    pub fn probability(&self, label: &str) -> Option<Decimal> {
        self.probabilities.get(label).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum StatsField {
    Parsed(EventStats),
    Malformed {
        raw: String,
        reason: String,
    },
    #[default]
    Missing,
}

impl<'de> Deserialize<'de> for StatsField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let field = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => StatsField::Missing,
            Some(Value::String(s)) if s.trim().is_empty() => StatsField::Missing,
            Some(Value::String(s)) => match EventStats::decode(&s) {
                Ok(stats) => StatsField::Parsed(stats),
                Err(e) => {
                    tracing::warn!(error = %e, "Event stats could not be decoded");
                    StatsField::Malformed {
                        raw: s,
                        reason: e.to_string(),
                    }
                }
            },
            Some(other) => match EventStats::from_value(&other) {
                Ok(stats) => StatsField::Parsed(stats),
                Err(e) => {
                    tracing::warn!(error = %e, "Event stats could not be decoded");
                    StatsField::Malformed {
                        raw: other.to_string(),
                        reason: e.to_string(),
                    }
                }
            },
        };
        Ok(field)
    }
}

impl Serialize for StatsField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            StatsField::Parsed(stats) => {
                let raw = serde_json::to_string(&stats.probabilities)
                    .map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&raw)
            }
            StatsField::Malformed { raw, .. } => serializer.serialize_str(raw),
            StatsField::Missing => serializer.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// Question / market data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataDetail {
    pub outcome: String,
    pub implied_probability: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionActivity {
    #[serde(default)]
    pub market_data_details: Vec<MarketDataDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "de::object_or_json_string")]
    pub activity: Option<QuestionActivity>,
}

impl Question {
    pub fn outcomes(&self) -> &[MarketDataDetail] {
        self.activity
            .as_ref()
            .map(|a| a.market_data_details.as_slice())
            .unwrap_or(&[])
    }

    pub fn outcome(&self, name: &str) -> Option<&MarketDataDetail> {
        self.outcomes().iter().find(|d| d.outcome == name)
    }
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsRequest {
    pub page_request: PageRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsResponse {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEventRequest {
    pub event_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEventResponse {
    #[serde(default)]
    pub event: Option<Event>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataRequest {
    pub question_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataResponse {
    #[serde(default)]
    pub market_data_details: Vec<MarketDataDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_string_is_decoded_once() {
        let event: Event = serde_json::from_value(json!({
            "eventId": "e1",
            "name": "Arsenal v Chelsea",
            "startDate": "1760000000",
            "teams": [{ "name": "Arsenal" }, { "name": "Chelsea" }],
            "stats": "{\"Arsenal\": 58, \"Chelsea\": \"42\"}"
        }))
        .unwrap();

        let odds = event.odds().unwrap();
        assert_eq!(odds.probability("Arsenal"), Some(Decimal::from(58)));
        assert_eq!(odds.probability("Chelsea"), Some(Decimal::from(42)));
        assert_eq!(event.start_date, Some(1_760_000_000));
        assert!(event.start_time().is_some());
    }

    #[test]
    fn malformed_stats_are_reported_not_defaulted() {
        let event: Event = serde_json::from_value(json!({
            "eventId": "e2",
            "name": "Broken",
            "stats": "{not json"
        }))
        .unwrap();

        assert!(matches!(event.stats, StatsField::Malformed { .. }));
        assert!(matches!(event.odds(), Err(StatsError::Malformed(_))));
    }

    #[test]
    fn out_of_range_probability_is_malformed() {
        assert!(EventStats::decode(r#"{"A": 140}"#).is_err());
        assert!(EventStats::decode(r#"{}"#).is_err());
    }

    #[test]
    fn object_stats_out_of_range_are_malformed() {
        let event: Event = serde_json::from_value(json!({
            "eventId": "e4",
            "name": "Bad object",
            "stats": { "Arsenal": 150, "Chelsea": -50 }
        }))
        .unwrap();

        match &event.stats {
            StatsField::Malformed { raw, .. } => assert!(raw.contains("150")),
            other => panic!("expected malformed stats, got {other:?}"),
        }
        assert!(matches!(event.odds(), Err(StatsError::Malformed(_))));
    }

    #[test]
    fn missing_stats() {
        let event: Event =
            serde_json::from_value(json!({ "eventId": "e3", "name": "No stats" })).unwrap();
        assert_eq!(event.odds(), Err(StatsError::Missing));
    }

    #[test]
    fn question_activity_accepts_embedded_json_string() {
        let q: Question = serde_json::from_value(json!({
            "questionId": "q1",
            "name": "Total goals",
            "activity": "{\"marketDataDetails\":[{\"outcome\":\"Over 2.5\",\"impliedProbability\":58}]}"
        }))
        .unwrap();

        let over = q.outcome("Over 2.5").unwrap();
        assert_eq!(over.implied_probability, Decimal::from(58));
        assert!(q.outcome("Under 2.5").is_none());
    }
}
