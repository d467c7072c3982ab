pub mod activity;
pub mod balance;
pub mod event;
pub mod group;
pub mod notification;
pub mod order;
pub mod prediction;
pub mod user;

pub use activity::Activity;
pub use balance::Balance;
pub use event::{Event, EventStats, MarketDataDetail, Question, StatsField, Team};
pub use group::{Group, GroupMember, LeaderboardEntry};
pub use notification::{Notification, NotificationStatus};
pub use order::{Modifiers, OrderResponse, PredictionDetails};
pub use prediction::{
    ChartWindow, Performance, PnlSummary, PnlType, Prediction, PredictionStatus, TimeInForce,
};
pub use user::{Credentials, SocialProvider, UserProfile};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusType {
    Success,
    Error,
    Warn,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetail {
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `status: { type, details? }` carried by every API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    #[serde(rename = "type", default)]
    pub status_type: StatusType,
    #[serde(default)]
    pub details: Vec<StatusDetail>,
}

impl ResponseStatus {
    pub fn is_error(&self) -> bool {
        self.status_type == StatusType::Error
    }

    pub fn first_message(&self) -> Option<&str> {
        self.details.first().and_then(|d| d.message.as_deref())
    }

    pub fn first_code(&self) -> Option<&str> {
        self.details.first().and_then(|d| d.code.as_deref())
    }
}

/// Response body for mutations that only return the status envelope.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoders for loosely typed API payloads
// ---------------------------------------------------------------------------

pub(crate) mod de {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Codes arrive as `"1010"` or `1010` depending on the service.
    pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Unix seconds sent either as a number or a numeric string.
    pub fn opt_unix_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| D::Error::custom("timestamp out of range")),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid timestamp '{s}': {e}"))),
            Some(other) => Err(D::Error::custom(format!("invalid timestamp: {other}"))),
        }
    }

    /// Nested blobs that some endpoints embed as a JSON string instead of an object.
    pub fn object_or_json_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => serde_json::from_str(&s).map(Some).map_err(D::Error::custom),
            Some(other) => serde_json::from_value(other).map(Some).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_request_defaults_to_first_page_of_twenty() {
        let value = serde_json::to_value(PageRequest::default()).unwrap();
        assert_eq!(value, json!({ "pageNumber": 1, "pageSize": 20 }));
    }

    #[test]
    fn status_envelope_accepts_numeric_codes() {
        let status: ResponseStatus = serde_json::from_value(json!({
            "type": "ERROR",
            "details": [{ "code": 1010, "message": "User does not exist" }]
        }))
        .unwrap();

        assert!(status.is_error());
        assert_eq!(status.first_code(), Some("1010"));
        assert_eq!(status.first_message(), Some("User does not exist"));
    }

    #[test]
    fn unknown_status_type_is_not_an_error() {
        let status: ResponseStatus = serde_json::from_value(json!({ "type": "PARTIAL" })).unwrap();
        assert_eq!(status.status_type, StatusType::Unknown);
        assert!(!status.is_error());
    }
}
