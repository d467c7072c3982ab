use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::transport::{ApiRequest, Method, RawResponse, ReqwestTransport, Transport};
use crate::config::AppConfig;
use crate::errors::{ApiError, StoreError};
use crate::metrics;
use crate::models::ResponseStatus;
use crate::session::{FileStore, KeyValueStore, MemoryStore, SessionManager};

/// Body of a successful response, picked by the `content-type` header.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Generic API client: bearer-token injection, JSON bodies, normalized errors.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionManager) -> Self {
        Self { transport, session }
    }

    /// Build the reqwest-backed client and the session store named in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn KeyValueStore> = match &config.session_file {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let transport = ReqwestTransport::new(config.api_base_url.clone());
        Ok(Self::new(Arc::new(transport), SessionManager::new(store)))
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(path, body)?;
        self.request(Method::Post, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(path, body)?;
        self.request(Method::Put, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::Delete, path, None).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let body = self.request_raw(method, path, body).await?;
        decode(path, body)
    }

    /// Send one request and return the untyped body. A single attempt: no
    /// retry, no timeout, no refresh of an expired token.
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ResponseBody, ApiError> {
        let bearer = self.session.token()?;
        metrics::record_request(path);
        tracing::debug!(%method, path, authenticated = bearer.is_some(), "API request");

        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer,
        };

        let resp = match self.transport.send(request).await {
            Ok(resp) => resp,
            Err(e) => {
                let err = ApiError::Network(e.to_string());
                metrics::record_error(err.kind());
                tracing::warn!(%method, path, error = %e, "API request failed to reach server");
                return Err(err);
            }
        };

        if !resp.is_success() {
            let err = normalize_error(&resp);
            metrics::record_error(err.kind());
            tracing::warn!(
                %method,
                path,
                status = resp.status,
                code = ?err.code(),
                error = %err,
                "API returned error status"
            );
            return Err(err);
        }

        let body = parse_body(path, &resp)?;
        if let ResponseBody::Json(value) = &body {
            if let Err(err) = check_envelope(path, value, resp.status) {
                metrics::record_error(err.kind());
                return Err(err);
            }
        }

        tracing::debug!(%method, path, status = resp.status, "API response");
        Ok(body)
    }
}

fn encode<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        reason: format!("request body: {e}"),
    })
}

fn parse_body(path: &str, resp: &RawResponse) -> Result<ResponseBody, ApiError> {
    // Empty 2xx bodies decode as an empty object so status-only DTOs still work.
    if resp.body.trim().is_empty() {
        return Ok(ResponseBody::Json(Value::Object(Default::default())));
    }
    if resp.is_json() {
        serde_json::from_str(&resp.body)
            .map(ResponseBody::Json)
            .map_err(|e| ApiError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })
    } else {
        Ok(ResponseBody::Text(resp.body.clone()))
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: ResponseBody) -> Result<T, ApiError> {
    let value = match body {
        ResponseBody::Json(v) => v,
        ResponseBody::Text(s) => Value::String(s),
    };
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// A 2xx body whose envelope says `ERROR` is still a failure.
fn check_envelope(path: &str, value: &Value, http_status: u16) -> Result<(), ApiError> {
    let Some(status) = value
        .get("status")
        .and_then(|s| serde_json::from_value::<ResponseStatus>(s.clone()).ok())
    else {
        return Ok(());
    };

    if status.is_error() {
        let message = status
            .first_message()
            .map(str::to_string)
            .unwrap_or_else(|| "Request failed".to_string());
        tracing::warn!(path, code = ?status.first_code(), %message, "API envelope reported error");
        return Err(ApiError::Api {
            message,
            code: status.first_code().map(str::to_string),
            status: http_status,
            response: Some(value.clone()),
        });
    }

    if status.status_type == crate::models::StatusType::Warn {
        tracing::warn!(path, message = ?status.first_message(), "API envelope warning");
    }
    Ok(())
}

/// Build the error for a non-2xx response.
///
/// Message precedence: `message` → `status.details[0].message` → plain-text
/// body → `"API <code> <reason>"`.
pub(crate) fn normalize_error(resp: &RawResponse) -> ApiError {
    let parsed = serde_json::from_str::<Value>(&resp.body)
        .ok()
        .filter(Value::is_object);

    let message = parsed
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .or_else(|| v.pointer("/status/details/0/message").and_then(Value::as_str))
        })
        .map(str::to_string)
        .or_else(|| {
            let text = resp.body.trim();
            (parsed.is_none() && !text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_else(|| format!("API {} {}", resp.status, resp.reason).trim_end().to_string());

    let code = parsed.as_ref().and_then(|v| {
        v.get("code")
            .or_else(|| v.pointer("/status/details/0/code"))
            .and_then(|c| match c {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    });

    ApiError::Api {
        message,
        code,
        status: resp.status,
        response: parsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, content_type: Option<&str>, body: &str) -> RawResponse {
        RawResponse {
            status,
            reason: "Bad Request".into(),
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    #[test]
    fn detail_message_and_code() {
        let resp = raw(
            400,
            Some("application/json"),
            r#"{"status":{"details":[{"message":"X","code":"7"}]}}"#,
        );
        let err = normalize_error(&resp);
        assert_eq!(err.to_string(), "X");
        assert_eq!(err.code(), Some("7"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn top_level_message_wins() {
        let resp = raw(
            500,
            Some("application/json"),
            r#"{"message":"top","status":{"details":[{"message":"nested"}]}}"#,
        );
        assert_eq!(normalize_error(&resp).to_string(), "top");
    }

    #[test]
    fn plain_text_body_becomes_message() {
        let err = normalize_error(&raw(502, Some("text/plain"), "oops"));
        assert_eq!(err.to_string(), "oops");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn empty_body_falls_back_to_status_line() {
        let err = normalize_error(&raw(400, None, ""));
        assert_eq!(err.to_string(), "API 400 Bad Request");
    }

    #[test]
    fn json_without_message_falls_back_to_status_line() {
        let err = normalize_error(&raw(400, Some("application/json"), r#"{"foo":1}"#));
        assert_eq!(err.to_string(), "API 400 Bad Request");
        assert_eq!(err.response(), Some(&json!({ "foo": 1 })));
    }

    #[test]
    fn envelope_error_on_success_status() {
        let body = json!({ "status": { "type": "ERROR", "details": [{ "code": "42", "message": "nope" }] } });
        let err = check_envelope("/x", &body, 200).unwrap_err();
        assert_eq!(err.to_string(), "nope");
        assert!(err.is_code("42"));

        let ok = json!({ "status": { "type": "SUCCESS" } });
        assert!(check_envelope("/x", &ok, 200).is_ok());

        let unrelated = json!({ "status": "PREDICTION_STATUS_ACTIVE" });
        assert!(check_envelope("/x", &unrelated, 200).is_ok());
    }
}
