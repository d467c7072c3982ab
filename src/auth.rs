//! Login-or-register flow and session persistence.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::api::auth::{LOGIN_PATH, SIGNUP_PATH};
use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::models::user::{AuthResponse, LoginRequest, SignupRequest};
use crate::models::Credentials;
use crate::session::StoredSession;

/// Server code for "user does not exist".
pub const USER_NOT_FOUND_CODE: &str = "1010";

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Log in and persist the session.
///
/// Social credentials for an unknown user (code `1010`) fall back to exactly
/// one signup with the same token. Email credentials never fall back.
pub async fn login(client: &ApiClient, creds: &Credentials) -> Result<StoredSession, ApiError> {
    let (resp, path) = match client.login(&LoginRequest::from(creds)).await {
        Ok(resp) => (resp, LOGIN_PATH),
        Err(e) if e.is_code(USER_NOT_FOUND_CODE) && creds.is_social() => {
            tracing::info!("User does not exist, registering with social credentials");
            let resp = client.signup(&SignupRequest::from(creds)).await?;
            (resp, SIGNUP_PATH)
        }
        Err(e) => return Err(e),
    };

    store_session(client, &resp, path)
}

/// Explicit registration, persisting the session on success.
pub async fn signup(client: &ApiClient, creds: &Credentials) -> Result<StoredSession, ApiError> {
    let resp = client.signup(&SignupRequest::from(creds)).await?;
    store_session(client, &resp, SIGNUP_PATH)
}

pub fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client.session().clear()?;
    Ok(())
}

fn store_session(
    client: &ApiClient,
    resp: &AuthResponse,
    path: &str,
) -> Result<StoredSession, ApiError> {
    let token = resp.bearer().ok_or_else(|| ApiError::Decode {
        path: path.to_string(),
        reason: "response did not include a token".into(),
    })?;

    let session = StoredSession {
        token: token.to_string(),
        refresh_token: resp.refresh_token.clone(),
        expiry: parse_expiry(resp.raw_expiry(), Utc::now()),
        profile: resp.user.clone(),
    };
    client.session().persist(&session)?;
    Ok(session)
}

/// Token expiry from an RFC 3339 string or unix seconds; one hour from `now`
/// when absent or unreadable.
pub fn parse_expiry(raw: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    let fallback = now + Duration::seconds(DEFAULT_TOKEN_TTL_SECS);

    let parsed = match raw {
        None | Some(Value::Null) => return fallback,
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.trim().parse::<i64>().ok().and_then(from_unix)),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(from_unix),
        Some(_) => None,
    };

    parsed.unwrap_or_else(|| {
        tracing::warn!(raw = ?raw, "Unreadable token expiry, defaulting to one hour");
        fallback
    })
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}
