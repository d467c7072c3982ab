use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use prediction_client::api::{ApiClient, ApiRequest, RawResponse, Transport, TransportError};
use prediction_client::session::SessionManager;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(RawResponse),
    Fail(String),
    Hang,
}

/// Scripted transport that records every request it sees.
///
/// Responses queue per path; the last one queued for a path keeps being
/// replayed. Unscripted paths answer 404 with a JSON message.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn json(&self, path: &str, status: u16, body: Value) {
        self.push(
            path,
            Scripted::Reply(RawResponse {
                status,
                reason: reason(status).into(),
                content_type: Some("application/json; charset=utf-8".into()),
                body: body.to_string(),
            }),
        );
    }

    /// 200 with a SUCCESS envelope merged into `body`.
    pub fn ok(&self, path: &str, mut body: Value) {
        if let Value::Object(map) = &mut body {
            map.entry("status")
                .or_insert_with(|| json!({ "type": "SUCCESS" }));
        }
        self.json(path, 200, body);
    }

    pub fn text(&self, path: &str, status: u16, body: &str) {
        self.push(
            path,
            Scripted::Reply(RawResponse {
                status,
                reason: reason(status).into(),
                content_type: Some("text/plain".into()),
                body: body.into(),
            }),
        );
    }

    pub fn fail(&self, path: &str, message: &str) {
        self.push(path, Scripted::Fail(message.into()));
    }

    /// Requests to `path` never complete.
    pub fn hang(&self, path: &str) {
        self.push(path, Scripted::Hang);
    }

    /// Drop everything scripted for `path`.
    pub fn clear(&self, path: &str) {
        self.scripts.lock().unwrap().remove(path);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }

    fn push(&self, path: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
    }

    fn next(&self, path: &str) -> Option<Scripted> {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);

        match self.next(&path) {
            Some(Scripted::Reply(resp)) => Ok(resp),
            Some(Scripted::Fail(msg)) => Err(TransportError(msg)),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(RawResponse {
                status: 404,
                reason: "Not Found".into(),
                content_type: Some("application/json".into()),
                body: json!({ "message": format!("no mock for {path}") }).to_string(),
            }),
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Client over `mock` with a fresh in-memory session.
#[allow(dead_code)]
pub fn client(mock: &Arc<MockTransport>) -> ApiClient {
    ApiClient::new(mock.clone(), SessionManager::in_memory())
}

/// Event `e1` with one question `q1` quoting "Over 2.5" at 58%.
#[allow(dead_code)]
pub fn sample_question() -> Value {
    json!({
        "questionId": "q1",
        "eventId": "e1",
        "name": "Total goals",
        "activity": {
            "marketDataDetails": [
                { "outcome": "Over 2.5", "impliedProbability": 58 },
                { "outcome": "Under 2.5", "impliedProbability": 42 }
            ]
        }
    })
}

#[allow(dead_code)]
pub fn logged_in_client(mock: &Arc<MockTransport>, token: &str, user_id: &str) -> ApiClient {
    use chrono::{Duration, Utc};
    use prediction_client::models::UserProfile;
    use prediction_client::session::StoredSession;

    let client = client(mock);
    client
        .session()
        .persist(&StoredSession {
            token: token.into(),
            refresh_token: None,
            expiry: Utc::now() + Duration::hours(1),
            profile: Some(UserProfile {
                user_id: user_id.into(),
                email: None,
                first_name: None,
                last_name: None,
            }),
        })
        .unwrap();
    client
}
