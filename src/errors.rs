use serde_json::Value;

/// Errors surfaced by every call that goes through [`crate::api::ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error while contacting API: {0}")]
    Network(String),

    #[error("{message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
        response: Option<Value>,
    },

    #[error("failed to decode response from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("session storage error: {0}")]
    Session(#[from] StoreError),
}

impl ApiError {
    /// Server-provided error code, e.g. `"1010"` for an unknown user.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response. Envelope failures on a 2xx carry that 2xx.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_code(&self, expected: &str) -> bool {
        self.code() == Some(expected)
    }

    /// Parsed error body, when the server sent JSON.
    pub fn response(&self) -> Option<&Value> {
        match self {
            ApiError::Api { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "network",
            ApiError::Api { .. } => "api",
            ApiError::Decode { .. } => "decode",
            ApiError::Session(_) => "session",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("session store lock poisoned")]
    Poisoned,
}
