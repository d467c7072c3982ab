use std::env;
use std::path::PathBuf;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,

    // Persisted session keys (auth_token, refresh_token, ...). In-memory when unset.
    pub session_file: Option<PathBuf>,

    // Optional credentials for the console binary
    pub login_email: Option<String>,
    pub login_password: Option<String>,

    // Polling
    pub live_poll_interval_secs: u64,
    pub notification_poll_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = env::var("API_BASE_URL")
            .or_else(|_| env::var("VITE_API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            session_file: env::var("SESSION_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),

            login_email: env::var("LOGIN_EMAIL").ok(),
            login_password: env::var("LOGIN_PASSWORD").ok(),

            live_poll_interval_secs: env::var("LIVE_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "120".into())
                .parse()?,
            notification_poll_interval_secs: env::var("NOTIFICATION_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "120".into())
                .parse()?,
        })
    }

    /// Returns true if email credentials are configured.
    pub fn has_login(&self) -> bool {
        self.login_email.is_some() && self.login_password.is_some()
    }
}
