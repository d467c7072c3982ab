use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialProvider {
    Google,
    Apple,
}

/// What the user signs in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Email {
        email: String,
        password: String,
    },
    Social {
        provider: SocialProvider,
        token: String,
        first_name: Option<String>,
        last_name: Option<String>,
    },
}

impl Credentials {
    pub fn is_social(&self) -> bool {
        matches!(self, Credentials::Social { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLogin {
    pub provider: SocialProvider,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_login: Option<EmailLogin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_login: Option<SocialLogin>,
}

impl From<&Credentials> for LoginRequest {
    fn from(creds: &Credentials) -> Self {
        match creds {
            Credentials::Email { email, password } => Self {
                email_login: Some(EmailLogin {
                    email: email.clone(),
                    password: password.clone(),
                }),
                social_login: None,
            },
            Credentials::Social {
                provider, token, ..
            } => Self {
                email_login: None,
                social_login: Some(SocialLogin {
                    provider: *provider,
                    token: token.clone(),
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_login: Option<EmailLogin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_login: Option<SocialLogin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl From<&Credentials> for SignupRequest {
    fn from(creds: &Credentials) -> Self {
        let login = LoginRequest::from(creds);
        let (first_name, last_name) = match creds {
            Credentials::Social {
                first_name,
                last_name,
                ..
            } => (first_name.clone(), last_name.clone()),
            Credentials::Email { .. } => (None, None),
        };
        Self {
            email_login: login.email_login,
            social_login: login.social_login,
            first_name,
            last_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => format!("{f} {l}"),
            (Some(f), None) => f.clone(),
            _ => self.email.clone().unwrap_or_else(|| self.user_id.clone()),
        }
    }
}

/// Login and signup share this response shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// RFC 3339 string or unix seconds.
    #[serde(default)]
    pub expires_at: Option<Value>,
    #[serde(default)]
    pub token_expiry: Option<Value>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl AuthResponse {
    pub fn bearer(&self) -> Option<&str> {
        [self.token.as_deref(), self.access_token.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
    }

    pub fn raw_expiry(&self) -> Option<&Value> {
        self.expires_at.as_ref().or(self.token_expiry.as_ref())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sport {
    pub sport_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SportsResponse {
    #[serde(default)]
    pub sports: Vec<Sport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn social_login_payload_shape() {
        let creds = Credentials::Social {
            provider: SocialProvider::Google,
            token: "g-token".into(),
            first_name: Some("Ada".into()),
            last_name: None,
        };

        let login = serde_json::to_value(LoginRequest::from(&creds)).unwrap();
        assert_eq!(
            login,
            json!({ "socialLogin": { "provider": "GOOGLE", "token": "g-token" } })
        );

        let signup = serde_json::to_value(SignupRequest::from(&creds)).unwrap();
        assert_eq!(signup["firstName"], json!("Ada"));
        assert!(signup.get("lastName").is_none());
    }

    #[test]
    fn bearer_prefers_token_then_access_token() {
        let resp: AuthResponse =
            serde_json::from_value(json!({ "accessToken": "abc" })).unwrap();
        assert_eq!(resp.bearer(), Some("abc"));

        let resp: AuthResponse = serde_json::from_value(json!({ "token": "" })).unwrap();
        assert_eq!(resp.bearer(), None);
    }
}
