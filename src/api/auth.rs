use super::ApiClient;
use crate::errors::ApiError;
use crate::models::user::{AuthResponse, LoginRequest, SignupRequest};

pub const LOGIN_PATH: &str = "/user/v1/login";
pub const SIGNUP_PATH: &str = "/user/v1/signup";

impl ApiClient {
    /// Raw login call. Persisting the session is left to [`crate::auth`].
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post(LOGIN_PATH, req).await
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.post(SIGNUP_PATH, req).await
    }
}
