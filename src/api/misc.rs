use super::ApiClient;
use crate::errors::ApiError;
use crate::models::user::{ProfileRequest, ProfileResponse, Sport, SportsResponse};
use crate::models::UserProfile;

pub const SPORTS_PATH: &str = "/misc/v1/sports";
pub const PROFILE_PATH: &str = "/user/v1/profile";

impl ApiClient {
    pub async fn list_sports(&self) -> Result<Vec<Sport>, ApiError> {
        let resp: SportsResponse = self.post(SPORTS_PATH, &serde_json::json!({})).await?;
        Ok(resp.sports)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ApiError> {
        let req = ProfileRequest {
            user_id: user_id.to_string(),
        };
        let resp: ProfileResponse = self.post(PROFILE_PATH, &req).await?;
        Ok(resp.user)
    }
}
