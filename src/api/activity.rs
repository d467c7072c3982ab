use super::ApiClient;
use crate::errors::ApiError;
use crate::models::activity::{ActivitiesRequest, ActivitiesResponse};
use crate::models::PageRequest;

pub const ACTIVITIES_BY_USER_PATH: &str = "/activity/v1/getbyuser";
pub const TRANSACTIONS_PATH: &str = "/activity/v1/transactions";

impl ApiClient {
    pub async fn get_activities_by_user(
        &self,
        user_id: &str,
        page: Option<PageRequest>,
    ) -> Result<ActivitiesResponse, ApiError> {
        let req = ActivitiesRequest {
            user_id: user_id.to_string(),
            page_request: page.unwrap_or_default(),
        };
        self.post(ACTIVITIES_BY_USER_PATH, &req).await
    }

    pub async fn get_transactions(
        &self,
        user_id: &str,
        page: Option<PageRequest>,
    ) -> Result<ActivitiesResponse, ApiError> {
        let req = ActivitiesRequest {
            user_id: user_id.to_string(),
            page_request: page.unwrap_or_default(),
        };
        self.post(TRANSACTIONS_PATH, &req).await
    }
}
