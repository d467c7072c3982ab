use super::ApiClient;
use crate::errors::ApiError;
use crate::models::notification::{
    CreateNotificationRequest, MarkMessagesRequest, NotificationListRequest,
    NotificationsResponse, UnreadCountRequest, UnreadCountResponse, UpdateNotificationRequest,
};
use crate::models::{Ack, Notification, NotificationStatus, PageRequest};

pub const NOTIFICATION_LIST_PATH: &str = "/notification/v1/getlist";
pub const NOTIFICATION_CREATE_PATH: &str = "/notification/v1/create";
pub const NOTIFICATION_MARK_PATH: &str = "/notification/v1/markmessages";
pub const NOTIFICATION_UNREAD_COUNT_PATH: &str = "/notification/v1/unreadcount";
pub const NOTIFICATION_UPDATE_PATH: &str = "/notification/v1/update";

impl ApiClient {
    pub async fn list_notifications(
        &self,
        user_id: &str,
        status: Option<NotificationStatus>,
        page: Option<PageRequest>,
    ) -> Result<Vec<Notification>, ApiError> {
        let req = NotificationListRequest {
            user_id: user_id.to_string(),
            status,
            page_request: page.unwrap_or_default(),
        };
        let resp: NotificationsResponse = self.post(NOTIFICATION_LIST_PATH, &req).await?;
        Ok(resp.notifications)
    }

    pub async fn create_notification(
        &self,
        user_id: &str,
        title: &str,
        body: &str,
    ) -> Result<Ack, ApiError> {
        let req = CreateNotificationRequest {
            user_id: user_id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        };
        self.post(NOTIFICATION_CREATE_PATH, &req).await
    }

    /// Set the status of several messages at once.
    pub async fn mark_messages(
        &self,
        user_id: &str,
        message_ids: &[String],
        status: NotificationStatus,
    ) -> Result<Ack, ApiError> {
        let req = MarkMessagesRequest {
            user_id: user_id.to_string(),
            message_ids: message_ids.to_vec(),
            status,
        };
        self.post(NOTIFICATION_MARK_PATH, &req).await
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<u64, ApiError> {
        let req = UnreadCountRequest {
            user_id: user_id.to_string(),
        };
        let resp: UnreadCountResponse = self.post(NOTIFICATION_UNREAD_COUNT_PATH, &req).await?;
        Ok(resp.count)
    }

    pub async fn update_notification(
        &self,
        message_id: &str,
        status: NotificationStatus,
    ) -> Result<Ack, ApiError> {
        let req = UpdateNotificationRequest {
            message_id: message_id.to_string(),
            status,
        };
        self.post(NOTIFICATION_UPDATE_PATH, &req).await
    }
}
