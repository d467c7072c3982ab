use crate::api::ApiClient;
use crate::cache::EntityCache;
use crate::errors::ApiError;
use crate::models::{Ack, Notification, NotificationStatus, PageRequest};

/// Notifications are listed in one page of this size.
pub const INBOX_PAGE_SIZE: u32 = 100;

/// Notification inbox backed by an [`EntityCache`].
///
/// Status changes go to the server first; the touched messages are then
/// invalidated and the list refetched. Nothing is patched locally.
#[derive(Debug, Clone)]
pub struct NotificationInbox {
    user_id: String,
    cache: EntityCache<Notification>,
    unread_count: Option<u64>,
}

impl NotificationInbox {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            cache: EntityCache::new(),
            unread_count: None,
        }
    }

    pub fn cache(&self) -> &EntityCache<Notification> {
        &self.cache
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.cache.values()
    }

    /// Cached notifications still marked unread.
    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.cache
            .values()
            .filter(|n| n.status == NotificationStatus::Unread)
    }

    /// Last unread count reported by the server.
    pub fn last_unread_count(&self) -> Option<u64> {
        self.unread_count
    }

    pub async fn refresh(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        let items = client
            .list_notifications(
                &self.user_id,
                None,
                Some(PageRequest::new(1, INBOX_PAGE_SIZE)),
            )
            .await?;
        tracing::debug!(user_id = %self.user_id, count = items.len(), "Inbox refreshed");
        self.cache.replace_all(items);
        Ok(())
    }

    /// Fetch the unread count from the server.
    pub async fn unread_count(&mut self, client: &ApiClient) -> Result<u64, ApiError> {
        let count = client.unread_count(&self.user_id).await?;
        self.unread_count = Some(count);
        Ok(count)
    }

    pub async fn mark_read(
        &mut self,
        client: &ApiClient,
        message_ids: &[String],
    ) -> Result<Ack, ApiError> {
        self.set_status(client, message_ids, NotificationStatus::Read)
            .await
    }

    pub async fn archive(
        &mut self,
        client: &ApiClient,
        message_ids: &[String],
    ) -> Result<Ack, ApiError> {
        self.set_status(client, message_ids, NotificationStatus::Archived)
            .await
    }

    pub async fn delete(
        &mut self,
        client: &ApiClient,
        message_ids: &[String],
    ) -> Result<Ack, ApiError> {
        self.set_status(client, message_ids, NotificationStatus::Deleted)
            .await
    }

    async fn set_status(
        &mut self,
        client: &ApiClient,
        message_ids: &[String],
        status: NotificationStatus,
    ) -> Result<Ack, ApiError> {
        if message_ids.is_empty() {
            return Ok(Ack::default());
        }

        let ack = client
            .mark_messages(&self.user_id, message_ids, status)
            .await?;
        tracing::info!(
            user_id = %self.user_id,
            count = message_ids.len(),
            status = status.label(),
            "Notifications updated"
        );

        for id in message_ids {
            self.cache.invalidate(id);
        }
        self.refetch(client).await;
        Ok(ack)
    }

    /// Refetch after a mutation. Failures leave the stale marks in place.
    async fn refetch(&mut self, client: &ApiClient) {
        if let Err(e) = self.refresh(client).await {
            tracing::warn!(error = %e, "Inbox refetch after update failed");
        }
        if let Err(e) = self.unread_count(client).await {
            tracing::warn!(error = %e, "Unread count refetch failed");
        }
    }
}
