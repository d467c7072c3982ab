use crate::api::ApiClient;
use crate::cache::EntityCache;
use crate::errors::ApiError;
use crate::models::{Group, LeaderboardEntry};

/// The signed-in user's clans.
///
/// Every mutation invalidates the affected group and refetches it from the
/// server; membership is never edited locally.
#[derive(Debug, Clone)]
pub struct ClanDirectory {
    user_id: String,
    cache: EntityCache<Group>,
}

impl ClanDirectory {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            cache: EntityCache::new(),
        }
    }

    pub fn cache(&self) -> &EntityCache<Group> {
        &self.cache
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.cache.values()
    }

    pub fn get(&self, group_id: &str) -> Option<&Group> {
        self.cache.get(group_id)
    }

    pub async fn refresh(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        let groups = client.list_groups(Some(&self.user_id), None).await?;
        tracing::debug!(user_id = %self.user_id, count = groups.len(), "Clans refreshed");
        self.cache.replace_all(groups);
        Ok(())
    }

    /// Create a clan. The new group is read back from the server before it
    /// appears in the cache.
    pub async fn create(
        &mut self,
        client: &ApiClient,
        name: &str,
        description: Option<String>,
        member_ids: Vec<String>,
    ) -> Result<Option<Group>, ApiError> {
        let created = client.create_group(name, description, member_ids).await?;
        tracing::info!(
            name,
            group_id = ?created.as_ref().map(|g| g.group_id.as_str()),
            "Clan created"
        );

        match created.as_ref().map(|g| g.group_id.clone()) {
            Some(group_id) if !group_id.is_empty() => self.refetch_group(client, &group_id).await,
            _ => {
                self.cache.invalidate_all();
                if let Err(e) = self.refresh(client).await {
                    tracing::warn!(error = %e, "Clan list refetch after create failed");
                }
            }
        }
        Ok(created)
    }

    pub async fn invite(
        &mut self,
        client: &ApiClient,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), ApiError> {
        client.invite_member(group_id, user_id).await?;
        tracing::info!(group_id, user_id, "Clan member invited");
        self.refetch_group(client, group_id).await;
        Ok(())
    }

    pub async fn remove_member(
        &mut self,
        client: &ApiClient,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), ApiError> {
        client.remove_member(group_id, user_id).await?;
        tracing::info!(group_id, user_id, "Clan member removed");
        self.refetch_group(client, group_id).await;
        Ok(())
    }

    /// Leave a clan. The whole list is refetched since the group may no
    /// longer be visible to this user.
    pub async fn leave(&mut self, client: &ApiClient, group_id: &str) -> Result<(), ApiError> {
        client.leave_group(group_id).await?;
        tracing::info!(group_id, user_id = %self.user_id, "Left clan");
        self.cache.invalidate(group_id);
        if let Err(e) = self.refresh(client).await {
            tracing::warn!(error = %e, group_id, "Clan list refetch after leave failed");
        }
        Ok(())
    }

    pub async fn leaderboard(
        &self,
        client: &ApiClient,
        group_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, ApiError> {
        client.group_leaderboard(group_id).await
    }

    async fn refetch_group(&mut self, client: &ApiClient, group_id: &str) {
        self.cache.invalidate(group_id);
        match client.get_group(group_id).await {
            Ok(Some(group)) => self.cache.put(group),
            Ok(None) => {
                self.cache.remove(group_id);
            }
            Err(e) => {
                tracing::warn!(error = %e, group_id, "Clan refetch failed");
            }
        }
    }
}
