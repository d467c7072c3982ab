use super::ApiClient;
use crate::errors::ApiError;
use crate::models::group::{
    CreateGroupRequest, GroupIdRequest, GroupMemberRequest, GroupResponse, GroupsResponse,
    LeaderboardResponse, ListGroupsRequest,
};
use crate::models::{Ack, Group, LeaderboardEntry, PageRequest};

pub const LIST_GROUPS_PATH: &str = "/group/v1/list";
pub const GET_GROUP_PATH: &str = "/group/v1/get";
pub const CREATE_GROUP_PATH: &str = "/group/v1/create";
pub const INVITE_MEMBER_PATH: &str = "/group/v1/invite";
pub const REMOVE_MEMBER_PATH: &str = "/group/v1/removemember";
pub const LEAVE_GROUP_PATH: &str = "/group/v1/leave";
pub const GROUP_LEADERBOARD_PATH: &str = "/group/v1/leaderboard";

impl ApiClient {
    pub async fn list_groups(
        &self,
        user_id: Option<&str>,
        page: Option<PageRequest>,
    ) -> Result<Vec<Group>, ApiError> {
        let req = ListGroupsRequest {
            user_id: user_id.map(str::to_string),
            page_request: page.unwrap_or_default(),
        };
        let resp: GroupsResponse = self.post(LIST_GROUPS_PATH, &req).await?;
        Ok(resp.groups)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, ApiError> {
        let resp: GroupResponse = self.post(GET_GROUP_PATH, &group_id_req(group_id)).await?;
        Ok(resp.group)
    }

    pub async fn create_group(
        &self,
        group_name: &str,
        description: Option<String>,
        member_ids: Vec<String>,
    ) -> Result<Option<Group>, ApiError> {
        let req = CreateGroupRequest {
            group_name: group_name.to_string(),
            description,
            member_ids,
        };
        let resp: GroupResponse = self.post(CREATE_GROUP_PATH, &req).await?;
        Ok(resp.group)
    }

    pub async fn invite_member(&self, group_id: &str, user_id: &str) -> Result<Ack, ApiError> {
        self.post(INVITE_MEMBER_PATH, &member_req(group_id, user_id))
            .await
    }

    pub async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<Ack, ApiError> {
        self.post(REMOVE_MEMBER_PATH, &member_req(group_id, user_id))
            .await
    }

    pub async fn leave_group(&self, group_id: &str) -> Result<Ack, ApiError> {
        self.post(LEAVE_GROUP_PATH, &group_id_req(group_id)).await
    }

    pub async fn group_leaderboard(
        &self,
        group_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let resp: LeaderboardResponse = self
            .post(GROUP_LEADERBOARD_PATH, &group_id_req(group_id))
            .await?;
        Ok(resp.leaderboard)
    }
}

fn group_id_req(group_id: &str) -> GroupIdRequest {
    GroupIdRequest {
        group_id: group_id.to_string(),
    }
}

fn member_req(group_id: &str, user_id: &str) -> GroupMemberRequest {
    GroupMemberRequest {
        group_id: group_id.to_string(),
        user_id: user_id.to_string(),
    }
}
