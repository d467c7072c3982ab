use super::ApiClient;
use crate::errors::ApiError;
use crate::models::event::{
    GetEventRequest, GetEventResponse, ListEventsRequest, ListEventsResponse,
};
use crate::models::PageRequest;

pub const LIST_EVENTS_PATH: &str = "/event/v1/listevents";
pub const GET_EVENT_PATH: &str = "/event/v1/getevent";

impl ApiClient {
    /// List events, first page of 20 unless `page` says otherwise.
    pub async fn list_events(
        &self,
        page: Option<PageRequest>,
        sport: Option<String>,
    ) -> Result<ListEventsResponse, ApiError> {
        let req = ListEventsRequest {
            page_request: page.unwrap_or_default(),
            sport,
        };
        self.post(LIST_EVENTS_PATH, &req).await
    }

    /// Fetch one event together with its questions.
    pub async fn get_event(&self, event_id: &str) -> Result<GetEventResponse, ApiError> {
        let req = GetEventRequest {
            event_id: event_id.to_string(),
        };
        self.post(GET_EVENT_PATH, &req).await
    }
}
