use super::ApiClient;
use crate::errors::ApiError;
use crate::models::event::{MarketDataDetail, MarketDataRequest, MarketDataResponse};

pub const MARKET_DATA_PATH: &str = "/marketdata/v1/get";

impl ApiClient {
    /// Current outcome quotes (implied probabilities) for a question.
    pub async fn get_market_data(
        &self,
        question_id: &str,
    ) -> Result<Vec<MarketDataDetail>, ApiError> {
        let req = MarketDataRequest {
            question_id: question_id.to_string(),
        };
        let resp: MarketDataResponse = self.post(MARKET_DATA_PATH, &req).await?;
        Ok(resp.market_data_details)
    }
}
