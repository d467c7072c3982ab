use super::ApiClient;
use crate::errors::ApiError;
use crate::models::prediction::{
    ChartWindow, GetPredictionByIdRequest, GetPredictionsByQuestionRequest,
    GetPredictionsRequest, Performance, PerformanceRequest, PerformanceResponse, PnlRequest,
    PnlResponse, PnlSummary, PnlType, Prediction, PredictionResponse, PredictionsResponse,
    TimeInForce,
};
use crate::models::PageRequest;

pub const GET_PREDICTIONS_PATH: &str = "/prediction/v1/get";
pub const GET_PREDICTION_BY_ID_PATH: &str = "/prediction/v1/getbyid";
pub const GET_PREDICTIONS_BY_QUESTION_PATH: &str = "/prediction/v1/getbyquestion";
pub const PERFORMANCE_PATH: &str = "/prediction/v1/performance";
pub const PNL_PATH: &str = "/prediction/v1/pnl";

impl ApiClient {
    pub async fn get_predictions(
        &self,
        user_id: &str,
        time_in_force: Option<TimeInForce>,
        page: Option<PageRequest>,
    ) -> Result<PredictionsResponse, ApiError> {
        let req = GetPredictionsRequest {
            user_id: user_id.to_string(),
            time_in_force,
            page_request: page.unwrap_or_default(),
        };
        self.post(GET_PREDICTIONS_PATH, &req).await
    }

    pub async fn get_prediction_by_id(
        &self,
        prediction_id: &str,
    ) -> Result<Option<Prediction>, ApiError> {
        let req = GetPredictionByIdRequest {
            prediction_id: prediction_id.to_string(),
        };
        let resp: PredictionResponse = self.post(GET_PREDICTION_BY_ID_PATH, &req).await?;
        Ok(resp.prediction)
    }

    pub async fn get_predictions_by_question(
        &self,
        user_id: &str,
        question_id: &str,
        page: Option<PageRequest>,
    ) -> Result<PredictionsResponse, ApiError> {
        let req = GetPredictionsByQuestionRequest {
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            page_request: page.unwrap_or_default(),
        };
        self.post(GET_PREDICTIONS_BY_QUESTION_PATH, &req).await
    }

    /// Performance summary; an empty response decodes to zeros.
    pub async fn get_performance(
        &self,
        user_id: &str,
        window: Option<ChartWindow>,
    ) -> Result<Performance, ApiError> {
        let req = PerformanceRequest {
            user_id: user_id.to_string(),
            time_window: window,
        };
        let resp: PerformanceResponse = self.post(PERFORMANCE_PATH, &req).await?;
        Ok(resp.performance.unwrap_or_default())
    }

    pub async fn get_pnl(&self, user_id: &str, pnl_type: PnlType) -> Result<PnlSummary, ApiError> {
        let req = PnlRequest {
            user_id: user_id.to_string(),
            pnl_type,
        };
        let resp: PnlResponse = self.post(PNL_PATH, &req).await?;
        let mut pnl = resp.pnl.unwrap_or_default();
        if pnl.pnl_type.is_none() {
            pnl.pnl_type = Some(pnl_type);
        }
        Ok(pnl)
    }
}
