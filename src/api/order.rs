use super::ApiClient;
use crate::errors::ApiError;
use crate::models::order::{
    CancelOrderRequest, CreateOrderRequest, ExitOrderRequest, OrderDetailsRequest,
    OrderDetailsResponse, OrderResponse,
};

pub const CREATE_ORDER_PATH: &str = "/order/v1/createorder";
pub const CANCEL_ORDER_PATH: &str = "/order/v1/cancelorder";
pub const EXIT_ORDER_PATH: &str = "/order/v1/exitorder";
pub const ORDER_DETAILS_PATH: &str = "/order/v1/details";

impl ApiClient {
    pub async fn create_order(&self, req: &CreateOrderRequest) -> Result<OrderResponse, ApiError> {
        self.post(CREATE_ORDER_PATH, req).await
    }

    pub async fn cancel_order(&self, req: &CancelOrderRequest) -> Result<OrderResponse, ApiError> {
        self.post(CANCEL_ORDER_PATH, req).await
    }

    pub async fn exit_order(&self, req: &ExitOrderRequest) -> Result<OrderResponse, ApiError> {
        self.post(EXIT_ORDER_PATH, req).await
    }

    pub async fn order_details(&self, order_id: &str) -> Result<OrderDetailsResponse, ApiError> {
        let req = OrderDetailsRequest {
            order_id: order_id.to_string(),
        };
        self.post(ORDER_DETAILS_PATH, &req).await
    }
}
