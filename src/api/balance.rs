use rust_decimal::Decimal;

use super::ApiClient;
use crate::errors::ApiError;
use crate::models::balance::{BalanceAmountRequest, BalanceQuery, BalanceResponse};
use crate::models::Balance;

pub const GET_BALANCE_PATH: &str = "/balances/v1/get";
pub const ADD_BALANCE_PATH: &str = "/balances/v1/add";
pub const RESERVE_BALANCE_PATH: &str = "/balances/v1/reserve";
pub const RELEASE_BALANCE_PATH: &str = "/balances/v1/release";
pub const DEDUCT_BALANCE_PATH: &str = "/balances/v1/deduct";

impl ApiClient {
    pub async fn get_balance(&self, user_id: Option<&str>) -> Result<Balance, ApiError> {
        let req = BalanceQuery {
            user_id: user_id.map(str::to_string),
        };
        let resp: BalanceResponse = self.post(GET_BALANCE_PATH, &req).await?;
        Ok(resp.balance.unwrap_or_default())
    }

    pub async fn add_balance(&self, amount: Decimal) -> Result<Balance, ApiError> {
        self.balance_mutation(ADD_BALANCE_PATH, amount, None).await
    }

    pub async fn reserve_balance(
        &self,
        amount: Decimal,
        reference_id: Option<String>,
    ) -> Result<Balance, ApiError> {
        self.balance_mutation(RESERVE_BALANCE_PATH, amount, reference_id)
            .await
    }

    pub async fn release_balance(
        &self,
        amount: Decimal,
        reference_id: Option<String>,
    ) -> Result<Balance, ApiError> {
        self.balance_mutation(RELEASE_BALANCE_PATH, amount, reference_id)
            .await
    }

    pub async fn deduct_balance(
        &self,
        amount: Decimal,
        reference_id: Option<String>,
    ) -> Result<Balance, ApiError> {
        self.balance_mutation(DEDUCT_BALANCE_PATH, amount, reference_id)
            .await
    }

    async fn balance_mutation(
        &self,
        path: &str,
        amount: Decimal,
        reference_id: Option<String>,
    ) -> Result<Balance, ApiError> {
        let req = BalanceAmountRequest {
            amount,
            reference_id,
        };
        let resp: BalanceResponse = self.post(path, &req).await?;
        Ok(resp.balance.unwrap_or_default())
    }
}
