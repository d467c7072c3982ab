use rust_decimal::Decimal;

use super::{potential_return, InFlight, SubmitError, ValidationError};
use crate::api::ApiClient;
use crate::models::order::{CancelOrderRequest, ExitOrderRequest};
use crate::models::{Modifiers, OrderResponse, Prediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionAction {
    Exit,
    Cancel,
}

impl PositionAction {
    fn success_message(self) -> &'static str {
        match self {
            PositionAction::Exit => "Prediction exited successfully",
            PositionAction::Cancel => "Prediction cancelled successfully",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            PositionAction::Exit => "Failed to exit prediction. Please try again.",
            PositionAction::Cancel => "Failed to cancel prediction. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PositionRequest {
    Exit(ExitOrderRequest),
    Cancel(CancelOrderRequest),
}

/// Exit/cancel panel for a prediction that has already been placed.
///
/// The panel never edits any prediction list; after a successful submit the
/// caller refetches.
#[derive(Debug, Clone, Default)]
pub struct PositionActionPanel {
    selected_action: Option<PositionAction>,
    selected_prediction: Option<Prediction>,
    amount: Option<Decimal>,
    confidence_override: Option<Decimal>,
    is_pending: bool,
    error_msg: Option<String>,
    success_message: Option<String>,
}

impl PositionActionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, action: PositionAction, prediction: Prediction) {
        self.selected_action = Some(action);
        self.selected_prediction = Some(prediction);
        self.amount = None;
        self.confidence_override = None;
        self.error_msg = None;
        self.success_message = None;
    }

    pub fn close(&mut self) {
        self.selected_action = None;
        self.selected_prediction = None;
        self.amount = None;
        self.confidence_override = None;
    }

    pub fn set_amount(&mut self, amount: Decimal) {
        self.amount = Some(amount);
        self.error_msg = None;
    }

    pub fn set_confidence(&mut self, pct: Decimal) {
        self.confidence_override = Some(pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED));
        self.error_msg = None;
    }

    /// Override if set, otherwise the confidence the prediction was placed with.
    pub fn confidence(&self) -> Option<Decimal> {
        self.confidence_override
            .or_else(|| self.selected_prediction.as_ref().and_then(|p| p.percentage))
    }

    /// Same display estimate as the entry flow. Only meaningful for exits.
    pub fn potential_return(&self) -> Option<Decimal> {
        if self.selected_action != Some(PositionAction::Exit) {
            return None;
        }
        Some(potential_return(self.amount?, self.confidence()?))
    }

    pub fn selected_action(&self) -> Option<PositionAction> {
        self.selected_action
    }

    pub fn selected_prediction(&self) -> Option<&Prediction> {
        self.selected_prediction.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.is_pending
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    fn validate(&self) -> Result<(PositionAction, PositionRequest), ValidationError> {
        let prediction = self
            .selected_prediction
            .as_ref()
            .ok_or(ValidationError::NoPrediction)?;
        let action = self.selected_action.ok_or(ValidationError::NoPrediction)?;

        if prediction.status.is_closed() {
            return Err(ValidationError::PredictionClosed);
        }
        let order_id = prediction
            .order_id
            .clone()
            .or_else(|| prediction.prediction_id.clone())
            .ok_or(ValidationError::MissingOrderId)?;

        let request = match action {
            PositionAction::Cancel => PositionRequest::Cancel(CancelOrderRequest {
                order_id,
                prediction_id: prediction.prediction_id.clone(),
            }),
            PositionAction::Exit => {
                let amount = self
                    .amount
                    .filter(|a| *a > Decimal::ZERO)
                    .ok_or(ValidationError::InvalidAmount)?;
                if amount > prediction.investment_amt {
                    return Err(ValidationError::ExceedsStake {
                        invested: prediction.investment_amt,
                        requested: amount,
                    });
                }
                let confidence = self.confidence().ok_or(ValidationError::NoConfidence)?;
                PositionRequest::Exit(ExitOrderRequest {
                    order_id,
                    prediction_id: prediction.prediction_id.clone(),
                    amount,
                    modifiers: Modifiers::with_confidence(confidence),
                })
            }
        };

        Ok((action, request))
    }

    pub async fn submit(&mut self, client: &ApiClient) -> Result<OrderResponse, SubmitError> {
        if self.is_pending {
            return Err(ValidationError::AlreadySubmitting.into());
        }
        self.error_msg = None;
        self.success_message = None;

        let (action, request) = match self.validate() {
            Ok(v) => v,
            Err(e) => {
                self.error_msg = Some(e.to_string());
                return Err(e.into());
            }
        };

        let result = {
            let _in_flight = InFlight::start(&mut self.is_pending);
            match &request {
                PositionRequest::Exit(req) => client.exit_order(req).await,
                PositionRequest::Cancel(req) => client.cancel_order(req).await,
            }
        };

        match result {
            Ok(resp) => {
                tracing::info!(action = ?action, order_id = ?resp.order_id, "Position action accepted");
                self.close();
                self.success_message = Some(action.success_message().to_string());
                Ok(resp)
            }
            Err(e) => {
                tracing::warn!(action = ?action, error = %e, "Position action failed");
                self.error_msg = Some(action.failure_message().to_string());
                Err(e.into())
            }
        }
    }
}
