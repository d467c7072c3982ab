use rust_decimal::Decimal;

use super::{potential_return, InFlight, SubmitError, ValidationError};
use crate::api::ApiClient;
use crate::cache::EntityCache;
use crate::errors::ApiError;
use crate::metrics;
use crate::models::order::CreateOrderRequest;
use crate::models::{
    MarketDataDetail, Modifiers, OrderResponse, PageRequest, Prediction, PredictionDetails,
    Question, TimeInForce,
};

pub const SUCCESS_MESSAGE: &str = "Prediction placed successfully!";
pub const FAILURE_MESSAGE: &str = "Failed to place prediction. Please try again.";

/// Page size used when refetching the live predictions list.
const ACTIVE_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlipStage {
    Browsing,
    QuestionSelected,
    OutcomeSelected,
    AmountEntered,
    Submitting,
    Success,
    Error,
}

/// Entry flow for a new prediction: question → outcome → confidence/amount → submit.
#[derive(Debug, Clone, Default)]
pub struct PredictionSlip {
    selected_event_id: Option<String>,
    selected_question: Option<Question>,
    selected_outcome: Option<MarketDataDetail>,
    amount: Option<Decimal>,
    confidence_override: Option<Decimal>,
    is_submitting: bool,
    error_msg: Option<String>,
    success_message: Option<String>,
    available_balance: Option<Decimal>,
    active_predictions: EntityCache<Prediction>,
}

impl PredictionSlip {
    pub fn new() -> Self {
        Self::default()
    }

    // -- transitions --------------------------------------------------------

    /// Switching events discards everything selected for the previous one.
    pub fn select_event(&mut self, event_id: impl Into<String>) {
        self.reset_selection();
        self.clear_messages();
        self.selected_event_id = Some(event_id.into());
    }

    pub fn select_question(&mut self, question: Question) {
        if let Some(event_id) = &question.event_id {
            self.selected_event_id = Some(event_id.clone());
        }
        self.selected_question = Some(question);
        self.selected_outcome = None;
        self.confidence_override = None;
        self.clear_messages();
    }

    /// Pick one of the selected question's outcomes. Clears any confidence override.
    pub fn select_outcome(&mut self, outcome: &str) -> Result<(), ValidationError> {
        let question = self
            .selected_question
            .as_ref()
            .ok_or(ValidationError::NoQuestion)?;
        let detail = question
            .outcome(outcome)
            .cloned()
            .ok_or(ValidationError::NoOutcome)?;

        self.selected_outcome = Some(detail);
        self.confidence_override = None;
        self.clear_messages();
        Ok(())
    }

    /// Slider input: overrides the outcome's implied probability. Clamped to 0..=100.
    pub fn set_confidence(&mut self, pct: Decimal) {
        self.confidence_override = Some(pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED));
        self.clear_messages();
    }

    pub fn clear_confidence(&mut self) {
        self.confidence_override = None;
    }

    pub fn set_amount(&mut self, amount: Decimal) {
        self.amount = Some(amount);
        self.clear_messages();
    }

    /// Preset stake button; replaces whatever was typed.
    pub fn quick_amount(&mut self, amount: Decimal) {
        self.set_amount(amount);
    }

    pub fn clear_amount(&mut self) {
        self.amount = None;
    }

    pub fn set_available_balance(&mut self, balance: Option<Decimal>) {
        self.available_balance = balance;
    }

    /// Load the wallet balance used by the insufficient-balance check.
    /// On failure the previous value is kept and the check is skipped if none was loaded.
    pub async fn refresh_balance(&mut self, client: &ApiClient) {
        match client.get_balance(None).await {
            Ok(balance) => self.available_balance = Some(balance.available),
            Err(e) => tracing::warn!(error = %e, "Failed to load balance for prediction slip"),
        }
    }

    // -- derived ------------------------------------------------------------

    pub fn stage(&self) -> SlipStage {
        if self.is_submitting {
            SlipStage::Submitting
        } else if self.error_msg.is_some() {
            SlipStage::Error
        } else if self.success_message.is_some() {
            SlipStage::Success
        } else if self.selected_outcome.is_some()
            && self.amount.map(|a| a > Decimal::ZERO).unwrap_or(false)
        {
            SlipStage::AmountEntered
        } else if self.selected_outcome.is_some() {
            SlipStage::OutcomeSelected
        } else if self.selected_question.is_some() {
            SlipStage::QuestionSelected
        } else {
            SlipStage::Browsing
        }
    }

    /// Override if set, otherwise the selected outcome's implied probability.
    pub fn confidence(&self) -> Option<Decimal> {
        self.confidence_override
            .or_else(|| self.selected_outcome.as_ref().map(|o| o.implied_probability))
    }

    pub fn potential_profit(&self) -> Option<Decimal> {
        Some(potential_return(self.amount?, self.confidence()?))
    }

    pub fn remaining_balance(&self) -> Option<Decimal> {
        Some(self.available_balance? - self.amount.unwrap_or_default())
    }

    pub fn selected_event_id(&self) -> Option<&str> {
        self.selected_event_id.as_deref()
    }

    pub fn selected_question(&self) -> Option<&Question> {
        self.selected_question.as_ref()
    }

    pub fn selected_outcome(&self) -> Option<&MarketDataDetail> {
        self.selected_outcome.as_ref()
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn confidence_override(&self) -> Option<Decimal> {
        self.confidence_override
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn available_balance(&self) -> Option<Decimal> {
        self.available_balance
    }

    pub fn active_predictions(&self) -> impl Iterator<Item = &Prediction> {
        self.active_predictions.values()
    }

    // -- submit -------------------------------------------------------------

    /// Build the order request, or the first failing check.
    pub fn validate(&self) -> Result<CreateOrderRequest, ValidationError> {
        let question = self
            .selected_question
            .as_ref()
            .ok_or(ValidationError::NoQuestion)?;
        let outcome = self
            .selected_outcome
            .as_ref()
            .ok_or(ValidationError::NoOutcome)?;
        let amount = self
            .amount
            .filter(|a| *a > Decimal::ZERO)
            .ok_or(ValidationError::InvalidAmount)?;

        if let Some(available) = self.available_balance {
            if amount > available {
                return Err(ValidationError::InsufficientBalance {
                    available,
                    requested: amount,
                });
            }
        }

        let event_id = question
            .event_id
            .clone()
            .or_else(|| self.selected_event_id.clone())
            .ok_or(ValidationError::NoEvent)?;
        let confidence = self
            .confidence_override
            .unwrap_or(outcome.implied_probability);

        Ok(CreateOrderRequest {
            event_id,
            question_id: question.question_id.clone(),
            amount,
            prediction_details: PredictionDetails {
                selected_prediction_outcome: outcome.outcome.clone(),
            },
            modifiers: Modifiers::with_confidence(confidence),
        })
    }

    /// Validate and place the prediction.
    ///
    /// Validation failures set `error_msg` and never reach the network. On
    /// success the selection is cleared and, when `user_id` is given, the live
    /// predictions list is refetched.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        user_id: Option<&str>,
    ) -> Result<OrderResponse, SubmitError> {
        if self.is_submitting {
            return Err(ValidationError::AlreadySubmitting.into());
        }
        self.clear_messages();

        let req = match self.validate() {
            Ok(req) => req,
            Err(e) => {
                tracing::debug!(error = %e, "Prediction rejected before submit");
                self.error_msg = Some(e.to_string());
                return Err(e.into());
            }
        };

        let result = {
            let _in_flight = InFlight::start(&mut self.is_submitting);
            client.create_order(&req).await
        };

        match result {
            Ok(resp) => {
                metrics::record_prediction_submitted();
                tracing::info!(
                    order_id = ?resp.order_id,
                    event_id = %req.event_id,
                    question_id = %req.question_id,
                    outcome = %req.prediction_details.selected_prediction_outcome,
                    amount = %req.amount,
                    percentage = %req.modifiers.percentage,
                    "Prediction placed"
                );
                self.reset_selection();
                self.success_message = Some(SUCCESS_MESSAGE.to_string());
                self.refresh_balance(client).await;

                self.active_predictions.invalidate_all();
                if let Some(user_id) = user_id {
                    if let Err(e) = self.refresh_active(client, user_id).await {
                        tracing::warn!(error = %e, "Failed to refetch live predictions after submit");
                    }
                }
                Ok(resp)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Prediction submit failed");
                self.error_msg = Some(FAILURE_MESSAGE.to_string());
                Err(e.into())
            }
        }
    }

    /// Replace the live predictions list with the server's.
    pub async fn refresh_active(
        &mut self,
        client: &ApiClient,
        user_id: &str,
    ) -> Result<(), ApiError> {
        let resp = client
            .get_predictions(
                user_id,
                Some(TimeInForce::Live),
                Some(PageRequest::new(1, ACTIVE_PAGE_SIZE)),
            )
            .await?;
        self.active_predictions.replace_all(resp.predictions);
        Ok(())
    }

    fn reset_selection(&mut self) {
        self.selected_question = None;
        self.selected_outcome = None;
        self.amount = None;
        self.confidence_override = None;
    }

    fn clear_messages(&mut self) {
        self.error_msg = None;
        self.success_message = None;
    }
}
