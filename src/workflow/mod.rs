pub mod position;
pub mod prediction;

pub use position::{PositionAction, PositionActionPanel};
pub use prediction::{PredictionSlip, SlipStage};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::errors::ApiError;

/// Client-side checks that run before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select an event")]
    NoEvent,

    #[error("Please select a question")]
    NoQuestion,

    #[error("Please select an outcome")]
    NoOutcome,

    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Insufficient balance")]
    InsufficientBalance { available: Decimal, requested: Decimal },

    #[error("Please choose a confidence level")]
    NoConfidence,

    #[error("Please select a prediction")]
    NoPrediction,

    #[error("This prediction can no longer be changed")]
    PredictionClosed,

    #[error("Selected prediction has no order id")]
    MissingOrderId,

    #[error("Amount exceeds the amount invested")]
    ExceedsStake { invested: Decimal, requested: Decimal },

    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// True when the request never left the client.
    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::Validation(_))
    }
}

/// Display estimate of the return on a stake: `amount * confidence / 100`.
/// Settlement itself happens server-side.
pub fn potential_return(amount: Decimal, confidence_pct: Decimal) -> Decimal {
    (amount * confidence_pct / Decimal::ONE_HUNDRED).round_dp(2)
}

/// Holds an in-flight flag for the life of one request. The flag is cleared
/// on drop, so a cancelled submit future cannot leave it set.
pub(crate) struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    pub(crate) fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
