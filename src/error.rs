// Error types for the stakecast ledger
//
// Every public operation returns Result<_, MarketError>; a failed operation
// leaves all stores untouched. Nothing is recovered locally: errors propagate
// to the HTTP layer, which maps them onto status codes.

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum MarketError {
    // === Validation (rejected before any state change) ===
    #[error("market must have between 2 and 10 outcomes, got {0}")]
    InvalidOutcomeCount(usize),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("stake of {staked} is below market minimum of {minimum}")]
    StakeBelowMinimum { staked: String, minimum: String },

    #[error("invalid status filter: {0}")]
    InvalidStatus(String),

    // === Not found ===
    #[error("market not found: {0}")]
    MarketNotFound(String),

    #[error("outcome not found: {0}")]
    OutcomeNotFound(String),

    // === State conflicts ===
    #[error("market is not active: {0}")]
    MarketNotActive(String),

    // === Authorization ===
    #[error("only the market creator may resolve: {0}")]
    NotCreator(String),

    // === Settlement ===
    #[error("market cannot be resolved yet: {0}")]
    ResolutionInconclusive(String),

    // === Balances ===
    #[error("no balance to withdraw")]
    NothingToWithdraw,

    #[error("amount arithmetic overflowed")]
    ArithmeticOverflow,
}

impl MarketError {
    /// HTTP status code for this error, used by the handlers.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::InvalidOutcomeCount(_)
            | MarketError::InvalidCategory(_)
            | MarketError::InvalidAmount(_)
            | MarketError::StakeBelowMinimum { .. }
            | MarketError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            MarketError::MarketNotFound(_) | MarketError::OutcomeNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            MarketError::MarketNotActive(_) => StatusCode::CONFLICT,
            MarketError::NotCreator(_) => StatusCode::FORBIDDEN,
            MarketError::ResolutionInconclusive(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MarketError::NothingToWithdraw => StatusCode::BAD_REQUEST,
            MarketError::ArithmeticOverflow => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
