use alliance_utils::error::ValidationError;
use cosmwasm_std::{CheckedFromRatioError, DivideByZeroError, OverflowError, StdError};
use cw_utils::PaymentError;
use mars_owner::OwnerError;
use thiserror::Error;

pub type ContractResult<T> = Result<T, ContractError>;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    CheckedFromRatio(#[from] CheckedFromRatioError),

    #[error("{0}")]
    DivideByZero(#[from] DivideByZeroError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Owner(#[from] OwnerError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Unknown alliance asset: {denom}")]
    UnknownAsset {
        denom: String,
    },

    #[error("Alliance asset {denom} already exists")]
    AssetAlreadyExists {
        denom: String,
    },

    #[error("Reward weight {weight} is outside of [{min}, {max}]")]
    RewardWeightOutOfBound {
        weight: String,
        min: String,
        max: String,
    },

    #[error("Alliance asset {denom} still has {total_tokens} tokens delegated")]
    AssetNotEmpty {
        denom: String,
        total_tokens: String,
    },

    #[error("Unknown validator: {validator}")]
    UnknownValidator {
        validator: String,
    },

    #[error("No delegation of {denom} from {delegator} to {validator}")]
    DelegationNotFound {
        delegator: String,
        validator: String,
        denom: String,
    },

    #[error("Delegation holds {available} but {requested} was requested")]
    InsufficientTokens {
        available: String,
        requested: String,
    },

    #[error("Amount must be greater than 0")]
    InvalidAmount {},

    #[error("Cannot redelegate to the same validator")]
    SelfRedelegation {},

    #[error("Redelegation into {validator} completes at {completion_time}")]
    RedelegationInProgress {
        validator: String,
        completion_time: u64,
    },
}
