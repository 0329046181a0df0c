use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Coins must be non-empty, positive and unique per denom")]
    InvalidCoins {},

    #[error("Invalid lock duration: {duration}s")]
    InvalidDuration { duration: u64 },

    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Insufficient funds to lock")]
    InsufficientFunds {},

    #[error("Escrow transfer to {owner} failed")]
    TransferFailed { owner: String },

    #[error("Lock {id} already exists")]
    DuplicateId { id: u64 },

    #[error("Lock {id} not found")]
    NotFound { id: u64 },

    #[error("Locked {denom} of {owner} would go below zero")]
    Underflow { owner: String, denom: String },

    #[error("Lock store is not empty")]
    NotEmpty {},

    #[error("Escrow balance does not match locked coins")]
    EscrowMismatch {},
}
