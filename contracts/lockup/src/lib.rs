pub mod balance;
pub mod contract;
pub mod custody;
mod error;
pub mod genesis;
pub mod index;
pub mod keeper;
mod mock;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
