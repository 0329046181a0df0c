use cosmwasm_std::{Addr, BankMsg, Coin, CosmosMsg};

use crate::balance::LockedBalance;
use crate::error::ContractError;

/// Ledger holding the escrowed funds on behalf of lock owners.
pub trait Custody {
    /// Moves `coins` from the owner's spendable balance into escrow.
    /// Fails with `InsufficientFunds`.
    fn transfer_to_escrow(&mut self, owner: &Addr, coins: &[Coin]) -> Result<(), ContractError>;

    /// Releases `coins` from escrow back to the owner. Fails with `TransferFailed`.
    fn transfer_from_escrow(&mut self, owner: &Addr, coins: &[Coin])
        -> Result<(), ContractError>;

    /// Bulk escrow balance set, genesis only.
    fn set_escrow_balance(&mut self, coins: &[Coin]) -> Result<(), ContractError>;

    fn escrow_balance(&self) -> Vec<Coin>;
}

/// Custody backed by the contract's own bank account.
///
/// Funds attached to the message have already been credited to the contract,
/// so moving them into escrow only has to check they cover the lock. Releases
/// are drawn against the contract balance and turned into bank sends.
pub struct BankCustody {
    sent: LockedBalance,
    escrow: LockedBalance,
    messages: Vec<CosmosMsg>,
}

impl BankCustody {
    pub fn new(sent: Vec<Coin>, escrow: Vec<Coin>) -> Self {
        BankCustody {
            sent: sent.into(),
            escrow: escrow.into(),
            messages: vec![],
        }
    }

    pub fn into_messages(self) -> Vec<CosmosMsg> {
        self.messages
    }
}

impl Custody for BankCustody {
    fn transfer_to_escrow(&mut self, _owner: &Addr, coins: &[Coin]) -> Result<(), ContractError> {
        self.sent
            .checked_sub_tokens(coins)
            .ok_or(ContractError::InsufficientFunds {})
    }

    fn transfer_from_escrow(
        &mut self,
        owner: &Addr,
        coins: &[Coin],
    ) -> Result<(), ContractError> {
        self.escrow
            .checked_sub_tokens(coins)
            .ok_or_else(|| ContractError::TransferFailed {
                owner: owner.to_string(),
            })?;

        self.messages.push(
            BankMsg::Send {
                to_address: owner.into(),
                amount: coins.to_vec(),
            }
            .into(),
        );
        Ok(())
    }

    // The bank module owns the balance; the contract can only confirm it holds it.
    fn set_escrow_balance(&mut self, coins: &[Coin]) -> Result<(), ContractError> {
        if self.escrow != LockedBalance::from(coins.to_vec()) {
            return Err(ContractError::EscrowMismatch {});
        }
        Ok(())
    }

    fn escrow_balance(&self) -> Vec<Coin> {
        self.escrow.clone().into_vec()
    }
}
