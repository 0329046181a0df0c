#![cfg(test)]

use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::{Addr, Coin};

use crate::balance::LockedBalance;
use crate::custody::Custody;
use crate::error::ContractError;

/// In-memory bank with a single escrow account.
#[derive(Default)]
pub struct MockLedger {
    accounts: BTreeMap<Addr, LockedBalance>,
    escrow: LockedBalance,
    frozen: BTreeSet<Addr>,
}

impl MockLedger {
    pub fn with_balance(mut self, owner: &Addr, coins: Vec<Coin>) -> Self {
        self.accounts.insert(owner.clone(), coins.into());
        self
    }

    pub fn balance(&self, owner: &Addr) -> Vec<Coin> {
        self.accounts
            .get(owner)
            .cloned()
            .unwrap_or_default()
            .into_vec()
    }

    /// Releases to `owner` fail until thawed.
    pub fn freeze(&mut self, owner: &Addr) {
        self.frozen.insert(owner.clone());
    }

    pub fn thaw(&mut self, owner: &Addr) {
        self.frozen.remove(owner);
    }
}

impl Custody for MockLedger {
    fn transfer_to_escrow(&mut self, owner: &Addr, coins: &[Coin]) -> Result<(), ContractError> {
        self.accounts
            .entry(owner.clone())
            .or_default()
            .checked_sub_tokens(coins)
            .ok_or(ContractError::InsufficientFunds {})?;
        self.escrow.add_tokens(coins);
        Ok(())
    }

    fn transfer_from_escrow(
        &mut self,
        owner: &Addr,
        coins: &[Coin],
    ) -> Result<(), ContractError> {
        let failed = || ContractError::TransferFailed {
            owner: owner.to_string(),
        };
        if self.frozen.contains(owner) {
            return Err(failed());
        }
        self.escrow.checked_sub_tokens(coins).ok_or_else(failed)?;
        self.accounts
            .entry(owner.clone())
            .or_default()
            .add_tokens(coins);
        Ok(())
    }

    fn set_escrow_balance(&mut self, coins: &[Coin]) -> Result<(), ContractError> {
        self.escrow = coins.to_vec().into();
        Ok(())
    }

    fn escrow_balance(&self) -> Vec<Coin> {
        self.escrow.clone().into_vec()
    }
}
