use std::collections::BTreeSet;

use cosmwasm_std::Coin;

use crate::error::ContractError;

/// Running per-denom total, kept sorted by denom with no zero entries.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct LockedBalance(Vec<Coin>);

impl LockedBalance {
    pub fn add_tokens(&mut self, add: &[Coin]) {
        for token in add {
            if token.amount.is_zero() {
                continue;
            }
            match self.0.binary_search_by(|exist| exist.denom.cmp(&token.denom)) {
                Ok(idx) => self.0[idx].amount += token.amount,
                Err(idx) => self.0.insert(idx, token.clone()),
            }
        }
    }

    /// Subtracts every token or nothing; `None` when any denom would go negative.
    pub fn checked_sub_tokens(&mut self, sub: &[Coin]) -> Option<()> {
        let mut next = self.0.clone();
        for token in sub {
            if token.amount.is_zero() {
                continue;
            }
            let idx = next
                .binary_search_by(|exist| exist.denom.cmp(&token.denom))
                .ok()?;
            next[idx].amount = next[idx].amount.checked_sub(token.amount).ok()?;
        }
        next.retain(|c| !c.amount.is_zero());
        self.0 = next;
        Some(())
    }

    pub fn into_vec(self) -> Vec<Coin> {
        self.0
    }
}

impl From<Vec<Coin>> for LockedBalance {
    fn from(coins: Vec<Coin>) -> LockedBalance {
        let mut balance = LockedBalance::default();
        balance.add_tokens(&coins);
        balance
    }
}

/// Validates a lock's coins and returns them sorted by denom.
pub fn normalize_coins(mut coins: Vec<Coin>) -> Result<Vec<Coin>, ContractError> {
    if coins.is_empty() {
        return Err(ContractError::InvalidCoins {});
    }

    let mut denoms = BTreeSet::new();
    for coin in coins.iter() {
        if coin.amount.is_zero() || coin.denom.is_empty() || !denoms.insert(coin.denom.clone()) {
            return Err(ContractError::InvalidCoins {});
        }
    }

    coins.sort_by(|a, b| a.denom.cmp(&b.denom));
    Ok(coins)
}

pub fn coins_to_string(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
