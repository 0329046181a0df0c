use cosmwasm_std::{Addr, Coin, Order, StdResult, Storage, Uint128};
use cw_storage_plus::Map;

use crate::error::ContractError;

/// Total locked per (owner, denom). Zero entries are removed.
pub const ACCOUNT_LOCKED: Map<(&Addr, &str), Uint128> = Map::new("account_locked");

pub fn add_locked(store: &mut dyn Storage, owner: &Addr, coins: &[Coin]) -> StdResult<()> {
    for coin in coins {
        ACCOUNT_LOCKED.update(store, (owner, coin.denom.as_str()), |total| -> StdResult<_> {
            Ok(total.unwrap_or_default().checked_add(coin.amount)?)
        })?;
    }
    Ok(())
}

/// Fails without writing anything when a denom would underflow; that means the
/// index no longer matches the lock store.
pub fn subtract_locked(
    store: &mut dyn Storage,
    owner: &Addr,
    coins: &[Coin],
) -> Result<(), ContractError> {
    let mut remaining = Vec::with_capacity(coins.len());
    for coin in coins {
        let total = ACCOUNT_LOCKED
            .may_load(store, (owner, coin.denom.as_str()))?
            .unwrap_or_default();
        let left = total
            .checked_sub(coin.amount)
            .map_err(|_| ContractError::Underflow {
                owner: owner.to_string(),
                denom: coin.denom.clone(),
            })?;
        remaining.push((coin.denom.as_str(), left));
    }

    for (denom, left) in remaining {
        if left.is_zero() {
            ACCOUNT_LOCKED.remove(store, (owner, denom));
        } else {
            ACCOUNT_LOCKED.save(store, (owner, denom), &left)?;
        }
    }
    Ok(())
}

pub fn account_locked_coins(store: &dyn Storage, owner: &Addr) -> StdResult<Vec<Coin>> {
    ACCOUNT_LOCKED
        .prefix(owner)
        .range(store, None, None, Order::Ascending)
        .map(|item| item.map(|(denom, amount)| Coin { denom, amount }))
        .collect()
}
