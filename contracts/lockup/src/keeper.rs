use cosmwasm_std::{Addr, Coin, StdResult, Storage, Timestamp};

use crate::balance::{normalize_coins, LockedBalance};
use crate::custody::Custody;
use crate::error::ContractError;
use crate::index::{add_locked, subtract_locked};
use crate::state::{
    all_locks, insert_lock, load_lock, locks_by_owner, matured_lock_ids, pending_lock_id,
    remove_lock, set_last_lock_id, PeriodLock, CONFIG, LOCKS,
};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Outcome of one maturity pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Maturity {
    /// Released locks, in processing order
    pub released: Vec<PeriodLock>,
    /// Matured locks whose release failed; they stay locked for the next pass
    pub failed: Vec<u64>,
}

pub fn lock_end_time(now: Timestamp, duration: u64) -> Result<Timestamp, ContractError> {
    duration
        .checked_mul(NANOS_PER_SECOND)
        .and_then(|nanos| now.nanos().checked_add(nanos))
        .map(Timestamp::from_nanos)
        .ok_or(ContractError::InvalidDuration { duration })
}

/// Escrows `coins` of `owner` until `now + duration` and records the lock.
pub fn create_lock<C: Custody>(
    store: &mut dyn Storage,
    custody: &mut C,
    owner: &Addr,
    coins: Vec<Coin>,
    duration: u64,
    now: Timestamp,
) -> Result<PeriodLock, ContractError> {
    let coins = normalize_coins(coins)?;

    let max_lock_duration = CONFIG
        .may_load(store)?
        .and_then(|config| config.max_lock_duration);
    if let Some(max) = max_lock_duration {
        if duration > max {
            return Err(ContractError::InvalidDuration { duration });
        }
    }
    let end_time = lock_end_time(now, duration)?;

    // id must be usable before funds move
    let id = pending_lock_id(store)?;
    if LOCKS.has(store, id) {
        return Err(ContractError::DuplicateId { id });
    }

    custody.transfer_to_escrow(owner, &coins)?;

    set_last_lock_id(store, id)?;
    let lock = PeriodLock {
        id,
        owner: owner.clone(),
        duration,
        end_time,
        coins,
    };
    insert_lock(store, &lock)?;
    add_locked(store, owner, &lock.coins)?;

    Ok(lock)
}

/// Releases every lock with `end_time <= now`, ascending end_time then id.
///
/// A failed release leaves that lock in place and carries on with the rest.
pub fn mature_up_to<C: Custody>(
    store: &mut dyn Storage,
    custody: &mut C,
    now: Timestamp,
) -> Result<Maturity, ContractError> {
    let mut maturity = Maturity::default();

    for id in matured_lock_ids(store, now)? {
        let lock = load_lock(store, id)?;
        match custody.transfer_from_escrow(&lock.owner, &lock.coins) {
            Ok(()) => {}
            Err(ContractError::TransferFailed { .. }) => {
                maturity.failed.push(id);
                continue;
            }
            Err(err) => return Err(err),
        }

        let lock = remove_lock(store, id)?;
        subtract_locked(store, &lock.owner, &lock.coins)?;
        maturity.released.push(lock);
    }

    Ok(maturity)
}

fn sum_coins<'a>(locks: impl IntoIterator<Item = &'a PeriodLock>) -> Vec<Coin> {
    let mut total = LockedBalance::default();
    for lock in locks {
        total.add_tokens(&lock.coins);
    }
    total.into_vec()
}

/// Matured locks of `owner` still waiting for a maturity pass.
pub fn account_unlockable_coins(
    store: &dyn Storage,
    owner: &Addr,
    now: Timestamp,
) -> StdResult<Vec<Coin>> {
    let locks = locks_by_owner(store, owner)?;
    Ok(sum_coins(locks.iter().filter(|lock| lock.is_mature(now))))
}

pub fn account_locked_past_time(
    store: &dyn Storage,
    owner: &Addr,
    timestamp: Timestamp,
) -> StdResult<Vec<PeriodLock>> {
    let mut locks = locks_by_owner(store, owner)?;
    locks.retain(|lock| !lock.is_mature(timestamp));
    Ok(locks)
}

pub fn account_unlocked_before_time(
    store: &dyn Storage,
    owner: &Addr,
    timestamp: Timestamp,
) -> StdResult<Vec<PeriodLock>> {
    let mut locks = locks_by_owner(store, owner)?;
    locks.retain(|lock| lock.is_mature(timestamp));
    Ok(locks)
}

pub fn account_locked_longer_duration(
    store: &dyn Storage,
    owner: &Addr,
    duration: u64,
) -> StdResult<Vec<PeriodLock>> {
    let mut locks = locks_by_owner(store, owner)?;
    locks.retain(|lock| lock.duration >= duration);
    Ok(locks)
}

/// Everything held in escrow, matured or not.
pub fn module_balance(store: &dyn Storage) -> StdResult<Vec<Coin>> {
    Ok(sum_coins(all_locks(store)?.iter()))
}

pub fn module_locked_amount(store: &dyn Storage, now: Timestamp) -> StdResult<Vec<Coin>> {
    let locks = all_locks(store)?;
    Ok(sum_coins(locks.iter().filter(|lock| !lock.is_mature(now))))
}
