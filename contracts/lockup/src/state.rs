use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    Addr, Coin, Order, OverflowError, OverflowOperation, StdResult, Storage, Timestamp,
};
use cw_storage_plus::{Bound, Item, Map};

use crate::error::ContractError;

#[cw_serde]
pub struct Config {
    pub owner: Addr,
    /// Max lock duration in seconds, unbounded when unset
    pub max_lock_duration: Option<u64>,
}

#[cw_serde]
pub struct PeriodLock {
    pub id: u64,
    pub owner: Addr,
    /// Lock duration in seconds
    pub duration: u64,
    pub end_time: Timestamp,
    /// Sorted by denom, one entry per denom
    pub coins: Vec<Coin>,
}

impl PeriodLock {
    pub fn is_mature(&self, now: Timestamp) -> bool {
        self.end_time <= now
    }
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const LAST_LOCK_ID: Item<u64> = Item::new("last_lock_id");

pub const LOCKS: Map<u64, PeriodLock> = Map::new("locks");
/// Locks by owner, ascending id
pub const OWNER_LOCKS: Map<(&Addr, u64), ()> = Map::new("owner_locks");
/// Maturity queue keyed by (end_time nanos, id)
pub const LOCK_QUEUE: Map<(u64, u64), ()> = Map::new("lock_queue");

pub fn insert_lock(store: &mut dyn Storage, lock: &PeriodLock) -> Result<(), ContractError> {
    if LOCKS.has(store, lock.id) {
        return Err(ContractError::DuplicateId { id: lock.id });
    }

    LOCKS.save(store, lock.id, lock)?;
    OWNER_LOCKS.save(store, (&lock.owner, lock.id), &())?;
    LOCK_QUEUE.save(store, (lock.end_time.nanos(), lock.id), &())?;
    Ok(())
}

pub fn load_lock(store: &dyn Storage, id: u64) -> Result<PeriodLock, ContractError> {
    LOCKS
        .may_load(store, id)?
        .ok_or(ContractError::NotFound { id })
}

pub fn remove_lock(store: &mut dyn Storage, id: u64) -> Result<PeriodLock, ContractError> {
    let lock = load_lock(store, id)?;

    LOCKS.remove(store, id);
    OWNER_LOCKS.remove(store, (&lock.owner, id));
    LOCK_QUEUE.remove(store, (lock.end_time.nanos(), id));
    Ok(lock)
}

pub fn locks_by_owner(store: &dyn Storage, owner: &Addr) -> StdResult<Vec<PeriodLock>> {
    OWNER_LOCKS
        .prefix(owner)
        .keys(store, None, None, Order::Ascending)
        .map(|id| LOCKS.load(store, id?))
        .collect()
}

pub fn all_locks(store: &dyn Storage) -> StdResult<Vec<PeriodLock>> {
    LOCKS
        .range(store, None, None, Order::Ascending)
        .map(|item| item.map(|(_, lock)| lock))
        .collect()
}

pub fn has_locks(store: &dyn Storage) -> bool {
    LOCKS
        .keys(store, None, None, Order::Ascending)
        .next()
        .is_some()
}

/// Ids of locks with `end_time <= now`, ascending end_time then id.
pub fn matured_lock_ids(store: &dyn Storage, now: Timestamp) -> StdResult<Vec<u64>> {
    let max = Bound::inclusive((now.nanos(), u64::MAX));
    LOCK_QUEUE
        .keys(store, None, Some(max), Order::Ascending)
        .map(|key| key.map(|(_, id)| id))
        .collect()
}

pub fn last_lock_id(store: &dyn Storage) -> StdResult<u64> {
    Ok(LAST_LOCK_ID.may_load(store)?.unwrap_or_default())
}

/// Id the next allocation will return, without reserving it.
pub fn pending_lock_id(store: &dyn Storage) -> StdResult<u64> {
    let last = last_lock_id(store)?;
    let id = last
        .checked_add(1)
        .ok_or_else(|| OverflowError::new(OverflowOperation::Add, last, 1))?;
    Ok(id)
}

pub fn next_lock_id(store: &mut dyn Storage) -> StdResult<u64> {
    let id = pending_lock_id(store)?;
    LAST_LOCK_ID.save(store, &id)?;
    Ok(id)
}

pub fn set_last_lock_id(store: &mut dyn Storage, id: u64) -> StdResult<()> {
    LAST_LOCK_ID.save(store, &id)
}
