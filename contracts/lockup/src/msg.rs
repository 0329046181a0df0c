use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Timestamp};

use crate::genesis::GenesisState;
use crate::state::{Config, PeriodLock};

#[cw_serde]
pub struct InstantiateMsg {
    /// Max lock duration in seconds
    pub max_lock_duration: Option<u64>,
    /// Locks to restore; the contract must already hold their funds
    pub genesis: Option<GenesisState>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Lock the sent funds for `duration` seconds
    LockTokens { duration: u64 },
}

#[cw_serde]
pub enum SudoMsg {
    /// Release every lock that matured by the block time
    EndBlock {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(LastLockIdResponse)]
    LastLockId {},
    #[returns(PeriodLock)]
    LockedById { id: u64 },
    /// Returns the locks by owner, ascending id
    #[returns(LocksResponse)]
    AccountLocks { owner: String },
    #[returns(CoinsResponse)]
    AccountLockedCoins { owner: String },
    /// Matured coins not yet released
    #[returns(CoinsResponse)]
    AccountUnlockableCoins { owner: String },
    #[returns(LocksResponse)]
    AccountLockedPastTime { owner: String, timestamp: Timestamp },
    #[returns(LocksResponse)]
    AccountUnlockedBeforeTime { owner: String, timestamp: Timestamp },
    #[returns(LocksResponse)]
    AccountLockedLongerDuration { owner: String, duration: u64 },
    /// Sum of all locks
    #[returns(CoinsResponse)]
    ModuleBalance {},
    /// Sum of locks not yet matured
    #[returns(CoinsResponse)]
    ModuleLockedAmount {},
    #[returns(GenesisState)]
    ExportGenesis {},
}

#[cw_serde]
pub struct LastLockIdResponse {
    pub last_lock_id: u64,
}

#[cw_serde]
pub struct LocksResponse {
    pub locks: Vec<PeriodLock>,
}

#[cw_serde]
pub struct CoinsResponse {
    pub coins: Vec<Coin>,
}
