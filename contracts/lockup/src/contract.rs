#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};

use crate::balance::coins_to_string;
use crate::custody::BankCustody;
use crate::error::ContractError;
use crate::genesis::{export_genesis, init_genesis, GenesisState};
use crate::index::account_locked_coins;
use crate::keeper::{
    account_locked_longer_duration, account_locked_past_time, account_unlockable_coins,
    account_unlocked_before_time, create_lock, mature_up_to, module_balance,
    module_locked_amount,
};
use crate::msg::{
    CoinsResponse, ExecuteMsg, InstantiateMsg, LastLockIdResponse, LocksResponse, QueryMsg,
    SudoMsg,
};
use crate::state::{last_lock_id, locks_by_owner, Config, CONFIG, LAST_LOCK_ID, LOCKS};

use cw2::set_contract_version;

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:cw-lockup";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        owner: info.sender,
        max_lock_duration: msg.max_lock_duration,
    };
    CONFIG.save(deps.storage, &config)?;
    LAST_LOCK_ID.save(deps.storage, &0)?;

    let res = Response::new().add_attribute("action", "instantiate");
    match msg.genesis {
        Some(genesis) => try_init_genesis(deps, env, genesis, res),
        None => Ok(res.add_attribute("last_lock_id", "0")),
    }
}

fn try_init_genesis(
    deps: DepsMut,
    env: Env,
    genesis: GenesisState,
    res: Response,
) -> Result<Response, ContractError> {
    for lock in genesis.locks.iter() {
        deps.api.addr_validate(lock.owner.as_str())?;
    }

    let escrow = deps.querier.query_all_balances(&env.contract.address)?;
    let mut custody = BankCustody::new(vec![], escrow);
    init_genesis(deps.storage, &mut custody, &genesis)?;

    Ok(res
        .add_attribute("last_lock_id", genesis.last_lock_id.to_string())
        .add_attribute("locks", genesis.locks.len().to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::LockTokens { duration } => try_lock_tokens(deps, env, info, duration),
    }
}

pub fn try_lock_tokens(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    duration: u64,
) -> Result<Response, ContractError> {
    let mut custody = BankCustody::new(info.funds.clone(), vec![]);
    let lock = create_lock(
        deps.storage,
        &mut custody,
        &info.sender,
        info.funds,
        duration,
        env.block.time,
    )?;

    let res = Response::new()
        .add_attribute("action", "lock_tokens")
        .add_attribute("owner", lock.owner)
        .add_attribute("lock_id", lock.id.to_string())
        .add_attribute("end_time", lock.end_time.to_string())
        .add_attribute("coins", coins_to_string(&lock.coins));
    Ok(res)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    match msg {
        SudoMsg::EndBlock {} => try_end_block(deps, env),
    }
}

pub fn try_end_block(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let escrow = deps.querier.query_all_balances(&env.contract.address)?;
    let mut custody = BankCustody::new(vec![], escrow);
    let maturity = mature_up_to(deps.storage, &mut custody, env.block.time)?;

    let released: Vec<String> = maturity.released.iter().map(|l| l.id.to_string()).collect();
    let failed: Vec<String> = maturity.failed.iter().map(|id| id.to_string()).collect();

    let res = Response::new()
        .add_attribute("action", "end_block")
        .add_attribute("released", released.join(","))
        .add_attribute("failed", failed.join(","))
        .add_messages(custody.into_messages());
    Ok(res)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    let now = env.block.time;
    match msg {
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::LastLockId {} => to_json_binary(&LastLockIdResponse {
            last_lock_id: last_lock_id(deps.storage)?,
        }),
        QueryMsg::LockedById { id } => to_json_binary(&LOCKS.load(deps.storage, id)?),
        QueryMsg::AccountLocks { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&LocksResponse {
                locks: locks_by_owner(deps.storage, &owner)?,
            })
        }
        QueryMsg::AccountLockedCoins { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&CoinsResponse {
                coins: account_locked_coins(deps.storage, &owner)?,
            })
        }
        QueryMsg::AccountUnlockableCoins { owner } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&CoinsResponse {
                coins: account_unlockable_coins(deps.storage, &owner, now)?,
            })
        }
        QueryMsg::AccountLockedPastTime { owner, timestamp } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&LocksResponse {
                locks: account_locked_past_time(deps.storage, &owner, timestamp)?,
            })
        }
        QueryMsg::AccountUnlockedBeforeTime { owner, timestamp } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&LocksResponse {
                locks: account_unlocked_before_time(deps.storage, &owner, timestamp)?,
            })
        }
        QueryMsg::AccountLockedLongerDuration { owner, duration } => {
            let owner = deps.api.addr_validate(&owner)?;
            to_json_binary(&LocksResponse {
                locks: account_locked_longer_duration(deps.storage, &owner, duration)?,
            })
        }
        QueryMsg::ModuleBalance {} => to_json_binary(&CoinsResponse {
            coins: module_balance(deps.storage)?,
        }),
        QueryMsg::ModuleLockedAmount {} => to_json_binary(&CoinsResponse {
            coins: module_locked_amount(deps.storage, now)?,
        }),
        QueryMsg::ExportGenesis {} => to_json_binary(&export_genesis(deps.storage)?),
    }
}
