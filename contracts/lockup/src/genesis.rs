use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage};

use crate::balance::{normalize_coins, LockedBalance};
use crate::custody::Custody;
use crate::error::ContractError;
use crate::index::add_locked;
use crate::keeper::module_balance;
use crate::state::{
    all_locks, has_locks, insert_lock, last_lock_id, set_last_lock_id, PeriodLock,
};

/// Snapshot of every outstanding lock, ascending id.
#[cw_serde]
pub struct GenesisState {
    pub last_lock_id: u64,
    pub locks: Vec<PeriodLock>,
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), ContractError> {
        let invalid = |reason: String| ContractError::InvalidSnapshot { reason };

        let mut prev: Option<u64> = None;
        for lock in self.locks.iter() {
            if prev.map_or(false, |prev| lock.id <= prev) {
                return Err(invalid(format!("lock {} out of order", lock.id)));
            }
            prev = Some(lock.id);

            let coins = normalize_coins(lock.coins.clone())
                .map_err(|_| invalid(format!("lock {} has invalid coins", lock.id)))?;
            if coins != lock.coins {
                return Err(invalid(format!("lock {} coins are not sorted", lock.id)));
            }
        }

        if let Some(max_id) = prev {
            if self.last_lock_id < max_id {
                return Err(invalid(format!(
                    "last lock id {} is below lock {}",
                    self.last_lock_id, max_id
                )));
            }
        }
        Ok(())
    }
}

pub fn export_genesis(store: &dyn Storage) -> StdResult<GenesisState> {
    Ok(GenesisState {
        last_lock_id: last_lock_id(store)?,
        locks: all_locks(store)?,
    })
}

/// Restores locks, account index and id allocator into an empty store.
/// A store that ever allocated an id is not empty, even with every lock matured.
/// Escrowed funds are not moved.
pub fn import_genesis(
    store: &mut dyn Storage,
    genesis: &GenesisState,
) -> Result<(), ContractError> {
    if has_locks(store) || last_lock_id(store)? > 0 {
        return Err(ContractError::NotEmpty {});
    }
    genesis.validate()?;

    for lock in genesis.locks.iter() {
        insert_lock(store, lock)?;
        add_locked(store, &lock.owner, &lock.coins)?;
    }
    set_last_lock_id(store, genesis.last_lock_id)?;
    Ok(())
}

/// Imports `genesis` and hands the escrow total to the custody ledger.
pub fn init_genesis<C: Custody>(
    store: &mut dyn Storage,
    custody: &mut C,
    genesis: &GenesisState,
) -> Result<(), ContractError> {
    import_genesis(store, genesis)?;
    custody.set_escrow_balance(&module_balance(store)?)?;
    verify_escrow(store, custody)
}

/// Checks the custody escrow matches the sum of all stored locks.
pub fn verify_escrow<C: Custody>(store: &dyn Storage, custody: &C) -> Result<(), ContractError> {
    let locked = LockedBalance::from(module_balance(store)?);
    if locked != LockedBalance::from(custody.escrow_balance()) {
        return Err(ContractError::EscrowMismatch {});
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::account_locked_coins;
    use crate::keeper::{create_lock, mature_up_to};
    use crate::mock::MockLedger;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::{coin, coins, Addr, StdError, Timestamp};

    const MINUTE: u64 = 60;
    const HOUR: u64 = 3600;

    fn period_lock(id: u64, owner: &str, duration: u64, amount: u128) -> PeriodLock {
        PeriodLock {
            id,
            owner: Addr::unchecked(owner),
            duration,
            end_time: Timestamp::from_seconds(1_000 + duration),
            coins: coins(amount, "foo"),
        }
    }

    fn test_genesis() -> GenesisState {
        GenesisState {
            last_lock_id: 10,
            locks: vec![
                period_lock(1, "acc1", 1, 10_000_000),
                period_lock(2, "acc1", HOUR, 15_000_000),
                period_lock(3, "acc2", MINUTE, 5_000_000),
            ],
        }
    }

    #[test]
    fn init_genesis_builds_index() {
        let mut store = MockStorage::new();
        let mut ledger = MockLedger::default();
        init_genesis(&mut store, &mut ledger, &test_genesis()).unwrap();

        let acc1 = Addr::unchecked("acc1");
        let acc2 = Addr::unchecked("acc2");
        assert_eq!(
            account_locked_coins(&store, &acc1).unwrap(),
            coins(25_000_000, "foo")
        );
        assert_eq!(
            account_locked_coins(&store, &acc2).unwrap(),
            coins(5_000_000, "foo")
        );
        assert_eq!(last_lock_id(&store).unwrap(), 10);
        assert_eq!(ledger.escrow_balance(), coins(30_000_000, "foo"));
        verify_escrow(&store, &ledger).unwrap();
    }

    #[test]
    fn export_after_lock() {
        let mut store = MockStorage::new();
        let acc2 = Addr::unchecked("acc2");
        let mut ledger = MockLedger::default().with_balance(&acc2, coins(5_000_000, "foo"));
        init_genesis(&mut store, &mut ledger, &test_genesis()).unwrap();

        create_lock(
            &mut store,
            &mut ledger,
            &acc2,
            coins(5_000_000, "foo"),
            5,
            Timestamp::from_seconds(1_000),
        )
        .unwrap();
        assert_eq!(
            account_locked_coins(&store, &acc2).unwrap(),
            coins(10_000_000, "foo")
        );

        let exported = export_genesis(&store).unwrap();
        assert_eq!(exported.last_lock_id, 11);
        let mut expected = test_genesis().locks;
        expected.push(period_lock(11, "acc2", 5, 5_000_000));
        assert_eq!(exported.locks, expected);
        verify_escrow(&store, &ledger).unwrap();
    }

    #[test]
    fn round_trip() {
        let mut store = MockStorage::new();
        let acc1 = Addr::unchecked("acc1");
        let mut ledger =
            MockLedger::default().with_balance(&acc1, vec![coin(50, "bar"), coin(50, "foo")]);
        init_genesis(&mut store, &mut ledger, &test_genesis()).unwrap();
        let now = Timestamp::from_seconds(1_000);
        create_lock(&mut store, &mut ledger, &acc1, coins(50, "bar"), 30, now).unwrap();
        create_lock(&mut store, &mut ledger, &acc1, coins(50, "foo"), 90, now).unwrap();
        mature_up_to(&mut store, &mut ledger, now.plus_seconds(MINUTE)).unwrap();

        let exported = export_genesis(&store).unwrap();
        let ids: Vec<u64> = exported.locks.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 12]);
        assert_eq!(exported.last_lock_id, 12);

        let mut restored = MockStorage::new();
        let mut escrow = MockLedger::default();
        init_genesis(&mut restored, &mut escrow, &exported).unwrap();
        assert_eq!(export_genesis(&restored).unwrap(), exported);
        assert_eq!(
            account_locked_coins(&restored, &acc1).unwrap(),
            account_locked_coins(&store, &acc1).unwrap()
        );
        assert_eq!(escrow.escrow_balance(), ledger.escrow_balance());
    }

    #[test]
    fn import_into_populated_store() {
        let mut store = MockStorage::new();
        import_genesis(&mut store, &test_genesis()).unwrap();

        match import_genesis(&mut store, &test_genesis()) {
            Err(ContractError::NotEmpty {}) => {}
            _ => panic!("Must return NotEmpty error"),
        }
        assert_eq!(export_genesis(&store).unwrap(), test_genesis());
    }

    #[test]
    fn import_after_all_matured() {
        let mut store = MockStorage::new();
        let acc1 = Addr::unchecked("acc1");
        let mut ledger = MockLedger::default().with_balance(&acc1, coins(50, "foo"));
        let now = Timestamp::from_seconds(1_000);
        for _ in 0..5 {
            create_lock(&mut store, &mut ledger, &acc1, coins(10, "foo"), 30, now).unwrap();
        }
        let maturity = mature_up_to(&mut store, &mut ledger, now.plus_seconds(30)).unwrap();
        assert_eq!(maturity.released.len(), 5);
        assert!(!has_locks(&store));

        let genesis = GenesisState {
            last_lock_id: 0,
            locks: vec![],
        };
        match import_genesis(&mut store, &genesis) {
            Err(ContractError::NotEmpty {}) => {}
            _ => panic!("Must return NotEmpty error"),
        }
        assert_eq!(last_lock_id(&store).unwrap(), 5);

        let lock = create_lock(&mut store, &mut ledger, &acc1, coins(10, "foo"), 30, now);
        assert_eq!(lock.unwrap().id, 6);
    }

    #[test]
    fn lock_after_max_id_snapshot() {
        let mut store = MockStorage::new();
        let genesis = GenesisState {
            last_lock_id: u64::MAX,
            locks: vec![],
        };
        import_genesis(&mut store, &genesis).unwrap();

        let acc1 = Addr::unchecked("acc1");
        let mut ledger = MockLedger::default().with_balance(&acc1, coins(10, "foo"));
        let now = Timestamp::from_seconds(1_000);
        match create_lock(&mut store, &mut ledger, &acc1, coins(10, "foo"), 30, now) {
            Err(ContractError::Std(StdError::Overflow { .. })) => {}
            _ => panic!("Must return StdError::Overflow error"),
        }
        assert_eq!(export_genesis(&store).unwrap(), genesis);
        assert_eq!(ledger.balance(&acc1), coins(10, "foo"));
    }

    #[test]
    fn invalid_snapshots() {
        let mut genesis = test_genesis();
        genesis.last_lock_id = 2;
        match import_genesis(&mut MockStorage::new(), &genesis) {
            Err(ContractError::InvalidSnapshot { .. }) => {}
            _ => panic!("Must return InvalidSnapshot error"),
        }

        let mut genesis = test_genesis();
        genesis.locks.swap(0, 1);
        match import_genesis(&mut MockStorage::new(), &genesis) {
            Err(ContractError::InvalidSnapshot { .. }) => {}
            _ => panic!("Must return InvalidSnapshot error"),
        }

        let mut genesis = test_genesis();
        genesis.locks[2].id = 2;
        match genesis.validate() {
            Err(ContractError::InvalidSnapshot { .. }) => {}
            _ => panic!("Must return InvalidSnapshot error"),
        }

        let mut genesis = test_genesis();
        genesis.locks[0].coins = vec![];
        match genesis.validate() {
            Err(ContractError::InvalidSnapshot { .. }) => {}
            _ => panic!("Must return InvalidSnapshot error"),
        }

        let mut genesis = test_genesis();
        genesis.locks[0].coins = vec![coin(1, "foo"), coin(1, "bar")];
        match genesis.validate() {
            Err(ContractError::InvalidSnapshot { .. }) => {}
            _ => panic!("Must return InvalidSnapshot error"),
        }

        // empty snapshot keeps any last id
        let genesis = GenesisState {
            last_lock_id: 0,
            locks: vec![],
        };
        let mut store = MockStorage::new();
        import_genesis(&mut store, &genesis).unwrap();
        assert_eq!(export_genesis(&store).unwrap(), genesis);
    }

    #[test]
    fn escrow_mismatch() {
        let mut store = MockStorage::new();
        import_genesis(&mut store, &test_genesis()).unwrap();

        let mut ledger = MockLedger::default();
        ledger.set_escrow_balance(&coins(29_999_999, "foo")).unwrap();
        match verify_escrow(&store, &ledger) {
            Err(ContractError::EscrowMismatch {}) => {}
            _ => panic!("Must return EscrowMismatch error"),
        }
    }
}
