//! Catalog reads against an in-memory ledger.

mod common;

use cidacake::instruction::PaymentAccounts;
use cidacake::ledger::{AccountInfo, AccountSource, Catalog, MemoryLedger};
use cidacake::{Address, StoreLayout, StoreState};

use common::{BUYER, OTHER_BUYER, OWNER, PROGRAM_ID, STORE, catalog_ledger, catalog_program};

#[test]
fn test_contract_info() -> Result<(), anyhow::Error> {
    let products = [
        common::product(0, "Bolo de Chocolate", 1_500_000, 42),
        common::product(1, "Bolo de Cenoura", 1_200_000, 10),
        common::product(2, "Bolo de Fubá", 900_000, 0),
    ];
    let mut ledger = catalog_ledger(&products, &[])?;
    // Product 1 was closed.
    ledger.remove(&catalog_program().product_address(1)?);

    let catalog = Catalog::new(&ledger, catalog_program());
    let info = catalog.contract_info(&STORE)?;

    let state = info.store.as_ref().ok_or_else(|| anyhow::anyhow!("store missing"))?;
    assert_eq!(state.owner, OWNER);
    assert_eq!(state.product_counter(), Some(3));
    assert_eq!(info.store_lamports, Some(1_000_000));
    assert_eq!(info.products.len(), 3);
    assert!(matches!(info.products[1].product, Ok(None)));

    let live: Vec<_> = info.live_products().map(|p| p.name.as_str()).collect();
    assert_eq!(live, vec!["Bolo de Chocolate", "Bolo de Fubá"]);
    Ok(())
}

#[test]
fn test_missing_store_is_not_zero() -> Result<(), anyhow::Error> {
    let catalog = Catalog::new(MemoryLedger::new(), catalog_program());
    assert_eq!(catalog.read_store(&STORE)?, None);

    let info = catalog.contract_info(&STORE)?;
    assert!(info.store.is_none());
    assert!(info.products.is_empty());
    Ok(())
}

#[test]
fn test_purchase_history_filters_and_sorts() -> Result<(), anyhow::Error> {
    let purchases = [
        common::purchase(BUYER, 0, 1_700_000_100),
        common::purchase(OTHER_BUYER, 0, 1_700_000_200),
        common::purchase(BUYER, 2, 1_700_000_300),
        common::purchase(BUYER, 1, 1_700_000_050),
    ];
    let ledger = catalog_ledger(&[], &purchases)?;

    let history = Catalog::new(&ledger, catalog_program()).purchase_history(&BUYER)?;
    let stamps: Vec<i64> = history.iter().map(|r| r.timestamp).collect();
    assert_eq!(stamps, vec![1_700_000_300, 1_700_000_100, 1_700_000_050]);
    assert!(history.iter().all(|r| r.buyer == BUYER));
    Ok(())
}

#[test]
fn test_history_address_follows_counter() -> Result<(), anyhow::Error> {
    let purchases = [common::purchase(BUYER, 0, 1)];
    let ledger = catalog_ledger(&[common::product(0, "Bolo", 1, 1)], &purchases)?;
    let program = catalog_program();

    let state = Catalog::new(&ledger, program)
        .read_store(&STORE)?
        .ok_or_else(|| anyhow::anyhow!("store missing"))?;
    let next = state
        .history_counter()
        .ok_or_else(|| anyhow::anyhow!("no history counter"))?;

    let payment = PaymentAccounts {
        buyer: BUYER,
        buyer_token: Address::new_from_array([8; 32]),
        owner_token: Address::new_from_array([9; 32]),
    };
    let ix = program.sell_product(&STORE, &payment, 0, next, 1)?;
    let history_account = ix.accounts[2].address;

    // The previous purchase occupies index 0; the new one must not collide.
    assert_eq!(next, 1);
    assert!(ledger.fetch_account(&history_account)?.is_none());
    assert_eq!(history_account, program.history_address(&BUYER, 0, 1)?);
    Ok(())
}

#[test]
fn test_foreign_store_account() -> Result<(), anyhow::Error> {
    let mut ledger = MemoryLedger::new();
    ledger.insert(
        STORE,
        AccountInfo {
            owner: Address::new_from_array([77; 32]),
            lamports: 5,
            data: StoreState::catalog(OWNER, 0, 0).encode()?,
        },
    );
    let err = Catalog::new(&ledger, catalog_program())
        .read_store(&STORE)
        .unwrap_err();
    assert!(err.is_foreign_owner());
    Ok(())
}

#[test]
fn test_snapshot_from_dumps() -> Result<(), anyhow::Error> {
    let source = catalog_ledger(&[common::product(0, "Bolo", 1_000_000, 3)], &[])?;
    let dir = tempfile::tempdir()?;
    for (address, account) in source.iter() {
        std::fs::write(dir.path().join(format!("{address}.bin")), &account.data)?;
    }

    let ledger = MemoryLedger::load_dir(dir.path(), &PROGRAM_ID)?;
    assert_eq!(ledger.len(), source.len());

    let info = Catalog::new(&ledger, catalog_program()).contract_info(&STORE)?;
    assert_eq!(info.store.as_ref().map(|s| s.layout), Some(StoreLayout::Catalog));
    // Dumps carry no balance.
    assert_eq!(info.store_lamports, Some(0));
    assert_eq!(info.live_products().count(), 1);
    Ok(())
}
