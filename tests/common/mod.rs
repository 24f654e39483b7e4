//! Common test utilities and fixtures.
//!
//! Shared addresses and account builders for the integration tests.

#![allow(dead_code)]

use cidacake::ledger::{AccountInfo, MemoryLedger};
use cidacake::{Address, Product, ProgramRevision, PurchaseRecord, StoreProgram, StoreState};

/// Program id of the catalog store deployment.
pub const PROGRAM_ID: Address =
    solana_pubkey::pubkey!("3FFzaQvjTsFJe9G4xPrFJEmFKbfm21R57C5jVX74YbWS");

/// Program id of the first, single-product deployment.
pub const SINGLE_PROGRAM_ID: Address =
    solana_pubkey::pubkey!("nY3F2GFxvit5n6g1Ar6drGgSNcFYzwgixpcUxC9p722");

pub const STORE: Address = Address::new_from_array([1; 32]);
pub const OWNER: Address = Address::new_from_array([2; 32]);
pub const BUYER: Address = Address::new_from_array([3; 32]);
pub const OTHER_BUYER: Address = Address::new_from_array([4; 32]);

pub fn catalog_program() -> StoreProgram {
    StoreProgram::new(PROGRAM_ID, ProgramRevision::Catalog)
}

pub fn single_program() -> StoreProgram {
    StoreProgram::new(SINGLE_PROGRAM_ID, ProgramRevision::Single)
}

pub fn product(id: u64, name: &str, price: u64, stock: u64) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: format!("{name} caseiro"),
        price,
        stock,
    }
}

pub fn purchase(buyer: Address, product_id: u64, timestamp: i64) -> PurchaseRecord {
    PurchaseRecord {
        product_id,
        quantity: 1,
        total_price: 1_500_000,
        buyer,
        timestamp,
    }
}

fn owned(data: Vec<u8>) -> AccountInfo {
    AccountInfo {
        owner: PROGRAM_ID,
        lamports: 1_000_000,
        data,
    }
}

/// A catalog store with the given products and purchases on the ledger.
///
/// Purchases are stored at the history accounts the program would have
/// created, indexed in slice order.
pub fn catalog_ledger(
    products: &[Product],
    purchases: &[PurchaseRecord],
) -> Result<MemoryLedger, anyhow::Error> {
    let program = catalog_program();
    let mut ledger = MemoryLedger::new();

    let state = StoreState::catalog(OWNER, products.len() as u64, purchases.len() as u64);
    ledger.insert(STORE, owned(state.encode()?));

    for product in products {
        ledger.insert(program.product_address(product.id)?, owned(product.encode()?));
    }
    for (index, record) in purchases.iter().enumerate() {
        let address = program.history_address(&record.buyer, record.product_id, index as u64)?;
        ledger.insert(address, owned(record.encode(program.purchase_layout)?));
    }
    Ok(ledger)
}
