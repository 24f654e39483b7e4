//! Decoded reads of a store program's accounts.

use super::{AccountInfo, AccountSource, LedgerError};
use crate::Address;
use crate::codec::{Product, PurchaseLayout, PurchaseRecord, RecordKind, StoreLayout, StoreState};
use crate::instruction::StoreProgram;
use crate::logging::{debug, warn};

/// Upper bound on the products [`Catalog::contract_info`] reads.
///
/// The product counter comes from account data and is not trusted to bound
/// the number of address derivations.
pub const MAX_PRODUCT_SCAN: u64 = 1024;

/// Guess what an account holds from its data length.
///
/// Every store record has a distinct fixed length within one deployment,
/// which is what a program-account scan filters on.
pub fn classify(len: usize, store: StoreLayout, purchase: PurchaseLayout) -> Option<RecordKind> {
    if len == StoreState::len(store) {
        Some(RecordKind::StoreState)
    } else if len == Product::LEN {
        Some(RecordKind::Product)
    } else if len == PurchaseRecord::len(purchase) {
        Some(RecordKind::PurchaseRecord)
    } else {
        None
    }
}

/// One product id read from the ledger.
#[derive(Debug)]
pub struct ProductSlot {
    pub id: u64,
    pub address: Address,
    /// `Ok(None)` when the account was closed or never created.
    pub product: Result<Option<Product>, LedgerError>,
}

/// Everything known about a store deployment at one point in time.
#[derive(Debug)]
pub struct ContractInfo {
    pub program_id: Address,
    pub store_address: Address,
    /// `None` when the store account does not exist.
    pub store: Option<StoreState>,
    /// Balance of the store account, `None` when it does not exist.
    pub store_lamports: Option<u64>,
    /// Products `0..product_counter`. Empty when the store is missing or
    /// keeps no catalog.
    pub products: Vec<ProductSlot>,
}

impl ContractInfo {
    /// Products that currently exist and decoded cleanly.
    pub fn live_products(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter_map(|slot| slot.product.as_ref().ok().and_then(Option::as_ref))
    }
}

/// Reads a store deployment's accounts through an [`AccountSource`].
#[derive(Debug, Clone)]
pub struct Catalog<S> {
    source: S,
    program: StoreProgram,
}

impl<S: AccountSource> Catalog<S> {
    pub fn new(source: S, program: StoreProgram) -> Self {
        Self { source, program }
    }

    pub fn program(&self) -> &StoreProgram {
        &self.program
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch an account and check that the store program owns it.
    fn fetch_owned(&self, address: &Address) -> Result<Option<AccountInfo>, LedgerError> {
        let Some(account) = self.source.fetch_account(address)? else {
            debug!(%address, "account not found");
            return Ok(None);
        };
        if account.owner != self.program.program_id {
            warn!(%address, owner = %account.owner, "account owned by another program");
            return Err(LedgerError::ForeignOwner {
                address: *address,
                owner: account.owner,
                expected: self.program.program_id,
            });
        }
        Ok(Some(account))
    }

    /// Read the store state. A missing account is `Ok(None)`.
    pub fn read_store(&self, store: &Address) -> Result<Option<StoreState>, LedgerError> {
        self.fetch_owned(store)?
            .map(|account| StoreState::decode(&account.data, self.program.store_layout))
            .transpose()
            .map_err(LedgerError::from)
    }

    /// Read one product account by id.
    pub fn read_product(&self, product_id: u64) -> Result<Option<Product>, LedgerError> {
        let address = self.program.product_address(product_id)?;
        self.read_product_at(&address)
    }

    fn read_product_at(&self, address: &Address) -> Result<Option<Product>, LedgerError> {
        self.fetch_owned(address)?
            .map(|account| Product::decode(&account.data))
            .transpose()
            .map_err(LedgerError::from)
    }

    /// Read products `0..count`, one result per id.
    ///
    /// A failure on one id does not stop the others.
    pub fn read_products(&self, count: u64) -> Vec<ProductSlot> {
        (0..count)
            .filter_map(|id| match self.program.product_address(id) {
                Ok(address) => Some(ProductSlot {
                    id,
                    address,
                    product: self.read_product_at(&address),
                }),
                Err(e) => {
                    warn!(id, error = %e, "skipping product with no derivable address");
                    None
                }
            })
            .collect()
    }

    /// Purchases made by `buyer`, newest first.
    pub fn purchase_history(&self, buyer: &Address) -> Result<Vec<PurchaseRecord>, LedgerError> {
        let layout = self.program.purchase_layout;
        let accounts = self
            .source
            .fetch_program_accounts(&self.program.program_id, Some(PurchaseRecord::len(layout)))?;
        debug!(candidates = accounts.len(), %layout, "scanning purchase records");

        let mut records = Vec::new();
        for keyed in accounts {
            let record = PurchaseRecord::decode(&keyed.account.data, layout)?;
            if &record.buyer == buyer {
                records.push(record);
            }
        }
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Assemble a [`ContractInfo`] for the store at `store`.
    ///
    /// The product counter is read first and products are fetched after it;
    /// products added in between are not reported. At most
    /// [`MAX_PRODUCT_SCAN`] products are read.
    pub fn contract_info(&self, store: &Address) -> Result<ContractInfo, LedgerError> {
        let account = self.fetch_owned(store)?;
        let state = account
            .as_ref()
            .map(|a| StoreState::decode(&a.data, self.program.store_layout))
            .transpose()?;

        let products = match state.as_ref().and_then(StoreState::product_counter) {
            Some(count) => {
                if count > MAX_PRODUCT_SCAN {
                    warn!(count, limit = MAX_PRODUCT_SCAN, "product counter exceeds scan limit");
                }
                self.read_products(count.min(MAX_PRODUCT_SCAN))
            }
            None => Vec::new(),
        };

        Ok(ContractInfo {
            program_id: self.program.program_id,
            store_address: *store,
            store_lamports: account.as_ref().map(|a| a.lamports),
            store: state,
            products,
        })
    }
}
