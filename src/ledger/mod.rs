//! Read-side view of the ledger.
//!
//! The crate never talks to a cluster itself. Anything that can fetch an
//! account by address and list a program's accounts implements
//! [`AccountSource`]; [`Catalog`] turns those raw accounts into decoded
//! store records.
//!
//! # Module Organization
//!
//! - [`error`]: Transport and read errors
//! - [`memory`]: In-memory source, loadable from account dumps
//! - [`catalog`]: Store, product and purchase history reads

mod catalog;
mod error;
mod memory;

pub use catalog::{Catalog, ContractInfo, MAX_PRODUCT_SCAN, ProductSlot, classify};
pub use error::{LedgerError, SourceError};
pub use memory::MemoryLedger;

use crate::Address;

/// An account as returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Program that owns the account.
    pub owner: Address,
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// An account together with its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedAccount {
    pub address: Address,
    pub account: AccountInfo,
}

/// Fetches accounts from a ledger.
pub trait AccountSource {
    /// Fetch one account. A missing account is `Ok(None)`, not an error.
    fn fetch_account(&self, address: &Address) -> Result<Option<AccountInfo>, SourceError>;

    /// List the accounts owned by `program`, optionally restricted to an
    /// exact data length.
    fn fetch_program_accounts(
        &self,
        program: &Address,
        data_len: Option<usize>,
    ) -> Result<Vec<KeyedAccount>, SourceError>;
}

impl<S: AccountSource + ?Sized> AccountSource for &S {
    fn fetch_account(&self, address: &Address) -> Result<Option<AccountInfo>, SourceError> {
        (**self).fetch_account(address)
    }

    fn fetch_program_accounts(
        &self,
        program: &Address,
        data_len: Option<usize>,
    ) -> Result<Vec<KeyedAccount>, SourceError> {
        (**self).fetch_program_accounts(program, data_len)
    }
}
