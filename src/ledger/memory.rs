//! In-memory account source.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::{AccountInfo, AccountSource, KeyedAccount, SourceError};
use crate::Address;
use crate::logging::{debug, info};

/// Extension of account dump files.
const DUMP_EXTENSION: &str = "bin";

/// A fixed set of accounts held in memory.
///
/// Used for tests and offline inspection of account dumps.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    accounts: BTreeMap<Address, AccountInfo>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account, returning the previous one.
    pub fn insert(&mut self, address: Address, account: AccountInfo) -> Option<AccountInfo> {
        self.accounts.insert(address, account)
    }

    pub fn remove(&mut self, address: &Address) -> Option<AccountInfo> {
        self.accounts.remove(address)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &AccountInfo)> {
        self.accounts.iter()
    }

    /// Load every `<address>.bin` file in `dir` as an account owned by
    /// `owner`.
    ///
    /// Dumps carry raw account data only, so loaded accounts report zero
    /// lamports. Files with other extensions are ignored; a `.bin` file whose
    /// stem is not a base58 address is an error.
    pub fn load_dir(dir: impl AsRef<Path>, owner: &Address) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let io_err = |path: &Path| {
            let path = path.display().to_string();
            move |source| SourceError::Io { path, source }
        };

        let mut ledger = Self::new();
        for entry in fs::read_dir(dir).map_err(io_err(dir))? {
            let path = entry.map_err(io_err(dir))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DUMP_EXTENSION) {
                continue;
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let address = Address::from_str(stem).map_err(|e| SourceError::InvalidDump {
                path: path.display().to_string(),
                reason: format!("file name is not an address: {e}"),
            })?;
            let data = fs::read(&path).map_err(io_err(&path))?;

            debug!(%address, len = data.len(), "loaded account dump");
            ledger.insert(
                address,
                AccountInfo {
                    owner: *owner,
                    lamports: 0,
                    data,
                },
            );
        }

        info!(dir = %dir.display(), accounts = ledger.len(), "loaded account dumps");
        Ok(ledger)
    }
}

impl AccountSource for MemoryLedger {
    fn fetch_account(&self, address: &Address) -> Result<Option<AccountInfo>, SourceError> {
        Ok(self.accounts.get(address).cloned())
    }

    fn fetch_program_accounts(
        &self,
        program: &Address,
        data_len: Option<usize>,
    ) -> Result<Vec<KeyedAccount>, SourceError> {
        Ok(self
            .accounts
            .iter()
            .filter(|(_, account)| &account.owner == program)
            .filter(|(_, account)| data_len.is_none_or(|len| account.data.len() == len))
            .map(|(address, account)| KeyedAccount {
                address: *address,
                account: account.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn key(b: u8) -> Address {
        Address::new_from_array([b; 32])
    }

    fn account(owner: Address, len: usize) -> AccountInfo {
        AccountInfo {
            owner,
            lamports: 1,
            data: vec![0; len],
        }
    }

    #[test]
    fn test_program_accounts_filter() {
        let mut ledger = MemoryLedger::new();
        ledger.insert(key(1), account(key(9), 65));
        ledger.insert(key(2), account(key(9), 48));
        ledger.insert(key(3), account(key(8), 65));

        assert_eq!(ledger.fetch_program_accounts(&key(9), None).unwrap().len(), 2);
        let sized = ledger.fetch_program_accounts(&key(9), Some(65)).unwrap();
        assert_eq!(sized.len(), 1);
        assert_eq!(sized[0].address, key(1));
        assert!(ledger.fetch_account(&key(4)).unwrap().is_none());
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        let address = key(5);
        fs::write(dir.path().join(format!("{address}.bin")), [1, 2, 3]).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ledger = MemoryLedger::load_dir(dir.path(), &key(9)).unwrap();
        assert_eq!(ledger.len(), 1);
        let loaded = ledger.fetch_account(&address).unwrap().unwrap();
        assert_eq!(loaded.data, vec![1, 2, 3]);
        assert_eq!(loaded.owner, key(9));
    }

    #[test]
    fn test_load_dir_rejects_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("not-an-address.bin"), [0]).unwrap();
        let err = MemoryLedger::load_dir(dir.path(), &key(9)).unwrap_err();
        assert!(matches!(err, SourceError::InvalidDump { .. }));
    }
}
